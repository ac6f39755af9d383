//! Full-stack suggestion flow: orchestrator → dispatcher → in-memory queue
//! → worker runtime → prober, with SQLite persistence underneath.

use namesmith_application::ports::DomainRepository;
use namesmith_application::use_cases::{
    DispatchChecksUseCase, SuggestDomainsUseCase, SuggestRequest,
};
use namesmith_domain::{CheckStatus, DomainStatus, PromptType};
use namesmith_infrastructure::database::create_test_pool;
use namesmith_infrastructure::repositories::{
    SqliteDomainRepository, SqliteSuggestionRepository, SqliteWorkerTelemetryRepository,
};
use namesmith_infrastructure::InMemoryWorkQueue;
use namesmith_worker::WorkerRuntime;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod common;
use common::{ScriptedGenerator, TableProber};

struct Stack {
    suggest: SuggestDomainsUseCase,
    domains: Arc<SqliteDomainRepository>,
    pool: sqlx::SqlitePool,
    shutdown: CancellationToken,
}

async fn stack(generator: ScriptedGenerator, prober: TableProber, max_retries: u32) -> Stack {
    let pool = create_test_pool().await.unwrap();
    let queue = Arc::new(InMemoryWorkQueue::new());
    let domains = Arc::new(SqliteDomainRepository::new(pool.clone()));
    let suggestions = Arc::new(SqliteSuggestionRepository::new(pool.clone()));
    let telemetry = Arc::new(SqliteWorkerTelemetryRepository::new(pool.clone()));

    let runtime = WorkerRuntime::new(queue.clone(), Arc::new(prober), domains.clone(), 4);
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { runtime.run(shutdown).await });
    }

    let dispatcher = Arc::new(DispatchChecksUseCase::new(
        queue.clone(),
        telemetry,
        Duration::from_secs(10),
    ));
    let suggest = SuggestDomainsUseCase::new(
        Arc::new(generator),
        dispatcher,
        queue,
        domains.clone(),
        suggestions,
        max_retries,
    );

    Stack {
        suggest,
        domains,
        pool,
        shutdown,
    }
}

fn request(target_count: u32) -> SuggestRequest {
    SuggestRequest {
        description: "italian restaurant in berlin".to_string(),
        target_count,
        prompt_type: PromptType::Legacy,
        user_id: Some("user-7".to_string()),
        preferences: None,
        similar_to: None,
    }
}

async fn wait_for<F, Fut>(mut probe: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if probe().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("condition never became true");
}

#[tokio::test]
async fn happy_path_through_real_worker_and_database() {
    let generator = ScriptedGenerator::new(&[&[
        "trattoriaberlin.de",
        "pastaberlin.de",
        "romaberlin.de",
        "napoliberlin.de",
    ]]);
    let prober = TableProber::new(&[
        ("trattoriaberlin.de", CheckStatus::Free),
        ("pastaberlin.de", CheckStatus::Free),
        ("romaberlin.de", CheckStatus::Free),
        ("napoliberlin.de", CheckStatus::Registered),
    ]);
    let stack = stack(generator, prober, 5).await;

    let entries = stack.suggest.execute(&request(3)).await.unwrap();

    assert_eq!(entries.len(), 4);
    assert_eq!(
        entries
            .iter()
            .filter(|e| e.status == DomainStatus::Available)
            .count(),
        3
    );
    assert_eq!(entries[0].domain, "trattoriaberlin.de");
    assert_eq!(entries[0].tld, "de");

    // Background persistence: domains and the metrics row land shortly
    // after the response.
    let domains = stack.domains.clone();
    wait_for(|| {
        let domains = domains.clone();
        async move {
            matches!(
                domains.get("trattoriaberlin.de").await.unwrap(),
                Some(record) if record.status == DomainStatus::Available
            )
        }
    })
    .await;

    let pool = stack.pool.clone();
    wait_for(|| {
        let pool = pool.clone();
        async move {
            let count: (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM suggestion_metrics")
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            count.0 == 1
        }
    })
    .await;

    let row: (i64, i64, i64, i64) = sqlx::query_as(
        "SELECT reached_target, retry_count, available_domains_count, domains_returned
         FROM suggestion_metrics",
    )
    .fetch_one(&stack.pool)
    .await
    .unwrap();
    assert_eq!(row, (1, 1, 3, 4));

    // Worker telemetry accumulated under this worker's hostname:pid id.
    let pool = stack.pool.clone();
    wait_for(|| {
        let pool = pool.clone();
        async move {
            let workers: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM worker_metrics")
                .fetch_one(&pool)
                .await
                .unwrap();
            workers.0 == 1
        }
    })
    .await;

    stack.shutdown.cancel();
}

#[tokio::test]
async fn upgrade_across_retries_through_real_worker() {
    let generator = ScriptedGenerator::new(&[&["foo.com"], &["foo.com", "bar.com"]]);
    let prober = TableProber::new(&[
        ("foo.com", CheckStatus::NonConclusive),
        ("foo.com", CheckStatus::Free),
        ("bar.com", CheckStatus::Registered),
    ]);
    let stack = stack(generator, prober, 5).await;

    // Pass one leaves foo.com unknown; pass two re-checks it, finds it
    // free, and the entry upgrades in place.
    let entries = stack.suggest.execute(&request(1)).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].domain, "foo.com");
    assert_eq!(entries[0].status, DomainStatus::Available);
    assert_eq!(entries[1].domain, "bar.com");
    assert_eq!(entries[1].status, DomainStatus::Registered);

    stack.shutdown.cancel();
}

#[tokio::test]
async fn retry_budget_exhaustion_is_success_with_partial_results() {
    let generator = ScriptedGenerator::new(&[&["taken.com"], &["also-taken.com"]]);
    let prober = TableProber::new(&[
        ("taken.com", CheckStatus::Registered),
        ("also-taken.com", CheckStatus::Registered),
    ]);
    let stack = stack(generator, prober, 2).await;

    let entries = stack.suggest.execute(&request(5)).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.status == DomainStatus::Registered));

    let pool = stack.pool.clone();
    wait_for(|| {
        let pool = pool.clone();
        async move {
            let count: (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM suggestion_metrics")
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            count.0 == 1
        }
    })
    .await;

    let row: (i64, i64) =
        sqlx::query_as("SELECT reached_target, retry_count FROM suggestion_metrics")
            .fetch_one(&stack.pool)
            .await
            .unwrap();
    assert_eq!(row, (0, 2));

    stack.shutdown.cancel();
}
