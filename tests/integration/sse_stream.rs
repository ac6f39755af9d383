//! The streaming endpoint end-to-end: HTTP request in, SSE frames out,
//! with a live worker runtime answering check jobs behind the queue.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use namesmith_api::{create_api_routes, AppState};
use namesmith_application::use_cases::{
    DispatchChecksUseCase, GetDomainUseCase, SuggestDomainsUseCase,
};
use namesmith_domain::CheckStatus;
use namesmith_infrastructure::database::create_test_pool;
use namesmith_infrastructure::repositories::{
    SqliteDomainRepository, SqliteSuggestionRepository, SqliteWorkerTelemetryRepository,
};
use namesmith_infrastructure::InMemoryWorkQueue;
use namesmith_worker::WorkerRuntime;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

mod common;
use common::{ScriptedGenerator, TableProber};

async fn app(generator: ScriptedGenerator, prober: TableProber) -> (axum::Router, CancellationToken) {
    let pool = create_test_pool().await.unwrap();
    let queue = Arc::new(InMemoryWorkQueue::new());
    let domains = Arc::new(SqliteDomainRepository::new(pool.clone()));
    let suggestions = Arc::new(SqliteSuggestionRepository::new(pool.clone()));
    let telemetry = Arc::new(SqliteWorkerTelemetryRepository::new(pool));

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
    let suggest = Arc::new(SuggestDomainsUseCase::new(
        Arc::new(generator),
        dispatcher,
        queue,
        domains.clone(),
        suggestions,
        5,
    ));
    let get_domain = Arc::new(GetDomainUseCase::new(domains));

    let state = AppState {
        suggest,
        get_domain,
    };
    (create_api_routes(state), shutdown)
}

#[tokio::test]
async fn stream_emits_start_suggestions_complete() {
    let generator = ScriptedGenerator::new(&[&["osteria.de", "cucina.de"]]);
    let prober = TableProber::new(&[
        ("osteria.de", CheckStatus::Free),
        ("cucina.de", CheckStatus::Registered),
    ]);
    let (app, shutdown) = app(generator, prober).await;

    let response = app
        .oneshot(
            Request::get("/domains/suggest/stream?description=italian%20restaurant&count=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap(),
        "text/event-stream"
    );

    // The event channel closes once the orchestrator finishes, so the
    // whole body can be collected with a deadline.
    let collected = tokio::time::timeout(Duration::from_secs(15), async {
        response.into_body().collect().await.unwrap().to_bytes()
    })
    .await
    .expect("stream finished");
    let text = String::from_utf8(collected.to_vec()).unwrap();

    let start_at = text.find("event: start").expect("start event");
    let suggestions_at = text.find("event: suggestions").expect("suggestions event");
    let complete_at = text.find("event: complete").expect("complete event");
    assert!(start_at < suggestions_at && suggestions_at < complete_at);

    assert!(text.contains("\"available_count\":1"));
    assert!(text.contains("osteria.de"));
    assert!(text.contains("\"status\":\"available\""));

    shutdown.cancel();
}

#[tokio::test]
async fn stream_surfaces_invalid_input_before_any_event() {
    let generator = ScriptedGenerator::new(&[]);
    let prober = TableProber::new(&[]);
    let (app, shutdown) = app(generator, prober).await;

    let response = app
        .oneshot(
            Request::get("/domains/suggest/stream?description=%20&count=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    shutdown.cancel();
}
