use clap::{Parser, Subcommand};
use namesmith_api::{create_api_routes, AppState};
use namesmith_application::use_cases::{
    DispatchChecksUseCase, GetDomainUseCase, SuggestDomainsUseCase,
};
use namesmith_domain::Config;
use namesmith_infrastructure::database::create_pool;
use namesmith_infrastructure::repositories::{
    SqliteDomainRepository, SqliteSuggestionRepository, SqliteWorkerTelemetryRepository,
};
use namesmith_infrastructure::{DnsWhoisProber, GroqSuggestor, RedisWorkQueue};
use namesmith_worker::{IdleRecheckJob, WorkerRuntime};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "namesmith")]
#[command(version)]
#[command(about = "AI-assisted domain name discovery service")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API server
    Serve,
    /// Run a domain check worker
    Worker,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    let log_level = config
        .logging
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_max_level(log_level)
        .init();

    match cli.command {
        Command::Serve => serve(config).await,
        Command::Worker => worker(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.llm.require_api_key()?;
    info!("Starting namesmith API v{}", env!("CARGO_PKG_VERSION"));

    let database_url = format!("sqlite:{}", config.database.path);
    let pool = create_pool(&database_url).await?;
    info!(path = %config.database.path, "Database ready");

    let queue = Arc::new(
        RedisWorkQueue::connect(&config.queue.redis_url, &config.queue.queue_name).await?,
    );
    info!(queue = %config.queue.queue_name, "Queue connected");

    let domains = Arc::new(SqliteDomainRepository::new(pool.clone()));
    let suggestions = Arc::new(SqliteSuggestionRepository::new(pool.clone()));
    let telemetry = Arc::new(SqliteWorkerTelemetryRepository::new(pool));

    let dispatcher = Arc::new(DispatchChecksUseCase::new(
        queue.clone(),
        telemetry,
        Duration::from_secs(config.queue.job_timeout_secs),
    ));
    let generator = Arc::new(GroqSuggestor::new(config.llm.clone()));
    let suggest = Arc::new(SuggestDomainsUseCase::new(
        generator,
        dispatcher,
        queue,
        domains.clone(),
        suggestions,
        config.orchestrator.max_retries,
    ));
    let get_domain = Arc::new(GetDomainUseCase::new(domains));

    let state = AppState {
        suggest,
        get_domain,
    };
    let app = create_api_routes(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, model = %config.llm.model, "API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn worker(config: Config) -> anyhow::Result<()> {
    info!("Starting namesmith worker v{}", env!("CARGO_PKG_VERSION"));

    let database_url = format!("sqlite:{}", config.database.path);
    let pool = create_pool(&database_url).await?;

    let queue = Arc::new(
        RedisWorkQueue::connect(&config.queue.redis_url, &config.queue.queue_name).await?,
    );
    let domains = Arc::new(SqliteDomainRepository::new(pool));
    let prober = Arc::new(DnsWhoisProber::new(config.worker.dns_timeout_secs));

    let runtime = WorkerRuntime::new(
        queue.clone(),
        prober,
        domains.clone(),
        config.worker.max_concurrent_checks,
    );

    let shutdown = CancellationToken::new();
    if config.worker.enable_idle_recheck {
        let recheck = IdleRecheckJob::new(queue.clone(), domains, runtime.idle_clock())
            .with_poll_interval(Duration::from_secs(config.worker.recheck_poll_interval_secs))
            .with_idle_threshold(Duration::from_secs(config.worker.idle_threshold_secs))
            .with_recheck_interval_days(config.worker.recheck_interval_days)
            .with_batch_size(config.worker.recheck_batch_size)
            .with_cancellation(shutdown.clone());
        Arc::new(recheck).start().await;
    } else {
        info!("Idle recheck disabled by configuration");
    }

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    runtime.run(shutdown).await;
    Ok(())
}
