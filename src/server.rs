//! Bot startup, background tasks and the monitoring HTTP server.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use watchbot_monitor::{HealthEndpoint, LogSink, MessageSink, MetricsRegistry, Scheduler};
use watchbot_telegram::{MonitorCommands, TelegramClient, UpdatePoller};

use crate::register::{build_components, load_config, watchbot_dir};

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.watchbot/logs/ with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = watchbot_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("watchbot")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the whole process
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Routes for `/health` and `/metrics`.
pub(crate) fn monitor_router(
    scheduler: Arc<Scheduler>,
    health: Arc<HealthEndpoint>,
    metrics: Arc<MetricsRegistry>,
) -> Router {
    Router::new()
        .route(
            "/health",
            get(move || {
                let health = health.clone();
                let scheduler = scheduler.clone();
                async move { health.handler(scheduler.last_snapshot().as_ref()) }
            }),
        )
        .route(
            "/metrics",
            get(move || {
                let metrics = metrics.clone();
                async move { metrics.handler() }
            }),
        )
}

/// Run the bot until Ctrl-C.
pub(crate) async fn run_bot(
    config_path: &Path,
    interval_override: Option<u64>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path, interval_override, !dry_run)?;

    info!("Starting watchbot v{}", env!("CARGO_PKG_VERSION"));

    let metrics = Arc::new(MetricsRegistry::new());

    let telegram = if dry_run {
        info!("Dry run: alerts go to the log and bot commands are disabled");
        None
    } else {
        let poll_timeout = Duration::from_secs(config.bot.poll_timeout_secs);
        Some(Arc::new(TelegramClient::new(
            config.bot.api_url.clone(),
            config.bot.token.clone(),
            poll_timeout,
        )?))
    };

    let sink: Arc<dyn MessageSink> = match telegram {
        Some(ref client) => client.clone(),
        None => Arc::new(LogSink),
    };

    let components = build_components(&config, sink, metrics.clone())?;
    let cancel = CancellationToken::new();

    let scheduler_task = components.scheduler.start();

    let poller_task = telegram.map(|client| {
        let mut commands =
            MonitorCommands::new(components.scheduler.clone(), components.reporter.clone());
        if let Some(ref info) = components.system_info {
            commands = commands.with_system_info(info.clone());
        }
        let poller = UpdatePoller::new(client, Arc::new(commands), config.bot.poll_timeout_secs);
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.run(cancel).await })
    });

    let server_task = if config.server.enabled {
        let app = monitor_router(
            components.scheduler.clone(),
            Arc::new(HealthEndpoint::new(env!("CARGO_PKG_VERSION"))),
            metrics.clone(),
        );
        let addr: std::net::SocketAddr =
            format!("{}:{}", config.server.host, config.server.port).parse()?;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Monitor endpoints on http://{} (/health, /metrics)", addr);

        let shutdown = cancel.clone();
        Some(tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(e) = result {
                error!("Monitor server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("watchbot ready, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    components.scheduler.stop();
    cancel.cancel();

    scheduler_task.await?;
    if let Some(task) = poller_task {
        task.await?;
    }
    if let Some(task) = server_task {
        task.await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use watchbot_monitor::{AlertPolicy, Notifier, StatusAggregator};

    fn scheduler() -> Arc<Scheduler> {
        let aggregator = StatusAggregator::new(Vec::new(), Duration::from_secs(1)).unwrap();
        Arc::new(Scheduler::new(
            Arc::new(aggregator),
            AlertPolicy::new(),
            Notifier::new(Arc::new(LogSink)),
            Vec::new(),
            Duration::from_secs(300),
        ))
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = monitor_router(
            scheduler(),
            Arc::new(HealthEndpoint::new("test")),
            Arc::new(MetricsRegistry::new()),
        );

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_route() {
        let metrics = Arc::new(MetricsRegistry::new());
        let scheduler = scheduler();
        let app = monitor_router(scheduler.clone(), Arc::new(HealthEndpoint::new("test")), metrics);

        let response = app
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; version=0.0.4; charset=utf-8"
        );
    }
}
