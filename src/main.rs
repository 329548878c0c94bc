use async_trait::async_trait;
use controlplane_bootstrap::{
    init_logging, BoxError, Logger, LoggingConfig, Orchestrator, ServerConfig, Service,
};
use serde_json::json;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Manager placeholder: holds the process open until asked to stop.
struct IdleManager {
    server: ServerConfig,
    logger: Logger,
}

#[async_trait]
impl Service for IdleManager {
    async fn start(&self, ctx: CancellationToken) -> Result<(), BoxError> {
        self.logger.info(
            "manager running",
            &[
                ("metricsBindAddress", json!(self.server.metrics_bind_address)),
                ("metricsEnabled", json!(self.server.metrics_enabled())),
                ("pprofBindAddress", json!(self.server.pprof_bind_address)),
            ],
        );
        ctx.cancelled().await;
        self.logger.info("shutdown requested", &[]);
        Ok(())
    }
}

/// Cancel `ctx` on Ctrl-C or, on unix, SIGTERM.
async fn cancel_on_signal(ctx: CancellationToken, logger: Logger) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                logger.error(&e, "failed to install SIGTERM handler", &[]);
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctx.cancel();
                }
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger.error(&e, "failed to listen for ctrl-c", &[]);
            return;
        }
    }
    logger.info("received termination signal", &[]);
    ctx.cancel();
}

#[tokio::main]
async fn main() -> ExitCode {
    // No logger exists yet, so bootstrap failures go straight to stderr.
    let config = match LoggingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to validate logging config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let logging = match init_logging(config) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let logger = logging.logger().with_name("setup");
    let server = ServerConfig::from_env();

    logger.info(
        "starting control plane",
        &[
            ("version", json!(env!("CARGO_PKG_VERSION"))),
            (
                "workers",
                json!(std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)),
            ),
        ],
    );

    let ctx = CancellationToken::new();
    tokio::spawn(cancel_on_signal(ctx.clone(), logger.clone()));

    let manager = IdleManager {
        server,
        logger: logging.logger().with_name("manager"),
    };

    // The orchestrator has already logged the failure.
    match Orchestrator::new(logging.logger()).run(ctx, manager).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
