//! Supervision of the one long-running service of the process.
//!
//! [`Orchestrator::run`] spawns the service, spawns a watcher that waits for
//! the service task to finish, and resolves on whichever arrives first: an
//! error reported by the service or the watcher's completion signal. The
//! race is biased toward the error so a failure that was already reported
//! is never masked by the completion that follows it.
//!
//! The context is advisory. The orchestrator never cancels it, never
//! enforces a timeout and never aborts the service; it only observes.

use crate::error::{BoxError, Error, ServiceError};
use crate::logger::Logger;
use async_trait::async_trait;
use serde_json::json;
use std::any::Any;
use std::future::Future;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

/// A long-running unit of work, run until done, failed or cancelled.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    /// Run until completion. `ctx` is cancelled when the process is asked to
    /// stop; honoring it is up to the service.
    async fn start(&self, ctx: CancellationToken) -> Result<(), BoxError>;
}

#[async_trait]
impl<F, Fut> Service for F
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    async fn start(&self, ctx: CancellationToken) -> Result<(), BoxError> {
        (self)(ctx).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    NotStarted,
    Running,
    Completed,
    Failed,
}

impl LifecycleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Completed | LifecycleState::Failed)
    }
}

/// Terminal result of a supervised service.
#[derive(Debug)]
pub enum ServiceOutcome {
    Completed,
    Failed(ServiceError),
}

impl ServiceOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ServiceOutcome::Completed)
    }

    pub fn state(&self) -> LifecycleState {
        match self {
            ServiceOutcome::Completed => LifecycleState::Completed,
            ServiceOutcome::Failed(_) => LifecycleState::Failed,
        }
    }

    pub fn into_result(self) -> Result<(), Error> {
        match self {
            ServiceOutcome::Completed => Ok(()),
            ServiceOutcome::Failed(err) => Err(Error::Service(err)),
        }
    }
}

/// Runs exactly one [`Service`] and resolves to its terminal outcome.
///
/// Single use: `run` consumes the orchestrator. Subscribe before running to
/// observe `NotStarted → Running → Completed | Failed`.
pub struct Orchestrator {
    logger: Logger,
    state: watch::Sender<LifecycleState>,
}

impl Orchestrator {
    pub fn new(logger: &Logger) -> Self {
        let (state, _) = watch::channel(LifecycleState::NotStarted);
        Self {
            logger: logger.with_name("lifecycle"),
            state,
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Run `service` and return `Ok(())` if it completed, or the
    /// [`Error::Service`] wrapping its failure.
    pub async fn run<S: Service>(self, ctx: CancellationToken, service: S) -> Result<(), Error> {
        self.run_to_outcome(ctx, service).await.into_result()
    }

    pub async fn run_to_outcome<S: Service>(self, ctx: CancellationToken, service: S) -> ServiceOutcome {
        let (err_tx, mut err_rx) = mpsc::channel::<ServiceError>(1);
        let (done_tx, done_rx) = oneshot::channel::<Result<(), JoinError>>();

        self.state.send_replace(LifecycleState::Running);
        self.logger.info("service started", &[]);

        let task = tokio::spawn(async move {
            if let Err(e) = service.start(ctx).await {
                // Capacity 1 and a single sender: never waits.
                let _ = err_tx.send(ServiceError::Failed(e)).await;
            }
        });

        let watcher = tokio::spawn(async move {
            let _ = done_tx.send(task.await);
        });

        let outcome = tokio::select! {
            biased;
            Some(err) = err_rx.recv() => ServiceOutcome::Failed(err),
            done = done_rx => match done {
                Ok(Ok(())) => ServiceOutcome::Completed,
                Ok(Err(join_err)) => ServiceOutcome::Failed(ServiceError::Panicked(join_message(join_err))),
                Err(_) => ServiceOutcome::Failed(ServiceError::Panicked(
                    "completion watcher exited without reporting".to_string(),
                )),
            },
        };

        // Either branch means the service task has returned, so this join
        // is immediate and nothing spawned here outlives `run`.
        let _ = watcher.await;

        match &outcome {
            ServiceOutcome::Completed => self.logger.info("service completed", &[]),
            ServiceOutcome::Failed(err) => {
                self.logger
                    .error(err, "service terminated", &[("outcome", json!("failed"))])
            }
        }
        self.state.send_replace(outcome.state());
        outcome
    }
}

fn join_message(err: JoinError) -> String {
    if err.is_panic() {
        panic_message(err.into_panic())
    } else {
        err.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
