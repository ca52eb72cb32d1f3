use std::fmt::Display;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, warn, Instrument};

/// Writes dispatched by a computation that must neither block nor fail it.
///
/// Each task runs on the Tokio runtime as soon as it is spawned and logs its
/// own failure. The owner decides explicitly whether to wait for them
/// (`settle`) or let them finish in the background (`detach`).
#[must_use = "side effects are already running; call `detach` or `settle`"]
#[derive(Debug)]
pub struct SideEffects {
    seller_id: String,
    tasks: Vec<(&'static str, JoinHandle<bool>)>,
}

/// Outcome counts once every task has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettledEffects {
    pub succeeded: usize,
    pub failed: usize,
}

impl SideEffects {
    pub fn new(seller_id: &str) -> Self {
        Self {
            seller_id: seller_id.to_string(),
            tasks: Vec::new(),
        }
    }

    /// Spawn a best-effort task. Its error is logged and dropped.
    pub fn spawn<F, E>(&mut self, label: &'static str, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let seller_id = self.seller_id.clone();
        let handle = tokio::spawn(
            async move {
                match task.await {
                    Ok(()) => {
                        debug!(task = label, seller_id = %seller_id, "Side effect completed");
                        true
                    }
                    Err(e) => {
                        warn!(task = label, seller_id = %seller_id, error = %e, "Side effect failed, ignoring");
                        false
                    }
                }
            }
            .instrument(tracing::Span::current()),
        );

        self.tasks.push((label, handle));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Let the tasks run to completion without waiting for them
    pub fn detach(self) {
        debug!(seller_id = %self.seller_id, pending = self.tasks.len(), "Detaching side effects");
    }

    /// Wait for every task. A panicked task counts as failed.
    pub async fn settle(self) -> SettledEffects {
        let mut settled = SettledEffects::default();

        for (label, handle) in self.tasks {
            match handle.await {
                Ok(true) => settled.succeeded += 1,
                Ok(false) => settled.failed += 1,
                Err(e) => {
                    warn!(task = label, seller_id = %self.seller_id, error = %e, "Side effect task aborted");
                    settled.failed += 1;
                }
            }
        }

        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let mut effects = SideEffects::new("seller-1");
        effects.spawn("ok", async { Ok::<(), String>(()) });
        effects.spawn("fails", async { Err::<(), String>("disk full".to_string()) });

        assert_eq!(effects.len(), 2);

        let settled = effects.settle().await;
        assert_eq!(settled, SettledEffects { succeeded: 1, failed: 1 });
    }

    #[tokio::test]
    async fn test_detached_tasks_still_run() {
        let (tx, rx) = tokio::sync::oneshot::channel();

        let mut effects = SideEffects::new("seller-1");
        effects.spawn("signal", async move {
            tx.send(()).map_err(|_| "receiver dropped".to_string())
        });
        effects.detach();

        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_empty() {
        let effects = SideEffects::new("seller-1");
        assert!(effects.is_empty());
        assert_eq!(effects.settle().await, SettledEffects::default());
    }
}
