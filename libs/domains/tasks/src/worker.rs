//! Background worker: polls the queue, dispatches to registered handlers,
//! reschedules failures.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{TaskError, TaskResult};
use crate::models::Task;
use crate::store::TaskStore;

/// How often the worker looks for due tasks.
const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Fixed backoff before a failed task runs again.
const RETRY_DELAY_SECS: i64 = 60;

/// One named task implementation.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, payload: &serde_json::Value) -> TaskResult<()>;
}

/// Polling worker over a [`TaskStore`].
pub struct TaskWorker<S: TaskStore> {
    store: Arc<S>,
    handlers: HashMap<&'static str, Arc<dyn TaskHandler>>,
}

impl<S: TaskStore + 'static> TaskWorker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            handlers: HashMap::new(),
        }
    }

    pub fn register(mut self, handler: Arc<dyn TaskHandler>) -> Self {
        self.handlers.insert(handler.name(), handler);
        self
    }

    /// Claim and execute every currently-due task. Failures reschedule
    /// the task and never propagate; only claim errors (i.e. a lost
    /// database) surface to the caller.
    pub async fn drain_due(&self) -> TaskResult<usize> {
        let mut executed = 0;
        while let Some(task) = self.store.claim_due(Utc::now()).await? {
            self.execute(task).await?;
            executed += 1;
        }
        Ok(executed)
    }

    async fn execute(&self, task: Task) -> TaskResult<()> {
        let outcome = match self.handlers.get(task.name.as_str()) {
            Some(handler) => handler.run(&task.payload).await,
            None => Err(TaskError::UnknownTask(task.name.clone())),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(task_id = %task.id, name = %task.name, "Task completed");
                self.store.complete(task.id).await
            }
            Err(err) => {
                let next_run = Utc::now() + ChronoDuration::seconds(RETRY_DELAY_SECS);
                tracing::warn!(
                    task_id = %task.id,
                    name = %task.name,
                    attempts = task.attempts + 1,
                    error = %err,
                    "Task failed, rescheduled"
                );
                self.store.retry(task.id, &err.to_string(), next_run).await
            }
        }
    }

    /// Run the polling loop until the process shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(err) = self.drain_due().await {
                    tracing::error!(error = %err, "Task queue poll failed");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MockTaskStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyHandler {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TaskHandler for FlakyHandler {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn run(&self, _payload: &serde_json::Value) -> TaskResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(TaskError::Execution("boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn store_with_one_task(name: &str) -> MockTaskStore {
        let task = Task::new(name, json!({}));
        let mut queued = Some(task);
        let mut store = MockTaskStore::new();
        store
            .expect_claim_due()
            .returning(move |_| Ok(queued.take()));
        store
    }

    #[tokio::test]
    async fn test_successful_task_is_completed() {
        let mut store = store_with_one_task("flaky");
        store.expect_complete().times(1).returning(|_| Ok(()));

        let handler = Arc::new(FlakyHandler {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let worker = TaskWorker::new(Arc::new(store)).register(handler.clone());

        assert_eq!(worker.drain_due().await.unwrap(), 1);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_task_is_rescheduled_with_backoff() {
        let mut store = store_with_one_task("flaky");
        store
            .expect_retry()
            .withf(|_, error, next_run| {
                let delay = (*next_run - Utc::now()).num_seconds();
                error.contains("boom") && (55..=65).contains(&delay)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let worker = TaskWorker::new(Arc::new(store)).register(Arc::new(FlakyHandler {
            calls: AtomicUsize::new(0),
            fail: true,
        }));

        assert_eq!(worker.drain_due().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_task_is_rescheduled() {
        let mut store = store_with_one_task("nobody-home");
        store.expect_retry().times(1).returning(|_, _, _| Ok(()));

        let worker = TaskWorker::new(Arc::new(store));
        assert_eq!(worker.drain_due().await.unwrap(), 1);
    }
}
