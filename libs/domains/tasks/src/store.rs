//! Durable task storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    Collection, Database,
    bson::{Bson, doc, to_bson},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{COLLECTION, Task};

/// Queue operations split from execution so producers (HTTP handlers,
/// other domains) only see `enqueue`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn enqueue(&self, task: Task) -> TaskResult<Task>;

    /// Atomically claim the oldest due pending task, flipping it to
    /// running. Concurrent workers never claim the same task twice.
    async fn claim_due(&self, now: DateTime<Utc>) -> TaskResult<Option<Task>>;

    async fn complete(&self, id: Uuid) -> TaskResult<()>;

    /// Push a failed task back to pending with its next run time and the
    /// error recorded; attempts are unbounded.
    async fn retry(&self, id: Uuid, error: &str, next_run: DateTime<Utc>) -> TaskResult<()>;
}

/// MongoDB implementation of the TaskStore
pub struct MongoTaskStore {
    tasks: Collection<Task>,
}

impl MongoTaskStore {
    pub fn new(db: &Database) -> Self {
        Self {
            tasks: db.collection(COLLECTION),
        }
    }

    fn bson(value: &impl serde::Serialize) -> Bson {
        to_bson(value).unwrap_or(Bson::Null)
    }
}

#[async_trait]
impl TaskStore for MongoTaskStore {
    #[instrument(skip(self, task), fields(name = %task.name))]
    async fn enqueue(&self, task: Task) -> TaskResult<Task> {
        self.tasks.insert_one(&task).await?;
        tracing::info!(task_id = %task.id, "Task enqueued");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn claim_due(&self, now: DateTime<Utc>) -> TaskResult<Option<Task>> {
        let options = FindOneAndUpdateOptions::builder()
            .sort(doc! { "run_at": 1 })
            .return_document(ReturnDocument::After)
            .build();
        let task = self
            .tasks
            .find_one_and_update(
                doc! {
                    "status": "pending",
                    "run_at": { "$lte": Self::bson(&now) },
                },
                doc! { "$set": {
                    "status": "running",
                    "updated_at": Self::bson(&Utc::now()),
                }},
            )
            .with_options(options)
            .await?;
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn complete(&self, id: Uuid) -> TaskResult<()> {
        self.tasks
            .update_one(
                doc! { "_id": Self::bson(&id) },
                doc! { "$set": {
                    "status": "completed",
                    "updated_at": Self::bson(&Utc::now()),
                }},
            )
            .await?;
        Ok(())
    }

    #[instrument(skip(self, error))]
    async fn retry(&self, id: Uuid, error: &str, next_run: DateTime<Utc>) -> TaskResult<()> {
        self.tasks
            .update_one(
                doc! { "_id": Self::bson(&id) },
                doc! {
                    "$set": {
                        "status": "pending",
                        "run_at": Self::bson(&next_run),
                        "last_error": error,
                        "updated_at": Self::bson(&Utc::now()),
                    },
                    "$inc": { "attempts": 1 },
                },
            )
            .await?;
        Ok(())
    }
}
