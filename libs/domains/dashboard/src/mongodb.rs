use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_listings::ListingKind;
use domain_listings::models::DELETIONS_COLLECTION;
use domain_users::models::Role;
use futures_util::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Bson, Document, doc, to_bson};
use tracing::instrument;

use crate::error::{DashboardError, DashboardResult};
use crate::models::ReasonCount;
use crate::repository::{DashboardStore, ModerationFilter};

/// Read-only statistics over the listing, deletion and user collections.
pub struct MongoDashboardStore {
    db: Database,
}

impl MongoDashboardStore {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }

    fn listings(&self, kind: ListingKind) -> mongodb::Collection<Document> {
        self.db.collection(kind.collection_name())
    }

    fn moderation_filter(filter: ModerationFilter) -> Document {
        let mut doc = doc! { "is_deleted": false };
        match filter {
            ModerationFilter::All => {}
            ModerationFilter::Approved => {
                doc.insert("is_approved", true);
            }
            ModerationFilter::Rejected => {
                doc.insert("is_rejected", true);
            }
            ModerationFilter::Pending => {
                doc.insert("is_approved", false);
                doc.insert("is_rejected", false);
            }
        }
        doc
    }

    fn date_bson(at: DateTime<Utc>) -> Bson {
        to_bson(&at).unwrap_or(Bson::Null)
    }
}

#[async_trait]
impl DashboardStore for MongoDashboardStore {
    #[instrument(skip(self))]
    async fn count_listings(
        &self,
        kind: ListingKind,
        filter: ModerationFilter,
    ) -> DashboardResult<u64> {
        let count = self
            .listings(kind)
            .count_documents(Self::moderation_filter(filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn count_created_between(
        &self,
        kind: ListingKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DashboardResult<u64> {
        let filter = doc! {
            "is_deleted": false,
            "created_at": { "$gte": Self::date_bson(from), "$lt": Self::date_bson(to) },
        };
        let count = self.listings(kind).count_documents(filter).await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    async fn deletion_reason_counts(&self) -> DashboardResult<Vec<ReasonCount>> {
        let pipeline = vec![doc! {
            "$group": { "_id": "$reason", "count": { "$sum": 1 } }
        }];
        let cursor = self
            .db
            .collection::<Document>(DELETIONS_COLLECTION)
            .aggregate(pipeline)
            .await?;
        let groups: Vec<Document> = cursor.try_collect().await?;

        groups
            .into_iter()
            .map(|group| {
                let reason = group
                    .get_str("_id")
                    .map_err(|e| DashboardError::Malformed(e.to_string()))?
                    .to_string();
                let count = group
                    .get_i64("count")
                    .or_else(|_| group.get_i32("count").map(i64::from))
                    .map_err(|e| DashboardError::Malformed(e.to_string()))?;
                Ok(ReasonCount {
                    reason,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn count_users_with_role(&self, role: Role) -> DashboardResult<u64> {
        let count = self
            .db
            .collection::<Document>(domain_users::mongodb::COLLECTION)
            .count_documents(doc! { "role": role.as_str() })
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_filters_exclude_deleted() {
        let all = MongoDashboardStore::moderation_filter(ModerationFilter::All);
        assert_eq!(all, doc! { "is_deleted": false });

        let pending = MongoDashboardStore::moderation_filter(ModerationFilter::Pending);
        assert_eq!(pending.get_bool("is_approved"), Ok(false));
        assert_eq!(pending.get_bool("is_rejected"), Ok(false));
        assert_eq!(pending.get_bool("is_deleted"), Ok(false));
    }
}
