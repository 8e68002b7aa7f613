use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_listings::ListingKind;
use domain_users::models::Role;

use crate::error::DashboardResult;
use crate::models::ReasonCount;

/// Moderation slice of a listing collection. Soft-deleted listings are
/// always excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationFilter {
    All,
    Approved,
    Rejected,
    Pending,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn count_listings(
        &self,
        kind: ListingKind,
        filter: ModerationFilter,
    ) -> DashboardResult<u64>;

    /// Listings created in `[from, to)`.
    async fn count_created_between(
        &self,
        kind: ListingKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DashboardResult<u64>;

    /// Deletion audit counts grouped by reason, unordered.
    async fn deletion_reason_counts(&self) -> DashboardResult<Vec<ReasonCount>>;

    async fn count_users_with_role(&self, role: Role) -> DashboardResult<u64>;
}
