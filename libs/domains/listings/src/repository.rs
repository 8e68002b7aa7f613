use async_trait::async_trait;
use domain_notifications::models::Notification;
use uuid::Uuid;

use crate::error::ListingResult;
use crate::models::{Listing, ListingKind, UpdateListing};
use crate::query::{SearchParams, Visibility};

/// Moderation state of a listing; the three states are mutually
/// exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationState {
    Pending,
    Approved,
    Rejected,
}

/// Storage abstraction over the three listing collections.
///
/// Every method takes the target [`ListingKind`] explicitly; cross-collection
/// fan-out is composed on top of this trait by the service layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, listing: &Listing) -> ListingResult<()>;

    /// Filtered, sorted, DB-paginated search within one collection.
    async fn search(
        &self,
        kind: ListingKind,
        params: &SearchParams,
        visibility: Visibility,
    ) -> ListingResult<Vec<Listing>>;

    async fn find_by_id(&self, kind: ListingKind, id: Uuid) -> ListingResult<Option<Listing>>;

    /// All non-deleted listings of one owner in one collection.
    async fn find_by_owner(&self, kind: ListingKind, owner: Uuid) -> ListingResult<Vec<Listing>>;

    /// All non-deleted listings in one moderation state, unpaginated;
    /// queue pagination happens after the cross-collection merge.
    async fn find_by_state(
        &self,
        kind: ListingKind,
        state: ModerationState,
    ) -> ListingResult<Vec<Listing>>;

    /// Owner-scoped field update. Returns the updated listing, or `None`
    /// when no non-deleted listing matches id and owner.
    async fn update(
        &self,
        kind: ListingKind,
        id: Uuid,
        owner: Uuid,
        update: &UpdateListing,
    ) -> ListingResult<Option<Listing>>;

    /// Approve a listing that is not yet approved. The state change and
    /// the owner's notification are committed in one transaction; the
    /// persisted notification is returned for a post-commit push.
    async fn approve(&self, kind: ListingKind, id: Uuid) -> ListingResult<Notification>;

    /// Reject a listing that is not yet rejected, recording the reason.
    /// Same transactional shape as [`ListingStore::approve`].
    async fn reject(&self, kind: ListingKind, id: Uuid, reason: &str)
    -> ListingResult<Notification>;

    /// Soft-delete a listing and append its audit record in one
    /// transaction, returning the deleted listing. `owner` restricts the
    /// match to that owner's listings; `None` is the admin path.
    async fn soft_delete(
        &self,
        kind: ListingKind,
        id: Uuid,
        owner: Option<Uuid>,
        deleted_by: Uuid,
        reason: &str,
    ) -> ListingResult<Listing>;
}
