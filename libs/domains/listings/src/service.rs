//! Listing service - business logic over the three-collection store.

use async_trait::async_trait;
use domain_categories::CategoryLookup;
use domain_notifications::registry::NotificationPush;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ListingError, ListingResult};
use crate::fanout::{self, Paginated, QUEUE_PAGE_SIZE, SortOrder};
use crate::models::{
    CellPhoneListing, ComputerListing, CreateCellPhone, CreateComputer, CreateEstate,
    EstateListing, Listing, ListingKind, MAIN_DIGITAL, MAIN_ESTATE, UpdateListing,
    parse_composite_key,
};
use crate::query::{SearchParams, Visibility};
use crate::repository::{ListingStore, ModerationState};

/// Deferred cleanup of remote image assets. Implementations are expected
/// to hand the work to the background task runner, not to delete inline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetCleanup: Send + Sync {
    async fn discard_image(&self, public_id: &str);
}

/// Listing service providing the core marketplace operations.
pub struct ListingService<S: ListingStore> {
    store: Arc<S>,
    categories: Arc<dyn CategoryLookup>,
    push: Arc<dyn NotificationPush>,
    assets: Arc<dyn AssetCleanup>,
}

impl<S: ListingStore> ListingService<S> {
    pub fn new(
        store: S,
        categories: Arc<dyn CategoryLookup>,
        push: Arc<dyn NotificationPush>,
        assets: Arc<dyn AssetCleanup>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            categories,
            push,
            assets,
        }
    }

    /// The listing's category binding is checked against the registry
    /// before anything is persisted; an unknown category is rejected,
    /// never auto-created.
    async fn require_main(&self, main: &str) -> ListingResult<()> {
        if self.categories.main_exists(main).await? {
            Ok(())
        } else {
            Err(ListingError::UnknownCategory(main.to_string()))
        }
    }

    async fn require_pair(&self, main: &str, sub: &str) -> ListingResult<()> {
        if self.categories.pair_exists(main, sub).await? {
            Ok(())
        } else {
            Err(ListingError::UnknownCategory(format!("{main}/{sub}")))
        }
    }

    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create_estate(&self, owner: Uuid, input: CreateEstate) -> ListingResult<Listing> {
        input
            .validate()
            .map_err(|e| ListingError::Validation(e.to_string()))?;
        self.require_main(MAIN_ESTATE).await?;

        let listing = Listing::Estate(EstateListing::new(owner, input));
        self.store.insert(&listing).await?;
        Ok(listing)
    }

    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create_cell_phone(
        &self,
        owner: Uuid,
        input: CreateCellPhone,
    ) -> ListingResult<Listing> {
        input
            .validate()
            .map_err(|e| ListingError::Validation(e.to_string()))?;
        self.require_pair(MAIN_DIGITAL, crate::models::SUB_CELL_PHONES)
            .await?;

        let listing = Listing::CellPhone(CellPhoneListing::new(owner, input));
        self.store.insert(&listing).await?;
        Ok(listing)
    }

    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create_computer(
        &self,
        owner: Uuid,
        input: CreateComputer,
    ) -> ListingResult<Listing> {
        input
            .validate()
            .map_err(|e| ListingError::Validation(e.to_string()))?;
        self.require_pair(MAIN_DIGITAL, crate::models::SUB_COMPUTERS)
            .await?;

        let listing = Listing::Computer(ComputerListing::new(owner, input));
        self.store.insert(&listing).await?;
        Ok(listing)
    }

    /// Public single-collection search; only approved listings are visible.
    #[instrument(skip(self, params))]
    pub async fn search(
        &self,
        kind: ListingKind,
        params: &SearchParams,
    ) -> ListingResult<Vec<Listing>> {
        self.store.search(kind, params, Visibility::Public).await
    }

    /// Resolve an opaque listing key: either `id,mainCategory[,subCategory]`
    /// (direct dispatch) or a bare id (probes all three collections).
    #[instrument(skip(self))]
    pub async fn resolve(&self, key: &str) -> ListingResult<Listing> {
        if let Some((id, kind)) = parse_composite_key(key) {
            return self
                .store
                .find_by_id(kind, id)
                .await?
                .ok_or(ListingError::NotFound);
        }

        let id = Uuid::parse_str(key.trim())
            .map_err(|_| ListingError::Validation(format!("Invalid listing key: {key}")))?;
        self.find_anywhere(id).await?.ok_or(ListingError::NotFound)
    }

    /// Probe all three collections for an id; at most one can match.
    async fn find_anywhere(&self, id: Uuid) -> ListingResult<Option<Listing>> {
        let (estate, phone, computer) = futures::try_join!(
            self.store.find_by_id(ListingKind::Estate, id),
            self.store.find_by_id(ListingKind::CellPhone, id),
            self.store.find_by_id(ListingKind::Computer, id),
        )?;
        Ok(estate.or(phone).or(computer))
    }

    /// Every non-deleted listing of the caller, merged across collections,
    /// newest first.
    #[instrument(skip(self))]
    pub async fn my_listings(&self, owner: Uuid) -> ListingResult<Vec<Listing>> {
        let (estates, phones, computers) = futures::try_join!(
            self.store.find_by_owner(ListingKind::Estate, owner),
            self.store.find_by_owner(ListingKind::CellPhone, owner),
            self.store.find_by_owner(ListingKind::Computer, owner),
        )?;
        Ok(fanout::merge_by_created_at(
            vec![estates, phones, computers],
            SortOrder::Descending,
        ))
    }

    /// Resolve a list of favorite keys; keys that no longer match a live
    /// listing are silently dropped.
    #[instrument(skip(self, keys))]
    pub async fn resolve_favorites(&self, keys: &[String]) -> ListingResult<Vec<Listing>> {
        let mut listings = Vec::with_capacity(keys.len());
        for key in keys {
            match self.resolve(key).await {
                Ok(listing) => listings.push(listing),
                Err(ListingError::NotFound | ListingError::Validation(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(listings)
    }

    /// Owner field update; the owner filter makes editing someone else's
    /// listing indistinguishable from a missing one.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        key: &str,
        owner: Uuid,
        update: UpdateListing,
    ) -> ListingResult<Listing> {
        update
            .validate()
            .map_err(|e| ListingError::Validation(e.to_string()))?;

        let (id, kind) = match parse_composite_key(key) {
            Some(resolved) => resolved,
            None => {
                let id = Uuid::parse_str(key.trim())
                    .map_err(|_| ListingError::Validation(format!("Invalid listing key: {key}")))?;
                let listing = self.find_anywhere(id).await?.ok_or(ListingError::NotFound)?;
                (id, listing.kind())
            }
        };

        self.store
            .update(kind, id, owner, &update)
            .await?
            .ok_or(ListingError::NotFound)
    }

    fn kind_from_request(
        main_category: &str,
        sub_category: Option<&str>,
    ) -> ListingResult<ListingKind> {
        ListingKind::from_categories(main_category, sub_category).ok_or_else(|| {
            ListingError::Validation(format!("Unknown category pair: {main_category}"))
        })
    }

    /// Admin approval. The state change and the notification commit
    /// atomically; the realtime push afterwards is best-effort.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        id: Uuid,
        main_category: &str,
        sub_category: Option<&str>,
    ) -> ListingResult<()> {
        let kind = Self::kind_from_request(main_category, sub_category)?;
        let notification = self.store.approve(kind, id).await?;
        if !self.push.push(&notification).await {
            tracing::debug!(user_id = %notification.user_id, "Recipient offline, notification persisted only");
        }
        Ok(())
    }

    /// Admin rejection; requires a non-empty reason.
    #[instrument(skip(self, reason))]
    pub async fn reject(
        &self,
        id: Uuid,
        main_category: &str,
        sub_category: Option<&str>,
        reason: &str,
    ) -> ListingResult<()> {
        if reason.trim().is_empty() {
            return Err(ListingError::Validation(
                "A rejection reason is required".to_string(),
            ));
        }
        let kind = Self::kind_from_request(main_category, sub_category)?;
        let notification = self.store.reject(kind, id, reason.trim()).await?;
        if !self.push.push(&notification).await {
            tracing::debug!(user_id = %notification.user_id, "Recipient offline, notification persisted only");
        }
        Ok(())
    }

    /// Soft-delete with audit record, then queue remote image cleanup.
    /// Non-admin callers can only delete their own listings.
    #[instrument(skip(self, reason))]
    pub async fn delete(
        &self,
        id: Uuid,
        main_category: &str,
        sub_category: Option<&str>,
        caller: Uuid,
        caller_is_admin: bool,
        reason: &str,
    ) -> ListingResult<()> {
        if reason.trim().is_empty() {
            return Err(ListingError::Validation(
                "A deletion reason is required".to_string(),
            ));
        }
        let kind = Self::kind_from_request(main_category, sub_category)?;
        let owner = (!caller_is_admin).then_some(caller);
        let deleted = self
            .store
            .soft_delete(kind, id, owner, caller, reason.trim())
            .await?;

        for url in deleted.image_urls() {
            self.assets.discard_image(url).await;
        }
        Ok(())
    }

    /// Admin moderation queue: pending oldest-first, decided queues
    /// newest-first.
    #[instrument(skip(self))]
    pub async fn moderation_queue(
        &self,
        state: ModerationState,
        page: u64,
        limit: Option<u64>,
    ) -> ListingResult<Paginated<Listing>> {
        let (estates, phones, computers) = futures::try_join!(
            self.store.find_by_state(ListingKind::Estate, state),
            self.store.find_by_state(ListingKind::CellPhone, state),
            self.store.find_by_state(ListingKind::Computer, state),
        )?;

        let order = match state {
            ModerationState::Pending => SortOrder::Ascending,
            ModerationState::Approved | ModerationState::Rejected => SortOrder::Descending,
        };
        let merged = fanout::merge_by_created_at(vec![estates, phones, computers], order);
        Ok(fanout::paginate(
            merged,
            page,
            limit.unwrap_or(QUEUE_PAGE_SIZE),
        ))
    }
}

impl<S: ListingStore> Clone for ListingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            categories: Arc::clone(&self.categories),
            push: Arc::clone(&self.push),
            assets: Arc::clone(&self.assets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use crate::repository::MockListingStore;
    use chrono::{Duration, Utc};
    use domain_categories::CategoryResult;
    use domain_notifications::models::Notification;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticCategories(bool);

    #[async_trait]
    impl CategoryLookup for StaticCategories {
        async fn main_exists(&self, _main: &str) -> CategoryResult<bool> {
            Ok(self.0)
        }

        async fn pair_exists(&self, _main: &str, _sub: &str) -> CategoryResult<bool> {
            Ok(self.0)
        }
    }

    struct CountingPush {
        delivered: AtomicUsize,
        online: bool,
    }

    impl CountingPush {
        fn new(online: bool) -> Arc<Self> {
            Arc::new(Self {
                delivered: AtomicUsize::new(0),
                online,
            })
        }
    }

    #[async_trait]
    impl NotificationPush for CountingPush {
        async fn push(&self, _notification: &Notification) -> bool {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            self.online
        }
    }

    fn service(
        store: MockListingStore,
        categories_exist: bool,
        push: Arc<CountingPush>,
        assets: MockAssetCleanup,
    ) -> ListingService<MockListingStore> {
        ListingService::new(
            store,
            Arc::new(StaticCategories(categories_exist)),
            push,
            Arc::new(assets),
        )
    }

    fn estate_input() -> CreateEstate {
        CreateEstate {
            name: "Cozy flat".into(),
            description: "Two rooms near the park".into(),
            address: "12 Main St".into(),
            regular_price: 1200.0,
            discount_price: None,
            offer: false,
            image_urls: vec!["img-1".into(), "img-2".into()],
            bedrooms: 2,
            bath: 1,
            furnished: true,
            parking: false,
            transaction_type: TransactionType::Rent,
        }
    }

    fn estate_listing(age_minutes: i64) -> Listing {
        let mut estate = EstateListing::new(Uuid::now_v7(), estate_input());
        estate.created_at = Utc::now() - Duration::minutes(age_minutes);
        Listing::Estate(estate)
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let mut store = MockListingStore::new();
        store.expect_insert().never();

        let service = service(store, false, CountingPush::new(false), MockAssetCleanup::new());
        let result = service.create_estate(Uuid::now_v7(), estate_input()).await;
        assert!(matches!(result, Err(ListingError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn test_approve_pushes_after_commit() {
        let owner = Uuid::now_v7();
        let mut store = MockListingStore::new();
        store.expect_approve().times(1).returning(move |_, _| {
            Ok(Notification::new(owner, "Listing Approved ✅", "approved"))
        });

        let push = CountingPush::new(true);
        let service = service(store, true, Arc::clone(&push), MockAssetCleanup::new());
        service
            .approve(Uuid::now_v7(), "digitalEquipment", Some("computer"))
            .await
            .unwrap();
        assert_eq!(push.delivered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let store = MockListingStore::new();
        let service = service(store, true, CountingPush::new(false), MockAssetCleanup::new());

        let result = service
            .reject(Uuid::now_v7(), "estate", None, "   ")
            .await;
        assert!(matches!(result, Err(ListingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_approve_rejects_unknown_category_pair() {
        let store = MockListingStore::new();
        let service = service(store, true, CountingPush::new(false), MockAssetCleanup::new());

        let result = service
            .approve(Uuid::now_v7(), "digitalEquipment", None)
            .await;
        assert!(matches!(result, Err(ListingError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_queues_image_cleanup() {
        let deleted = estate_listing(0);
        let mut store = MockListingStore::new();
        store
            .expect_soft_delete()
            .times(1)
            .returning(move |_, _, _, _, _| Ok(deleted.clone()));

        let mut assets = MockAssetCleanup::new();
        assets.expect_discard_image().times(2).return_const(());

        let service = service(store, true, CountingPush::new(false), assets);
        service
            .delete(Uuid::now_v7(), "estate", None, Uuid::now_v7(), true, "sold")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_owner_scope_on_delete() {
        let caller = Uuid::now_v7();
        let deleted = estate_listing(0);
        let mut store = MockListingStore::new();
        store
            .expect_soft_delete()
            .withf(move |_, _, owner, by, _| *owner == Some(caller) && *by == caller)
            .times(1)
            .returning(move |_, _, _, _, _| Ok(deleted.clone()));

        let mut assets = MockAssetCleanup::new();
        assets.expect_discard_image().return_const(());

        let service = service(store, true, CountingPush::new(false), assets);
        service
            .delete(Uuid::now_v7(), "estate", None, caller, false, "sold")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pending_queue_is_oldest_first() {
        let mut store = MockListingStore::new();
        store.expect_find_by_state().returning(|kind, _| {
            Ok(match kind {
                ListingKind::Estate => vec![estate_listing(10), estate_listing(30)],
                ListingKind::CellPhone => vec![estate_listing(20)],
                ListingKind::Computer => vec![],
            })
        });

        let service = service(store, true, CountingPush::new(false), MockAssetCleanup::new());
        let page = service
            .moderation_queue(ModerationState::Pending, 1, None)
            .await
            .unwrap();

        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 1);
        let ages: Vec<_> = page.items.iter().map(|l| l.created_at()).collect();
        assert!(ages.windows(2).all(|w| w[0] <= w[1]));
    }
}
