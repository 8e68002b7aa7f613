//! MongoDB implementation of ListingStore.
//!
//! Moderation operations (approve, reject, soft-delete) are multi-document
//! and run inside a client session transaction; everything else is a
//! single-document operation on one of the three typed collections.

use async_trait::async_trait;
use domain_notifications::models::{COLLECTION as NOTIFICATIONS, Notification};
use futures_util::TryStreamExt;
use mongodb::{
    Client, ClientSession, Collection, Database,
    bson::{Bson, Document, doc, to_bson},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ListingError, ListingResult};
use crate::models::{
    CellPhoneListing, ComputerListing, DELETIONS_COLLECTION, DeletionRecord, EstateListing,
    Listing, ListingKind, UpdateListing,
};
use crate::query::{SearchParams, Visibility};
use crate::repository::{ListingStore, ModerationState};

/// MongoDB-backed listing store over the three collections.
pub struct MongoListingStore {
    client: Client,
    estates: Collection<EstateListing>,
    cell_phones: Collection<CellPhoneListing>,
    computers: Collection<ComputerListing>,
    notifications: Collection<Notification>,
    deletions: Collection<DeletionRecord>,
}

impl MongoListingStore {
    pub fn new(client: Client, db: &Database) -> Self {
        Self {
            client,
            estates: db.collection(ListingKind::Estate.collection_name()),
            cell_phones: db.collection(ListingKind::CellPhone.collection_name()),
            computers: db.collection(ListingKind::Computer.collection_name()),
            notifications: db.collection(NOTIFICATIONS),
            deletions: db.collection(DELETIONS_COLLECTION),
        }
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    async fn collect<T, F>(
        collection: &Collection<T>,
        filter: Document,
        options: Option<FindOptions>,
        wrap: F,
    ) -> ListingResult<Vec<Listing>>
    where
        T: DeserializeOwned + Serialize + Send + Sync,
        F: Fn(T) -> Listing,
    {
        let cursor = match options {
            Some(options) => collection.find(filter).with_options(options).await?,
            None => collection.find(filter).await?,
        };
        let items: Vec<T> = cursor.try_collect().await?;
        Ok(items.into_iter().map(wrap).collect())
    }

    async fn find_all(
        &self,
        kind: ListingKind,
        filter: Document,
        options: Option<FindOptions>,
    ) -> ListingResult<Vec<Listing>> {
        match kind {
            ListingKind::Estate => {
                Self::collect(&self.estates, filter, options, Listing::Estate).await
            }
            ListingKind::CellPhone => {
                Self::collect(&self.cell_phones, filter, options, Listing::CellPhone).await
            }
            ListingKind::Computer => {
                Self::collect(&self.computers, filter, options, Listing::Computer).await
            }
        }
    }

    async fn find_one_and_update(
        &self,
        kind: ListingKind,
        filter: Document,
        update: Document,
        session: Option<&mut ClientSession>,
    ) -> ListingResult<Option<Listing>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let listing = match kind {
            ListingKind::Estate => {
                let action = self
                    .estates
                    .find_one_and_update(filter, update)
                    .with_options(options);
                match session {
                    Some(session) => action.session(session).await?,
                    None => action.await?,
                }
                .map(Listing::Estate)
            }
            ListingKind::CellPhone => {
                let action = self
                    .cell_phones
                    .find_one_and_update(filter, update)
                    .with_options(options);
                match session {
                    Some(session) => action.session(session).await?,
                    None => action.await?,
                }
                .map(Listing::CellPhone)
            }
            ListingKind::Computer => {
                let action = self
                    .computers
                    .find_one_and_update(filter, update)
                    .with_options(options);
                match session {
                    Some(session) => action.session(session).await?,
                    None => action.await?,
                }
                .map(Listing::Computer)
            }
        };
        Ok(listing)
    }

    /// State flip plus in-transaction notification write. The caller-built
    /// filter encodes the allowed source state; no match means the listing
    /// is absent, soft-deleted or already in the target state.
    async fn moderate(
        &self,
        kind: ListingKind,
        filter: Document,
        update: Document,
        note: impl Fn(&Listing) -> Notification,
    ) -> ListingResult<Notification> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;
        let outcome = self
            .moderate_in_session(&mut session, kind, filter, update, note)
            .await;
        match outcome {
            Ok(notification) => {
                session.commit_transaction().await?;
                Ok(notification)
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }

    async fn moderate_in_session(
        &self,
        session: &mut ClientSession,
        kind: ListingKind,
        filter: Document,
        update: Document,
        note: impl Fn(&Listing) -> Notification,
    ) -> ListingResult<Notification> {
        let listing = self
            .find_one_and_update(kind, filter, update, Some(session))
            .await?
            .ok_or(ListingError::NotFound)?;
        let notification = note(&listing);
        self.notifications
            .insert_one(&notification)
            .session(session)
            .await?;
        Ok(notification)
    }
}

#[async_trait]
impl ListingStore for MongoListingStore {
    #[instrument(skip(self, listing), fields(listing_id = %listing.id(), collection = listing.kind().collection_name()))]
    async fn insert(&self, listing: &Listing) -> ListingResult<()> {
        match listing {
            Listing::Estate(l) => self.estates.insert_one(l).await?,
            Listing::CellPhone(l) => self.cell_phones.insert_one(l).await?,
            Listing::Computer(l) => self.computers.insert_one(l).await?,
        };
        tracing::info!("Listing created");
        Ok(())
    }

    #[instrument(skip(self, params))]
    async fn search(
        &self,
        kind: ListingKind,
        params: &SearchParams,
        visibility: Visibility,
    ) -> ListingResult<Vec<Listing>> {
        let filter = match kind {
            ListingKind::Estate => params.estate_filter(visibility),
            ListingKind::CellPhone => params.cell_phone_filter(visibility),
            ListingKind::Computer => params.computer_filter(visibility),
        };
        let options = FindOptions::builder()
            .sort(params.sort_doc())
            .skip(params.skip())
            .limit(params.limit())
            .build();
        self.find_all(kind, filter, Some(options)).await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, kind: ListingKind, id: Uuid) -> ListingResult<Option<Listing>> {
        let mut filter = Self::id_filter(id);
        filter.insert("is_deleted", false);
        let listing = match kind {
            ListingKind::Estate => self.estates.find_one(filter).await?.map(Listing::Estate),
            ListingKind::CellPhone => self
                .cell_phones
                .find_one(filter)
                .await?
                .map(Listing::CellPhone),
            ListingKind::Computer => {
                self.computers.find_one(filter).await?.map(Listing::Computer)
            }
        };
        Ok(listing)
    }

    #[instrument(skip(self))]
    async fn find_by_owner(&self, kind: ListingKind, owner: Uuid) -> ListingResult<Vec<Listing>> {
        let filter = doc! {
            "user_ref": to_bson(&owner).unwrap_or(Bson::Null),
            "is_deleted": false,
        };
        self.find_all(kind, filter, None).await
    }

    #[instrument(skip(self))]
    async fn find_by_state(
        &self,
        kind: ListingKind,
        state: ModerationState,
    ) -> ListingResult<Vec<Listing>> {
        let mut filter = doc! { "is_deleted": false };
        match state {
            ModerationState::Pending => {
                filter.insert("is_approved", false);
                filter.insert("is_rejected", false);
            }
            ModerationState::Approved => {
                filter.insert("is_approved", true);
            }
            ModerationState::Rejected => {
                filter.insert("is_rejected", true);
            }
        }
        self.find_all(kind, filter, None).await
    }

    #[instrument(skip(self, update))]
    async fn update(
        &self,
        kind: ListingKind,
        id: Uuid,
        owner: Uuid,
        update: &UpdateListing,
    ) -> ListingResult<Option<Listing>> {
        let mut filter = Self::id_filter(id);
        filter.insert("user_ref", to_bson(&owner).unwrap_or(Bson::Null));
        filter.insert("is_deleted", false);

        let set = update_document(kind, update);
        self.find_one_and_update(kind, filter, doc! { "$set": set }, None)
            .await
    }

    #[instrument(skip(self))]
    async fn approve(&self, kind: ListingKind, id: Uuid) -> ListingResult<Notification> {
        let mut filter = Self::id_filter(id);
        filter.insert("is_deleted", false);
        filter.insert("is_approved", false);
        let update = doc! { "$set": {
            "is_approved": true,
            "is_rejected": false,
            "rejected_reason": Bson::Null,
            "updated_at": now_bson(),
        }};
        let notification = self
            .moderate(kind, filter, update, |listing| {
                Notification::new(
                    listing.user_ref(),
                    "Listing Approved ✅",
                    format!(
                        "Congratulations! Your listing \"{}\" has been approved and is now live.",
                        listing.name()
                    ),
                )
            })
            .await?;
        tracing::info!(%id, "Listing approved");
        Ok(notification)
    }

    #[instrument(skip(self, reason))]
    async fn reject(
        &self,
        kind: ListingKind,
        id: Uuid,
        reason: &str,
    ) -> ListingResult<Notification> {
        let mut filter = Self::id_filter(id);
        filter.insert("is_deleted", false);
        filter.insert("is_rejected", false);
        let update = doc! { "$set": {
            "is_approved": false,
            "is_rejected": true,
            "rejected_reason": reason,
            "updated_at": now_bson(),
        }};
        // The reason is not inlined in the message; the user reads it on
        // their listings page.
        let notification = self
            .moderate(kind, filter, update, |listing| {
                Notification::new(
                    listing.user_ref(),
                    "Listing Rejected",
                    format!(
                        "Your listing \"{}\" was rejected. Please check your listings page for the reason.",
                        listing.name()
                    ),
                )
            })
            .await?;
        tracing::info!(%id, "Listing rejected");
        Ok(notification)
    }

    #[instrument(skip(self, reason))]
    async fn soft_delete(
        &self,
        kind: ListingKind,
        id: Uuid,
        owner: Option<Uuid>,
        deleted_by: Uuid,
        reason: &str,
    ) -> ListingResult<Listing> {
        let mut filter = Self::id_filter(id);
        filter.insert("is_deleted", false);
        if let Some(owner) = owner {
            filter.insert("user_ref", to_bson(&owner).unwrap_or(Bson::Null));
        }
        let update = doc! { "$set": {
            "is_deleted": true,
            "updated_at": now_bson(),
        }};

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let outcome: ListingResult<Listing> = async {
            let listing = self
                .find_one_and_update(kind, filter, update, Some(&mut session))
                .await?
                .ok_or(ListingError::NotFound)?;
            let record = DeletionRecord::new(id, kind, deleted_by, reason.to_string());
            self.deletions
                .insert_one(&record)
                .session(&mut session)
                .await?;
            Ok(listing)
        }
        .await;

        match outcome {
            Ok(listing) => {
                session.commit_transaction().await?;
                tracing::info!(%id, "Listing soft-deleted");
                Ok(listing)
            }
            Err(err) => {
                let _ = session.abort_transaction().await;
                Err(err)
            }
        }
    }
}

fn now_bson() -> Bson {
    to_bson(&chrono::Utc::now()).unwrap_or(Bson::Null)
}

/// Build the `$set` document for an owner update, keeping only the fields
/// that exist on the target collection.
fn update_document(kind: ListingKind, update: &UpdateListing) -> Document {
    let mut set = doc! { "updated_at": now_bson() };

    if let Some(name) = &update.name {
        set.insert("name", name);
    }
    if let Some(description) = &update.description {
        set.insert("description", description);
    }
    if let Some(address) = &update.address {
        set.insert("address", address);
    }
    if let Some(price) = update.regular_price {
        set.insert("regular_price", price);
    }
    if let Some(price) = update.discount_price {
        set.insert("discount_price", price);
    }
    if let Some(offer) = update.offer {
        set.insert("offer", offer);
    }
    if let Some(urls) = &update.image_urls {
        set.insert("image_urls", urls.clone());
    }

    match kind {
        ListingKind::Estate => {
            if let Some(bedrooms) = update.bedrooms {
                set.insert("bedrooms", bedrooms);
            }
            if let Some(bath) = update.bath {
                set.insert("bath", bath);
            }
            if let Some(furnished) = update.furnished {
                set.insert("furnished", furnished);
            }
            if let Some(parking) = update.parking {
                set.insert("parking", parking);
            }
            if let Some(transaction_type) = update.transaction_type {
                set.insert("type", to_bson(&transaction_type).unwrap_or(Bson::Null));
            }
        }
        ListingKind::CellPhone => {
            if let Some(brand) = &update.brand {
                set.insert("brand", brand);
            }
            if let Some(model) = &update.model {
                set.insert("model", model);
            }
            if let Some(sim) = &update.sim {
                set.insert("sim", sim);
            }
            if let Some(storage) = &update.storage {
                set.insert("storage", storage);
            }
            if let Some(ram) = &update.ram {
                set.insert("ram", ram);
            }
            if let Some(color) = &update.color {
                set.insert("color", color);
            }
            if let Some(condition) = &update.condition {
                set.insert("condition", condition);
            }
        }
        ListingKind::Computer => {
            if let Some(brand) = &update.brand {
                set.insert("brand", brand);
            }
            if let Some(storage) = &update.storage {
                set.insert("storage", storage);
            }
            if let Some(ram) = &update.ram {
                set.insert("ram", ram);
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_document_keeps_collection_fields() {
        let update = UpdateListing {
            name: Some("New name".into()),
            bedrooms: Some(3),
            brand: Some("lenovo".into()),
            ..Default::default()
        };

        let estate = update_document(ListingKind::Estate, &update);
        assert_eq!(estate.get_str("name"), Ok("New name"));
        assert!(estate.contains_key("bedrooms"));
        assert!(!estate.contains_key("brand"));

        let computer = update_document(ListingKind::Computer, &update);
        assert_eq!(computer.get_str("brand"), Ok("lenovo"));
        assert!(!computer.contains_key("bedrooms"));
    }

    #[test]
    fn test_update_document_always_touches_updated_at() {
        let set = update_document(ListingKind::CellPhone, &UpdateListing::default());
        assert!(set.contains_key("updated_at"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_id_filter_uses_uuid_string() {
        let id = Uuid::now_v7();
        let filter = MongoListingStore::id_filter(id);
        assert_eq!(filter.get_str("_id"), Ok(id.to_string().as_str()));
    }
}
