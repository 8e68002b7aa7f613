//! Integration tests for the Listings domain
//!
//! These tests exercise real multi-document transactions, which is why
//! the test container runs a single-node replica set:
//! - Approval flips the flags and writes the notification atomically
//! - A second approval of the same listing observes no pending document
//! - Soft-delete hides the listing and appends its audit record
//!
//! All tests are ignored by default since they need a Docker daemon:
//! `cargo test -p domain_listings -- --ignored`

use domain_listings::models::{
    CreateEstate, DELETIONS_COLLECTION, DeletionRecord, EstateListing, Listing, TransactionType,
    UpdateListing,
};
use domain_listings::{ListingError, ListingKind, ListingStore, MongoListingStore};
use domain_notifications::models::{COLLECTION as NOTIFICATIONS, Notification};
use test_utils::{TestDataBuilder, TestMongo};

use mongodb::bson::doc;
use uuid::Uuid;

fn estate(builder: &TestDataBuilder, suffix: &str) -> Listing {
    Listing::Estate(EstateListing::new(
        builder.user_id(),
        CreateEstate {
            name: builder.name("estate", suffix),
            description: "Two rooms, close to the river".to_string(),
            address: "12 Quay Street".to_string(),
            regular_price: 1200.0,
            discount_price: None,
            offer: false,
            image_urls: vec!["https://assets.example/estate.jpg".to_string()],
            bedrooms: 2,
            bath: 1,
            furnished: true,
            parking: false,
            transaction_type: TransactionType::Rent,
        },
    ))
}

// ============================================================================
// Moderation transaction
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_approve_commits_listing_and_notification_together() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("approve");

    let listing = estate(&builder, "pending");
    let id = listing.id();
    let owner = listing.user_ref();
    store.insert(&listing).await.unwrap();

    let notification = store.approve(ListingKind::Estate, id).await.unwrap();
    assert_eq!(notification.user_id, owner);

    let approved = store
        .find_by_id(ListingKind::Estate, id)
        .await
        .unwrap()
        .unwrap();
    let Listing::Estate(approved) = approved else {
        panic!("expected an estate listing");
    };
    assert!(approved.is_approved);
    assert!(!approved.is_rejected);

    let stored_notifications = db
        .collection::<Notification>(NOTIFICATIONS)
        .count_documents(doc! {})
        .await
        .unwrap();
    assert_eq!(stored_notifications, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_second_approve_sees_no_pending_listing() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("double_approve");

    let listing = estate(&builder, "raced");
    let id = listing.id();
    store.insert(&listing).await.unwrap();

    store.approve(ListingKind::Estate, id).await.unwrap();
    let second = store.approve(ListingKind::Estate, id).await;
    assert!(matches!(second, Err(ListingError::NotFound)));

    // The losing attempt must not leave a second notification behind
    let stored_notifications = db
        .collection::<Notification>(NOTIFICATIONS)
        .count_documents(doc! {})
        .await
        .unwrap();
    assert_eq!(stored_notifications, 1);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_reject_records_reason() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("reject");

    let listing = estate(&builder, "flagged");
    let id = listing.id();
    store.insert(&listing).await.unwrap();

    store
        .reject(ListingKind::Estate, id, "blurred photos")
        .await
        .unwrap();

    let rejected = store
        .find_by_id(ListingKind::Estate, id)
        .await
        .unwrap()
        .unwrap();
    let Listing::Estate(rejected) = rejected else {
        panic!("expected an estate listing");
    };
    assert!(rejected.is_rejected);
    assert_eq!(rejected.rejected_reason.as_deref(), Some("blurred photos"));
}

// ============================================================================
// Soft delete
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_soft_delete_hides_listing_and_writes_audit_record() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("soft_delete");

    let listing = estate(&builder, "sold");
    let id = listing.id();
    let owner = listing.user_ref();
    store.insert(&listing).await.unwrap();

    let deleted = store
        .soft_delete(ListingKind::Estate, id, Some(owner), owner, "sold")
        .await
        .unwrap();
    assert_eq!(deleted.id(), id);

    assert!(
        store
            .find_by_id(ListingKind::Estate, id)
            .await
            .unwrap()
            .is_none()
    );

    let record = db
        .collection::<DeletionRecord>(DELETIONS_COLLECTION)
        .find_one(doc! { "reason": "sold" })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.product_id, id);
    assert_eq!(record.collection_name, "estates");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_soft_delete_respects_owner_scope() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("owner_scope");

    let listing = estate(&builder, "guarded");
    let id = listing.id();
    store.insert(&listing).await.unwrap();

    let stranger = Uuid::now_v7();
    let result = store
        .soft_delete(ListingKind::Estate, id, Some(stranger), stranger, "mine now")
        .await;
    assert!(matches!(result, Err(ListingError::NotFound)));

    assert!(
        store
            .find_by_id(ListingKind::Estate, id)
            .await
            .unwrap()
            .is_some()
    );
}

// ============================================================================
// Owner updates
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_is_owner_scoped() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let store = MongoListingStore::new(mongo.client.clone(), &db);
    let builder = TestDataBuilder::from_test_name("update");

    let listing = estate(&builder, "editable");
    let id = listing.id();
    let owner = listing.user_ref();
    store.insert(&listing).await.unwrap();

    let changes = UpdateListing {
        name: Some("Renovated flat".to_string()),
        ..Default::default()
    };

    let by_stranger = store
        .update(ListingKind::Estate, id, Uuid::now_v7(), &changes)
        .await
        .unwrap();
    assert!(by_stranger.is_none());

    let by_owner = store
        .update(ListingKind::Estate, id, owner, &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_owner.name(), "Renovated flat");
}
