//! Integration tests for the Users domain
//!
//! These tests run against real MongoDB via testcontainers to ensure:
//! - Unique indexes on username and email are enforced
//! - Favorite updates are idempotent
//! - The verification token lifecycle behaves as expected
//!
//! All tests are ignored by default since they need a Docker daemon:
//! `cargo test -p domain_users -- --ignored`

use domain_users::error::UserError;
use domain_users::models::User;
use domain_users::mongodb::MongoUserRepository;
use domain_users::repository::UserRepository;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

use chrono::{Duration, Utc};
use uuid::Uuid;

fn user(builder: &TestDataBuilder, suffix: &str) -> User {
    User::new(
        builder.name("user", suffix),
        format!("{}@example.com", builder.name("mail", suffix)),
        "argon2-hash-placeholder".to_string(),
    )
}

// ============================================================================
// Unique indexes
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_duplicate_email_is_rejected() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    MongoUserRepository::ensure_indexes(&db).await.unwrap();
    let repo = MongoUserRepository::new(&db);
    let builder = TestDataBuilder::from_test_name("duplicate_email");

    let first = user(&builder, "a");
    let mut second = user(&builder, "b");
    second.email = first.email.clone();

    repo.insert(first).await.unwrap();
    let result = repo.insert(second).await;
    assert!(matches!(result, Err(UserError::SignupDuplicate("email"))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_duplicate_username_is_rejected() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    MongoUserRepository::ensure_indexes(&db).await.unwrap();
    let repo = MongoUserRepository::new(&db);
    let builder = TestDataBuilder::from_test_name("duplicate_username");

    let first = user(&builder, "a");
    let mut second = user(&builder, "b");
    second.username = first.username.clone();

    repo.insert(first).await.unwrap();
    let result = repo.insert(second).await;
    assert!(matches!(
        result,
        Err(UserError::SignupDuplicate("username"))
    ));
}

// ============================================================================
// Favorites
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_add_favorite_is_idempotent() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let repo = MongoUserRepository::new(&db);
    let builder = TestDataBuilder::from_test_name("favorites");

    let created = repo.insert(user(&builder, "owner")).await.unwrap();
    let key = format!("{},estate", Uuid::now_v7());

    assert!(repo.add_favorite(created.id, &key).await.unwrap());
    assert!(repo.add_favorite(created.id, &key).await.unwrap());

    let stored = repo.find_by_id(created.id).await.unwrap();
    let stored = assert_some(stored, "user should exist");
    assert_eq!(stored.favorites, vec![key.clone()]);

    assert!(repo.remove_favorite(created.id, &key).await.unwrap());
    let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(stored.favorites.is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_add_favorite_unknown_user_matches_nothing() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let repo = MongoUserRepository::new(&db);

    assert!(!repo.add_favorite(Uuid::now_v7(), "key").await.unwrap());
}

// ============================================================================
// Verification lifecycle
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_verification_token_roundtrip() {
    let mongo = TestMongo::new().await;
    let db = mongo.database();
    let repo = MongoUserRepository::new(&db);
    let builder = TestDataBuilder::from_test_name("verification");

    let created = repo.insert(user(&builder, "pending")).await.unwrap();
    let token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::hours(24);

    assert!(
        repo.set_verification(created.id, &token, expires_at)
            .await
            .unwrap()
    );

    let found = repo.find_by_verification_token(&token).await.unwrap();
    let found = assert_some(found, "token should resolve the user");
    assert_uuid_eq(found.id, created.id, "verification user id");
    assert!(!found.is_verified);

    assert!(repo.mark_verified(created.id).await.unwrap());

    let verified = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert!(verified.is_verified);
    assert!(verified.verification_token.is_none());
    assert!(
        repo.find_by_verification_token(&token)
            .await
            .unwrap()
            .is_none()
    );
}
