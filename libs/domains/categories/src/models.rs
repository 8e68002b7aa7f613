use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Top-level category entity (stored in the `main_categories` collection)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MainCategory {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Category name, unique case-insensitively
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Second-level category entity (stored in the `sub_categories` collection)
///
/// Linked to its parent by name, matching how listings store their
/// `main_category` / `sub_category` pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubCategory {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Sub category name, unique case-insensitively within its parent
    pub name: String,
    /// Parent main category name
    pub main_category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a main category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMainCategory {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
}

/// DTO for creating a sub category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubCategory {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 2, max = 100))]
    pub main_category: String,
}

impl MainCategory {
    pub fn new(input: CreateMainCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            created_at: now,
            updated_at: now,
        }
    }
}

impl SubCategory {
    /// `main_category` is the parent's canonical (stored) name, resolved
    /// by the service so casing stays consistent across documents.
    pub fn new(name: String, main_category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            main_category,
            created_at: now,
            updated_at: now,
        }
    }
}
