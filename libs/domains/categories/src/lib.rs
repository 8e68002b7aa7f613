//! Categories Domain
//!
//! Two-level category taxonomy for the marketplace: main categories
//! (e.g. "digital equipment") and their sub categories (e.g. "cell phones").
//! Listings reference both levels by name, so lookups here are
//! case-insensitive exact matches.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_categories::{
//!     handlers,
//!     mongodb::MongoCategoryRepository,
//!     service::CategoryService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("mydb");
//!
//! let repository = MongoCategoryRepository::new(db);
//! let service = CategoryService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CategoryError, CategoryResult};
pub use handlers::ApiDoc;
pub use models::{CreateMainCategory, CreateSubCategory, MainCategory, SubCategory};
pub use mongodb::MongoCategoryRepository;
pub use repository::CategoryRepository;
pub use service::{CategoryLookup, CategoryService};
