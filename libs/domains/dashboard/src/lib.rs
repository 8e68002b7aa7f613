//! Admin dashboard: read-only statistics aggregated across the listing
//! collections, the deletion audit log and the user accounts.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod stats;

pub use error::{DashboardError, DashboardResult};
pub use models::{DashboardSummary, ListingStats};
pub use mongodb::MongoDashboardStore;
pub use repository::{DashboardStore, ModerationFilter};
pub use service::DashboardService;
