//! Listings domain: polymorphic marketplace listings over three
//! collections, with fan-out reads and a transactional moderation
//! workflow.
//!
//! A logical listing lives in exactly one of the `estates`, `cell_phones`
//! or `computers` collections, bound by its category pair at creation.
//! Category-agnostic reads fan out across all three and merge the results
//! in memory. Moderation decisions commit the state change together with
//! the owner's notification in one transaction, then push the
//! notification best-effort over the realtime channel.
//!
//! # Architecture
//!
//! - [`models`] - listing entities, DTOs, collection dispatch
//! - [`query`] - filter construction from request parameters
//! - [`fanout`] - cross-collection merge, sort and pagination
//! - [`repository`] - storage trait over the three collections
//! - [`mongodb`] - MongoDB implementation, including the transactions
//! - [`service`] - business logic and category validation
//! - [`handlers`] - HTTP endpoints and OpenAPI documentation

pub mod error;
pub mod fanout;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{ListingError, ListingResult};
pub use fanout::Paginated;
pub use models::{Listing, ListingKind};
pub use mongodb::MongoListingStore;
pub use repository::{ListingStore, ModerationState};
pub use service::{AssetCleanup, ListingService};
