//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bazaar API",
        version = "0.1.0",
        description = "Marketplace backend: listings, moderation, users and notifications",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/listings", api = domain_listings::handlers::ApiDoc),
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api/categories", api = domain_categories::handlers::ApiDoc),
        (path = "/api/notifications", api = domain_notifications::ApiDoc),
        (path = "/api/dashboard", api = domain_dashboard::handlers::ApiDoc),
        (path = "/api/tasks", api = domain_tasks::handlers::ApiDoc)
    ),
    tags(
        (name = "Listings", description = "Listing search, CRUD and moderation"),
        (name = "Users", description = "Accounts, sessions and favorites"),
        (name = "Categories", description = "Category taxonomy"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Dashboard", description = "Admin statistics"),
        (name = "tasks", description = "Background task endpoints")
    )
)]
pub struct ApiDoc;
