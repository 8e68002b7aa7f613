use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::{
    AdminUser,
    errors::responses::{ForbiddenResponse, InternalServerErrorResponse, UnauthorizedResponse},
};
use utoipa::OpenApi;

use crate::error::DashboardResult;
use crate::models::{
    CollectionTotals, DashboardSummary, ListingStats, MonthlyCount, ReasonCount, RoleCounts,
    TodayCounts,
};
use crate::repository::DashboardStore;
use crate::service::DashboardService;

/// OpenAPI documentation for the Dashboard API
#[derive(OpenApi)]
#[openapi(
    paths(get_summary, get_listing_stats),
    components(
        schemas(
            DashboardSummary,
            ListingStats,
            CollectionTotals,
            MonthlyCount,
            ReasonCount,
            RoleCounts,
            TodayCounts
        ),
        responses(UnauthorizedResponse, ForbiddenResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Dashboard", description = "Admin statistics endpoints")
    )
)]
pub struct ApiDoc;

/// Create the dashboard router (all routes admin-only)
pub fn router<S: DashboardStore + 'static>(service: DashboardService<S>) -> Router {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/listing-stats", get(get_listing_stats))
        .with_state(Arc::new(service))
}

/// Cross-collection dashboard summary
#[utoipa::path(
    get,
    path = "/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_summary<S: DashboardStore>(
    _admin: AdminUser,
    State(service): State<Arc<DashboardService<S>>>,
) -> DashboardResult<Json<DashboardSummary>> {
    Ok(Json(service.summary().await?))
}

/// Moderation and role counts
#[utoipa::path(
    get,
    path = "/listing-stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Listing statistics", body = ListingStats),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn get_listing_stats<S: DashboardStore>(
    _admin: AdminUser,
    State(service): State<Arc<DashboardService<S>>>,
) -> DashboardResult<Json<ListingStats>> {
    Ok(Json(service.listing_stats().await?))
}
