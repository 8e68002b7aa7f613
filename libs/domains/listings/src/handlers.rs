use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AdminUser, AppError, AuthUser,
    auth::ADMIN_ROLE,
    errors::responses::{
        BadRequestResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::fanout::Paginated;
use crate::models::{
    CellPhoneListing, ComputerListing, CreateCellPhone, CreateComputer, CreateEstate,
    EstateListing, Listing, ListingKind, TransactionType, UpdateListing,
};
use crate::query::SearchParams;
use crate::repository::{ListingStore, ModerationState};
use crate::service::ListingService;

/// OpenAPI documentation for the Listings API
#[derive(OpenApi)]
#[openapi(
    paths(
        search_estates,
        search_cell_phones,
        search_computers,
        get_listing,
        create_estate,
        create_cell_phone,
        create_computer,
        my_listings,
        resolve_favorites,
        update_listing,
        delete_listing,
        pending_queue,
        approved_queue,
        rejected_queue,
        approve_listing,
        reject_listing,
    ),
    components(
        schemas(
            EstateListing,
            CellPhoneListing,
            ComputerListing,
            Listing,
            TransactionType,
            CreateEstate,
            CreateCellPhone,
            CreateComputer,
            UpdateListing,
            Paginated<Listing>,
            FavoriteKeys,
            ModerationRequest,
            RejectRequest,
            DeleteRequest,
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Listings", description = "Marketplace listing endpoints"),
        (name = "Moderation", description = "Admin moderation endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Deserialize, ToSchema)]
pub struct FavoriteKeys {
    pub keys: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ModerationRequest {
    pub id: Uuid,
    pub main_category: String,
    pub sub_category: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectRequest {
    pub id: Uuid,
    pub main_category: String,
    pub sub_category: Option<String>,
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DeleteRequest {
    pub main_category: String,
    pub sub_category: Option<String>,
    pub reason: String,
}

#[derive(Default, Deserialize, utoipa::IntoParams)]
#[serde(default)]
pub struct QueuePage {
    pub page: u64,
    pub limit: Option<u64>,
}

/// Create the listings router.
///
/// Public search routes tolerate anonymous callers; everything else reads
/// the caller from the JWT claims, so the optional-auth middleware must
/// run in front of this router.
pub fn router<S: ListingStore + 'static>(service: ListingService<S>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/estates", get(search_estates).post(create_estate))
        .route(
            "/cell-phones",
            get(search_cell_phones).post(create_cell_phone),
        )
        .route("/computers", get(search_computers).post(create_computer))
        .route(
            "/item/{key}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/mine", get(my_listings))
        .route("/favorites", post(resolve_favorites))
        .route("/moderation/pending", get(pending_queue))
        .route("/moderation/approved", get(approved_queue))
        .route("/moderation/rejected", get(rejected_queue))
        .route("/moderation/approve", post(approve_listing))
        .route("/moderation/reject", post(reject_listing))
        .with_state(shared_service)
}

fn parse_user_id(sub: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(sub).map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

/// The id component of a listing key, which is either a bare id or the
/// composite `id,mainCategory[,subCategory]` form.
fn parse_key_id(key: &str) -> Result<Uuid, AppError> {
    let id = key.split(',').next().unwrap_or(key).trim();
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest(format!("Invalid listing key: {key}")))
}

/// Search estate listings
#[utoipa::path(
    get,
    path = "/estates",
    tag = "Listings",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching estate listings", body = Vec<EstateListing>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_estates<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    Query(params): Query<SearchParams>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Listing>>, AppError> {
    let params = params.with_indexed_facets(raw.as_deref());
    Ok(Json(service.search(ListingKind::Estate, &params).await?))
}

/// Search phone and tablet listings
#[utoipa::path(
    get,
    path = "/cell-phones",
    tag = "Listings",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching phone listings", body = Vec<CellPhoneListing>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_cell_phones<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    Query(params): Query<SearchParams>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Listing>>, AppError> {
    let params = params.with_indexed_facets(raw.as_deref());
    Ok(Json(service.search(ListingKind::CellPhone, &params).await?))
}

/// Search computer listings
#[utoipa::path(
    get,
    path = "/computers",
    tag = "Listings",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching computer listings", body = Vec<ComputerListing>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_computers<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    Query(params): Query<SearchParams>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Vec<Listing>>, AppError> {
    let params = params.with_indexed_facets(raw.as_deref());
    Ok(Json(service.search(ListingKind::Computer, &params).await?))
}

/// Fetch one listing by key (`id` or `id,mainCategory[,subCategory]`)
#[utoipa::path(
    get,
    path = "/item/{key}",
    tag = "Listings",
    params(("key" = String, Path, description = "Listing id or composite key")),
    responses(
        (status = 200, description = "The listing", body = Listing),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_listing<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    Path(key): Path<String>,
) -> Result<Json<Listing>, AppError> {
    Ok(Json(service.resolve(&key).await?))
}

/// Create an estate listing
#[utoipa::path(
    post,
    path = "/estates",
    tag = "Listings",
    request_body = CreateEstate,
    responses(
        (status = 201, description = "Listing created, pending moderation", body = EstateListing),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn create_estate<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<CreateEstate>,
) -> Result<impl IntoResponse, AppError> {
    let owner = parse_user_id(&claims.sub)?;
    let listing = service.create_estate(owner, input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Create a phone/tablet listing
#[utoipa::path(
    post,
    path = "/cell-phones",
    tag = "Listings",
    request_body = CreateCellPhone,
    responses(
        (status = 201, description = "Listing created, pending moderation", body = CellPhoneListing),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn create_cell_phone<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<CreateCellPhone>,
) -> Result<impl IntoResponse, AppError> {
    let owner = parse_user_id(&claims.sub)?;
    let listing = service.create_cell_phone(owner, input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Create a computer listing
#[utoipa::path(
    post,
    path = "/computers",
    tag = "Listings",
    request_body = CreateComputer,
    responses(
        (status = 201, description = "Listing created, pending moderation", body = ComputerListing),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn create_computer<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<CreateComputer>,
) -> Result<impl IntoResponse, AppError> {
    let owner = parse_user_id(&claims.sub)?;
    let listing = service.create_computer(owner, input).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// List the caller's own listings across all collections, newest first
#[utoipa::path(
    get,
    path = "/mine",
    tag = "Listings",
    responses(
        (status = 200, description = "The caller's listings", body = Vec<Listing>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn my_listings<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<Vec<Listing>>, AppError> {
    let owner = parse_user_id(&claims.sub)?;
    Ok(Json(service.my_listings(owner).await?))
}

/// Resolve a set of favorite listing keys to live listings
#[utoipa::path(
    post,
    path = "/favorites",
    tag = "Listings",
    request_body = FavoriteKeys,
    responses(
        (status = 200, description = "The still-available favorites", body = Vec<Listing>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn resolve_favorites<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(_claims): AuthUser,
    Json(input): Json<FavoriteKeys>,
) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(service.resolve_favorites(&input.keys).await?))
}

/// Update the caller's own listing
#[utoipa::path(
    put,
    path = "/item/{key}",
    tag = "Listings",
    params(("key" = String, Path, description = "Listing id or composite key")),
    request_body = UpdateListing,
    responses(
        (status = 200, description = "Updated listing", body = Listing),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn update_listing<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
    Path(key): Path<String>,
    Json(update): Json<UpdateListing>,
) -> Result<Json<Listing>, AppError> {
    let owner = parse_user_id(&claims.sub)?;
    Ok(Json(service.update(&key, owner, update).await?))
}

/// Soft-delete a listing with an audit record.
///
/// Owners can delete their own listings; admins can delete any.
#[utoipa::path(
    delete,
    path = "/item/{key}",
    tag = "Listings",
    params(("key" = String, Path, description = "Listing id or composite key")),
    request_body = DeleteRequest,
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn delete_listing<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AuthUser(claims): AuthUser,
    Path(key): Path<String>,
    Json(input): Json<DeleteRequest>,
) -> Result<StatusCode, AppError> {
    let caller = parse_user_id(&claims.sub)?;
    let id = parse_key_id(&key)?;
    service
        .delete(
            id,
            &input.main_category,
            input.sub_category.as_deref(),
            caller,
            claims.role == ADMIN_ROLE,
            &input.reason,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pending moderation queue, oldest first
#[utoipa::path(
    get,
    path = "/moderation/pending",
    tag = "Moderation",
    params(QueuePage),
    responses(
        (status = 200, description = "Pending listings", body = Paginated<Listing>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn pending_queue<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AdminUser(_claims): AdminUser,
    Query(page): Query<QueuePage>,
) -> Result<Json<Paginated<Listing>>, AppError> {
    let queue = service
        .moderation_queue(ModerationState::Pending, page.page.max(1), page.limit)
        .await?;
    Ok(Json(queue))
}

/// Approved listings, newest first
#[utoipa::path(
    get,
    path = "/moderation/approved",
    tag = "Moderation",
    params(QueuePage),
    responses(
        (status = 200, description = "Approved listings", body = Paginated<Listing>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn approved_queue<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AdminUser(_claims): AdminUser,
    Query(page): Query<QueuePage>,
) -> Result<Json<Paginated<Listing>>, AppError> {
    let queue = service
        .moderation_queue(ModerationState::Approved, page.page.max(1), page.limit)
        .await?;
    Ok(Json(queue))
}

/// Rejected listings, newest first
#[utoipa::path(
    get,
    path = "/moderation/rejected",
    tag = "Moderation",
    params(QueuePage),
    responses(
        (status = 200, description = "Rejected listings", body = Paginated<Listing>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn rejected_queue<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AdminUser(_claims): AdminUser,
    Query(page): Query<QueuePage>,
) -> Result<Json<Paginated<Listing>>, AppError> {
    let queue = service
        .moderation_queue(ModerationState::Rejected, page.page.max(1), page.limit)
        .await?;
    Ok(Json(queue))
}

/// Approve a listing and notify its owner
#[utoipa::path(
    post,
    path = "/moderation/approve",
    tag = "Moderation",
    request_body = ModerationRequest,
    responses(
        (status = 204, description = "Listing approved"),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn approve_listing<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AdminUser(_claims): AdminUser,
    Json(input): Json<ModerationRequest>,
) -> Result<StatusCode, AppError> {
    service
        .approve(input.id, &input.main_category, input.sub_category.as_deref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reject a listing with a reason and notify its owner
#[utoipa::path(
    post,
    path = "/moderation/reject",
    tag = "Moderation",
    request_body = RejectRequest,
    responses(
        (status = 204, description = "Listing rejected"),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn reject_listing<S: ListingStore>(
    State(service): State<Arc<ListingService<S>>>,
    AdminUser(_claims): AdminUser,
    Json(input): Json<RejectRequest>,
) -> Result<StatusCode, AppError> {
    service
        .reject(
            input.id,
            &input.main_category,
            input.sub_category.as_deref(),
            &input.reason,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_id_accepts_bare_and_composite_keys() {
        let id = Uuid::now_v7();
        assert_eq!(parse_key_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_key_id(&format!("{id},estate")).unwrap(), id);
        assert_eq!(
            parse_key_id(&format!("{id},digitalEquipment,computer")).unwrap(),
            id
        );
    }

    #[test]
    fn test_parse_key_id_rejects_garbage() {
        assert!(matches!(
            parse_key_id("not-a-uuid,estate"),
            Err(AppError::BadRequest(_))
        ));
    }
}
