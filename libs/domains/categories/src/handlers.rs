use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AdminUser, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::CategoryResult;
use crate::models::{CreateMainCategory, CreateSubCategory, MainCategory, SubCategory};
use crate::repository::CategoryRepository;
use crate::service::CategoryService;

/// OpenAPI documentation for Categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_main_categories,
        create_main_category,
        list_sub_categories,
        create_sub_category,
    ),
    components(
        schemas(MainCategory, SubCategory, CreateMainCategory, CreateSubCategory),
        responses(
            BadRequestValidationResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Category taxonomy endpoints")
    )
)]
pub struct ApiDoc;

/// Query parameters for listing sub categories
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SubCategoryQuery {
    /// Restrict to one parent main category
    pub main_category: Option<String>,
}

/// Create the categories router
///
/// Reads are public; creation requires an admin token (enforced by the
/// `AdminUser` extractor, so the JWT middleware must wrap this router).
pub fn router<R: CategoryRepository + 'static>(service: CategoryService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/main",
            get(list_main_categories).post(create_main_category),
        )
        .route("/sub", get(list_sub_categories).post(create_sub_category))
        .with_state(shared_service)
}

/// List all main categories
#[utoipa::path(
    get,
    path = "/main",
    tag = "Categories",
    responses(
        (status = 200, description = "List of main categories", body = Vec<MainCategory>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_main_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
) -> CategoryResult<Json<Vec<MainCategory>>> {
    let categories = service.list_main_categories().await?;
    Ok(Json(categories))
}

/// Create a main category (admin only)
#[utoipa::path(
    post,
    path = "/main",
    tag = "Categories",
    request_body = CreateMainCategory,
    responses(
        (status = 201, description = "Main category created", body = MainCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn create_main_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateMainCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_main_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// List sub categories, optionally filtered by parent
#[utoipa::path(
    get,
    path = "/sub",
    tag = "Categories",
    params(SubCategoryQuery),
    responses(
        (status = 200, description = "List of sub categories", body = Vec<SubCategory>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_sub_categories<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    Query(query): Query<SubCategoryQuery>,
) -> CategoryResult<Json<Vec<SubCategory>>> {
    let categories = service
        .list_sub_categories(query.main_category.as_deref())
        .await?;
    Ok(Json(categories))
}

/// Create a sub category (admin only)
#[utoipa::path(
    post,
    path = "/sub",
    tag = "Categories",
    request_body = CreateSubCategory,
    responses(
        (status = 201, description = "Sub category created", body = SubCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn create_sub_category<R: CategoryRepository>(
    State(service): State<Arc<CategoryService<R>>>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateSubCategory>,
) -> CategoryResult<impl IntoResponse> {
    let category = service.create_sub_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
