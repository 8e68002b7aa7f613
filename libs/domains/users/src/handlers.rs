use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AdminUser, AppError, AuthUser,
    errors::responses::{
        BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::models::{AuthResponse, OAuthLogin, PublicUser, Role, SignIn, SignUp, UpdateProfile};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(
        signup,
        signin,
        oauth_login,
        me,
        update_me,
        delete_me,
        add_favorite,
        remove_favorite,
        request_verification,
        confirm_verification,
        ban_user,
        unban_user,
    ),
    components(
        schemas(
            PublicUser,
            Role,
            AuthResponse,
            SignUp,
            SignIn,
            OAuthLogin,
            UpdateProfile,
            FavoriteKey,
            BanRequest,
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Account and profile endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Deserialize, ToSchema)]
pub struct FavoriteKey {
    pub key: String,
}

#[derive(Deserialize, ToSchema)]
pub struct BanRequest {
    pub reason: Option<String>,
}

/// Create the users router
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/oauth", post(oauth_login))
        .route("/me", get(me).put(update_me).delete(delete_me))
        .route("/favorites", post(add_favorite).delete(remove_favorite))
        .route("/verification", post(request_verification))
        .route("/verify/{token}", get(confirm_verification))
        .route("/{id}/ban", post(ban_user))
        .route("/{id}/unban", post(unban_user))
        .with_state(shared_service)
}

fn parse_user_id(sub: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(sub).map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Users",
    request_body = SignUp,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signup<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<SignUp>,
) -> Result<impl IntoResponse, AppError> {
    let response = service.signup(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/signin",
    tag = "Users",
    request_body = SignIn,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn signin<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<SignIn>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service.signin(input).await?))
}

/// OAuth-style login-or-register
#[utoipa::path(
    post,
    path = "/oauth",
    tag = "Users",
    request_body = OAuthLogin,
    responses(
        (status = 200, description = "Signed in (account created if needed)", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn oauth_login<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Json(input): Json<OAuthLogin>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(service.login_or_register(input).await?))
}

/// Fetch the caller's profile
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    responses(
        (status = 200, description = "The caller's profile", body = PublicUser),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let id = parse_user_id(&claims.sub)?;
    Ok(Json(service.profile(id).await?))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/me",
    tag = "Users",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Updated profile", body = PublicUser),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn update_me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<UpdateProfile>,
) -> Result<Json<PublicUser>, AppError> {
    let id = parse_user_id(&claims.sub)?;
    Ok(Json(service.update_profile(id, input).await?))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/me",
    tag = "Users",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn delete_me<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<StatusCode, AppError> {
    let id = parse_user_id(&claims.sub)?;
    service.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a listing key to the caller's favorites
#[utoipa::path(
    post,
    path = "/favorites",
    tag = "Users",
    request_body = FavoriteKey,
    responses(
        (status = 204, description = "Favorite added"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn add_favorite<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<FavoriteKey>,
) -> Result<StatusCode, AppError> {
    let id = parse_user_id(&claims.sub)?;
    service.add_favorite(id, &input.key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a listing key from the caller's favorites
#[utoipa::path(
    delete,
    path = "/favorites",
    tag = "Users",
    request_body = FavoriteKey,
    responses(
        (status = 204, description = "Favorite removed"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn remove_favorite<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
    Json(input): Json<FavoriteKey>,
) -> Result<StatusCode, AppError> {
    let id = parse_user_id(&claims.sub)?;
    service.remove_favorite(id, &input.key).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request a verification email
#[utoipa::path(
    post,
    path = "/verification",
    tag = "Users",
    responses(
        (status = 202, description = "Verification email queued"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn request_verification<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AuthUser(claims): AuthUser,
) -> Result<StatusCode, AppError> {
    let id = parse_user_id(&claims.sub)?;
    service.request_verification(id).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Confirm an emailed verification token
#[utoipa::path(
    get,
    path = "/verify/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "Verification token")),
    responses(
        (status = 200, description = "Account verified", body = PublicUser),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_verification<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(token): Path<String>,
) -> Result<Json<PublicUser>, AppError> {
    Ok(Json(service.confirm_verification(&token).await?))
}

/// Ban an account (admin only)
#[utoipa::path(
    post,
    path = "/{id}/ban",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = BanRequest,
    responses(
        (status = 204, description = "User banned"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn ban_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
    Json(input): Json<BanRequest>,
) -> Result<StatusCode, AppError> {
    service.ban(id, input.reason.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lift an account ban (admin only)
#[utoipa::path(
    post,
    path = "/{id}/unban",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Ban lifted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("jwt" = []))
)]
async fn unban_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.unban(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
