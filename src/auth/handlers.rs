// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{LoginRequest, LoginResponse, MessageResponse, ProtectedResponse, RegisterRequest},
};
use crate::validation::ValidatedJson;
use crate::AppState;

/// Register a new user
/// POST /register
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Username taken or invalid body", body = MessageResponse,
            example = json!({"message": "User already exists"}))
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    debug!("Register request for username: {}", request.username);

    state.auth.register(&request.username, &request.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// Login a user
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials or invalid body", body = MessageResponse,
            example = json!({"message": "Invalid username or password"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    debug!("Login request for username: {}", request.username);

    let token = state.auth.login(&request.username, &request.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Example protected resource; echoes the caller's token claims
/// GET /protected
#[utoipa::path(
    get,
    path = "/protected",
    responses(
        (status = 200, description = "Caller is authenticated", body = ProtectedResponse),
        (status = 400, description = "Invalid or expired token", body = MessageResponse),
        (status = 401, description = "No bearer token", body = MessageResponse,
            example = json!({"message": "Access Denied"}))
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn protected_handler(user: AuthenticatedUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Welcome to the protected route".to_string(),
        user: user.claims,
    })
}
