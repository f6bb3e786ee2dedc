// token-gate: credential registration, login and bearer-token verification service

pub mod auth;
pub mod config;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    login_handler, protected_handler, register_handler, require_auth, AuthError, AuthService,
    CredentialStore, LoginRequest, LoginResponse, MessageResponse, PasswordService,
    ProtectedResponse, RegisterRequest, TokenClaims, TokenService,
};
use config::Config;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::protected_handler,
    ),
    components(
        schemas(RegisterRequest, LoginRequest, MessageResponse, LoginResponse, ProtectedResponse, TokenClaims)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token-protected endpoints")
    ),
    info(
        title = "Token Gate API",
        version = "0.1.0",
        description = "Credential registration and bearer-token verification"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(auth: Arc<AuthService>) -> Self {
        let tokens = Arc::clone(auth.token_service());
        Self { auth, tokens }
    }

    /// Wire up the auth services from configuration around the given store
    pub fn from_config(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_seconds)?);
        let passwords = PasswordService::with_params(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
        )?;
        let auth = Arc::new(AuthService::new(store, passwords, tokens)?);
        Ok(Self::new(auth))
    }
}

/// Creates and configures the application router
/// `/protected` sits behind the bearer-token guard; register and login are open
pub fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/protected", get(protected_handler))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.tokens),
            require_auth,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
