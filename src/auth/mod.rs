// Authentication module
// Credential storage, password hashing, JWT issuance and the bearer-token guard

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, protected_handler, register_handler};
pub use middleware::{authenticate, extract_bearer, require_auth, AuthenticatedUser};
pub use models::{Account, LoginRequest, LoginResponse, MessageResponse, ProtectedResponse, RegisterRequest};
pub use password::PasswordService;
pub use repository::{CredentialStore, InMemoryCredentialStore};
pub use service::AuthService;
pub use token::{TokenClaims, TokenService};
