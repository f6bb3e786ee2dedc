// JWT token issuance and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use utoipa::ToSchema;

use crate::auth::error::AuthError;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Claims embedded in an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenClaims {
    pub username: String,
    pub iat: i64, // issued at, unix seconds
    pub exp: i64, // expiration, unix seconds
}

/// Token service for signing and verifying HS256 JWTs
///
/// Stateless apart from the shared secret, so one instance can be used from
/// any number of requests concurrently.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a new TokenService from the signing secret
    ///
    /// An empty secret is refused; there is no fallback key.
    pub fn new(secret: &str, ttl_seconds: i64) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::TokenGenerationError(
                "JWT secret must not be empty".to_string(),
            ));
        }
        if ttl_seconds <= 0 {
            return Err(AuthError::TokenGenerationError(format!(
                "token lifetime must be positive, got {}",
                ttl_seconds
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_seconds,
        })
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Build fresh claims for `username`, valid for the configured lifetime
    pub fn claims_for(&self, username: &str) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            username: username.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        }
    }

    /// Issue a signed token for `username`
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.encode(&self.claims_for(username))
    }

    /// Sign arbitrary claims
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Decode and validate a token
    ///
    /// Bad signature, malformed structure, wrong algorithm and expiry all
    /// collapse into `AuthError::InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Token rejected: {:?}", e.kind());
                AuthError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Helper to create a test token service
    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes", DEFAULT_TOKEN_TTL_SECONDS).unwrap()
    }

    #[test]
    fn test_round_trip_reproduces_claims() {
        let service = test_token_service();
        let claims = service.claims_for("alice");

        let token = service.encode(&claims).unwrap();
        let decoded = service.decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_issued_token_expires_after_ttl() {
        let service = TokenService::new("secret", 900).unwrap();
        let token = service.issue("alice").unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_token_signature_verification() {
        let service_a = TokenService::new("secret1", DEFAULT_TOKEN_TTL_SECONDS).unwrap();
        let service_b = TokenService::new("secret2", DEFAULT_TOKEN_TTL_SECONDS).unwrap();

        let token = service_a.issue("alice").unwrap();

        assert!(service_a.decode(&token).is_ok());
        assert!(matches!(service_b.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = test_token_service();
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            username: "alice".to_string(),
            iat: now - 1000,
            exp: now - 500, // well past the validation leeway
        };

        let token = service.encode(&claims).unwrap();
        assert!(matches!(service.decode(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        for token in [
            "",
            "garbage",
            "not.a.token",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
        ] {
            assert!(matches!(service.decode(token), Err(AuthError::InvalidToken)));
        }
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = test_token_service();
        let token = service.issue("alice").unwrap();
        let forged = service.issue("mallory").unwrap();

        // alice's header and signature around mallory's payload
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(matches!(service.decode(&spliced), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_empty_secret_fails_closed() {
        assert!(matches!(
            TokenService::new("", DEFAULT_TOKEN_TTL_SECONDS),
            Err(AuthError::TokenGenerationError(_))
        ));
    }

    #[test]
    fn test_non_positive_ttl_is_rejected() {
        assert!(TokenService::new("secret", 0).is_err());
        assert!(TokenService::new("secret", -5).is_err());
    }

    #[test]
    fn test_debug_does_not_print_keys() {
        let service = TokenService::new("super-secret-value", 60).unwrap();
        let rendered = format!("{:?}", service);

        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("ttl_seconds"));
    }

    proptest! {
        #[test]
        fn prop_round_trip(username in "[a-zA-Z0-9_.-]{1,32}") {
            let service = test_token_service();
            let claims = service.claims_for(&username);
            let token = service.encode(&claims)?;

            prop_assert_eq!(service.decode(&token)?, claims);
        }

        #[test]
        fn prop_other_secret_is_rejected(
            username in "[a-z]{1,16}",
            secret_a in "[a-zA-Z0-9]{8,32}",
            secret_b in "[a-zA-Z0-9]{8,32}",
        ) {
            prop_assume!(secret_a != secret_b);
            let issuer = TokenService::new(&secret_a, DEFAULT_TOKEN_TTL_SECONDS)?;
            let verifier = TokenService::new(&secret_b, DEFAULT_TOKEN_TTL_SECONDS)?;
            let token = issuer.issue(&username)?;

            prop_assert!(matches!(verifier.decode(&token), Err(AuthError::InvalidToken)));
        }

        #[test]
        fn prop_garbage_is_rejected(garbage in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.decode(&garbage).is_err());
        }
    }
}
