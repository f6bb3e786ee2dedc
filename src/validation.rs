// Request body validation
// Rejects malformed or incomplete JSON bodies before they reach business logic

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::auth::error::AuthError;

/// JSON extractor that also runs `validator` rules on the decoded body
///
/// Both decode failures and rule violations are rejected as
/// `AuthError::ValidationError` (400 with a `{message}` body).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!("Rejected request body: {}", rejection.body_text());
                AuthError::ValidationError(rejection.body_text())
            })?;

        value
            .validate()
            .map_err(|errors| AuthError::ValidationError(describe_validation_errors(&errors)))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten field errors into one client-facing message
///
/// Messages are sorted so the output does not depend on map iteration order.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {}", field),
            })
        })
        .collect();

    messages.sort();
    messages.join("; ")
}
