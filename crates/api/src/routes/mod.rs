//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use folio_shared::AppError;

pub mod auth;
pub mod categories;
pub mod experiences;
pub mod health;
pub mod profile;
pub mod projects;
pub mod services;
pub mod social_links;

/// Creates the API router: public reads plus JWT-protected mutations.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(profile::protected_routes())
        .merge(categories::protected_routes())
        .merge(projects::protected_routes())
        .merge(experiences::protected_routes())
        .merge(services::protected_routes())
        .merge(social_links::protected_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(profile::routes())
        .merge(categories::routes())
        .merge(projects::routes())
        .merge(experiences::routes())
        .merge(services::routes())
        .merge(social_links::routes())
        .merge(protected_routes)
}

/// Renders an application error as `{ "error": code, "message": … }`.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// Validates a trimmed string length in characters.
pub(crate) fn validate_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Validates an http(s) URL with a length cap.
pub(crate) fn validate_url(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let value = value.trim();
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(AppError::Validation(format!(
            "{field} must be an http or https URL"
        )));
    }
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_len_bounds() {
        assert!(validate_len("name", "ab", 2, 60).is_ok());
        assert!(validate_len("name", "  ab  ", 2, 60).is_ok());
        assert!(validate_len("name", "a", 2, 60).is_err());
        assert!(validate_len("name", &"x".repeat(61), 2, 60).is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://example.com", 300).is_ok());
        assert!(validate_url("url", "http://example.com", 300).is_ok());
        assert!(validate_url("url", "ftp://example.com", 300).is_err());
        let long = format!("https://example.com/{}", "x".repeat(300));
        assert!(validate_url("url", &long, 300).is_err());
    }
}
