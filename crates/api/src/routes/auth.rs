//! Admin login route.
//!
//! There is no user table; the single admin identity comes from
//! configuration and a successful login yields a short-lived bearer token.

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{error, info};

use crate::AppState;
use crate::routes::error_response;
use folio_shared::{AppError, LoginRequest, LoginResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate the admin and return a token.
async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    if payload.email != state.admin.email || payload.password != state.admin.password {
        info!(email = %payload.email, "failed admin login attempt");
        return error_response(&AppError::Unauthorized(
            "invalid email or password".to_string(),
        ));
    }

    match state.jwt_service.generate_token(&payload.email) {
        Ok(token) => {
            info!("admin logged in");
            Json(LoginResponse {
                token,
                expires_in: state.jwt_service.token_expires_in(),
            })
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to issue token");
            error_response(&AppError::Internal("failed to issue token".to_string()))
        }
    }
}
