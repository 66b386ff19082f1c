//! Singleton profile routes.
//!
//! `PUT /profile` is a multipart upsert: text fields plus up to three files
//! (`photo`, `logo`, `document`). File intake is validated here; upload,
//! store, and cleanup orchestration lives in the core service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthAdmin;
use crate::routes::error_response;
use folio_core::media::CloudinaryClient;
use folio_core::profile::{ProfileError, ProfileService, UpsertProfileInput};
use folio_db::ProfileRepository;
use folio_shared::AppError;

/// Per-file upload limit.
const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Whole-request body limit: three files plus text fields.
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Creates the public profile routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile))
}

/// Creates the profile routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            put(upsert_profile).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .route("/profile", delete(delete_profile))
}

fn profile_service(state: &AppState) -> ProfileService<ProfileRepository, CloudinaryClient> {
    ProfileService::new(
        Arc::new(ProfileRepository::new(state.db.clone())),
        Arc::clone(&state.media),
        state.media.cloud_name(),
    )
}

/// GET /profile - The profile with its CV download URL.
async fn get_profile(State(state): State<AppState>) -> Response {
    match profile_service(&state).get_profile().await {
        Ok(profile) => Json(profile).into_response(),
        Err(e @ ProfileError::NotFound) => error_response(&AppError::from(e)),
        Err(e) => {
            error!(error = %e, "failed to fetch profile");
            error_response(&AppError::from(e))
        }
    }
}

/// PUT /profile - Create or update the profile from a multipart form.
async fn upsert_profile(
    State(state): State<AppState>,
    auth: AuthAdmin,
    mut multipart: Multipart,
) -> Response {
    let mut input = UpsertProfileInput::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return error_response(&AppError::Validation(format!(
                    "invalid multipart payload: {e}"
                )));
            }
        };

        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        match name.as_str() {
            "full_name" | "logo_initials" | "phone" | "hero_title" | "hero_description"
            | "about_description" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        return error_response(&AppError::Validation(format!(
                            "invalid value for {name}: {e}"
                        )));
                    }
                };
                set_text_field(&mut input, &name, value);
            }
            "photo" | "logo" | "document" => {
                let content_type = field.content_type().map(ToString::to_string);
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        return error_response(&AppError::Validation(format!(
                            "failed to read {name}: {e}"
                        )));
                    }
                };
                if data.is_empty() {
                    continue;
                }
                if data.len() > MAX_FILE_BYTES {
                    return error_response(&AppError::Validation(format!(
                        "{name} exceeds the 5 MB limit"
                    )));
                }
                if let Err(e) = check_content_type(&name, content_type.as_deref()) {
                    return error_response(&e);
                }
                match name.as_str() {
                    "photo" => input.photo = Some(data),
                    "logo" => input.logo = Some(data),
                    _ => input.document = Some(data),
                }
            }
            // Unknown fields are ignored, matching lenient form intake.
            _ => {}
        }
    }

    match profile_service(&state).upsert_profile(input).await {
        Ok(profile) => {
            info!(admin = %auth.email(), "profile upserted");
            Json(profile).into_response()
        }
        Err(e) => {
            error!(error = %e, "profile upsert failed");
            error_response(&AppError::from(e))
        }
    }
}

/// DELETE /profile - Remove the profile and its stored assets.
async fn delete_profile(State(state): State<AppState>, auth: AuthAdmin) -> Response {
    match profile_service(&state).delete_profile().await {
        Ok(()) => {
            info!(admin = %auth.email(), "profile deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e @ ProfileError::NotFound) => error_response(&AppError::from(e)),
        Err(e) => {
            error!(error = %e, "failed to delete profile");
            error_response(&AppError::from(e))
        }
    }
}

fn set_text_field(input: &mut UpsertProfileInput, name: &str, value: String) {
    let slot = match name {
        "full_name" => &mut input.full_name,
        "logo_initials" => &mut input.logo_initials,
        "phone" => &mut input.phone,
        "hero_title" => &mut input.hero_title,
        "hero_description" => &mut input.hero_description,
        _ => &mut input.about_description,
    };
    *slot = Some(value);
}

/// Photo and logo must be images, the CV must be a PDF.
fn check_content_type(field: &str, content_type: Option<&str>) -> Result<(), AppError> {
    let ok = match field {
        "document" => content_type == Some("application/pdf"),
        _ => content_type.is_some_and(|ct| ct.starts_with("image/")),
    };
    if ok {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "unsupported content type for {field}"
        )))
    }
}
