//! Social link routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthAdmin;
use crate::routes::{error_response, validate_len, validate_url};
use folio_db::CrudRepository;
use folio_db::entities::social_links;
use folio_shared::{AppError, PageRequest};

/// Social link create payload.
#[derive(Debug, Deserialize)]
pub struct CreateSocialLink {
    /// Display name (e.g. GitHub).
    pub name: String,
    /// Link target.
    pub url: String,
    /// Icon identifier used by the frontend.
    pub icon: String,
    /// Whether the link is shown.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Social link update payload; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSocialLink {
    /// Display name.
    pub name: Option<String>,
    /// Link target.
    pub url: Option<String>,
    /// Icon identifier.
    pub icon: Option<String>,
    /// Whether the link is shown.
    pub is_active: Option<bool>,
}

fn validate_fields(
    name: Option<&str>,
    url: Option<&str>,
    icon: Option<&str>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        validate_len("name", name, 2, 100)?;
    }
    if let Some(url) = url {
        validate_url("url", url, 300)?;
    }
    if let Some(icon) = icon {
        validate_len("icon", icon, 2, 100)?;
    }
    Ok(())
}

fn repo(state: &AppState) -> CrudRepository<social_links::Entity> {
    CrudRepository::new(state.db.clone())
}

/// Creates the public social link routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/social-links", get(list_social_links))
}

/// Creates the social link routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/social-links", post(create_social_link))
        .route("/social-links/{id}", put(update_social_link))
        .route("/social-links/{id}", delete(delete_social_link))
}

/// GET /social-links - Paginated social link list.
async fn list_social_links(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Response {
    match repo(&state).page(page, social_links::Column::Id).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list social links");
            error_response(&e)
        }
    }
}

/// POST /social-links - Create a social link.
async fn create_social_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateSocialLink>,
) -> Response {
    if let Err(e) = validate_fields(Some(&payload.name), Some(&payload.url), Some(&payload.icon)) {
        return error_response(&e);
    }

    let model = social_links::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        url: Set(payload.url.trim().to_string()),
        icon: Set(payload.icon.trim().to_string()),
        is_active: Set(payload.is_active),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match repo(&state).insert(model).await {
        Ok(created) => {
            info!(admin = %auth.email(), id = created.id, name = %created.name, "social link created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create social link");
            error_response(&e)
        }
    }
}

/// PUT `/social-links/{id}` - Update a social link.
async fn update_social_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSocialLink>,
) -> Response {
    if let Err(e) = validate_fields(
        payload.name.as_deref(),
        payload.url.as_deref(),
        payload.icon.as_deref(),
    ) {
        return error_response(&e);
    }

    let repo = repo(&state);
    let existing = match repo.find_by_id(id).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return error_response(&AppError::NotFound(format!("social link {id} not found")));
        }
        Err(e) => {
            error!(error = %e, "failed to load social link");
            return error_response(&e);
        }
    };

    let mut active: social_links::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(url) = payload.url {
        active.url = Set(url.trim().to_string());
    }
    if let Some(icon) = payload.icon {
        active.icon = Set(icon.trim().to_string());
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }

    match repo.update(active).await {
        Ok(updated) => {
            info!(admin = %auth.email(), id = updated.id, "social link updated");
            Json(updated).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to update social link");
            error_response(&e)
        }
    }
}

/// DELETE `/social-links/{id}` - Remove a social link.
async fn delete_social_link(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
) -> Response {
    match repo(&state).delete_by_id(id).await {
        Ok(true) => {
            info!(admin = %auth.email(), id, "social link deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("social link {id} not found"))),
        Err(e) => {
            error!(error = %e, "failed to delete social link");
            error_response(&e)
        }
    }
}
