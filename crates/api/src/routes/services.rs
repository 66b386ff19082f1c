//! Offered service routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthAdmin;
use crate::routes::{error_response, validate_len};
use folio_db::CrudRepository;
use folio_db::entities::services;
use folio_shared::{AppError, PageRequest};

/// Service create payload.
#[derive(Debug, Deserialize)]
pub struct CreateService {
    /// Service name.
    pub name: String,
    /// Service description.
    pub description: String,
    /// Price as a decimal string or number.
    pub price: Decimal,
}

/// Service update payload; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateService {
    /// Service name.
    pub name: Option<String>,
    /// Service description.
    pub description: Option<String>,
    /// Price.
    pub price: Option<Decimal>,
}

fn validate_fields(
    name: Option<&str>,
    description: Option<&str>,
    price: Option<Decimal>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        validate_len("name", name, 2, 100)?;
    }
    if let Some(description) = description {
        validate_len("description", description, 5, 2000)?;
    }
    if let Some(price) = price
        && price.is_sign_negative()
    {
        return Err(AppError::Validation("price must not be negative".to_string()));
    }
    Ok(())
}

fn repo(state: &AppState) -> CrudRepository<services::Entity> {
    CrudRepository::new(state.db.clone())
}

/// Creates the public service routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/services", get(list_services))
}

/// Creates the service routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/services", post(create_service))
        .route("/services/{id}", put(update_service))
        .route("/services/{id}", delete(delete_service))
}

/// GET /services - Paginated service list.
async fn list_services(State(state): State<AppState>, Query(page): Query<PageRequest>) -> Response {
    match repo(&state).page(page, services::Column::Id).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list services");
            error_response(&e)
        }
    }
}

/// POST /services - Create a service.
async fn create_service(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateService>,
) -> Response {
    if let Err(e) = validate_fields(
        Some(&payload.name),
        Some(&payload.description),
        Some(payload.price),
    ) {
        return error_response(&e);
    }

    let model = services::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        price: Set(payload.price),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match repo(&state).insert(model).await {
        Ok(created) => {
            info!(admin = %auth.email(), id = created.id, name = %created.name, "service created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create service");
            error_response(&e)
        }
    }
}

/// PUT `/services/{id}` - Update a service.
async fn update_service(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateService>,
) -> Response {
    if let Err(e) = validate_fields(
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.price,
    ) {
        return error_response(&e);
    }

    let repo = repo(&state);
    let existing = match repo.find_by_id(id).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return error_response(&AppError::NotFound(format!("service {id} not found")));
        }
        Err(e) => {
            error!(error = %e, "failed to load service");
            return error_response(&e);
        }
    };

    let mut active: services::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }

    match repo.update(active).await {
        Ok(updated) => {
            info!(admin = %auth.email(), id = updated.id, "service updated");
            Json(updated).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to update service");
            error_response(&e)
        }
    }
}

/// DELETE `/services/{id}` - Remove a service.
async fn delete_service(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
) -> Response {
    match repo(&state).delete_by_id(id).await {
        Ok(true) => {
            info!(admin = %auth.email(), id, "service deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("service {id} not found"))),
        Err(e) => {
            error!(error = %e, "failed to delete service");
            error_response(&e)
        }
    }
}
