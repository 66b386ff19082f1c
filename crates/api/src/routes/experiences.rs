//! Work experience routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;
use crate::middleware::AuthAdmin;
use crate::routes::{error_response, validate_len};
use folio_db::CrudRepository;
use folio_db::entities::experiences;
use folio_shared::{AppError, PageRequest};

/// Experience create payload.
#[derive(Debug, Deserialize)]
pub struct CreateExperience {
    /// Role or job title.
    pub position: String,
    /// Employer name.
    pub company: String,
    /// What the role involved.
    pub description: String,
    /// First day in the role.
    pub start_date: NaiveDate,
    /// Last day in the role, absent for current positions.
    pub end_date: Option<NaiveDate>,
    /// Whether this is the current position.
    #[serde(default)]
    pub is_current: bool,
}

/// Experience update payload; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExperience {
    /// Role or job title.
    pub position: Option<String>,
    /// Employer name.
    pub company: Option<String>,
    /// What the role involved.
    pub description: Option<String>,
    /// First day in the role.
    pub start_date: Option<NaiveDate>,
    /// Last day in the role.
    pub end_date: Option<NaiveDate>,
    /// Whether this is the current position.
    pub is_current: Option<bool>,
}

fn validate_texts(
    position: Option<&str>,
    company: Option<&str>,
    description: Option<&str>,
) -> Result<(), AppError> {
    if let Some(position) = position {
        validate_len("position", position, 2, 120)?;
    }
    if let Some(company) = company {
        validate_len("company", company, 2, 120)?;
    }
    if let Some(description) = description {
        validate_len("description", description, 5, 3000)?;
    }
    Ok(())
}

/// A current position has no end date, and an ended one cannot end before
/// it started.
fn validate_dates(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_current: bool,
) -> Result<(), AppError> {
    if is_current && end_date.is_some() {
        return Err(AppError::Validation(
            "a current position cannot have an end_date".to_string(),
        ));
    }
    if let Some(end_date) = end_date
        && end_date < start_date
    {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }
    Ok(())
}

fn repo(state: &AppState) -> CrudRepository<experiences::Entity> {
    CrudRepository::new(state.db.clone())
}

/// Creates the public experience routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/experiences", get(list_experiences))
}

/// Creates the experience routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/experiences", post(create_experience))
        .route("/experiences/{id}", put(update_experience))
        .route("/experiences/{id}", delete(delete_experience))
}

/// GET /experiences - Paginated experience list.
async fn list_experiences(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Response {
    match repo(&state).page(page, experiences::Column::StartDate).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list experiences");
            error_response(&e)
        }
    }
}

/// POST /experiences - Create an experience entry.
async fn create_experience(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateExperience>,
) -> Response {
    if let Err(e) = validate_texts(
        Some(&payload.position),
        Some(&payload.company),
        Some(&payload.description),
    )
    .and_then(|()| validate_dates(payload.start_date, payload.end_date, payload.is_current))
    {
        return error_response(&e);
    }

    let model = experiences::ActiveModel {
        position: Set(payload.position.trim().to_string()),
        company: Set(payload.company.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        is_current: Set(payload.is_current),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match repo(&state).insert(model).await {
        Ok(created) => {
            info!(admin = %auth.email(), id = created.id, company = %created.company, "experience created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create experience");
            error_response(&e)
        }
    }
}

/// PUT `/experiences/{id}` - Update an experience entry.
async fn update_experience(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateExperience>,
) -> Response {
    if let Err(e) = validate_texts(
        payload.position.as_deref(),
        payload.company.as_deref(),
        payload.description.as_deref(),
    ) {
        return error_response(&e);
    }

    let repo = repo(&state);
    let existing = match repo.find_by_id(id).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return error_response(&AppError::NotFound(format!("experience {id} not found")));
        }
        Err(e) => {
            error!(error = %e, "failed to load experience");
            return error_response(&e);
        }
    };

    // Date rules are checked against the merged result, so a partial update
    // cannot leave an inconsistent row behind.
    let start_date = payload.start_date.unwrap_or(existing.start_date);
    let end_date = payload.end_date.or(existing.end_date);
    let is_current = payload.is_current.unwrap_or(existing.is_current);
    let end_date = if is_current { None } else { end_date };
    if let Err(e) = validate_dates(start_date, end_date, is_current) {
        return error_response(&e);
    }

    let mut active: experiences::ActiveModel = existing.into();
    if let Some(position) = payload.position {
        active.position = Set(position.trim().to_string());
    }
    if let Some(company) = payload.company {
        active.company = Set(company.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    active.start_date = Set(start_date);
    active.end_date = Set(end_date);
    active.is_current = Set(is_current);

    match repo.update(active).await {
        Ok(updated) => {
            info!(admin = %auth.email(), id = updated.id, "experience updated");
            Json(updated).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to update experience");
            error_response(&e)
        }
    }
}

/// DELETE `/experiences/{id}` - Remove an experience entry.
async fn delete_experience(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
) -> Response {
    match repo(&state).delete_by_id(id).await {
        Ok(true) => {
            info!(admin = %auth.email(), id, "experience deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("experience {id} not found"))),
        Err(e) => {
            error!(error = %e, "failed to delete experience");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_position_excludes_end_date() {
        assert!(validate_dates(date(2020, 1, 1), Some(date(2021, 1, 1)), true).is_err());
        assert!(validate_dates(date(2020, 1, 1), None, true).is_ok());
    }

    #[test]
    fn test_end_date_must_follow_start_date() {
        assert!(validate_dates(date(2021, 1, 1), Some(date(2020, 1, 1)), false).is_err());
        assert!(validate_dates(date(2020, 1, 1), Some(date(2020, 1, 1)), false).is_ok());
        assert!(validate_dates(date(2020, 1, 1), Some(date(2022, 6, 1)), false).is_ok());
    }

    #[test]
    fn test_validate_texts_bounds() {
        assert!(validate_texts(Some("Engineer"), Some("Acme"), Some("Did things")).is_ok());
        assert!(validate_texts(Some("E"), None, None).is_err());
        assert!(validate_texts(None, None, Some("xy")).is_err());
    }
}
