//! Portfolio project routes.

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
use folio_db::entities::projects;
use folio_shared::{AppError, PageRequest};

/// Project create payload.
#[derive(Debug, Deserialize)]
pub struct CreateProject {
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// Technologies used, comma separated.
    pub technologies: String,
    /// Screenshot or cover image URL.
    pub image_url: Option<String>,
    /// Live demo URL.
    pub demo_url: Option<String>,
    /// Source repository URL.
    pub github_url: Option<String>,
    /// Owning category.
    pub category_id: Option<i32>,
    /// Whether the project is featured on the landing page.
    #[serde(default)]
    pub featured: bool,
    /// Free-form difficulty or seniority label.
    pub level: Option<String>,
}

/// Project update payload; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    /// Project title.
    pub title: Option<String>,
    /// Project description.
    pub description: Option<String>,
    /// Technologies used.
    pub technologies: Option<String>,
    /// Screenshot or cover image URL.
    pub image_url: Option<String>,
    /// Live demo URL.
    pub demo_url: Option<String>,
    /// Source repository URL.
    pub github_url: Option<String>,
    /// Owning category.
    pub category_id: Option<i32>,
    /// Whether the project is featured.
    pub featured: Option<bool>,
    /// Free-form difficulty or seniority label.
    pub level: Option<String>,
}

fn validate_fields(
    title: Option<&str>,
    description: Option<&str>,
    technologies: Option<&str>,
    urls: [(&str, Option<&str>); 3],
) -> Result<(), AppError> {
    if let Some(title) = title {
        validate_len("title", title, 3, 200)?;
    }
    if let Some(description) = description {
        validate_len("description", description, 10, 5000)?;
    }
    if let Some(technologies) = technologies {
        validate_len("technologies", technologies, 3, 500)?;
    }
    for (field, url) in urls {
        if let Some(url) = url {
            validate_url(field, url, 300)?;
        }
    }
    Ok(())
}

fn repo(state: &AppState) -> CrudRepository<projects::Entity> {
    CrudRepository::new(state.db.clone())
}

/// Creates the public project routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/projects", get(list_projects))
}

/// Creates the project routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/{id}", put(update_project))
        .route("/projects/{id}", delete(delete_project))
}

/// GET /projects - Paginated project list.
async fn list_projects(State(state): State<AppState>, Query(page): Query<PageRequest>) -> Response {
    match repo(&state).page(page, projects::Column::Id).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list projects");
            error_response(&e)
        }
    }
}

/// POST /projects - Create a project.
async fn create_project(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CreateProject>,
) -> Response {
    if let Err(e) = validate_fields(
        Some(&payload.title),
        Some(&payload.description),
        Some(&payload.technologies),
        [
            ("image_url", payload.image_url.as_deref()),
            ("demo_url", payload.demo_url.as_deref()),
            ("github_url", payload.github_url.as_deref()),
        ],
    ) {
        return error_response(&e);
    }

    let model = projects::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        technologies: Set(payload.technologies.trim().to_string()),
        image_url: Set(payload.image_url),
        demo_url: Set(payload.demo_url),
        github_url: Set(payload.github_url),
        category_id: Set(payload.category_id),
        featured: Set(payload.featured),
        level: Set(payload.level),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match repo(&state).insert(model).await {
        Ok(created) => {
            info!(admin = %auth.email(), id = created.id, title = %created.title, "project created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create project");
            error_response(&e)
        }
    }
}

/// PUT `/projects/{id}` - Update a project.
#[allow(clippy::too_many_lines)]
async fn update_project(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProject>,
) -> Response {
    if let Err(e) = validate_fields(
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.technologies.as_deref(),
        [
            ("image_url", payload.image_url.as_deref()),
            ("demo_url", payload.demo_url.as_deref()),
            ("github_url", payload.github_url.as_deref()),
        ],
    ) {
        return error_response(&e);
    }

    let repo = repo(&state);
    let existing = match repo.find_by_id(id).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return error_response(&AppError::NotFound(format!("project {id} not found")));
        }
        Err(e) => {
            error!(error = %e, "failed to load project");
            return error_response(&e);
        }
    };

    let mut active: projects::ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(technologies) = payload.technologies {
        active.technologies = Set(technologies.trim().to_string());
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(demo_url) = payload.demo_url {
        active.demo_url = Set(Some(demo_url));
    }
    if let Some(github_url) = payload.github_url {
        active.github_url = Set(Some(github_url));
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(level) = payload.level {
        active.level = Set(Some(level));
    }

    match repo.update(active).await {
        Ok(updated) => {
            info!(admin = %auth.email(), id = updated.id, "project updated");
            Json(updated).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to update project");
            error_response(&e)
        }
    }
}

/// DELETE `/projects/{id}` - Remove a project.
async fn delete_project(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
) -> Response {
    match repo(&state).delete_by_id(id).await {
        Ok(true) => {
            info!(admin = %auth.email(), id, "project deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("project {id} not found"))),
        Err(e) => {
            error!(error = %e, "failed to delete project");
            error_response(&e)
        }
    }
}
