//! Project category routes.

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
use crate::routes::{error_response, validate_len};
use folio_db::CrudRepository;
use folio_db::entities::categories;
use folio_shared::{AppError, PageRequest};

/// Category create/update payload.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    /// Category name, unique across categories.
    pub name: String,
}

fn validate(payload: &CategoryPayload) -> Result<(), AppError> {
    validate_len("name", &payload.name, 2, 60)
}

fn repo(state: &AppState) -> CrudRepository<categories::Entity> {
    CrudRepository::new(state.db.clone())
}

/// Creates the public category routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories))
}

/// Creates the category routes that require authentication.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", put(update_category))
        .route("/categories/{id}", delete(delete_category))
}

/// GET /categories - Paginated category list.
async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Response {
    match repo(&state).page(page, categories::Column::Id).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!(error = %e, "failed to list categories");
            error_response(&e)
        }
    }
}

/// POST /categories - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Json(payload): Json<CategoryPayload>,
) -> Response {
    if let Err(e) = validate(&payload) {
        return error_response(&e);
    }

    let model = categories::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    match repo(&state).insert(model).await {
        Ok(created) => {
            info!(admin = %auth.email(), id = created.id, name = %created.name, "category created");
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to create category");
            error_response(&e)
        }
    }
}

/// PUT `/categories/{id}` - Rename a category.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryPayload>,
) -> Response {
    if let Err(e) = validate(&payload) {
        return error_response(&e);
    }

    let repo = repo(&state);
    let existing = match repo.find_by_id(id).await {
        Ok(Some(model)) => model,
        Ok(None) => {
            return error_response(&AppError::NotFound(format!("category {id} not found")));
        }
        Err(e) => {
            error!(error = %e, "failed to load category");
            return error_response(&e);
        }
    };

    let mut active: categories::ActiveModel = existing.into();
    active.name = Set(payload.name.trim().to_string());

    match repo.update(active).await {
        Ok(updated) => {
            info!(admin = %auth.email(), id = updated.id, "category updated");
            Json(updated).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to update category");
            error_response(&e)
        }
    }
}

/// DELETE `/categories/{id}` - Remove a category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthAdmin,
    Path(id): Path<i32>,
) -> Response {
    match repo(&state).delete_by_id(id).await {
        Ok(true) => {
            info!(admin = %auth.email(), id, "category deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error_response(&AppError::NotFound(format!("category {id} not found"))),
        Err(e) => {
            error!(error = %e, "failed to delete category");
            error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::create_router;
    use crate::test_util::test_state;

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        let mut row = BTreeMap::new();
        row.insert("num_items", Value::BigInt(Some(total)));
        row
    }

    #[tokio::test]
    async fn test_list_categories() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)]])
            .append_query_results([vec![categories::Model {
                id: 1,
                name: "Web".to_string(),
                created_at: Utc::now().into(),
            }]])
            .into_connection();
        let app = create_router(test_state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/categories?page=1&per_page=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"][0]["name"], "Web");
        assert_eq!(json["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_create_category_rejects_short_name() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = test_state(db);
        let token = state.jwt_service.generate_token("admin@example.com").unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categories")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"a"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_create_category_with_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![categories::Model {
                id: 7,
                name: "Embedded".to_string(),
                created_at: Utc::now().into(),
            }]])
            .into_connection();
        let state = test_state(db);
        let token = state.jwt_service.generate_token("admin@example.com").unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categories")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Embedded"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Embedded");
    }

    #[tokio::test]
    async fn test_create_category_requires_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = create_router(test_state(db));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categories")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Web"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
