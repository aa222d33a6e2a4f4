//! Handlers for the annotator store endpoints.
//!
//! Create and update answer `303 See Other` pointing at the read URL of the
//! annotation, as the annotator client expects. Missing annotations answer a
//! bare 404.

use annostore_core::annotation::{AnnotationContent, AnnotationFields};
use annostore_core::error::CoreError;
use annostore_core::types::DbId;
use annostore_db::models::annotation::{Annotation, AnnotationSearchResults};
use annostore_db::repositories::AnnotationRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/* --------------------------------------------------------------------------
   Request / response shapes
   -------------------------------------------------------------------------- */

/// Body of create and update requests: the permitted fields nested under an
/// `annotation` key.
#[derive(Debug, Deserialize)]
pub struct AnnotationEnvelope {
    pub annotation: AnnotationFields,
}

/// Query parameters for `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub uri: Option<String>,
}

/// Payload of the describe endpoint.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: String,
}

/* --------------------------------------------------------------------------
   Handlers
   -------------------------------------------------------------------------- */

/// GET /
///
/// Identify the service.
pub async fn describe(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: state.config.service_name.clone(),
    })
}

/// GET /annotations
///
/// List every stored annotation.
pub async fn list_annotations(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Annotation>>> {
    let annotations = AnnotationRepo::list(&state.pool).await?;
    tracing::debug!(count = annotations.len(), "Listed annotations");
    Ok(Json(annotations))
}

/// POST /annotations
///
/// Create an annotation and redirect to its read URL.
pub async fn create_annotation(
    State(state): State<AppState>,
    Json(input): Json<AnnotationEnvelope>,
) -> AppResult<Redirect> {
    let content = AnnotationContent::from_fields(input.annotation);
    let annotation = AnnotationRepo::create(&state.pool, &content).await?;

    tracing::info!(
        annotation_id = annotation.id,
        uri = annotation.content.uri.as_deref().unwrap_or(""),
        "Annotation created"
    );

    Ok(see_other(&state, annotation.id))
}

/// GET /annotations/{id}
///
/// Get a single annotation by ID.
pub async fn get_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Annotation>> {
    let annotation = AnnotationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(annotation))
}

/// PUT /annotations/{id}
///
/// Merge the submitted fields into an annotation and redirect to its read
/// URL. A storage failure is reported the same way as a missing annotation.
pub async fn update_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AnnotationEnvelope>,
) -> AppResult<Redirect> {
    match AnnotationRepo::update(&state.pool, id, &input.annotation).await {
        Ok(Some(annotation)) => {
            tracing::info!(annotation_id = annotation.id, "Annotation updated");
            Ok(see_other(&state, annotation.id))
        }
        Ok(None) => Err(not_found(id)),
        Err(err) => {
            tracing::error!(annotation_id = id, error = %err, "Annotation update failed");
            Err(not_found(id))
        }
    }
}

/// DELETE /annotations/{id}
///
/// Delete an annotation. A storage failure is reported the same way as a
/// missing annotation.
pub async fn delete_annotation(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match AnnotationRepo::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(annotation_id = id, "Annotation deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(not_found(id)),
        Err(err) => {
            tracing::error!(annotation_id = id, error = %err, "Annotation delete failed");
            Err(not_found(id))
        }
    }
}

/// GET /search?uri=
///
/// Find annotations whose `uri` matches exactly. An empty match set is a
/// normal response with `total: 0`.
pub async fn search_annotations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<AnnotationSearchResults>> {
    let rows = AnnotationRepo::search_by_uri(&state.pool, params.uri.as_deref()).await?;
    let results = AnnotationSearchResults::from(rows);

    tracing::debug!(
        uri = params.uri.as_deref().unwrap_or(""),
        total = results.total,
        "Searched annotations"
    );

    Ok(Json(results))
}

/* --------------------------------------------------------------------------
   Helpers
   -------------------------------------------------------------------------- */

/// Path of the read endpoint for `id` under the configured mount.
pub fn annotation_location(mount_path: &str, id: DbId) -> String {
    format!("{mount_path}/annotations/{id}")
}

fn see_other(state: &AppState, id: DbId) -> Redirect {
    Redirect::to(&annotation_location(&state.config.mount_path, id))
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Annotation",
        id,
    })
}
