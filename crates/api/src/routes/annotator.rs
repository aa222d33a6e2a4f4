//! Route definitions for the annotator store.

use axum::routing::get;
use axum::Router;

use crate::handlers::annotation;
use crate::state::AppState;

/// Annotator store routes, nested under the configured mount path.
///
/// ```text
/// GET    /                      describe
/// GET    /annotations           list_annotations
/// POST   /annotations           create_annotation
/// GET    /annotations/{id}      get_annotation
/// PUT    /annotations/{id}      update_annotation
/// DELETE /annotations/{id}      delete_annotation
/// GET    /search                search_annotations (?uri)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(annotation::describe))
        .route(
            "/annotations",
            get(annotation::list_annotations).post(annotation::create_annotation),
        )
        .route(
            "/annotations/{id}",
            get(annotation::get_annotation)
                .put(annotation::update_annotation)
                .delete(annotation::delete_annotation),
        )
        .route("/search", get(annotation::search_annotations))
}
