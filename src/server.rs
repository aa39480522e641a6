//! The single-page demo server.
//!
//! One static page plus the two JSON endpoints it calls. The classifier
//! is loaded once before the listener starts and shared read-only across
//! requests; a failed upload only ever affects its own response.

use std::io::Cursor;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::{json, Value};

use crate::classifier::{Classifier, ClassifierError};

/// Uploads larger than this are rejected outright.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const INDEX_HTML: &str = include_str!("../static/index.html");

pub struct AppState {
    pub classifier: Arc<Classifier>,
}

pub fn router(classifier: Arc<Classifier>) -> Router {
    let state = Arc::new(AppState { classifier });
    Router::new()
        .route("/", get(index))
        .route("/api/classes", get(list_classes))
        .route("/api/classify", post(classify))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Class names in mapping order, for the sidebar listing.
async fn list_classes(State(state): State<Arc<AppState>>) -> Json<Value> {
    let names: Vec<&str> = state.classifier.classes.names().collect();
    Json(json!({ "classes": names }))
}

/// Accepts a multipart upload (field `file`) and returns the ranked
/// predictions, or an inline error message with a matching status code.
async fn classify(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut image_data: Vec<u8> = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    match field.bytes().await {
                        Ok(bytes) => {
                            image_data = bytes.to_vec();
                            break;
                        }
                        Err(e) => {
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                format!("failed to read upload: {}", e),
                            )
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid multipart body: {}", e),
                )
            }
        }
    }

    if image_data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "no file uploaded".to_string());
    }

    let dimensions = image::ImageReader::new(Cursor::new(image_data.as_slice()))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    match state.classifier.classify(&image_data) {
        Ok(predictions) => {
            let (width, height) = dimensions.unwrap_or((0, 0));
            info!(
                "Classified {}x{} upload ({} bytes): {}",
                width,
                height,
                image_data.len(),
                predictions
                    .first()
                    .map(|p| p.label.as_str())
                    .unwrap_or("<no classes>")
            );
            (
                StatusCode::OK,
                Json(json!({
                    "predictions": predictions,
                    "width": width,
                    "height": height,
                })),
            )
        }
        Err(e) => {
            warn!("Classification failed: {}", e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

fn status_for(err: &ClassifierError) -> StatusCode {
    match err {
        ClassifierError::Image(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_errors_map_to_unprocessable() {
        let err = ClassifierError::Image("bad pixels".into());
        assert_eq!(status_for(&err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_prediction_errors_map_to_server_error() {
        let err = ClassifierError::Prediction("shape mismatch".into());
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_page_is_embedded() {
        assert!(INDEX_HTML.contains("Pollen Grain Classifier"));
    }
}
