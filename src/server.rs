use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::RecognizeError;
use crate::models::PredictionReport;
use crate::recognition::Recognizer;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for RecognizeError {
    fn into_response(self) -> Response {
        let status = if self.is_user_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = ErrorReport {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// HTTP routes of the web front-end
pub fn router(recognizer: Arc<Recognizer>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .with_state(recognizer)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(recognizer: Arc<Recognizer>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(recognizer))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn predict(
    State(recognizer): State<Arc<Recognizer>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionReport>, RecognizeError> {
    let result = match payload {
        Ok(Json(request)) => {
            tokio::task::spawn_blocking(move || recognize_payload(&recognizer, &request.image))
                .await
                .unwrap_or_else(|e| Err(RecognizeError::Classifier(e.into())))
        }
        Err(rejection) => Err(RecognizeError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(report) => {
            info!(digit = report.digit, confidence = report.confidence, "prediction served");
            Ok(Json(report))
        }
        Err(e) => {
            warn!("prediction rejected: {}", e);
            Err(e)
        }
    }
}

/// Decode a (data-URL or bare) base64 image and recognize it
pub fn recognize_payload(
    recognizer: &Recognizer,
    payload: &str,
) -> Result<PredictionReport, RecognizeError> {
    let encoded = strip_data_url(payload);
    let bytes = STANDARD.decode(encoded.trim())?;
    let buffer = image::load_from_memory(&bytes)?.to_luma8();
    let recognition = recognizer.recognize_buffer(&buffer)?;
    Ok(recognition.prediction.report())
}

/// Drop a `data:image/png;base64,` style header
fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data,
        None => payload,
    }
}
