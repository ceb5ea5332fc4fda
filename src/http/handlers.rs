//! Relay handlers.
//!
//! `fetch_canvas` passes the backend grid through byte-for-byte.
//! `submit_draw` turns the `myData` form field into a JSON request to the
//! backend and redirects the browser to the dashboard once it is accepted.

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::http::error::RelayError;
use crate::http::request::RequestId;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Where the browser is sent after a successful draw.
pub const DASHBOARD_PATH: &str = "/dashboard/";

/// Content type of relayed canvas data.
pub const CANVAS_CONTENT_TYPE: &str = "application/octet-stream";

/// Form posted by the drawing page.
#[derive(Debug, Deserialize)]
pub struct DrawForm {
    #[serde(rename = "myData")]
    pub my_data: Option<String>,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /grid` (also served at `/canvas`)
pub async fn fetch_canvas(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let request_id = RequestId::from_headers(&headers);

    let response = match state.backend.fetch_grid(request_id.header_value()).await {
        Ok(grid) => {
            tracing::debug!(request_id = %request_id, bytes = grid.len(), "Relaying canvas");
            ([(header::CONTENT_TYPE, CANVAS_CONTENT_TYPE)], grid).into_response()
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Canvas fetch failed");
            let e = RelayError::from(e);
            log_backend_body(&request_id, &e);
            e.into_response()
        }
    };

    metrics::record_request("fetch_canvas", response.status().as_u16(), start);
    response
}

/// `POST /draw`
pub async fn submit_draw(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<DrawForm>, FormRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = RequestId::from_headers(&headers);

    let response = match relay_draw(&state, form, &request_id).await {
        Ok(()) => (StatusCode::FOUND, [(header::LOCATION, DASHBOARD_PATH)]).into_response(),
        Err(e) => {
            if e.status().is_client_error() {
                tracing::info!(request_id = %request_id, error = %e, "Rejected draw request");
            } else {
                tracing::warn!(request_id = %request_id, error = %e, "Draw relay failed");
                log_backend_body(&request_id, &e);
            }
            e.into_response()
        }
    };

    metrics::record_request("submit_draw", response.status().as_u16(), start);
    response
}

/// `GET /healthz`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn relay_draw(
    state: &AppState,
    form: Result<Form<DrawForm>, FormRejection>,
    request_id: &RequestId,
) -> Result<(), RelayError> {
    let Form(form) = form?;
    let payload = decode_draw_payload(form)?;

    tracing::debug!(request_id = %request_id, payload = %payload, "Forwarding draw");
    state
        .backend
        .submit_draw(&payload, request_id.header_value())
        .await?;
    Ok(())
}

fn log_backend_body(request_id: &RequestId, error: &RelayError) {
    if let Some(body) = error.backend_body() {
        tracing::debug!(
            request_id = %request_id,
            body = %String::from_utf8_lossy(body),
            "Backend error body"
        );
    }
}

/// Extract and parse `myData`. No schema is imposed on the JSON value.
pub fn decode_draw_payload(form: DrawForm) -> Result<Value, RelayError> {
    let raw = form.my_data.ok_or(RelayError::MissingField("myData"))?;
    Ok(serde_json::from_str(&raw)?)
}
