//! Echo endpoint

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{routing::post, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Echo request body; the body itself is optional
#[derive(Deserialize, Default)]
pub struct EchoRequest {
    pub message: Option<String>,
}

/// Echo response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub received: Option<String>,
    pub server_time: String,
}

/// POST /echo
async fn echo(body: Option<Json<EchoRequest>>) -> Json<EchoResponse> {
    let received = body
        .and_then(|Json(req)| req.message)
        // an empty message reads back as null
        .filter(|message| !message.is_empty());

    Json(EchoResponse {
        received,
        server_time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Any method other than POST
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// Echo routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/echo", post(echo).fallback(method_not_allowed))
}
