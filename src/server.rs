//! HTTP front end: `POST /` with a JSON receipt, answered with
//! `{"receipt-data": "<base64>"}`.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::{
    domain::repositories::receipt_repository::ReceiptRepository, errors::ReceiptForgeError,
    util::ReceiptForgeUtil,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptResponse {
    #[serde(rename = "receipt-data")]
    pub receipt_data: String,
}

pub fn router<R: ReceiptRepository + 'static>(forge: ReceiptForgeUtil<R>) -> Router {
    Router::new()
        .route("/", post(encode_receipt::<R>))
        .with_state(forge)
}

/// Binds `0.0.0.0:<port>` and serves until the process exits.
pub async fn serve<R: ReceiptRepository + 'static>(
    port: u16,
    forge: ReceiptForgeUtil<R>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;
    serve_on(listener, forge).await
}

pub async fn serve_on<R: ReceiptRepository + 'static>(
    listener: TcpListener,
    forge: ReceiptForgeUtil<R>,
) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "receipt forge listening");
    axum::serve(listener, router(forge)).await
}

async fn encode_receipt<R: ReceiptRepository + 'static>(
    State(forge): State<ReceiptForgeUtil<R>>,
    body: Bytes,
) -> Result<Json<ReceiptResponse>, ServerError> {
    let body_len = body.len();
    let receipt_data = tokio::task::spawn_blocking(move || forge.forge_json(&body))
        .await
        .map_err(|e| {
            error!(error = %e, "receipt forge task failed");
            ServerError(e.to_string())
        })??;
    info!(body_len, receipt_len = receipt_data.len(), "forged receipt");
    Ok(Json(ReceiptResponse { receipt_data }))
}

/// Any failure is reported as a 500 with the error message as plain text.
struct ServerError(String);

impl From<ReceiptForgeError> for ServerError {
    fn from(e: ReceiptForgeError) -> Self {
        error!(error = %e, debug = e.debug().unwrap_or_default(), "failed to forge receipt");
        ServerError(e.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.0).into_response()
    }
}
