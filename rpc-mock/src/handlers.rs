/// Axum HTTP handlers: JSON-RPC endpoint plus scripting helpers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::node::SharedNode;
use crate::types::*;

/// Shared application state
pub type AppState = SharedNode;

/// Custom error type for handlers
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, message).into_response()
    }
}

/// POST /
/// JSON-RPC 2.0; errors are reported in the response body with HTTP 200
pub async fn json_rpc(
    State(node): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    let result = node.handle(&request.method, &request.params);
    if let Err(e) = &result {
        log::debug!("{} failed: {}", request.method, e);
    }
    Json(JsonRpcResponse::from_result(request.id, result))
}

// ============================================================================
// SCRIPTING ENDPOINTS (not part of the Ethereum JSON-RPC API)
// ============================================================================

/// POST /mock/call
/// Register an `eth_call` result or error
pub async fn stub_call(
    State(node): State<AppState>,
    Json(stub): Json<CallStub>,
) -> Result<StatusCode, ApiError> {
    match (stub.result, stub.error) {
        (Some(result), None) => node.set_call_result(&stub.to, &stub.data, result),
        (None, Some(error)) => node.set_call_error(&stub.to, &stub.data, error),
        _ => {
            return Err(ApiError::BadRequest(
                "exactly one of 'result' or 'error' is required".to_string(),
            ))
        }
    }
    log::info!("Stubbed call {} {}", stub.to, stub.data);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /mock/log
/// Append an event log
pub async fn stub_log(
    State(node): State<AppState>,
    Json(log_entry): Json<MockLog>,
) -> StatusCode {
    log::info!("Added log in block {}", log_entry.block_number);
    node.add_log(log_entry);
    StatusCode::NO_CONTENT
}

/// POST /mock/block
/// Pin a block timestamp
pub async fn stub_block(
    State(node): State<AppState>,
    Json(block): Json<BlockStub>,
) -> StatusCode {
    node.set_block_timestamp(block.number, block.timestamp);
    StatusCode::NO_CONTENT
}

/// GET /mock/transactions
/// Transactions accepted so far
pub async fn sent_transactions(State(node): State<AppState>) -> Json<Vec<SentTransaction>> {
    Json(node.sent_transactions())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
