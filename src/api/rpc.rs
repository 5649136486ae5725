// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, extract::State, http::StatusCode};

use crate::error::RpcError;
use crate::rpc::{RpcRequest, RpcResponse};
use crate::state::AppState;

/// JSON-RPC endpoint.
///
/// RPC errors are reported in the body with HTTP 200. A successful call
/// without a result answers 204.
#[utoipa::path(
    post,
    path = "/",
    tag = "RPC",
    request_body = RpcRequest,
    responses(
        (status = 200, description = "Call result or RPC error", body = RpcResponse),
        (status = 204, description = "Call succeeded without a result")
    )
)]
pub async fn call(State(state): State<AppState>, body: Bytes) -> RpcResponse {
    state.rpc.handle(&body).await
}

/// CORS preflight.
#[utoipa::path(
    options,
    path = "/",
    tag = "RPC",
    responses((status = 204, description = "Preflight accepted"))
)]
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any other HTTP method on the RPC endpoint.
pub async fn unsupported_method() -> RpcResponse {
    RpcResponse::error(0, RpcError::invalid_request("only POST http method is supported"))
}
