// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # JSON-RPC envelope
//!
//! Requests have the shape `{"method": "call", "params": [api, method, [args...]], "id": n}`.
//! Arguments are kept as raw JSON so that signed reads can hash them exactly
//! as they were sent.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::RpcError;

pub mod router;

pub use router::{ApiRouter, ApiRouterBuilder};

/// Outcome of an RPC handler. `Ok(None)` is a success without a result body.
pub type RpcResult = Result<Option<Value>, RpcError>;

pub type HandlerFuture = Pin<Box<dyn Future<Output = RpcResult> + Send>>;

/// Handler registered for one `(api, method)` route.
pub type ApiHandler = Arc<dyn Fn(RpcCall) -> HandlerFuture + Send + Sync>;

/// Box an async closure into an [`ApiHandler`].
pub fn handler<F, Fut>(f: F) -> ApiHandler
where
    F: Fn(RpcCall) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcResult> + Send + 'static,
{
    Arc::new(move |call| -> HandlerFuture { Box::pin(f(call)) })
}

/// Serialize a handler result into the response `result` field.
pub fn to_result<T: Serialize>(value: &T) -> RpcResult {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| RpcError::internal(format!("failed to encode result: {e}")))
}

/// Incoming RPC request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RpcRequest {
    #[serde(default)]
    pub method: String,
    #[schema(value_type = Vec<Object>)]
    pub params: RpcParams,
    #[serde(default)]
    pub id: u64,
}

/// `[api, method, args]` triple.
#[derive(Debug, Default)]
pub struct RpcParams {
    pub api: String,
    pub method: String,
    pub args: Vec<Box<RawValue>>,
}

impl<'de> Deserialize<'de> for RpcParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = Vec::<Box<RawValue>>::deserialize(deserializer)?;
        let [api, method, args]: [Box<RawValue>; 3] = parts
            .try_into()
            .map_err(|parts: Vec<_>| de::Error::custom(format!("wrong number args: {} != 3", parts.len())))?;

        let args: Option<Vec<Box<RawValue>>> =
            serde_json::from_str(args.get()).map_err(de::Error::custom)?;

        Ok(Self {
            api: serde_json::from_str(api.get()).map_err(de::Error::custom)?,
            method: serde_json::from_str(method.get()).map_err(de::Error::custom)?,
            args: args.unwrap_or_default(),
        })
    }
}

/// A parsed call as seen by handlers.
#[derive(Debug)]
pub struct RpcCall {
    pub id: u64,
    pub api: String,
    pub method: String,
    pub args: Vec<Box<RawValue>>,
}

impl RpcCall {
    pub fn new(id: u64, params: RpcParams) -> Self {
        Self {
            id,
            api: params.api,
            method: params.method,
            args: params.args,
        }
    }

    /// Raw JSON of argument `at`.
    pub fn raw_param(&self, at: usize) -> Result<&RawValue, RpcError> {
        self.args
            .get(at)
            .map(|raw| raw.as_ref())
            .ok_or_else(|| RpcError::invalid_parameter(format!("no params at index {at}")))
    }

    /// Decode argument `at`.
    pub fn param<T: DeserializeOwned>(&self, at: usize) -> Result<T, RpcError> {
        let raw = self.raw_param(at)?;
        serde_json::from_str(raw.get()).map_err(|e| RpcError::invalid_parameter(e.to_string()))
    }
}

/// Outgoing RPC response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RpcResponse {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn from_result(id: u64, result: RpcResult) -> Self {
        match result {
            Ok(result) => Self {
                id,
                result,
                error: None,
            },
            Err(error) => Self::error(id, error),
        }
    }

    pub fn error(id: u64, error: RpcError) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }

    /// A success without a result body.
    pub fn no_content(id: u64) -> Self {
        Self {
            id,
            result: None,
            error: None,
        }
    }

    pub fn is_no_content(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }
}

impl IntoResponse for RpcResponse {
    fn into_response(self) -> Response {
        if self.is_no_content() {
            return StatusCode::NO_CONTENT.into_response();
        }
        (StatusCode::OK, Json(self)).into_response()
    }
}
