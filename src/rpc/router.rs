// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `(api, method)` dispatch table.
//!
//! Routes are registered on an [`ApiRouterBuilder`] and frozen into an
//! [`ApiRouter`] before the server starts accepting requests.

use std::collections::HashMap;
use std::future::Future;

use tracing::Instrument;

use super::{handler, ApiHandler, RpcCall, RpcRequest, RpcResponse, RpcResult};
use crate::error::{ErrorCode, RpcError};

/// Method every request envelope must carry.
pub const CALL_METHOD: &str = "call";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Route {
    api: String,
    method: String,
}

#[derive(Default)]
pub struct ApiRouterBuilder {
    routes: HashMap<Route, ApiHandler>,
}

impl ApiRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already boxed handler. A later registration of the same
    /// route replaces the earlier one.
    pub fn route_handler(mut self, api: &str, method: &str, h: ApiHandler) -> Self {
        self.routes.insert(
            Route {
                api: api.to_string(),
                method: method.to_string(),
            },
            h,
        );
        self
    }

    pub fn route<F, Fut>(self, api: &str, method: &str, f: F) -> Self
    where
        F: Fn(RpcCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RpcResult> + Send + 'static,
    {
        self.route_handler(api, method, handler(f))
    }

    pub fn build(self) -> ApiRouter {
        ApiRouter {
            routes: self.routes,
        }
    }
}

/// Immutable dispatch table.
pub struct ApiRouter {
    routes: HashMap<Route, ApiHandler>,
}

impl ApiRouter {
    pub fn builder() -> ApiRouterBuilder {
        ApiRouterBuilder::new()
    }

    #[cfg(test)]
    fn contains(&self, api: &str, method: &str) -> bool {
        self.routes.contains_key(&Route {
            api: api.to_string(),
            method: method.to_string(),
        })
    }

    /// Parse a request body and dispatch it.
    pub async fn handle(&self, body: &[u8]) -> RpcResponse {
        let request: RpcRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                return respond(
                    0,
                    Err(RpcError::invalid_request(format!(
                        "message body is not an rpc request: {e}"
                    ))),
                )
            }
        };

        let id = request.id;
        if request.method != CALL_METHOD {
            return respond(
                id,
                Err(RpcError::invalid_request("rpc request method should be call")),
            );
        }

        let call = RpcCall::new(id, request.params);
        let result = self.dispatch(call).await;
        respond(id, result)
    }

    /// Dispatch an already parsed call.
    pub async fn dispatch(&self, call: RpcCall) -> RpcResult {
        let route = Route {
            api: call.api.clone(),
            method: call.method.clone(),
        };

        let Some(h) = self.routes.get(&route) else {
            return Err(RpcError::route_not_registered(format!(
                "route: {}.{} not registered",
                route.api, route.method
            )));
        };

        let span = tracing::debug_span!("rpc", api = %route.api, method = %route.method, id = call.id);
        h(call).instrument(span).await
    }
}

fn respond(id: u64, result: RpcResult) -> RpcResponse {
    if let Err(err) = &result {
        if err.is(ErrorCode::InternalError) {
            tracing::error!(id, code = err.code, message = %err.message, "rpc call failed");
        } else {
            tracing::debug!(id, code = err.code, message = %err.message, "rpc call rejected");
        }
    }
    RpcResponse::from_result(id, result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::ErrorCode;

    fn router() -> ApiRouter {
        ApiRouter::builder()
            .route("test_api", "echo", |call: RpcCall| async move {
                call.param::<serde_json::Value>(0).map(Some)
            })
            .route("test_api", "nothing", |_call: RpcCall| async { Ok(None) })
            .route("test_api", "fail", |_call: RpcCall| async {
                Err(RpcError::new(ErrorCode::DraftNotFound, "draft not found"))
            })
            .build()
    }

    #[tokio::test]
    async fn dispatches_registered_route() {
        let response = router()
            .handle(br#"{"method": "call", "params": ["test_api", "echo", [{"x": 1}]], "id": 9}"#)
            .await;
        assert_eq!(response.id, 9);
        assert_eq!(response.result, Some(json!({"x": 1})));
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn unregistered_route() {
        let response = router()
            .handle(br#"{"method": "call", "params": ["test_api", "missing", []], "id": 2}"#)
            .await;
        let err = response.error.unwrap();
        assert!(err.is(ErrorCode::RouteNotRegistered));
        assert_eq!(err.message, "route: test_api.missing not registered");
    }

    #[tokio::test]
    async fn method_must_be_call() {
        let response = router()
            .handle(br#"{"method": "notify", "params": ["test_api", "echo", [1]], "id": 4}"#)
            .await;
        assert_eq!(response.id, 4);
        let err = response.error.unwrap();
        assert!(err.is(ErrorCode::InvalidRequest));
        assert_eq!(err.message, "rpc request method should be call");
    }

    #[tokio::test]
    async fn malformed_body() {
        let response = router().handle(b"not json").await;
        assert_eq!(response.id, 0);
        let err = response.error.unwrap();
        assert!(err.is(ErrorCode::InvalidRequest));
        assert!(err.message.starts_with("message body is not an rpc request: "));
    }

    #[tokio::test]
    async fn business_errors_are_forwarded() {
        let response = router()
            .handle(br#"{"method": "call", "params": ["test_api", "fail", []], "id": 1}"#)
            .await;
        assert_eq!(
            response.error,
            Some(RpcError::new(ErrorCode::DraftNotFound, "draft not found"))
        );
    }

    #[tokio::test]
    async fn empty_result_is_no_content() {
        let response = router()
            .handle(br#"{"method": "call", "params": ["test_api", "nothing", []], "id": 1}"#)
            .await;
        assert!(response.is_no_content());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let router = ApiRouter::builder()
            .route("a", "b", |_call: RpcCall| async { Ok(None) })
            .route("a", "b", |_call: RpcCall| async { Ok(Some(json!(1))) })
            .build();
        assert!(router.contains("a", "b"));
        assert!(!router.contains("a", "c"));
    }
}
