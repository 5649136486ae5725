// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    broadcast::BroadcastResponse,
    error::RpcError,
    models::{
        Category, Downvote, DownvoteReason, Draft, ExtendedProfile, Media, Notification,
        NotificationKind, PostId, Profile, ProfileSettings,
    },
    rpc::{RpcRequest, RpcResponse},
    state::AppState,
};

pub mod health;
pub mod rpc;

pub fn router(state: AppState, max_request_size: usize) -> Router {
    Router::new()
        .route(
            "/",
            post(rpc::call)
                .options(rpc::preflight)
                .fallback(rpc::unsupported_method),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/version", get(health::version))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_request_size))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        rpc::call,
        rpc::preflight,
        health::health,
        health::liveness,
        health::readiness,
        health::version
    ),
    components(
        schemas(
            RpcRequest,
            RpcResponse,
            RpcError,
            BroadcastResponse,
            Profile,
            ExtendedProfile,
            ProfileSettings,
            Media,
            Draft,
            Category,
            Notification,
            NotificationKind,
            PostId,
            Downvote,
            DownvoteReason,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            health::VersionResponse
        )
    ),
    tags(
        (name = "RPC", description = "JSON-RPC calls and signed transaction broadcast"),
        (name = "Health", description = "Probes and build information")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::authority::test_resolver::{bounded, StaticResolver};
    use crate::auth::ChainId;
    use crate::error::ErrorCode;
    use crate::service::api_router;
    use crate::store::InMemoryStore;

    fn app(max_request_size: usize) -> Router {
        let store = InMemoryStore::default().shared();
        let resolver = bounded(Arc::new(StaticResolver::new()));
        let rpc = api_router(&store, ChainId::mainnet(), resolver).unwrap();
        router(AppState::new(rpc, None), max_request_size)
    }

    async fn send(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let _ = app(1024).into_make_service();
    }

    #[tokio::test]
    async fn rpc_errors_are_reported_with_http_200() {
        let body = json!({"method": "call", "params": ["nope_api", "nope", []], "id": 5});
        let (status, bytes) = send(app(1024), Method::POST, "/", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["error"]["code"], ErrorCode::RouteNotRegistered.as_i32());
    }

    #[tokio::test]
    async fn public_read_over_http() {
        let body = json!({"method": "call", "params": ["blacklist_api", "is_blacklisted", ["alice", "hello-world"]], "id": 1});
        let (status, bytes) = send(app(1024), Method::POST, "/", body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["result"], json!(false));
    }

    #[tokio::test]
    async fn only_post_is_supported() {
        let (status, bytes) = send(app(1024), Method::GET, "/", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], ErrorCode::InvalidRequest.as_i32());
        assert_eq!(value["error"]["message"], "only POST http method is supported");

        let (status, _) = send(app(1024), Method::OPTIONS, "/", Body::empty()).await;
        assert!(status.is_success());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let body = "x".repeat(2048);
        let (status, _) = send(app(1024), Method::POST, "/", body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn health_without_blockchain_check() {
        let (status, bytes) = send(app(1024), Method::GET, "/health/ready", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "ok");
        assert!(value["checks"].get("blockchain").is_none());

        let (status, _) = send(app(1024), Method::GET, "/health/live", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn version_reports_package() {
        let (_, bytes) = send(app(1024), Method::GET, "/version", Body::empty()).await;
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["name"], env!("CARGO_PKG_NAME"));
    }
}
