// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Router
//!
//! Authenticates a broadcast transaction and hands its single operation to
//! the handler registered for the operation type.
//!
//! ```text
//! Received -> Parsed -> ShapeValidated -> OperationKnown -> AuthorityResolved
//!          -> SignatureVerified -> FieldValidated -> Dispatched -> Responded
//! ```
//!
//! Every step either advances or ends the request with an error. No handler
//! runs before the signature and the fields have been checked.
//!
//! Handlers are registered on a [`TransactionRouterBuilder`]; building fails
//! unless every [`OpType`] has a handler.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::operation::{KnownOperation, Operation};
use super::optype::OpType;
use super::transaction::Transaction;
use crate::auth::authority::{AuthorityError, BoundedResolver};
use crate::auth::digest::{transaction_digest, ChainId};
use crate::auth::signature::verify_any;
use crate::error::RpcError;
use crate::rpc::{to_result, RpcCall, RpcResult};

pub type TransactionFuture = Pin<Box<dyn Future<Output = Result<(), RpcError>> + Send>>;

/// Business handler of one operation type.
pub type TransactionHandler = Arc<dyn Fn(Operation) -> TransactionFuture + Send + Sync>;

const NOT_VALID: &str = "transaction is not valid";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterConfigError {
    #[error("handlers are not registered for: {}", .0.iter().map(|op| op.as_str()).collect::<Vec<_>>().join(", "))]
    MissingHandlers(Vec<OpType>),
}

/// Acknowledgement of an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BroadcastResponse {
    /// Request id, as a string.
    pub id: String,
    pub block_num: u32,
    pub trx_num: u32,
    pub expired: bool,
}

impl BroadcastResponse {
    fn accepted(request_id: u64) -> Self {
        Self {
            id: request_id.to_string(),
            block_num: 0,
            trx_num: 0,
            expired: false,
        }
    }
}

#[derive(Default)]
pub struct TransactionRouterBuilder {
    handlers: HashMap<OpType, TransactionHandler>,
}

impl TransactionRouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler that receives the decoded [`Operation`].
    pub fn register<F, Fut>(mut self, op_type: OpType, f: F) -> Self
    where
        F: Fn(Operation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), RpcError>> + Send + 'static,
    {
        let h: TransactionHandler = Arc::new(move |op| -> TransactionFuture { Box::pin(f(op)) });
        self.handlers.insert(op_type, h);
        self
    }

    /// Register a handler that receives the typed body of `B`.
    pub fn on<B, F, Fut>(self, f: F) -> Self
    where
        B: KnownOperation,
        F: Fn(B) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), RpcError>> + Send + 'static,
    {
        self.register(B::TYPE, move |op: Operation| -> TransactionFuture {
            match B::try_from(op) {
                Ok(body) => Box::pin(f(body)),
                Err(op) => {
                    let tag = op.tag().to_string();
                    Box::pin(async move {
                        Err(RpcError::internal(format!(
                            "{tag} routed to {} handler",
                            B::TYPE
                        )))
                    })
                }
            }
        })
    }

    /// Freeze the handler table. Fails unless every operation type has a handler.
    pub fn build(
        self,
        chain: ChainId,
        resolver: BoundedResolver,
    ) -> Result<TransactionRouter, RouterConfigError> {
        let missing: Vec<OpType> = OpType::ALL
            .into_iter()
            .filter(|op| !self.handlers.contains_key(op))
            .collect();

        if !missing.is_empty() {
            return Err(RouterConfigError::MissingHandlers(missing));
        }

        Ok(TransactionRouter {
            chain,
            resolver,
            handlers: self.handlers,
        })
    }
}

pub struct TransactionRouter {
    chain: ChainId,
    resolver: BoundedResolver,
    handlers: HashMap<OpType, TransactionHandler>,
}

impl TransactionRouter {
    pub fn builder() -> TransactionRouterBuilder {
        TransactionRouterBuilder::new()
    }

    /// Route the transaction in argument 0 of `call`.
    pub async fn route(&self, call: RpcCall) -> RpcResult {
        let raw = call.raw_param(0)?;
        let mut tx: Transaction = serde_json::from_str(raw.get())
            .map_err(|e| RpcError::invalid_request(format!("transaction is malformed: {e}")))?;

        tx.validate_shape()
            .map_err(|e| RpcError::invalid_parameter(e.to_string()))?;

        let op = tx.operation().ok_or_else(|| {
            RpcError::invalid_parameter("only one operation per transaction supported")
        })?;
        let (op_type, account) = match (op.op_type(), op.account()) {
            (Some(op_type), Some(account)) => (op_type, account.to_string()),
            _ => {
                return Err(RpcError::invalid_parameter(format!(
                    "{} operation is unknown",
                    op.tag()
                )))
            }
        };

        let keys = self.resolver.resolve(&account).await.map_err(|e| {
            match &e {
                AuthorityError::Unavailable(_) | AuthorityError::Timeout(_) => {
                    tracing::warn!(%account, %op_type, error = ?e, "authority lookup failed")
                }
                _ => tracing::debug!(%account, %op_type, error = %e, "authority lookup rejected"),
            }
            RpcError::invalid_parameter(e.to_string())
        })?;

        let digest = transaction_digest(&self.chain, &tx).map_err(|e| {
            tracing::debug!(%op_type, error = %e, "transaction digest failed");
            RpcError::invalid_parameter(NOT_VALID)
        })?;

        // Only single-signature transactions are supported.
        let verified = match tx.signatures.as_slice() {
            [signature] => verify_any(&keys.all(), signature, &digest),
            _ => false,
        };
        if !verified {
            return Err(RpcError::invalid_parameter(NOT_VALID));
        }

        let op = tx.operations.remove(0);
        op.validate()
            .map_err(|e| RpcError::invalid_parameter(format!("invalid request: {e}")))?;

        let h = self.handlers.get(&op_type).ok_or_else(|| {
            RpcError::internal(format!("{op_type} handler is not registered"))
        })?;

        tracing::info!(%op_type, %account, id = call.id, "dispatching operation");
        h(op).await?;

        to_result(&BroadcastResponse::accepted(call.id))
    }
}


#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::test_support::*;
    use super::*;
    use crate::auth::authority::test_resolver::{bounded, StaticResolver};
    use crate::auth::authority::AuthorityKeySet;
    use crate::auth::digest::TESTNET_CHAIN_ID;
    use crate::auth::signature::test_keys::{public_key, sign, signing_key};
    use crate::broadcast::operation::FollowOperation;
    use crate::broadcast::transaction::ChainTime;
    use crate::error::ErrorCode;
    use crate::rpc::RpcRequest;

    fn testnet() -> ChainId {
        ChainId::from_hex(TESTNET_CHAIN_ID).unwrap()
    }

    fn resolver() -> Arc<StaticResolver> {
        Arc::new(
            StaticResolver::new()
                .with_posting_key("acc1", public_key(&signing_key(1)))
                .with_posting_key("admin", public_key(&signing_key(9))),
        )
    }

    fn router_on(chain: ChainId, recorder: &Recorder) -> TransactionRouter {
        recording_builder(recorder)
            .build(chain, bounded(resolver()))
            .unwrap()
    }

    fn follow(account: &str, target: &str) -> Operation {
        FollowOperation {
            account: account.into(),
            follow: target.into(),
        }
        .into()
    }

    /// Unsigned transaction carrying `ops`.
    fn tx_with(ops: Vec<Operation>) -> Transaction {
        Transaction {
            ref_block_num: 16,
            ref_block_prefix: 1234,
            expiration: Some(ChainTime::from_unix(1_600_000_000)),
            operations: ops,
            signatures: vec![],
        }
    }

    fn signed(mut tx: Transaction, signer: u8) -> Transaction {
        let digest = transaction_digest(&testnet(), &tx).unwrap();
        tx.signatures = vec![sign(&signing_key(signer), &digest)];
        tx
    }

    fn call_with(tx: &Value, id: u64) -> RpcCall {
        let body = json!({
            "method": "call",
            "params": ["network_broadcast_api", "broadcast_transaction_synchronous", [tx]],
            "id": id,
        });
        let request: RpcRequest = serde_json::from_str(&body.to_string()).unwrap();
        RpcCall::new(request.id, request.params)
    }

    fn call(tx: &Transaction, id: u64) -> RpcCall {
        call_with(&serde_json::to_value(tx).unwrap(), id)
    }

    #[tokio::test]
    async fn routes_valid_follow_to_handler() {
        let recorder = Recorder::default();
        let router = router_on(testnet(), &recorder);
        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 1);

        let result = router.route(call(&tx, 42)).await.unwrap();

        assert_eq!(
            result,
            Some(json!({"id": "42", "block_num": 0, "trx_num": 0, "expired": false}))
        );
        assert_eq!(recorder.count(OpType::Follow), 1);
        assert_eq!(recorder.total(), 1);
    }

    #[tokio::test]
    async fn other_chain_is_not_valid() {
        let recorder = Recorder::default();
        let router = router_on(ChainId::mainnet(), &recorder);
        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 1);

        let err = router.route(call(&tx, 1)).await.unwrap_err();

        assert!(err.is(ErrorCode::InvalidParameter));
        assert_eq!(err.message, "transaction is not valid");
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn wrong_signer_is_not_valid() {
        let recorder = Recorder::default();
        let router = router_on(testnet(), &recorder);
        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 2);

        let err = router.route(call(&tx, 1)).await.unwrap_err();
        assert_eq!(err.message, "transaction is not valid");
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn any_authority_level_may_sign() {
        let keys = AuthorityKeySet {
            owner: vec![public_key(&signing_key(4))],
            active: vec![public_key(&signing_key(5))],
            posting: vec![public_key(&signing_key(6))],
        };
        let resolver = Arc::new(StaticResolver::new().with_keys("acc1", keys));
        let recorder = Recorder::default();
        let router = recording_builder(&recorder)
            .build(testnet(), bounded(resolver))
            .unwrap();

        for (id, signer) in [(1, 4), (2, 5), (3, 6)] {
            let tx = signed(tx_with(vec![follow("acc1", "acc2")]), signer);
            assert!(router.route(call(&tx, id)).await.is_ok(), "key {signer}");
        }
        assert_eq!(recorder.count(OpType::Follow), 3);

        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 7);
        let err = router.route(call(&tx, 4)).await.unwrap_err();
        assert_eq!(err.message, "transaction is not valid");
        assert_eq!(recorder.total(), 3);
    }

    struct DownNode;

    #[async_trait::async_trait]
    impl crate::auth::AuthorityResolver for DownNode {
        async fn resolve(&self, _account: &str) -> Result<AuthorityKeySet, AuthorityError> {
            Err(AuthorityError::Unavailable(
                "error sending request for url (http://10.0.0.7:8090/)".to_string(),
            ))
        }
    }

    #[tokio::test]
    async fn node_failure_detail_is_not_returned() {
        let recorder = Recorder::default();
        let router = recording_builder(&recorder)
            .build(testnet(), bounded(Arc::new(DownNode)))
            .unwrap();
        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 1);

        let err = router.route(call(&tx, 1)).await.unwrap_err();

        assert!(err.is(ErrorCode::InvalidParameter));
        assert_eq!(err.message, "blockchain node unavailable");
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn unknown_operation_is_rejected_before_lookup() {
        let recorder = Recorder::default();
        let resolver = resolver();
        let router = recording_builder(&recorder)
            .build(testnet(), bounded(resolver.clone()))
            .unwrap();

        let tx = json!({
            "ref_block_num": 1,
            "ref_block_prefix": 2,
            "expiration": "2020-01-01T00:00:00",
            "operations": [["transfer", {"from": "acc1", "to": "acc2"}]],
            "signatures": ["00"]
        });
        let err = router.route(call_with(&tx, 1)).await.unwrap_err();

        assert!(err.is(ErrorCode::InvalidParameter));
        assert_eq!(err.message, "transfer operation is unknown");
        assert_eq!(resolver.calls(), 0);
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn shape_is_checked_before_crypto() {
        let recorder = Recorder::default();
        let resolver = resolver();
        let router = recording_builder(&recorder)
            .build(testnet(), bounded(resolver.clone()))
            .unwrap();

        let empty = signed(tx_with(vec![]), 1);
        let err = router.route(call(&empty, 1)).await.unwrap_err();
        assert_eq!(err.message, "only one operation per transaction supported");

        let two = signed(
            tx_with(vec![follow("acc1", "acc2"), follow("acc1", "acc3")]),
            1,
        );
        let err = router.route(call(&two, 1)).await.unwrap_err();
        assert_eq!(err.message, "only one operation per transaction supported");

        let unsigned = tx_with(vec![follow("acc1", "acc2")]);
        let err = router.route(call(&unsigned, 1)).await.unwrap_err();
        assert!(err.is(ErrorCode::InvalidParameter));
        assert!(err.message.starts_with("transaction is invalid"));

        let mut blank = tx_with(vec![follow("acc1", "acc2")]);
        blank.signatures = vec![String::new()];
        let err = router.route(call(&blank, 1)).await.unwrap_err();
        assert!(err.message.starts_with("transaction is invalid"));

        assert_eq!(resolver.calls(), 0);
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn multiple_signatures_are_not_valid() {
        let recorder = Recorder::default();
        let router = router_on(testnet(), &recorder);
        let mut tx = signed(tx_with(vec![follow("acc1", "acc2")]), 1);
        tx.signatures.push(tx.signatures[0].clone());

        let err = router.route(call(&tx, 1)).await.unwrap_err();
        assert_eq!(err.message, "transaction is not valid");
    }

    #[tokio::test]
    async fn malformed_transaction_is_invalid_request() {
        let router = router_on(testnet(), &Recorder::default());
        let err = router
            .route(call_with(&json!({"expiration": 5}), 1))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::InvalidRequest));

        let request: RpcRequest = serde_json::from_str(
            r#"{"method": "call", "params": ["network_broadcast_api", "broadcast_transaction_synchronous", []], "id": 1}"#,
        )
        .unwrap();
        let err = router
            .route(RpcCall::new(request.id, request.params))
            .await
            .unwrap_err();
        assert_eq!(err.message, "no params at index 0");
    }

    #[tokio::test]
    async fn unknown_account_is_invalid_parameter() {
        let recorder = Recorder::default();
        let router = router_on(testnet(), &recorder);
        let tx = signed(tx_with(vec![follow("ghost", "acc2")]), 1);

        let err = router.route(call(&tx, 1)).await.unwrap_err();
        assert!(err.is(ErrorCode::InvalidParameter));
        assert_eq!(err.message, "account not found");
    }

    #[tokio::test]
    async fn field_rules_run_after_signature() {
        let recorder = Recorder::default();
        let router = router_on(testnet(), &recorder);
        let tx = signed(tx_with(vec![follow("acc1", "acc1")]), 1);

        let err = router.route(call(&tx, 1)).await.unwrap_err();
        assert!(err.is(ErrorCode::InvalidParameter));
        assert!(err.message.starts_with("invalid request: follow"));
        assert_eq!(recorder.total(), 0);
    }

    #[tokio::test]
    async fn handler_errors_are_forwarded() {
        let router = recording_builder(&Recorder::default())
            .on(|_op: FollowOperation| async {
                Err(RpcError::new(ErrorCode::FollowsLimitReached, "follows limit reached"))
            })
            .build(testnet(), bounded(resolver()))
            .unwrap();
        let tx = signed(tx_with(vec![follow("acc1", "acc2")]), 1);

        let err = router.route(call(&tx, 1)).await.unwrap_err();
        assert_eq!(
            err,
            RpcError::new(ErrorCode::FollowsLimitReached, "follows limit reached")
        );
    }

    #[test]
    fn build_requires_every_handler() {
        let err = TransactionRouter::builder()
            .on(|_op: FollowOperation| async { Ok(()) })
            .build(testnet(), bounded(resolver()))
            .err()
            .unwrap();

        let RouterConfigError::MissingHandlers(missing) = &err;
        assert_eq!(missing.len(), OpType::ALL.len() - 1);
        assert!(!missing.contains(&OpType::Follow));
        assert!(err.to_string().contains("register"));
    }
}
