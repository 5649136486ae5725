// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signed reads
//!
//! Reads that need proof of identity without a full transaction take the
//! arguments `[account, salt, signature, [params...]]`. The signature covers
//! the chain id, the account, the salt and the raw JSON of every param.
//!
//! The salt is not tracked; replay protection is up to the caller.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use super::authority::{AuthorityError, BoundedResolver};
use super::digest::{signed_query_digest, ChainId};
use super::signature::verify_any;
use crate::error::RpcError;
use crate::rpc::{handler, ApiHandler, RpcCall, RpcResult};

/// An authenticated read, handed to the wrapped handler.
#[derive(Debug)]
pub struct SignedCall {
    pub id: u64,
    /// Account whose key signed the request.
    pub account: String,
    pub params: Vec<Box<RawValue>>,
}

impl SignedCall {
    /// Decode forwarded param `at`.
    pub fn param<T: DeserializeOwned>(&self, at: usize) -> Result<T, RpcError> {
        let raw = self
            .params
            .get(at)
            .ok_or_else(|| RpcError::invalid_parameter(format!("no params at index {at}")))?;
        serde_json::from_str(raw.get()).map_err(|e| RpcError::invalid_parameter(e.to_string()))
    }
}

#[derive(Clone)]
pub struct SignedQueryAuthenticator {
    chain: ChainId,
    resolver: BoundedResolver,
}

impl SignedQueryAuthenticator {
    pub fn new(chain: ChainId, resolver: BoundedResolver) -> Self {
        Self { chain, resolver }
    }

    /// Verify the signed-read arguments of `call`.
    pub async fn authenticate(&self, call: RpcCall) -> Result<SignedCall, RpcError> {
        let account: String = call.param(0)?;
        let salt: String = call.param(1)?;
        let signature: String = call.param(2)?;
        let params: Vec<Box<RawValue>> = call.param(3)?;

        let keys = self.resolver.resolve(&account).await.map_err(|e| {
            match &e {
                AuthorityError::Unavailable(_) | AuthorityError::Timeout(_) => {
                    tracing::warn!(%account, error = ?e, "authority lookup failed")
                }
                _ => tracing::debug!(%account, error = %e, "authority lookup rejected"),
            }
            RpcError::invalid_parameter(e.to_string())
        })?;

        let digest = signed_query_digest(&self.chain, &account, &salt, &params);
        if !verify_any(&keys.all(), &signature, &digest) {
            return Err(RpcError::invalid_parameter("signature is not valid"));
        }

        Ok(SignedCall {
            id: call.id,
            account,
            params,
        })
    }

    /// Wrap `f` so that it only runs for authenticated calls.
    pub fn authenticate_and_call<F, Fut>(&self, f: F) -> ApiHandler
    where
        F: Fn(SignedCall) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RpcResult> + Send + 'static,
    {
        let auth = self.clone();
        let f = Arc::new(f);
        handler(move |call: RpcCall| {
            let auth = auth.clone();
            let f = Arc::clone(&f);
            async move {
                let signed = auth.authenticate(call).await?;
                f(signed).await
            }
        })
    }
}
