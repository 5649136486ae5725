// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain read API client.
//!
//! Talks JSON-RPC over HTTP to a Scorum node and exposes the account
//! authorities as an [`AuthorityResolver`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::authority::{extract_keys, AuthorityError, AuthorityKeySet, AuthorityResolver};

/// Per-request HTTP timeout. Authority lookups are additionally bounded by
/// the service deadline.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC request to the node.
#[derive(Debug, Serialize)]
struct NodeRequest<'a> {
    id: u64,
    method: &'static str,
    params: (&'a str, &'a str, Value),
}

#[derive(Debug, Deserialize)]
struct NodeError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct NodeResponse<T> {
    result: Option<T>,
    error: Option<NodeError>,
}

#[derive(Debug, Default, Deserialize)]
struct Authority {
    #[serde(default)]
    key_auths: Vec<(String, Value)>,
}

impl Authority {
    fn keys(&self) -> impl Iterator<Item = &str> {
        self.key_auths.iter().map(|(key, _weight)| key.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct Account {
    #[serde(default)]
    owner: Authority,
    #[serde(default)]
    active: Authority,
    #[serde(default)]
    posting: Authority,
}

/// HTTP JSON-RPC client of a Scorum node.
#[derive(Clone)]
pub struct ChainClient {
    url: String,
    client: reqwest::Client,
}

impl ChainClient {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            url: url.into(),
            client: reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        api: &str,
        method: &str,
        args: Value,
    ) -> Result<T, AuthorityError> {
        let request = NodeRequest {
            id: 1,
            method: "call",
            params: (api, method, args),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthorityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthorityError::Unavailable(format!(
                "HTTP {} from blockchain node",
                response.status()
            )));
        }

        let body: NodeResponse<T> = response
            .json()
            .await
            .map_err(|e| AuthorityError::Unavailable(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(AuthorityError::Unavailable(format!(
                "{api}.{method} failed ({}): {}",
                err.code, err.message
            )));
        }

        body.result.ok_or_else(|| {
            AuthorityError::Unavailable(format!("{api}.{method} returned no result"))
        })
    }

    /// Reachability check used by the readiness check.
    pub async fn ping(&self) -> Result<(), AuthorityError> {
        self.call::<Value>("database_api", "get_dynamic_global_properties", json!([]))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl AuthorityResolver for ChainClient {
    async fn resolve(&self, account: &str) -> Result<AuthorityKeySet, AuthorityError> {
        let accounts: Vec<Account> = self
            .call("database_api", "get_accounts", json!([[account]]))
            .await?;

        let account = accounts
            .into_iter()
            .next()
            .ok_or(AuthorityError::AccountNotFound)?;

        Ok(AuthorityKeySet {
            owner: extract_keys(account.owner.keys())?,
            active: extract_keys(account.active.keys())?,
            posting: extract_keys(account.posting.keys())?,
        })
    }
}
