// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Authorities
//!
//! An account may sign with any key from its owner, active or posting
//! authority. Keys are fetched fresh for every authentication attempt through
//! an [`AuthorityResolver`]; nothing is cached.
//!
//! On-chain keys are strings of the form `SCR<base58(compressed_key || checksum)>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::signature::PublicKey;

/// Prefix of every public key string on the chain.
pub const KEY_PREFIX: &str = "SCR";

/// Trailing checksum bytes of a decoded key string.
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    #[error("account not found")]
    AccountNotFound,

    #[error("{0} is not a valid key")]
    InvalidKey(String),

    #[error("no signing keys")]
    NoSigningKeys,

    #[error("authority lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("authority lookup cancelled")]
    Cancelled,

    /// Transport or node failure. The detail is for logs only.
    #[error("blockchain node unavailable")]
    Unavailable(String),
}

/// Public keys of an account's three authority levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityKeySet {
    pub owner: Vec<PublicKey>,
    pub active: Vec<PublicKey>,
    pub posting: Vec<PublicKey>,
}

impl AuthorityKeySet {
    pub fn is_empty(&self) -> bool {
        self.owner.is_empty() && self.active.is_empty() && self.posting.is_empty()
    }

    /// Union of all three levels.
    pub fn all(&self) -> Vec<PublicKey> {
        self.owner
            .iter()
            .chain(&self.active)
            .chain(&self.posting)
            .copied()
            .collect()
    }
}

/// Parse one `SCR...` key string into its raw compressed key.
pub fn parse_key(key: &str) -> Result<PublicKey, AuthorityError> {
    let invalid = || AuthorityError::InvalidKey(key.to_string());

    let encoded = key.strip_prefix(KEY_PREFIX).ok_or_else(invalid)?;
    let decoded = bs58::decode(encoded).into_vec().map_err(|_| invalid())?;
    let body_len = decoded.len().checked_sub(CHECKSUM_LEN).ok_or_else(invalid)?;

    PublicKey::from_bytes(&decoded[..body_len]).map_err(|_| invalid())
}

/// Parse every key string of one authority level.
pub fn extract_keys<'a, I>(keys: I) -> Result<Vec<PublicKey>, AuthorityError>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter().map(parse_key).collect()
}

/// Source of account authority keys (the blockchain read API).
#[async_trait]
pub trait AuthorityResolver: Send + Sync {
    async fn resolve(&self, account: &str) -> Result<AuthorityKeySet, AuthorityError>;
}

/// Resolver wrapper bounding every lookup by a deadline and the service
/// shutdown token.
#[derive(Clone)]
pub struct BoundedResolver {
    inner: Arc<dyn AuthorityResolver>,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl BoundedResolver {
    pub fn new(
        inner: Arc<dyn AuthorityResolver>,
        timeout: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            inner,
            timeout,
            shutdown,
        }
    }

    /// Resolve the keys of `account`. An empty key set is an error.
    pub async fn resolve(&self, account: &str) -> Result<AuthorityKeySet, AuthorityError> {
        let keys = tokio::select! {
            _ = self.shutdown.cancelled() => return Err(AuthorityError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.inner.resolve(account)) => match res {
                Ok(keys) => keys?,
                Err(_) => return Err(AuthorityError::Timeout(self.timeout)),
            },
        };

        if keys.is_empty() {
            return Err(AuthorityError::NoSigningKeys);
        }

        Ok(keys)
    }
}
