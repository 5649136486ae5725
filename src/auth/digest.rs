// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Digests that signatures are computed over.
//!
//! Both recipes hash the raw chain id followed by a canonical encoding, so a
//! signature made for one network never verifies on another.

use std::fmt;

use serde_json::value::RawValue;
use sha2::{Digest as _, Sha256};

use crate::broadcast::encoding::TransactionEncoder;
use crate::broadcast::transaction::{SerializeError, Transaction};

/// SHA-256 output.
pub type Digest = [u8; 32];

/// Scorum mainnet chain id.
pub const MAINNET_CHAIN_ID: &str =
    "db4007d45f04c1403a7e66a5c66b5b1cdfc2dde8b5335d1d2f116d592ca3dbb1";

/// Scorum testnet chain id.
pub const TESTNET_CHAIN_ID: &str =
    "d3c1f19a4947c296446583f988c43fd1a83818fabaf3454a0020198cb361ebd2";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainIdError {
    #[error("chain id is not hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("chain id must be 32 bytes, got {0}")]
    Length(usize),
}

/// Raw chain id, decoded once at startup.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId([u8; 32]);

impl ChainId {
    pub fn from_hex(s: &str) -> Result<Self, ChainIdError> {
        let bytes = hex::decode(s)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| ChainIdError::Length(len))
    }

    pub fn mainnet() -> Self {
        Self(hex_literal(MAINNET_CHAIN_ID))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", hex::encode(self.0))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

// Only used for the compiled-in constants above.
fn hex_literal(s: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    if hex::decode_to_slice(s, &mut out).is_err() {
        unreachable!("chain id constants are valid hex");
    }
    out
}

/// `SHA256(chain_id || serialize(tx))`.
pub fn transaction_digest(chain: &ChainId, tx: &Transaction) -> Result<Digest, SerializeError> {
    let mut enc = TransactionEncoder::with_prefix(chain.as_bytes());
    tx.encode_into(&mut enc)?;
    Ok(Sha256::digest(enc.as_bytes()).into())
}

/// `SHA256(chain_id || str(account) || str(salt) || str(hex(param_1)) || ...)`.
///
/// Each param contributes its raw JSON bytes exactly as received.
pub fn signed_query_digest(
    chain: &ChainId,
    account: &str,
    salt: &str,
    params: &[Box<RawValue>],
) -> Digest {
    let mut enc = TransactionEncoder::with_prefix(chain.as_bytes());
    enc.encode_str(account);
    enc.encode_str(salt);
    for param in params {
        enc.encode_str(&hex::encode(param.get()));
    }
    Sha256::digest(enc.as_bytes()).into()
}
