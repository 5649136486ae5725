// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed transaction envelope.
//!
//! Shape rules are checked before any cryptographic work:
//! - `expiration` must be present,
//! - exactly one operation,
//! - at least one signature and no empty signature.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::encoding::TransactionEncoder;
use super::operation::{Operation, UnencodableOperation};

/// Wire format of chain timestamps (UTC, second precision, no zone suffix).
pub const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Chain timestamp: unix seconds that fit in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainTime(pub u32);

impl ChainTime {
    pub fn from_unix(secs: u32) -> Self {
        Self(secs)
    }

    pub fn unix(self) -> u32 {
        self.0
    }

    /// Parse a `YYYY-MM-DDTHH:MM:SS` string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let naive = NaiveDateTime::parse_from_str(s, CHAIN_TIME_FORMAT)
            .map_err(|e| format!("invalid chain time {s:?}: {e}"))?;
        let secs = naive.and_utc().timestamp();
        u32::try_from(secs)
            .map(Self)
            .map_err(|_| format!("chain time {s:?} is out of range"))
    }
}

impl fmt::Display for ChainTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(i64::from(self.0), 0) {
            Some(dt) => write!(f, "{}", dt.format(CHAIN_TIME_FORMAT)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for ChainTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ChainTime::parse(&s).map_err(de::Error::custom)
    }
}

/// Structural violation of the transaction envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("transaction is invalid: expiration is required")]
    MissingExpiration,

    #[error("only one operation per transaction supported")]
    OperationCount(usize),

    #[error("transaction is invalid: signatures are required")]
    NoSignatures,

    #[error("transaction is invalid: signature {0} is empty")]
    EmptySignature(usize),
}

/// Failure to produce the canonical byte form of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SerializeError {
    #[error("expiration should not be empty")]
    MissingExpiration,

    #[error(transparent)]
    Operation(#[from] UnencodableOperation),
}

/// Transaction as submitted by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub ref_block_num: u16,
    #[serde(default)]
    pub ref_block_prefix: u32,
    #[serde(default)]
    pub expiration: Option<ChainTime>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub signatures: Vec<String>,
}

impl Transaction {
    /// Check the structural rules.
    pub fn validate_shape(&self) -> Result<(), ShapeError> {
        if self.expiration.is_none() {
            return Err(ShapeError::MissingExpiration);
        }

        if self.operations.len() != 1 {
            return Err(ShapeError::OperationCount(self.operations.len()));
        }

        if self.signatures.is_empty() {
            return Err(ShapeError::NoSignatures);
        }

        if let Some(index) = self.signatures.iter().position(String::is_empty) {
            return Err(ShapeError::EmptySignature(index));
        }

        Ok(())
    }

    /// The single operation of a shape-validated transaction.
    pub fn operation(&self) -> Option<&Operation> {
        match self.operations.as_slice() {
            [op] => Some(op),
            _ => None,
        }
    }

    /// Append the canonical encoding of the unsigned part of the transaction.
    ///
    /// Signatures are not part of the encoding.
    pub fn encode_into(&self, enc: &mut TransactionEncoder) -> Result<(), SerializeError> {
        let expiration = self.expiration.ok_or(SerializeError::MissingExpiration)?;

        enc.encode_u16(self.ref_block_num);
        enc.encode_u32(self.ref_block_prefix);
        enc.encode_u32(expiration.unix());

        enc.encode_uvarint(self.operations.len() as u64);
        for op in &self.operations {
            op.encode_into(enc)?;
        }

        // extensions
        enc.encode_uvarint(0);
        Ok(())
    }

    /// Unsigned canonical bytes, without the chain prefix.
    #[cfg(test)]
    fn serialize(&self) -> Result<Vec<u8>, SerializeError> {
        let mut enc = TransactionEncoder::new();
        self.encode_into(&mut enc)?;
        Ok(enc.into_bytes())
    }
}
