// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # RPC Error Model
//!
//! Every rejected call leaves the gateway as an [`RpcError`]: a stable numeric
//! code plus a human-readable message. Codes are part of the wire contract and
//! are never renumbered; new codes are only ever appended.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stable error codes carried in `error.code` of an RPC response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    InternalError = 1,
    RouteNotRegistered = 2,
    InvalidRequest = 3,
    InvalidParameter = 4,
    ProfileNotFound = 5,
    FollowsLimitReached = 6,
    ProfileAlreadyFollowed = 7,
    InvalidMedia = 8,
    InvalidMediaType = 9,
    MediaNotFound = 10,
    MediaAlreadyExists = 11,
    AccessDenied = 12,
    CategoryAlreadyExists = 13,
    ImageTooSmall = 14,
    CategoryNotFound = 15,
    DraftNotFound = 16,
    PlagiarismDetailsNotFound = 17,
    DownvoteNotFound = 18,
    BlacklistEntryNotFound = 19,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Error object of an RPC response.
///
/// Business handlers may return any code; the routers forward it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_i32(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameter, message)
    }

    pub fn route_not_registered(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RouteNotRegistered, message)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AccessDenied, message)
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code.as_i32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_code_and_message() {
        let internal = RpcError::internal("boom");
        assert_eq!(internal.code, 1);
        assert_eq!(internal.message, "boom");

        let bad = RpcError::invalid_request("bad");
        assert_eq!(bad.code, 3);
        assert!(bad.is(ErrorCode::InvalidRequest));

        let param = RpcError::invalid_parameter("param");
        assert_eq!(param.code, 4);

        let route = RpcError::route_not_registered("nope");
        assert_eq!(route.code, 2);
    }

    #[test]
    fn codes_are_frozen() {
        assert_eq!(ErrorCode::ProfileNotFound.as_i32(), 5);
        assert_eq!(ErrorCode::AccessDenied.as_i32(), 12);
        assert_eq!(ErrorCode::DraftNotFound.as_i32(), 16);
        assert_eq!(ErrorCode::BlacklistEntryNotFound.as_i32(), 19);
    }

    #[test]
    fn serializes_as_code_and_message() {
        let err = RpcError::new(ErrorCode::DraftNotFound, "draft not found");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":16,"message":"draft not found"}"#);
        assert_eq!(err.to_string(), "16: draft not found");
    }
}
