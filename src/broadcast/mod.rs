// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Broadcast
//!
//! Signed transactions carrying exactly one blog operation.
//!
//! - `optype` - operation type registry (tags and chain codes)
//! - `encoding` - canonical binary encoding used for signing
//! - `operation` - operation bodies, decoding and field rules
//! - `transaction` - transaction envelope and shape rules
//! - `router` - authentication pipeline and handler dispatch

pub mod encoding;
pub mod operation;
pub mod optype;
pub mod router;
pub mod transaction;

pub use operation::{KnownOperation, Operation};
pub use optype::OpType;
pub use router::{BroadcastResponse, RouterConfigError, TransactionRouter, TransactionRouterBuilder};
pub use transaction::{ChainTime, Transaction};
