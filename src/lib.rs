// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scorum Blog Gateway - signed-operation RPC gateway
//!
//! Accepts JSON-RPC calls, authenticates blockchain-signed transactions and
//! queries against the account keys held by a Scorum node, and dispatches
//! them to the blog's business handlers.
//!
//! ## Modules
//!
//! - `api` - HTTP surface (Axum): RPC endpoint, health checks, OpenAPI docs
//! - `auth` - digests, signature recovery, authority lookup
//! - `broadcast` - operation model, canonical encoding, transaction router
//! - `rpc` - JSON-RPC envelope and `(api, method)` dispatch
//! - `service` - route wiring over the in-memory store
//! - `store` - in-memory blog state and business rules

pub mod api;
pub mod auth;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rpc;
pub mod service;
pub mod state;
pub mod store;
