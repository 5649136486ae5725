// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::ChainClient;
use crate::rpc::ApiRouter;

#[derive(Clone)]
pub struct AppState {
    /// Frozen RPC dispatch table.
    pub rpc: Arc<ApiRouter>,
    /// Blockchain node pinged by the readiness check. `None` skips the check.
    pub chain: Option<ChainClient>,
}

impl AppState {
    pub fn new(rpc: ApiRouter, chain: Option<ChainClient>) -> Self {
        Self {
            rpc: Arc::new(rpc),
            chain,
        }
    }
}
