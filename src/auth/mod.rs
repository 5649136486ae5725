// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Requests are authenticated by signatures over chain-bound digests, checked
//! against the keys an account publishes on the blockchain.
//!
//! ## Flow
//!
//! 1. Compute the digest (`digest`): transaction bytes or signed-read fields,
//!    prefixed with the chain id.
//! 2. Resolve the account authorities (`authority`, `chain_client`) under a
//!    deadline.
//! 3. Recover the signer key from the compact signature (`signature`) and
//!    compare it with the authority keys.
//!
//! Signed reads (`signed_query`) reuse steps 2 and 3 with their own digest.

pub mod authority;
pub mod chain_client;
pub mod digest;
pub mod signature;
pub mod signed_query;

pub use authority::{AuthorityError, AuthorityKeySet, AuthorityResolver, BoundedResolver};
pub use chain_client::ChainClient;
pub use digest::ChainId;
pub use signature::PublicKey;
pub use signed_query::{SignedCall, SignedQueryAuthenticator};
