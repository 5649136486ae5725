// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Blog service wiring
//!
//! Binds every operation type and every read route onto the backend store.
//!
//! | Route | Auth | Arguments |
//! |-------|------|-----------|
//! | `network_broadcast_api.broadcast_transaction_synchronous` | transaction | `[transaction]` |
//! | `account_api.get_profile` | - | `[account]` |
//! | `account_api.get_profiles` | - | `[[account...]]` |
//! | `account_api.is_trusted` | - | `[account]` |
//! | `account_api.get_trusted` | - | `[from, limit]` |
//! | `account_api.get_profile_settings` | signed | `[]` |
//! | `media_api.get_media` | - | `[account, id]` |
//! | `follow_api.get_followers` / `get_following` | - | `[account, from, limit]` |
//! | `category_api.get_categories` | - | `[domain]` |
//! | `category_api.get_category` | - | `[domain, label]` |
//! | `follow_api.filter_followers` / `filter_following` | - | `[account, [account...]]` |
//! | `blacklist_api.get_blacklist` | - | `[from, limit]` |
//! | `blacklist_api.is_blacklisted` | - | `[account, permlink]` |
//! | `post_api.get_downvotes` | - | `[author, permlink]` |
//! | `draft_api.get_draft` | signed | `[id]` |
//! | `draft_api.get_drafts` | signed | `[]` |
//! | `notification_api.get_notifications` | signed | `[]` |
//!
//! Signed routes take `[account, salt, signature, [arguments...]]`.

use std::sync::Arc;

use crate::auth::{BoundedResolver, ChainId, SignedCall, SignedQueryAuthenticator};
use crate::broadcast::operation::*;
use crate::broadcast::{KnownOperation, RouterConfigError, TransactionRouter, TransactionRouterBuilder};
use crate::error::RpcError;
use crate::rpc::{to_result, ApiRouter, ApiRouterBuilder, RpcCall};
use crate::store::{InMemoryStore, SharedStore};

pub const BROADCAST_API: &str = "network_broadcast_api";
pub const BROADCAST_METHOD: &str = "broadcast_transaction_synchronous";

/// Applies operation bodies to the store.
type Apply<B> = fn(&mut InMemoryStore, B) -> Result<(), RpcError>;

struct StoreHandlers {
    builder: TransactionRouterBuilder,
    store: SharedStore,
}

impl StoreHandlers {
    fn apply<B: KnownOperation>(self, f: Apply<B>) -> Self {
        let store = Arc::clone(&self.store);
        let builder = self.builder.on(move |op: B| {
            let store = Arc::clone(&store);
            async move {
                let mut store = store.write().await;
                f(&mut store, op)
            }
        });
        Self { builder, ..self }
    }
}

/// Transaction router with every operation type bound to `store`.
pub fn transaction_router(
    store: &SharedStore,
    chain: ChainId,
    resolver: BoundedResolver,
) -> Result<TransactionRouter, RouterConfigError> {
    let handlers = StoreHandlers {
        builder: TransactionRouter::builder(),
        store: Arc::clone(store),
    };

    handlers
        .apply::<RegisterOperation>(InMemoryStore::register)
        .apply::<UpdateProfileOperation>(InMemoryStore::update_profile)
        .apply::<FollowOperation>(InMemoryStore::follow)
        .apply::<UnfollowOperation>(InMemoryStore::unfollow)
        .apply::<UploadMediaOperation>(InMemoryStore::upload_media)
        .apply::<AddToBlacklistAdminOperation>(InMemoryStore::add_to_blacklist)
        .apply::<RemoveFromBlacklistAdminOperation>(InMemoryStore::remove_from_blacklist)
        .apply::<AddCategoryAdminOperation>(InMemoryStore::add_category)
        .apply::<RemoveCategoryAdminOperation>(InMemoryStore::remove_category)
        .apply::<UpdateCategoryAdminOperation>(InMemoryStore::update_category)
        .apply::<SetAccountTrustedAdminOperation>(InMemoryStore::set_account_trusted)
        .apply::<UpsertDraftOperation>(InMemoryStore::upsert_draft)
        .apply::<RemoveDraftOperation>(InMemoryStore::remove_draft)
        .apply::<MarkNotificationReadOperation>(InMemoryStore::mark_notification_read)
        .apply::<MarkAllNotificationsReadOperation>(InMemoryStore::mark_all_notifications_read)
        .apply::<MarkAllNotificationsSeenOperation>(InMemoryStore::mark_all_notifications_seen)
        .apply::<UpdateProfileSettingsOperation>(InMemoryStore::update_profile_settings)
        .apply::<RegisterPushTokenOperation>(InMemoryStore::register_push_token)
        .apply::<DownvoteOperation>(InMemoryStore::downvote)
        .apply::<RemoveDownvoteOperation>(InMemoryStore::remove_downvote)
        .builder
        .build(chain, resolver)
}

fn public_reads(builder: ApiRouterBuilder, store: &SharedStore) -> ApiRouterBuilder {
    let profile = Arc::clone(store);
    let media = Arc::clone(store);
    let followers = Arc::clone(store);
    let following = Arc::clone(store);
    let categories = Arc::clone(store);
    let blacklist = Arc::clone(store);
    let downvotes = Arc::clone(store);

    builder
        .route("account_api", "get_profile", move |call: RpcCall| {
            let store = Arc::clone(&profile);
            async move {
                let account: String = call.param(0)?;
                let result = store.read().await.profile(&account)?;
                to_result(&result)
            }
        })
        .route("media_api", "get_media", move |call: RpcCall| {
            let store = Arc::clone(&media);
            async move {
                let account: String = call.param(0)?;
                let id: String = call.param(1)?;
                let result = store.read().await.media(&account, &id)?;
                to_result(&result)
            }
        })
        .route("follow_api", "get_followers", move |call: RpcCall| {
            let store = Arc::clone(&followers);
            async move {
                let account: String = call.param(0)?;
                let from: u32 = call.param(1)?;
                let limit: u32 = call.param(2)?;
                let result = store.read().await.followers(&account, from, limit)?;
                to_result(&result)
            }
        })
        .route("follow_api", "get_following", move |call: RpcCall| {
            let store = Arc::clone(&following);
            async move {
                let account: String = call.param(0)?;
                let from: u32 = call.param(1)?;
                let limit: u32 = call.param(2)?;
                let result = store.read().await.following(&account, from, limit)?;
                to_result(&result)
            }
        })
        .route("category_api", "get_categories", move |call: RpcCall| {
            let store = Arc::clone(&categories);
            async move {
                let domain: String = call.param(0)?;
                let result = store.read().await.categories(&domain)?;
                to_result(&result)
            }
        })
        .route("blacklist_api", "is_blacklisted", move |call: RpcCall| {
            let store = Arc::clone(&blacklist);
            async move {
                let account: String = call.param(0)?;
                let permlink: String = call.param(1)?;
                let result = store.read().await.is_blacklisted(&account, &permlink);
                to_result(&result)
            }
        })
        .route("post_api", "get_downvotes", move |call: RpcCall| {
            let store = Arc::clone(&downvotes);
            async move {
                let author: String = call.param(0)?;
                let permlink: String = call.param(1)?;
                let result = store.read().await.downvotes(&author, &permlink);
                to_result(&result)
            }
        })
}

/// Batch, filter and listing reads.
fn directory_reads(builder: ApiRouterBuilder, store: &SharedStore) -> ApiRouterBuilder {
    let profiles = Arc::clone(store);
    let is_trusted = Arc::clone(store);
    let trusted = Arc::clone(store);
    let category = Arc::clone(store);
    let filter_followers = Arc::clone(store);
    let filter_following = Arc::clone(store);
    let blacklist = Arc::clone(store);

    builder
        .route("account_api", "get_profiles", move |call: RpcCall| {
            let store = Arc::clone(&profiles);
            async move {
                let accounts: Vec<String> = call.param(0)?;
                let result = store.read().await.profiles(&accounts);
                to_result(&result)
            }
        })
        .route("account_api", "is_trusted", move |call: RpcCall| {
            let store = Arc::clone(&is_trusted);
            async move {
                let account: String = call.param(0)?;
                let result = store.read().await.is_trusted(&account);
                to_result(&result)
            }
        })
        .route("account_api", "get_trusted", move |call: RpcCall| {
            let store = Arc::clone(&trusted);
            async move {
                let from: u32 = call.param(0)?;
                let limit: u32 = call.param(1)?;
                let result = store.read().await.trusted(from, limit)?;
                to_result(&result)
            }
        })
        .route("category_api", "get_category", move |call: RpcCall| {
            let store = Arc::clone(&category);
            async move {
                let domain: String = call.param(0)?;
                let label: String = call.param(1)?;
                let result = store.read().await.category(&domain, &label)?;
                to_result(&result)
            }
        })
        .route("follow_api", "filter_followers", move |call: RpcCall| {
            let store = Arc::clone(&filter_followers);
            async move {
                let account: String = call.param(0)?;
                let candidates: Vec<String> = call.param(1)?;
                let result = store.read().await.filter_followers(&account, &candidates);
                to_result(&result)
            }
        })
        .route("follow_api", "filter_following", move |call: RpcCall| {
            let store = Arc::clone(&filter_following);
            async move {
                let account: String = call.param(0)?;
                let candidates: Vec<String> = call.param(1)?;
                let result = store.read().await.filter_following(&account, &candidates);
                to_result(&result)
            }
        })
        .route("blacklist_api", "get_blacklist", move |call: RpcCall| {
            let store = Arc::clone(&blacklist);
            async move {
                let from: u32 = call.param(0)?;
                let limit: u32 = call.param(1)?;
                let result = store.read().await.blacklist(from, limit)?;
                to_result(&result)
            }
        })
}

fn signed_reads(
    builder: ApiRouterBuilder,
    store: &SharedStore,
    auth: &SignedQueryAuthenticator,
) -> ApiRouterBuilder {
    let settings = Arc::clone(store);
    let draft = Arc::clone(store);
    let drafts = Arc::clone(store);
    let notifications = Arc::clone(store);

    builder
        .route_handler(
            "account_api",
            "get_profile_settings",
            auth.authenticate_and_call(move |call: SignedCall| {
                let store = Arc::clone(&settings);
                async move {
                    let result = store.read().await.profile_settings(&call.account)?;
                    to_result(&result)
                }
            }),
        )
        .route_handler(
            "draft_api",
            "get_draft",
            auth.authenticate_and_call(move |call: SignedCall| {
                let store = Arc::clone(&draft);
                async move {
                    let id: String = call.param(0)?;
                    let result = store.read().await.draft(&call.account, &id)?;
                    to_result(&result)
                }
            }),
        )
        .route_handler(
            "draft_api",
            "get_drafts",
            auth.authenticate_and_call(move |call: SignedCall| {
                let store = Arc::clone(&drafts);
                async move {
                    let result = store.read().await.drafts(&call.account);
                    to_result(&result)
                }
            }),
        )
        .route_handler(
            "notification_api",
            "get_notifications",
            auth.authenticate_and_call(move |call: SignedCall| {
                let store = Arc::clone(&notifications);
                async move {
                    let result = store.read().await.notifications(&call.account);
                    to_result(&result)
                }
            }),
        )
}

/// Complete RPC dispatch table of the gateway.
pub fn api_router(
    store: &SharedStore,
    chain: ChainId,
    resolver: BoundedResolver,
) -> Result<ApiRouter, RouterConfigError> {
    let transactions = Arc::new(transaction_router(store, chain, resolver.clone())?);
    let auth = SignedQueryAuthenticator::new(chain, resolver);

    let builder = ApiRouter::builder().route(BROADCAST_API, BROADCAST_METHOD, move |call: RpcCall| {
        let transactions = Arc::clone(&transactions);
        async move { transactions.route(call).await }
    });
    let builder = public_reads(builder, store);
    let builder = directory_reads(builder, store);
    let builder = signed_reads(builder, store, &auth);

    Ok(builder.build())
}
