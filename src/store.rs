// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory blog backend.
//!
//! Stands in for the relational store behind the gateway. Every mutating
//! method takes an already authenticated and field-validated operation body
//! and either applies it completely or returns a coded [`RpcError`] without
//! touching any state.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use base64ct::{Base64, Encoding};
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::broadcast::operation::{
    AddCategoryAdminOperation, AddToBlacklistAdminOperation, DownvoteOperation,
    FollowOperation, MarkAllNotificationsReadOperation, MarkAllNotificationsSeenOperation,
    MarkNotificationReadOperation, RegisterOperation, RegisterPushTokenOperation,
    RemoveCategoryAdminOperation, RemoveDownvoteOperation, RemoveDraftOperation,
    RemoveFromBlacklistAdminOperation, SetAccountTrustedAdminOperation, UnfollowOperation,
    UpdateCategoryAdminOperation, UpdateProfileOperation, UpdateProfileSettingsOperation,
    UploadMediaOperation, UpsertDraftOperation,
};
use crate::error::{ErrorCode, RpcError};
use crate::models::{
    Category, Downvote, DownvoteReason, Draft, ExtendedProfile, Media, Notification,
    NotificationKind, PostId, Profile, ProfileSettings, DOMAINS, MEDIA_CONTENT_TYPES,
    PROFILE_CONTENT_TYPES,
};

/// Store handle shared by all request tasks.
pub type SharedStore = Arc<RwLock<InMemoryStore>>;

/// Largest page the list reads accept.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Backend limits and identities.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub max_follows: usize,
    /// Only this account may run `*_admin` operations.
    pub admin_account: String,
    /// Prefix of media URLs, without trailing slash.
    pub media_base_url: String,
    pub notifications_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_follows: 5000,
            admin_account: "admin".to_string(),
            media_base_url: "https://media.scorum.blog".to_string(),
            notifications_limit: 100,
        }
    }
}

#[derive(Debug, Clone)]
struct Follow {
    account: String,
    follow: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    config: StoreConfig,
    profiles: HashMap<String, Profile>,
    settings: HashMap<String, ProfileSettings>,
    push_tokens: HashMap<String, BTreeSet<String>>,
    /// Oldest first.
    follows: Vec<Follow>,
    media: HashMap<(String, String), Media>,
    blacklist: BTreeSet<(String, String)>,
    categories: Vec<Category>,
    drafts: HashMap<(String, String), Draft>,
    /// Oldest first.
    notifications: Vec<Notification>,
    downvotes: Vec<Downvote>,
}

fn not_found(account: &str) -> RpcError {
    RpcError::new(ErrorCode::ProfileNotFound, format!("{account} not found"))
}

fn check_domain(domain: &str) -> Result<(), RpcError> {
    if DOMAINS.contains(&domain) {
        Ok(())
    } else {
        Err(RpcError::invalid_parameter("domain is invalid"))
    }
}

fn page<T>(items: impl Iterator<Item = T>, from: u32, limit: u32) -> Result<Vec<T>, RpcError> {
    if limit > MAX_PAGE_SIZE {
        return Err(RpcError::invalid_parameter("invalid limit"));
    }
    Ok(items.skip(from as usize).take(limit as usize).collect())
}

/// First occurrence of every account, in request order.
fn unique(accounts: &[String]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    accounts
        .iter()
        .map(String::as_str)
        .filter(|account| seen.insert(*account))
        .collect()
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    fn require_admin(&self, account: &str) -> Result<(), RpcError> {
        if account == self.config.admin_account {
            Ok(())
        } else {
            Err(RpcError::access_denied("access denied"))
        }
    }

    fn media_url(&self, account: &str, id: &str) -> String {
        format!("{}/{account}/{id}", self.config.media_base_url)
    }

    /// Media of `account` published under `url`, checked for profile use.
    fn own_profile_media(&self, account: &str, url: &str) -> Result<(), RpcError> {
        let media = self
            .media
            .values()
            .find(|m| m.account == account && m.url == url)
            .ok_or_else(|| {
                RpcError::new(
                    ErrorCode::MediaNotFound,
                    format!("{url} is not your media resource"),
                )
            })?;

        if !PROFILE_CONTENT_TYPES.contains(&media.content_type.as_str()) {
            return Err(RpcError::new(
                ErrorCode::InvalidMediaType,
                "invalid media content-type",
            ));
        }
        Ok(())
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// Idempotent: registering an existing account keeps its profile.
    pub fn register(&mut self, op: RegisterOperation) -> Result<(), RpcError> {
        let now = Utc::now();
        self.profiles
            .entry(op.account.clone())
            .or_insert_with(|| Profile::new(&op.account, now));
        self.settings
            .entry(op.account.clone())
            .or_insert_with(|| ProfileSettings {
                account: op.account,
                enable_email_unseen_notifications: true,
            });
        Ok(())
    }

    pub fn update_profile(&mut self, op: UpdateProfileOperation) -> Result<(), RpcError> {
        if !self.profiles.contains_key(&op.account) {
            return Err(not_found(&op.account));
        }
        if !op.avatar_url.is_empty() {
            self.own_profile_media(&op.account, &op.avatar_url)?;
        }
        if !op.cover_url.is_empty() {
            self.own_profile_media(&op.account, &op.cover_url)?;
        }

        let profile = self
            .profiles
            .get_mut(&op.account)
            .ok_or_else(|| not_found(&op.account))?;
        profile.display_name = op.display_name;
        profile.location = op.location;
        profile.bio = op.bio;
        profile.avatar_url = op.avatar_url;
        profile.cover_url = op.cover_url;
        Ok(())
    }

    pub fn set_account_trusted(&mut self, op: SetAccountTrustedAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        let profile = self
            .profiles
            .get_mut(&op.blog_account)
            .ok_or_else(|| not_found(&op.blog_account))?;
        profile.is_trusted = op.is_trusted;
        Ok(())
    }

    pub fn update_profile_settings(&mut self, op: UpdateProfileSettingsOperation) -> Result<(), RpcError> {
        self.settings.insert(
            op.account.clone(),
            ProfileSettings {
                account: op.account,
                enable_email_unseen_notifications: op.enable_email_unseen_notifications,
            },
        );
        Ok(())
    }

    pub fn register_push_token(&mut self, op: RegisterPushTokenOperation) -> Result<(), RpcError> {
        self.push_tokens.entry(op.account).or_default().insert(op.token);
        Ok(())
    }

    pub fn profile(&self, account: &str) -> Result<ExtendedProfile, RpcError> {
        let profile = self.profiles.get(account).ok_or_else(|| not_found(account))?;
        let followers_count = self.follows.iter().filter(|f| f.follow == account).count();
        let following_count = self.follows.iter().filter(|f| f.account == account).count();

        Ok(ExtendedProfile {
            profile: profile.clone(),
            followers_count: u32::try_from(followers_count).unwrap_or(u32::MAX),
            following_count: u32::try_from(following_count).unwrap_or(u32::MAX),
        })
    }

    pub fn profile_settings(&self, account: &str) -> Result<ProfileSettings, RpcError> {
        self.settings
            .get(account)
            .cloned()
            .ok_or_else(|| not_found(account))
    }

    /// Existing profiles among `accounts`, in request order.
    pub fn profiles(&self, accounts: &[String]) -> Vec<Profile> {
        unique(accounts)
            .into_iter()
            .filter_map(|account| self.profiles.get(account).cloned())
            .collect()
    }

    /// Unknown accounts are not trusted.
    pub fn is_trusted(&self, account: &str) -> bool {
        self.profiles
            .get(account)
            .map(|p| p.is_trusted)
            .unwrap_or(false)
    }

    /// Trusted profiles ordered by account name.
    pub fn trusted(&self, from: u32, limit: u32) -> Result<Vec<Profile>, RpcError> {
        let mut trusted: Vec<&Profile> = self.profiles.values().filter(|p| p.is_trusted).collect();
        trusted.sort_by(|a, b| a.account.cmp(&b.account));
        page(trusted.into_iter().cloned(), from, limit)
    }

    #[cfg(test)]
    fn push_tokens(&self, account: &str) -> Vec<String> {
        self.push_tokens
            .get(account)
            .map(|tokens| tokens.iter().cloned().collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Follows
    // =========================================================================

    pub fn follow(&mut self, op: FollowOperation) -> Result<(), RpcError> {
        let count = self.follows.iter().filter(|f| f.account == op.account).count();
        if count >= self.config.max_follows {
            return Err(RpcError::new(
                ErrorCode::FollowsLimitReached,
                "user reach max number of follows",
            ));
        }
        if self
            .follows
            .iter()
            .any(|f| f.account == op.account && f.follow == op.follow)
        {
            return Err(RpcError::new(
                ErrorCode::ProfileAlreadyFollowed,
                format!("{} already follows {}", op.account, op.follow),
            ));
        }
        if !self.profiles.contains_key(&op.follow) {
            return Err(not_found(&op.follow));
        }

        self.notifications.push(Notification {
            id: Uuid::new_v4(),
            account: op.follow.clone(),
            kind: NotificationKind::StartedFollow,
            meta: json!({ "account": op.account }),
            is_read: false,
            is_seen: false,
            timestamp: Utc::now(),
        });
        self.follows.push(Follow {
            account: op.account,
            follow: op.follow,
        });
        Ok(())
    }

    /// Unfollowing an account that is not followed is not an error.
    pub fn unfollow(&mut self, op: UnfollowOperation) -> Result<(), RpcError> {
        self.follows
            .retain(|f| !(f.account == op.account && f.follow == op.unfollow));
        self.notifications.retain(|n| {
            !(n.account == op.unfollow
                && n.kind == NotificationKind::StartedFollow
                && n.meta["account"] == op.account.as_str())
        });
        Ok(())
    }

    /// Profiles following `account`, newest follow first.
    pub fn followers(&self, account: &str, from: u32, limit: u32) -> Result<Vec<Profile>, RpcError> {
        let profiles = self
            .follows
            .iter()
            .rev()
            .filter(|f| f.follow == account)
            .filter_map(|f| self.profiles.get(&f.account).cloned());
        page(profiles, from, limit)
    }

    /// Profiles `account` follows, newest follow first.
    pub fn following(&self, account: &str, from: u32, limit: u32) -> Result<Vec<Profile>, RpcError> {
        let profiles = self
            .follows
            .iter()
            .rev()
            .filter(|f| f.account == account)
            .filter_map(|f| self.profiles.get(&f.follow).cloned());
        page(profiles, from, limit)
    }

    fn is_following(&self, account: &str, follow: &str) -> bool {
        self.follows
            .iter()
            .any(|f| f.account == account && f.follow == follow)
    }

    /// Profiles among `candidates` that follow `account`, in request order.
    pub fn filter_followers(&self, account: &str, candidates: &[String]) -> Vec<Profile> {
        unique(candidates)
            .into_iter()
            .filter(|candidate| self.is_following(candidate, account))
            .filter_map(|candidate| self.profiles.get(candidate).cloned())
            .collect()
    }

    /// Profiles among `candidates` that `account` follows, in request order.
    pub fn filter_following(&self, account: &str, candidates: &[String]) -> Vec<Profile> {
        unique(candidates)
            .into_iter()
            .filter(|candidate| self.is_following(account, candidate))
            .filter_map(|candidate| self.profiles.get(candidate).cloned())
            .collect()
    }

    // =========================================================================
    // Media
    // =========================================================================

    pub fn upload_media(&mut self, op: UploadMediaOperation) -> Result<(), RpcError> {
        if !self.profiles.contains_key(&op.account) {
            return Err(RpcError::new(
                ErrorCode::ProfileNotFound,
                format!("{} account does not exist", op.account),
            ));
        }
        if !MEDIA_CONTENT_TYPES.contains(&op.content_type.as_str()) {
            return Err(RpcError::new(ErrorCode::InvalidMediaType, "invalid content_type"));
        }

        let id = op.id.to_lowercase();
        let key = (op.account.clone(), id.clone());
        if self.media.contains_key(&key) {
            return Err(RpcError::new(
                ErrorCode::MediaAlreadyExists,
                "media id already exists",
            ));
        }

        let bytes = Base64::decode_vec(&op.media)
            .map_err(|e| RpcError::new(ErrorCode::InvalidMedia, e.to_string()))?;

        let media = Media {
            url: self.media_url(&op.account, &id),
            id,
            account: op.account,
            content_type: op.content_type,
            size: bytes.len(),
            created_at: Utc::now(),
        };
        self.media.insert(key, media);
        Ok(())
    }

    pub fn media(&self, account: &str, id: &str) -> Result<Media, RpcError> {
        self.media
            .get(&(account.to_string(), id.to_lowercase()))
            .cloned()
            .ok_or_else(|| RpcError::new(ErrorCode::MediaNotFound, format!("media {id} not found")))
    }

    // =========================================================================
    // Blacklist
    // =========================================================================

    /// Idempotent for entries already on the list.
    pub fn add_to_blacklist(&mut self, op: AddToBlacklistAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        if !self.profiles.contains_key(&op.blog_account) {
            return Err(RpcError::new(
                ErrorCode::ProfileNotFound,
                "account doesn't exists",
            ));
        }
        self.blacklist.insert((op.blog_account, op.permlink));
        Ok(())
    }

    pub fn remove_from_blacklist(&mut self, op: RemoveFromBlacklistAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        if !self.blacklist.remove(&(op.blog_account, op.permlink)) {
            return Err(RpcError::new(
                ErrorCode::BlacklistEntryNotFound,
                "blacklist entity not found",
            ));
        }
        Ok(())
    }

    pub fn is_blacklisted(&self, account: &str, permlink: &str) -> bool {
        self.blacklist
            .contains(&(account.to_string(), permlink.to_string()))
    }

    /// Blacklisted posts ordered by author then permlink.
    pub fn blacklist(&self, from: u32, limit: u32) -> Result<Vec<PostId>, RpcError> {
        let entries = self.blacklist.iter().map(|(account, permlink)| PostId {
            account: account.clone(),
            permlink: permlink.clone(),
        });
        page(entries, from, limit)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    fn category_index(&self, domain: &str, label: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.domain == domain && c.label == label)
    }

    /// Renumber `domain` as 1..n in its current order.
    fn renumber(&mut self, domain: &str) {
        let mut order = 0;
        for category in self.categories.iter_mut().filter(|c| c.domain == domain) {
            order += 1;
            category.order = order;
        }
    }

    /// Appends the category at the end of its domain.
    pub fn add_category(&mut self, op: AddCategoryAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        check_domain(&op.domain)?;
        if self.category_index(&op.domain, &op.label).is_some() {
            return Err(RpcError::new(
                ErrorCode::CategoryAlreadyExists,
                "category already exists",
            ));
        }

        let domain = op.domain.clone();
        self.categories.push(Category {
            domain: op.domain,
            label: op.label,
            order: 0,
            localization_key: op.localization_key,
        });
        self.renumber(&domain);
        Ok(())
    }

    pub fn remove_category(&mut self, op: RemoveCategoryAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        check_domain(&op.domain)?;
        let index = self
            .category_index(&op.domain, &op.label)
            .ok_or_else(|| RpcError::new(ErrorCode::CategoryNotFound, "category not found"))?;
        self.categories.remove(index);
        self.renumber(&op.domain);
        Ok(())
    }

    /// Moves the category to position `order` (clamped to the domain size).
    pub fn update_category(&mut self, op: UpdateCategoryAdminOperation) -> Result<(), RpcError> {
        self.require_admin(&op.account)?;
        check_domain(&op.domain)?;
        let index = self
            .category_index(&op.domain, &op.label)
            .ok_or_else(|| RpcError::new(ErrorCode::CategoryNotFound, "category not found"))?;

        let mut category = self.categories.remove(index);
        category.localization_key = op.localization_key;

        let target = op.order.max(1) as usize - 1;
        let at = self
            .categories
            .iter()
            .enumerate()
            .filter(|(_, c)| c.domain == op.domain)
            .map(|(i, _)| i)
            .nth(target)
            .unwrap_or(self.categories.len());
        self.categories.insert(at, category);
        self.renumber(&op.domain);
        Ok(())
    }

    pub fn categories(&self, domain: &str) -> Result<Vec<Category>, RpcError> {
        check_domain(domain)?;
        Ok(self
            .categories
            .iter()
            .filter(|c| c.domain == domain)
            .cloned()
            .collect())
    }

    pub fn category(&self, domain: &str, label: &str) -> Result<Category, RpcError> {
        check_domain(domain)?;
        self.category_index(domain, label)
            .map(|i| self.categories[i].clone())
            .ok_or_else(|| RpcError::new(ErrorCode::CategoryNotFound, "category not found"))
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    pub fn upsert_draft(&mut self, op: UpsertDraftOperation) -> Result<(), RpcError> {
        if op.body.is_empty() && op.title.is_empty() {
            return Err(RpcError::invalid_parameter("empty body and title"));
        }

        let now = Utc::now();
        let key = (op.account.clone(), op.id.clone());
        match self.drafts.get_mut(&key) {
            Some(draft) => {
                draft.title = op.title;
                draft.body = op.body;
                draft.json_metadata = op.json_metadata;
                draft.updated_at = now;
            }
            None => {
                self.drafts.insert(
                    key,
                    Draft {
                        id: op.id,
                        account: op.account,
                        title: op.title,
                        body: op.body,
                        json_metadata: op.json_metadata,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }
        Ok(())
    }

    pub fn remove_draft(&mut self, op: RemoveDraftOperation) -> Result<(), RpcError> {
        self.drafts
            .remove(&(op.account, op.id))
            .map(|_| ())
            .ok_or_else(|| RpcError::new(ErrorCode::DraftNotFound, "draft not found"))
    }

    pub fn draft(&self, account: &str, id: &str) -> Result<Draft, RpcError> {
        if id.is_empty() {
            return Err(RpcError::invalid_parameter("invalid id"));
        }
        self.drafts
            .get(&(account.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| RpcError::new(ErrorCode::DraftNotFound, "draft not found"))
    }

    /// Drafts of `account`, most recently updated first.
    pub fn drafts(&self, account: &str) -> Vec<Draft> {
        let mut drafts: Vec<Draft> = self
            .drafts
            .values()
            .filter(|d| d.account == account)
            .cloned()
            .collect();
        drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        drafts
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn mark_notification_read(&mut self, op: MarkNotificationReadOperation) -> Result<(), RpcError> {
        self.notifications
            .iter_mut()
            .filter(|n| n.account == op.account && n.id == op.id)
            .for_each(|n| n.is_read = true);
        Ok(())
    }

    pub fn mark_all_notifications_read(&mut self, op: MarkAllNotificationsReadOperation) -> Result<(), RpcError> {
        self.notifications
            .iter_mut()
            .filter(|n| n.account == op.account)
            .for_each(|n| n.is_read = true);
        Ok(())
    }

    pub fn mark_all_notifications_seen(&mut self, op: MarkAllNotificationsSeenOperation) -> Result<(), RpcError> {
        self.notifications
            .iter_mut()
            .filter(|n| n.account == op.account)
            .for_each(|n| n.is_seen = true);
        Ok(())
    }

    /// Newest first, capped at the configured limit.
    pub fn notifications(&self, account: &str) -> Vec<Notification> {
        self.notifications
            .iter()
            .rev()
            .filter(|n| n.account == account)
            .take(self.config.notifications_limit)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Downvotes
    // =========================================================================

    /// A repeated downvote replaces the earlier reason and comment.
    pub fn downvote(&mut self, op: DownvoteOperation) -> Result<(), RpcError> {
        let reason: DownvoteReason = op
            .reason
            .parse()
            .map_err(|_| RpcError::invalid_parameter("invalid reason"))?;

        let downvote = Downvote {
            account: op.account,
            author: op.author,
            permlink: op.permlink,
            reason,
            comment: op.comment,
        };

        match self.downvotes.iter_mut().find(|d| {
            d.account == downvote.account
                && d.author == downvote.author
                && d.permlink == downvote.permlink
        }) {
            Some(existing) => *existing = downvote,
            None => self.downvotes.push(downvote),
        }
        Ok(())
    }

    pub fn remove_downvote(&mut self, op: RemoveDownvoteOperation) -> Result<(), RpcError> {
        let before = self.downvotes.len();
        self.downvotes.retain(|d| {
            !(d.account == op.account && d.author == op.author && d.permlink == op.permlink)
        });
        if self.downvotes.len() == before {
            return Err(RpcError::new(ErrorCode::DownvoteNotFound, "downvote not found"));
        }
        Ok(())
    }

    pub fn downvotes(&self, author: &str, permlink: &str) -> Vec<Downvote> {
        self.downvotes
            .iter()
            .filter(|d| d.author == author && d.permlink == permlink)
            .cloned()
            .collect()
    }
}
