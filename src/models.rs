// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Result types returned by the read routes of the blog backend. All types
//! derive `Serialize` and `ToSchema` for JSON responses and OpenAPI docs.
//!
//! ## Model Categories
//!
//! - **Profiles**: public profile, follow counters and settings
//! - **Media**: uploaded images referenced by profiles
//! - **Drafts**: private post drafts
//! - **Posts**: post references
//! - **Categories**: per-domain post categories
//! - **Notifications**: per-account activity feed
//! - **Downvotes**: post downvotes with a reason

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Profile Models
// =============================================================================

/// Public blog profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Profile {
    /// Blockchain account name.
    pub account: String,
    pub display_name: String,
    pub location: String,
    pub bio: String,
    /// URL of one of the account's own media, or empty.
    pub avatar_url: String,
    /// URL of one of the account's own media, or empty.
    pub cover_url: String,
    /// Set by the administrator.
    pub is_trusted: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile of a newly registered account.
    pub fn new(account: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            account: account.to_string(),
            display_name: account.to_string(),
            location: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
            cover_url: String::new(),
            is_trusted: false,
            created_at,
        }
    }
}

/// Profile with follow counters.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ExtendedProfile {
    #[serde(flatten)]
    pub profile: Profile,
    pub followers_count: u32,
    pub following_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileSettings {
    pub account: String,
    pub enable_email_unseen_notifications: bool,
}

// =============================================================================
// Media Models
// =============================================================================

/// Content types accepted for uploads.
pub const MEDIA_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

/// Content types accepted for avatars and covers.
pub const PROFILE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Uploaded media.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Media {
    /// Lowercased client id, unique per account.
    pub id: String,
    pub account: String,
    pub url: String,
    pub content_type: String,
    /// Decoded size in bytes.
    pub size: usize,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Draft Models
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Draft {
    pub id: String,
    pub account: String,
    pub title: String,
    pub body: String,
    pub json_metadata: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Post Models
// =============================================================================

/// Post reference, as listed by the blacklist.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PostId {
    pub account: String,
    pub permlink: String,
}

// =============================================================================
// Category Models
// =============================================================================

/// Blog domains categories can be attached to.
pub const DOMAINS: &[&str] = &["com", "me"];

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Category {
    pub domain: String,
    pub label: String,
    /// 1-based position within the domain.
    pub order: u32,
    pub localization_key: String,
}

// =============================================================================
// Notification Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    StartedFollow,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    /// Recipient.
    pub account: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[schema(value_type = Object)]
    pub meta: serde_json::Value,
    pub is_read: bool,
    pub is_seen: bool,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Downvote Models
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DownvoteReason {
    Spam,
    Plagiarism,
    HateOrTrolling,
    LowQualityContent,
    DisagreeOnRewards,
}

impl DownvoteReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DownvoteReason::Spam => "spam",
            DownvoteReason::Plagiarism => "plagiarism",
            DownvoteReason::HateOrTrolling => "hate_or_trolling",
            DownvoteReason::LowQualityContent => "low_quality_content",
            DownvoteReason::DisagreeOnRewards => "disagree_on_rewards",
        }
    }
}

impl fmt::Display for DownvoteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownvoteReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spam" => Ok(DownvoteReason::Spam),
            "plagiarism" => Ok(DownvoteReason::Plagiarism),
            "hate_or_trolling" => Ok(DownvoteReason::HateOrTrolling),
            "low_quality_content" => Ok(DownvoteReason::LowQualityContent),
            "disagree_on_rewards" => Ok(DownvoteReason::DisagreeOnRewards),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct Downvote {
    pub account: String,
    pub author: String,
    pub permlink: String,
    pub reason: DownvoteReason,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_profile_is_flat() {
        let created_at = DateTime::from_timestamp(0, 0).unwrap();
        let value = serde_json::to_value(ExtendedProfile {
            profile: Profile::new("alice", created_at),
            followers_count: 2,
            following_count: 1,
        })
        .unwrap();

        assert_eq!(value["account"], "alice");
        assert_eq!(value["display_name"], "alice");
        assert_eq!(value["followers_count"], 2);
        assert_eq!(value["created_at"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn downvote_reasons_round_trip_their_wire_names() {
        for reason in [
            DownvoteReason::Spam,
            DownvoteReason::Plagiarism,
            DownvoteReason::HateOrTrolling,
            DownvoteReason::LowQualityContent,
            DownvoteReason::DisagreeOnRewards,
        ] {
            assert_eq!(reason.as_str().parse::<DownvoteReason>(), Ok(reason));
            assert_eq!(
                serde_json::to_value(reason).unwrap(),
                serde_json::Value::String(reason.to_string())
            );
        }
        assert!("rude".parse::<DownvoteReason>().is_err());
    }
}
