// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Operation type registry.
//!
//! Each operation type has a string tag (used in JSON) and a numeric wire code
//! (embedded in the signed digest). Codes are positional and append-only: a
//! code that was ever issued is never reassigned, otherwise signatures made
//! against the old meaning would verify against the new one.

use std::fmt;

use serde::Serialize;

/// Wire codes of retired operation types. Never hand these out again.
///
/// `5` was `mark_post_deleted`.
pub const RETIRED_CODES: &[u16] = &[5];

/// Closed set of operation types the gateway understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    Register,
    UpdateProfile,
    Follow,
    Unfollow,
    UploadMedia,
    AddToBlacklistAdmin,
    RemoveFromBlacklistAdmin,
    AddCategoryAdmin,
    RemoveCategoryAdmin,
    UpdateCategoryAdmin,
    SetAccountTrustedAdmin,
    UpsertDraft,
    RemoveDraft,
    MarkNotificationRead,
    MarkAllNotificationsRead,
    MarkAllNotificationsSeen,
    UpdateProfileSettings,
    RegisterPushToken,
    Downvote,
    RemoveDownvote,
}

impl OpType {
    /// Every operation type, in wire-code order.
    pub const ALL: [OpType; 20] = [
        OpType::Register,
        OpType::UpdateProfile,
        OpType::Follow,
        OpType::Unfollow,
        OpType::UploadMedia,
        OpType::AddToBlacklistAdmin,
        OpType::RemoveFromBlacklistAdmin,
        OpType::AddCategoryAdmin,
        OpType::RemoveCategoryAdmin,
        OpType::UpdateCategoryAdmin,
        OpType::SetAccountTrustedAdmin,
        OpType::UpsertDraft,
        OpType::RemoveDraft,
        OpType::MarkNotificationRead,
        OpType::MarkAllNotificationsRead,
        OpType::MarkAllNotificationsSeen,
        OpType::UpdateProfileSettings,
        OpType::RegisterPushToken,
        OpType::Downvote,
        OpType::RemoveDownvote,
    ];

    /// Numeric wire code written as a varint at the head of every encoded operation.
    pub const fn code(self) -> u16 {
        match self {
            OpType::Register => 0,
            OpType::UpdateProfile => 1,
            OpType::Follow => 2,
            OpType::Unfollow => 3,
            OpType::UploadMedia => 4,
            // 5 is retired
            OpType::AddToBlacklistAdmin => 6,
            OpType::RemoveFromBlacklistAdmin => 7,
            OpType::AddCategoryAdmin => 8,
            OpType::RemoveCategoryAdmin => 9,
            OpType::UpdateCategoryAdmin => 10,
            OpType::SetAccountTrustedAdmin => 11,
            OpType::UpsertDraft => 12,
            OpType::RemoveDraft => 13,
            OpType::MarkNotificationRead => 14,
            OpType::MarkAllNotificationsRead => 15,
            OpType::MarkAllNotificationsSeen => 16,
            OpType::UpdateProfileSettings => 17,
            OpType::RegisterPushToken => 18,
            OpType::Downvote => 19,
            OpType::RemoveDownvote => 20,
        }
    }

    /// JSON tag of the operation type.
    pub const fn as_str(self) -> &'static str {
        match self {
            OpType::Register => "register",
            OpType::UpdateProfile => "update_profile",
            OpType::Follow => "follow",
            OpType::Unfollow => "unfollow",
            OpType::UploadMedia => "upload_media",
            OpType::AddToBlacklistAdmin => "add_to_blacklist_admin",
            OpType::RemoveFromBlacklistAdmin => "remove_from_blacklist_admin",
            OpType::AddCategoryAdmin => "add_category_admin",
            OpType::RemoveCategoryAdmin => "remove_category_admin",
            OpType::UpdateCategoryAdmin => "update_category_admin",
            OpType::SetAccountTrustedAdmin => "set_account_trusted_admin",
            OpType::UpsertDraft => "upsert_draft",
            OpType::RemoveDraft => "remove_draft",
            OpType::MarkNotificationRead => "mark_notification_read",
            OpType::MarkAllNotificationsRead => "mark_all_notifications_read",
            OpType::MarkAllNotificationsSeen => "mark_all_notifications_seen",
            OpType::UpdateProfileSettings => "update_profile_settings",
            OpType::RegisterPushToken => "register_push_token",
            OpType::Downvote => "downvote",
            OpType::RemoveDownvote => "remove_downvote",
        }
    }

    /// Look up an operation type by its JSON tag.
    pub fn from_tag(tag: &str) -> Option<OpType> {
        OpType::ALL.into_iter().find(|op| op.as_str() == tag)
    }

    #[cfg(test)]
    fn from_code(code: u16) -> Option<OpType> {
        OpType::ALL.into_iter().find(|op| op.code() == code)
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_and_skip_retired_slots() {
        let mut seen = HashSet::new();
        for op in OpType::ALL {
            assert!(seen.insert(op.code()), "duplicate code for {op}");
            assert!(
                !RETIRED_CODES.contains(&op.code()),
                "{op} reuses retired code {}",
                op.code()
            );
        }
        assert_eq!(seen.len(), OpType::ALL.len());
    }

    #[test]
    fn codes_are_dense_apart_from_retired_slots() {
        let max = OpType::ALL.iter().map(|op| op.code()).max().unwrap();
        for code in 0..=max {
            let assigned = OpType::from_code(code).is_some();
            let retired = RETIRED_CODES.contains(&code);
            assert!(assigned ^ retired, "code {code} is neither assigned nor retired");
        }
    }

    #[test]
    fn known_codes_match_wire_contract() {
        assert_eq!(OpType::Register.code(), 0);
        assert_eq!(OpType::Follow.code(), 2);
        assert_eq!(OpType::UploadMedia.code(), 4);
        assert_eq!(OpType::AddToBlacklistAdmin.code(), 6);
        assert_eq!(OpType::RemoveDownvote.code(), 20);
        assert_eq!(OpType::from_code(5), None);
    }

    #[test]
    fn tags_serialize_as_json_strings() {
        for op in OpType::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
            assert_eq!(OpType::from_tag(op.as_str()), Some(op));
        }
    }

    #[test]
    fn unknown_tags_are_not_registered() {
        assert_eq!(OpType::from_tag("mark_post_deleted"), None);
        assert_eq!(OpType::from_tag("transfer"), None);
    }
}
