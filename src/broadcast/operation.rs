// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Operations
//!
//! An operation travels as a JSON tuple `[type_tag, body]`. Known tags decode
//! into a typed body; unknown tags decode into [`UnknownOperation`] so that the
//! transaction router, not the decoder, decides how to reject them.
//!
//! Every known body can:
//! - name the account that claims to perform it ([`OperationBody::account`]),
//! - write its fields in a fixed order into the canonical encoding,
//! - check its own field constraints once the signature has been verified.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use super::encoding::TransactionEncoder;
use super::optype::OpType;

/// Failure to decode an operation tuple.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to unmarshal operation object: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("invalid operation object: expected [type, body], got {0} element(s)")]
    Arity(usize),

    #[error("failed to unmarshal operation type: {0}")]
    Tag(#[source] serde_json::Error),

    #[error("failed to unmarshal {op_type} operation body: {source}")]
    Body {
        op_type: OpType,
        #[source]
        source: serde_json::Error,
    },
}

/// A field constraint that a decoded operation does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

impl FieldError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Attempted to encode an operation that has no canonical encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} operation has no canonical encoding")]
pub struct UnencodableOperation(pub String);

/// Behaviour shared by every known operation body.
pub trait OperationBody: DeserializeOwned + Serialize {
    /// Account that claims to perform the operation.
    fn account(&self) -> &str;

    /// Write the body's fields, in wire order, after the type code.
    fn encode_fields(&self, enc: &mut TransactionEncoder);

    /// Check field constraints.
    fn validate(&self) -> Result<(), FieldError>;
}

/// Body type bound to exactly one [`Operation`] variant.
pub trait KnownOperation:
    OperationBody + Into<Operation> + TryFrom<Operation, Error = Operation> + Send + 'static
{
    const TYPE: OpType;
}

/// Operation whose tag has no registered body type.
#[derive(Debug, Clone)]
pub struct UnknownOperation {
    pub tag: String,
    pub body: Box<RawValue>,
}

impl PartialEq for UnknownOperation {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.body.get() == other.body.get()
    }
}

macro_rules! operations {
    ($($variant:ident($body:ident)),+ $(,)?) => {
        /// A decoded operation: one of the known bodies, or an unknown tag.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Operation {
            $($variant($body),)+
            Unknown(UnknownOperation),
        }

        impl Operation {
            /// Registered type, `None` for unknown operations.
            pub fn op_type(&self) -> Option<OpType> {
                match self {
                    $(Operation::$variant(_) => Some(OpType::$variant),)+
                    Operation::Unknown(_) => None,
                }
            }

            /// Type tag as it appeared on the wire.
            pub fn tag(&self) -> &str {
                match self {
                    $(Operation::$variant(_) => OpType::$variant.as_str(),)+
                    Operation::Unknown(op) => &op.tag,
                }
            }

            /// Account claiming to perform the operation, `None` for unknown operations.
            pub fn account(&self) -> Option<&str> {
                match self {
                    $(Operation::$variant(op) => Some(op.account()),)+
                    Operation::Unknown(_) => None,
                }
            }

            /// Run the body's field constraints.
            pub fn validate(&self) -> Result<(), FieldError> {
                match self {
                    $(Operation::$variant(op) => op.validate(),)+
                    Operation::Unknown(op) => Err(FieldError::new(
                        "type",
                        format!("{} operation is unknown", op.tag),
                    )),
                }
            }

            /// Write `varint(code)` followed by the body fields.
            pub fn encode_into(&self, enc: &mut TransactionEncoder) -> Result<(), UnencodableOperation> {
                match self {
                    $(Operation::$variant(op) => {
                        enc.encode_uvarint(u64::from(OpType::$variant.code()));
                        op.encode_fields(enc);
                        Ok(())
                    })+
                    Operation::Unknown(op) => Err(UnencodableOperation(op.tag.clone())),
                }
            }

            fn decode_known(op_type: OpType, body: &RawValue) -> Result<Self, DecodeError> {
                match op_type {
                    $(OpType::$variant => serde_json::from_str::<$body>(body.get())
                        .map(Operation::$variant)
                        .map_err(|source| DecodeError::Body { op_type, source }),)+
                }
            }
        }

        impl Serialize for Operation {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Operation::$variant(op) => (OpType::$variant, op).serialize(serializer),)+
                    Operation::Unknown(op) => (&op.tag, &op.body).serialize(serializer),
                }
            }
        }

        $(
            impl From<$body> for Operation {
                fn from(op: $body) -> Self {
                    Operation::$variant(op)
                }
            }

            impl TryFrom<Operation> for $body {
                type Error = Operation;

                fn try_from(op: Operation) -> Result<Self, Operation> {
                    match op {
                        Operation::$variant(body) => Ok(body),
                        other => Err(other),
                    }
                }
            }

            impl KnownOperation for $body {
                const TYPE: OpType = OpType::$variant;
            }
        )+
    };
}

operations! {
    Register(RegisterOperation),
    UpdateProfile(UpdateProfileOperation),
    Follow(FollowOperation),
    Unfollow(UnfollowOperation),
    UploadMedia(UploadMediaOperation),
    AddToBlacklistAdmin(AddToBlacklistAdminOperation),
    RemoveFromBlacklistAdmin(RemoveFromBlacklistAdminOperation),
    AddCategoryAdmin(AddCategoryAdminOperation),
    RemoveCategoryAdmin(RemoveCategoryAdminOperation),
    UpdateCategoryAdmin(UpdateCategoryAdminOperation),
    SetAccountTrustedAdmin(SetAccountTrustedAdminOperation),
    UpsertDraft(UpsertDraftOperation),
    RemoveDraft(RemoveDraftOperation),
    MarkNotificationRead(MarkNotificationReadOperation),
    MarkAllNotificationsRead(MarkAllNotificationsReadOperation),
    MarkAllNotificationsSeen(MarkAllNotificationsSeenOperation),
    UpdateProfileSettings(UpdateProfileSettingsOperation),
    RegisterPushToken(RegisterPushTokenOperation),
    Downvote(DownvoteOperation),
    RemoveDownvote(RemoveDownvoteOperation),
}

impl Operation {
    /// Decode a `[type, body]` JSON tuple.
    ///
    /// An unregistered tag is not an error: it yields [`Operation::Unknown`].
    pub fn decode(json: &str) -> Result<Self, DecodeError> {
        let parts: Vec<Box<RawValue>> = serde_json::from_str(json).map_err(DecodeError::Malformed)?;
        Self::from_parts(parts)
    }

    fn from_parts(parts: Vec<Box<RawValue>>) -> Result<Self, DecodeError> {
        let [tag, body]: [Box<RawValue>; 2] = parts
            .try_into()
            .map_err(|parts: Vec<_>| DecodeError::Arity(parts.len()))?;

        let tag: String = serde_json::from_str(tag.get()).map_err(DecodeError::Tag)?;

        match OpType::from_tag(&tag) {
            Some(op_type) => Self::decode_known(op_type, &body),
            None => Ok(Operation::Unknown(UnknownOperation { tag, body })),
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = Vec::<Box<RawValue>>::deserialize(deserializer)?;
        Operation::from_parts(parts).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Field rules
// =============================================================================

/// Max length of client-chosen media and draft ids.
const MAX_ID_LEN: usize = 16;

fn required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        Err(FieldError::new(field, "is required"))
    } else {
        Ok(())
    }
}

fn max_chars(field: &'static str, value: &str, max: usize) -> Result<(), FieldError> {
    if value.chars().count() > max {
        Err(FieldError::new(field, format!("must be at most {max} characters")))
    } else {
        Ok(())
    }
}

fn differs(field: &'static str, value: &str, other_field: &str, other: &str) -> Result<(), FieldError> {
    if value == other {
        Err(FieldError::new(field, format!("must differ from {other_field}")))
    } else {
        Ok(())
    }
}

fn client_id(field: &'static str, value: &str) -> Result<(), FieldError> {
    required(field, value)?;
    max_chars(field, value, MAX_ID_LEN)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FieldError::new(field, "must be alphanumeric"));
    }
    Ok(())
}

fn optional_uri(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Ok(());
    }
    // Absolute paths are valid request URIs.
    if value.starts_with('/') {
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FieldError::new(field, "must be a URI"));
        }
        return Ok(());
    }
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| FieldError::new(field, format!("must be a URI: {e}")))
}

fn base64(field: &'static str, value: &str) -> Result<(), FieldError> {
    use base64ct::{Base64, Encoding};

    Base64::decode_vec(value)
        .map(|_| ())
        .map_err(|_| FieldError::new(field, "must be base64 encoded"))
}

// =============================================================================
// Profile operations
// =============================================================================

/// Create a profile for a blockchain account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterOperation {
    pub account: String,
}

impl OperationBody for RegisterOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProfileOperation {
    pub account: String,
    pub display_name: String,
    pub location: String,
    pub bio: String,
    pub avatar_url: String,
    pub cover_url: String,
}

impl OperationBody for UpdateProfileOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.display_name);
        enc.encode_str(&self.location);
        enc.encode_str(&self.bio);
        enc.encode_str(&self.avatar_url);
        enc.encode_str(&self.cover_url);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        max_chars("display_name", &self.display_name, 50)?;
        max_chars("location", &self.location, 25)?;
        max_chars("bio", &self.bio, 160)?;
        optional_uri("avatar_url", &self.avatar_url)?;
        optional_uri("cover_url", &self.cover_url)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProfileSettingsOperation {
    pub account: String,
    pub enable_email_unseen_notifications: bool,
}

impl OperationBody for UpdateProfileSettingsOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_bool(self.enable_email_unseen_notifications);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterPushTokenOperation {
    pub account: String,
    pub token: String,
}

impl OperationBody for RegisterPushTokenOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.token);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("token", &self.token)
    }
}

// =============================================================================
// Follow operations
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowOperation {
    pub account: String,
    pub follow: String,
}

impl OperationBody for FollowOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.follow);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("follow", &self.follow)?;
        differs("follow", &self.follow, "account", &self.account)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnfollowOperation {
    pub account: String,
    pub unfollow: String,
}

impl OperationBody for UnfollowOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.unfollow);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("unfollow", &self.unfollow)?;
        differs("unfollow", &self.unfollow, "account", &self.account)
    }
}

// =============================================================================
// Media
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadMediaOperation {
    pub account: String,
    /// Client-chosen media id, unique per account.
    pub id: String,
    /// Base64 encoded content.
    pub media: String,
    pub content_type: String,
}

impl OperationBody for UploadMediaOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.id);
        enc.encode_str(&self.media);
        enc.encode_str(&self.content_type);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        client_id("id", &self.id)?;
        required("media", &self.media)?;
        base64("media", &self.media)?;
        required("content_type", &self.content_type)
    }
}

// =============================================================================
// Admin operations
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddToBlacklistAdminOperation {
    pub account: String,
    pub blog_account: String,
    pub permlink: String,
}

impl OperationBody for AddToBlacklistAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.blog_account);
        enc.encode_str(&self.permlink);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("blog_account", &self.blog_account)?;
        required("permlink", &self.permlink)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveFromBlacklistAdminOperation {
    pub account: String,
    pub blog_account: String,
    pub permlink: String,
}

impl OperationBody for RemoveFromBlacklistAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.blog_account);
        enc.encode_str(&self.permlink);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("blog_account", &self.blog_account)?;
        required("permlink", &self.permlink)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddCategoryAdminOperation {
    pub account: String,
    pub domain: String,
    pub label: String,
    pub localization_key: String,
}

impl OperationBody for AddCategoryAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.domain);
        enc.encode_str(&self.label);
        enc.encode_str(&self.localization_key);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("domain", &self.domain)?;
        required("label", &self.label)?;
        required("localization_key", &self.localization_key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveCategoryAdminOperation {
    pub account: String,
    pub domain: String,
    pub label: String,
}

impl OperationBody for RemoveCategoryAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.domain);
        enc.encode_str(&self.label);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("domain", &self.domain)?;
        required("label", &self.label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateCategoryAdminOperation {
    pub account: String,
    pub domain: String,
    pub label: String,
    pub order: u32,
    pub localization_key: String,
}

impl OperationBody for UpdateCategoryAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.domain);
        enc.encode_str(&self.label);
        enc.encode_u32(self.order);
        enc.encode_str(&self.localization_key);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("domain", &self.domain)?;
        required("label", &self.label)?;
        required("localization_key", &self.localization_key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetAccountTrustedAdminOperation {
    pub account: String,
    pub blog_account: String,
    pub is_trusted: bool,
}

impl OperationBody for SetAccountTrustedAdminOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.blog_account);
        enc.encode_bool(self.is_trusted);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("blog_account", &self.blog_account)
    }
}

// =============================================================================
// Drafts
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpsertDraftOperation {
    pub account: String,
    /// Client-chosen draft id, unique per account.
    pub id: String,
    pub title: String,
    pub body: String,
    pub json_metadata: String,
}

impl OperationBody for UpsertDraftOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.id);
        enc.encode_str(&self.title);
        enc.encode_str(&self.body);
        enc.encode_str(&self.json_metadata);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        client_id("id", &self.id)?;
        max_chars("title", &self.title, 255)?;
        max_chars("body", &self.body, 45_000)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveDraftOperation {
    pub account: String,
    pub id: String,
}

impl OperationBody for RemoveDraftOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.id);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        client_id("id", &self.id)
    }
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkNotificationReadOperation {
    pub account: String,
    pub id: Uuid,
}

impl OperationBody for MarkNotificationReadOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.id.hyphenated().to_string());
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        if self.id.is_nil() {
            return Err(FieldError::new("id", "is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkAllNotificationsReadOperation {
    pub account: String,
}

impl OperationBody for MarkAllNotificationsReadOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkAllNotificationsSeenOperation {
    pub account: String,
}

impl OperationBody for MarkAllNotificationsSeenOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)
    }
}

// =============================================================================
// Downvotes
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownvoteOperation {
    pub account: String,
    pub author: String,
    pub permlink: String,
    pub reason: String,
    pub comment: String,
}

impl OperationBody for DownvoteOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.author);
        enc.encode_str(&self.permlink);
        enc.encode_str(&self.reason);
        enc.encode_str(&self.comment);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("author", &self.author)?;
        required("permlink", &self.permlink)?;
        required("reason", &self.reason)?;
        max_chars("comment", &self.comment, 500)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoveDownvoteOperation {
    pub account: String,
    pub author: String,
    pub permlink: String,
}

impl OperationBody for RemoveDownvoteOperation {
    fn account(&self) -> &str {
        &self.account
    }

    fn encode_fields(&self, enc: &mut TransactionEncoder) {
        enc.encode_str(&self.account);
        enc.encode_str(&self.author);
        enc.encode_str(&self.permlink);
    }

    fn validate(&self) -> Result<(), FieldError> {
        required("account", &self.account)?;
        required("author", &self.author)?;
        required("permlink", &self.permlink)
    }
}
