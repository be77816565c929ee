//! Core data types for the forum.
//!
//! Messages form a forest: each message may carry a `replyto` reference to
//! its parent. Users are keyed by an immutable nickname and split their
//! profile into a public part (visible to everyone) and a restricted part
//! (personal data).
//!
//! All types derive `Debug`, `Clone`, `Serialize`, and `Deserialize` for
//! inspection, copying, and JSON serialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel author used when a message is posted without a registered sender.
pub const ANONYMOUS: &str = "Anonymous";

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a message, in the canonical `msg-<n>` format.
///
/// Ids are assigned monotonically by the store; this type only enforces the
/// textual format so malformed ids are rejected at the resource boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

/// Error returned when a string is not a valid `msg-<n>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid message id: {0:?} (expected msg-<n>)")]
pub struct MessageIdError(pub String);

impl MessageId {
    /// Builds the id for the `n`-th message.
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self(format!("msg-{n}"))
    }

    /// Returns the numeric part of the id.
    #[must_use]
    pub fn number(&self) -> u64 {
        // The constructor guarantees the msg-<digits> shape.
        self.0["msg-".len()..].parse().unwrap_or(0)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = MessageIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("msg-")
            .ok_or_else(|| MessageIdError(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MessageIdError(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

// ============================================================================
// Messages
// ============================================================================

/// A forum message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned identifier (`msg-<n>`).
    pub id: MessageId,
    /// Message title.
    pub title: String,
    /// Message body.
    pub body: String,
    /// Nickname of the sender, or [`ANONYMOUS`].
    pub sender: String,
    /// Nickname of the last editor, if the message was ever edited.
    pub editor: Option<String>,
    /// Parent message, when this message is a reply.
    pub replyto: Option<MessageId>,
    /// IP address the message was posted from, when known.
    pub origin_ip: Option<String>,
    /// Last modification time as a UNIX timestamp (seconds). History
    /// queries filter on this field.
    pub modified_at: i64,
}

impl Message {
    /// True when the sender is the anonymous sentinel.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.sender == ANONYMOUS
    }
}

// ============================================================================
// Users
// ============================================================================

/// Publicly visible part of a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    /// Signature appended to the user's messages.
    pub signature: String,
    /// Avatar file name.
    pub avatar: String,
}

/// Personal data of a user. No authorization is enforced by the API, but
/// this part of the profile is served from its own resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedProfile {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub website: Option<String>,
    pub mobile: Option<String>,
    pub skype: Option<String>,
    pub birthday: String,
    /// Residence in `<locality>,<country>` form.
    pub residence: Option<String>,
    pub gender: String,
    /// Picture file name.
    pub picture: Option<String>,
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Primary key. Unique and immutable after creation.
    pub nickname: String,
    /// Registration time as a UNIX timestamp (seconds).
    pub registration_date: i64,
    pub public_profile: PublicProfile,
    pub restricted_profile: RestrictedProfile,
}
