//! The store contract consumed by the resource layer.
//!
//! Controllers receive the store as `Arc<dyn Store>` through application
//! state; no ambient or thread-local connection exists. Each resource
//! controller performs at most one logical write per request, and the
//! atomicity of a single call is the implementation's responsibility.

use async_trait::async_trait;
use forum_core::{Message, MessageId, PublicProfile, RestrictedProfile, User};

use crate::error::StoreResult;

// ============================================================================
// Write payloads
// ============================================================================

/// Payload for creating a message or a reply.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub title: String,
    pub body: String,
    /// Nickname or the `"Anonymous"` sentinel.
    pub sender: String,
    pub origin_ip: Option<String>,
}

/// Payload for editing an existing message.
#[derive(Debug, Clone)]
pub struct MessageEdit {
    pub title: String,
    pub body: String,
    /// Nickname of the editor, or the `"Anonymous"` sentinel.
    pub editor: String,
}

/// Payload for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub public_profile: PublicProfile,
    pub restricted_profile: RestrictedProfile,
}

/// Full replacement of the public sub-profile.
#[derive(Debug, Clone)]
pub struct PublicProfileUpdate {
    pub signature: String,
    pub avatar: String,
}

/// Partial update of the restricted sub-profile. `None` fields are left
/// unchanged, which makes a repeated PUT with the same template idempotent.
#[derive(Debug, Clone, Default)]
pub struct RestrictedProfileUpdate {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub mobile: Option<String>,
    pub skype: Option<String>,
    pub birthday: Option<String>,
    pub residence: Option<String>,
    pub gender: Option<String>,
    pub picture: Option<String>,
}

/// Update of either sub-profile; the two are mutated independently.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub public: Option<PublicProfileUpdate>,
    pub restricted: Option<RestrictedProfileUpdate>,
}

// ============================================================================
// The contract
// ============================================================================

/// Message/user CRUD surface of the forum.
///
/// All reads return owned snapshots; representations are rebuilt from a
/// fresh read on every request. Operations that mutate an identified row
/// return `Ok(false)` when the row does not exist, and reserve `Err` for
/// rejected writes.
#[async_trait]
pub trait Store: Send + Sync {
    /// All messages, ordered by ascending id.
    async fn get_messages(&self) -> StoreResult<Vec<Message>>;

    /// A single message, or `None` if the id is unknown.
    async fn get_message(&self, id: &MessageId) -> StoreResult<Option<Message>>;

    /// Whether a message with this id exists.
    async fn contains_message(&self, id: &MessageId) -> StoreResult<bool>;

    /// Creates a top-level message and returns its assigned id.
    async fn create_message(&self, message: NewMessage) -> StoreResult<MessageId>;

    /// Creates a reply to `parent` and returns the new message's id. The
    /// reply's `replyto` is set to `parent`; fails with `MessageNotFound`
    /// when the parent is unknown.
    async fn append_answer(&self, parent: &MessageId, message: NewMessage)
        -> StoreResult<MessageId>;

    /// Replaces title, body and editor of a message. Returns `false` when
    /// the id is unknown.
    async fn modify_message(&self, id: &MessageId, edit: MessageEdit) -> StoreResult<bool>;

    /// Deletes a message. Returns `false` when the id is unknown.
    async fn delete_message(&self, id: &MessageId) -> StoreResult<bool>;

    /// All users, ordered by nickname.
    async fn get_users(&self) -> StoreResult<Vec<User>>;

    /// A single user, or `None` if the nickname is unknown.
    async fn get_user(&self, nickname: &str) -> StoreResult<Option<User>>;

    /// Whether a user with this nickname exists.
    async fn contains_user(&self, nickname: &str) -> StoreResult<bool>;

    /// Registers a user and returns the nickname. The nickname existence
    /// check and the insert are atomic; a duplicate raises
    /// `DuplicateNickname` no matter how the calls interleave.
    async fn append_user(&self, user: NewUser) -> StoreResult<String>;

    /// Applies a profile patch. Returns `false` when the nickname is
    /// unknown.
    async fn modify_user(&self, nickname: &str, patch: UserPatch) -> StoreResult<bool>;

    /// Deletes a user. Returns `false` when the nickname is unknown.
    async fn delete_user(&self, nickname: &str) -> StoreResult<bool>;

    /// All messages sent by `nickname`, ordered by ascending id. Unknown
    /// nicknames yield an empty list; the history engine treats both the
    /// same way.
    async fn messages_by_sender(&self, nickname: &str) -> StoreResult<Vec<Message>>;
}
