//! forum-core: domain types shared by the storage layer and the
//! hypermedia resource layer.
//!
//! This crate defines the message/user model of the discussion forum:
//!
//! - [`MessageId`] — opaque message identifier in `msg-<n>` format
//! - [`Message`] — a forum message, optionally replying to a parent
//! - [`User`] — a registered user with public and restricted profiles

pub mod types;

pub use types::{
    Message, MessageId, MessageIdError, PublicProfile, RestrictedProfile, User, ANONYMOUS,
};
