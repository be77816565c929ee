//! forum-store: storage contract for the forum hypermedia API.
//!
//! This crate defines:
//! - the [`Store`] trait — the full message/user CRUD surface consumed by
//!   the resource layer, injected as `Arc<dyn Store>`
//! - the [`StoreError`] taxonomy shared by all implementations
//! - [`MemoryStore`] — an in-process reference implementation used by the
//!   server binary and the test suites
//!
//! The store owns canonical state. It guarantees monotonic `msg-<n>` id
//! assignment, referential integrity of `replyto`, and atomic
//! check-and-create for nicknames; the hypermedia layer holds no state
//! across requests.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{
    MessageEdit, NewMessage, NewUser, PublicProfileUpdate, RestrictedProfileUpdate, Store,
    UserPatch,
};
