//! Representation builders, one module per media profile.
//!
//! Builders are pure functions from pre-fetched domain data to an
//! envelope; they never touch the store. Field-name remapping between the
//! domain model and the wire vocabulary (`title`↔`headline`,
//! `body`↔`articleBody`, `residence`↔`address`, …) happens here and in the
//! validator field tables, nowhere else.

pub mod collection;
pub mod hal;
pub mod linked;
