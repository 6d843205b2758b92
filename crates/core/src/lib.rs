//! Shared types, errors and domain rules for the mechanic graph backend.
//!
//! Nothing in this crate performs I/O, so it can be used by the repository
//! layer, the access layer and the HTTP service alike.

pub mod error;
pub mod mechanic;
pub mod page;
pub mod patch;
pub mod project;
pub mod types;
