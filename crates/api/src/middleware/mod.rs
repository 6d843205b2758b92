//! Request extractors guarding the `/api/v1` routes.
//!
//! - [`auth::ApiKey`] -- Requires the public `apikey` header.
//! - [`auth::Caller`] -- API key plus the optional bearer session.

pub mod auth;
