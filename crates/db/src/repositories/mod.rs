//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument and a viewer as the second.

pub mod mechanic_repo;
pub mod project_repo;
pub mod relationship_repo;

pub use mechanic_repo::MechanicRepo;
pub use project_repo::ProjectRepo;
pub use relationship_repo::RelationshipRepo;
