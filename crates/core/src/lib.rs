//! Core business logic for educa-rs.
//!
//! Services compose the repositories of `educa-db` with the catalog's
//! access rules: course-family records are only visible to and mutable by
//! their owner, and new records are attributed to the acting user.

pub mod services;

pub use services::*;
