//! Common utilities and shared types for educa-rs.
//!
//! This crate provides foundational components used across all educa-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Media**: Blob key validation and URL resolution for File/Image items
//!
//! # Example
//!
//! ```no_run
//! use educa_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     println!("Media served from {}", config.media.base_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod media;

pub use config::{Config, DatabaseConfig, MediaConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use media::validate_blob_key;
