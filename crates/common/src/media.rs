//! Blob key handling for File and Image items.
//!
//! The bytes themselves are written and served by an external storage
//! collaborator; this module only validates keys and derives their
//! filesystem path and public URL.

use std::path::{Component, Path, PathBuf};

use crate::config::MediaConfig;
use crate::{AppError, AppResult};

/// Maximum length of a stored blob key.
pub const MAX_BLOB_KEY_LEN: usize = 255;

/// Validate a blob key as a relative path that stays inside the media root.
pub fn validate_blob_key(key: &str) -> AppResult<()> {
    if key.is_empty() || key.len() > MAX_BLOB_KEY_LEN {
        return Err(AppError::Validation(format!(
            "Blob key must be between 1 and {MAX_BLOB_KEY_LEN} characters"
        )));
    }

    let escapes = Path::new(key)
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes || key.contains('\\') {
        return Err(AppError::Validation(format!(
            "Blob key must be a relative path inside the media root: {key}"
        )));
    }

    Ok(())
}

impl MediaConfig {
    /// Public URL for a stored blob.
    #[must_use]
    pub fn url_for(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }

    /// Filesystem location of a stored blob.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}
