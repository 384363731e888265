//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs sort by creation time and fit the 32-char id columns.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a random key for a stored blob, keeping the file extension.
    #[must_use]
    pub fn generate_blob_key(&self, dir: &str, original_name: &str) -> String {
        let stem = Uuid::new_v4().simple().to_string();
        match original_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => {
                format!("{dir}/{stem}.{}", ext.to_lowercase())
            }
            _ => format!("{dir}/{stem}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generate_blob_key_keeps_extension() {
        let id_gen = IdGenerator::new();
        let key = id_gen.generate_blob_key("images", "Diagram.PNG");

        assert!(key.starts_with("images/"));
        assert!(key.ends_with(".png"));
        // dir + '/' + 32 hex chars + ".png"
        assert_eq!(key.len(), "images/".len() + 32 + 4);
    }

    #[test]
    fn test_generate_blob_key_without_extension() {
        let id_gen = IdGenerator::new();
        let key = id_gen.generate_blob_key("files", "README");

        assert!(key.starts_with("files/"));
        assert!(!key.contains('.'));
    }
}
