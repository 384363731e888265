//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Media (uploaded blob) configuration.
    #[serde(default)]
    pub media: MediaConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Whether to log SQL statements.
    #[serde(default)]
    pub sqlx_logging: bool,
}

/// Where File and Image blobs live and how they are served.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Directory the blob storage collaborator writes into.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
    /// Public URL prefix for stored blobs.
    #[serde(default = "default_media_url")]
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            base_url: default_media_url(),
        }
    }
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./media")
}

fn default_media_url() -> String {
    "/media/".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `EDUCA_ENV`)
    /// 3. Environment variables with `EDUCA_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("EDUCA_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("EDUCA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("EDUCA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/educa"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 2);
        assert!(!config.database.sqlx_logging);
        assert_eq!(config.media.root, PathBuf::from("./media"));
        assert_eq!(config.media.base_url, "/media/");
    }

    #[test]
    fn test_media_overrides() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/educa"
            max_connections = 5

            [media]
            root = "/var/lib/educa"
            base_url = "https://cdn.example.com/media/"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.media.root, PathBuf::from("/var/lib/educa"));
        assert_eq!(config.media.base_url, "https://cdn.example.com/media/");
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("educa-{}.toml", ulid::Ulid::new()));
        std::fs::write(
            &path,
            "[database]\nurl = \"postgres://db.internal/educa\"\nmax_connections = 7\n",
        )
        .unwrap();

        let loaded = Config::from_file(&path);
        std::fs::remove_file(&path).unwrap();
        let config = loaded.unwrap();

        assert_eq!(config.database.url, "postgres://db.internal/educa");
        assert_eq!(config.database.max_connections, 7);
        assert_eq!(config.media.base_url, "/media/");
    }

    #[test]
    fn test_from_missing_file_is_error() {
        let path = std::env::temp_dir().join(format!("educa-{}.toml", ulid::Ulid::new()));
        assert!(Config::from_file(path).is_err());
    }

    #[test]
    fn test_missing_database_url_is_error() {
        assert!(parse("[media]\nroot = \"x\"").is_err());
    }
}
