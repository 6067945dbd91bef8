use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    pub database: Option<DatabaseConfig>,
    pub storage: Option<StorageConfig>,
    pub tables: Option<TablesConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            server: Some(ServerConfig::default()),
            database: Some(DatabaseConfig::default()),
            storage: Some(StorageConfig::default()),
            tables: Some(TablesConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file; defaults to the platform data directory
    pub path: Option<String>,
    pub pool_size: u32,
    /// Drop and recreate every table at start-up
    pub reset_on_startup: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: 8,
            reset_on_startup: false,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub image_dir: String,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".to_string(),
            image_dir: "extracted_images".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct TablesConfig {
    pub enabled: bool,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[database]
# path = "/path/to/candidate_data.db"
pool_size = 8
# Drop and recreate all tables every time the server starts
reset_on_startup = false

[storage]
upload_dir = "uploads"
image_dir = "extracted_images"
max_upload_bytes = 20971520

[tables]
# Needs pdftotext (poppler-utils) on PATH; skipped silently otherwise
enabled = true
"#;

impl ApiConfig {
    /// Load from the default location, writing a commented default file first
    /// if none exists
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        builder.try_deserialize()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }

    pub fn storage(&self) -> StorageConfig {
        self.storage.clone().unwrap_or_default()
    }

    pub fn tables(&self) -> TablesConfig {
        self.tables.clone().unwrap_or_default()
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("resume-intake").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = ApiConfig::load_from(&path).unwrap();
        assert_eq!(config.server().port, 8080);
        assert_eq!(config.database().pool_size, 8);
        assert!(!config.database().reset_on_startup);
        assert_eq!(config.storage().upload_dir, "uploads");
        assert!(config.tables().enabled);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(&path, "[database]\npath = \"/tmp/x.db\"\n").unwrap();

        let config = ApiConfig::load_from(&path).unwrap();
        assert_eq!(config.database().path.as_deref(), Some("/tmp/x.db"));
        assert_eq!(config.database().pool_size, 8);
        assert_eq!(config.storage().image_dir, "extracted_images");
        assert_eq!(config.server().host, "127.0.0.1");
    }
}
