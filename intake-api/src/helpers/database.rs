use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::database::Database;

/// Returns the default path of the candidate database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/resume-intake/candidate_data.db`
/// - **Linux**: `~/.local/share/resume-intake/candidate_data.db`
/// - **Windows**: `%LOCALAPPDATA%\resume-intake\candidate_data.db`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("resume-intake").join("candidate_data.db"))
}

/// Configured database path, falling back to the platform default
pub fn resolve_db_path(config: &DatabaseConfig) -> anyhow::Result<PathBuf> {
    match &config.path {
        Some(path) => Ok(PathBuf::from(path)),
        None => get_db_path(),
    }
}

/// Initialize the database connection pool
pub fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<Arc<Database>> {
    let db_path = resolve_db_path(config)?;
    let db = Database::new(&db_path, config.pool_size, config.reset_on_startup)?;
    Ok(Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("candidates.db");
        let config = DatabaseConfig {
            path: Some(path.display().to_string()),
            ..Default::default()
        };

        let db = initialize_database(&config).unwrap();
        assert_eq!(db.path, path);
        assert!(path.exists());
    }

    #[test]
    fn test_default_path_file_name() {
        if let Ok(path) = get_db_path() {
            assert!(path.ends_with("resume-intake/candidate_data.db"));
        }
    }
}
