//! Isolated test environment with temp directory.

use super::LoamCommand;
use loam::store::SqliteStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with its own database file.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Commands run against `loam.db` inside it, with config and data
/// directories redirected there too.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the environment's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the database used by `cmd()`.
    pub fn db_path(&self) -> PathBuf {
        self.root.join("loam.db")
    }

    /// Opens the environment's database directly, for seeding and checks.
    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.db_path()).expect("Failed to open test database")
    }

    /// Creates a LoamCommand configured for this test environment.
    pub fn cmd(&self) -> LoamCommand {
        LoamCommand::new().home(&self.root).db(&self.db_path())
    }

    /// Creates a LoamCommand without `--db`, so the path comes from config.
    pub fn bare_cmd(&self) -> LoamCommand {
        LoamCommand::new().home(&self.root)
    }

    /// Writes a file to the test environment and returns its path.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.root().is_dir());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_db_path_is_inside_root() {
        let env = TestEnv::new();
        assert!(env.db_path().starts_with(env.root()));
        assert!(env.db_path().ends_with("loam.db"));
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], env.db_path().to_string_lossy());
    }

    #[test]
    fn test_env_store_creates_database() {
        let env = TestEnv::new();
        let _store = env.store();
        assert!(env.db_path().exists());
    }
}
