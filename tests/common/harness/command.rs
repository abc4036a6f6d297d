//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since not every test binary uses every helper
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `loam` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct LoamCommand {
    args: Vec<String>,
    envs: Vec<(String, String)>,
    home: Option<PathBuf>,
}

impl LoamCommand {
    /// Creates a new command for the `loam` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            envs: Vec::new(),
            home: None,
        }
    }

    /// Sets the `--db` option to specify the database file.
    pub fn db(mut self, path: &Path) -> Self {
        self.args.push("--db".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points the config and data directories at `dir`.
    pub fn home(mut self, dir: &Path) -> Self {
        self.home = Some(dir.to_path_buf());
        self
    }

    /// Sets an environment variable for the child process.
    pub fn env(mut self, key: &str, value: impl AsRef<str>) -> Self {
        self.envs.push((key.to_string(), value.as_ref().to_string()));
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("loam").expect("Failed to find loam binary");
        cmd.env_remove("LOAM_DB").env_remove("RUST_LOG");
        if let Some(home) = &self.home {
            cmd.env("HOME", home)
                .env("XDG_CONFIG_HOME", home.join("config"))
                .env("XDG_DATA_HOME", home.join("data"));
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    /// Runs the command and returns the `data` field of its JSON output.
    pub fn data(self) -> serde_json::Value {
        let mut value: serde_json::Value = self.format_json().output_json();
        value["data"].take()
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for a `page` subcommand.
    pub fn page<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["page"]).args(args)
    }

    /// Configures for a `block` subcommand.
    pub fn block<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["block"]).args(args)
    }

    /// Configures for a `link` subcommand.
    pub fn link<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["link"]).args(args)
    }

    /// Configures for an `audio` subcommand.
    pub fn audio<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args(["audio"]).args(args)
    }

    /// Configures for the `search` command with a query.
    pub fn search(self, query: &str) -> Self {
        self.args(["search", query])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for LoamCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        LoamCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_db() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("loam.db");
        let cmd = LoamCommand::new().db(&db);
        let args = cmd.get_args();
        assert_eq!(args[0], "--db");
        assert_eq!(args[1], db.to_string_lossy());
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = LoamCommand::new().page(["ls"]).format_json();
        assert_eq!(cmd.get_args(), ["page", "ls", "--format", "json"]);
    }
}
