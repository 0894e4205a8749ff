//! [`TestSettingsDir`] scratch directory for load/save scenarios.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with a settings file at a fixed name.
///
/// # Example
///
/// ```rust,no_run
/// use settngs_test_utils::dir::TestSettingsDir;
///
/// let dir = TestSettingsDir::new();
/// dir.write_settings(r#"{"example": {"hello": "world"}}"#);
/// dir.assert_settings_json(serde_json::json!({"example": {"hello": "world"}}));
/// ```
pub struct TestSettingsDir {
    temp_dir: TempDir,
    file_name: String,
}

impl Default for TestSettingsDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSettingsDir {
    /// Create an empty directory using `settings.json` as the settings file.
    pub fn new() -> Self {
        Self::with_file_name("settings.json")
    }

    /// Create an empty directory using `file_name` as the settings file.
    pub fn with_file_name(file_name: &str) -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            file_name: file_name.to_string(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Full path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.root().join(&self.file_name)
    }

    /// Overwrite the settings file with `content`.
    pub fn write_settings(&self, content: &str) {
        fs::write(self.settings_path(), content).unwrap();
    }

    /// Read the settings file as text.
    ///
    /// # Panics
    /// Panics if the file does not exist.
    pub fn read_settings(&self) -> String {
        let path = self.settings_path();
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read settings file: {}", path.display()))
    }

    /// Assert that the settings file does **not** exist.
    pub fn assert_no_settings(&self) {
        let path = self.settings_path();
        assert!(
            !path.exists(),
            "Expected settings file NOT to exist: {}",
            path.display()
        );
    }

    /// Assert that the settings file parses to `expected`.
    ///
    /// # Panics
    /// Panics if the file is missing, is not JSON, or differs from `expected`.
    pub fn assert_settings_json(&self, expected: Value) {
        let content = self.read_settings();
        let actual: Value = serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Settings file is not JSON: {}\n{}", e, content));
        assert_eq!(
            actual, expected,
            "Settings file differs.\nExpected: {}\nActual: {}",
            expected, actual
        );
    }
}
