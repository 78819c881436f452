use crate::models::StudioSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// File name of the studio settings inside the settings directory.
pub const SETTINGS_FILE_NAME: &str = "Studio Settings.yaml";

/// Configuration manager for loading and saving the studio settings file.
///
/// Settings (`Studio Settings.yaml`) hold the default pack configuration used
/// for new projects, logging options, and the export directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing the settings file (e.g., "Pack Studio Data")
    ///
    /// # Returns
    /// A new ConfigManager instance
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE_NAME),
            config_dir,
        })
    }

    /// Load the studio settings.
    ///
    /// # Returns
    /// The loaded StudioSettings, or defaults if the file doesn't exist
    pub fn load_settings(&self) -> Result<StudioSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
            return Ok(StudioSettings::default());
        }

        let file_contents = fs::read_to_string(&self.settings_path)
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: StudioSettings = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save the studio settings.
    ///
    /// # Arguments
    /// * `settings` - The StudioSettings to save
    pub fn save_settings(&self, settings: &StudioSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependency, Version};
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.settings_path().as_str().ends_with(SETTINGS_FILE_NAME));
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.load_settings().unwrap();
        assert_eq!(settings.default_pack.name, "My Awesome Pack");
        assert_eq!(settings.logging.log_dir, "logs");
    }

    #[test]
    fn test_load_save_settings() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut settings = StudioSettings::default();
        settings.default_pack.author = "Alex".to_string();
        settings.default_pack.version = Version::new(2, 0, 1);
        settings.default_pack.dependencies = vec![Dependency::new("@minecraft/server", "1.0.0")];
        settings.logging.debug_mode = true;
        manager.save_settings(&settings).unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded.default_pack, settings.default_pack);
        assert!(loaded.logging.debug_mode);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "Export Directory: out\n").unwrap();

        let loaded = manager.load_settings().unwrap();
        assert_eq!(loaded.export_dir, "out");
        assert_eq!(loaded.default_pack.author, "Player");
        assert!(loaded.logging.console_output);
    }

    #[test]
    fn test_invalid_settings_is_an_error() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "Logging: [unclosed").unwrap();
        assert!(manager.load_settings().is_err());
    }
}
