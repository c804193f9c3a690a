use std::path::{Path, PathBuf};

use etcetera::{BaseStrategy, choose_base_strategy};

use super::types::{Config, ConfigError, RULES_ENV_VAR, RULES_FILE_NAME};

impl Config {
    /// Parse a rule file from TOML text. `path` is used for error messages only.
    pub fn from_toml(content: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::ParseError {
            source,
            path: path.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the rule file.
    ///
    /// Precedence: explicit path, then `$ACMEFMT_RULES`, then
    /// `<config dir>/acmefmt/rules.toml`. With none of them present the empty
    /// configuration is returned and nothing gets formatted.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                });
            }
            return Self::load_file(path);
        }

        if let Ok(value) = std::env::var(RULES_ENV_VAR)
            && !value.is_empty()
        {
            log::debug!("[acmefmt-config] Using ${RULES_ENV_VAR}={value}");
            return Self::load_file(Path::new(&value));
        }

        if let Some(path) = default_rules_path()
            && path.exists()
        {
            log::debug!("[acmefmt-config] Found {}", path.display());
            return Self::load_file(&path);
        }

        log::warn!("No rule file found; no extension will be formatted");
        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: display.clone(),
        })?;
        Self::from_toml(&content, &display)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for format in &self.format {
            for ext in &format.extensions {
                if !seen.insert(ext.as_str()) {
                    return Err(ConfigError::DuplicateExtension { extension: ext.clone() });
                }
            }
            if format.commands.iter().any(|cmd| cmd.exec.trim().is_empty()) {
                return Err(ConfigError::EmptyCommand {
                    extensions: format.extensions.join(","),
                });
            }
        }
        Ok(())
    }
}

/// `<config dir>/acmefmt/rules.toml`, if a home directory can be determined.
pub fn default_rules_path() -> Option<PathBuf> {
    choose_base_strategy()
        .ok()
        .map(|strategy| strategy.config_dir().join("acmefmt").join(RULES_FILE_NAME))
}
