use serde::{Deserialize, Serialize};

/// Name of the environment variable pointing at the rule file.
pub const RULES_ENV_VAR: &str = "ACMEFMT_RULES";

/// Rule file name looked up in the user's config directory.
pub const RULES_FILE_NAME: &str = "rules.toml";

/// The complete rule file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Timeout per formatting command in milliseconds (0 waits forever)
    #[serde(default)]
    pub timeout: u64,

    /// Tag (menu) configuration shared by every window
    #[serde(default)]
    pub tag: TagConfig,

    /// Formatting specifications, one per group of extensions
    #[serde(default)]
    pub format: Vec<FormatConfig>,
}

/// Extra menu entries written to every window tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct TagConfig {
    #[serde(default)]
    pub menu: Vec<String>,
}

/// One `[[format]]` block.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct FormatConfig {
    /// Extensions with a leading dot (`.go`) or whole file names (`Makefile`)
    pub extensions: Vec<String>,

    /// Indent width; 0 disables formatting for these extensions
    #[serde(default)]
    pub indent: usize,

    /// Expand typed tabs into `indent` spaces
    #[serde(default)]
    pub tabexpand: bool,

    /// Commands run, in order, when the buffer is put
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

/// One external formatting command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CommandConfig {
    /// Program to run
    pub exec: String,

    /// Arguments; the literal `$NAME` is replaced by the temp file path
    #[serde(default)]
    pub args: Vec<String>,

    /// Whether the formatted result is printed on stdout (otherwise the temp file is rewritten)
    #[serde(default)]
    pub prints_to_stdout: bool,

    /// Keep stderr out of the result; by default both streams are captured together
    #[serde(default)]
    pub stdout_only: bool,
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the rule file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: std::io::Error, path: String },

    /// Failed to parse the rule file
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError { source: toml::de::Error, path: String },

    /// An explicitly requested rule file does not exist
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    /// The same extension appears in two `[[format]]` blocks
    #[error("Extension '{extension}' is configured more than once")]
    DuplicateExtension { extension: String },

    /// A command without a program name
    #[error("Format for '{extensions}' has a command with an empty exec")]
    EmptyCommand { extensions: String },
}
