//! Settings taken from the process environment, read once at startup.

/// Environment variable that switches on debug logging.
pub const DEBUG_ENV_VAR: &str = "DEBUG";

/// Tab width acme exports to commands run from a window.
pub const TABSTOP_ENV_VAR: &str = "tabstop";

/// File name acme exports to commands run from a window.
pub const SAMFILE_ENV_VAR: &str = "samfile";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("invalid $tabstop: {value:?} is not a positive integer")]
    InvalidTabstop { value: String },
    #[error("$tabstop is not set")]
    MissingTabstop,
}

/// Environment-derived settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSettings {
    /// Debug logging requested. Nothing else branches on this.
    pub debug: bool,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        Self {
            debug: std::env::var_os(DEBUG_ENV_VAR).is_some_and(|v| !v.is_empty()),
        }
    }
}

/// Parse a `$tabstop` value.
pub fn parse_tabstop(value: Option<&str>) -> Result<usize, EnvError> {
    let Some(value) = value else {
        return Err(EnvError::MissingTabstop);
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EnvError::InvalidTabstop {
            value: value.to_string(),
        }),
    }
}

/// Read and parse `$tabstop`.
pub fn tabstop_from_env() -> Result<usize, EnvError> {
    parse_tabstop(std::env::var(TABSTOP_ENV_VAR).ok().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_tabstop() {
        assert_eq!(parse_tabstop(Some("4")), Ok(4));
        assert_eq!(parse_tabstop(Some(" 8\n")), Ok(8));
        assert_eq!(parse_tabstop(None), Err(EnvError::MissingTabstop));
        assert_eq!(
            parse_tabstop(Some("0")),
            Err(EnvError::InvalidTabstop { value: "0".to_string() })
        );
        assert!(matches!(parse_tabstop(Some("wide")), Err(EnvError::InvalidTabstop { .. })));
    }

    #[test]
    #[serial]
    fn test_debug_toggle() {
        // SAFETY: serialised with every other test that touches the environment
        unsafe { std::env::set_var(DEBUG_ENV_VAR, "1") };
        assert!(EnvSettings::from_env().debug);

        unsafe { std::env::set_var(DEBUG_ENV_VAR, "") };
        assert!(!EnvSettings::from_env().debug);

        unsafe { std::env::remove_var(DEBUG_ENV_VAR) };
        assert!(!EnvSettings::from_env().debug);
    }
}
