/// Exit codes for acmefmt
///
/// These exit codes let scripts tell a lost editor connection apart from a
/// bad configuration.
/// Success - Nothing went wrong
pub const SUCCESS: i32 = 0;

/// The acme event stream could not be attached or was lost
pub const LISTENER_LOST: i32 = 1;

/// Tool error - Configuration error, environment error, or I/O error
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::{LISTENER_LOST, TOOL_ERROR};

    /// Exit after losing the editor (1)
    pub fn listener_lost() -> ! {
        std::process::exit(LISTENER_LOST);
    }

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
