use std::io;

/// Failure of a single formatting command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Creating or writing the snapshot temp file failed.
    #[error("Failed to prepare temp file: {source}")]
    TempFile {
        #[source]
        source: io::Error,
    },

    /// The program could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program exited unsuccessfully. `output` is what it printed:
    /// stderr alone for stdout-only commands, both streams otherwise.
    #[error("'{program}' failed ({status}): {output}")]
    Failed {
        program: String,
        status: String,
        output: String,
    },

    /// The program outlived the configured timeout and was killed.
    #[error("'{program}' timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    /// Waiting on the program or collecting its output failed.
    #[error("I/O error while running '{program}': {message}")]
    Io { program: String, message: String },

    /// Reading the rewritten temp file back failed.
    #[error("Failed to read back formatted temp file: {source}")]
    ReadBack {
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// True for failures of the external process itself, as opposed to local I/O.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::Failed { .. } | Self::Timeout { .. })
    }
}

/// Failure of a save-hook pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The window id no longer maps to a live buffer.
    #[error("No window for buffer {id}; it was probably closed")]
    StaleBuffer { id: usize },

    /// A configured command failed; nothing was written to the buffer.
    /// `index` is the command's position in the spec, starting at 0.
    #[error("Command #{} ('{program}') failed: {source}", .index + 1)]
    Command {
        index: usize,
        program: String,
        #[source]
        source: RunError,
    },

    /// Reading or writing the live buffer failed.
    #[error("Buffer I/O failed for window {id}: {source}")]
    Buffer {
        id: usize,
        #[source]
        source: io::Error,
    },
}
