//! Runs one external formatting command against a buffer snapshot.
//!
//! The snapshot is written to a fresh temp file whose path replaces the
//! `$NAME` argument. The result is either the command's output or the temp
//! file as the command left it. Output is stdout and stderr interleaved on
//! one pipe, unless the command asks for stdout only.

use std::io::{self, Read, Write};
use std::process::{Child, Command as Process, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use super::error::RunError;
use super::resolver::{Command, NAME_PLACEHOLDER};

/// Executor for formatting commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Per-command timeout in milliseconds; 0 waits forever.
    timeout_ms: u64,
}

impl CommandRunner {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Run `command` against `snapshot` and return the formatted bytes.
    ///
    /// `ext` only decorates the temp file name. The temp file is removed when
    /// this returns, whatever the outcome.
    pub fn run(&self, snapshot: &[u8], command: &Command, ext: &str) -> Result<Vec<u8>, RunError> {
        let tmp = write_snapshot(snapshot, ext)?;
        let args = replace_name(&command.args, &tmp.path().to_string_lossy());

        log::debug!("Running {} {:?}", command.executable, args);
        let output = self.execute(&command.executable, &args, !command.stdout_only)?;

        if !output.stderr.is_empty() {
            log::debug!(
                "{} stderr: {}",
                command.executable,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        if !output.status.success() {
            // Merged streams leave stderr empty; report what the command printed.
            let diagnostics = if command.stdout_only { &output.stderr } else { &output.stdout };
            return Err(RunError::Failed {
                program: command.executable.clone(),
                status: output.status.to_string(),
                output: String::from_utf8_lossy(diagnostics).trim_end().to_string(),
            });
        }

        if command.prints_to_stdout {
            Ok(output.stdout)
        } else {
            // Read by path: tools that rewrite in place often replace the inode.
            std::fs::read(tmp.path()).map_err(|source| RunError::ReadBack { source })
        }
    }

    /// Spawn `program` and collect its output. With `combined`, stderr shares
    /// the stdout pipe and `ProcessOutput::stdout` holds both streams.
    fn execute(&self, program: &str, args: &[String], combined: bool) -> Result<ProcessOutput, RunError> {
        let launch = |source| RunError::Launch {
            program: program.to_string(),
            source,
        };

        let mut process = Process::new(program);
        process.args(args).stdin(Stdio::null());
        let merged = if combined {
            let (reader, writer) = io::pipe().map_err(launch)?;
            process.stdout(writer.try_clone().map_err(launch)?).stderr(writer);
            Some(reader)
        } else {
            process.stdout(Stdio::piped()).stderr(Stdio::piped());
            None
        };
        let mut child = process.spawn().map_err(launch)?;
        // The builder holds our copies of the write end; the reader sees EOF only once they close.
        drop(process);

        let stdout_handle = match merged {
            Some(reader) => Some(thread::spawn(move || read_pipe(reader))),
            None => child.stdout.take().map(|pipe| thread::spawn(move || read_pipe(pipe))),
        };
        let stderr_handle = child.stderr.take().map(|pipe| thread::spawn(move || read_pipe(pipe)));

        // On timeout the readers are left detached; grandchildren may still hold the pipes.
        let status = self.wait(&mut child, program)?;

        let io_error = |message| RunError::Io {
            program: program.to_string(),
            message,
        };
        let stdout = join_reader(stdout_handle).map_err(io_error)?;
        let stderr = join_reader(stderr_handle).map_err(io_error)?;

        Ok(ProcessOutput { status, stdout, stderr })
    }

    fn wait(&self, child: &mut Child, program: &str) -> Result<ExitStatus, RunError> {
        let io_error = |action: &str, e: io::Error| RunError::Io {
            program: program.to_string(),
            message: format!("Failed to {action}: {e}"),
        };

        if self.timeout_ms == 0 {
            return child.wait().map_err(|e| io_error("wait", e));
        }

        let timeout = Duration::from_millis(self.timeout_ms);
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(|e| io_error("poll", e))? {
                return Ok(status);
            }
            if start.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(RunError::Timeout {
                    program: program.to_string(),
                    timeout_ms: self.timeout_ms,
                });
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

struct ProcessOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn write_snapshot(snapshot: &[u8], ext: &str) -> Result<NamedTempFile, RunError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("acmefmt")
        .suffix(ext)
        .tempfile()
        .map_err(|source| RunError::TempFile { source })?;
    tmp.write_all(snapshot)
        .and_then(|()| tmp.flush())
        .map_err(|source| RunError::TempFile { source })?;
    Ok(tmp)
}

/// Replace every argument that is exactly `$NAME` with `name`.
pub fn replace_name(args: &[String], name: &str) -> Vec<String> {
    args.iter()
        .map(|arg| {
            if arg == NAME_PLACEHOLDER {
                name.to_string()
            } else {
                arg.clone()
            }
        })
        .collect()
}

fn read_pipe<R: Read>(mut pipe: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(buf)
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<Vec<u8>>>>) -> Result<Vec<u8>, String> {
    match handle {
        Some(handle) => match handle.join() {
            Ok(res) => res.map_err(|e| format!("Failed to read output: {e}")),
            Err(_) => Err("Output reader thread panicked".to_string()),
        },
        None => Ok(Vec::new()),
    }
}
