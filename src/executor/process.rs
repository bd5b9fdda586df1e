use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use super::command::{invocation_args, render_command};
use super::output::{parse_output, ObservedFields};
use crate::error::{error_codes, AcvpError, AcvpResult};
use crate::vectors::TestCase;

/// Default per-case execution limit
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);
// How long to wait for pipe readers once a timed-out child has been killed.
// A grandchild that inherited the pipes can keep them open indefinitely.
const READER_GRACE: Duration = Duration::from_secs(1);

/// Raw result of one child process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Everything observed while running one test case
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub command: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
    pub fields: ObservedFields,
}

/// Runs test cases against an implementation binary
#[derive(Debug, Clone)]
pub struct CaseExecutor {
    timeout: Option<Duration>,
}

impl CaseExecutor {
    /// `None` disables the per-case timeout
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run one case and parse its output.
    ///
    /// # Errors
    ///
    /// * `ExecutionError` if the binary cannot be spawned or exits non-zero
    /// * `TimeoutError` if the case exceeds the configured limit
    /// * `MalformedOutputError` if a stdout line is not `key=value`
    pub fn execute(&self, binary: &Path, case: &TestCase<'_>) -> AcvpResult<ExecutionOutcome> {
        let args = invocation_args(case);
        log::debug!(
            "tcId {} ({}): {}",
            case.tc_id(),
            case.function(),
            render_command(binary, &args)
        );

        let output = run_command(binary, &args, self.timeout)?;
        if !output.status.success() {
            return Err(AcvpError::nonzero_exit(
                &output.command,
                output.status.code(),
                &output.stderr,
            ));
        }

        let fields = parse_output(&output.stdout)?;
        Ok(ExecutionOutcome {
            command: output.command,
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
            elapsed: output.elapsed,
            fields,
        })
    }
}

impl Default for CaseExecutor {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}

/// Spawn `binary` with `args`, capture both pipes and wait for it.
///
/// A non-zero exit is not an error at this level; the caller decides.
pub fn run_command(
    binary: &Path,
    args: &[String],
    timeout: Option<Duration>,
) -> AcvpResult<ProcessOutput> {
    let command = render_command(binary, args);
    let started = Instant::now();

    let mut process = Command::new(program_path(binary));
    process
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own process group, so a timeout can kill anything the binary forked.
        process.process_group(0);
    }
    let mut child = process
        .spawn()
        .map_err(|err| AcvpError::spawn_failed(&command, &err.to_string()))?;

    let stdout_rx = spawn_reader(child.stdout.take());
    let stderr_rx = spawn_reader(child.stderr.take());
    let deadline = timeout.map(|limit| started + limit);

    match wait_with_timeout(&mut child, deadline) {
        Ok(Some(status)) => {
            // The pipes stay open while a background descendant holds them,
            // so reading is bounded by the same deadline as the wait.
            let stdout = collect_until(&stdout_rx, deadline);
            let stderr = collect_until(&stderr_rx, deadline);
            match (stdout, stderr) {
                (Some(stdout), Some(stderr)) => Ok(ProcessOutput {
                    command,
                    status,
                    stdout,
                    stderr,
                    elapsed: started.elapsed(),
                }),
                (_, stderr) => {
                    let limit = timeout.unwrap_or_default();
                    log::warn!(
                        "{} exited but its output stayed open past {:?}; killing its process group",
                        command,
                        limit
                    );
                    kill_process_group(&child);
                    let stderr = stderr.unwrap_or_else(|| collect(&stderr_rx, READER_GRACE));
                    Err(AcvpError::timeout(&command, limit, &stderr))
                }
            }
        }
        Ok(None) => {
            let limit = timeout.unwrap_or_default();
            log::warn!("Killing {} after {:?}", command, limit);
            kill_process_group(&child);
            let _ = child.kill();
            let _ = child.wait();
            let stderr = collect(&stderr_rx, READER_GRACE);
            Err(AcvpError::timeout(&command, limit, &stderr))
        }
        Err(err) => {
            kill_process_group(&child);
            let _ = child.kill();
            let _ = child.wait();
            Err(AcvpError::ExecutionError {
                command,
                cause: format!("failed waiting for child: {}", err),
                exit_code: None,
                stderr: String::new(),
                error_code: error_codes::OUTPUT_CAPTURE_FAILED,
            })
        }
    }
}

// A bare file name would be looked up on PATH; resolved binaries are always
// meant relative to the working directory.
fn program_path(binary: &Path) -> PathBuf {
    if binary.components().count() == 1 && !binary.is_absolute() {
        Path::new(".").join(binary)
    } else {
        binary.to_path_buf()
    }
}

/// Poll the child until it exits; `Ok(None)` means the deadline passed.
fn wait_with_timeout(
    child: &mut Child,
    deadline: Option<Instant>,
) -> std::io::Result<Option<ExitStatus>> {
    let mut interval = Duration::from_millis(1);
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
        thread::sleep(interval);
        interval = (interval * 2).min(MAX_POLL_INTERVAL);
    }
}

// The group id is the child's pid (`process_group(0)`). It stays valid after
// the leader is reaped for as long as any member is alive.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) takes no pointers; a negative pid addresses the group.
    let result = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if result != 0 {
        log::debug!(
            "Process group {} already gone: {}",
            pgid,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut source) = source {
            if let Err(err) = source.read_to_end(&mut buffer) {
                log::debug!("Pipe read ended early: {}", err);
            }
        }
        let _ = tx.send(buffer);
    });
    rx
}

/// Wait for a reader until `deadline`; `None` means it did not finish in time.
fn collect_until(rx: &Receiver<Vec<u8>>, deadline: Option<Instant>) -> Option<String> {
    let bytes = match deadline {
        None => rx.recv().unwrap_or_default(),
        Some(deadline) => {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(bytes) => bytes,
                Err(RecvTimeoutError::Disconnected) => Vec::new(),
                Err(RecvTimeoutError::Timeout) => return None,
            }
        }
    };
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Whatever a reader delivers within `grace`, or nothing.
fn collect(rx: &Receiver<Vec<u8>>, grace: Duration) -> String {
    let bytes = rx.recv_timeout(grace).unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}
