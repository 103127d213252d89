//! Go toolchain executor: spawn `go test -bench`, stream its output.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, RecvTimeoutError};
use tracing::{debug, warn};

use benchvar_core::constants::KILL_GRACE_MILLIS;
use benchvar_core::errors::ExecError;

use super::{BenchExecutor, CancelToken, ExecOutput, ExecRequest};

/// How often the run loop checks the child, the deadline, and the token.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executor that runs benchmarks through a Go toolchain binary.
pub struct GoBenchExecutor {
    go_binary: PathBuf,
    cancel: CancelToken,
}

impl GoBenchExecutor {
    pub fn new(go_binary: PathBuf) -> Self {
        Self {
            go_binary,
            cancel: CancelToken::new(),
        }
    }

    /// Token that aborts a running invocation when fired.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn build_command(&self, request: &ExecRequest) -> Command {
        let mut cmd = Command::new(&self.go_binary);
        cmd.arg("test");
        match &request.filter {
            Some(filter) => cmd.arg(format!("-bench={filter}")),
            None => cmd.arg("-bench=."),
        };
        cmd.arg("-benchmem")
            .arg(format!("-count={}", request.sample_count))
            .arg(format!("-benchtime={}", request.benchtime))
            .arg(format!("-timeout={}s", request.timeout.as_secs()))
            .args(&request.packages)
            .current_dir(&request.working_dir)
            // Measure the toolchain we resolved, not whatever the module's
            // go.mod would auto-download.
            .env("GOTOOLCHAIN", "local")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl BenchExecutor for GoBenchExecutor {
    fn run(
        &self,
        request: &ExecRequest,
        sink: &mut dyn FnMut(&str),
    ) -> Result<ExecOutput, ExecError> {
        if !request.working_dir.is_dir() {
            return Err(ExecError::MissingWorkDir {
                path: request.working_dir.clone(),
            });
        }

        let mut cmd = self.build_command(request);
        debug!(?cmd, "spawning benchmark run");
        let mut child = cmd.spawn().map_err(|source| ExecError::Spawn {
            program: self.go_binary.display().to_string(),
            source,
        })?;

        // Stream stdout through a channel so the main loop can keep polling
        // the deadline and the cancellation token while no output arrives.
        let (line_tx, line_rx) = unbounded::<std::io::Result<String>>();
        let stdout = child.stdout.take().expect("stdout was piped");
        let stdout_thread = std::thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
        // Drain stderr separately; it joins the combined output at the end.
        let mut stderr = child.stderr.take().expect("stderr was piped");
        let stderr_thread = std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        });

        let started = Instant::now();
        let mut output = String::new();
        let mut stream_error: Option<std::io::Error> = None;

        let status = loop {
            match line_rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(line)) => {
                    sink(&line);
                    output.push_str(&line);
                    output.push('\n');
                }
                Ok(Err(source)) => {
                    stream_error = Some(source);
                    terminate(&mut child);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // stdout reached EOF; the child is finishing or done.
                    break child.wait().map_err(|source| ExecError::Stream { source })?;
                }
            }

            if self.cancel.is_cancelled() {
                warn!("cancellation requested, terminating benchmark run");
                terminate(&mut child);
                drop(line_rx);
                let _ = stdout_thread.join();
                let _ = stderr_thread.join();
                return Err(ExecError::Cancelled);
            }
            if started.elapsed() > request.timeout {
                warn!(timeout = ?request.timeout, "benchmark run exceeded timeout, terminating");
                terminate(&mut child);
                drop(line_rx);
                let _ = stdout_thread.join();
                let _ = stderr_thread.join();
                return Err(ExecError::Timeout {
                    timeout: request.timeout,
                });
            }
            if let Some(status) = child.try_wait().map_err(|source| ExecError::Stream { source })? {
                // Exited; collect whatever stdout is still in flight.
                while let Ok(message) = line_rx.recv_timeout(Duration::from_millis(200)) {
                    if let Ok(line) = message {
                        sink(&line);
                        output.push_str(&line);
                        output.push('\n');
                    }
                }
                break status;
            }
        };

        let _ = stdout_thread.join();
        let stderr_buf = stderr_thread.join().unwrap_or_default();
        if !stderr_buf.is_empty() {
            output.push_str(&String::from_utf8_lossy(&stderr_buf));
            if !output.ends_with('\n') {
                output.push('\n');
            }
        }
        if let Some(source) = stream_error {
            return Err(ExecError::Stream { source });
        }

        debug!(code = ?status.code(), elapsed = ?started.elapsed(), "benchmark run finished");
        Ok(ExecOutput {
            status_code: status.code(),
            output,
        })
    }
}

/// Stop the child: graceful termination first, forced kill after the grace
/// period.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    {
        // SAFETY: sending a signal to a pid we own; no memory is involved.
        unsafe {
            libc::kill(child.id() as libc::pid_t, libc::SIGTERM);
        }
        let grace = Duration::from_millis(KILL_GRACE_MILLIS);
        let waited = Instant::now();
        while waited.elapsed() < grace {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => std::thread::sleep(Duration::from_millis(50)),
                Err(_) => break,
            }
        }
    }
    if let Err(err) = child.kill() {
        debug!(%err, "kill after grace period failed (already exited?)");
    }
    let _ = child.wait();
}
