//! Execution of the external BLAST+ programs.
//!
//! Executable discovery and validation happen once at startup in the
//! embedding application; the invoker only receives the resolved absolute
//! paths and never looks a command up per request.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::bio::sequence::Query;
use crate::blast::Method;
use crate::error::Error;
use crate::Result;

#[derive(Debug)]
pub struct BlastInvoker {
    executables: HashMap<Method, PathBuf>,
    blastdbcmd: PathBuf,
    timeout: Option<Duration>,
}

impl BlastInvoker {
    /// `executables` maps each supported method to its resolved binary;
    /// `blastdbcmd` is the retrieval binary. All paths must already exist.
    pub fn new(executables: HashMap<Method, PathBuf>, blastdbcmd: PathBuf) -> Result<Self> {
        for (method, path) in &executables {
            if !path.is_file() {
                return Err(Error::System {
                    more_info: format!("{} executable not found at {}", method, path.display()),
                });
            }
        }
        if !blastdbcmd.is_file() {
            return Err(Error::System {
                more_info: format!("blastdbcmd executable not found at {}", blastdbcmd.display()),
            });
        }
        Ok(Self {
            executables,
            blastdbcmd,
            timeout: None,
        })
    }

    /// Bound the runtime of one external invocation. Unbounded by default.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn blastdbcmd(&self) -> &Path {
        &self.blastdbcmd
    }

    /// Run one search and return the raw textual report. An empty report
    /// is returned as-is; deciding whether emptiness is an error is the
    /// parser's job.
    pub fn run(&self, method: Method, db_file_list: &str, query: &Query) -> Result<String> {
        let exe = self.executables.get(&method).ok_or_else(|| Error::System {
            more_info: format!("no executable configured for {}", method),
        })?;

        let mut query_file = tempfile::NamedTempFile::new()?;
        query_file.write_all(query.text().as_bytes())?;
        query_file.flush()?;

        let mut cmd = Command::new(exe);
        cmd.arg("-db")
            .arg(db_file_list)
            .arg("-query")
            .arg(query_file.path());

        info!(%method, db = db_file_list, "running alignment");
        let output = self.execute(cmd, method.name())?;
        // query_file is dropped (and unlinked) only after the child exited.
        drop(query_file);

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(bytes = stdout.len(), "captured alignment output");
        Ok(stdout)
    }

    /// Run a prepared command to completion, honoring the configured
    /// timeout, and make sure the child is reaped on every path.
    pub(crate) fn execute(&self, mut cmd: Command, label: &str) -> Result<Output> {
        match self.timeout {
            None => {
                let output = cmd.output().map_err(|e| Error::System {
                    more_info: format!("failed to start {}: {}", label, e),
                })?;
                self.check_status(&output, label)?;
                Ok(output)
            }
            Some(limit) => {
                // Piped output can deadlock a polled child once the pipe
                // fills, so stdout/stderr go to unlinked temp files.
                let mut stdout_file = tempfile::tempfile()?;
                let mut stderr_file = tempfile::tempfile()?;
                cmd.stdin(Stdio::null())
                    .stdout(stdout_file.try_clone()?)
                    .stderr(stderr_file.try_clone()?);

                let mut child = cmd.spawn().map_err(|e| Error::System {
                    more_info: format!("failed to start {}: {}", label, e),
                })?;

                let started = Instant::now();
                let status = loop {
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                    if started.elapsed() > limit {
                        child.kill().ok();
                        child.wait()?;
                        return Err(Error::System {
                            more_info: format!(
                                "{} exceeded the {}s time limit and was killed",
                                label,
                                limit.as_secs()
                            ),
                        });
                    }
                    std::thread::sleep(Duration::from_millis(50));
                };

                let mut stdout = Vec::new();
                stdout_file.rewind()?;
                stdout_file.read_to_end(&mut stdout)?;
                let mut stderr = Vec::new();
                stderr_file.rewind()?;
                stderr_file.read_to_end(&mut stderr)?;

                let output = Output {
                    status,
                    stdout,
                    stderr,
                };
                self.check_status(&output, label)?;
                Ok(output)
            }
        }
    }

    fn check_status(&self, output: &Output, label: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let more_info = match output.status.code() {
            Some(code) => format!("{} exited with code {}: {}", label, code, stderr.trim()),
            None => format!("{} was terminated by a signal: {}", label, stderr.trim()),
        };
        Err(Error::System { more_info })
    }
}
