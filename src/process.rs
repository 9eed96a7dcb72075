//! External tool invocation.
//!
//! Every call to `yt-dlp` or `ffmpeg` goes through a [`ToolRunner`], which keeps
//! the session logic independent of real processes. [`SystemRunner`] spawns the
//! tool with tokio, always in an explicit working directory, and optionally
//! bounds its run time.

use crate::error::{DownloaderError, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// A single external tool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name looked up on `PATH`.
    pub program: String,
    pub args: Vec<OsString>,
    /// Directory the tool runs in.
    pub current_dir: PathBuf,
    /// Echo the tool's stdout to the console while capturing it.
    pub stream_stdout: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>, current_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: current_dir.into(),
            stream_stdout: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream_stdout = true;
        self
    }

    /// Arguments as display strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// What a finished tool run left behind.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    /// Empty when stderr went straight to the console.
    pub stderr: String,
}

impl ToolOutput {
    /// Turn a non-zero exit into [`DownloaderError::ToolFailed`].
    pub fn check(self, tool: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(DownloaderError::ToolFailed {
                tool: tool.to_string(),
                code: self.code,
            })
        }
    }
}

/// Runs external tools to completion.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;
}

/// Runs tools as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ToolRunner for SystemRunner {
    #[instrument(skip_all, fields(tool = %invocation.program))]
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        debug!(
            "Running {} {:?} in {}",
            invocation.program,
            invocation.args_lossy(),
            invocation.current_dir.display()
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .current_dir(&invocation.current_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);

        if invocation.stream_stdout {
            cmd.stderr(Stdio::inherit());
        } else {
            cmd.stderr(Stdio::piped());
        }

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DownloaderError::ToolNotFound(invocation.program.clone())
            } else {
                DownloaderError::Io(e)
            }
        })?;

        let stdout_task = tokio::spawn(drain(child.stdout.take(), invocation.stream_stdout));
        let stderr_task = tokio::spawn(drain(child.stderr.take(), false));

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!("{} exceeded {:?}, killing it", invocation.program, limit);
                    if let Err(e) = child.kill().await {
                        warn!("Could not kill {}: {}", invocation.program, e);
                    }
                    stdout_task.abort();
                    stderr_task.abort();
                    return Err(DownloaderError::ToolTimeout {
                        tool: invocation.program.clone(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait().await?,
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        debug!("{} finished with {}", invocation.program, status);

        Ok(ToolOutput {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

/// Read a child pipe to the end, optionally echoing it to our stdout.
async fn drain<R: AsyncRead + Unpin>(reader: Option<R>, echo: bool) -> String {
    let Some(mut reader) = reader else {
        return String::new();
    };

    let mut console = tokio::io::stdout();
    let mut captured = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if echo {
                    let _ = console.write_all(&buf[..n]).await;
                    let _ = console.flush().await;
                }
                captured.extend_from_slice(&buf[..n]);
            }
        }
    }

    String::from_utf8_lossy(&captured).into_owned()
}
