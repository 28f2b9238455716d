//! tokio-backed process runner

use super::{EVENT_CHANNEL_BUFFER, OutputStream, ProcessEvent, ProcessHandle, ProcessRunner};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How long output readers may keep draining after the process has exited
pub(crate) const OUTPUT_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Runs commands with `tokio::process`
///
/// stdout and stderr are read concurrently, line by line, as the process
/// writes them. Once the process exits, the readers get a short grace period
/// to reach EOF before the exit event is sent, so a descendant that
/// inherited the pipes cannot hold a finished job open.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a runner
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for CommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> ProcessHandle {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let program = program.to_path_buf();
        let args = args.to_vec();

        tokio::spawn(async move {
            let spawned = Command::new(&program)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    tracing::warn!(program = %program.display(), error = %e, "Failed to start process");
                    tx.send(ProcessEvent::FailedToStart {
                        reason: e.to_string(),
                    })
                    .await
                    .ok();
                    return;
                }
            };

            tracing::debug!(program = %program.display(), pid = ?child.id(), "Process started");

            let stdout_task = child
                .stdout
                .take()
                .map(|out| tokio::spawn(forward_lines(out, OutputStream::Stdout, tx.clone())));
            let stderr_task = child
                .stderr
                .take()
                .map(|err| tokio::spawn(forward_lines(err, OutputStream::Stderr, tx.clone())));

            let mut readers: Vec<JoinHandle<()>> =
                [stdout_task, stderr_task].into_iter().flatten().collect();

            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    tracing::warn!(program = %program.display(), error = %e, "Failed to wait for process");
                    None
                }
            };

            let drained = tokio::time::timeout(OUTPUT_DRAIN_TIMEOUT, async {
                for task in readers.iter_mut() {
                    if let Err(e) = task.await {
                        tracing::warn!(error = %e, "Output reader task failed");
                    }
                }
            })
            .await;
            if drained.is_err() {
                tracing::debug!(program = %program.display(), "Output still open after exit, abandoning readers");
                for task in &readers {
                    task.abort();
                }
            }

            tracing::debug!(program = %program.display(), ?code, "Process exited");
            tx.send(ProcessEvent::Exited { code }).await.ok();
        });

        ProcessHandle::new(rx)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Read `reader` to EOF, forwarding each `\n`- or `\r`-terminated line
///
/// The extractor redraws its progress line with carriage returns when it is
/// not told to use newlines, so both count as terminators. Non-UTF-8 bytes
/// are replaced rather than aborting the stream.
async fn forward_lines<R>(reader: R, stream: OutputStream, tx: mpsc::Sender<ProcessEvent>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                for line in text.split(['\n', '\r']).filter(|l| !l.is_empty()) {
                    let event = ProcessEvent::Line {
                        stream,
                        line: line.to_string(),
                    };
                    if tx.send(event).await.is_err() {
                        // Receiver gone; keep draining so the child never blocks on a full pipe
                        continue;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(?stream, error = %e, "Error reading process output");
                break;
            }
        }
    }
}
