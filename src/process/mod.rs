//! External process execution
//!
//! The [`ProcessRunner`] trait launches a command and hands back a
//! [`ProcessHandle`]: a stream of output lines tagged by source stream,
//! closed by exactly one terminal event. The orchestrator only ever sees
//! these events, which keeps it independent of how processes are started.
//!
//! - [`CommandRunner`]: tokio-backed implementation used in production

mod runner;
#[cfg(test)]
pub(crate) mod scripted;

pub use runner::CommandRunner;

use std::path::Path;
use tokio::sync::mpsc;

/// Buffer size of the per-process event channel
pub(crate) const EVENT_CHANNEL_BUFFER: usize = 256;

/// Which stream an output line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Standard output
    Stdout,
    /// Standard error
    Stderr,
}

/// Event produced by a running process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// One line of output
    Line {
        /// Source stream
        stream: OutputStream,
        /// Line content without the terminator
        line: String,
    },
    /// The process exited; `None` when it was terminated by a signal
    Exited {
        /// Exit code
        code: Option<i32>,
    },
    /// The process could not be started
    FailedToStart {
        /// OS-level reason
        reason: String,
    },
}

impl ProcessEvent {
    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessEvent::Line { .. })
    }
}

/// Receiving end of a launched process
///
/// Yields every output line, then exactly one terminal event, then `None`.
#[derive(Debug)]
pub struct ProcessHandle {
    events: mpsc::Receiver<ProcessEvent>,
    finished: bool,
}

impl ProcessHandle {
    /// Wrap a receiver fed by a runner
    pub fn new(events: mpsc::Receiver<ProcessEvent>) -> Self {
        Self {
            events,
            finished: false,
        }
    }

    /// Next event, or `None` once the terminal event has been delivered
    ///
    /// A runner that drops its sender without a terminal event is reported as
    /// a signal exit so callers always observe an ending.
    pub async fn next_event(&mut self) -> Option<ProcessEvent> {
        if self.finished {
            return None;
        }
        let event = match self.events.recv().await {
            Some(event) => event,
            None => ProcessEvent::Exited { code: None },
        };
        if event.is_terminal() {
            self.finished = true;
        }
        Some(event)
    }

    /// Drain the process, collecting stdout lines and the terminal event
    pub async fn collect_stdout(mut self) -> (Vec<String>, ProcessEvent) {
        let mut lines = Vec::new();
        while let Some(event) = self.next_event().await {
            match event {
                ProcessEvent::Line {
                    stream: OutputStream::Stdout,
                    line,
                } => lines.push(line),
                ProcessEvent::Line { .. } => {}
                terminal => return (lines, terminal),
            }
        }
        (lines, ProcessEvent::Exited { code: None })
    }
}

/// Launches external commands
///
/// Implementations create one OS process per call and must always deliver a
/// terminal event on the returned handle. Failures are reported, never
/// retried.
pub trait ProcessRunner: Send + Sync {
    /// Start `program` with `args`
    fn run(&self, program: &Path, args: &[String]) -> ProcessHandle;

    /// Short name for logging
    fn name(&self) -> &'static str;
}
