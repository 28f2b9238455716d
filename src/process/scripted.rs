//! Scripted process runner for tests (no external binary required)

use super::{EVENT_CHANNEL_BUFFER, OutputStream, ProcessEvent, ProcessHandle, ProcessRunner};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, mpsc};

/// How a scripted process ends
#[derive(Debug, Clone, Copy)]
pub(crate) enum Outcome {
    Exit(Option<i32>),
    FailToStart,
}

/// Canned behavior replayed for every `run` call
#[derive(Debug, Clone)]
pub(crate) struct Script {
    lines: Vec<(OutputStream, String)>,
    line_delay: Duration,
    outcome: Outcome,
    output_ext: Option<String>,
    hold: Option<Arc<Notify>>,
}

impl Script {
    pub(crate) fn exit(code: i32) -> Self {
        Self {
            lines: Vec::new(),
            line_delay: Duration::ZERO,
            outcome: Outcome::Exit(Some(code)),
            output_ext: None,
            hold: None,
        }
    }

    pub(crate) fn killed() -> Self {
        Self {
            outcome: Outcome::Exit(None),
            ..Self::exit(0)
        }
    }

    pub(crate) fn fail_to_start() -> Self {
        Self {
            outcome: Outcome::FailToStart,
            ..Self::exit(0)
        }
    }

    pub(crate) fn stdout(mut self, line: &str) -> Self {
        self.lines.push((OutputStream::Stdout, line.to_string()));
        self
    }

    pub(crate) fn stderr(mut self, line: &str) -> Self {
        self.lines.push((OutputStream::Stderr, line.to_string()));
        self
    }

    pub(crate) fn line_delay(mut self, delay: Duration) -> Self {
        self.line_delay = delay;
        self
    }

    /// Create `<template with %(ext)s replaced>` before exiting
    pub(crate) fn writes(mut self, ext: &str) -> Self {
        self.output_ext = Some(ext.to_string());
        self
    }

    /// Block before the terminal event until `notify` fires
    pub(crate) fn hold(mut self, notify: Arc<Notify>) -> Self {
        self.hold = Some(notify);
        self
    }
}

/// Replays a [`Script`] and records every invocation
#[derive(Debug)]
pub(crate) struct ScriptedRunner {
    script: Script,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl ScriptedRunner {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn output_path(args: &[String], ext: &str) -> Option<PathBuf> {
    let pos = args.iter().position(|a| a == "-o")?;
    let template = args.get(pos + 1)?;
    Some(PathBuf::from(template.replace("%(ext)s", ext)))
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, program: &Path, args: &[String]) -> ProcessHandle {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_path_buf(), args.to_vec()));

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let script = self.script.clone();
        let output = script
            .output_ext
            .as_deref()
            .and_then(|ext| output_path(args, ext));

        tokio::spawn(async move {
            if let Outcome::FailToStart = script.outcome {
                tx.send(ProcessEvent::FailedToStart {
                    reason: "No such file or directory (os error 2)".into(),
                })
                .await
                .ok();
                return;
            }

            for (stream, line) in script.lines {
                if !script.line_delay.is_zero() {
                    tokio::time::sleep(script.line_delay).await;
                }
                tx.send(ProcessEvent::Line { stream, line }).await.ok();
            }

            if let Some(hold) = script.hold {
                hold.notified().await;
            }

            if let Some(path) = output {
                tokio::fs::write(&path, b"media").await.unwrap();
            }

            if let Outcome::Exit(code) = script.outcome {
                tx.send(ProcessEvent::Exited { code }).await.ok();
            }
        });

        ProcessHandle::new(rx)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
