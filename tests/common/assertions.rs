//! Custom test assertions for integration tests

use media_dl::{Event, JobId};
use std::time::Duration;
use tokio::sync::broadcast;

/// Result of waiting for a job to finish
#[derive(Debug, PartialEq)]
pub enum WaitResult {
    /// Job completed with this file
    Completed(String),
    /// Job failed with this reason
    Failed(String),
    /// Timeout waiting for completion
    Timeout,
    /// Channel closed unexpectedly
    ChannelClosed,
}

/// Wait for a job to reach a terminal state
///
/// `events` must be subscribed before the job is submitted so no event is missed.
pub async fn wait_for_completion(
    events: &mut broadcast::Receiver<Event>,
    id: JobId,
    timeout: Duration,
) -> WaitResult {
    let result = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(Event::Completed { id: event_id, file }) if event_id == id => {
                    return WaitResult::Completed(file);
                }
                Ok(Event::Failed { id: event_id, error }) if event_id == id => {
                    return WaitResult::Failed(error);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return WaitResult::ChannelClosed,
            }
        }
    })
    .await;

    result.unwrap_or(WaitResult::Timeout)
}

/// Collect progress percentages reported for `id` until it finishes
pub async fn collect_progress(
    events: &mut broadcast::Receiver<Event>,
    id: JobId,
    timeout: Duration,
) -> Vec<f32> {
    let mut seen = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(Event::Progress { id: event_id, percent }) if event_id == id => {
                    seen.push(percent)
                }
                Ok(Event::Completed { id: event_id, .. } | Event::Failed { id: event_id, .. })
                    if event_id == id =>
                {
                    return;
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    })
    .await;
    seen
}
