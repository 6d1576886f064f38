//! Helper functions for UI operations.
//!
//! Background task spawning and panic capture shared by the input and
//! event handlers.

use crate::app::{App, AppEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of the task silently disappearing (caught by Tokio's runtime but not
/// handled), panics are converted to `Err(String)` containing the panic message.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Start a feed load on a background task.
///
/// The loader switches to `Loading` immediately and aborts any load still in
/// flight. The result comes back as `AppEvent::FeedLoaded`, tagged with its
/// generation so a superseded result is dropped on arrival.
pub(super) fn spawn_feed_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let ticket = app.loader.begin();
    let generation = ticket.generation();
    let tx = event_tx.clone();

    tracing::debug!(generation, "Spawning feed load task");

    let handle = tokio::spawn(async move {
        let event = match catch_task_panic(ticket.run()).await {
            Ok(outcome) => AppEvent::FeedLoaded(outcome),
            Err(error) => {
                tracing::error!(error = %error, generation, "Feed load task panicked");
                AppEvent::TaskPanicked {
                    task: "feed_load",
                    generation,
                    error,
                }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send feed load result (receiver dropped)");
        }
    });

    app.loader.track(handle);
    app.clamp_selection();
}
