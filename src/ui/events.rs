//! Application event handling.
//!
//! Applies the results of background tasks to the application state.

use crate::app::{App, AppEvent};

/// Handle an event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded(outcome) => {
            if !app.apply_load(outcome) {
                return;
            }
            // Tell screen reader users what happened without them having to move
            let state = app.loader.state();
            if let Some(message) = state.error() {
                app.set_status(format!("Error loading: {}", message));
            } else if let Some(posts) = state.loaded() {
                app.set_status(match posts.len() {
                    0 => "No posts".to_string(),
                    1 => "Loaded 1 post".to_string(),
                    n => format!("Loaded {} posts", n),
                });
            }
        }
        AppEvent::TaskPanicked {
            task,
            generation,
            error,
        } => {
            tracing::error!(task, generation, error, "Background task panicked");
            if app
                .loader
                .fail(generation, format!("Internal error in {} task", task))
            {
                app.clamp_selection();
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedLoader, FetchError, LoadOutcome};
    use crate::theme::ThemeVariant;
    use url::Url;

    fn test_app() -> App {
        let loader = FeedLoader::new(
            reqwest::Client::new(),
            Url::parse("https://example.com/r/aww.json").unwrap(),
        );
        App::new(loader, ThemeVariant::Dark)
    }

    fn status(app: &App) -> &str {
        app.status_message.as_ref().map(|(m, _)| m.as_ref()).unwrap_or("")
    }

    #[tokio::test]
    async fn test_feed_loaded_empty_announces_no_posts() {
        let mut app = test_app();
        let generation = app.loader.begin().generation();

        handle_app_event(
            &mut app,
            AppEvent::FeedLoaded(LoadOutcome {
                generation,
                result: Ok(Vec::new()),
            }),
        );

        assert_eq!(app.loader.state().loaded().map(Vec::len), Some(0));
        assert_eq!(status(&app), "No posts");
    }

    #[tokio::test]
    async fn test_feed_failed_announces_error() {
        let mut app = test_app();
        let generation = app.loader.begin().generation();

        handle_app_event(
            &mut app,
            AppEvent::FeedLoaded(LoadOutcome {
                generation,
                result: Err(FetchError::HttpStatus(404)),
            }),
        );

        assert_eq!(status(&app), "Error loading: HTTP error: status 404");
    }

    #[tokio::test]
    async fn test_stale_feed_loaded_is_ignored() {
        let mut app = test_app();
        let stale = app.loader.begin().generation();
        let _current = app.loader.begin();

        handle_app_event(
            &mut app,
            AppEvent::FeedLoaded(LoadOutcome {
                generation: stale,
                result: Ok(Vec::new()),
            }),
        );

        assert!(app.loader.state().is_loading());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_task_panic_fails_current_load() {
        let mut app = test_app();
        let generation = app.loader.begin().generation();

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "feed_load",
                generation,
                error: "boom".to_string(),
            },
        );

        assert_eq!(
            app.loader.state().error(),
            Some("Internal error in feed_load task")
        );
        assert_eq!(status(&app), "Internal error in feed_load task");
    }
}
