//! Input handling for the TUI.
//!
//! Keys are resolved to actions through the keybinding registry, using the
//! context of the current view and focus.

use crate::app::{App, AppEvent, Focus, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::rating::Rating;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_feed_load;
use super::Action;

/// Map the current view and focus to a keybinding context.
fn current_context(app: &App) -> KbContext {
    match (app.view, app.focus) {
        (View::Detail, _) => KbContext::Detail,
        (View::List, Focus::Rating) => KbContext::Rating,
        (View::List, Focus::Posts) => KbContext::PostList,
    }
}

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Help overlay captures all keys when visible
    if app.show_help {
        return handle_help_input(app, code);
    }

    let context = current_context(app);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown if app.view == View::Detail => app.scroll_down(1),
        KbAction::NavUp if app.view == View::Detail => app.scroll_up(1),
        KbAction::NavDown => {
            app.nav_down();
            app.announce_focus();
        }
        KbAction::NavUp => {
            app.nav_up();
            app.announce_focus();
        }
        KbAction::ScrollDown => app.scroll_down(1),
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::CycleFocus => {
            if app.view == View::List {
                app.cycle_focus();
                app.announce_focus();
            }
        }
        KbAction::Back => match (app.view, app.focus) {
            (View::Detail, _) => {
                app.exit_detail();
                app.announce_focus();
            }
            (View::List, Focus::Rating) => {
                app.focus = Focus::Posts;
                app.announce_focus();
            }
            (View::List, Focus::Posts) => {}
        },
        KbAction::Select => {
            if app.view == View::List && app.focus == Focus::Posts && !app.enter_detail() {
                app.set_status("Nothing to open");
            }
        }
        KbAction::Refresh => {
            if app.view == View::Detail {
                app.exit_detail();
            }
            spawn_feed_load(app, event_tx);
            app.set_status("Loading posts...");
        }
        KbAction::RatingUp => adjust_rating(app, |r| r.increment()),
        KbAction::RatingDown => adjust_rating(app, |r| r.decrement()),
        KbAction::SetRating(n) => adjust_rating(app, |r| r.set(n)),
        // The open post's only action is showing the detail already on screen
        KbAction::PerformAccessibilityAction if app.view == View::Detail => {}
        KbAction::PerformAccessibilityAction => {
            if app.perform_accessibility_action() {
                app.announce_focus();
            } else {
                app.set_status("No action available");
            }
        }
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
    }

    Action::Continue
}

/// Change the rating from the list view and announce the new value.
fn adjust_rating(app: &mut App, change: impl FnOnce(&mut Rating)) {
    if app.view != View::List {
        return;
    }
    change(&mut app.rating);
    tracing::debug!(rating = app.rating.value(), "Rating changed");
    app.set_status(format!("Rating {}", app.rating));
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}
