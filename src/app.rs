use crate::accessibility::{adjust_rating, Accessible, AccessibleElement, ActionKind};
use crate::feed::{FeedLoader, LoadOutcome, Post};
use crate::keybindings::KeybindingRegistry;
use crate::rating::Rating;
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::Instant;

/// Maximum scroll offset for the detail view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,   // Rating control + post list
    Detail, // Full-screen view of one post
}

/// Which control has focus in the list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Rating,
    Posts,
}

// ============================================================================
// Event Types
// ============================================================================

/// Messages sent from background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A feed load finished (successfully or not).
    FeedLoaded(LoadOutcome),
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "feed_load")
    /// - `generation`: Load generation the task was working for
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked {
        task: &'static str,
        generation: u64,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// Owns the feed's load state and every transition of it.
    pub loader: FeedLoader,

    // Theme
    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    /// Keybinding registry for action-key mapping with config overrides.
    pub keybindings: KeybindingRegistry,

    // UI State
    pub view: View,
    pub focus: Focus,
    pub selected: usize,
    /// Scroll offset in the detail view.
    pub scroll_offset: usize,

    /// Session rating. Not persisted.
    pub rating: Rating,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
    /// Scroll offset in the help screen for long keybinding lists.
    pub help_scroll_offset: usize,

    /// Current frame of the loading spinner animation.
    ///
    /// Incremented by the tick handler while the feed is loading.
    pub spinner_frame: usize,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(loader: FeedLoader, theme_variant: ThemeVariant) -> Self {
        Self {
            loader,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings: KeybindingRegistry::new(),
            view: View::List,
            focus: Focus::Posts,
            selected: 0,
            scroll_offset: 0,
            rating: Rating::default(),
            status_message: None,
            show_help: false,
            help_scroll_offset: 0,
            spinner_frame: 0,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    ///
    /// Returns `Style::default()` for unknown roles.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant.
    ///
    /// Returns the name of the new theme for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    /// Loaded posts, or an empty slice while loading or after a failure.
    pub fn posts(&self) -> &[Post] {
        self.loader.posts()
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.posts().get(self.selected)
    }

    /// Keep the selection inside the loaded list. Call after every load.
    pub fn clamp_selection(&mut self) {
        let len = self.posts().len();
        self.selected = self.selected.min(len.saturating_sub(1));

        // A reload can remove the post being shown
        if self.view == View::Detail && self.selected_post().is_none() {
            self.exit_detail();
        }
    }

    /// Apply a finished load and clamp the selection.
    ///
    /// Returns `false` if the outcome was superseded.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        let applied = self.loader.finish(outcome);
        if applied {
            self.clamp_selection();
        }
        applied
    }

    /// Navigate up. Moving up from the first post focuses the rating control.
    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Rating => {}
            Focus::Posts if self.selected == 0 => self.focus = Focus::Rating,
            Focus::Posts => self.selected = self.selected.saturating_sub(1),
        }
    }

    /// Navigate down. Moving down from the rating control focuses the list.
    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Rating => self.focus = Focus::Posts,
            Focus::Posts => {
                let max_index = self.posts().len().saturating_sub(1);
                self.selected = self.selected.saturating_add(1).min(max_index);
            }
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Rating => Focus::Posts,
            Focus::Posts => Focus::Rating,
        };
    }

    /// Scroll up in detail view
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    /// Scroll down in detail view
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll offset so the last content line stays on screen.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Enter the detail view for the selected post.
    ///
    /// Returns `false` if there is no post to show.
    pub fn enter_detail(&mut self) -> bool {
        if self.selected_post().is_none() {
            return false;
        }
        self.view = View::Detail;
        self.scroll_offset = 0;
        true
    }

    /// Exit detail view back to the list
    pub fn exit_detail(&mut self) {
        self.view = View::List;
        self.scroll_offset = 0;
    }

    /// Accessibility element for whatever currently has focus.
    ///
    /// In the list view with nothing to select, the load state itself is the
    /// focused element, so the user hears "Loading posts" or the error.
    pub fn focused_element(&self) -> AccessibleElement {
        match (self.view, self.focus) {
            (View::List, Focus::Rating) => self.rating.accessibility(),
            _ => match self.selected_post() {
                Some(post) => post.accessibility(),
                None => self.loader.state().accessibility(),
            },
        }
    }

    /// Perform the primary accessibility action of the focused element.
    ///
    /// Returns `false` if the element has no action to perform.
    pub fn perform_accessibility_action(&mut self) -> bool {
        let element = self.focused_element();
        let Some(action) = element.actions.first() else {
            return false;
        };

        tracing::debug!(action = %action.name, label = %element.label, "Performing accessibility action");

        match action.kind {
            ActionKind::Increment | ActionKind::Decrement => {
                adjust_rating(&mut self.rating, action.kind)
            }
            ActionKind::ShowDetails => self.enter_detail(),
        }
    }

    /// Put the spoken form of the focused element in the status bar.
    pub fn announce_focus(&mut self) {
        let text = self.focused_element().announce();
        self.set_status(text);
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort the in-flight load when the App goes away so no task outlives the
/// event loop.
impl Drop for App {
    fn drop(&mut self) {
        self.loader.abort_in_flight();
    }
}
