//! Accessibility tree for the UI.
//!
//! Every visible control has an [`AccessibleElement`] describing what a screen
//! reader should present: a role, a label, an optional value and the named
//! actions the user can invoke. Elements deliberately differ from what is
//! drawn:
//!
//! - A post row is drawn as title + byline, but is exposed as a single item
//!   labelled with the title; the byline moves into a named "Details" action.
//! - The star rating is drawn as five buttons, but is exposed as one
//!   adjustable slider over the same value.
//!
//! [`AccessibleElement::announce`] renders an element as the linear text a
//! screen reader would speak. The terminal UI shows it in the status bar and
//! screen-reader mode prints it line by line.

use crate::feed::{LoadState, Post};
use crate::rating::Rating;
use crate::util::single_line;
use chrono::{DateTime, Utc};
use std::fmt;

/// Semantic role of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    List,
    ListItem,
    Slider,
    ProgressIndicator,
    StaticText,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::ListItem => "list item",
            Self::Slider => "slider",
            Self::ProgressIndicator => "progress indicator",
            Self::StaticText => "text",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an accessibility action does when performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Increment,
    Decrement,
    ShowDetails,
}

/// A named action exposed to assistive technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibleAction {
    pub name: String,
    pub kind: ActionKind,
}

impl AccessibleAction {
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Accessibility representation of one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibleElement {
    pub role: Role,
    pub label: String,
    pub value: Option<String>,
    pub hint: Option<String>,
    pub actions: Vec<AccessibleAction>,
}

impl AccessibleElement {
    pub fn new(role: Role, label: impl Into<String>) -> Self {
        Self {
            role,
            label: label.into(),
            value: None,
            hint: None,
            actions: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_action(mut self, action: AccessibleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// First action of the given kind.
    pub fn action(&self, kind: ActionKind) -> Option<&AccessibleAction> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Linear spoken form: `label, role[, value][. hint][. Actions: a, b]`.
    pub fn announce(&self) -> String {
        let mut text = format!("{}, {}", self.label, self.role);
        if let Some(value) = &self.value {
            text.push_str(", ");
            text.push_str(value);
        }
        if let Some(hint) = &self.hint {
            text.push_str(". ");
            text.push_str(hint);
        }
        if !self.actions.is_empty() {
            let names: Vec<&str> = self.actions.iter().map(|a| a.name.as_str()).collect();
            text.push_str(". Actions: ");
            text.push_str(&names.join(", "));
        }
        text
    }
}

/// Types that can describe themselves to assistive technology.
pub trait Accessible {
    fn accessibility(&self) -> AccessibleElement;
}

/// Date as spoken in post details: day, abbreviated month, year.
pub fn spoken_date(at: &DateTime<Utc>) -> String {
    at.format("%-d %b %Y").to_string()
}

/// Name of the details action for a post.
pub fn details_action_name(post: &Post) -> String {
    format!(
        "Details: by u/{} on {}",
        single_line(&post.author),
        spoken_date(&post.created_at)
    )
}

// Feed text is folded to one line so each announcement stays a single line
// of output and no escape sequence reaches the terminal.
impl Accessible for Post {
    fn accessibility(&self) -> AccessibleElement {
        AccessibleElement::new(Role::ListItem, single_line(&self.title)).with_action(
            AccessibleAction::new(details_action_name(self), ActionKind::ShowDetails),
        )
    }
}

impl Accessible for Rating {
    fn accessibility(&self) -> AccessibleElement {
        AccessibleElement::new(Role::Slider, "Rating")
            .with_value(self.to_string())
            .with_hint("Adjustable")
            .with_action(AccessibleAction::new("Increment", ActionKind::Increment))
            .with_action(AccessibleAction::new("Decrement", ActionKind::Decrement))
    }
}

impl Accessible for LoadState<Vec<Post>> {
    fn accessibility(&self) -> AccessibleElement {
        match self {
            LoadState::Loading => AccessibleElement::new(Role::ProgressIndicator, "Loading posts"),
            LoadState::Failed(message) => {
                AccessibleElement::new(
                    Role::StaticText,
                    format!("Error loading: {}", single_line(message)),
                )
            }
            LoadState::Loaded(posts) => {
                let count = match posts.len() {
                    0 => "No posts".to_string(),
                    1 => "1 post".to_string(),
                    n => format!("{} posts", n),
                };
                AccessibleElement::new(Role::List, "Posts").with_value(count)
            }
        }
    }
}

/// Distance one increment or decrement moves the rating slider.
pub const SLIDER_STEP: f64 = 1.0;

/// Perform an adjustment action on the rating slider.
///
/// The slider moves one step on its own scale and the rating snaps to the
/// nearest star. Returns `false` for actions the slider does not support.
pub fn adjust_rating(rating: &mut Rating, kind: ActionKind) -> bool {
    let position = match kind {
        ActionKind::Increment => rating.as_slider() + SLIDER_STEP,
        ActionKind::Decrement => rating.as_slider() - SLIDER_STEP,
        ActionKind::ShowDetails => return false,
    };
    *rating = Rating::from_slider(position);
    true
}

/// Screen-reader transcript of the whole list view, one announcement per line:
/// the rating slider, the load state, then every loaded post.
pub fn transcript(rating: &Rating, state: &LoadState<Vec<Post>>) -> Vec<String> {
    let mut lines = vec![
        rating.accessibility().announce(),
        state.accessibility().announce(),
    ];
    if let Some(posts) = state.loaded() {
        lines.extend(posts.iter().map(|p| p.accessibility().announce()));
    }
    lines
}
