use std::fmt::Display;

/// Tri-state result of a load attempt.
///
/// Exactly one variant is active at a time. The loader replaces the whole
/// value on every transition, so an observer never sees a half-updated state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState<T> {
    /// A load is in flight (or has not completed yet).
    #[default]
    Loading,
    /// The payload was fetched and decoded.
    Loaded(T),
    /// The load failed; holds a human-readable description.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded payload, if any.
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Loaded(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
