//! awwfeed: an accessible terminal viewer for a JSON post feed.
//!
//! The library holds everything except process setup, so integration tests
//! can drive the loader, accessibility tree and UI state directly.

pub mod accessibility;
pub mod app;
pub mod config;
pub mod feed;
pub mod keybindings;
pub mod rating;
pub mod theme;
pub mod ui;
pub mod util;
