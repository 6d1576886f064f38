//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch
//! - `helpers` - Background task spawning and panic capture
//! - `posts` - Rating control and post list widgets
//! - `detail` - Post detail widget
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod detail;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod posts;
mod render;
mod status;

pub use loop_runner::{run, Action};
