//! Utility functions for common operations.
//!
//! - **URL validation**: checks the configured feed URL before any request
//! - **Text processing**: terminal-safe sanitizing and width-aware truncation
//!   of feed-provided strings
//!
//! # Examples
//!
//! ```
//! use awwfeed::util::{display_width, truncate_to_width, validate_feed_url};
//!
//! let url = validate_feed_url("https://www.reddit.com/r/aww.json").unwrap();
//! assert_eq!(url.scheme(), "https");
//!
//! assert_eq!(display_width("Hello"), 5);
//! assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width};
pub use url_validator::{validate_feed_url, UrlValidationError};
