//! Feed loading: HTTP fetch, JSON decoding and the load state machine.
//!
//! - [`model`] - Wire envelope and the [`Post`] record decoded from it
//! - [`state`] - The tri-state [`LoadState`] published to the UI
//! - [`loader`] - [`FeedLoader`], which owns the state and drives every transition
//! - [`client`] - HTTP client construction (user agent, redirect policy)
//!
//! # Example
//!
//! ```ignore
//! use awwfeed::feed::{build_client, FeedLoader};
//!
//! let client = build_client("awwfeed/0.1")?;
//! let mut loader = FeedLoader::new(client, url);
//! loader.load().await;
//! match loader.state() { /* render */ }
//! ```

mod client;
mod loader;
mod model;
mod state;

pub use client::build_client;
pub use loader::{fetch_posts, FeedLoader, FetchError, LoadOutcome, LoadTicket, DEFAULT_TIMEOUT};
pub use model::{decode_posts, DecodeError, FeedResponse, Post};
pub use state::LoadState;
