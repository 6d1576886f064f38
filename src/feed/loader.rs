use crate::feed::model::{decode_posts, DecodeError, Post};
use crate::feed::state::LoadState;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Default per-load timeout, covering connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while fetching and decoding the feed.
///
/// None of these escape the loader: [`FeedLoader::finish`] turns every one of
/// them into [`LoadState::Failed`] carrying the `Display` text.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The load did not finish within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was received but is not a valid feed payload
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Outcome of one load attempt, tagged with the generation that started it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<Vec<Post>, FetchError>,
}

/// Everything needed to perform one load, detached from the loader.
///
/// Returned by [`FeedLoader::begin`] so the fetch can run on a background task
/// while the loader stays owned by the UI.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Perform the fetch and decode.
    pub async fn run(self) -> LoadOutcome {
        let result = fetch_posts(&self.client, &self.url, self.timeout).await;
        LoadOutcome {
            generation: self.generation,
            result,
        }
    }
}

/// Owns the feed's [`LoadState`] and every transition of it.
///
/// Overlapping loads are resolved by cancel-and-restart: [`begin`](Self::begin)
/// aborts the tracked in-flight task and bumps the generation, and
/// [`finish`](Self::finish) drops outcomes from older generations.
#[derive(Debug)]
pub struct FeedLoader {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
    state: LoadState<Vec<Post>>,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl FeedLoader {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self {
            client,
            url,
            timeout: DEFAULT_TIMEOUT,
            state: LoadState::Loading,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Current state, for rendering.
    pub fn state(&self) -> &LoadState<Vec<Post>> {
        &self.state
    }

    /// Loaded posts, or an empty slice while loading or after a failure.
    pub fn posts(&self) -> &[Post] {
        self.state.loaded().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetch, decode and publish the result. Never fails; errors end up in
    /// [`LoadState::Failed`].
    pub async fn load(&mut self) {
        let ticket = self.begin();
        let outcome = ticket.run().await;
        self.finish(outcome);
    }

    /// Start a new load: abort whatever is in flight, switch to `Loading` and
    /// hand back the ticket that performs the request.
    pub fn begin(&mut self) -> LoadTicket {
        self.abort_in_flight();

        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;

        tracing::info!(url = %self.url, generation = self.generation, "Loading feed");

        LoadTicket {
            generation: self.generation,
            client: self.client.clone(),
            url: self.url.clone(),
            timeout: self.timeout,
        }
    }

    /// Remember the task running the current ticket so a later
    /// [`begin`](Self::begin) can abort it.
    pub fn track(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.in_flight.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the tracked in-flight task, if any. The state is left as is.
    pub fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            tracing::debug!(generation = self.generation, "Aborted in-flight feed load");
        }
    }

    /// Apply a finished load. Returns `false` if the outcome belongs to a
    /// superseded generation and was discarded.
    pub fn finish(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding superseded feed load"
            );
            return false;
        }

        self.in_flight = None;

        match &outcome.result {
            Ok(posts) => tracing::info!(count = posts.len(), "Feed loaded"),
            Err(e) => tracing::warn!(url = %self.url, error = %e, "Feed load failed"),
        }

        self.state = outcome.result.into();
        true
    }

    /// Publish a failure that happened outside the fetch itself, such as the
    /// background task panicking. Ignored for superseded generations.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = None;
        self.state = LoadState::Failed(message.into());
        true
    }
}

/// One GET of `url`, then decode the body into posts.
///
/// The whole exchange (connect, headers, body) is bounded by `timeout`.
/// Non-2xx responses fail without reading the body. No retries.
pub async fn fetch_posts(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
) -> Result<Vec<Post>, FetchError> {
    let bytes = tokio::time::timeout(timeout, fetch_body(client, url))
        .await
        .map_err(|_| FetchError::Timeout(timeout))??;

    let posts = decode_posts(&bytes)?;
    Ok(posts)
}

async fn fetch_body(client: &reqwest::Client, url: &Url) -> Result<Vec<u8>, FetchError> {
    let response = client.get(url.as_str()).send().await?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    read_limited_bytes(response, MAX_FEED_SIZE).await
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ONE_POST: &str = r#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","author":"a","created":1600000000}}]}}"#;

    async fn loader_for(server: &MockServer) -> FeedLoader {
        let url = Url::parse(&format!("{}/r/aww.json", server.uri())).unwrap();
        FeedLoader::new(reqwest::Client::new(), url)
    }

    async fn mount_body(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/r/aww.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("Content-Type", "application/json"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_new_loader_starts_loading() {
        let loader = FeedLoader::new(
            reqwest::Client::new(),
            Url::parse("https://example.com/feed.json").unwrap(),
        );
        assert!(loader.state().is_loading());
        assert!(loader.posts().is_empty());
        assert_eq!(loader.generation(), 0);
    }

    #[tokio::test]
    async fn test_load_success() {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, ONE_POST).await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;

        let posts = loader.state().loaded().expect("expected Loaded");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Cat");
        assert_eq!(posts[0].identity.as_str(), "https://x/1");
        assert_eq!(posts[0].created_at.timestamp(), 1_600_000_000);
    }

    #[tokio::test]
    async fn test_load_empty_children() {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, r#"{"data":{"children":[]}}"#).await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;

        assert_eq!(loader.state(), &LoadState::Loaded(Vec::new()));
    }

    #[tokio::test]
    async fn test_load_404_fails_with_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;

        let message = loader.state().error().expect("expected Failed");
        assert!(message.contains("404"), "message was {message}");
    }

    #[tokio::test]
    async fn test_load_500_is_not_retried() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;

        assert!(loader.state().error().is_some());
    }

    #[tokio::test]
    async fn test_load_malformed_created_fails() {
        let mock_server = MockServer::start().await;
        mount_body(
            &mock_server,
            r#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","author":"a","created":"soon"}}]}}"#,
        )
        .await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;

        assert!(!loader.state().is_loading());
        let message = loader.state().error().expect("expected Failed");
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_load_connection_refused() {
        let mut loader = FeedLoader::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:1/r/aww.json").unwrap(),
        );
        loader.load().await;

        let message = loader.state().error().expect("expected Failed");
        assert!(message.starts_with("Request failed"), "message was {message}");
    }

    #[tokio::test]
    async fn test_load_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ONE_POST)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let mut loader = loader_for(&mock_server)
            .await
            .with_timeout(Duration::from_millis(100));
        loader.load().await;

        let message = loader.state().error().expect("expected Failed");
        assert!(message.contains("timed out"), "message was {message}");
    }

    #[tokio::test]
    async fn test_load_twice_is_idempotent() {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, ONE_POST).await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;
        let first = loader.state().clone();
        loader.load().await;

        assert_eq!(loader.state(), &first);
        assert_eq!(loader.generation(), 2);
    }

    #[tokio::test]
    async fn test_begin_sets_loading_after_loaded() {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, ONE_POST).await;

        let mut loader = loader_for(&mock_server).await;
        loader.load().await;
        assert!(loader.state().loaded().is_some());

        let _ticket = loader.begin();
        assert!(loader.state().is_loading());
    }

    #[tokio::test]
    async fn test_stale_outcome_is_discarded() {
        let mock_server = MockServer::start().await;
        mount_body(&mock_server, ONE_POST).await;

        let mut loader = loader_for(&mock_server).await;
        let stale = loader.begin();
        let current = loader.begin();

        let stale_outcome = LoadOutcome {
            generation: stale.generation(),
            result: Err(FetchError::HttpStatus(500)),
        };
        assert!(!loader.finish(stale_outcome));
        assert!(loader.state().is_loading());

        assert!(loader.finish(current.run().await));
        assert!(loader.state().loaded().is_some());
    }

    #[tokio::test]
    async fn test_begin_aborts_tracked_task() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ONE_POST)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let mut loader = loader_for(&mock_server).await;
        let (tx, mut rx) = mpsc::channel::<LoadOutcome>(1);

        let ticket = loader.begin();
        let handle = tokio::spawn(async move {
            let outcome = ticket.run().await;
            let _ = tx.send(outcome).await;
        });
        loader.track(handle);

        let _restart = loader.begin();

        // The aborted task drops its sender without sending.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_fail_applies_only_to_current_generation() {
        let mut loader = FeedLoader::new(
            reqwest::Client::new(),
            Url::parse("https://example.com/feed.json").unwrap(),
        );
        let first = loader.begin().generation();
        let second = loader.begin().generation();

        assert!(!loader.fail(first, "old panic"));
        assert!(loader.state().is_loading());

        assert!(loader.fail(second, "task panicked"));
        assert_eq!(loader.state().error(), Some("task panicked"));
    }

    #[tokio::test]
    async fn test_oversized_content_length_rejected() {
        let mock_server = MockServer::start().await;
        let body = "x".repeat(MAX_FEED_SIZE + 1);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let url = Url::parse(&mock_server.uri()).unwrap();
        let result = fetch_posts(&reqwest::Client::new(), &url, DEFAULT_TIMEOUT).await;
        assert!(matches!(result, Err(FetchError::ResponseTooLarge)));
    }
}
