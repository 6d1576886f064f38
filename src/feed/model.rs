//! Wire model for the post feed.
//!
//! The feed wraps every post twice: `{"data": {"children": [{"data": {...}}]}}`.
//! The envelope types mirror that nesting exactly so the payload can be
//! decoded straight from the response body, then [`FeedResponse::into_posts`]
//! flattens it into the ordered list the rest of the crate works with.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use url::Url;

/// The response body could not be decoded into posts.
///
/// Covers malformed JSON, missing required fields, wrong field types,
/// malformed URLs in required fields and out-of-range timestamps.
#[derive(Debug, Error)]
#[error("Invalid feed payload: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

/// One item of the feed.
///
/// Constructed only by decoding a feed response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    /// The post's `url`, which doubles as its stable identity.
    #[serde(rename = "url")]
    pub identity: Url,
    pub title: String,
    /// Absent when the feed has no usable image for the post.
    #[serde(rename = "thumbnail", default, deserialize_with = "thumbnail_url")]
    pub thumbnail_url: Option<Url>,
    pub author: String,
    #[serde(rename = "created", deserialize_with = "epoch_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub data: Listing,
}

/// The `data` object holding the ordered children.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub children: Vec<Child>,
}

/// A single child entry wrapping one post under `data`.
#[derive(Debug, Deserialize)]
pub struct Child {
    pub data: Post,
}

impl FeedResponse {
    /// Flatten `data.children[i].data` into posts, preserving order.
    pub fn into_posts(self) -> Vec<Post> {
        self.data.children.into_iter().map(|c| c.data).collect()
    }
}

/// Decode a response body into the ordered list of posts.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<Post>, DecodeError> {
    let response: FeedResponse = serde_json::from_slice(bytes)?;
    Ok(response.into_posts())
}

/// Thumbnails are optional. The feed also uses placeholder words such as
/// `"self"`, `"default"` or `""` in this field; anything that is not an
/// absolute URL is treated as "no image".
fn thumbnail_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| Url::parse(&s).ok()))
}

/// Numeric seconds since the Unix epoch, integral or fractional.
fn epoch_seconds<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() {
        return Err(D::Error::custom(format!("timestamp is not finite: {secs}")));
    }

    let whole = secs.floor();
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);

    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {secs}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_single_post() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","author":"a","created":1600000000}}]}}"#;

        let posts = decode_posts(body).unwrap();

        assert_eq!(
            posts,
            vec![Post {
                identity: Url::parse("https://x/1").unwrap(),
                title: "Cat".to_string(),
                thumbnail_url: None,
                author: "a".to_string(),
                created_at: Utc.with_ymd_and_hms(2020, 9, 13, 12, 26, 40).unwrap(),
            }]
        );
    }

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"{"data":{"children":[
            {"data":{"url":"https://x/3","title":"C","author":"z","created":3}},
            {"data":{"url":"https://x/1","title":"A","author":"x","created":1}},
            {"data":{"url":"https://x/2","title":"B","author":"y","created":2}}
        ]}}"#;

        let titles: Vec<String> = decode_posts(body)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();

        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_decode_empty_children() {
        let posts = decode_posts(br#"{"data":{"children":[]}}"#).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_thumbnail_present() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","thumbnail":"https://img.example/t.jpg","author":"a","created":1}}]}}"#;
        let posts = decode_posts(body).unwrap();
        assert_eq!(
            posts[0].thumbnail_url.as_ref().map(Url::as_str),
            Some("https://img.example/t.jpg")
        );
    }

    #[test]
    fn test_thumbnail_null_is_absent() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","thumbnail":null,"author":"a","created":1}}]}}"#;
        let posts = decode_posts(body).unwrap();
        assert_eq!(posts[0].thumbnail_url, None);
    }

    #[test]
    fn test_thumbnail_placeholder_is_absent() {
        for placeholder in ["self", "default", "nsfw", ""] {
            let body = format!(
                r#"{{"data":{{"children":[{{"data":{{"url":"https://x/1","title":"Cat","thumbnail":"{placeholder}","author":"a","created":1}}}}]}}}}"#
            );
            let posts = decode_posts(body.as_bytes()).unwrap();
            assert_eq!(posts[0].thumbnail_url, None, "placeholder {placeholder:?}");
        }
    }

    #[test]
    fn test_fractional_created() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","author":"a","created":1600000000.5}}]}}"#;
        let posts = decode_posts(body).unwrap();
        assert_eq!(posts[0].created_at.timestamp(), 1_600_000_000);
        assert_eq!(posts[0].created_at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_created_as_string_fails() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","title":"Cat","author":"a","created":"yesterday"}}]}}"#;
        let err = decode_posts(body).unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_missing_title_fails() {
        let body = br#"{"data":{"children":[{"data":{"url":"https://x/1","author":"a","created":1}}]}}"#;
        let err = decode_posts(body).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_malformed_url_fails() {
        let body = br#"{"data":{"children":[{"data":{"url":"not a url","title":"Cat","author":"a","created":1}}]}}"#;
        assert!(decode_posts(body).is_err());
    }

    #[test]
    fn test_malformed_json_fails() {
        assert!(decode_posts(b"{\"data\":").is_err());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let body = br#"{"kind":"Listing","data":{"after":"t3_x","children":[{"kind":"t3","data":{"url":"https://x/1","title":"Cat","author":"a","created":1,"ups":42}}]}}"#;
        let posts = decode_posts(body).unwrap();
        assert_eq!(posts.len(), 1);
    }
}
