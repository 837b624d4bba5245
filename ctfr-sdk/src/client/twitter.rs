//! Twitter client (tweet creation and media upload).
//!
//! Requests are signed with OAuth 1.0a user-context credentials, see
//! [`crate::oauth`].

use reqwest::Client;
use url::Url;

use super::{ClientError, parse_response};
use crate::oauth::{AUTHORIZATION_HEADER, OAuthCredentials};
use crate::objects::twitter::{CreateTweetRequest, CreatedTweet, MediaUploadResponse, TweetMedia};

/// Typed HTTP client for posting as a single Twitter account.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    credentials: OAuthCredentials,
    tweets_url: Url,
    media_upload_url: Url,
}

impl TwitterClient {
    pub const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
    pub const MEDIA_UPLOAD_URL: &str = "https://upload.twitter.com/1.1/media/upload.json";

    /// Create a new `TwitterClient` against the public Twitter endpoints.
    pub fn new(http: Client, credentials: OAuthCredentials) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            credentials,
            tweets_url: Url::parse(Self::TWEETS_URL)?,
            media_upload_url: Url::parse(Self::MEDIA_UPLOAD_URL)?,
        })
    }

    /// Point the client at different endpoints (e.g. a local test server).
    pub fn with_endpoints(mut self, tweets_url: Url, media_upload_url: Url) -> Self {
        self.tweets_url = tweets_url;
        self.media_upload_url = media_upload_url;
        self
    }

    /// `POST /2/tweets` – publish a tweet, optionally with uploaded media.
    pub async fn create_tweet(
        &self,
        text: &str,
        media_ids: &[String],
    ) -> Result<CreatedTweet, ClientError> {
        let body = CreateTweetRequest {
            text: text.to_string(),
            media: (!media_ids.is_empty()).then(|| TweetMedia {
                media_ids: media_ids.to_vec(),
            }),
        };
        let json = serde_json::to_string(&body)?;

        // JSON bodies are not covered by the OAuth signature.
        let auth = self
            .credentials
            .authorization_header("POST", self.tweets_url.as_str(), &[]);

        let resp = self
            .http
            .post(self.tweets_url.clone())
            .header(AUTHORIZATION_HEADER, auth)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `POST /1.1/media/upload.json` – upload an image, returning its media id.
    ///
    /// The image is sent base64-encoded in the `media_data` form field so
    /// that it takes part in the OAuth signature like any other form field.
    pub async fn upload_media(&self, image: &[u8]) -> Result<String, ClientError> {
        let media_data = fast32::base64::RFC4648.encode(image);
        let form = [("media_data", media_data.as_str())];

        let auth = self
            .credentials
            .authorization_header("POST", self.media_upload_url.as_str(), &form);

        let resp = self
            .http
            .post(self.media_upload_url.clone())
            .header(AUTHORIZATION_HEADER, auth)
            .form(&form)
            .send()
            .await?;

        let uploaded: MediaUploadResponse = parse_response(resp).await?;
        Ok(uploaded.media_id_string)
    }
}
