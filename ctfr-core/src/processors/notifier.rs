//! Notifier.
//!
//! Abstracts over the posting channel. [`TwitterNotifier`] posts for real;
//! [`DryRunNotifier`] prints what would have been posted so the bot can run
//! without credentials.

use async_trait::async_trait;
use bytes::Bytes;
use ctfr_sdk::client::{ClientError, TwitterClient};
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while posting a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The post itself failed.
    #[error("post failed: {0}")]
    Post(#[source] ClientError),

    /// The image to attach could not be downloaded.
    #[error("image fetch from {url} failed: {reason}")]
    ImageFetch { url: String, reason: String },

    /// The image could not be uploaded.
    #[error("image upload failed: {0}")]
    ImageUpload(#[source] ClientError),

    /// The dry-run output could not be written.
    #[error("dry-run output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Outbound posting channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Post a text-only message.
    async fn post(&self, text: &str) -> Result<(), NotifyError>;

    /// Post a message with an image attached.
    ///
    /// Implementations fall back to a text-only post when the image cannot
    /// be fetched; only a failure of the post itself is an error.
    async fn post_with_image(&self, text: &str, image_url: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Box<T> {
    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        (**self).post(text).await
    }

    async fn post_with_image(&self, text: &str, image_url: &str) -> Result<(), NotifyError> {
        (**self).post_with_image(text, image_url).await
    }
}

/// Posts to Twitter.
pub struct TwitterNotifier {
    client: TwitterClient,
    http_client: reqwest::Client,
}

impl TwitterNotifier {
    /// Create a new TwitterNotifier.
    ///
    /// # Arguments
    ///
    /// * `client` - Signed Twitter client of the posting account
    /// * `http_client` - Plain client used to download event logos
    pub fn new(client: TwitterClient, http_client: reqwest::Client) -> Self {
        Self {
            client,
            http_client,
        }
    }

    /// Download an image.
    async fn fetch_image(&self, url: &str) -> Result<Bytes, NotifyError> {
        let fetch_error = |reason: String| NotifyError::ImageFetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("status {status}")));
        }

        response.bytes().await.map_err(|e| fetch_error(e.to_string()))
    }

    /// Download and upload an image, returning its media id.
    async fn attach_image(&self, image_url: &str) -> Result<String, NotifyError> {
        let image = self.fetch_image(image_url).await?;
        debug!(image_url, size = image.len(), "Fetched image");
        self.client
            .upload_media(&image)
            .await
            .map_err(NotifyError::ImageUpload)
    }
}

#[async_trait]
impl Notifier for TwitterNotifier {
    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        let tweet = self
            .client
            .create_tweet(text, &[])
            .await
            .map_err(NotifyError::Post)?;
        info!(tweet_id = %tweet.data.id, "Posted tweet");
        Ok(())
    }

    async fn post_with_image(&self, text: &str, image_url: &str) -> Result<(), NotifyError> {
        let media_id = match self.attach_image(image_url).await {
            Ok(media_id) => media_id,
            Err(e) => {
                warn!(image_url, error = %e, "Image unavailable, posting text only");
                return self.post(text).await;
            }
        };

        let tweet = self
            .client
            .create_tweet(text, std::slice::from_ref(&media_id))
            .await
            .map_err(NotifyError::Post)?;
        info!(tweet_id = %tweet.data.id, media_id = %media_id, "Posted tweet with image");
        Ok(())
    }
}

/// Prints notifications instead of posting them.
pub struct DryRunNotifier {
    out: Mutex<Box<dyn Write + Send>>,
}

impl DryRunNotifier {
    /// Print to stdout.
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Print to an arbitrary writer.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    fn emit(&self, header: &str, lines: &[&str]) -> Result<(), NotifyError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{header}")?;
        for line in lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl Default for DryRunNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn post(&self, text: &str) -> Result<(), NotifyError> {
        self.emit("TWEET:", &[text])
    }

    async fn post_with_image(&self, text: &str, image_url: &str) -> Result<(), NotifyError> {
        self.emit("TWEET WITH IMAGE:", &[text, image_url])
    }
}
