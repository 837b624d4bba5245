//! Request and response bodies of the Twitter endpoints used for posting.

use serde::{Deserialize, Serialize};

/// Body of `POST /2/tweets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTweetRequest {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<TweetMedia>,
}

/// Media attached to a tweet, referenced by previously uploaded ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetMedia {
    pub media_ids: Vec<String>,
}

/// Response of `POST /2/tweets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTweet {
    pub data: CreatedTweetData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedTweetData {
    pub id: String,
    pub text: String,
}

/// Response of `POST /1.1/media/upload.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUploadResponse {
    pub media_id_string: String,
}
