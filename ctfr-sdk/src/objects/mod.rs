pub mod ctftime;
pub mod twitter;

pub use ctftime::{CtftimeEvent, CtftimeOrganizer, EventListQuery};
pub use twitter::{CreateTweetRequest, CreatedTweet, MediaUploadResponse, TweetMedia};
