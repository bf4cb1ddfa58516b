//! Article feed: fetching, decoding and normalization.
//!
//! - [`loader`] - `FeedClient`: URL building, the GET request, timeout, status
//!   and size checks, JSON decoding
//! - [`normalize`] - raw → display-ready articles, fallbacks, truncation,
//!   hero/latest partition and relevance ordering
//! - [`types`] - wire types and the normalized `Article`
//!
//! # Example
//!
//! ```ignore
//! use agro_radar::feed::{build_http_client, Endpoint, FeedClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
//!
//! let client = FeedClient::new(build_http_client()?, DEFAULT_API_URL, Endpoint::Output, DEFAULT_TIMEOUT)?;
//! let payload = client.fetch().await?;
//! println!("{} articles", payload.len());
//! ```

mod loader;
mod normalize;
mod types;

pub use loader::{
    build_http_client, request_url, Endpoint, FeedClient, FeedError, API_URL_ENV,
    DEFAULT_API_URL, DEFAULT_LIMIT, DEFAULT_TIMEOUT,
};
pub use normalize::{
    format_date_label, normalize_aggregated, normalize_article, normalize_listing,
    parse_timestamp, sort_by_relevance, FALLBACK_CATEGORY, FALLBACK_READ_TIME, FALLBACK_SOURCE,
    FALLBACK_SUMMARY, FALLBACK_TITLE, HERO_BUDGET, PLACEHOLDER_IMAGE, SUMMARY_BUDGET,
};
pub use types::{Article, FeedPayload, Position, RawArticle, RawFeed, Urgency};
