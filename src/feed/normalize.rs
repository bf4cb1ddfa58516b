//! Conversion of raw API articles into display-ready [`Article`]s.
//!
//! Normalization never fails: any field that is missing, `null`, or blank is
//! replaced by a fallback so the view never has to deal with holes.

use super::types::{Article, FeedPayload, Position, RawArticle, RawFeed, Urgency};
use crate::util::{strip_control_chars, truncate_chars};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// 1×1 transparent GIF used when an article has no image.
pub const PLACEHOLDER_IMAGE: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAQAIBRAAA";

pub const FALLBACK_CATEGORY: &str = "Agronegócio";
pub const FALLBACK_TITLE: &str = "Sem título";
pub const FALLBACK_SUMMARY: &str = "Sem resumo";
pub const FALLBACK_SOURCE: &str = "AGRO-RADAR";
pub const FALLBACK_READ_TIME: &str = "3 min";

/// Character budget for grid card summaries.
pub const SUMMARY_BUDGET: usize = 150;
/// Character budget for the hero article body.
pub const HERO_BUDGET: usize = 350;

/// Date format shown on cards (`15/03/24`).
const DATE_LABEL_FORMAT: &str = "%d/%m/%y";

/// Sanitize and trim an optional wire string; blank becomes `None`.
fn clean(value: Option<String>) -> Option<String> {
    let value = value?;
    let stripped = strip_control_chars(&value);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First value that is still present after [`clean`], in the given order.
fn first_clean<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().find_map(clean)
}

fn id_string(id: Option<serde_json::Value>, index: usize) -> String {
    match id {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => format!("#{}", index),
    }
}

/// Parse the timestamp formats seen from the API.
///
/// - RFC 3339 (`2024-03-15T12:00:00Z`, `2024-03-15T09:00:00-03:00`)
/// - naive date-time (`2024-03-15T08:30:00`, `2024-03-15 08:30:00`), read as local time
/// - bare date (`2024-03-15`), read as local midnight
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()
}

/// Display label for a publish timestamp, e.g. `15/03/24`.
pub fn format_date_label(dt: &DateTime<Local>) -> String {
    dt.format(DATE_LABEL_FORMAT).to_string()
}

/// Normalize one raw article.
///
/// `index` is the element's position in the response and stands in for a
/// missing id. `budget` is the summary character budget.
///
/// Where the wire carries several names for one value, the canonical name
/// wins: `content` over `summary`, `published_at` over `published_date`,
/// `publishedDate` and `date`, `source` over `author`, `read_time` over
/// `readTime`, `url` over `link`, `relevance_score` over `relevanceScore`.
pub fn normalize_article(raw: RawArticle, index: usize, budget: usize) -> Article {
    let timestamp = first_clean([
        raw.published_at,
        raw.published_date,
        raw.published_date_camel,
        raw.date,
    ]);
    let published = timestamp.as_deref().and_then(parse_timestamp);
    if published.is_none() {
        if let Some(ts) = timestamp.as_deref() {
            tracing::debug!(index, timestamp = %ts, "Unparseable publish timestamp");
        }
    }

    let summary = first_clean([raw.content, raw.summary])
        .map(|body| truncate_chars(&body, budget).into_owned())
        .unwrap_or_else(|| FALLBACK_SUMMARY.to_string());

    Article {
        id: id_string(raw.id, index),
        title: clean(raw.title).unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        summary,
        category: clean(raw.category).unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
        image: clean(raw.image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        date_label: published.as_ref().map(format_date_label).unwrap_or_default(),
        published,
        source: first_clean([raw.source, raw.author])
            .unwrap_or_else(|| FALLBACK_SOURCE.to_string()),
        read_time: first_clean([raw.read_time, raw.read_time_camel])
            .unwrap_or_else(|| FALLBACK_READ_TIME.to_string()),
        url: first_clean([raw.url, raw.link]),
        urgency: raw.urgency.as_deref().and_then(Urgency::from_wire),
        relevance_score: raw
            .relevance_score
            .or(raw.relevance_score_camel)
            .unwrap_or(0.0),
        position: Position::from_wire(raw.position.as_deref()),
    }
}

/// Order articles by relevance, highest first.
///
/// The sort is stable: articles with equal scores keep their source order.
pub fn sort_by_relevance(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

/// Normalize a response from the listing endpoint.
///
/// No hero; every article gets the summary budget and source order is kept.
pub fn normalize_listing(raw: RawFeed) -> FeedPayload {
    let latest = raw
        .articles
        .into_iter()
        .enumerate()
        .map(|(i, a)| normalize_article(a, i, SUMMARY_BUDGET))
        .collect();

    FeedPayload { hero: None, latest }
}

/// Normalize a response from the aggregated endpoint.
///
/// The first hero-tagged element becomes the hero (with the longer hero
/// budget). Everything else, including any further hero-tagged elements, is
/// a latest item, sorted by relevance.
pub fn normalize_aggregated(raw: RawFeed) -> FeedPayload {
    let mut hero = None;
    let mut latest = Vec::with_capacity(raw.articles.len());

    for (i, a) in raw.articles.into_iter().enumerate() {
        let is_hero = Position::from_wire(a.position.as_deref()) == Position::Hero;
        if is_hero && hero.is_none() {
            hero = Some(normalize_article(a, i, HERO_BUDGET));
        } else {
            latest.push(normalize_article(a, i, SUMMARY_BUDGET));
        }
    }

    sort_by_relevance(&mut latest);
    FeedPayload { hero, latest }
}
