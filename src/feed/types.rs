//! Wire types returned by the news API and the normalized [`Article`] the
//! view works with.

use chrono::{DateTime, Local};
use serde::Deserialize;

// ============================================================================
// Wire types
// ============================================================================

/// Top-level response body: `{"articles": [...]}`.
///
/// `articles` is required and must be an array of objects; anything else is
/// rejected as a parse failure. Fields inside an element are all optional.
#[derive(Debug, Deserialize)]
pub struct RawFeed {
    pub articles: Vec<RawArticle>,
}

/// One article as sent by the API, before normalization.
///
/// Every field tolerates absence and `null`. The backend endpoints name some
/// fields differently and may send more than one name for the same value, so
/// each name is its own field; [`normalize_article`] picks the first
/// non-blank one in declaration order.
///
/// [`normalize_article`]: crate::feed::normalize_article
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    /// String or number depending on the endpoint.
    pub id: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub published_at: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub published_date: Option<String>,
    #[serde(rename = "publishedDate", deserialize_with = "lenient_string")]
    pub published_date_camel: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub source: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub author: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub read_time: Option<String>,
    #[serde(rename = "readTime", deserialize_with = "lenient_string")]
    pub read_time_camel: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub link: Option<String>,

    #[serde(deserialize_with = "lenient_string")]
    pub urgency: Option<String>,

    #[serde(deserialize_with = "lenient_score")]
    pub relevance_score: Option<f64>,
    #[serde(rename = "relevanceScore", deserialize_with = "lenient_score")]
    pub relevance_score_camel: Option<f64>,

    #[serde(deserialize_with = "lenient_string")]
    pub position: Option<String>,
}

/// Strings pass through, numbers and booleans are rendered, anything else
/// (objects, arrays, `null`) becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts a number or a numeric string. Anything else, and non-finite
/// values such as `"NaN"` or `"inf"`, becomes `None`.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let score = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score.filter(|v| v.is_finite()))
}

// ============================================================================
// Normalized types
// ============================================================================

/// Urgency level attached by the aggregated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Parse a wire value (case-insensitive). Unknown values yield `None`.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Placement hint from the aggregated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Hero,
    #[default]
    Latest,
}

impl Position {
    /// `"hero"` (case-insensitive) is the hero; everything else, including a
    /// missing value, is a latest item.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some(p) if p.trim().eq_ignore_ascii_case("hero") => Self::Hero,
            _ => Self::Latest,
        }
    }
}

/// An article ready for display. Every display field is populated; missing
/// wire values have already been replaced by fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub image: String,
    pub published: Option<DateTime<Local>>,
    /// `dd/mm/yy`, empty when the timestamp is missing or unparseable.
    pub date_label: String,
    pub source: String,
    pub read_time: String,
    pub url: Option<String>,
    pub urgency: Option<Urgency>,
    pub relevance_score: f64,
    pub position: Position,
}

impl Article {
    /// Whether the urgency badge applies.
    pub fn is_urgent(&self) -> bool {
        self.urgency == Some(Urgency::High)
    }
}

/// A fully normalized response: the optional hero and the grid articles.
///
/// The listing endpoint never yields a hero. The aggregated endpoint yields
/// the first hero-tagged element as `hero` and the rest, sorted by relevance,
/// as `latest`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPayload {
    pub hero: Option<Article>,
    pub latest: Vec<Article>,
}

impl FeedPayload {
    pub fn is_empty(&self) -> bool {
        self.hero.is_none() && self.latest.is_empty()
    }

    /// Total number of articles, hero included.
    pub fn len(&self) -> usize {
        self.latest.len() + usize::from(self.hero.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_typed_fields_do_not_fail_the_element() {
        let raw: RawArticle = serde_json::from_str(
            r#"{"id": 7, "title": 2025, "readTime": 4, "category": {"x": 1}, "image": null, "relevance_score": "2.5"}"#,
        )
        .unwrap();
        assert_eq!(raw.title.as_deref(), Some("2025"));
        assert_eq!(raw.read_time_camel.as_deref(), Some("4"));
        assert_eq!(raw.category, None);
        assert_eq!(raw.image, None);
        assert_eq!(raw.relevance_score, Some(2.5));
    }

    #[test]
    fn test_urgency_from_wire() {
        assert_eq!(Urgency::from_wire("high"), Some(Urgency::High));
        assert_eq!(Urgency::from_wire("HIGH"), Some(Urgency::High));
        assert_eq!(Urgency::from_wire(" medium "), Some(Urgency::Medium));
        assert_eq!(Urgency::from_wire("low"), Some(Urgency::Low));
        assert_eq!(Urgency::from_wire("critical"), None);
        assert_eq!(Urgency::from_wire(""), None);
    }

    #[test]
    fn test_position_from_wire() {
        assert_eq!(Position::from_wire(Some("hero")), Position::Hero);
        assert_eq!(Position::from_wire(Some("Hero")), Position::Hero);
        assert_eq!(Position::from_wire(Some("latest")), Position::Latest);
        assert_eq!(Position::from_wire(Some("sidebar")), Position::Latest);
        assert_eq!(Position::from_wire(None), Position::Latest);
    }

    #[test]
    fn test_raw_feed_accepts_nulls_and_alternate_names() {
        let json = r#"{"articles": [
            {"id": 7, "title": null, "summary": "texto", "publishedDate": "2024-03-15",
             "author": "Canal Rural", "readTime": "5 min", "relevanceScore": 4.5}
        ]}"#;
        let feed: RawFeed = serde_json::from_str(json).unwrap();
        let a = &feed.articles[0];
        assert_eq!(a.id, Some(serde_json::json!(7)));
        assert_eq!(a.title, None);
        assert_eq!(a.summary.as_deref(), Some("texto"));
        assert_eq!(a.published_date_camel.as_deref(), Some("2024-03-15"));
        assert_eq!(a.author.as_deref(), Some("Canal Rural"));
        assert_eq!(a.read_time_camel.as_deref(), Some("5 min"));
        assert_eq!(a.relevance_score_camel, Some(4.5));
    }

    #[test]
    fn test_element_with_several_names_for_one_field() {
        let json = r#"{"articles": [
            {"id": 1, "content": "corpo", "summary": "resumo",
             "published_at": "2024-03-15", "date": "2024-01-01",
             "source": "Globo Rural", "author": "Redação",
             "read_time": "4 min", "readTime": "9 min",
             "url": "https://a.example/1", "link": "https://b.example/1",
             "relevance_score": 2, "relevanceScore": 5}
        ]}"#;
        let feed: RawFeed = serde_json::from_str(json).unwrap();
        let a = &feed.articles[0];
        assert_eq!(a.content.as_deref(), Some("corpo"));
        assert_eq!(a.summary.as_deref(), Some("resumo"));
        assert_eq!(a.published_at.as_deref(), Some("2024-03-15"));
        assert_eq!(a.date.as_deref(), Some("2024-01-01"));
        assert_eq!(a.relevance_score, Some(2.0));
        assert_eq!(a.relevance_score_camel, Some(5.0));
    }

    #[test]
    fn test_relevance_score_is_lenient() {
        let json = r#"{"articles": [
            {"relevance_score": "8.5"},
            {"relevance_score": "alta"},
            {"relevance_score": null},
            {"relevance_score": "NaN"},
            {"relevance_score": "inf"},
            {"relevance_score": "-infinity"},
            {}
        ]}"#;
        let feed: RawFeed = serde_json::from_str(json).unwrap();
        let scores: Vec<_> = feed.articles.iter().map(|a| a.relevance_score).collect();
        assert_eq!(scores, vec![Some(8.5), None, None, None, None, None, None]);
    }

    #[test]
    fn test_raw_feed_requires_articles_array() {
        assert!(serde_json::from_str::<RawFeed>("{}").is_err());
        assert!(serde_json::from_str::<RawFeed>(r#"{"articles": {}}"#).is_err());
        assert!(serde_json::from_str::<RawFeed>(r#"{"articles": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<RawFeed>(r#"{"items": []}"#).is_err());
        assert!(serde_json::from_str::<RawFeed>(r#"{"articles": []}"#).is_ok());
    }

    #[test]
    fn test_payload_len_counts_hero() {
        let payload = FeedPayload::default();
        assert!(payload.is_empty());
        assert_eq!(payload.len(), 0);
    }
}
