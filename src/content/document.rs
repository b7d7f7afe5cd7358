//! Raw documents as returned by the content API

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::richtext::RichText;

/// Repository description returned by the API root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub refs: Vec<ApiRef>,
}

impl ApiInfo {
    /// The ref pointing at the published content
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

/// A content release the API can be queried against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// One page of a document search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    pub results: Vec<RawDocument>,
}

/// A content document of any type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: String,
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default, with = "timestamp")]
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    #[serde(default, with = "timestamp")]
    pub last_publication_date: Option<DateTime<FixedOffset>>,
    pub data: RawPostData,
}

/// Custom fields of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPostData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub banner: Option<RawImage>,
    #[serde(default)]
    pub content: Vec<RawContentSection>,
}

/// Image field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One entry of the `content` group field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContentSection {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: RichText,
}

/// Publication timestamps come as `2021-03-25T19:25:28+0000`; RFC 3339 is
/// accepted as well.
pub(crate) mod timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn parse(s: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(s, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .ok()
    }

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {:?}", s))),
        }
    }
}
