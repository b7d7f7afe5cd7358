//! Post view models and the projection from raw documents

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::document::{RawDocument, SearchResponse};
use super::richtext::RichText;

/// A post as shown in the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub uid: Option<String>,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub data: PostData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
}

/// A post as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: Option<String>,
    pub first_publication_date: Option<DateTime<FixedOffset>>,
    pub data: PostDetailData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetailData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub banner: Banner,
    pub author: Option<String>,
    pub content: Vec<ContentSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub url: Option<String>,
}

/// A heading followed by its rich-text body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub heading: Option<String>,
    pub body: RichText,
}

/// First page of the listing plus the cursor to the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsPagination {
    pub next_page: Option<String>,
    pub results: Vec<Post>,
}

impl Post {
    /// Project a raw document into the listing shape
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date,
            data: PostData {
                title: doc.data.title.clone(),
                subtitle: doc.data.subtitle.clone(),
                author: doc.data.author.clone(),
            },
        }
    }
}

impl PostDetail {
    /// Project a raw document into the detail shape
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date,
            data: PostDetailData {
                title: doc.data.title.clone(),
                subtitle: doc.data.subtitle.clone(),
                banner: Banner {
                    url: doc.data.banner.as_ref().and_then(|b| b.url.clone()),
                },
                author: doc.data.author.clone(),
                content: doc
                    .data
                    .content
                    .iter()
                    .map(|section| ContentSection {
                        heading: section.heading.clone(),
                        body: section.body.clone(),
                    })
                    .collect(),
            },
        }
    }
}

impl PostsPagination {
    /// Project a search page into the listing shape, keeping API order
    pub fn from_response(response: &SearchResponse) -> Self {
        Self {
            next_page: response.next_page.clone(),
            results: response.results.iter().map(Post::from_document).collect(),
        }
    }
}
