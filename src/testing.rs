//! In-memory content client for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::content::document::{timestamp, RawContentSection, RawImage, RawPostData};
use crate::content::richtext::RichTextBlock;
use crate::content::{ContentClient, ContentError, RawDocument, Result, SearchResponse};

/// Cursor URLs handed out by [`FakeClient`]; the page number follows
pub const PAGE_URL_PREFIX: &str = "https://fake.cdn.prismic.io/api/v2/documents/search?page=";

/// Serves a fixed set of posts in pages of `page_size`
pub struct FakeClient {
    listed: Vec<RawDocument>,
    unlisted: Vec<RawDocument>,
    page_size: usize,
    fail_pages: AtomicBool,
    fail_uids: AtomicBool,
    page_fetches: AtomicUsize,
    uid_queries: AtomicUsize,
}

impl FakeClient {
    pub fn with_posts(uids: &[&str], page_size: usize) -> Self {
        Self {
            listed: uids.iter().map(|uid| post_document(uid)).collect(),
            unlisted: Vec::new(),
            page_size,
            fail_pages: AtomicBool::new(false),
            fail_uids: AtomicBool::new(false),
            page_fetches: AtomicUsize::new(0),
            uid_queries: AtomicUsize::new(0),
        }
    }

    /// A post reachable by uid but absent from every listing
    pub fn with_unlisted(mut self, uid: &str) -> Self {
        self.unlisted.push(post_document(uid));
        self
    }

    /// Make every cursor fetch fail with a 500
    pub fn fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    /// Make every uid lookup fail with a 503
    pub fn fail_uids(&self, fail: bool) {
        self.fail_uids.store(fail, Ordering::SeqCst);
    }

    pub fn page_fetches(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }

    pub fn uid_queries(&self) -> usize {
        self.uid_queries.load(Ordering::SeqCst)
    }

    fn page(&self, number: usize) -> SearchResponse {
        let size = self.page_size.max(1);
        let total_pages = self.listed.len().div_ceil(size) as u32;
        let start = ((number - 1) * size).min(self.listed.len());
        let end = (start + size).min(self.listed.len());
        let next_page = if end < self.listed.len() {
            Some(format!("{}{}", PAGE_URL_PREFIX, number + 1))
        } else {
            None
        };
        SearchResponse {
            page: number as u32,
            results_per_page: size as u32,
            total_results_size: self.listed.len() as u32,
            total_pages,
            next_page,
            prev_page: None,
            results: self.listed[start..end].to_vec(),
        }
    }
}

#[async_trait]
impl ContentClient for FakeClient {
    async fn query_by_type(&self, _doc_type: &str, _page_size: usize) -> Result<SearchResponse> {
        Ok(self.page(1))
    }

    async fn query_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument> {
        self.uid_queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_uids.load(Ordering::SeqCst) {
            return Err(ContentError::Status {
                status: 503,
                url: format!("uid:{}", uid),
            });
        }
        self.listed
            .iter()
            .chain(self.unlisted.iter())
            .find(|doc| doc.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_pages.load(Ordering::SeqCst) {
            return Err(ContentError::Status {
                status: 500,
                url: url.to_string(),
            });
        }
        let number = url
            .strip_prefix(PAGE_URL_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| ContentError::Status {
                status: 404,
                url: url.to_string(),
            })?;
        Ok(self.page(number))
    }
}

/// A complete post document
pub fn post_document(uid: &str) -> RawDocument {
    RawDocument {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        doc_type: "post".to_string(),
        first_publication_date: timestamp::parse("2021-03-25T12:00:00+0000"),
        last_publication_date: None,
        data: RawPostData {
            title: Some(format!("Post {}", uid)),
            subtitle: Some(format!("Subtitle {}", uid)),
            author: Some("Joseph Oliveira".to_string()),
            banner: Some(RawImage {
                url: Some(format!("https://images.prismic.io/{}.png", uid)),
                alt: None,
            }),
            content: vec![RawContentSection {
                heading: Some("Proin et varius".to_string()),
                body: vec![RichTextBlock::paragraph(
                    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
                )],
            }],
        },
    }
}
