//! Content API client

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::document::{ApiInfo, RawDocument, SearchResponse};
use super::error::{ContentError, Result};
use crate::config::SiteConfig;

/// Page size used when enumerating every document of a type
const LIST_ALL_PAGE_SIZE: usize = 100;

/// Read-only access to the content repository
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// First page of documents of `doc_type`
    async fn query_by_type(&self, doc_type: &str, page_size: usize) -> Result<SearchResponse>;

    /// The document of `doc_type` whose uid is `uid`
    async fn query_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument>;

    /// Follow a `next_page` cursor exactly as the API returned it
    async fn fetch_page(&self, url: &str) -> Result<SearchResponse>;

    /// Every uid of `doc_type`, in API order
    async fn list_all_uids(&self, doc_type: &str) -> Result<Vec<String>> {
        let mut response = self.query_by_type(doc_type, LIST_ALL_PAGE_SIZE).await?;
        let mut uids = Vec::new();
        loop {
            uids.extend(response.results.iter().filter_map(|doc| doc.uid.clone()));
            match response.next_page.take() {
                Some(next) => response = self.fetch_page(&next).await?,
                None => break,
            }
        }
        Ok(uids)
    }
}

/// Client for a Prismic-style REST API
#[derive(Debug, Clone)]
pub struct PrismicClient {
    http_client: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl PrismicClient {
    pub fn new(endpoint: &str, access_token: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Build a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.api_endpoint, config.access_token.clone())
    }

    fn with_token(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.query(&[("access_token", token)]),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Ref of the currently published release
    async fn master_ref(&self) -> Result<String> {
        let request = self.with_token(self.http_client.get(&self.endpoint));
        let info: ApiInfo = self.get_json(request).await?;
        info.master_ref()
            .map(str::to_string)
            .ok_or(ContentError::NoMasterRef)
    }

    async fn search(&self, query: &str, page_size: usize) -> Result<SearchResponse> {
        let master_ref = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);
        let page_size = page_size.to_string();
        tracing::debug!("Searching {} with {}", url, query);
        let request = self.http_client.get(&url).query(&[
            ("ref", master_ref.as_str()),
            ("q", query),
            ("pageSize", page_size.as_str()),
        ]);
        self.get_json(self.with_token(request)).await
    }
}

#[async_trait]
impl ContentClient for PrismicClient {
    async fn query_by_type(&self, doc_type: &str, page_size: usize) -> Result<SearchResponse> {
        let query = format!(r#"[[at(document.type,"{}")]]"#, quote(doc_type));
        self.search(&query, page_size).await
    }

    async fn query_by_uid(&self, doc_type: &str, uid: &str) -> Result<RawDocument> {
        let query = format!(r#"[[at(my.{}.uid,"{}")]]"#, doc_type, quote(uid));
        let response = self.search(&query, 1).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ContentError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse> {
        tracing::debug!("Fetching page {}", url);
        self.get_json(self.http_client.get(url)).await
    }
}

/// Escape a value for use inside a double-quoted predicate argument
fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
