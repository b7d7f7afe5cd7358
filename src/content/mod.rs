//! Content module - talks to the content API and shapes its documents

pub mod client;
pub mod document;
mod error;
mod post;
pub mod richtext;

pub use client::{ContentClient, PrismicClient};
pub use document::{RawDocument, SearchResponse};
pub use error::{ContentError, Result};
pub use post::{Banner, ContentSection, Post, PostData, PostDetail, PostDetailData, PostsPagination};
