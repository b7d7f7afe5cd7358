//! Failure taxonomy of the content layer

use thiserror::Error;

/// Errors raised while talking to the content API
#[derive(Debug, Error)]
pub enum ContentError {
    /// The API could not be reached
    #[error("content API unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("content API returned {status} for {url}")]
    Status { status: u16, url: String },

    /// No document of the given type carries this uid
    #[error("no {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },

    /// The response body does not have the expected document shape
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The API exposes no master ref to query against
    #[error("content API exposes no master ref")]
    NoMasterRef,
}

impl ContentError {
    /// True when the failure means "this document does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
