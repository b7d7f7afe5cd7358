//! spacetraveling: a small blog rendered from a headless content API
//!
//! Posts are fetched from a Prismic-style document API, rendered with
//! embedded Tera templates into static HTML, and served by a small axum
//! server that renders unknown posts on demand.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod listing;
pub mod server;
pub mod templates;

#[cfg(test)]
mod testing;

use anyhow::Result;
use std::path::Path;

use content::{ContentClient, PrismicClient};

/// The blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Content client for the configured API
    pub fn client(&self) -> Result<PrismicClient> {
        Ok(PrismicClient::from_config(&self.config)?)
    }

    /// Generate the static site
    pub async fn generate(&self, client: &dyn ContentClient) -> Result<()> {
        commands::generate::run(self, client).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
