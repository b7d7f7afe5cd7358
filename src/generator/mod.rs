//! Generator module - renders the blog into static HTML files

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::{ContentClient, PostDetail, PostsPagination};
use crate::helpers::is_valid_slug;
use crate::listing::ListingState;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Static site generator using Tera templates
pub struct Generator {
    config: SiteConfig,
    public_dir: PathBuf,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            public_dir: blog.public_dir.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Generate the home page and one page per known post.
    ///
    /// Returns the number of post pages written. Any content failure aborts
    /// the generation.
    pub async fn generate(&self, client: &dyn ContentClient) -> Result<usize> {
        fs::create_dir_all(&self.public_dir)?;

        let first_page = client
            .query_by_type(&self.config.document_type, self.config.page_size)
            .await?;
        let mut listing = ListingState::new(PostsPagination::from_response(&first_page));
        listing.mount();
        self.write_index(&listing)?;

        let uids = client.list_all_uids(&self.config.document_type).await?;
        tracing::info!("Found {} {} documents", uids.len(), self.config.document_type);

        let mut written = 0;
        for uid in &uids {
            if !is_valid_slug(uid) {
                tracing::warn!("Skipping document with unusable uid {:?}", uid);
                continue;
            }
            self.generate_post(client, uid).await?;
            written += 1;
        }

        Ok(written)
    }

    /// Fetch one post and write its page
    pub async fn generate_post(&self, client: &dyn ContentClient, uid: &str) -> Result<PathBuf> {
        let document = client
            .query_by_uid(&self.config.document_type, uid)
            .await?;
        let post = PostDetail::from_document(&document);
        self.write_post(uid, &post)
    }

    /// Write the home page for a listing state
    pub fn write_index(&self, listing: &ListingState) -> Result<PathBuf> {
        let html = self.renderer.render_index(&self.config, listing)?;
        let output_path = self.public_dir.join("index.html");
        write_page(&output_path, &html)?;
        Ok(output_path)
    }

    /// Write the page of one post under its slug
    pub fn write_post(&self, slug: &str, post: &PostDetail) -> Result<PathBuf> {
        if !is_valid_slug(slug) {
            anyhow::bail!("Invalid post slug: {:?}", slug);
        }
        let html = self.renderer.render_post(&self.config, post)?;
        let output_path = self.post_output_path(slug);
        write_page(&output_path, &html)?;
        Ok(output_path)
    }

    /// Where the page of `slug` lives once generated
    pub fn post_output_path(&self, slug: &str) -> PathBuf {
        self.public_dir.join("post").join(slug).join("index.html")
    }
}

/// Write through a sibling temp file so readers never see a partial page
fn write_page(output_path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = output_path.with_extension("html.tmp");
    fs::write(&tmp_path, html)?;
    fs::rename(&tmp_path, output_path)?;
    tracing::debug!("Generated: {:?}", output_path);
    Ok(())
}
