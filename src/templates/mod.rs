//! Built-in blog templates using Tera template engine
//!
//! Templates are embedded in the binary. Autoescaping stays on; the only
//! value rendered unescaped is rich-text markup produced by
//! [`crate::content::richtext::as_html`], which escapes its own text.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::richtext::{as_html, is_safe_url};
use crate::content::{Post, PostDetail};
use crate::helpers::{date_xml, post_path, publication_date, reading_time, PT_BR_MONTHS};
use crate::listing::ListingState;

/// Seconds between reloads of the loading placeholder
pub const LOADING_REFRESH_SECONDS: u32 = 1;

/// Template renderer with the embedded blog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("index.html", include_str!("blog/index.html")),
            ("post.html", include_str!("blog/post.html")),
            ("loading.html", include_str!("blog/loading.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            ("error.html", include_str!("blog/error.html")),
            (
                "partials/post_item.html",
                include_str!("blog/partials/post_item.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Home page for the current listing state
    pub fn render_index(&self, config: &SiteConfig, listing: &ListingState) -> Result<String> {
        let mut context = base_context(config);
        context.insert("listing", &ListingData::from_state(listing, &config.tz()));
        context.insert("months", &PT_BR_MONTHS);
        self.render("index.html", &context)
    }

    /// Detail page of one post
    pub fn render_post(&self, config: &SiteConfig, post: &PostDetail) -> Result<String> {
        let mut context = base_context(config);
        context.insert(
            "post",
            &PostPageData::from_detail(post, &config.tz(), config.words_per_minute),
        );
        self.render("post.html", &context)
    }

    /// Placeholder shown while a post is resolved on demand
    pub fn render_loading(&self, config: &SiteConfig) -> Result<String> {
        let mut context = base_context(config);
        context.insert("refresh_seconds", &LOADING_REFRESH_SECONDS);
        self.render("loading.html", &context)
    }

    pub fn render_not_found(&self, config: &SiteConfig) -> Result<String> {
        self.render("not_found.html", &base_context(config))
    }

    pub fn render_error(&self, config: &SiteConfig) -> Result<String> {
        self.render("error.html", &base_context(config))
    }
}

fn base_context(config: &SiteConfig) -> Context {
    let mut context = Context::new();
    context.insert(
        "site",
        &SiteData {
            title: config.title.clone(),
            timezone: config.tz().name().to_string(),
        },
    );
    context
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingData {
    pub posts: Vec<PostItemData>,
    pub next_page: Option<String>,
    pub show_load_more: bool,
}

impl ListingData {
    pub fn from_state(state: &ListingState, tz: &Tz) -> Self {
        Self {
            posts: state
                .posts()
                .iter()
                .map(|p| PostItemData::from_post(p, tz))
                .collect(),
            next_page: state.next_page().map(str::to_string),
            show_load_more: state.show_load_more(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostItemData {
    pub path: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
}

impl PostItemData {
    pub fn from_post(post: &Post, tz: &Tz) -> Self {
        Self {
            path: post_path(post.uid.as_deref().unwrap_or_default()),
            title: post.data.title.clone().unwrap_or_default(),
            subtitle: post.data.subtitle.clone().unwrap_or_default(),
            author: post.data.author.clone().unwrap_or_default(),
            date: post.first_publication_date.map(|d| publication_date(&d, tz)),
            datetime: post.first_publication_date.map(|d| date_xml(&d)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPageData {
    pub title: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub date: Option<String>,
    pub datetime: Option<String>,
    pub reading_time: usize,
    pub sections: Vec<SectionData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionData {
    pub heading: String,
    pub html: String,
}

impl PostPageData {
    /// Reading time is computed here, on every render
    pub fn from_detail(post: &PostDetail, tz: &Tz, words_per_minute: usize) -> Self {
        Self {
            title: post.data.title.clone().unwrap_or_default(),
            banner_url: post.data.banner.url.clone().filter(|u| is_safe_url(u)),
            author: post.data.author.clone().unwrap_or_default(),
            date: post.first_publication_date.map(|d| publication_date(&d, tz)),
            datetime: post.first_publication_date.map(|d| date_xml(&d)),
            reading_time: reading_time(&post.data.content, words_per_minute),
            sections: post
                .data
                .content
                .iter()
                .map(|section| SectionData {
                    heading: section.heading.clone().unwrap_or_default(),
                    html: as_html(&section.body),
                })
                .collect(),
        }
    }
}
