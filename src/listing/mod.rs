//! Listing state - the posts shown on the home page and the cursor to more

use crate::content::{ContentClient, Post, PostsPagination, Result};

/// Posts on the home page and the cursor for the next batch.
///
/// Starts empty and is seeded once from the build-time first page by
/// [`ListingState::mount`]. Each [`ListingState::load_more`] appends the next
/// page in arrival order; nothing is reordered or deduplicated.
#[derive(Debug, Clone)]
pub struct ListingState {
    initial: PostsPagination,
    mounted: bool,
    posts: Vec<Post>,
    next_page: Option<String>,
}

impl ListingState {
    /// State before mount: no posts yet, cursor taken from the first page
    pub fn new(initial: PostsPagination) -> Self {
        let next_page = initial.next_page.clone();
        Self {
            initial,
            mounted: false,
            posts: Vec::new(),
            next_page,
        }
    }

    /// Seed the posts from the first page. Only the first call has effect.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.posts = self.initial.results.clone();
    }

    /// Fetch the page behind the current cursor and append its posts.
    ///
    /// Returns the number of posts appended; zero when there is no cursor.
    /// On failure the state is left untouched.
    pub async fn load_more(&mut self, client: &dyn ContentClient) -> Result<usize> {
        let Some(url) = self.next_page.clone() else {
            return Ok(0);
        };

        let response = client.fetch_page(&url).await?;
        let page = PostsPagination::from_response(&response);
        let count = page.results.len();

        self.posts.extend(page.results);
        self.next_page = page.next_page;
        tracing::debug!("Loaded {} more posts from {}", count, url);

        Ok(count)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// The "load more" control is offered only while a cursor remains
    pub fn show_load_more(&self) -> bool {
        self.next_page.is_some()
    }
}
