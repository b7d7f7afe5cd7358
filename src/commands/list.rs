//! List every post the way the home page pages through them

use anyhow::Result;

use crate::content::{ContentClient, PostsPagination};
use crate::helpers::publication_date;
use crate::listing::ListingState;
use crate::Blog;

/// Walk the listing page by page and return the final state
pub async fn collect(blog: &Blog, client: &dyn ContentClient) -> Result<ListingState> {
    let first_page = client
        .query_by_type(&blog.config.document_type, blog.config.page_size)
        .await?;
    let mut listing = ListingState::new(PostsPagination::from_response(&first_page));
    listing.mount();

    while listing.show_load_more() {
        listing.load_more(client).await?;
    }

    Ok(listing)
}

/// Print every post
pub async fn run(blog: &Blog, client: &dyn ContentClient) -> Result<()> {
    let listing = collect(blog, client).await?;
    let tz = blog.config.tz();

    println!("Posts ({}):", listing.posts().len());
    for post in listing.posts() {
        let date = post
            .first_publication_date
            .map(|d| publication_date(&d, &tz))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} - {} [{}]",
            date,
            post.data.title.as_deref().unwrap_or_default(),
            post.uid.as_deref().unwrap_or_default()
        );
    }

    Ok(())
}
