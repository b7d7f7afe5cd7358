//! Generate static files

use anyhow::Result;

use crate::content::ContentClient;
use crate::generator::Generator;
use crate::Blog;

/// Generate the home page and every post page
pub async fn run(blog: &Blog, client: &dyn ContentClient) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let posts = generator.generate(client).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated index and {} posts in {:.2}s",
        posts,
        duration.as_secs_f64()
    );

    Ok(())
}
