//! Blog server with on-demand rendering of unknown posts

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{ContentClient, ContentError};
use crate::generator::Generator;
use crate::helpers::is_valid_slug;
use crate::Blog;

/// Finished failures kept around until their next request
const MAX_REPORTED_OUTCOMES: usize = 64;

/// A failure older than this is forgotten and the post is fetched again
const OUTCOME_TTL: Duration = Duration::from_secs(60);

/// Progress of a post being rendered on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    Pending,
    Done { outcome: Outcome, at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Missing,
    Failed,
}

/// What a post request gets answered with
enum PostReply {
    Page(PathBuf),
    Loading,
    NotFound,
    Failed,
}

/// Server state
pub struct ServerState {
    public_dir: PathBuf,
    generator: Generator,
    client: Arc<dyn ContentClient>,
    resolutions: Mutex<HashMap<String, Resolution>>,
}

impl ServerState {
    pub fn new(blog: &Blog, client: Arc<dyn ContentClient>) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            generator: Generator::new(blog)?,
            client,
            resolutions: Mutex::new(HashMap::new()),
        })
    }
}

/// Routes of the blog
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server, generating the site first when nothing was generated yet
pub async fn start(
    blog: &Blog,
    client: Arc<dyn ContentClient>,
    ip: &str,
    port: u16,
    open: bool,
) -> Result<()> {
    if !blog.public_dir.join("index.html").exists() {
        tracing::info!("No generated site found, generating...");
        blog.generate(client.as_ref()).await?;
    }

    let state = Arc::new(ServerState::new(blog, client)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve a generated post, or render it in the background and show the
/// loading placeholder meanwhile
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return not_found(&state);
    }

    let output_path = state.generator.post_output_path(&slug);

    let reply = {
        let mut resolutions = state.resolutions.lock().await;
        if output_path.exists() {
            PostReply::Page(output_path)
        } else {
            match resolutions.get(&slug).copied() {
                Some(Resolution::Pending) => PostReply::Loading,
                Some(Resolution::Done { outcome, at }) if at.elapsed() < OUTCOME_TTL => {
                    resolutions.remove(&slug);
                    match outcome {
                        Outcome::Missing => PostReply::NotFound,
                        Outcome::Failed => PostReply::Failed,
                    }
                }
                _ => {
                    resolutions.insert(slug.clone(), Resolution::Pending);
                    tracing::info!("Rendering {} on demand", slug);
                    tokio::spawn(resolve(state.clone(), slug));
                    PostReply::Loading
                }
            }
        }
    };

    match reply {
        PostReply::Page(path) => match tokio::fs::read_to_string(&path).await {
            Ok(content) => Html(content).into_response(),
            Err(_) => not_found(&state),
        },
        PostReply::Loading => page(
            StatusCode::OK,
            state.generator.renderer().render_loading(state.generator.config()),
        ),
        PostReply::NotFound => not_found(&state),
        PostReply::Failed => page(
            StatusCode::INTERNAL_SERVER_ERROR,
            state.generator.renderer().render_error(state.generator.config()),
        ),
    }
}

/// Fetch and write one post, then record the outcome
async fn resolve(state: Arc<ServerState>, slug: String) {
    let outcome = state
        .generator
        .generate_post(state.client.as_ref(), &slug)
        .await;

    let mut resolutions = state.resolutions.lock().await;
    match outcome {
        Ok(path) => {
            tracing::debug!("Rendered on demand: {:?}", path);
            resolutions.remove(&slug);
        }
        Err(e) => {
            let missing = e
                .downcast_ref::<ContentError>()
                .is_some_and(ContentError::is_not_found);
            let outcome = if missing {
                tracing::warn!("Post {} not found", slug);
                Outcome::Missing
            } else {
                tracing::error!("Rendering post {} failed: {}", slug, e);
                Outcome::Failed
            };
            resolutions.insert(
                slug,
                Resolution::Done {
                    outcome,
                    at: Instant::now(),
                },
            );
            prune(&mut resolutions);
        }
    }
}

/// Drop expired outcomes, then the oldest ones beyond the cap
fn prune(resolutions: &mut HashMap<String, Resolution>) {
    resolutions.retain(|_, resolution| match resolution {
        Resolution::Pending => true,
        Resolution::Done { at, .. } => at.elapsed() < OUTCOME_TTL,
    });

    let mut finished: Vec<(Instant, String)> = resolutions
        .iter()
        .filter_map(|(slug, resolution)| match resolution {
            Resolution::Done { at, .. } => Some((*at, slug.clone())),
            Resolution::Pending => None,
        })
        .collect();
    if finished.len() <= MAX_REPORTED_OUTCOMES {
        return;
    }

    finished.sort();
    let excess = finished.len() - MAX_REPORTED_OUTCOMES;
    for (_, slug) in finished.into_iter().take(excess) {
        resolutions.remove(&slug);
    }
}

/// Fallback handler that serves generated files
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

fn not_found(state: &ServerState) -> Response {
    page(
        StatusCode::NOT_FOUND,
        state
            .generator
            .renderer()
            .render_not_found(state.generator.config()),
    )
}

fn page(status: StatusCode, html: Result<String>) -> Response {
    match html {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
