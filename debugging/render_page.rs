//! Render one Flixx page against the live TMDB API and print the HTML.
//! Usage:
//!   cargo run --bin render_page -- /index.html
//!   cargo run --bin render_page -- "/movie-details.html?id=550"
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use flixx::config::{Config, PageContext};
use flixx::dispatch::{self, Page};
use flixx::tmdb::TmdbClient;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let target = env::args()
        .nth(1)
        .context("usage: render_page <path[?query]>")?;
    let ctx = PageContext::from_target(&target);
    let page = Page::from_path(&ctx.path)
        .with_context(|| format!("no page is served at {}", ctx.path))?;

    let config = Config::from_env()?;
    let tmdb = TmdbClient::from_config(&config)?;

    let mut doc = page.document();
    dispatch::init(&ctx, &tmdb, &mut doc).await?;
    println!("{}", doc.to_html());
    Ok(())
}
