use anyhow::Result;
use std::fmt;
use tracing::{debug, info};

use crate::config::PageContext;
use crate::dom::{ContainerId, Document};
use crate::models::{MovieDetail, MovieSummary, Paged, ShowSummary};
use crate::render::{fetch_and_render, movie_cards, movie_detail_fragments, show_cards};
use crate::tmdb::TmdbApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Shows,
    MovieDetails,
    TvDetails,
    Search,
}

/// Every served page path. `/` and `/index.html` both map to the home page.
pub const ROUTES: [(&str, Page); 6] = [
    ("/", Page::Home),
    ("/index.html", Page::Home),
    ("/shows.html", Page::Shows),
    ("/movie-details.html", Page::MovieDetails),
    ("/tv-details.html", Page::TvDetails),
    ("/search.html", Page::Search),
];

impl Page {
    pub fn from_path(path: &str) -> Option<Self> {
        ROUTES
            .iter()
            .find(|(route, _)| *route == path)
            .map(|(_, page)| *page)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Flixx | Popular Movies",
            Page::Shows => "Flixx | Popular TV Shows",
            Page::MovieDetails => "Flixx | Movie Details",
            Page::TvDetails => "Flixx | TV Show Details",
            Page::Search => "Flixx | Search",
        }
    }

    pub fn containers(&self) -> &'static [ContainerId] {
        match self {
            Page::Home => &[ContainerId::PopularMovies],
            Page::Shows => &[ContainerId::PopularShows],
            Page::MovieDetails => &[ContainerId::MovieDetails],
            Page::TvDetails => &[ContainerId::ShowDetails],
            Page::Search => &[],
        }
    }

    pub fn document(&self) -> Document {
        Document::new(self.title(), self.containers())
    }
}

/// Raised when a detail page is requested without a usable `?id=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingId {
    pub path: String,
}

impl fmt::Display for MissingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} requires a numeric ?id= parameter", self.path)
    }
}

impl std::error::Error for MissingId {}

/// Runs at most one renderer for the current page, then highlights the nav
/// link for it. Highlighting happens even when rendering fails.
pub async fn init(ctx: &PageContext, api: &dyn TmdbApi, doc: &mut Document) -> Result<()> {
    let rendered = dispatch(ctx, api, doc).await;
    highlight_active_link(ctx, doc);
    rendered
}

async fn dispatch(ctx: &PageContext, api: &dyn TmdbApi, doc: &mut Document) -> Result<()> {
    let Some(page) = Page::from_path(&ctx.path) else {
        debug!(path = %ctx.path, "No renderer for path");
        return Ok(());
    };
    debug!(path = %ctx.path, ?page, "Dispatching page");

    match page {
        Page::Home => {
            fetch_and_render::<Paged<MovieSummary>, _>(
                api,
                doc,
                "movie/popular",
                ContainerId::PopularMovies,
                movie_cards,
            )
            .await?;
        }
        Page::Shows => {
            fetch_and_render::<Paged<ShowSummary>, _>(
                api,
                doc,
                "tv/popular",
                ContainerId::PopularShows,
                show_cards,
            )
            .await?;
        }
        Page::MovieDetails => {
            let id = ctx.id().ok_or_else(|| MissingId {
                path: ctx.path.clone(),
            })?;
            fetch_and_render::<MovieDetail, _>(
                api,
                doc,
                &format!("movie/{id}"),
                ContainerId::MovieDetails,
                movie_detail_fragments,
            )
            .await?;
        }
        Page::TvDetails => info!("TV Details"),
        Page::Search => info!("Search"),
    }
    Ok(())
}

pub fn highlight_active_link(ctx: &PageContext, doc: &mut Document) {
    for link in doc.nav_links_mut() {
        if link.href == ctx.path {
            link.active = true;
        }
    }
}
