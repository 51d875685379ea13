//! Record-to-markup mappings and the one fetch-then-append pipeline they share.

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dom::{ContainerId, Document};
use crate::models::{MovieDetail, MovieSummary, Named, Paged, ShowSummary};
use crate::tmdb::{fetch_api_data, TmdbApi};
use crate::utils::{escape_html, format_rating, format_usd};

pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const BACKDROP_BASE: &str = "https://image.tmdb.org/t/p/original";
pub const PLACEHOLDER_IMAGE: &str = "images/no-image.jpg";

/// Fetches `endpoint`, maps the decoded record to fragments and appends them
/// to `container` in order. Returns how many fragments were appended.
pub async fn fetch_and_render<T, F>(
    api: &dyn TmdbApi,
    doc: &mut Document,
    endpoint: &str,
    container: ContainerId,
    to_markup: F,
) -> Result<usize>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Vec<String>,
{
    let record: T = fetch_api_data(api, doc.spinner(), endpoint).await?;
    let fragments = to_markup(&record);
    let count = fragments.len();
    for fragment in fragments {
        doc.append(container, fragment)?;
    }
    debug!(endpoint, container = %container, count, "Rendered fragments");
    Ok(count)
}

pub fn movie_cards(page: &Paged<MovieSummary>) -> Vec<String> {
    page.results.iter().map(movie_card).collect()
}

pub fn show_cards(page: &Paged<ShowSummary>) -> Vec<String> {
    page.results.iter().map(show_card).collect()
}

/// Detail pages get the backdrop overlay first, then the detail fragment.
pub fn movie_detail_fragments(movie: &MovieDetail) -> Vec<String> {
    vec![
        background_overlay(movie.backdrop_path.as_deref()),
        movie_detail(movie),
    ]
}

pub fn poster_src(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{POSTER_BASE}{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

pub fn backdrop_src(path: Option<&str>) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with('/') => format!("{BACKDROP_BASE}{p}"),
        Some(p) => format!("{BACKDROP_BASE}/{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

fn poster_img(path: Option<&str>, alt: &str) -> String {
    format!(
        "<img src=\"{}\" class=\"card-img-top\" alt=\"{}\" />",
        escape_html(&poster_src(path)),
        escape_html(alt)
    )
}

fn card(href: &str, title: &str, poster: Option<&str>, date_line: &str) -> String {
    format!(
        r#"<div class="card">
  <a href="{href}">
    {img}
  </a>
  <div class="card-body">
    <h5 class="card-title">{title}</h5>
    <p class="card-text">
      <small class="text-muted">{date_line}</small>
    </p>
  </div>
</div>"#,
        href = escape_html(href),
        img = poster_img(poster, title),
        title = escape_html(title),
        date_line = escape_html(date_line),
    )
}

pub fn movie_card(movie: &MovieSummary) -> String {
    card(
        &format!("movie-details.html?id={}", movie.id),
        &movie.title,
        movie.poster_path.as_deref(),
        &format!("Release: {}", movie.release_date),
    )
}

pub fn show_card(show: &ShowSummary) -> String {
    card(
        &format!("tv-details.html?id={}", show.id),
        &show.name,
        show.poster_path.as_deref(),
        &format!("Aired: {}", show.first_air_date),
    )
}

/// Full-viewport, faded backdrop placed behind a detail page.
pub fn background_overlay(backdrop_path: Option<&str>) -> String {
    let style = [
        format!("background-image: url({})", backdrop_src(backdrop_path)),
        "background-size: cover".to_string(),
        "background-position: center".to_string(),
        "background-repeat: no-repeat".to_string(),
        "height: 100vh".to_string(),
        "width: 100vw".to_string(),
        "position: absolute".to_string(),
        "top: 0".to_string(),
        "left: 0".to_string(),
        "z-index: -1".to_string(),
        "opacity: 0.2".to_string(),
    ]
    .join("; ");
    format!("<div class=\"backdrop-overlay\" style=\"{}\"></div>", escape_html(&style))
}

fn joined_names(items: &[Named]) -> String {
    items
        .iter()
        .map(|c| format!("<span>{}</span>", escape_html(&c.name)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn movie_detail(movie: &MovieDetail) -> String {
    let genres: String = movie
        .genres
        .iter()
        .map(|g| format!("<li>{}</li>", escape_html(&g.name)))
        .collect();
    let homepage = match movie.homepage.as_deref().filter(|h| !h.is_empty()) {
        Some(url) => format!(
            "<a href=\"{}\" target=\"_blank\" class=\"btn\">Visit Movie Homepage</a>",
            escape_html(url)
        ),
        None => String::new(),
    };
    let runtime = movie
        .runtime
        .map(|r| format!("{r} minutes"))
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        r#"<div>
  <div class="details-top">
    <div>
      {img}
    </div>
    <div>
      <h2>{title}</h2>
      <p>
        <i class="fas fa-star text-primary"></i>
        {rating} / 10
      </p>
      <p class="text-muted">Release Date: {release}</p>
      <p>
        {overview}
      </p>
      <h5>Genres</h5>
      <ul class="list-group">
        {genres}
      </ul>
      {homepage}
    </div>
  </div>
  <div class="details-bottom">
    <h2>Movie Info</h2>
    <ul>
      <li><span class="text-secondary">Budget:</span> {budget}</li>
      <li><span class="text-secondary">Revenue:</span> {revenue}</li>
      <li><span class="text-secondary">Runtime:</span> {runtime}</li>
      <li><span class="text-secondary">Status:</span> {status}</li>
    </ul>
    <h4>Production Companies</h4>
    <div class="list-group">{companies}</div>
  </div>
</div>"#,
        img = poster_img(movie.poster_path.as_deref(), &movie.title),
        title = escape_html(&movie.title),
        rating = format_rating(movie.vote_average),
        release = escape_html(&movie.release_date),
        overview = escape_html(&movie.overview),
        genres = genres,
        homepage = homepage,
        budget = format_usd(movie.budget),
        revenue = format_usd(movie.revenue),
        runtime = runtime,
        status = escape_html(&movie.status),
        companies = joined_names(&movie.production_companies),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Named {
        Named {
            name: name.to_string(),
        }
    }

    fn detail() -> MovieDetail {
        MovieDetail {
            id: 550,
            title: "Fight Club".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            release_date: "1999-10-15".to_string(),
            vote_average: 8.0,
            overview: "An insomniac office worker...".to_string(),
            genres: vec![named("Drama"), named("Thriller")],
            homepage: Some("https://example.com/fightclub".to_string()),
            budget: 63_000_000,
            revenue: 100_853_753,
            runtime: Some(139),
            status: "Released".to_string(),
            production_companies: vec![named("Regency"), named("Fox 2000")],
        }
    }

    #[test]
    fn poster_falls_back_to_placeholder() {
        assert_eq!(poster_src(None), PLACEHOLDER_IMAGE);
        assert_eq!(poster_src(Some("")), PLACEHOLDER_IMAGE);
        assert_eq!(
            poster_src(Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn movie_card_links_to_details() {
        let html = movie_card(&MovieSummary {
            id: 42,
            title: "Dune".to_string(),
            poster_path: None,
            release_date: "2021-09-15".to_string(),
        });
        assert!(html.contains("href=\"movie-details.html?id=42\""));
        assert!(html.contains("src=\"images/no-image.jpg\""));
        assert!(html.contains("alt=\"Dune\""));
        assert!(html.contains("Release: 2021-09-15"));
    }

    #[test]
    fn show_card_uses_air_date() {
        let html = show_card(&ShowSummary {
            id: 7,
            name: "Severance".to_string(),
            poster_path: Some("/s.jpg".to_string()),
            first_air_date: "2022-02-17".to_string(),
        });
        assert!(html.contains("href=\"tv-details.html?id=7\""));
        assert!(html.contains("src=\"https://image.tmdb.org/t/p/w500/s.jpg\""));
        assert!(html.contains("Aired: 2022-02-17"));
    }

    #[test]
    fn detail_fragment_formats_fields() {
        let html = movie_detail(&detail());
        assert!(html.contains("8.0 / 10"));
        assert!(html.contains("$63,000,000"));
        assert!(html.contains("$100,853,753"));
        assert!(html.contains("139 minutes"));
        assert!(html.contains("<li>Drama</li><li>Thriller</li>"));
        assert!(html.contains("<span>Regency</span>, <span>Fox 2000</span>"));
        assert!(html.contains("Visit Movie Homepage"));
    }

    #[test]
    fn detail_without_optional_fields() {
        let movie = MovieDetail {
            poster_path: None,
            homepage: Some(String::new()),
            runtime: None,
            ..detail()
        };
        let html = movie_detail(&movie);
        assert!(html.contains("src=\"images/no-image.jpg\""));
        assert!(!html.contains("Visit Movie Homepage"));
        assert!(html.contains("Runtime:</span> Unknown"));
    }

    #[test]
    fn detail_escapes_text() {
        let movie = MovieDetail {
            title: "<script>".to_string(),
            ..detail()
        };
        let html = movie_detail(&movie);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn overlay_uses_backdrop_or_placeholder() {
        let with = background_overlay(Some("/b.jpg"));
        assert!(with.contains("url(https://image.tmdb.org/t/p/original/b.jpg)"));
        assert!(with.contains("opacity: 0.2"));
        assert!(with.contains("z-index: -1"));
        let without = background_overlay(None);
        assert!(without.contains("url(images/no-image.jpg)"));
    }

    #[test]
    fn detail_fragments_put_overlay_first() {
        let fragments = movie_detail_fragments(&detail());
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].contains("backdrop-overlay"));
        assert!(fragments[1].contains("details-top"));
    }
}
