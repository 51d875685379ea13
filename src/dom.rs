//! In-memory stand-in for the page DOM: named containers, a spinner and the
//! navigation links. A request renders into one `Document` and serializes it.

use anyhow::{anyhow, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::utils::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerId {
    PopularMovies,
    PopularShows,
    MovieDetails,
    ShowDetails,
}

impl ContainerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerId::PopularMovies => "popular-movies",
            ContainerId::PopularShows => "popular-shows",
            ContainerId::MovieDetails => "movie-details",
            ContainerId::ShowDetails => "show-details",
        }
    }

    fn class(&self) -> &'static str {
        match self {
            ContainerId::PopularMovies | ContainerId::PopularShows => "grid",
            ContainerId::MovieDetails | ContainerId::ShowDetails => "details",
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loading indicator shared between a document and the fetches made for it.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    visible: Arc<AtomicBool>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Shows the spinner until the returned guard is dropped.
    pub fn show(&self) -> LoadingGuard {
        self.visible.store(true, Ordering::SeqCst);
        LoadingGuard {
            visible: Arc::clone(&self.visible),
        }
    }
}

/// Hides the spinner on drop, whichever way the fetch finished.
#[must_use = "the spinner hides as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    visible: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.visible.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

impl NavLink {
    fn new(href: &str, label: &str) -> Self {
        Self {
            href: href.to_string(),
            label: label.to_string(),
            active: false,
        }
    }
}

#[derive(Debug)]
struct Container {
    id: ContainerId,
    children: Vec<String>,
}

#[derive(Debug)]
pub struct Document {
    title: String,
    containers: Vec<Container>,
    nav_links: Vec<NavLink>,
    spinner: Spinner,
}

impl Document {
    pub fn new(title: &str, containers: &[ContainerId]) -> Self {
        Self {
            title: title.to_string(),
            containers: containers
                .iter()
                .map(|id| Container {
                    id: *id,
                    children: Vec::new(),
                })
                .collect(),
            nav_links: vec![
                NavLink::new("/index.html", "Movies"),
                NavLink::new("/shows.html", "TV Shows"),
            ],
            spinner: Spinner::new(),
        }
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    pub fn nav_links(&self) -> &[NavLink] {
        &self.nav_links
    }

    pub fn nav_links_mut(&mut self) -> &mut [NavLink] {
        &mut self.nav_links
    }

    /// Appends a fragment. Repeated calls accumulate; nothing is diffed.
    pub fn append(&mut self, id: ContainerId, fragment: String) -> Result<()> {
        let container = self
            .containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow!("page has no #{} container", id))?;
        container.children.push(fragment);
        Ok(())
    }

    pub fn children(&self, id: ContainerId) -> &[String] {
        self.containers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("  <meta charset=\"UTF-8\" />\n");
        out.push_str(
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
        );
        out.push_str("  <link rel=\"stylesheet\" href=\"/css/style.css\" />\n");
        out.push_str(&format!("  <title>{}</title>\n", escape_html(&self.title)));
        out.push_str("</head>\n<body>\n  <header class=\"main-header\">\n");
        out.push_str("    <div class=\"container flex\">\n");
        out.push_str("      <div class=\"logo\"><a href=\"/index.html\">FLIXX</a></div>\n");
        out.push_str("      <nav>\n        <ul>\n");
        for link in &self.nav_links {
            let class = if link.active {
                "nav-link active"
            } else {
                "nav-link"
            };
            out.push_str(&format!(
                "          <li><a class=\"{}\" href=\"{}\">{}</a></li>\n",
                class,
                escape_html(&link.href),
                escape_html(&link.label)
            ));
        }
        out.push_str("        </ul>\n      </nav>\n    </div>\n  </header>\n");

        let spinner_class = if self.spinner.is_visible() {
            "spinner show"
        } else {
            "spinner"
        };
        out.push_str(&format!("  <div class=\"{spinner_class}\"></div>\n"));

        out.push_str("  <main class=\"container\">\n");
        for container in &self.containers {
            out.push_str(&format!(
                "    <div id=\"{}\" class=\"{}\">\n",
                container.id,
                container.id.class()
            ));
            for child in &container.children {
                out.push_str(child);
                out.push('\n');
            }
            out.push_str("    </div>\n");
        }
        out.push_str("  </main>\n</body>\n</html>\n");
        out
    }
}
