use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ASSETS_DIR: &str = "public";

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub addr: SocketAddr,
    pub assets_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .context("TMDB_API_KEY not set")?;
        let base_url = env_or("TMDB_BASE_URL", DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let language = env_or("TMDB_LANGUAGE", DEFAULT_LANGUAGE);
        let addr_raw = env_or("FLIXX_ADDR", DEFAULT_ADDR);
        let addr = addr_raw
            .parse()
            .with_context(|| format!("FLIXX_ADDR is not a socket address: {addr_raw}"))?;
        let assets_dir = PathBuf::from(env_or("FLIXX_ASSETS_DIR", DEFAULT_ASSETS_DIR));

        Ok(Self {
            api_key,
            base_url,
            language,
            addr,
            assets_dir,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// The page being rendered. Replaces the global "current page" holder: it is
/// built once per request from the URI and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub path: String,
    pub query: Option<String>,
}

impl PageContext {
    pub fn new(path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            path: path.into(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Parses `"/movie-details.html?id=550"` style input.
    pub fn from_target(target: &str) -> Self {
        match target.split_once('?') {
            Some((path, query)) => Self::new(path, Some(query)),
            None => Self::new(target, None),
        }
    }

    /// The numeric `id` query parameter, if present and well formed.
    pub fn id(&self) -> Option<u64> {
        let query = self.query.as_deref()?;
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "id")
            .and_then(|(_, value)| {
                let decoded = urlencoding::decode(value).ok()?;
                decoded.trim().parse::<u64>().ok()
            })
            .filter(|id| *id > 0)
    }
}
