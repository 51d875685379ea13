use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::dom::Spinner;

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// GET one catalog endpoint (e.g. `movie/popular`) and return its JSON body.
    async fn get_endpoint(&self, endpoint: &str) -> Result<Value>;
}

impl TmdbClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_key.clone(), &config.base_url, &config.language)
    }

    pub fn new(api_key: impl Into<String>, base_url: &str, language: &str) -> Result<Self> {
        let user_agent = format!("flixx/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            language: language.to_string(),
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}?api_key={}&language={}",
            self.base_url,
            endpoint.trim_start_matches('/'),
            self.api_key,
            self.language
        )
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn get_endpoint(&self, endpoint: &str) -> Result<Value> {
        let url = self.endpoint_url(endpoint);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("request to {endpoint} failed"))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {} {}", endpoint, status, text));
        }
        serde_json::from_str(&text).context("JSON parse failed")
    }
}

/// Fetches one endpoint with the spinner shown for the duration of the call.
/// The spinner is hidden again on success and on failure.
pub async fn fetch_api_data<T: DeserializeOwned>(
    api: &dyn TmdbApi,
    spinner: &Spinner,
    endpoint: &str,
) -> Result<T> {
    info!("Fetching TMDB endpoint {}", endpoint);
    let body = {
        let _loading = spinner.show();
        api.get_endpoint(endpoint).await?
    };
    debug!(endpoint, "TMDB response received");
    serde_json::from_value(body).with_context(|| format!("unexpected shape for {endpoint}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
    use crate::models::{MovieSummary, Paged};
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingApi {
        spinner: Spinner,
        seen_visible: Mutex<Vec<bool>>,
        response: Option<Value>,
    }

    #[async_trait]
    impl TmdbApi for RecordingApi {
        async fn get_endpoint(&self, _endpoint: &str) -> Result<Value> {
            self.seen_visible
                .lock()
                .unwrap()
                .push(self.spinner.is_visible());
            self.response
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    #[test]
    fn builds_url_with_credentials() {
        let client = TmdbClient::new("k3y", DEFAULT_BASE_URL, DEFAULT_LANGUAGE).unwrap();
        assert_eq!(
            client.endpoint_url("movie/popular"),
            "https://api.themoviedb.org/3/movie/popular?api_key=k3y&language=en-US"
        );
        assert_eq!(
            client.endpoint_url("/movie/550"),
            "https://api.themoviedb.org/3/movie/550?api_key=k3y&language=en-US"
        );
    }

    #[tokio::test]
    async fn spinner_visible_during_fetch_and_hidden_after() {
        let spinner = Spinner::new();
        let api = RecordingApi {
            spinner: spinner.clone(),
            seen_visible: Mutex::new(Vec::new()),
            response: Some(json!({ "page": 1, "results": [] })),
        };
        let data: Paged<MovieSummary> = fetch_api_data(&api, &spinner, "movie/popular")
            .await
            .unwrap();
        assert!(data.results.is_empty());
        assert_eq!(*api.seen_visible.lock().unwrap(), vec![true]);
        assert!(!spinner.is_visible());
    }

    #[tokio::test]
    async fn spinner_hidden_after_failed_fetch() {
        let spinner = Spinner::new();
        let api = RecordingApi {
            spinner: spinner.clone(),
            seen_visible: Mutex::new(Vec::new()),
            response: None,
        };
        let res: Result<Paged<MovieSummary>> =
            fetch_api_data(&api, &spinner, "movie/popular").await;
        assert!(res.is_err());
        assert!(!spinner.is_visible());
    }

    #[tokio::test]
    async fn shape_mismatch_is_an_error() {
        let spinner = Spinner::new();
        let api = RecordingApi {
            spinner: spinner.clone(),
            seen_visible: Mutex::new(Vec::new()),
            response: Some(json!({ "status_message": "Invalid API key" })),
        };
        let res: Result<Paged<MovieSummary>> =
            fetch_api_data(&api, &spinner, "movie/popular").await;
        assert!(res.is_err());
        assert!(!spinner.is_visible());
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        let client =
            TmdbClient::new("s3cr3t-key", "http://127.0.0.1:1", DEFAULT_LANGUAGE).unwrap();
        let err = client.get_endpoint("movie/popular").await.unwrap_err();
        let rendered = format!("{:?} / {:#}", err, err);
        assert!(rendered.contains("movie/popular"));
        assert!(!rendered.contains("s3cr3t-key"));
    }
}
