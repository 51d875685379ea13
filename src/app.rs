use crate::config::{Config, PageContext};
use crate::dispatch::{self, MissingId, Page, ROUTES};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::utils::escape_html;
use anyhow::Result;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub assets_dir: PathBuf,
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(&config)?);
    info!("Using TMDB base URL {}", config.base_url);
    info!("Serving static assets from {}", config.assets_dir.display());

    let state = AppState {
        tmdb,
        assets_dir: config.assets_dir.clone(),
    };

    let app = build_router(state);

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);
    let mut router = Router::new().route("/health", get(health));
    for (path, page) in ROUTES {
        router = router.route(
            path,
            get(move |State(state): State<AppState>, uri: Uri| {
                handle_page(state, uri, page)
            }),
        );
    }
    router
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn handle_page(state: AppState, uri: Uri, page: Page) -> Response {
    let ctx = PageContext::new(uri.path(), uri.query());
    let mut doc = page.document();
    match dispatch::init(&ctx, state.tmdb.as_ref(), &mut doc).await {
        Ok(()) => Html(doc.to_html()).into_response(),
        Err(err) if err.downcast_ref::<MissingId>().is_some() => {
            warn!("Rejecting {}: {}", uri, err);
            error_page(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            error!("Failed to render {}: {:?}", uri, err);
            error_page(
                StatusCode::BAD_GATEWAY,
                "Could not load data from the movie catalog.",
            )
        }
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"UTF-8\" /><title>Flixx | Error</title></head>\n<body>\n  <div class=\"alert alert-error\">{}</div>\n  <a href=\"/index.html\">Back to movies</a>\n</body>\n</html>\n",
        escape_html(message)
    );
    (status, Html(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
