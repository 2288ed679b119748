//! HTTP front end.
//!
//! ```text
//! GET /            → listing        200 | 502
//! GET /leer/{id}   → reader         200 | 404 | 502
//! GET /read/{id}   → 308 to /leer/{id}
//! GET /healthz     → "ok"
//! anything else    → 404 page
//! ```
//!
//! Every request loads fresh data from the [`Catalog`]; nothing is cached
//! between requests. A request owns its view from fetch to render, and axum
//! drops the handler future when the client disconnects, so a navigation
//! that is abandoned mid-fetch never renders into anything.

use crate::api::Catalog;
use crate::config::SiteConfig;
use crate::layout::Viewport;
use crate::listing;
use crate::reader::{self, ReaderError};
use crate::render::Renderer;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use maud::Markup;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info};

const VIEWPORT_WIDTH: &str = "sec-ch-viewport-width";
const VIEWPORT_HEIGHT: &str = "sec-ch-viewport-height";
const CLIENT_HINTS: &str = "Sec-CH-Viewport-Width, Sec-CH-Viewport-Height";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid bind address {0:?}")]
    InvalidAddress(String),
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a handler needs, shared across requests.
pub struct AppState<C> {
    pub renderer: Renderer,
    pub catalog: C,
}

impl<C: Catalog> AppState<C> {
    pub fn new(config: SiteConfig, catalog: C) -> Self {
        Self {
            renderer: Renderer::new(config),
            catalog,
        }
    }
}

type Shared<C> = State<Arc<AppState<C>>>;

pub fn router<C: Catalog + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/", get(listing_page::<C>))
        .route(&format!("{}/{{id}}", reader::ROUTE_PREFIX), get(reader_page::<C>))
        .route(
            &format!("{}/{{id}}", reader::LEGACY_ROUTE_PREFIX),
            get(legacy_reader),
        )
        .route("/healthz", get(healthz))
        .fallback(not_found::<C>)
        .with_state(state)
}

/// Bind `config.server.bind` and serve until Ctrl-C.
pub async fn serve<C: Catalog + 'static>(config: SiteConfig, catalog: C) -> Result<(), ServeError> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|_| ServeError::InvalidAddress(config.server.bind.clone()))?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    let app = router(Arc::new(AppState::new(config, catalog)));
    info!(addr = %listener.local_addr()?, "serving");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn listing_page<C: Catalog>(State(state): Shared<C>) -> Response {
    match listing::load(&state.catalog).await {
        Ok(view) => {
            debug!(cards = view.cards.len(), "listing rendered");
            page(StatusCode::OK, state.renderer.listing(&view))
        }
        Err(_) => page(StatusCode::BAD_GATEWAY, state.renderer.listing_error()),
    }
}

async fn reader_page<C: Catalog>(
    State(state): Shared<C>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let viewport = viewport_hint(&headers).unwrap_or_else(|| state.renderer.default_viewport());
    let (status, markup) = match reader::load(&state.catalog, &id).await {
        Ok(view) => {
            debug!(id, pages = view.book.page_count, "reader rendered");
            (StatusCode::OK, state.renderer.reader(&view, viewport))
        }
        Err(err) => {
            let status = match err {
                ReaderError::NotFound(_) => StatusCode::NOT_FOUND,
                ReaderError::Unavailable(_) => StatusCode::BAD_GATEWAY,
            };
            (status, state.renderer.reader_error(&err))
        }
    };
    (
        [(
            HeaderName::from_static("accept-ch"),
            HeaderValue::from_static(CLIENT_HINTS),
        )],
        page(status, markup),
    )
        .into_response()
}

async fn legacy_reader(Path(id): Path<String>) -> Redirect {
    Redirect::permanent(&reader::path(&id))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found<C: Catalog>(State(state): Shared<C>) -> Response {
    page(StatusCode::NOT_FOUND, state.renderer.not_found())
}

fn page(status: StatusCode, markup: Markup) -> Response {
    (status, Html(markup.into_string())).into_response()
}

/// Viewport from client hints, when the browser sent both.
pub fn viewport_hint(headers: &HeaderMap) -> Option<Viewport> {
    let dimension = |name: &str| {
        headers
            .get(name)?
            .to_str()
            .ok()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    };
    Some(Viewport::new(
        dimension(VIEWPORT_WIDTH)?,
        dimension(VIEWPORT_HEIGHT)?,
    ))
}
