//! HTTP server for the built site.
//!
//! Serves `dist/` as static files and handles the one dynamic route, the
//! contact form:
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `POST /api/contact` | JSON in, JSON out; a plain form post redirects to `/{locale}/contact/sent/` |
//! | `GET /health` | `{"status": "ok"}` |
//! | `GET /`, `/gallery…`, `/photo…`, `/about…`, `/contact…` | 307 to the same path under the negotiated locale |
//! | anything else | file from the output directory, `404.html` when missing |

use crate::config::{SiteConfig, SiteInfo};
use crate::contact::{self, ContactError, ContactForm, ContactSink};
use crate::generate::{PageContext, render_contact};
use crate::i18n;
use axum::extract::{FromRequest, Request, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Top-level sections that exist under every locale prefix.
const SECTIONS: [&str; 4] = ["gallery", "photo", "about", "contact"];

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("{0} has no index.html; run `travel-folio build` first")]
    NotBuilt(PathBuf),
}

/// Shared state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteInfo>,
    pub sink: Arc<ContactSink>,
}

impl AppState {
    pub fn new(site: SiteInfo, sink: ContactSink) -> Self {
        Self {
            site: Arc::new(site),
            sink: Arc::new(sink),
        }
    }
}

/// Errors of the JSON API.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(e) => AppError::BadRequest(e.to_string()),
            other => {
                error!("Contact form error: {other}");
                AppError::Internal("Failed to process request".to_string())
            }
        }
    }
}

/// Create the router: API routes, locale redirects, then static files.
pub fn create_router(state: AppState, output_dir: &Path) -> Router {
    let static_files = ServeDir::new(output_dir)
        .not_found_service(ServeFile::new(output_dir.join("404.html")));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/contact", post(contact))
        .route("/", get(locale_redirect));
    for section in SECTIONS {
        router = router
            .route(&format!("/{section}"), get(locale_redirect))
            .route(&format!("/{section}/"), get(locale_redirect))
            .route(&format!("/{section}/{{*rest}}"), get(locale_redirect));
    }

    router
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Where an un-prefixed request should go: same path and query, locale prepended.
pub fn redirect_target(uri: &Uri, accept_language: Option<&str>) -> String {
    let locale = i18n::negotiate(accept_language);
    let mut target = i18n::localized_path(locale, uri.path());
    if !target.ends_with('/') && !target.rsplit('/').next().is_some_and(|s| s.contains('.')) {
        target.push('/');
    }
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }
    target
}

async fn locale_redirect(uri: Uri, headers: HeaderMap) -> Redirect {
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    Redirect::temporary(&redirect_target(&uri, accept))
}

fn is_form_post(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

/// `POST /api/contact`, JSON or form-encoded.
async fn contact(State(state): State<AppState>, request: Request) -> Response {
    if is_form_post(request.headers()) {
        match Form::<ContactForm>::from_request(request, &()).await {
            Ok(Form(form)) => contact_form_post(&state, form).await,
            Err(rejection) => {
                warn!("Rejected contact form body: {rejection}");
                AppError::BadRequest("Invalid form body".to_string()).into_response()
            }
        }
    } else {
        match Json::<ContactForm>::from_request(request, &()).await {
            Ok(Json(form)) => contact_json(&state, &form).await.into_response(),
            Err(rejection) => {
                warn!("Rejected contact JSON body: {rejection}");
                AppError::BadRequest("Invalid JSON body".to_string()).into_response()
            }
        }
    }
}

async fn contact_json(
    state: &AppState,
    form: &ContactForm,
) -> Result<Json<serde_json::Value>, AppError> {
    contact::submit_async(Arc::clone(&state.sink), form).await?;
    Ok(Json(json!({ "message": "Message sent successfully" })))
}

/// No-JavaScript submission: redirect on success, re-render the form otherwise.
async fn contact_form_post(state: &AppState, form: ContactForm) -> Response {
    let locale = form.locale();
    let (status, message) = match contact::submit_async(Arc::clone(&state.sink), &form).await {
        Ok(_) => {
            let sent = i18n::localized_path(locale, "/contact/sent/");
            return Redirect::to(&sent).into_response();
        }
        Err(ContactError::Validation(e)) => (StatusCode::BAD_REQUEST, e.localized(locale)),
        Err(other) => {
            error!("Contact form error: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                i18n::t(locale, "errors.contact.failed"),
            )
        }
    };

    let ctx = PageContext::new(&state.site, locale, "/contact/");
    let page = render_contact(&ctx, Some(&form), Some(message));
    (status, Html(page.into_string())).into_response()
}

/// Serve the built site until Ctrl-C.
pub async fn serve(
    config: &SiteConfig,
    content_root: &Path,
    output_dir: &Path,
    host: &str,
    port: u16,
) -> Result<(), ServerError> {
    if !output_dir.join("index.html").is_file() {
        return Err(ServerError::NotBuilt(output_dir.to_path_buf()));
    }

    let sink = ContactSink::from_config(&config.contact, content_root);
    if let Some(path) = sink.log_file() {
        info!("Contact submissions are appended to {}", path.display());
    }
    let state = AppState::new(config.site.clone(), sink);
    let app = create_router(state, output_dir);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving {} on http://{}", output_dir.display(), addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
