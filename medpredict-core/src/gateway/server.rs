//! Dashboard HTTP server built on axum.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::render::PageRenderer;
use crate::config::DashboardConfig;
use crate::dispatcher::{DiseasePage, Dispatcher};
use crate::error::RenderError;
use crate::form::FormState;
use crate::model::ModelStore;
use crate::schema::Disease;

/// Shared, read-only state for axum handlers.
pub type SharedState = Arc<AppState>;

/// Everything a request needs. Built once at startup, never mutated.
#[derive(Debug)]
pub struct AppState {
    dispatcher: Dispatcher,
    renderer: PageRenderer,
    config: DashboardConfig,
    assets_dir: PathBuf,
    started_at: chrono::DateTime<Utc>,
}

impl AppState {
    /// Load the model store named by `config` and build the state around it.
    pub fn load(config: DashboardConfig) -> crate::Result<Self> {
        let store = ModelStore::load(&config.models)?;
        Self::new(Arc::new(store), config)
    }

    /// Compile the page templates and wrap the loaded model store.
    pub fn new(store: Arc<ModelStore>, config: DashboardConfig) -> crate::Result<Self> {
        let assets_dir = config.ui.resolve_assets_dir();
        let renderer = PageRenderer::new(&config.ui, &assets_dir)?;
        Ok(Self {
            dispatcher: Dispatcher::new(store),
            renderer,
            config,
            assets_dir,
            started_at: Utc::now(),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        (Utc::now() - self.started_at).num_seconds().max(0) as u64
    }
}

/// Build the dashboard router.
pub fn router(state: SharedState) -> Router {
    let assets = ServeDir::new(&state.assets_dir);
    Router::new()
        .route("/", get(home_handler))
        .route("/predict/{slug}", get(form_handler).post(submit_handler))
        .route("/health", get(health_handler))
        .nest_service("/assets", assets)
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn html(status: StatusCode, page: Result<String, RenderError>) -> Response {
    match page {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Page render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

async fn home_handler(State(state): State<SharedState>) -> Response {
    html(StatusCode::OK, state.renderer.home())
}

/// Navigating to a disease page always starts a fresh form.
async fn form_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    uri: Uri,
) -> Response {
    let Some(disease) = Disease::from_slug(&slug) else {
        return not_found(&state, &uri);
    };
    html(
        StatusCode::OK,
        state.renderer.disease_page(&DiseasePage::open(disease)),
    )
}

async fn submit_handler(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    uri: Uri,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let Some(disease) = Disease::from_slug(&slug) else {
        return not_found(&state, &uri);
    };

    let form = match FormState::decode(
        disease,
        fields.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    ) {
        Ok(form) => form,
        Err(rejection) => {
            // The error text carries the rejected value; log only the field.
            tracing::warn!(%disease, field = rejection.error.field(), "Rejected submission");
            return html(StatusCode::BAD_REQUEST, state.renderer.rejected(&rejection));
        }
    };

    match DiseasePage::with_form(form).submit(&state.dispatcher) {
        Ok(page) => html(StatusCode::OK, state.renderer.disease_page(&page)),
        Err(e) => {
            tracing::error!(%disease, error = %e, "Submission failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed").into_response()
        }
    }
}

/// Health check endpoint.
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let models: Vec<_> = state
        .dispatcher
        .store()
        .handles()
        .map(|h| {
            serde_json::json!({
                "disease": h.disease(),
                "algorithm": h.algorithm(),
                "n_features": h.n_features(),
            })
        })
        .collect();
    Json(serde_json::json!({
        "status": "ok",
        "models": models,
        "uptime_secs": state.uptime_secs(),
    }))
}

async fn not_found_handler(State(state): State<SharedState>, uri: Uri) -> Response {
    not_found(&state, &uri)
}

fn not_found(state: &AppState, uri: &Uri) -> Response {
    html(StatusCode::NOT_FOUND, state.renderer.not_found(uri.path()))
}

/// Start the dashboard on the configured address.
///
/// Runs until Ctrl-C.
pub async fn run(state: SharedState) -> crate::Result<()> {
    let addr = state.config.server.addr();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
