//! # Dashboard Gateway
//!
//! HTTP surface of the dashboard: an axum router serving the home page, one
//! form page per disease, a health endpoint and static assets. Pages are
//! rendered from handlebars templates compiled once at startup.

mod render;
mod server;

pub use render::PageRenderer;
pub use server::{AppState, SharedState, router as dashboard_router, run as run_dashboard};

use serde::{Deserialize, Serialize};

/// Listen address of the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

impl ServerConfig {
    /// `host:port`, as passed to the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
