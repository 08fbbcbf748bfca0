//! Configuration system for MedPredict.
//!
//! Uses `figment` for layered configuration: defaults -> user config ->
//! workspace config -> explicit config file -> environment. Configuration is
//! loaded from `~/.config/medpredict/config.toml` and/or
//! `.medpredict/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::gateway::ServerConfig;
use crate::schema::Disease;

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl DashboardConfig {
    /// Reject values that would prevent the dashboard from starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".into(),
            });
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "server.host must not be empty".into(),
            });
        }
        for disease in Disease::ALL {
            if self.models.file_for(disease).trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("models.{disease} must name an artifact file"),
                });
            }
        }
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}

/// Location and validation policy of the model artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directory holding the artifacts. Defaults to `models/` next to the
    /// executable, falling back to `models/` in the working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    pub diabetes: String,
    pub heart_disease: String,
    pub parkinsons: String,
    /// Reject artifacts that do not declare their categorical encodings.
    pub require_encodings: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            diabetes: "diabetes_model.json".into(),
            heart_disease: "heart_disease_model.json".into(),
            parkinsons: "parkinsons_model.json".into(),
            require_encodings: false,
        }
    }
}

impl ModelsConfig {
    /// Artifact file name for a disease.
    pub fn file_for(&self, disease: Disease) -> &str {
        match disease {
            Disease::Diabetes => &self.diabetes,
            Disease::HeartDisease => &self.heart_disease,
            Disease::Parkinsons => &self.parkinsons,
        }
    }

    pub fn resolve_dir(&self) -> PathBuf {
        resolve_dir(self.dir.as_deref(), "models")
    }
}

/// Presentation settings of the dashboard shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub page_title: String,
    pub page_icon: String,
    /// Directory served under `/assets`. Same resolution rules as the
    /// models directory, with `assets/` as the default name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,
    /// Image shown on the home page, relative to the assets directory.
    pub home_image: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_title: "Disease Prediction Dashboard".into(),
            page_icon: "🩺".into(),
            assets_dir: None,
            home_image: "image.png".into(),
        }
    }
}

impl UiConfig {
    pub fn resolve_assets_dir(&self) -> PathBuf {
        resolve_dir(self.assets_dir.as_deref(), "assets")
    }
}

/// Resolve a data directory.
///
/// Checks several locations in order:
/// 1. The explicitly configured path
/// 2. `<name>/` next to the current executable
/// 3. `<name>/` relative to the working directory
fn resolve_dir(configured: Option<&Path>, name: &str) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        let candidate = exe_dir.join(name);
        if candidate.is_dir() {
            return candidate;
        }
    }

    PathBuf::from(name)
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `MEDPREDICT_`)
/// 2. Explicit config file (`--config`)
/// 3. Workspace-local config (`.medpredict/config.toml`)
/// 4. User config (`~/.config/medpredict/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
) -> Result<DashboardConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(DashboardConfig::default()));

    // User-level config
    if let Some(dirs) = directories::ProjectDirs::from("dev", "medpredict", "medpredict") {
        let user_config = dirs.config_dir().join("config.toml");
        if user_config.exists() {
            tracing::debug!(path = %user_config.display(), "Merging user config");
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    // Workspace-level config
    if let Some(ws) = workspace {
        let ws_config = ws.join(".medpredict").join("config.toml");
        if ws_config.exists() {
            tracing::debug!(path = %ws_config.display(), "Merging workspace config");
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Explicit config file must exist
    if let Some(file) = config_file {
        if !file.exists() {
            return Err(ConfigError::FileNotFound {
                path: file.to_path_buf(),
            });
        }
        tracing::debug!(path = %file.display(), "Merging explicit config");
        figment = figment.merge(Toml::file(file));
    }

    // Environment variables (MEDPREDICT_SERVER__PORT, MEDPREDICT_MODELS__DIR, etc.)
    figment = figment.merge(Env::prefixed("MEDPREDICT_").split("__"));

    let config: DashboardConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}
