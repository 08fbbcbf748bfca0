//! CLI subcommand handlers.

use anyhow::Context;
use medpredict_core::gateway::{AppState, run_dashboard};
use medpredict_core::schema::FieldKind;
use medpredict_core::{DashboardConfig, Disease, FieldSpec, ModelStore};
use std::path::PathBuf;
use std::sync::Arc;

use crate::Commands;
use crate::ConfigAction;
use crate::ServeArgs;

/// Handle a CLI subcommand.
pub async fn handle_command(command: Commands, config: DashboardConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => handle_serve(args, config).await,
        Commands::Check { models_dir } => handle_check(models_dir, config),
        Commands::Schema { disease } => {
            handle_schema(disease);
            Ok(())
        }
        Commands::Config { action } => handle_config(action, &config),
    }
}

fn apply_overrides(config: &mut DashboardConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.models_dir {
        config.models.dir = Some(dir.clone());
    }
}

async fn handle_serve(args: ServeArgs, mut config: DashboardConfig) -> anyhow::Result<()> {
    apply_overrides(&mut config, &args);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let state = AppState::load(config).context("Failed to start the dashboard")?;

    let addr = state.config().server.addr();
    println!("MedPredict dashboard at http://{}", addr);
    run_dashboard(Arc::new(state))
        .await
        .with_context(|| format!("Dashboard server on {} failed", addr))
}

fn handle_check(models_dir: Option<PathBuf>, mut config: DashboardConfig) -> anyhow::Result<()> {
    if let Some(dir) = models_dir {
        config.models.dir = Some(dir);
    }
    let store = ModelStore::load(&config.models).context("Model check failed")?;

    println!("All models loaded from {}:", config.models.resolve_dir().display());
    for handle in store.handles() {
        let source = handle
            .provenance()
            .and_then(|p| p.source.as_deref())
            .unwrap_or("unknown source");
        println!(
            "  {:<14} {:<7} {:>2} features  ({})",
            handle.disease().to_string(),
            handle.algorithm(),
            handle.n_features(),
            source
        );
    }
    Ok(())
}

fn handle_schema(disease: Option<Disease>) {
    let diseases = match disease {
        Some(d) => vec![d],
        None => Disease::ALL.to_vec(),
    };
    for (i, disease) in diseases.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        let schema = disease.schema();
        println!("{} ({} features):", disease.title(), schema.len());
        for (position, field) in schema.fields.iter().enumerate() {
            println!("  {:>2}  {:<24} {}", position, field.key, describe_field(field));
        }
    }
}

/// One-line description of a field's value domain.
fn describe_field(field: &FieldSpec) -> String {
    match field.kind {
        FieldKind::Integer { min, max, default } => match max {
            Some(max) => format!("integer {min}..={max} (default {default})"),
            None => format!("integer >= {min} (default {default})"),
        },
        FieldKind::Float { min, max, default } => match max {
            Some(max) => format!("float {min}..={max} (default {default})"),
            None => format!("float >= {min} (default {default})"),
        },
        FieldKind::Categorical(encoding) => {
            let options: Vec<String> = encoding
                .options
                .iter()
                .map(|c| format!("{}={}", c.label, c.code))
                .collect();
            format!(
                "categorical {} (default {})",
                options.join(", "),
                encoding.default
            )
        }
    }
}

fn handle_config(action: ConfigAction, config: &DashboardConfig) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = config
                .to_toml()
                .map_err(|e| anyhow::anyhow!("Failed to render config: {}", e))?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}
