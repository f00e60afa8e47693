//! Command handlers.
//!
//! Handlers write their output to a caller-supplied writer so they can be
//! exercised without a terminal.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use docgate_acl::fields::AclFieldNames;
use docgate_acl::params::RequestParams;
use docgate_core::DocgateConfig;
use docgate_search::{AclDocument, AclSchema, SecurityComponent};

use crate::cli::{Cli, Command, ConfigAction, RequestArgs};

// ============================================================================
// Dispatch
// ============================================================================

/// Run a parsed command line, printing to stdout.
pub async fn run(cli: Cli) -> Result<()> {
    let mut out = std::io::stdout().lock();
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Config { action } => handle_config(config_path, action, &mut out),
        Command::Resolve(request) => {
            let config = load_config(config_path)?;
            cmd_resolve(&config, &request, &mut out).await
        }
        Command::Filter {
            request,
            json,
            document,
        } => {
            let config = load_config(config_path)?;
            cmd_filter(&config, &request, json, document.as_deref(), &mut out).await
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Default configuration file location for this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docgate").join("config.toml"))
}

/// Load configuration from an explicit path, else the default location if
/// a file exists there, else built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<DocgateConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };
    let config = DocgateConfig::load(path.as_deref())
        .with_context(|| match &path {
            Some(p) => format!("failed to load configuration from {}", p.display()),
            None => "invalid default configuration".to_string(),
        })?;
    log::debug!("Configuration: {config:?}");
    Ok(config)
}

fn handle_config(
    explicit: Option<&Path>,
    action: ConfigAction,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(explicit, out),
        ConfigAction::Show => {
            let config = load_config(explicit)?;
            write!(out, "{}", config.to_toml_string()?)?;
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = file
                .or_else(|| explicit.map(Path::to_path_buf))
                .or_else(default_config_path)
                .context("could not determine config directory for this platform")?;
            cmd_config_init(&path, force, out)
        }
    }
}

/// Print the configuration file path in effect.
pub fn cmd_config_path(explicit: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path()
            .context("could not determine config directory for this platform")?,
    };
    writeln!(out, "{}", path.display())?;
    if !path.exists() {
        log::warn!(
            "{} does not exist; run `docgate config init` to create it",
            path.display()
        );
    }
    Ok(())
}

/// Write a default configuration file to `path`.
pub fn cmd_config_init(path: &Path, force: bool, out: &mut dyn Write) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "config file already exists at {}; use --force to overwrite",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| docgate_core::Error::io_with_path(e, parent))?;
    }
    let content = DocgateConfig::default().to_toml_string()?;
    std::fs::write(path, content).map_err(|e| docgate_core::Error::io_with_path(e, path))?;
    writeln!(out, "Config file created at {}", path.display())?;
    Ok(())
}

// ============================================================================
// Requests
// ============================================================================

fn component(config: &DocgateConfig) -> Result<SecurityComponent> {
    let schema = AclSchema::build(&AclFieldNames::from_config(&config.fields));
    Ok(SecurityComponent::new(config, schema.schema().clone())?)
}

/// Print the access tokens for a request, one per line.
pub async fn cmd_resolve(
    config: &DocgateConfig,
    request: &RequestArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let component = component(config)?;
    let params = request.to_params();
    let result = component.tokens(&params).await;
    component.shutdown();

    let tokens = result.context("token resolution failed")?;
    if tokens.is_empty() {
        log::info!("No access tokens; only open documents are visible");
    }
    for token in &tokens {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

/// Print the compiled filter for a request.
///
/// Bypassed requests are reported instead of compiled. With `document`,
/// also reports whether that document would be visible.
pub async fn cmd_filter(
    config: &DocgateConfig,
    request: &RequestArgs,
    json: bool,
    document: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let component = component(config)?;
    let params: RequestParams = request.to_params();

    if let Some(reason) = component.bypass(&params) {
        writeln!(out, "bypassed: {reason:?}")?;
        component.shutdown();
        return Ok(());
    }

    let result = component.compile(&params).await;
    component.shutdown();
    let filter = result.context("filter compilation failed")?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&filter)?)?;
    } else {
        writeln!(out, "{filter}")?;
    }

    if let Some(path) = document {
        let content = std::fs::read_to_string(path)
            .map_err(|e| docgate_core::Error::io_with_path(e, path))?;
        let doc: AclDocument = serde_json::from_str(&content)
            .with_context(|| format!("invalid document JSON in {}", path.display()))?;
        let names = component.compiler().fields();
        let values = doc.field_values(names, component.compiler().sentinel());
        let visible = filter.matches(&values);
        writeln!(out, "{}: {}", doc.id, if visible { "visible" } else { "hidden" })?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
