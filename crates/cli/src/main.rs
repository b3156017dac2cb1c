//! Turnstile - Ingress conformance harness CLI.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use turnstile_application::checks::register_builtin;
use turnstile_application::ports::ProbeError;
use turnstile_application::{CancellationToken, CheckContext, CheckRegistry, CheckRunner, RegistryError};
use turnstile_domain::{OutputMode, RunConfig};
use turnstile_infrastructure::{EchoBackend, ReqwestProbe, StaticIngressResolver};

mod cli;
mod report;

use cli::{Cli, Command, EchoArgs, RunArgs};

/// Failures that abort the CLI before or after a run.
#[derive(Debug, Error)]
enum CliError {
    /// The probe client could not be created.
    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// Registering checks failed; fatal before any check runs.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A `--check` filter named an unregistered check.
    #[error("unknown check '{name}', available: {available}")]
    UnknownCheck {
        /// The unmatched filter value.
        name: String,
        /// Comma-separated registered names.
        available: String,
    },

    /// A `--host-mapping` value was not of the form `NAME=HOST`.
    #[error("invalid host mapping '{0}', expected NAME=HOST")]
    InvalidMapping(String),

    /// The JSON report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// The echo backend listener could not be bound.
    #[error("failed to bind echo backend: {0}")]
    Bind(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run_checks(args).await,
        Command::List => list_checks(),
        Command::Echo(args) => serve_echo(args).await,
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "turnstile aborted");
            ExitCode::from(2)
        }
    }
}

/// Builds the registry of built-in checks.
fn builtin_registry() -> Result<CheckRegistry, RegistryError> {
    let mut registry = CheckRegistry::new();
    register_builtin(&mut registry)?;
    Ok(registry)
}

/// Narrows a registry to the `--check` filters, keeping filter order.
fn select_checks(registry: CheckRegistry, filters: &[String]) -> Result<CheckRegistry, CliError> {
    if filters.is_empty() {
        return Ok(registry);
    }

    let mut selected = CheckRegistry::new();
    for name in filters {
        let check = registry.get(name).ok_or_else(|| CliError::UnknownCheck {
            name: name.clone(),
            available: registry.names().collect::<Vec<_>>().join(", "),
        })?;
        selected.register(Arc::clone(check))?;
    }
    Ok(selected)
}

/// Splits a `NAME=HOST` mapping, defaulting the namespace when NAME has no
/// `namespace/` prefix.
fn parse_mapping(raw: &str, default_namespace: &str) -> Result<(String, String, String), CliError> {
    let (name, host) = raw
        .split_once('=')
        .filter(|(name, host)| !name.is_empty() && !host.is_empty())
        .ok_or_else(|| CliError::InvalidMapping(raw.to_string()))?;

    let (namespace, name) = name
        .split_once('/')
        .unwrap_or((default_namespace, name));
    Ok((namespace.to_string(), name.to_string(), host.to_string()))
}

async fn run_checks(args: RunArgs) -> Result<ExitCode, CliError> {
    let config = RunConfig::new(args.namespace.clone())
        .with_request_timeout(Duration::from_millis(args.timeout_ms))
        .with_retry_attempts(args.retries)
        .with_output(args.output);

    let mut resolver = StaticIngressResolver::new();
    if let Some(target) = args.target {
        resolver = resolver.with_fallback(target);
    }
    for mapping in &args.host_mappings {
        let (namespace, name, host) = parse_mapping(mapping, &args.namespace)?;
        resolver = resolver.with_mapping(namespace, name, host);
    }

    let registry = select_checks(builtin_registry()?, &args.checks)?;
    let probe = Arc::new(ReqwestProbe::new()?);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let output = config.output;
    let context = CheckContext::new(config, Arc::new(resolver), probe, cancel);
    let report = CheckRunner::new(context).run_all(&registry).await;

    match output {
        OutputMode::Text => print!("{}", report::render_text(&report)),
        OutputMode::Json => println!("{}", report::render_json(&report)?),
    }

    Ok(ExitCode::from(report.exit_code()))
}

fn list_checks() -> Result<ExitCode, CliError> {
    let registry = builtin_registry()?;
    for check in registry.all() {
        println!("{:<18} {}", check.name(), check.description());
    }
    Ok(ExitCode::SUCCESS)
}

async fn serve_echo(args: EchoArgs) -> Result<ExitCode, CliError> {
    let backend = EchoBackend::bind(args.addr.as_str()).await?;
    println!("echo backend listening on {}", backend.addr());

    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("interrupt received, shutting down echo backend");
    backend.shutdown().await;
    Ok(ExitCode::SUCCESS)
}
