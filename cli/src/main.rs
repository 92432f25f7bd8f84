//! CLI entrypoint for team-signup
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use signup_application::{AuditLog, NoAuditLog, RegistrationGateway};
use signup_infrastructure::{ConfigLoader, FileConfig, JsonlAuditLog, Severity, WebhookGateway};
use signup_presentation::{
    Cli, GatewayFactory, Navigator, RegistrationPage, spawn_stdin_lines, status_line,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr, or to `log_file` through a non-blocking writer whose
/// guard must live until exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file must name a file: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// Command line flags take precedence over every config source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(url) = &cli.webhook_url {
        config.webhook_url = Some(url.clone());
    }
    if let Some(launch_time) = &cli.launch_time {
        config.launch_time = Some(launch_time.clone());
    }
    if let Some(domain) = &cli.email_domain {
        config.email_domain = Some(domain.clone());
    }
    if let Some(path) = &cli.audit_log {
        config.audit_log = Some(path.clone());
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, cli);

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("Config error: {}", issue.message),
            Severity::Warning => warn!("{}", issue.message),
        }
    }
    if FileConfig::has_errors(&issues) {
        bail!("Invalid configuration ({} problem(s))", issues.len());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;
    info!("Starting team-signup");

    let config = load_config(&cli)?;
    let schedule = config.launch_schedule()?;
    let settings = config.registration_settings()?;
    let timeout = config.request_timeout();

    // === Dependency Injection ===
    let gateway: Option<Arc<dyn RegistrationGateway>> = match config.webhook_url() {
        Some(url) => Some(Arc::new(WebhookGateway::new(url, timeout)?)),
        None => None,
    };

    let Some(route) = cli.selected_command().route() else {
        let Some(gateway) = gateway else {
            bail!(
                "No webhook URL configured. Use --webhook-url or set webhook_url in team-signup.toml"
            );
        };
        println!("{}", status_line(gateway).await);
        return Ok(());
    };

    let audit: Arc<dyn AuditLog> = match &config.audit_log {
        Some(path) => match JsonlAuditLog::open(path) {
            Some(log) => {
                info!("Audit log: {}", log.path().display());
                Arc::new(log)
            }
            None => Arc::new(NoAuditLog),
        },
        None => Arc::new(NoAuditLog),
    };

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let navigator = Navigator::new(schedule, cancellation.clone()).with_quiet(cli.quiet);
    if !navigator.reach_registration(route).await {
        info!("Interrupted before registration opened");
        return Ok(());
    }

    let factory: GatewayFactory = Arc::new(move |url: &str| {
        WebhookGateway::new(url, timeout)
            .map(|g| Arc::new(g) as Arc<dyn RegistrationGateway>)
            .map_err(|e| e.to_string())
    });

    let page = RegistrationPage::new(settings, factory, std::io::stdout())
        .with_gateway(gateway)
        .with_audit_log(audit)
        .with_cancellation(cancellation);
    let final_state = page.run(spawn_stdin_lines()).await;
    info!("Registration page closed in state {}", final_state);

    Ok(())
}
