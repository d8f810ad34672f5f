//! Tether CLI - Confirm a deploy target is reachable
//!
//! Resolves a host, probes it with the configured checker, and reports each
//! failed attempt until the target answers or the attempt budget runs out.

mod console;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tether_core::{load_config, CheckMethod, Config, ProbeEvent};
use tether_probe::{Checker, DeployPresenter, HostSupplier, ProbeHandle, ReachabilityProbe};
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::console::ConsoleView;

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Check that a deploy target is reachable")]
#[command(version)]
struct Args {
    /// Hostname or IP address of the deploy target
    host: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "tether.toml")]
    config: PathBuf,

    /// Reachability check method
    #[arg(short, long)]
    method: Option<Method>,

    /// TCP port for the tcp method
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of attempts before giving up
    #[arg(long)]
    attempts: Option<u32>,

    /// Per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Tcp,
    Icmp,
}

impl From<Method> for CheckMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Tcp => CheckMethod::Tcp,
            Method::Icmp => CheckMethod::Icmp,
        }
    }
}

impl Args {
    /// Apply command-line overrides on top of the loaded file
    fn apply(&self, config: &mut Config) {
        if let Some(method) = self.method {
            config.check.method = method.into();
        }
        if let Some(port) = self.port {
            config.check.port = port;
        }
        if let Some(attempts) = self.attempts {
            config.probe.attempt_count = attempts;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.probe.timeout_ms = timeout_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Tether v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply(&mut config);
    config.validate()?;

    info!(
        host = %args.host,
        method = ?config.check.method,
        attempts = config.probe.attempt_count,
        timeout_ms = config.probe.timeout_ms,
        worst_case = ?config.to_policy().worst_case(),
        "Probing deploy target"
    );

    let start = || {
        let probe = ReachabilityProbe::with_policy(
            Checker::from_config(&config.check),
            config.to_policy(),
        );
        let handle = probe.spawn(HostSupplier::new(args.host.clone()));
        cancel_on_ctrl_c(handle.cancellation_token());
        handle
    };

    let outcome = if args.json {
        print_json(start()).await?
    } else {
        let mut view = ConsoleView::default();
        DeployPresenter::new().deploy(&mut view, start).await?
    };

    match outcome {
        ProbeEvent::Reachable { .. } => Ok(()),
        ProbeEvent::Failed { reason } => bail!(reason),
        ProbeEvent::Progress { .. } => bail!("probe ended without a result"),
    }
}

fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling probe");
            token.cancel();
        }
    });
}

async fn print_json(mut handle: ProbeHandle) -> Result<ProbeEvent> {
    while let Some(event) = handle.next_event().await {
        println!("{}", serde_json::to_string(&event)?);
        if event.is_terminal() {
            return Ok(event);
        }
    }
    bail!("probe ended without a result")
}
