//! Remote Control Host entry point.
//!
//! Parses the command line, loads the optional config file, wires the
//! backends, gateway and transport together and hands control to the
//! [`Supervisor`] until a signal arrives or the restart budget runs out.
//!
//! # Usage
//!
//! ```text
//! remote-host [OPTIONS]
//!
//! Options:
//!   --port <PORT>      Listening port, 0 for ephemeral [env: PORT] [default: 0]
//!   --bind <IP>        Bind address [env: REMOTE_HOST_BIND] [default: 0.0.0.0]
//!   --config <FILE>    TOML config file [env: REMOTE_HOST_CONFIG]
//!   --dry-run          Log input actions instead of performing them
//!   --no-discovery     Do not advertise over mDNS
//!   --no-qr            Do not print the pairing QR code
//! ```
//!
//! # Exit status
//!
//! `0` after SIGINT/SIGTERM, `1` when the listener kept failing and the
//! restart budget was exhausted, and clap's usage error status for bad
//! arguments.

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use remote_host::application::{
    DiscoveryPublisher, Gateway, InputDispatcher, PairingCodeRenderer, Supervisor,
    SupervisorHandle,
};
use remote_host::domain::HostConfig;
use remote_host::infrastructure::backends::platform_selector;
use remote_host::infrastructure::config_file::FileConfig;
use remote_host::infrastructure::discovery::{MdnsPublisher, NoopPublisher};
use remote_host::infrastructure::network::{advertised_ip, local_hostname};
use remote_host::infrastructure::pairing_code::{TerminalQrRenderer, UrlOnlyRenderer};
use remote_host::infrastructure::ws_server::WebSocketTransport;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote control host.
///
/// Accepts a paired controller over WebSocket and replays its pointer,
/// keyboard, text and volume commands on this machine.
#[derive(Debug, Parser)]
#[command(
    name = "remote-host",
    about = "Drive this machine from a controller on the local network",
    version
)]
struct Cli {
    /// Listening port.  `0` lets the OS pick one; the chosen port is
    /// advertised and shown in the pairing code.
    #[arg(long, default_value_t = 0, env = "PORT")]
    port: u16,

    /// IP address to bind.
    #[arg(long, default_value = "0.0.0.0", env = "REMOTE_HOST_BIND")]
    bind: String,

    /// Optional TOML config file.
    #[arg(long, env = "REMOTE_HOST_CONFIG")]
    config: Option<PathBuf>,

    /// Log input actions instead of performing them.
    #[arg(long)]
    dry_run: bool,

    /// Do not advertise the host over mDNS.
    #[arg(long)]
    no_discovery: bool,

    /// Do not print the pairing QR code.
    #[arg(long)]
    no_qr: bool,
}

impl Cli {
    /// Builds the [`HostConfig`]: defaults, then the config file, then the
    /// command line.
    ///
    /// # Errors
    ///
    /// Returns an error if `--bind` is not an IP address or the config file
    /// cannot be read or parsed.
    fn into_host_config(self, hostname: &str) -> anyhow::Result<HostConfig> {
        let bind_ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address: '{}'", self.bind))?;

        let mut config = HostConfig {
            service_name: HostConfig::default_service_name(hostname),
            ..HostConfig::default()
        };

        if let Some(path) = &self.config {
            FileConfig::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?
                .apply_to(&mut config);
        }

        config.bind_ip = bind_ip;
        config.port = self.port;
        config.dry_run = self.dry_run;
        config.discovery = !self.no_discovery;
        config.pairing_code = !self.no_qr;
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let hostname = local_hostname();
    let config = Cli::parse().into_host_config(&hostname)?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        bind = %config.bind_addr(),
        max_restart_attempts = config.max_restart_attempts,
        "remote control host starting"
    );

    let gateway = Arc::new(Gateway::new(Arc::new(InputDispatcher::new(
        platform_selector(&config),
    ))));
    let transport = Arc::new(WebSocketTransport::new(config.bind_addr()));
    let discovery = discovery_publisher(&config, &hostname);
    let renderer: Arc<dyn PairingCodeRenderer> = if config.pairing_code {
        Arc::new(TerminalQrRenderer)
    } else {
        Arc::new(UrlOnlyRenderer)
    };

    let mut supervisor = Supervisor::new(
        transport,
        discovery,
        renderer,
        gateway,
        advertised_ip(config.bind_ip).to_string(),
        config.max_restart_attempts,
    );
    spawn_signal_listeners(supervisor.handle());

    let exit = supervisor.run().await;
    info!(?exit, "remote control host stopped");
    Ok(ExitCode::from(exit.code()))
}

fn discovery_publisher(config: &HostConfig, hostname: &str) -> Arc<dyn DiscoveryPublisher> {
    if !config.discovery {
        return Arc::new(NoopPublisher);
    }
    match MdnsPublisher::new(&config.service_name, hostname) {
        Ok(publisher) => Arc::new(publisher),
        Err(e) => {
            warn!("mDNS unavailable, continuing without discovery: {e}");
            Arc::new(NoopPublisher)
        }
    }
}

/// Ctrl-C everywhere, SIGTERM on Unix.
fn spawn_signal_listeners(handle: SupervisorHandle) {
    #[cfg(unix)]
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    if term.recv().await.is_some() {
                        info!("received SIGTERM");
                        handle.shutdown("SIGTERM");
                    }
                }
                Err(e) => error!("failed to listen for SIGTERM: {e}"),
            }
        });
    }

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C");
                handle.shutdown("SIGINT");
            }
            Err(e) => error!("failed to listen for Ctrl+C: {e}"),
        }
    });
}

// ── Tests ─────────────────────────────────────────────────────────────────────
