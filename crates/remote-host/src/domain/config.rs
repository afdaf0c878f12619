//! Host configuration.
//!
//! [`HostConfig`] is the single source of truth for all runtime settings.  It
//! is assembled once at startup from defaults, the optional TOML file and the
//! command line (in increasing precedence) and then shared read-only.
//!
//! Keeping it a plain struct with no environment reads makes the supervisor
//! and the gateway easy to construct in tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use remote_core::domain::DEFAULT_MAX_RESTART_ATTEMPTS;

/// Default per-invocation timeout for external input tools.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_millis(5_000);

/// All runtime configuration for the host.
///
/// # Example
///
/// ```rust
/// use remote_host::domain::HostConfig;
///
/// let cfg = HostConfig::default();
/// assert_eq!(cfg.port, 0);
/// assert_eq!(cfg.max_restart_attempts, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Interface to bind.  `0.0.0.0` accepts controllers from the LAN.
    pub bind_ip: IpAddr,

    /// Listening port.  `0` asks the OS for an ephemeral port, which is then
    /// advertised over mDNS and in the pairing code.
    pub port: u16,

    /// Consecutive restarts allowed before the host exits with failure.
    pub max_restart_attempts: u32,

    /// Upper bound on a single external tool invocation.
    pub backend_timeout: Duration,

    /// Instance name advertised over mDNS.
    pub service_name: String,

    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,

    pub enable_native: bool,
    pub enable_script_shell: bool,
    pub enable_cli_tools: bool,

    /// Log every action instead of performing it.
    pub dry_run: bool,

    /// Advertise the host over mDNS.
    pub discovery: bool,

    /// Print the pairing QR code on every successful start.
    pub pairing_code: bool,
}

/// Base of the advertised instance name.
pub const DEFAULT_SERVICE_NAME: &str = "Remote Control Host";

impl HostConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Instance name used when the config file does not set one, e.g.
    /// `Remote Control Host (studio)`.
    pub fn default_service_name(hostname: &str) -> String {
        format!("{DEFAULT_SERVICE_NAME} ({hostname})")
    }
}

impl Default for HostConfig {
    /// | Field                  | Default                     |
    /// |------------------------|-----------------------------|
    /// | bind_ip                | `0.0.0.0`                   |
    /// | port                   | `0` (ephemeral)             |
    /// | max_restart_attempts   | `3`                         |
    /// | backend_timeout        | 5 seconds                   |
    /// | service_name           | `Remote Control Host`       |
    /// | log_level              | `info`                      |
    /// | backends, discovery, QR| enabled                     |
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 0,
            max_restart_attempts: DEFAULT_MAX_RESTART_ATTEMPTS,
            backend_timeout: DEFAULT_BACKEND_TIMEOUT,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            log_level: "info".to_string(),
            enable_native: true,
            enable_script_shell: true,
            enable_cli_tools: true,
            dry_run: false,
            discovery: true,
            pairing_code: true,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_all_interfaces_on_ephemeral_port() {
        // Arrange / Act
        let cfg = HostConfig::default();

        // Assert
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:0");
    }

    #[test]
    fn test_default_service_name_includes_hostname() {
        assert_eq!(
            HostConfig::default_service_name("studio"),
            "Remote Control Host (studio)"
        );
    }

    #[test]
    fn test_default_timeouts_and_budget() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.backend_timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_restart_attempts, 3);
    }

    #[test]
    fn test_default_enables_every_collaborator() {
        let cfg = HostConfig::default();
        assert!(cfg.enable_native && cfg.enable_script_shell && cfg.enable_cli_tools);
        assert!(cfg.discovery && cfg.pairing_code);
        assert!(!cfg.dry_run);
    }
}
