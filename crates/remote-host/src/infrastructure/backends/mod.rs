//! Concrete input backends and the per-platform priority chain.
//!
//! | Backend              | Platforms     | Categories                        |
//! |----------------------|---------------|-----------------------------------|
//! | [`NativeBackend`]    | all           | pointer, click, scroll, key, text |
//! | [`ScriptShellBackend`] | macOS       | all, including volume and mute    |
//! | [`CliToolBackend`]   | Linux         | all (`xdotool` and `wpctl`)       |
//!
//! If nothing in the chain can perform an action, the selector logs the
//! intended action instead.

pub mod cli;
pub mod mock;
pub mod native;
pub mod process;
pub mod script;
pub mod tools;

use std::sync::Arc;

use tracing::{info, warn};

pub use cli::CliToolBackend;
pub use mock::RecordingBackend;
pub use native::NativeBackend;
pub use process::ProcessRunner;
pub use script::ScriptShellBackend;
pub use tools::{ToolAvailabilityCache, ToolProbe, WhichProbe};

use crate::application::selector::{BackendSelector, InputBackend};
use crate::domain::HostConfig;

/// Builds the backend chain for this platform from the configuration.
pub fn platform_selector(config: &HostConfig) -> BackendSelector {
    if config.dry_run {
        info!("dry run: input actions are logged, not performed");
        return BackendSelector::log_only();
    }

    let runner = ProcessRunner::new(config.backend_timeout);
    let tools = Arc::new(ToolAvailabilityCache::with_which());
    let mut chain: Vec<Arc<dyn InputBackend>> = Vec::new();

    if config.enable_native {
        match NativeBackend::spawn() {
            Ok(native) => chain.push(Arc::new(native)),
            Err(e) => warn!("could not start the native input thread: {e}"),
        }
    }
    if config.enable_script_shell && cfg!(target_os = "macos") {
        chain.push(Arc::new(ScriptShellBackend::new(runner, Arc::clone(&tools))));
    }
    if config.enable_cli_tools && cfg!(target_os = "linux") {
        chain.push(Arc::new(CliToolBackend::new(runner, tools)));
    }

    let selector = BackendSelector::new(chain);
    info!(backends = ?selector.backend_names(), "input backends configured");
    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_has_no_backends() {
        let config = HostConfig {
            dry_run: true,
            ..HostConfig::default()
        };
        assert!(platform_selector(&config).backend_names().is_empty());
    }

    #[test]
    fn test_disabled_backends_are_left_out() {
        let config = HostConfig {
            enable_native: false,
            enable_script_shell: false,
            enable_cli_tools: false,
            ..HostConfig::default()
        };
        assert!(platform_selector(&config).backend_names().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_chain_order() {
        let selector = platform_selector(&HostConfig::default());
        assert_eq!(selector.backend_names(), vec!["native", "cli-tools"]);
    }
}
