//! mDNS advertisement of the host.
//!
//! Each successful start registers one `_remotecontrol._tcp` instance whose
//! TXT record carries the advertised address and the session id, so a
//! controller on the LAN can connect without typing anything.  A restart
//! withdraws the old instance and registers a new one with the new port and
//! session.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use mdns_sd::{ServiceDaemon, ServiceInfo};
use remote_core::ConnectionDescriptor;
use tracing::{debug, info, warn};

use crate::application::supervisor::{DiscoveryError, DiscoveryPublisher};

/// DNS-SD service type advertised by the host.
pub const SERVICE_TYPE: &str = "_remotecontrol._tcp.local.";

/// Publishes the host through the `mdns-sd` responder.
pub struct MdnsPublisher {
    daemon: ServiceDaemon,
    instance_name: String,
    host_name: String,
    registered: Mutex<Option<String>>,
}

impl MdnsPublisher {
    /// Starts the mDNS responder thread.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Mdns`] if the responder cannot open its sockets.
    pub fn new(instance_name: impl Into<String>, hostname: &str) -> Result<Self, DiscoveryError> {
        let daemon = ServiceDaemon::new().map_err(|e| DiscoveryError::Mdns(e.to_string()))?;
        Ok(Self {
            daemon,
            instance_name: instance_name.into(),
            host_name: service_host_name(hostname),
            registered: Mutex::new(None),
        })
    }

    fn take_registered(&self) -> Option<String> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn withdraw(&self, fullname: &str) -> Result<(), DiscoveryError> {
        self.daemon
            .unregister(fullname)
            .map_err(|e| DiscoveryError::Mdns(e.to_string()))?;
        debug!(service = %fullname, "mDNS service withdrawn");
        Ok(())
    }
}

#[async_trait]
impl DiscoveryPublisher for MdnsPublisher {
    async fn publish(&self, descriptor: &ConnectionDescriptor) -> Result<(), DiscoveryError> {
        if let Some(previous) = self.take_registered() {
            debug!("replacing previous mDNS registration");
            self.withdraw(&previous)?;
        }

        let service = ServiceInfo::new(
            SERVICE_TYPE,
            &self.instance_name,
            &self.host_name,
            descriptor.host.as_str(),
            descriptor.port,
            txt_properties(descriptor),
        )
        .map_err(|e| DiscoveryError::InvalidService(e.to_string()))?;
        let fullname = service.get_fullname().to_string();

        self.daemon
            .register(service)
            .map_err(|e| DiscoveryError::Mdns(e.to_string()))?;
        info!(service = %fullname, url = %descriptor.url(), "mDNS service published");

        *self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(fullname);
        Ok(())
    }

    async fn unpublish(&self) -> Result<(), DiscoveryError> {
        match self.take_registered() {
            Some(fullname) => self.withdraw(&fullname),
            None => Ok(()),
        }
    }

    async fn shutdown(&self) {
        if let Err(e) = self.daemon.shutdown() {
            warn!("mDNS responder did not shut down cleanly: {e}");
        }
    }
}

/// Advertises nothing.  Used with `--no-discovery`.
pub struct NoopPublisher;

#[async_trait]
impl DiscoveryPublisher for NoopPublisher {
    async fn publish(&self, descriptor: &ConnectionDescriptor) -> Result<(), DiscoveryError> {
        debug!(url = %descriptor.url(), "discovery disabled; not advertising");
        Ok(())
    }

    async fn unpublish(&self) -> Result<(), DiscoveryError> {
        Ok(())
    }
}

/// `myhost` and `myhost.local` both become `myhost.local.`.
fn service_host_name(hostname: &str) -> String {
    let base = hostname.trim_end_matches('.');
    let base = base.strip_suffix(".local").unwrap_or(base);
    format!("{base}.local.")
}

fn txt_properties(descriptor: &ConnectionDescriptor) -> HashMap<String, String> {
    HashMap::from([
        ("host".to_string(), descriptor.host.clone()),
        ("sessionId".to_string(), descriptor.session_id.clone()),
        ("protocol".to_string(), descriptor.protocol.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_name_gets_a_single_local_suffix() {
        assert_eq!(service_host_name("studio"), "studio.local.");
        assert_eq!(service_host_name("studio.local"), "studio.local.");
        assert_eq!(service_host_name("studio.local."), "studio.local.");
    }

    #[test]
    fn test_txt_record_fields() {
        let descriptor = ConnectionDescriptor::with_session("10.0.0.5", 4000, "abc");

        let txt = txt_properties(&descriptor);

        assert_eq!(txt.len(), 3);
        assert_eq!(txt["host"], "10.0.0.5");
        assert_eq!(txt["sessionId"], "abc");
        assert_eq!(txt["protocol"], "ws");
    }

    #[tokio::test]
    async fn test_noop_publisher_always_succeeds() {
        let publisher = NoopPublisher;
        let descriptor = ConnectionDescriptor::new("127.0.0.1", 1);

        assert!(publisher.publish(&descriptor).await.is_ok());
        assert!(publisher.unpublish().await.is_ok());
        publisher.shutdown().await;
    }
}
