//! Pairing code shown in the terminal.
//!
//! The QR payload is the connection descriptor as compact JSON, e.g.
//! `{"protocol":"ws","host":"192.168.1.20","port":51234,"sessionId":"..."}`.
//! The controller app scans it and connects directly.

use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode;
use remote_core::ConnectionDescriptor;
use tracing::info;

use crate::application::supervisor::{PairingCodeRenderer, RenderError};

/// Prints the descriptor as a QR code on stdout.
pub struct TerminalQrRenderer;

impl TerminalQrRenderer {
    /// Renders without printing, two modules per character cell.
    pub fn render_to_string(descriptor: &ConnectionDescriptor) -> Result<String, RenderError> {
        let payload = descriptor.to_json()?;
        let code = QrCode::new(payload.as_bytes()).map_err(|e| RenderError::Encode(e.to_string()))?;
        // Light modules drawn dark, for dark terminal backgrounds.
        Ok(code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .quiet_zone(true)
            .build())
    }
}

impl PairingCodeRenderer for TerminalQrRenderer {
    fn render(&self, descriptor: &ConnectionDescriptor) -> Result<(), RenderError> {
        let code = Self::render_to_string(descriptor)?;
        println!("\nScan this QR code with the controller app:\n{code}");
        info!(url = %descriptor.url(), session = %descriptor.session_id, "ready for pairing");
        Ok(())
    }
}

/// Logs the URL only.  Used with `--no-qr`.
pub struct UrlOnlyRenderer;

impl PairingCodeRenderer for UrlOnlyRenderer {
    fn render(&self, descriptor: &ConnectionDescriptor) -> Result<(), RenderError> {
        info!(url = %descriptor.url(), session = %descriptor.session_id, "ready for pairing");
        Ok(())
    }
}
