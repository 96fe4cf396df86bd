use std::io::Write;

use wrpl_decoder::{DecodedReplay, PacketRecord, RunSummary, StopReason};

use crate::config::{DriverConfig, OutputMode};
use crate::error::DriverError;
use crate::render_log::LogRenderer;
use crate::render_minimal::MinimalRenderer;

/// Renders decoded packets as human-readable text.
///
/// Rendering is incremental: callers streaming a replay call
/// [`render_packet`](Self::render_packet) for each record as it is
/// decoded, then [`render_footer`](Self::render_footer) once decoding
/// stops. [`render`](Self::render) does both for an already-collected
/// [`DecodedReplay`].
///
/// ```text
/// PacketStream ──record──▶ render_packet() ──▶ out
///      │                         │
///   stop_reason            DriverConfig
///      └────────────────▶ render_footer() ──▶ out
/// ```
pub trait ReplayDriver {
    /// Write one record, unless `config.include_types` filters it out.
    /// Returns whether anything was written.
    ///
    /// # Errors
    ///
    /// [`DriverError::Io`] if writing to `out` fails.
    fn render_packet(
        &self,
        out: &mut dyn Write,
        record: &PacketRecord,
        config: &DriverConfig,
    ) -> Result<bool, DriverError>;

    /// Write the end-of-run footer.
    ///
    /// # Errors
    ///
    /// [`DriverError::Io`] if writing to `out` fails.
    fn render_footer(
        &self,
        out: &mut dyn Write,
        summary: &RunSummary,
        reason: &StopReason,
        config: &DriverConfig,
    ) -> Result<(), DriverError>;

    /// Render a whole decoded replay into a string.
    ///
    /// # Errors
    ///
    /// Only if an implementation's writes fail; writing into memory
    /// does not.
    fn render(&self, replay: &DecodedReplay, config: &DriverConfig) -> Result<String, DriverError> {
        let mut out = Vec::new();
        for record in &replay.packets {
            self.render_packet(&mut out, record, config)?;
        }
        self.render_footer(&mut out, &replay.summary, &replay.stop_reason, config)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// Dispatches to [`LogRenderer`] or [`MinimalRenderer`] by
/// [`DriverConfig::mode`].
pub struct DefaultDriver;

impl ReplayDriver for DefaultDriver {
    fn render_packet(
        &self,
        out: &mut dyn Write,
        record: &PacketRecord,
        config: &DriverConfig,
    ) -> Result<bool, DriverError> {
        if !config.includes(record.packet_type()) {
            return Ok(false);
        }
        match config.mode {
            OutputMode::Log => LogRenderer::render_packet(out, record, config.max_hex_bytes)?,
            OutputMode::Minimal => MinimalRenderer::render_packet(out, record)?,
        }
        Ok(true)
    }

    fn render_footer(
        &self,
        out: &mut dyn Write,
        summary: &RunSummary,
        reason: &StopReason,
        config: &DriverConfig,
    ) -> Result<(), DriverError> {
        match config.mode {
            OutputMode::Log => LogRenderer::render_footer(out, summary, reason)?,
            OutputMode::Minimal => MinimalRenderer::render_footer(out, summary, reason)?,
        }
        Ok(())
    }
}
