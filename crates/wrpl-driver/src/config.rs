use wrpl_types::PacketType;

/// Default number of payload bytes shown in a hex preview.
pub const DEFAULT_MAX_HEX_BYTES: usize = 64;

/// Configuration for rendering decoded packets as text.
///
/// ```text
/// ┌───────────────┬───────────────────────────────────────────────────┐
/// │ Field         │ Purpose                                           │
/// ├───────────────┼───────────────────────────────────────────────────┤
/// │ mode          │ Selects the Log or Minimal output format          │
/// │ max_hex_bytes │ Payload bytes shown before the preview says "..." │
/// │ include_types │ Optional allowlist; other packets are skipped     │
/// └───────────────┴───────────────────────────────────────────────────┘
/// ```
///
/// When `include_types` is `Some`, packets without a header (zero-length
/// packets) are skipped as well, since they have no type to match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    pub mode: OutputMode,
    pub max_hex_bytes: usize,
    pub include_types: Option<Vec<PacketType>>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Log,
            max_hex_bytes: DEFAULT_MAX_HEX_BYTES,
            include_types: None,
        }
    }
}

impl DriverConfig {
    /// True when `packet_type` passes the `include_types` filter.
    #[must_use]
    pub fn includes(&self, packet_type: Option<PacketType>) -> bool {
        match (&self.include_types, packet_type) {
            (None, _) => true,
            (Some(types), Some(t)) => types.contains(&t),
            (Some(_), None) => false,
        }
    }
}

/// Output formats.
///
/// ```text
/// ┌─────────┬──────────────────────────────────────────────────────────┐
/// │ Mode    │ Shape                                                    │
/// ├─────────┼──────────────────────────────────────────────────────────┤
/// │ Log     │ multi-line report per packet: offsets, prefix, header,   │
/// │         │ MPI ids, chat fields, hex preview; footer with totals    │
/// ├─────────┼──────────────────────────────────────────────────────────┤
/// │ Minimal │ one line per packet, one summary line at the end         │
/// └─────────┴──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Log,
    Minimal,
}
