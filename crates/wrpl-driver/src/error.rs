/// Errors that can occur while rendering decoded packets.
///
/// Rendering itself cannot fail; only writing the text out can.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to write rendered output: {0}")]
    Io(#[from] std::io::Error),
}
