/// Fatal errors: conditions that end the whole decode run.
///
/// Framing problems and per-packet deserialization failures are not
/// here. They stop the run cleanly ([`StopReason`](crate::StopReason))
/// or ride along on the packet record
/// ([`Diagnostic`](crate::Diagnostic), `DeserializeError`).
///
/// ```text
///   DecodeError
///   ├── DecompressFailed  ← inflater rejected the compressed stream
///   └── Io                ← the compressed source failed to read
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The DEFLATE/zlib stream is corrupt. Not retried.
    #[error("inflate error at compressed offset ~{compressed_offset:#x}: {message}")]
    DecompressFailed {
        message: String,
        compressed_offset: u64,
    },

    /// Reading from the compressed source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
