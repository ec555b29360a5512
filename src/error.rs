//! Error type for wave parsing operations

/// Error type for parse and load operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaveError {
    /// Empty input buffer or zero stream size
    #[error("Invalid arguments: empty input")]
    InvalidArguments,
    /// Outer RIFF/WAVE tags do not match
    #[error("Not a RIFF/WAVE file")]
    BadRiffHeader,
    /// No `fmt ` chunk located
    #[error("No format chunk found")]
    MissingFormat,
    /// Format tag or bit depth outside the accepted set
    #[error("Unsupported format: tag {tag:#06x}, {bits} bits per sample")]
    UnsupportedFormat { tag: u16, bits: u16 },
    /// A located chunk's declared payload extends past the input
    #[error("Chunk extends past end of input")]
    TruncatedChunk,
    /// The stream returned fewer bytes than requested
    #[error("Short read: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },
    /// The allocator returned no memory
    #[error("Allocation of {0} bytes failed")]
    AllocationFailed(usize),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for parse and load operations
pub type WaveResult<T> = Result<T, WaveError>;

impl From<std::io::Error> for WaveError {
    fn from(err: std::io::Error) -> Self {
        WaveError::Io(err.to_string())
    }
}
