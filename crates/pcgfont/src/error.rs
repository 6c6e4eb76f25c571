use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcgError {
    #[error("character data must be {expected} bytes, got {actual}", expected = crate::CHAR_SIZE)]
    CharacterLength { actual: usize },
    #[error("store snapshot must be {expected} bytes, got {actual}", expected = crate::STORE_SIZE)]
    SnapshotLength { actual: usize },
    #[error("monochrome bitmap must be 8 bytes, got {actual}")]
    BitmapLength { actual: usize },
    #[error("invalid character range {start}..={end}")]
    InvalidRange { start: usize, end: usize },
    #[error("{count} characters starting at {start} exceed the 256 character bank")]
    Overflow { start: usize, count: usize },
    #[error("file too small ({len} bytes), no complete character")]
    FileTooSmall { len: usize },
    #[error("malformed program: {0}")]
    MalformedProgram(String),
    #[error("image decode error: {0}")]
    ImageDecode(String),
    #[error("image encode error: {0}")]
    ImageEncode(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error classes callers can branch on without matching every variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong payload length or numeric range; raised before any mutation.
    Validation,
    /// Input does not have the expected file structure.
    Format,
    /// The underlying raster could not be decoded or encoded.
    Decode,
    Io,
}

impl PcgError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PcgError::CharacterLength { .. }
            | PcgError::SnapshotLength { .. }
            | PcgError::BitmapLength { .. }
            | PcgError::InvalidRange { .. }
            | PcgError::Overflow { .. } => ErrorKind::Validation,
            PcgError::FileTooSmall { .. } | PcgError::MalformedProgram(_) => ErrorKind::Format,
            PcgError::ImageDecode(_) | PcgError::ImageEncode(_) => ErrorKind::Decode,
            PcgError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, PcgError>;
