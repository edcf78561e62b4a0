use std::fmt;
use std::io;

/// Payload-level errors (tag/format issues, size limits).
#[derive(Debug)]
pub enum PayloadError {
    UnknownType(u8),
    TypeMismatch { expected: u8, actual: u8 },
    TooLarge { len: usize, max: usize },
    InvalidUtf8,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PayloadError::*;
        match self {
            UnknownType(t) => write!(f, "unknown payload type: {t}"),
            TypeMismatch { expected, actual } => {
                write!(f, "payload type mismatch: expected {expected}, got {actual}")
            }
            TooLarge { len, max } => write!(f, "payload of {len} bytes exceeds maximum {max}"),
            InvalidUtf8 => write!(f, "text payload is not valid UTF-8"),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Frame-level error wrapper: IO vs payload format.
#[derive(Debug)]
pub enum FrameError {
    Io(io::Error),
    Payload(PayloadError),
}

impl FrameError {
    /// True when the underlying cause is the stream ending, which a caller
    /// reading at a frame boundary treats as a normal disconnect.
    pub fn is_eof(&self) -> bool {
        matches!(self, FrameError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(e) => write!(f, "frame IO error: {e}"),
            FrameError::Payload(e) => write!(f, "bad frame: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            FrameError::Payload(e) => Some(e),
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<PayloadError> for FrameError {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}
