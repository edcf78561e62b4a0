use std::fmt;
use std::io;

use crate::cancel::CancelReason;

/// Why an outbound dial failed.
#[derive(Debug)]
pub enum DialError {
    /// The cancellation token fired before a connection was established.
    Canceled,
    /// The token's deadline elapsed before a connection was established.
    TimedOut,
    /// The underlying connect failed (refused, unreachable, ...).
    Io(io::Error),
}

impl DialError {
    pub(crate) fn from_reason(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Canceled => DialError::Canceled,
            CancelReason::DeadlineExceeded => DialError::TimedOut,
        }
    }

    /// True for the gave-up outcomes, as opposed to the network refusing.
    pub fn is_canceled(&self) -> bool {
        matches!(self, DialError::Canceled | DialError::TimedOut)
    }
}

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialError::Canceled => write!(f, "dial canceled"),
            DialError::TimedOut => write!(f, "dial timed out"),
            DialError::Io(e) => write!(f, "connect error: {e}"),
        }
    }
}

impl std::error::Error for DialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DialError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DialError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
