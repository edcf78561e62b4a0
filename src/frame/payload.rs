use std::fmt;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;

use crate::frame::constants::{HEADER_LEN, MAX_PAYLOAD_LEN};
use crate::frame::errors::{FrameError, PayloadError};
use crate::frame::payload_type::PayloadType;

/// One logical value carried by a frame.
///
/// `Opaque` is a raw byte sequence with no interpretation; `Text` is UTF-8
/// text whose textual representation is the content itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Opaque(Bytes),
    Text(String),
}

impl Payload {
    pub fn opaque(data: impl Into<Bytes>) -> Self {
        Payload::Opaque(data.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Payload::Text(s.into())
    }

    /// The type byte this payload carries on the wire.
    pub fn payload_type(&self) -> PayloadType {
        match self {
            Payload::Opaque(_) => PayloadType::Opaque,
            Payload::Text(_) => PayloadType::Text,
        }
    }

    /// Raw body bytes, without the frame header.
    pub fn bytes(&self) -> &[u8] {
        match self {
            Payload::Opaque(b) => b,
            Payload::Text(s) => s.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    /// Write one full frame: type byte, big-endian body length, body.
    ///
    /// Returns the total number of bytes written. Partial writes are not
    /// retried here; the first IO error is the outcome of the call.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, FrameError> {
        let body = self.bytes();
        if body.len() > MAX_PAYLOAD_LEN {
            return Err(PayloadError::TooLarge {
                len: body.len(),
                max: MAX_PAYLOAD_LEN,
            }
            .into());
        }

        w.write_u8(self.payload_type().as_u8())?;
        w.write_u32::<BigEndian>(body.len() as u32)?;
        w.write_all(body)?;
        w.flush()?;
        Ok(HEADER_LEN + body.len())
    }

    /// Read one frame whose type byte must match `expected`.
    ///
    /// Standalone counterpart of [`crate::frame::decode`]: it consumes and
    /// validates the type byte itself instead of leaving dispatch to the
    /// caller.
    pub fn read_expecting<R: Read>(r: &mut R, expected: PayloadType) -> Result<Payload, FrameError> {
        let actual = r.read_u8()?;
        if actual != expected.as_u8() {
            return Err(PayloadError::TypeMismatch {
                expected: expected.as_u8(),
                actual,
            }
            .into());
        }
        read_body(expected, r)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Opaque(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            Payload::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Read length + body for an already-consumed type byte.
///
/// The size cap is checked before a single body byte is read. The body read
/// loops until the declared length is fully consumed or the stream fails, so
/// a short body surfaces as an error, never as a truncated payload.
pub(crate) fn read_body<R: Read>(typ: PayloadType, r: &mut R) -> Result<Payload, FrameError> {
    let len = r.read_u32::<BigEndian>()? as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(PayloadError::TooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        }
        .into());
    }

    let mut body = vec![0u8; len];
    r.read_exact(&mut body)?;

    match typ {
        PayloadType::Opaque => Ok(Payload::Opaque(Bytes::from(body))),
        PayloadType::Text => {
            let s = String::from_utf8(body).map_err(|_| PayloadError::InvalidUtf8)?;
            Ok(Payload::Text(s))
        }
    }
}
