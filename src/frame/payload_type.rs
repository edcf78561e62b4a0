// ---- Payload type byte ----------------------------------------------------

use crate::frame::errors::PayloadError;

/// Closed set of payload variants a frame can carry on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PayloadType {
    Opaque = 0x01,
    Text = 0x02,
}

impl PayloadType {
    pub fn from_u8(v: u8) -> Result<PayloadType, PayloadError> {
        match v {
            0x01 => Ok(PayloadType::Opaque),
            0x02 => Ok(PayloadType::Text),
            other => Err(PayloadError::UnknownType(other)),
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
