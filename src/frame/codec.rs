use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::frame::errors::FrameError;
use crate::frame::payload::{self, Payload};
use crate::frame::payload_type::PayloadType;

/// Write a single frame for `p`, returning the total bytes written.
pub fn encode<W: Write>(p: &Payload, w: &mut W) -> Result<usize, FrameError> {
    p.write_to(w)
}

/// Read a single frame of any supported payload type.
///
/// The type byte is consumed exactly once here and dispatch goes straight to
/// the shared length+body read; an unknown type byte fails before anything
/// else is touched. A failed decode leaves the stream mid-frame, so the
/// caller should close it rather than try to resynchronize.
pub fn decode<R: Read>(r: &mut R) -> Result<Payload, FrameError> {
    let typ = PayloadType::from_u8(r.read_u8()?)?;
    payload::read_body(typ, r)
}
