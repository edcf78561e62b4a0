//! Frame codec.
//!
//! Wire format, big-endian:
//! ----------- Header -----------------
//! Payload Type (1B)
//! Body Length (4B)
//! ----------- Body -------------------
//! Payload bytes (10 MiB max)

pub mod codec;
pub mod constants;
pub mod errors;
pub mod payload;
pub mod payload_type;

pub use codec::{decode, encode};
pub use constants::MAX_PAYLOAD_LEN;
pub use errors::{FrameError, PayloadError};
pub use payload::Payload;
pub use payload_type::PayloadType;
