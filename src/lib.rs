//! framelink is a minimal framed transport layer for byte streams.
//!
//! It provides four building blocks:
//! - a length-prefixed, type-tagged frame codec for heterogeneous payloads,
//! - a duplex relay that pumps bytes between two established streams,
//! - a cancellation-aware TCP dialer,
//! - a keepalive pinger with a runtime-adjustable interval.
//!
//! The `relay_server` binary wires these together into a small TCP relay
//! daemon. The library itself opens no listening sockets: acceptors, clocks
//! and streams are supplied by the caller.

/// Cooperative cancellation token observed by dial and keepalive waits.
pub mod cancel;
/// Handles configuration loading for the relay binary.
pub mod config;
/// Cancelable outbound TCP connection establishment.
pub mod dial;
/// Frame codec: payload type byte, big-endian length, body.
pub mod frame;
/// Periodic keepalive marker emission.
pub mod keepalive;
/// Logging utilities for the crate.
pub mod log;
/// Byte relay between two streams, one- or two-directional.
pub mod relay;
