/// Maximum allowed body size for a single frame (to avoid OOM).
pub const MAX_PAYLOAD_LEN: usize = 10 * 1024 * 1024; // 10 MiB

/// Bytes occupied by the frame header: payload type (1) + body length (4).
pub const HEADER_LEN: usize = 5;
