pub mod pinger;
pub mod worker;

pub use pinger::{DEFAULT_PING_INTERVAL, PING_MARKER, run_pinger};
pub use worker::KeepaliveWorker;
