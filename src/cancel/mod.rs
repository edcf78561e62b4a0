pub mod token;

pub use token::{CancelReason, CancelToken};
