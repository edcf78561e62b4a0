pub mod relay;
pub mod split;

pub use relay::{relay, relay_duplex};
pub use split::SplitDuplex;
