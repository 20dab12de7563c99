//! Wire format for the local stats agent: one `name:value|type[|#tags]`
//! line per UDP datagram.

pub mod emit;
pub mod encode;

pub use emit::{UdpEmitter, emit};
pub use encode::{Metric, MetricKind, MetricValue, WireError, decode, encode};
