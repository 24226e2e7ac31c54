//! Discrete-event simulation engine for packet traffic on a d-dimensional
//! k-ary torus interconnection network.

pub mod engine;
pub mod node;
pub mod packet;
pub mod queue;
pub mod rng;
pub mod routing;
pub mod stats;
pub mod topology;

pub use engine::Simulator;
pub use packet::Packet;
pub use rng::{exponential_interval, Rng64, StdRng64};
pub use stats::{Report, Stats};
