//! Mission definitions
//!
//! Each mission is a [`Plan`](crate::mission::Plan): its tunables, its
//! state tag and the transition table built from them.
//!
//! - [`gate`]: gate traversal (`plan20`)
//! - [`obstacle`]: obstacle-gated advance (`plan24`)

pub mod gate;
pub mod obstacle;

pub use gate::{GatePlan, GateState};
pub use obstacle::{ObstaclePlan, ObstacleState};
