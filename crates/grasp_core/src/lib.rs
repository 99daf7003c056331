//! # grasp_core - Shared Primitives
//!
//! Small value types every other grasp crate speaks in:
//! - **Entities**: `EntityId`, an opaque handle into the host scene
//! - **Hands**: `HandSide`, `HandFilter` and the two-slot `PerHand<T>` map
//! - **Time**: `FrameTime`, the clock value handed to each tick
//!
//! Nothing here knows about gestures, colliders or scenes.

pub mod hand;
pub mod id;
pub mod time;

pub use hand::*;
pub use id::*;
pub use time::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::hand::{HandFilter, HandSide, PerHand};
    pub use crate::id::{EntityId, EntityIdGenerator};
    pub use crate::time::FrameTime;
}
