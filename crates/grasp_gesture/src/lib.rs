//! # grasp_gesture - Hand Gesture Classification
//!
//! Turns per-frame hand joint poses into discrete gesture events.
//!
//! # Features
//!
//! - Pinch (thumb/index distance) and point (index extended, other fingers
//!   curled) classifiers, each with a hysteresis band so noisy tracking
//!   does not flicker
//! - Per-hand filtering (`left`, `right`, `any`)
//! - A hand collider box per classifier and hand, updated every frame
//! - Tracking loss always closes an active gesture with a forced `End`
//! - [`GestureRegistry`] so interaction components look up the source they
//!   were bound to instead of searching a global scene
//!
//! # Example
//!
//! ```ignore
//! use grasp_gesture::prelude::*;
//!
//! let mut registry = GestureRegistry::new();
//! registry.register(Box::new(PinchClassifier::new(PinchConfig::default())))?;
//!
//! let events = registry.update(&frame);
//! for event in events {
//!     println!("{} {}", event.hand, event.name());
//! }
//! ```

pub mod classifier;
pub mod error;
pub mod event;
pub mod joint;
pub mod pinch;
pub mod point;
pub mod registry;
pub mod source;

pub mod prelude {
    pub use crate::classifier::{GestureClassifier, HandState};
    pub use crate::error::{GestureError, Result};
    pub use crate::event::{GestureEvent, GestureKind, GesturePhase};
    pub use crate::joint::{HandJoint, JointPose};
    pub use crate::pinch::{PinchClassifier, PinchConfig};
    pub use crate::point::{PointClassifier, PointConfig};
    pub use crate::registry::GestureRegistry;
    pub use crate::source::{JointFrame, JointFrameSource};
}

pub use prelude::*;
