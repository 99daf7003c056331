//! # grasp_interact - Hand Interaction State Machines
//!
//! Combines gesture events and hand/object contacts into object-level
//! interactions:
//!
//! - **Clickable**: contact plus gesture, FIFO eviction past `max_clickers`
//! - **Draggable / Droppable**: single-hand drag sessions and drop zones
//!   with selector-based acceptance
//! - **Grabbable**: the object follows the grabbing hand through an
//!   [`Attachment`], with invert and Y-lock modes
//! - **Stretchable**: two-hand non-uniform rescale nested inside a grab,
//!   handing control back to the remaining hand when it ends
//! - **Hoverable**: contact only
//!
//! The scene graph stays outside: everything reads and writes poses through
//! the [`Scene`] trait. Events come out of an [`EventDispatcher`] the
//! [`InteractionSystem`] owns.
//!
//! # Example
//!
//! ```ignore
//! use grasp_interact::prelude::*;
//!
//! let mut registry = GestureRegistry::new();
//! registry.register(Box::new(PinchClassifier::new(PinchConfig::default())))?;
//! let mut system = InteractionSystem::new(registry);
//!
//! let cube = InteractableObject::new(cube_id, ColliderDesc::cuboid(0.2, 0.2, 0.2))
//!     .with_grabbable(GrabbableConfig::default())
//!     .with_stretchable(StretchableConfig::default());
//! system.register_object(cube, &scene)?;
//!
//! // every frame
//! for event in system.tick(&joint_frame, &mut scene, time) {
//!     log::info!("{}", event.name());
//! }
//! ```
//!
//! [`EventDispatcher`]: grasp_event::EventDispatcher

pub mod attachment;
pub mod clickable;
pub mod context;
pub mod draggable;
pub mod droppable;
pub mod error;
pub mod event;
pub mod grabbable;
pub mod hoverable;
pub mod object;
pub mod scene;
pub mod stretchable;
pub mod system;

pub mod prelude {
    pub use crate::attachment::Attachment;
    pub use crate::clickable::{Clickable, ClickableConfig};
    pub use crate::context::{ContactProbe, FrameContext, ObjectState};
    pub use crate::draggable::{DragRelease, Draggable, DraggableConfig};
    pub use crate::droppable::{AcceptPattern, Droppable, DroppableConfig};
    pub use crate::error::{InteractError, Result};
    pub use crate::event::InteractionEvent;
    pub use crate::grabbable::{Grabbable, GrabbableConfig};
    pub use crate::hoverable::{Hoverable, HoverableConfig};
    pub use crate::object::InteractableObject;
    pub use crate::scene::{MemoryScene, Scene};
    pub use crate::stretchable::{Stretchable, StretchableConfig};
    pub use crate::system::InteractionSystem;

    pub use grasp_collide::{ColliderDesc, ColliderKind, Geometry};
    pub use grasp_core::{EntityId, FrameTime, HandFilter, HandSide};
    pub use grasp_gesture::{
        GestureEvent, GestureKind, GesturePhase, GestureRegistry, JointFrame, PinchClassifier, PinchConfig,
        PointClassifier, PointConfig,
    };
}

pub use prelude::*;
