//! # grasp_collide - Box Collision for Hand Interaction
//!
//! Exact overlap tests between oriented boxes and the bookkeeping that turns
//! per-frame overlap booleans into enter/exit edges.
//!
//! # Architecture
//!
//! ```text
//!   Scene world transform ──► Collider::sync ──► Obb ─┐
//!                                                      ├─► sat::intersects ──► bool
//!   Hand joints ─────────────► hand box ────────► Obb ─┘                        │
//!                                                                               ▼
//!                                                       ContactTracker::update ──► ContactEdge
//! ```
//!
//! Two collider variants share the [`Collider`] trait: [`BoxCollider`] keeps
//! a fixed size, [`ScaledBoxCollider`] multiplies its base size by the
//! entity's world scale every sync. Both answer with the same 15-axis SAT.

pub mod collider;
pub mod contact;
pub mod obb;
pub mod sat;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::collider::{BoxCollider, Collider, ColliderDesc, ColliderKind, Geometry, ScaledBoxCollider};
    pub use crate::contact::{ContactEdge, ContactTracker, Contactor};
    pub use crate::obb::Obb;
    pub use crate::sat::{bounding_spheres_overlap, intersects, separating_axis};
}

pub use prelude::*;
