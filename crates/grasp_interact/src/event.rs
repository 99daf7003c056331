//! Interaction events
//!
//! Every state machine reports through one typed enum. Variants carry the
//! object they concern and the hands involved; [`InteractionEvent::name`]
//! gives the kebab-case name hosts use for logging or bridging.

use crate::context::ContactProbe;
use grasp_core::{EntityId, HandSide};
use grasp_gesture::{GestureEvent, GestureKind};
use grasp_math::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Raw classifier output, republished for subscribers
    Gesture(GestureEvent),

    ContactStart {
        object: EntityId,
        hand: HandSide,
        probe: ContactProbe,
    },
    ContactEnd {
        object: EntityId,
        hand: HandSide,
        probe: ContactProbe,
    },

    ClickStart {
        object: EntityId,
        hand: HandSide,
        /// Active clickers after this one joined
        clickers: usize,
        gesture: GestureKind,
    },
    ClickEnd {
        object: EntityId,
        hand: HandSide,
        /// Clickers still active
        clickers: usize,
        duration_ms: f64,
        gesture: GestureKind,
    },

    DragStart {
        object: EntityId,
        hand: HandSide,
    },
    DragEnd {
        object: EntityId,
        hand: HandSide,
    },
    DragOverStart {
        droppable: EntityId,
        dragged: EntityId,
    },
    DragOverEnd {
        droppable: EntityId,
    },
    /// An accepted draggable was released over a droppable
    DragDrop {
        droppable: EntityId,
        dropped: EntityId,
        hand: HandSide,
    },
    /// A draggable the droppable does not accept was released over it
    DropRejected {
        droppable: EntityId,
        dropped: EntityId,
        hand: HandSide,
    },

    GrabStart {
        object: EntityId,
        hand: HandSide,
        grabbers: usize,
    },
    GrabEnd {
        object: EntityId,
        hand: HandSide,
        grabbers: usize,
    },
    /// The attachment frame moved to another hand without detaching
    GrabTransfer {
        object: EntityId,
        from: HandSide,
        to: HandSide,
    },

    StretchStart {
        object: EntityId,
        hands: [HandSide; 2],
        initial_scale: Vec3,
    },
    Stretch {
        object: EntityId,
        scale: Vec3,
        factor: f32,
        distance: f32,
        hands: [HandSide; 2],
    },
    StretchEnd {
        object: EntityId,
        final_scale: Vec3,
        /// Final scale divided by the scale at stretch start
        scale_change: Vec3,
    },
    /// Stretch ended with one hand still holding; grab continues on it
    StretchHandoff {
        object: EntityId,
        hand: HandSide,
    },

    HoverStart {
        object: EntityId,
        hand: HandSide,
        hands: usize,
    },
    HoverEnd {
        object: EntityId,
        hand: HandSide,
        hands: usize,
    },
    Hovering {
        object: EntityId,
        hands: usize,
    },
}

impl InteractionEvent {
    pub fn name(&self) -> String {
        let name = match self {
            InteractionEvent::Gesture(event) => return event.name(),
            InteractionEvent::ContactStart { .. } => "contact-start",
            InteractionEvent::ContactEnd { .. } => "contact-end",
            InteractionEvent::ClickStart { .. } => "click-start",
            InteractionEvent::ClickEnd { .. } => "click-end",
            InteractionEvent::DragStart { .. } => "drag-start",
            InteractionEvent::DragEnd { .. } => "drag-end",
            InteractionEvent::DragOverStart { .. } => "dragover-start",
            InteractionEvent::DragOverEnd { .. } => "dragover-end",
            InteractionEvent::DragDrop { .. } => "drag-drop",
            InteractionEvent::DropRejected { .. } => "drop-rejected",
            InteractionEvent::GrabStart { .. } => "grab-start",
            InteractionEvent::GrabEnd { .. } => "grab-end",
            InteractionEvent::GrabTransfer { .. } => "grab-transfer",
            InteractionEvent::StretchStart { .. } => "stretch-start",
            InteractionEvent::Stretch { .. } => "stretch",
            InteractionEvent::StretchEnd { .. } => "stretch-end",
            InteractionEvent::StretchHandoff { .. } => "stretch-handoff",
            InteractionEvent::HoverStart { .. } => "hover-start",
            InteractionEvent::HoverEnd { .. } => "hover-end",
            InteractionEvent::Hovering { .. } => "hovering",
        };
        name.to_string()
    }

    /// Entity the event is about; droppable events report the droppable
    pub fn object(&self) -> Option<EntityId> {
        match self {
            InteractionEvent::Gesture(_) => None,
            InteractionEvent::ContactStart { object, .. }
            | InteractionEvent::ContactEnd { object, .. }
            | InteractionEvent::ClickStart { object, .. }
            | InteractionEvent::ClickEnd { object, .. }
            | InteractionEvent::DragStart { object, .. }
            | InteractionEvent::DragEnd { object, .. }
            | InteractionEvent::GrabStart { object, .. }
            | InteractionEvent::GrabEnd { object, .. }
            | InteractionEvent::GrabTransfer { object, .. }
            | InteractionEvent::StretchStart { object, .. }
            | InteractionEvent::Stretch { object, .. }
            | InteractionEvent::StretchEnd { object, .. }
            | InteractionEvent::StretchHandoff { object, .. }
            | InteractionEvent::HoverStart { object, .. }
            | InteractionEvent::HoverEnd { object, .. }
            | InteractionEvent::Hovering { object, .. } => Some(*object),
            InteractionEvent::DragOverStart { droppable, .. }
            | InteractionEvent::DragOverEnd { droppable }
            | InteractionEvent::DragDrop { droppable, .. }
            | InteractionEvent::DropRejected { droppable, .. } => Some(*droppable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grasp_gesture::GesturePhase;

    #[test]
    fn test_names() {
        let object = EntityId::new(3, 0);
        let event = InteractionEvent::ClickStart {
            object,
            hand: HandSide::Left,
            clickers: 1,
            gesture: GestureKind::Point,
        };
        assert_eq!(event.name(), "click-start");
        assert_eq!(event.object(), Some(object));

        let gesture = GestureEvent::new(GestureKind::Pinch, GesturePhase::End, HandSide::Right, 0.04);
        assert_eq!(InteractionEvent::Gesture(gesture).name(), gesture.name());
        assert_eq!(InteractionEvent::Gesture(gesture).object(), None);
    }

    #[test]
    fn test_drop_events_report_droppable() {
        let zone = EntityId::new(1, 0);
        let event = InteractionEvent::DropRejected {
            droppable: zone,
            dropped: EntityId::new(2, 0),
            hand: HandSide::Right,
        };
        assert_eq!(event.object(), Some(zone));
    }
}
