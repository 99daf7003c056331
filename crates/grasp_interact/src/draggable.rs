//! Draggable: a single-hand drag session started by a gesture in contact

use crate::context::{FrameContext, ObjectState};
use crate::event::InteractionEvent;
use grasp_core::{EntityId, HandSide, PerHand};
use grasp_gesture::{GestureEvent, GestureKind, GesturePhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraggableConfig {
    pub gesture: GestureKind,
}

impl Default for DraggableConfig {
    fn default() -> Self {
        Self {
            gesture: GestureKind::Pinch,
        }
    }
}

impl DraggableConfig {
    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = gesture;
        self
    }
}

/// A finished drag, handed to droppables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragRelease {
    pub dragged: EntityId,
    pub hand: HandSide,
    /// Increments per drag on the same object
    pub session: u64,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    hand: HandSide,
    session: u64,
}

/// Drag state machine. Contact only matters when the gesture starts.
///
/// Gestures are routed before contact edges, so a gesture that starts on the
/// frame the hand first touches the object does not start a drag; the hand
/// has to be in contact on an earlier frame.
pub struct Draggable {
    config: DraggableConfig,
    in_contact: PerHand<bool>,
    active: Option<DragSession>,
    sessions: u64,
}

impl Draggable {
    pub fn new(config: DraggableConfig) -> Self {
        Self {
            config,
            in_contact: PerHand::default(),
            active: None,
            sessions: 0,
        }
    }

    pub fn gesture(&self) -> GestureKind {
        self.config.gesture
    }

    /// Hand holding the drag
    pub fn drag_hand(&self) -> Option<HandSide> {
        self.active.map(|s| s.hand)
    }

    pub fn on_contact(&mut self, hand: HandSide, entering: bool) {
        self.in_contact[hand] = entering;
    }

    /// Returns the finished drag when `event` ends one
    pub fn on_gesture(
        &mut self,
        event: &GestureEvent,
        ctx: &mut FrameContext,
        state: &mut ObjectState,
    ) -> Option<DragRelease> {
        match event.phase {
            GesturePhase::Start => {
                self.try_start(event.hand, ctx, state);
                None
            }
            GesturePhase::Move => None,
            GesturePhase::End if self.drag_hand() == Some(event.hand) => self.end(ctx, state),
            GesturePhase::End => None,
        }
    }

    fn try_start(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        if self.active.is_some() || !self.in_contact[hand] {
            return;
        }
        if state.grabbed {
            log::debug!("drag on {} ignored: object is grabbed", ctx.object);
            return;
        }
        self.sessions += 1;
        self.active = Some(DragSession {
            hand,
            session: self.sessions,
        });
        state.dragged = true;
        log::debug!("drag-start {} hand={hand}", ctx.object);
        ctx.emit(InteractionEvent::DragStart { object: ctx.object, hand });
    }

    fn end(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) -> Option<DragRelease> {
        let session = self.active.take()?;
        state.dragged = false;
        log::debug!("drag-end {} hand={}", ctx.object, session.hand);
        ctx.emit(InteractionEvent::DragEnd {
            object: ctx.object,
            hand: session.hand,
        });
        Some(DragRelease {
            dragged: ctx.object,
            hand: session.hand,
            session: session.session,
        })
    }

    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) -> Option<DragRelease> {
        self.in_contact = PerHand::default();
        self.end(ctx, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryScene;
    use grasp_core::FrameTime;
    use grasp_event::EventDispatcher;
    use grasp_gesture::GestureRegistry;
    use grasp_math::Transform;

    fn pinch(phase: GesturePhase, hand: HandSide) -> GestureEvent {
        GestureEvent::new(GestureKind::Pinch, phase, hand, 0.02)
    }

    fn with_ctx<R>(scene: &mut MemoryScene, object: EntityId, events: &EventDispatcher<InteractionEvent>, f: impl FnOnce(&mut FrameContext) -> R) -> R {
        let registry = GestureRegistry::new();
        let mut ctx = FrameContext {
            object,
            time: FrameTime::default(),
            registry: &registry,
            scene,
            events,
        };
        f(&mut ctx)
    }

    #[test]
    fn test_drag_needs_contact_at_start_only() {
        let mut scene = MemoryScene::new();
        let object = scene.spawn(Transform::IDENTITY);
        let events = EventDispatcher::new();
        let mut state = ObjectState::default();
        let mut drag = Draggable::new(DraggableConfig::default());

        with_ctx(&mut scene, object, &events, |ctx| {
            assert_eq!(drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Right), ctx, &mut state), None);
        });
        assert!(!state.dragged);

        drag.on_contact(HandSide::Right, true);
        with_ctx(&mut scene, object, &events, |ctx| {
            drag.on_gesture(&pinch(GesturePhase::End, HandSide::Right), ctx, &mut state);
            drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Right), ctx, &mut state);
        });
        assert!(state.dragged);

        drag.on_contact(HandSide::Right, false);
        assert!(state.dragged);

        let release = with_ctx(&mut scene, object, &events, |ctx| {
            drag.on_gesture(&pinch(GesturePhase::End, HandSide::Right), ctx, &mut state)
        });
        assert_eq!(
            release,
            Some(DragRelease {
                dragged: object,
                hand: HandSide::Right,
                session: 1
            })
        );
        assert!(!state.dragged);
        let names: Vec<String> = events.drain().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["drag-start", "drag-end"]);
    }

    #[test]
    fn test_other_hand_end_ignored() {
        let mut scene = MemoryScene::new();
        let object = scene.spawn(Transform::IDENTITY);
        let events = EventDispatcher::new();
        let mut state = ObjectState::default();
        let mut drag = Draggable::new(DraggableConfig::default());
        drag.on_contact(HandSide::Left, true);
        drag.on_contact(HandSide::Right, true);

        with_ctx(&mut scene, object, &events, |ctx| {
            drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Left), ctx, &mut state);
            drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Right), ctx, &mut state);
            assert_eq!(drag.on_gesture(&pinch(GesturePhase::End, HandSide::Right), ctx, &mut state), None);
        });
        assert_eq!(drag.drag_hand(), Some(HandSide::Left));
    }

    #[test]
    fn test_no_drag_while_grabbed() {
        let mut scene = MemoryScene::new();
        let object = scene.spawn(Transform::IDENTITY);
        let events = EventDispatcher::new();
        let mut state = ObjectState {
            grabbed: true,
            ..Default::default()
        };
        let mut drag = Draggable::new(DraggableConfig::default());
        drag.on_contact(HandSide::Left, true);

        with_ctx(&mut scene, object, &events, |ctx| {
            drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Left), ctx, &mut state);
        });
        assert!(!state.dragged);
        assert!(!events.has_pending());
    }

    #[test]
    fn test_sessions_increment() {
        let mut scene = MemoryScene::new();
        let object = scene.spawn(Transform::IDENTITY);
        let events = EventDispatcher::new();
        let mut state = ObjectState::default();
        let mut drag = Draggable::new(DraggableConfig::default());
        drag.on_contact(HandSide::Left, true);

        let sessions: Vec<u64> = (0..2)
            .filter_map(|_| {
                with_ctx(&mut scene, object, &events, |ctx| {
                    drag.on_gesture(&pinch(GesturePhase::Start, HandSide::Left), ctx, &mut state);
                    drag.shutdown(ctx, &mut state)
                })
            })
            .map(|release| release.session)
            .collect();
        assert_eq!(sessions, vec![1, 2]);
    }
}
