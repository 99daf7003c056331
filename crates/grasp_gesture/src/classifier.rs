//! Classifier trait and per-hand state

use crate::event::{GestureEvent, GestureKind, GesturePhase};
use crate::source::JointFrameSource;
use grasp_collide::Obb;
use grasp_core::{HandFilter, HandSide};
use grasp_math::Vec3;

/// Per-hand classifier state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandState {
    /// Gesture currently held
    pub active: bool,
    /// Metric from the last frame the hand was classified
    pub last_distance: Option<f32>,
    /// Pointing direction (point classifier only)
    pub direction: Option<Vec3>,
    /// Hand collider box; `None` while the hand is untracked
    pub collider: Option<Obb>,
}

impl HandState {
    /// Drop tracking data; returns the forced `End` if a gesture was held
    pub fn lose(&mut self, kind: GestureKind, hand: HandSide) -> Option<GestureEvent> {
        self.collider = None;
        let was_active = std::mem::replace(&mut self.active, false);
        let direction = self.direction.take();
        if !was_active {
            return None;
        }
        log::debug!("{kind} tracking lost on {hand} hand, forcing end");
        let mut event = GestureEvent::new(kind, GesturePhase::End, hand, self.last_distance.unwrap_or(0.0));
        event.direction = direction;
        event.tracking_lost = true;
        Some(event)
    }
}

/// A per-frame gesture classifier for both hands
pub trait GestureClassifier: Send + Sync {
    fn kind(&self) -> GestureKind;

    /// Hands this classifier looks at
    fn filter(&self) -> HandFilter;

    fn hand_state(&self, hand: HandSide) -> &HandState;

    /// Classify one tracked hand. Missing joints leave the state untouched.
    fn classify_hand(&mut self, hand: HandSide, frame: &dyn JointFrameSource) -> Option<GestureEvent>;

    /// Tracking for `hand` is gone this frame
    fn hand_lost(&mut self, hand: HandSide) -> Option<GestureEvent>;

    /// Run one frame for every filtered hand
    fn update(&mut self, frame: &dyn JointFrameSource) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        for hand in self.filter().sides() {
            let event = if frame.is_tracked(hand) {
                self.classify_hand(hand, frame)
            } else {
                self.hand_lost(hand)
            };
            events.extend(event);
        }
        events
    }

    fn is_active(&self, hand: HandSide) -> bool {
        self.hand_state(hand).active
    }

    fn hand_box(&self, hand: HandSide) -> Option<&Obb> {
        self.hand_state(hand).collider.as_ref()
    }
}
