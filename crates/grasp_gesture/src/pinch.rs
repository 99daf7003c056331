//! Pinch classifier
//!
//! Thumb tip and index tip closer than `start_distance` start a pinch; the
//! pinch holds until they separate to `end_distance` or beyond. Between the
//! two thresholds nothing changes.

use crate::classifier::{GestureClassifier, HandState};
use crate::error::{GestureError, Result};
use crate::event::{GestureEvent, GestureKind, GesturePhase};
use crate::joint::HandJoint;
use crate::source::{lookup_joints, JointFrameSource};
use grasp_collide::Obb;
use grasp_core::{HandFilter, HandSide, PerHand};
use grasp_math::Vec3;
use serde::{Deserialize, Serialize};

/// Pinch classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinchConfig {
    pub hand: HandFilter,
    /// Distance (m) at or below which a pinch starts
    pub start_distance: f32,
    /// Distance (m) at or above which a pinch ends
    pub end_distance: f32,
    /// Emit `Move` every frame while pinching
    pub emit_each_frame: bool,
    /// Full size of the hand collider box
    pub collider_size: [f32; 3],
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            hand: HandFilter::Any,
            start_distance: 0.025,
            end_distance: 0.035,
            emit_each_frame: false,
            collider_size: [0.05, 0.05, 0.05],
        }
    }
}

impl PinchConfig {
    pub fn with_hand(mut self, hand: HandFilter) -> Self {
        self.hand = hand;
        self
    }

    pub fn with_thresholds(mut self, start_distance: f32, end_distance: f32) -> Self {
        self.start_distance = start_distance;
        self.end_distance = end_distance;
        self
    }

    pub fn with_emit_each_frame(mut self, emit: bool) -> Self {
        self.emit_each_frame = emit;
        self
    }

    pub fn with_collider_size(mut self, size: Vec3) -> Self {
        self.collider_size = size.to_array();
        self
    }

    /// The hysteresis band must be non-empty
    pub fn validate(&self) -> Result<()> {
        let valid = self.start_distance.is_finite()
            && self.end_distance.is_finite()
            && self.start_distance < self.end_distance;
        if valid {
            Ok(())
        } else {
            Err(GestureError::InvalidThresholds {
                start: self.start_distance,
                end: self.end_distance,
            })
        }
    }
}

/// Thumb/index pinch detector for both hands
pub struct PinchClassifier {
    config: PinchConfig,
    state: PerHand<HandState>,
}

impl PinchClassifier {
    /// Create a classifier. An invalid configuration is reported but kept.
    pub fn new(config: PinchConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("pinch classifier: {err}");
        }
        log::info!(
            "pinch classifier ready: hand={:?} start={} end={}",
            config.hand,
            config.start_distance,
            config.end_distance
        );
        Self {
            config,
            state: PerHand::default(),
        }
    }

    /// Create a classifier, rejecting an invalid configuration
    pub fn try_new(config: PinchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PinchConfig {
        &self.config
    }

    fn transition(&self, hand: HandSide, distance: f32) -> Option<GesturePhase> {
        let pinching = self.state[hand].active;
        if !pinching && distance <= self.config.start_distance {
            Some(GesturePhase::Start)
        } else if pinching && distance >= self.config.end_distance {
            Some(GesturePhase::End)
        } else if pinching && self.config.emit_each_frame {
            Some(GesturePhase::Move)
        } else {
            None
        }
    }
}

impl GestureClassifier for PinchClassifier {
    fn kind(&self) -> GestureKind {
        GestureKind::Pinch
    }

    fn filter(&self) -> HandFilter {
        self.config.hand
    }

    fn hand_state(&self, hand: HandSide) -> &HandState {
        &self.state[hand]
    }

    fn classify_hand(&mut self, hand: HandSide, frame: &dyn JointFrameSource) -> Option<GestureEvent> {
        let [thumb, index] = lookup_joints(frame, hand, [HandJoint::ThumbTip, HandJoint::IndexTip])?;
        let distance = thumb.position.distance(index.position);
        let phase = self.transition(hand, distance);

        let size = Vec3::from_array(self.config.collider_size);
        let state = &mut self.state[hand];
        state.last_distance = Some(distance);
        state.collider = Some(Obb::new(
            thumb.position.lerp(index.position, 0.5),
            size * 0.5,
            index.orientation,
        ));

        let phase = phase?;
        match phase {
            GesturePhase::Start => state.active = true,
            GesturePhase::End => state.active = false,
            GesturePhase::Move => {}
        }
        log::debug!("pinch{} hand={hand} dist={distance:.4}", phase.as_str());
        Some(GestureEvent::new(GestureKind::Pinch, phase, hand, distance))
    }

    fn hand_lost(&mut self, hand: HandSide) -> Option<GestureEvent> {
        self.state[hand].lose(GestureKind::Pinch, hand)
    }
}
