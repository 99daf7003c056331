//! Point classifier
//!
//! Pointing means the index tip is far from the wrist while the middle,
//! ring and pinky tips are curled in close to it. The thumb is ignored,
//! except that a thumb/index pinch cancels pointing. All distances are
//! measured from the wrist, which stands in for the palm.

use crate::classifier::{GestureClassifier, HandState};
use crate::error::{GestureError, Result};
use crate::event::{GestureEvent, GestureKind, GesturePhase};
use crate::joint::HandJoint;
use crate::source::{lookup_joints, JointFrameSource};
use grasp_collide::Obb;
use grasp_core::{HandFilter, HandSide, PerHand};
use grasp_math::Vec3;
use serde::{Deserialize, Serialize};

/// Point classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    pub hand: HandFilter,
    /// Minimum index-tip distance from the wrist to count as extended
    pub index_extended_threshold: f32,
    /// Maximum distance for middle/ring/pinky tips to count as curled
    pub other_fingers_threshold: f32,
    /// Index distance under which an active point may release
    pub release_threshold: f32,
    /// Thumb/index distance at or under which pointing is cancelled
    pub pinch_cancel_threshold: Option<f32>,
    /// Emit `Move` every frame while pointing
    pub emit_each_frame: bool,
    /// Log every finger distance each frame (trace level)
    pub debug_distances: bool,
    /// Full size of the fingertip collider box
    pub collider_size: [f32; 3],
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            hand: HandFilter::Any,
            index_extended_threshold: 0.06,
            other_fingers_threshold: 0.08,
            release_threshold: 0.10,
            pinch_cancel_threshold: Some(0.04),
            emit_each_frame: false,
            debug_distances: false,
            collider_size: [0.05, 0.05, 0.05],
        }
    }
}

impl PointConfig {
    pub fn with_hand(mut self, hand: HandFilter) -> Self {
        self.hand = hand;
        self
    }

    pub fn with_release_threshold(mut self, release_threshold: f32) -> Self {
        self.release_threshold = release_threshold;
        self
    }

    pub fn with_pinch_cancel(mut self, threshold: Option<f32>) -> Self {
        self.pinch_cancel_threshold = threshold;
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

    /// Every threshold must be a positive finite distance
    pub fn validate(&self) -> Result<()> {
        let mut thresholds = vec![
            ("index_extended_threshold", self.index_extended_threshold),
            ("other_fingers_threshold", self.other_fingers_threshold),
            ("release_threshold", self.release_threshold),
        ];
        if let Some(cancel) = self.pinch_cancel_threshold {
            thresholds.push(("pinch_cancel_threshold", cancel));
        }
        for (name, value) in thresholds {
            if !(value.is_finite() && value > 0.0) {
                return Err(GestureError::InvalidPointThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// Finger distances for one hand in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct FingerReading {
    index: f32,
    middle: f32,
    ring: f32,
    pinky: f32,
    pinch: f32,
}

/// Index-finger pointing detector for both hands
pub struct PointClassifier {
    config: PointConfig,
    state: PerHand<HandState>,
}

impl PointClassifier {
    /// Create a classifier. An invalid configuration is reported but kept.
    pub fn new(config: PointConfig) -> Self {
        if let Err(err) = config.validate() {
            log::warn!("point classifier: {err}");
        }
        log::info!(
            "point classifier ready: index>={} others<={} release<{} pinch-cancel={:?}",
            config.index_extended_threshold,
            config.other_fingers_threshold,
            config.release_threshold,
            config.pinch_cancel_threshold
        );
        Self {
            config,
            state: PerHand::default(),
        }
    }

    pub fn try_new(config: PointConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &PointConfig {
        &self.config
    }

    /// Pointing direction (wrist to index tip) from the last classified frame
    pub fn direction(&self, hand: HandSide) -> Option<Vec3> {
        self.state[hand].direction
    }

    fn others_closed(&self, r: &FingerReading) -> bool {
        let limit = self.config.other_fingers_threshold;
        r.middle <= limit && r.ring <= limit && r.pinky <= limit
    }

    fn pinching(&self, r: &FingerReading) -> bool {
        self.config.pinch_cancel_threshold.map_or(false, |limit| r.pinch <= limit)
    }

    fn transition(&self, hand: HandSide, r: &FingerReading) -> Option<GesturePhase> {
        let pointing = self.state[hand].active;
        let index_extended = r.index >= self.config.index_extended_threshold;
        let others_closed = self.others_closed(r);
        let pinching = self.pinching(r);
        let engaged = index_extended && others_closed && !pinching;

        if !pointing && engaged {
            Some(GesturePhase::Start)
        } else if pointing && !engaged {
            // A curling index only releases once under the release threshold
            let index_released = r.index < self.config.release_threshold;
            if index_released || !others_closed || pinching {
                Some(GesturePhase::End)
            } else {
                None
            }
        } else if pointing && self.config.emit_each_frame {
            Some(GesturePhase::Move)
        } else {
            None
        }
    }
}

impl GestureClassifier for PointClassifier {
    fn kind(&self) -> GestureKind {
        GestureKind::Point
    }

    fn filter(&self) -> HandFilter {
        self.config.hand
    }

    fn hand_state(&self, hand: HandSide) -> &HandState {
        &self.state[hand]
    }

    fn classify_hand(&mut self, hand: HandSide, frame: &dyn JointFrameSource) -> Option<GestureEvent> {
        let [wrist, thumb, index, middle, ring, pinky] = lookup_joints(
            frame,
            hand,
            [
                HandJoint::Wrist,
                HandJoint::ThumbTip,
                HandJoint::IndexTip,
                HandJoint::MiddleTip,
                HandJoint::RingTip,
                HandJoint::PinkyTip,
            ],
        )?;
        let palm = wrist.position;
        let reading = FingerReading {
            index: index.position.distance(palm),
            middle: middle.position.distance(palm),
            ring: ring.position.distance(palm),
            pinky: pinky.position.distance(palm),
            pinch: index.position.distance(thumb.position),
        };
        if self.config.debug_distances {
            log::trace!(
                "point {hand}: index={:.3} middle={:.3} ring={:.3} pinky={:.3} pinch={:.3}",
                reading.index,
                reading.middle,
                reading.ring,
                reading.pinky,
                reading.pinch
            );
        }

        let phase = self.transition(hand, &reading);
        let direction = (index.position - palm).normalize();
        let size = Vec3::from_array(self.config.collider_size);

        let state = &mut self.state[hand];
        state.last_distance = Some(reading.index);
        state.direction = Some(direction);
        state.collider = Some(Obb::new(index.position, size * 0.5, index.orientation));

        let phase = phase?;
        match phase {
            GesturePhase::Start => state.active = true,
            GesturePhase::End => state.active = false,
            GesturePhase::Move => {}
        }
        log::debug!(
            "point{} hand={hand} index={:.4} dir=({:.2}, {:.2}, {:.2})",
            phase.as_str(),
            reading.index,
            direction.x,
            direction.y,
            direction.z
        );
        Some(GestureEvent::new(GestureKind::Point, phase, hand, reading.index).with_direction(direction))
    }

    fn hand_lost(&mut self, hand: HandSide) -> Option<GestureEvent> {
        self.state[hand].lose(GestureKind::Point, hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JointFrame;
    use approx::assert_abs_diff_eq;
    use grasp_math::Quat;

    /// Hand with the wrist at the origin and fingertips along +Z/-Z
    struct Pose {
        index: f32,
        others: f32,
        thumb_to_index: f32,
    }

    impl Pose {
        fn pointing() -> Self {
            Self { index: 0.15, others: 0.05, thumb_to_index: 0.08 }
        }

        fn frame(&self, hand: HandSide) -> JointFrame {
            let index_tip = Vec3::new(0.0, 0.0, -self.index);
            JointFrame::new()
                .with_joint_at(hand, HandJoint::Wrist, Vec3::ZERO)
                .with_joint_at(hand, HandJoint::IndexTip, index_tip)
                .with_joint_at(hand, HandJoint::ThumbTip, index_tip + Vec3::new(self.thumb_to_index, 0.0, 0.0))
                .with_joint_at(hand, HandJoint::MiddleTip, Vec3::new(0.0, -self.others, 0.0))
                .with_joint_at(hand, HandJoint::RingTip, Vec3::new(0.01, -self.others, 0.0))
                .with_joint_at(hand, HandJoint::PinkyTip, Vec3::new(0.02, -self.others, 0.0))
        }
    }

    fn run(classifier: &mut PointClassifier, pose: &Pose) -> Vec<GestureEvent> {
        classifier.update(&pose.frame(HandSide::Right))
    }

    #[test]
    fn test_point_start_with_direction() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        let events = run(&mut classifier, &Pose::pointing());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "pointstart");
        let dir = events[0].direction.unwrap_or(Vec3::ZERO);
        assert_abs_diff_eq!(dir.z, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(events[0].distance, 0.15, epsilon = 1e-6);
    }

    #[test]
    fn test_open_hand_is_not_pointing() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        let open = Pose { others: 0.15, ..Pose::pointing() };
        assert!(run(&mut classifier, &open).is_empty());
    }

    #[test]
    fn test_pinch_cancels_start_and_releases() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        let pinching = Pose { thumb_to_index: 0.02, ..Pose::pointing() };
        assert!(run(&mut classifier, &pinching).is_empty());

        run(&mut classifier, &Pose::pointing());
        let events = run(&mut classifier, &pinching);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_end());
    }

    #[test]
    fn test_pinch_cancel_can_be_disabled() {
        let mut classifier = PointClassifier::new(PointConfig::default().with_pinch_cancel(None));
        let pinching = Pose { thumb_to_index: 0.02, ..Pose::pointing() };
        assert_eq!(run(&mut classifier, &pinching).len(), 1);
    }

    #[test]
    fn test_other_finger_opening_releases() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        run(&mut classifier, &Pose::pointing());
        let events = run(&mut classifier, &Pose { others: 0.09, ..Pose::pointing() });
        assert!(events.len() == 1 && events[0].is_end());
        assert!(!classifier.is_active(HandSide::Right));
    }

    #[test]
    fn test_index_curl_releases() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        run(&mut classifier, &Pose::pointing());
        let events = run(&mut classifier, &Pose { index: 0.05, ..Pose::pointing() });
        assert!(events.len() == 1 && events[0].is_end());
    }

    #[test]
    fn test_release_threshold_below_extension_holds_band() {
        let config = PointConfig::default().with_release_threshold(0.04);
        let mut classifier = PointClassifier::new(config);
        run(&mut classifier, &Pose::pointing());

        // Under the extension threshold but above release: still pointing
        assert!(run(&mut classifier, &Pose { index: 0.05, ..Pose::pointing() }).is_empty());
        assert!(classifier.is_active(HandSide::Right));

        let events = run(&mut classifier, &Pose { index: 0.03, ..Pose::pointing() });
        assert!(events.len() == 1 && events[0].is_end());
    }

    #[test]
    fn test_collider_at_index_tip_with_tip_orientation() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        let tip_rotation = Quat::from_rotation_x(0.5);
        let frame = Pose::pointing().frame(HandSide::Left).with_joint(
            HandSide::Left,
            HandJoint::IndexTip,
            crate::joint::JointPose::new(Vec3::new(0.0, 0.0, -0.15), tip_rotation),
        );
        classifier.update(&frame);

        let hand_box = classifier.hand_box(HandSide::Left).copied().unwrap_or_default();
        assert!((hand_box.center - Vec3::new(0.0, 0.0, -0.15)).length() < 1e-6);
        assert!(hand_box.orientation.same_rotation(tip_rotation, 1e-6));
        assert_abs_diff_eq!(hand_box.half_extents.x, 0.025, epsilon = 1e-6);
    }

    #[test]
    fn test_tracking_loss_ends_point() {
        let mut classifier = PointClassifier::new(PointConfig::default());
        run(&mut classifier, &Pose::pointing());
        let events = classifier.update(&JointFrame::new());
        assert_eq!(events.len(), 1);
        assert!(events[0].tracking_lost && events[0].direction.is_some());
        assert!(classifier.direction(HandSide::Right).is_none());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = PointConfig { other_fingers_threshold: -1.0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(GestureError::InvalidPointThreshold { name: "other_fingers_threshold", .. })
        ));
    }
}
