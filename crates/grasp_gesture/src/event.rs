//! Gesture events

use core::fmt;
use grasp_core::HandSide;
use grasp_math::Vec3;
use serde::{Deserialize, Serialize};

/// Which classifier produced an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    #[default]
    Pinch,
    Point,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::Pinch => "pinch",
            GestureKind::Point => "point",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

impl GesturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GesturePhase::Start => "start",
            GesturePhase::Move => "move",
            GesturePhase::End => "end",
        }
    }
}

/// A gesture transition (or continuous report) for one hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    pub hand: HandSide,
    /// Classifier metric: thumb/index distance for pinch, index/wrist for point
    pub distance: f32,
    /// Pointing direction (point only)
    pub direction: Option<Vec3>,
    /// Set on the `End` synthesized when tracking was lost
    pub tracking_lost: bool,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, phase: GesturePhase, hand: HandSide, distance: f32) -> Self {
        Self {
            kind,
            phase,
            hand,
            distance,
            direction: None,
            tracking_lost: false,
        }
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Conventional event name, e.g. `pinchstart` or `pointend`
    pub fn name(&self) -> String {
        format!("{}{}", self.kind.as_str(), self.phase.as_str())
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.phase == GesturePhase::Start
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.phase == GesturePhase::End
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let event = GestureEvent::new(GestureKind::Point, GesturePhase::End, HandSide::Left, 0.05);
        assert_eq!(event.name(), "pointend");
        assert!(event.is_end());
    }

    #[test]
    fn test_kind_from_json() {
        let kind: GestureKind = serde_json::from_str("\"point\"").unwrap();
        assert_eq!(kind, GestureKind::Point);
    }
}
