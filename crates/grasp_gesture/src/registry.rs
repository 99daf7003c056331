//! Gesture source registry
//!
//! Interaction components are bound to a [`GestureKind`] when they are
//! built. The registry owns at most one classifier per kind and is handed
//! to whoever runs the frame, so nothing searches the scene for a detector.

use crate::classifier::GestureClassifier;
use crate::error::{GestureError, Result};
use crate::event::{GestureEvent, GestureKind};
use crate::source::JointFrameSource;
use grasp_collide::Obb;
use grasp_core::HandSide;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct GestureRegistry {
    sources: BTreeMap<GestureKind, Box<dyn GestureClassifier>>,
}

impl GestureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier; one per kind
    pub fn register(&mut self, classifier: Box<dyn GestureClassifier>) -> Result<()> {
        let kind = classifier.kind();
        if self.sources.contains_key(&kind) {
            return Err(GestureError::DuplicateSource(kind));
        }
        log::info!("registered {kind} gesture source");
        self.sources.insert(kind, classifier);
        Ok(())
    }

    /// Remove a classifier, returning it
    pub fn unregister(&mut self, kind: GestureKind) -> Option<Box<dyn GestureClassifier>> {
        self.sources.remove(&kind)
    }

    pub fn contains(&self, kind: GestureKind) -> bool {
        self.sources.contains_key(&kind)
    }

    pub fn get(&self, kind: GestureKind) -> Option<&dyn GestureClassifier> {
        self.sources.get(&kind).map(|c| c.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = GestureKind> + '_ {
        self.sources.keys().copied()
    }

    /// Classify one frame with every source, in kind order
    pub fn update(&mut self, frame: &dyn JointFrameSource) -> Vec<GestureEvent> {
        self.sources
            .values_mut()
            .flat_map(|classifier| classifier.update(frame))
            .collect()
    }

    /// Hand collider box published by the `kind` source
    pub fn hand_box(&self, kind: GestureKind, hand: HandSide) -> Option<&Obb> {
        self.sources.get(&kind).and_then(|c| c.hand_box(hand))
    }

    /// Is `hand` currently holding the `kind` gesture?
    pub fn is_active(&self, kind: GestureKind, hand: HandSide) -> bool {
        self.sources.get(&kind).map_or(false, |c| c.is_active(hand))
    }

    /// Every hand box any source publishes for `hand`
    pub fn hand_boxes(&self, hand: HandSide) -> impl Iterator<Item = &Obb> + '_ {
        self.sources.values().filter_map(move |c| c.hand_box(hand))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
