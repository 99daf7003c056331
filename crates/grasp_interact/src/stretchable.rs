//! Stretchable: two-hand rescale of a grabbed object
//!
//! Runs strictly inside a grab. While exactly two hands are in contact and
//! gesturing, the object's scale tracks the ratio between the current and
//! initial distance of the two hand boxes, clamped per component. Position
//! and orientation stay at the pose the stretch started from.

use crate::context::{FrameContext, ObjectState};
use crate::event::InteractionEvent;
use grasp_core::{HandSide, PerHand};
use grasp_gesture::{GestureEvent, GestureKind, GesturePhase};
use grasp_math::{consts::EPSILON, Transform, Vec3};
use serde::{Deserialize, Serialize};

const HANDS: [HandSide; 2] = HandSide::ALL;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StretchableConfig {
    /// Must match the grabbable's gesture
    pub gesture: GestureKind,
    /// Shrink when the hands move apart
    pub invert: bool,
    pub min_scale: f32,
    pub max_scale: f32,
    /// `Stretch` events fire once the factor leaves `1 ± emit_threshold`
    pub emit_threshold: f32,
}

impl Default for StretchableConfig {
    fn default() -> Self {
        Self {
            gesture: GestureKind::Pinch,
            invert: false,
            min_scale: 0.1,
            max_scale: 10.0,
            emit_threshold: 0.01,
        }
    }
}

impl StretchableConfig {
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_scale_range(mut self, min_scale: f32, max_scale: f32) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = gesture;
        self
    }

    /// Scale for a given stretch factor
    pub fn scaled(&self, initial: Vec3, factor: f32) -> Vec3 {
        (initial * factor).clamp(Vec3::splat(self.min_scale), Vec3::splat(self.max_scale))
    }
}

#[derive(Debug, Clone, Copy)]
struct StretchSession {
    initial_distance: f32,
    initial_scale: Vec3,
    /// World pose at stretch start; only its scale changes
    anchor: Transform,
}

pub struct Stretchable {
    config: StretchableConfig,
    in_contact: PerHand<bool>,
    gesturing: PerHand<bool>,
    session: Option<StretchSession>,
}

impl Stretchable {
    pub fn new(config: StretchableConfig) -> Self {
        if config.min_scale > config.max_scale || config.min_scale <= 0.0 {
            log::warn!(
                "stretchable scale range [{}, {}] is invalid; scale will pin to the bounds",
                config.min_scale,
                config.max_scale
            );
        }
        Self {
            config,
            in_contact: PerHand::default(),
            gesturing: PerHand::default(),
            session: None,
        }
    }

    pub fn config(&self) -> &StretchableConfig {
        &self.config
    }

    pub fn gesture(&self) -> GestureKind {
        self.config.gesture
    }

    pub fn is_stretching(&self) -> bool {
        self.session.is_some()
    }

    pub fn on_gesture(&mut self, event: &GestureEvent) {
        self.gesturing[event.hand] = !matches!(event.phase, GesturePhase::End);
    }

    pub fn on_contact(&mut self, hand: HandSide, entering: bool) {
        self.in_contact[hand] = entering;
    }

    /// Hands in contact, gesturing, and with a live hand box
    fn qualifying(&self, ctx: &FrameContext) -> PerHand<bool> {
        PerHand::from_fn(|hand| {
            self.in_contact[hand]
                && self.gesturing[hand]
                && ctx.registry.hand_box(self.config.gesture, hand).is_some()
        })
    }

    fn hand_distance(&self, ctx: &FrameContext) -> Option<f32> {
        let left = ctx.registry.hand_box(self.config.gesture, HandSide::Left)?;
        let right = ctx.registry.hand_box(self.config.gesture, HandSide::Right)?;
        Some(left.center.distance(right.center))
    }

    /// Start or stop the stretch. Returns the hand the grab should continue
    /// on when a stretch ends with one hand still holding.
    pub fn evaluate(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) -> Option<HandSide> {
        let qualifying = self.qualifying(ctx);
        let count = qualifying.count();

        if self.session.is_none() {
            if state.grabbed && count == 2 {
                self.start(ctx, state);
            }
            return None;
        }

        if state.grabbed && count == 2 {
            return None;
        }
        self.end(ctx, state);
        if !state.grabbed || count != 1 {
            return None;
        }
        let hand = qualifying.sides().next()?;
        log::debug!("stretch-handoff {} -> {hand}", ctx.object);
        ctx.emit(InteractionEvent::StretchHandoff { object: ctx.object, hand });
        Some(hand)
    }

    fn start(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        let Some(distance) = self.hand_distance(ctx) else {
            return;
        };
        if distance <= EPSILON {
            log::trace!("hands coincide, stretch on {} deferred", ctx.object);
            return;
        }
        let Some(anchor) = ctx.object_world() else {
            return;
        };
        self.session = Some(StretchSession {
            initial_distance: distance,
            initial_scale: anchor.scale,
            anchor,
        });
        state.stretched = true;
        log::debug!("stretch-start {} distance={distance:.3}", ctx.object);
        ctx.emit(InteractionEvent::StretchStart {
            object: ctx.object,
            hands: HANDS,
            initial_scale: anchor.scale,
        });
    }

    fn end(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        let Some(session) = self.session.take() else {
            return;
        };
        state.stretched = false;
        let final_scale = ctx.object_world().map_or(session.initial_scale, |world| world.scale);
        log::debug!("stretch-end {} scale={final_scale:?}", ctx.object);
        ctx.emit(InteractionEvent::StretchEnd {
            object: ctx.object,
            final_scale,
            scale_change: final_scale.div_elem(session.initial_scale),
        });
    }

    /// Rescale the object around the anchored pose
    pub fn apply(&mut self, ctx: &mut FrameContext) {
        let Some(session) = self.session else {
            return;
        };
        let Some(distance) = self.hand_distance(ctx) else {
            return;
        };
        let mut factor = distance / session.initial_distance;
        if self.config.invert {
            if factor <= EPSILON {
                return;
            }
            factor = 1.0 / factor;
        }
        let scale = self.config.scaled(session.initial_scale, factor);
        ctx.place_object(session.anchor.with_scale(scale));

        if (factor - 1.0).abs() > self.config.emit_threshold {
            ctx.emit(InteractionEvent::Stretch {
                object: ctx.object,
                scale,
                factor,
                distance,
                hands: HANDS,
            });
        }
    }

    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        self.end(ctx, state);
        self.in_contact = PerHand::default();
        self.gesturing = PerHand::default();
    }
}
