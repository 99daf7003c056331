//! Grabbable: attach an object to the hand that grabs it
//!
//! A hand grabs when it is in contact and performing the bound gesture,
//! whichever of the two arrives last. The first grabber owns the
//! [`Attachment`]; every tick the object's world pose is recomputed from
//! that hand's collider frame. With `reserve_second_hand` set a second hand
//! is left alone so it can escalate to a stretch.
//!
//! # Release rules
//!
//! - Gesture end releases that hand, unless the object is being stretched
//! - Lost contact releases that hand when the object rides on it (plain
//!   follow mode). In `invert` or `suppress_y` mode the object is meant to
//!   leave the hand box, so only the gesture ends the grab
//! - When the owning hand releases and other grabbers remain, the
//!   attachment moves to the oldest of them (`GrabTransfer`)

use crate::attachment::Attachment;
use crate::context::{FrameContext, ObjectState};
use crate::event::InteractionEvent;
use grasp_core::{HandSide, PerHand};
use grasp_gesture::{GestureEvent, GestureKind, GesturePhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabbableConfig {
    pub gesture: GestureKind,
    /// `None` means unlimited
    pub max_grabbers: Option<usize>,
    /// Mirror hand displacement around the grab point
    pub invert: bool,
    /// Lock world Y to its value at first grab
    pub suppress_y: bool,
    /// Ignore a second hand while one holds, leaving it for stretch
    pub reserve_second_hand: bool,
}

impl Default for GrabbableConfig {
    fn default() -> Self {
        Self {
            gesture: GestureKind::Pinch,
            max_grabbers: Some(1),
            invert: false,
            suppress_y: false,
            reserve_second_hand: true,
        }
    }
}

impl GrabbableConfig {
    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_max_grabbers(mut self, max: Option<usize>) -> Self {
        self.max_grabbers = max;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_suppress_y(mut self, suppress_y: bool) -> Self {
        self.suppress_y = suppress_y;
        self
    }

    pub fn with_reserve_second_hand(mut self, reserve: bool) -> Self {
        self.reserve_second_hand = reserve;
        self
    }

    fn rides_on_hand(&self) -> bool {
        !self.invert && !self.suppress_y
    }
}

pub struct Grabbable {
    config: GrabbableConfig,
    /// Oldest first; the attachment belongs to one of them
    grabbers: Vec<HandSide>,
    attachment: Option<Attachment>,
    original_y: Option<f32>,
    in_contact: PerHand<bool>,
    gesturing: PerHand<bool>,
}

impl Grabbable {
    pub fn new(config: GrabbableConfig) -> Self {
        if config.max_grabbers == Some(0) {
            log::warn!("grabbable with max_grabbers = 0 will never grab");
        }
        Self {
            config,
            grabbers: Vec::new(),
            attachment: None,
            original_y: None,
            in_contact: PerHand::default(),
            gesturing: PerHand::default(),
        }
    }

    pub fn config(&self) -> &GrabbableConfig {
        &self.config
    }

    pub fn gesture(&self) -> GestureKind {
        self.config.gesture
    }

    pub fn grabbers(&self) -> &[HandSide] {
        &self.grabbers
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Hand driving the object
    pub fn owner_hand(&self) -> Option<HandSide> {
        self.attachment.map(|a| a.hand)
    }

    pub fn on_gesture(&mut self, event: &GestureEvent, ctx: &mut FrameContext, state: &mut ObjectState) {
        let hand = event.hand;
        match event.phase {
            GesturePhase::Start => {
                self.gesturing[hand] = true;
                if self.in_contact[hand] {
                    self.try_grab(hand, ctx, state);
                }
            }
            GesturePhase::Move => self.gesturing[hand] = true,
            GesturePhase::End => {
                self.gesturing[hand] = false;
                if !state.stretched {
                    self.release(hand, ctx, state);
                }
            }
        }
    }

    pub fn on_contact(&mut self, hand: HandSide, entering: bool, ctx: &mut FrameContext, state: &mut ObjectState) {
        self.in_contact[hand] = entering;
        if entering && self.gesturing[hand] {
            self.try_grab(hand, ctx, state);
        }
    }

    fn try_grab(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        if self.grabbers.contains(&hand) {
            return;
        }
        if !self.grabbers.is_empty() && self.config.reserve_second_hand {
            log::trace!("{} already held, {hand} hand reserved for stretch", ctx.object);
            return;
        }
        if state.dragged {
            log::debug!("grab on {} ignored: object is dragged", ctx.object);
            return;
        }
        if let Some(max) = self.config.max_grabbers {
            if max == 0 {
                return;
            }
            while self.grabbers.len() >= max {
                let oldest = self.grabbers[0];
                self.release(oldest, ctx, state);
            }
        }

        if self.attachment.is_none() {
            let Some(hand_pose) = ctx.hand_pose(self.config.gesture, hand) else {
                return;
            };
            let Some(world) = ctx.object_world() else {
                log::warn!("cannot grab {}: entity has no transform", ctx.object);
                return;
            };
            if self.config.suppress_y && self.original_y.is_none() {
                self.original_y = Some(world.position.y);
            }
            let parent = ctx.scene.parent(ctx.object);
            self.attachment = Some(Attachment::capture(ctx.object, hand, parent, &hand_pose, &world));
            state.grabbed = true;
        }

        self.grabbers.push(hand);
        log::debug!("grab-start {} hand={hand} grabbers={}", ctx.object, self.grabbers.len());
        ctx.emit(InteractionEvent::GrabStart {
            object: ctx.object,
            hand,
            grabbers: self.grabbers.len(),
        });
    }

    fn release(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        let Some(index) = self.grabbers.iter().position(|h| *h == hand) else {
            return;
        };
        self.grabbers.remove(index);
        let owned = self.owner_hand() == Some(hand);

        if self.grabbers.is_empty() {
            if let Some(attachment) = self.attachment.take() {
                if let Err(err) = attachment.release(ctx.scene) {
                    log::warn!("release of {} failed: {err}", ctx.object);
                }
            }
            self.original_y = None;
            state.grabbed = false;
        }

        log::debug!("grab-end {} hand={hand} grabbers={}", ctx.object, self.grabbers.len());
        ctx.emit(InteractionEvent::GrabEnd {
            object: ctx.object,
            hand,
            grabbers: self.grabbers.len(),
        });

        if owned {
            if let Some(next) = self.grabbers.first().copied() {
                if self.rebind(next, ctx).is_none() {
                    log::warn!("{} lost its hand frame during transfer to {next}", ctx.object);
                }
            }
        }
    }

    /// Re-anchor the attachment on `hand` from the object's current pose.
    /// Returns the previous owner.
    fn rebind(&mut self, hand: HandSide, ctx: &mut FrameContext) -> Option<HandSide> {
        let attachment = self.attachment?;
        let hand_pose = ctx.hand_pose(self.config.gesture, hand)?;
        let world = ctx.object_world()?;
        self.attachment = Some(attachment.rebind(hand, &hand_pose, &world));
        if attachment.hand != hand {
            log::debug!("grab-transfer {} {} -> {hand}", ctx.object, attachment.hand);
            ctx.emit(InteractionEvent::GrabTransfer {
                object: ctx.object,
                from: attachment.hand,
                to: hand,
            });
        }
        Some(attachment.hand)
    }

    /// Continue the grab on `hand` after a stretch.
    ///
    /// The attachment is re-anchored even when `hand` already owns it, so
    /// the scale the stretch left behind is kept.
    pub fn transfer_to(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        if self.attachment.is_none() {
            if self.in_contact[hand] && self.gesturing[hand] {
                self.try_grab(hand, ctx, state);
            }
            return;
        }
        if self.rebind(hand, ctx).is_none() {
            return;
        }
        self.grabbers.retain(|h| *h != hand);
        self.grabbers.insert(0, hand);
        if let Some(max) = self.config.max_grabbers {
            let dropped = self.grabbers.split_off(max.max(1).min(self.grabbers.len()));
            for other in dropped {
                log::debug!("grab-end {} hand={other} (superseded)", ctx.object);
                ctx.emit(InteractionEvent::GrabEnd {
                    object: ctx.object,
                    hand: other,
                    grabbers: self.grabbers.len(),
                });
            }
        }
    }

    /// Drop grabbers that no longer qualify and move the object
    pub fn tick(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        if state.stretched {
            return;
        }

        let rides = self.config.rides_on_hand();
        let stale: Vec<HandSide> = self
            .grabbers
            .iter()
            .copied()
            .filter(|h| !self.gesturing[*h] || (rides && !self.in_contact[*h]))
            .collect();
        for hand in stale {
            self.release(hand, ctx, state);
        }

        let Some(attachment) = self.attachment else {
            return;
        };
        let Some(hand_pose) = ctx.hand_pose(self.config.gesture, attachment.hand) else {
            return;
        };
        let mut world = if self.config.invert {
            attachment.mirror(&hand_pose)
        } else {
            attachment.follow(&hand_pose)
        };
        if let Some(y) = self.original_y {
            world.position.y = y;
        }
        ctx.place_object(world);
    }

    /// Release every grabber, newest first
    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        while let Some(hand) = self.grabbers.last().copied() {
            self.release(hand, ctx, state);
        }
        self.in_contact = PerHand::default();
        self.gesturing = PerHand::default();
    }
}
