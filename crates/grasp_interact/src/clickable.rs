//! Clickable: contact plus gesture, without moving the object

use crate::context::{FrameContext, ObjectState};
use crate::event::InteractionEvent;
use grasp_core::{HandSide, PerHand};
use grasp_gesture::{GestureEvent, GestureKind, GesturePhase};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickableConfig {
    pub gesture: GestureKind,
    /// `None` means unlimited
    pub max_clickers: Option<usize>,
}

impl Default for ClickableConfig {
    fn default() -> Self {
        Self {
            gesture: GestureKind::Point,
            max_clickers: None,
        }
    }
}

impl ClickableConfig {
    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_max_clickers(mut self, max: usize) -> Self {
        self.max_clickers = Some(max);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Clicker {
    hand: HandSide,
    started_ms: f64,
}

/// Click state machine; clickers are kept oldest first
pub struct Clickable {
    config: ClickableConfig,
    clickers: Vec<Clicker>,
    in_contact: PerHand<bool>,
    gesturing: PerHand<bool>,
}

impl Clickable {
    pub fn new(config: ClickableConfig) -> Self {
        if config.max_clickers == Some(0) {
            log::warn!("clickable with max_clickers = 0 will never click");
        }
        Self {
            config,
            clickers: Vec::new(),
            in_contact: PerHand::default(),
            gesturing: PerHand::default(),
        }
    }

    pub fn config(&self) -> &ClickableConfig {
        &self.config
    }

    pub fn gesture(&self) -> GestureKind {
        self.config.gesture
    }

    /// Active clicking hands, oldest first
    pub fn clickers(&self) -> Vec<HandSide> {
        self.clickers.iter().map(|c| c.hand).collect()
    }

    pub fn is_clicking(&self, hand: HandSide) -> bool {
        self.clickers.iter().any(|c| c.hand == hand)
    }

    pub fn on_gesture(&mut self, event: &GestureEvent, ctx: &mut FrameContext, state: &mut ObjectState) {
        let hand = event.hand;
        match event.phase {
            GesturePhase::Start => {
                self.gesturing[hand] = true;
                if self.in_contact[hand] {
                    self.start_click(hand, ctx, state);
                }
            }
            GesturePhase::Move => self.gesturing[hand] = true,
            GesturePhase::End => {
                self.gesturing[hand] = false;
                self.release(hand, ctx, state);
            }
        }
    }

    pub fn on_contact(&mut self, hand: HandSide, entering: bool, ctx: &mut FrameContext, state: &mut ObjectState) {
        self.in_contact[hand] = entering;
        if entering {
            if self.gesturing[hand] {
                self.start_click(hand, ctx, state);
            }
        } else {
            self.release(hand, ctx, state);
        }
    }

    fn start_click(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        if self.is_clicking(hand) {
            return;
        }
        if let Some(max) = self.config.max_clickers {
            if max == 0 {
                return;
            }
            while self.clickers.len() >= max {
                let oldest = self.clickers[0].hand;
                self.release(oldest, ctx, state);
            }
        }

        self.clickers.push(Clicker {
            hand,
            started_ms: ctx.time.now_ms,
        });
        state.clicked = true;
        log::debug!("click-start {} hand={hand} clickers={}", ctx.object, self.clickers.len());
        ctx.emit(InteractionEvent::ClickStart {
            object: ctx.object,
            hand,
            clickers: self.clickers.len(),
            gesture: self.config.gesture,
        });
    }

    fn release(&mut self, hand: HandSide, ctx: &mut FrameContext, state: &mut ObjectState) {
        let Some(index) = self.clickers.iter().position(|c| c.hand == hand) else {
            return;
        };
        let clicker = self.clickers.remove(index);
        let duration_ms = ctx.time.since(clicker.started_ms);
        if self.clickers.is_empty() {
            state.clicked = false;
        }
        log::debug!("click-end {} hand={hand} after {duration_ms:.0}ms", ctx.object);
        ctx.emit(InteractionEvent::ClickEnd {
            object: ctx.object,
            hand,
            clickers: self.clickers.len(),
            duration_ms,
            gesture: self.config.gesture,
        });
    }

    /// End every click, oldest first
    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        while let Some(clicker) = self.clickers.first() {
            let hand = clicker.hand;
            self.release(hand, ctx, state);
        }
        self.in_contact = PerHand::default();
        self.gesturing = PerHand::default();
    }
}
