//! Hoverable: contact without gesture

use crate::context::{ContactProbe, FrameContext, ObjectState};
use crate::event::InteractionEvent;
use grasp_core::{HandSide, PerHand};
use grasp_gesture::GestureKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverableConfig {
    /// Hand boxes to test; `None` uses every registered source
    pub gesture: Option<GestureKind>,
    /// Emit `Hovering` every frame while hovered
    pub emit_each_frame: bool,
}

impl HoverableConfig {
    pub fn with_gesture(mut self, gesture: GestureKind) -> Self {
        self.gesture = Some(gesture);
        self
    }

    pub fn with_emit_each_frame(mut self, emit: bool) -> Self {
        self.emit_each_frame = emit;
        self
    }
}

pub struct Hoverable {
    config: HoverableConfig,
    hands: PerHand<bool>,
}

impl Hoverable {
    pub fn new(config: HoverableConfig) -> Self {
        Self {
            config,
            hands: PerHand::default(),
        }
    }

    pub fn probe(&self) -> ContactProbe {
        ContactProbe::from_gesture(self.config.gesture)
    }

    pub fn hands(&self) -> PerHand<bool> {
        self.hands
    }

    pub fn on_contact(&mut self, hand: HandSide, entering: bool, ctx: &mut FrameContext, state: &mut ObjectState) {
        if self.hands[hand] == entering {
            return;
        }
        self.hands[hand] = entering;
        let count = self.hands.count();
        state.hovered = count > 0;

        let object = ctx.object;
        log::debug!("hover {} {object} hand={hand} hands={count}", if entering { "start" } else { "end" });
        ctx.emit(if entering {
            InteractionEvent::HoverStart { object, hand, hands: count }
        } else {
            InteractionEvent::HoverEnd { object, hand, hands: count }
        });
    }

    pub fn tick(&mut self, ctx: &mut FrameContext, state: &ObjectState) {
        if state.hovered && self.config.emit_each_frame {
            ctx.emit(InteractionEvent::Hovering {
                object: ctx.object,
                hands: self.hands.count(),
            });
        }
    }

    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        for hand in HandSide::ALL {
            self.on_contact(hand, false, ctx, state);
        }
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

    #[test]
    fn test_aggregate_flips_on_empty_transitions() {
        let registry = GestureRegistry::new();
        let mut scene = MemoryScene::new();
        let object = scene.spawn(Transform::IDENTITY);
        let events = EventDispatcher::new();
        let mut state = ObjectState::default();
        let mut hover = Hoverable::new(HoverableConfig::default().with_emit_each_frame(true));
        let mut ctx = FrameContext {
            object,
            time: FrameTime::default(),
            registry: &registry,
            scene: &mut scene,
            events: &events,
        };

        hover.on_contact(HandSide::Left, true, &mut ctx, &mut state);
        assert!(state.hovered);
        hover.on_contact(HandSide::Right, true, &mut ctx, &mut state);
        hover.tick(&mut ctx, &state);
        hover.on_contact(HandSide::Left, false, &mut ctx, &mut state);
        assert!(state.hovered);
        hover.on_contact(HandSide::Right, false, &mut ctx, &mut state);
        assert!(!state.hovered);
        hover.tick(&mut ctx, &state);

        let summary: Vec<(String, usize)> = events
            .drain()
            .iter()
            .map(|e| match e {
                InteractionEvent::HoverStart { hands, .. }
                | InteractionEvent::HoverEnd { hands, .. }
                | InteractionEvent::Hovering { hands, .. } => (e.name(), *hands),
                _ => (e.name(), 0),
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("hover-start".to_string(), 1),
                ("hover-start".to_string(), 2),
                ("hovering".to_string(), 2),
                ("hover-end".to_string(), 1),
                ("hover-end".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_probe_defaults_to_any_source() {
        assert_eq!(Hoverable::new(HoverableConfig::default()).probe(), ContactProbe::AnySource);
        let pinch = Hoverable::new(HoverableConfig::default().with_gesture(GestureKind::Pinch));
        assert_eq!(pinch.probe(), ContactProbe::Source(GestureKind::Pinch));
    }
}
