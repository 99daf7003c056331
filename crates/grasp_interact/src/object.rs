//! An entity with a collider and any mix of interaction machines

use crate::clickable::{Clickable, ClickableConfig};
use crate::context::{ContactProbe, FrameContext, ObjectState};
use crate::draggable::{DragRelease, Draggable, DraggableConfig};
use crate::droppable::{Droppable, DroppableConfig};
use crate::error::{InteractError, Result};
use crate::event::InteractionEvent;
use crate::grabbable::{Grabbable, GrabbableConfig};
use crate::hoverable::{Hoverable, HoverableConfig};
use crate::scene::Scene;
use crate::stretchable::{Stretchable, StretchableConfig};
use grasp_collide::{Collider, ColliderDesc, ContactEdge, ContactTracker, Contactor, Obb};
use grasp_core::{EntityId, HandSide};
use grasp_gesture::{GestureEvent, GestureKind, GestureRegistry};
use std::collections::{BTreeMap, BTreeSet};

/// A hand contact edge together with the probe that produced it
pub type HandContact = (ContactProbe, ContactEdge);

pub struct InteractableObject {
    id: EntityId,
    collider: Box<dyn Collider>,
    state: ObjectState,
    hand_contacts: BTreeMap<ContactProbe, ContactTracker>,
    entity_contacts: ContactTracker,
    clickable: Option<Clickable>,
    draggable: Option<Draggable>,
    droppable: Option<Droppable>,
    grabbable: Option<Grabbable>,
    stretchable: Option<Stretchable>,
    hoverable: Option<Hoverable>,
    warned_sources: BTreeSet<GestureKind>,
}

impl InteractableObject {
    pub fn new(id: EntityId, collider: ColliderDesc) -> Self {
        Self {
            id,
            collider: collider.build(),
            state: ObjectState::default(),
            hand_contacts: BTreeMap::new(),
            entity_contacts: ContactTracker::new(id),
            clickable: None,
            draggable: None,
            droppable: None,
            grabbable: None,
            stretchable: None,
            hoverable: None,
            warned_sources: BTreeSet::new(),
        }
    }

    fn track(&mut self, probe: ContactProbe) {
        let id = self.id;
        self.hand_contacts.entry(probe).or_insert_with(|| ContactTracker::new(id));
    }

    pub fn with_clickable(mut self, config: ClickableConfig) -> Self {
        self.track(ContactProbe::Source(config.gesture));
        self.clickable = Some(Clickable::new(config));
        self
    }

    pub fn with_draggable(mut self, config: DraggableConfig) -> Self {
        self.track(ContactProbe::Source(config.gesture));
        self.draggable = Some(Draggable::new(config));
        self
    }

    /// Fails when the accept pattern does not parse
    pub fn with_droppable(mut self, config: DroppableConfig) -> Result<Self> {
        self.droppable = Some(Droppable::new(config)?);
        Ok(self)
    }

    pub fn with_grabbable(mut self, config: GrabbableConfig) -> Self {
        self.track(ContactProbe::Source(config.gesture));
        self.grabbable = Some(Grabbable::new(config));
        self
    }

    pub fn with_stretchable(mut self, config: StretchableConfig) -> Self {
        self.track(ContactProbe::Source(config.gesture));
        self.stretchable = Some(Stretchable::new(config));
        self
    }

    pub fn with_hoverable(mut self, config: HoverableConfig) -> Self {
        let hoverable = Hoverable::new(config);
        self.track(hoverable.probe());
        self.hoverable = Some(hoverable);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    pub fn collider(&self) -> &dyn Collider {
        self.collider.as_ref()
    }

    pub fn clickable(&self) -> Option<&Clickable> {
        self.clickable.as_ref()
    }

    pub fn draggable(&self) -> Option<&Draggable> {
        self.draggable.as_ref()
    }

    pub fn droppable(&self) -> Option<&Droppable> {
        self.droppable.as_ref()
    }

    pub fn grabbable(&self) -> Option<&Grabbable> {
        self.grabbable.as_ref()
    }

    pub fn stretchable(&self) -> Option<&Stretchable> {
        self.stretchable.as_ref()
    }

    pub fn hoverable(&self) -> Option<&Hoverable> {
        self.hoverable.as_ref()
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable.is_some()
    }

    pub fn is_droppable(&self) -> bool {
        self.droppable.is_some()
    }

    /// Is `hand` touching the object through `probe`?
    pub fn in_contact(&self, probe: ContactProbe, hand: HandSide) -> bool {
        self.hand_contacts
            .get(&probe)
            .map_or(false, |tracker| tracker.is_touching(Contactor::Hand(hand)))
    }

    /// Gesture sources the machines on this object are bound to
    pub fn gesture_sources(&self) -> BTreeSet<GestureKind> {
        self.hand_contacts
            .keys()
            .filter_map(|probe| match probe {
                ContactProbe::Source(kind) => Some(*kind),
                ContactProbe::AnySource => None,
            })
            .collect()
    }

    /// Warn about machine combinations that fight over the object
    pub fn check_composition(&self) {
        if self.clickable.is_some() && self.grabbable.is_some() {
            log::warn!("{} is both clickable and grabbable; every grab will also click", self.id);
        }
        match (&self.stretchable, &self.grabbable) {
            (Some(_), None) => log::warn!("{} is stretchable without grabbable and will never stretch", self.id),
            (Some(stretch), Some(grab)) if stretch.gesture() != grab.gesture() => log::warn!(
                "{} stretches on {} but grabs on {}",
                self.id,
                stretch.gesture(),
                grab.gesture()
            ),
            _ => {}
        }
    }

    /// First source this object needs that the registry lacks
    pub fn check_sources(&self, registry: &GestureRegistry) -> Result<()> {
        match self.gesture_sources().into_iter().find(|kind| !registry.contains(*kind)) {
            Some(kind) => Err(InteractError::MissingGestureSource(kind)),
            None => Ok(()),
        }
    }

    /// Follow the entity's world transform; `None` if the entity is gone
    pub fn sync_collider(&mut self, scene: &dyn Scene) -> Option<Obb> {
        let world = scene.world_transform(self.id)?;
        self.collider.sync(&world);
        Some(*self.collider.obb())
    }

    /// Hand contact edges for this frame, per probe
    pub fn evaluate_hand_contacts(&mut self, registry: &GestureRegistry, object_box: Option<&Obb>) -> Vec<HandContact> {
        let mut edges = Vec::new();
        for (probe, tracker) in &mut self.hand_contacts {
            for hand in HandSide::ALL {
                let touching = object_box.map_or(false, |b| probe.touches(registry, hand, b));
                if let Some(edge) = tracker.update(Contactor::Hand(hand), touching) {
                    edges.push((*probe, edge));
                }
            }
        }
        edges
    }

    /// Overlap edges against draggable entities; only droppables track them
    pub fn evaluate_entity_contacts(
        &mut self,
        object_box: Option<&Obb>,
        boxes: &BTreeMap<EntityId, Obb>,
        draggables: &BTreeSet<EntityId>,
    ) -> Vec<ContactEdge> {
        if self.droppable.is_none() {
            return Vec::new();
        }
        let mut edges = self
            .entity_contacts
            .retain(|c| c.entity().map_or(false, |id| draggables.contains(&id)));
        for &other in draggables {
            if other == self.id {
                continue;
            }
            edges.extend(self.entity_contacts.evaluate(object_box, Contactor::Entity(other), boxes.get(&other)));
        }
        edges
    }

    fn warn_missing_sources(&mut self, registry: &GestureRegistry) {
        for kind in self.gesture_sources() {
            if !registry.contains(kind) && self.warned_sources.insert(kind) {
                log::warn!("{} needs a {kind} gesture source; its {kind} interactions stay inert", self.id);
            }
        }
    }

    /// Run one frame: gestures, then contact edges, then per-frame ticks.
    /// Returns drags that ended this frame.
    pub fn process(
        &mut self,
        gestures: &[GestureEvent],
        contacts: &[HandContact],
        ctx: &mut FrameContext,
    ) -> Vec<DragRelease> {
        self.warn_missing_sources(ctx.registry);
        let state = &mut self.state;
        let mut releases = Vec::new();

        for event in gestures {
            if let Some(click) = self.clickable.as_mut().filter(|m| m.gesture() == event.kind) {
                click.on_gesture(event, ctx, state);
            }
            if let Some(drag) = self.draggable.as_mut().filter(|m| m.gesture() == event.kind) {
                releases.extend(drag.on_gesture(event, ctx, state));
            }
            if let Some(grab) = self.grabbable.as_mut().filter(|m| m.gesture() == event.kind) {
                grab.on_gesture(event, ctx, state);
            }
            if let Some(stretch) = self.stretchable.as_mut().filter(|m| m.gesture() == event.kind) {
                stretch.on_gesture(event);
            }
        }

        for (probe, edge) in contacts {
            let Some(hand) = edge.hand() else {
                continue;
            };
            let entering = edge.entering;
            ctx.emit(if entering {
                InteractionEvent::ContactStart { object: self.id, hand, probe: *probe }
            } else {
                InteractionEvent::ContactEnd { object: self.id, hand, probe: *probe }
            });

            let bound = |gesture: GestureKind| *probe == ContactProbe::Source(gesture);
            if let Some(click) = self.clickable.as_mut().filter(|m| bound(m.gesture())) {
                click.on_contact(hand, entering, ctx, state);
            }
            if let Some(drag) = self.draggable.as_mut().filter(|m| bound(m.gesture())) {
                drag.on_contact(hand, entering);
            }
            if let Some(grab) = self.grabbable.as_mut().filter(|m| bound(m.gesture())) {
                grab.on_contact(hand, entering, ctx, state);
            }
            if let Some(stretch) = self.stretchable.as_mut().filter(|m| bound(m.gesture())) {
                stretch.on_contact(hand, entering);
            }
            if let Some(hover) = self.hoverable.as_mut().filter(|m| m.probe() == *probe) {
                hover.on_contact(hand, entering, ctx, state);
            }
        }

        if let Some(hover) = self.hoverable.as_mut() {
            hover.tick(ctx, state);
        }
        let was_stretched = state.stretched;
        let handoff = match self.stretchable.as_mut() {
            Some(stretch) => stretch.evaluate(ctx, state),
            None => None,
        };
        if let Some(grab) = self.grabbable.as_mut() {
            // A surviving grab continues from the stretched pose, qualifying hand or not
            let resumed = handoff.or_else(|| {
                let ended = was_stretched && !state.stretched && state.grabbed;
                ended.then(|| grab.owner_hand()).flatten()
            });
            if let Some(hand) = resumed {
                grab.transfer_to(hand, ctx, state);
            }
            grab.tick(ctx, state);
        }
        if let Some(stretch) = self.stretchable.as_mut() {
            stretch.apply(ctx);
        }

        releases
    }

    /// Feed droppable bookkeeping after every object has processed its frame
    pub fn resolve_drops(
        &mut self,
        entity_edges: &[ContactEdge],
        releases: &[DragRelease],
        dragged: &BTreeSet<EntityId>,
        ctx: &mut FrameContext,
    ) {
        let Some(droppable) = self.droppable.as_mut() else {
            return;
        };
        for edge in entity_edges {
            droppable.on_entity_contact(edge);
        }
        for release in releases {
            droppable.on_drag_release(release, ctx);
        }
        droppable.refresh(dragged, ctx, &mut self.state);
    }

    /// End every session and contact this object holds
    pub fn shutdown(&mut self, ctx: &mut FrameContext) -> Vec<DragRelease> {
        let state = &mut self.state;
        if let Some(stretch) = self.stretchable.as_mut() {
            stretch.shutdown(ctx, state);
        }
        if let Some(grab) = self.grabbable.as_mut() {
            grab.shutdown(ctx, state);
        }
        let release = self.draggable.as_mut().and_then(|drag| drag.shutdown(ctx, state));
        if let Some(click) = self.clickable.as_mut() {
            click.shutdown(ctx, state);
        }
        if let Some(hover) = self.hoverable.as_mut() {
            hover.shutdown(ctx, state);
        }
        if let Some(droppable) = self.droppable.as_mut() {
            droppable.shutdown(ctx, state);
        }
        for tracker in self.hand_contacts.values_mut() {
            tracker.reset();
        }
        self.entity_contacts.reset();
        release.into_iter().collect()
    }
}
