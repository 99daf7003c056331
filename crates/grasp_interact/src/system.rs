//! Frame driver for every interactable object
//!
//! One [`InteractionSystem::tick`] per rendered frame, in a fixed order:
//!
//! 1. Every gesture source classifies the joint frame
//! 2. Object colliders follow their entities' world transforms
//! 3. Hand contacts (per object, per probe, per hand) and drop-zone contacts
//!    are evaluated against this frame's boxes
//! 4. Each object handles its gesture events, then its contact edges, then
//!    its per-frame ticks
//! 5. Drop zones consume drop-zone contacts and finished drags
//! 6. Queued events are delivered to subscribers

use crate::context::FrameContext;
use crate::draggable::DragRelease;
use crate::error::{InteractError, Result};
use crate::event::InteractionEvent;
use crate::object::{HandContact, InteractableObject};
use crate::scene::Scene;
use grasp_collide::{ContactEdge, Obb};
use grasp_core::{EntityId, FrameTime};
use grasp_event::{EventDispatcher, SubscriberId};
use grasp_gesture::{GestureClassifier, GestureEvent, GestureRegistry, JointFrameSource};
use std::collections::{BTreeMap, BTreeSet};

pub struct InteractionSystem {
    registry: GestureRegistry,
    objects: BTreeMap<EntityId, InteractableObject>,
    events: EventDispatcher<InteractionEvent>,
    /// Finished drags left by removed objects, resolved next frame
    pending_releases: Vec<DragRelease>,
}

impl InteractionSystem {
    pub fn new(registry: GestureRegistry) -> Self {
        Self {
            registry,
            objects: BTreeMap::new(),
            events: EventDispatcher::new(),
            pending_releases: Vec::new(),
        }
    }

    pub fn registry(&self) -> &GestureRegistry {
        &self.registry
    }

    /// Add a gesture source; machines waiting on it come alive next frame
    pub fn register_source(&mut self, classifier: Box<dyn GestureClassifier>) -> grasp_gesture::Result<()> {
        self.registry.register(classifier)
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&InteractionEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Start driving an object. The entity must exist in `scene`.
    pub fn register_object(&mut self, object: InteractableObject, scene: &dyn Scene) -> Result<()> {
        let id = object.id();
        if self.objects.contains_key(&id) {
            return Err(InteractError::DuplicateObject(id));
        }
        if !scene.contains(id) {
            return Err(InteractError::EntityNotFound(id));
        }
        object.check_composition();
        if let Err(err) = object.check_sources(&self.registry) {
            log::warn!("{id}: {err}; it stays inert until the source is registered");
        }
        log::info!(
            "registered interactable {id} ({:?} collider, sources {:?})",
            object.collider().kind(),
            object.gesture_sources()
        );
        self.objects.insert(id, object);
        Ok(())
    }

    /// Stop driving an object, ending every session it holds first
    pub fn unregister_object(&mut self, id: EntityId, scene: &mut dyn Scene, time: FrameTime) -> Option<InteractableObject> {
        let mut object = self.objects.remove(&id)?;
        let mut ctx = FrameContext {
            object: id,
            time,
            registry: &self.registry,
            scene,
            events: &self.events,
        };
        let releases = object.shutdown(&mut ctx);
        self.pending_releases.extend(releases);
        log::info!("unregistered interactable {id}");
        Some(object)
    }

    pub fn object(&self, id: EntityId) -> Option<&InteractableObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &InteractableObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Events queued but not yet delivered
    pub fn pending_events(&self) -> usize {
        self.events.pending_count()
    }

    /// Run one frame and return the delivered events in order
    pub fn tick(&mut self, frame: &dyn JointFrameSource, scene: &mut dyn Scene, time: FrameTime) -> Vec<InteractionEvent> {
        let gestures: Vec<GestureEvent> = self.registry.update(frame);
        for event in &gestures {
            self.events.publish(InteractionEvent::Gesture(*event));
        }

        let mut boxes: BTreeMap<EntityId, Obb> = BTreeMap::new();
        for (id, object) in &mut self.objects {
            match object.sync_collider(&*scene) {
                Some(obb) => {
                    boxes.insert(*id, obb);
                }
                None => log::trace!("{id} has no transform this frame"),
            }
        }

        let draggables: BTreeSet<EntityId> = self
            .objects
            .values()
            .filter(|o| o.is_draggable())
            .map(|o| o.id())
            .collect();
        let mut hand_contacts: BTreeMap<EntityId, Vec<HandContact>> = BTreeMap::new();
        let mut entity_contacts: BTreeMap<EntityId, Vec<ContactEdge>> = BTreeMap::new();
        for (id, object) in &mut self.objects {
            let own = boxes.get(id);
            hand_contacts.insert(*id, object.evaluate_hand_contacts(&self.registry, own));
            if object.is_droppable() {
                entity_contacts.insert(*id, object.evaluate_entity_contacts(own, &boxes, &draggables));
            }
        }

        let mut releases = std::mem::take(&mut self.pending_releases);
        for (id, object) in &mut self.objects {
            let mut ctx = FrameContext {
                object: *id,
                time,
                registry: &self.registry,
                scene: &mut *scene,
                events: &self.events,
            };
            let contacts = hand_contacts.remove(id).unwrap_or_default();
            releases.extend(object.process(&gestures, &contacts, &mut ctx));
        }

        let dragged: BTreeSet<EntityId> = self
            .objects
            .values()
            .filter(|o| o.state().dragged)
            .map(|o| o.id())
            .collect();
        for (id, object) in &mut self.objects {
            if !object.is_droppable() {
                continue;
            }
            let mut ctx = FrameContext {
                object: *id,
                time,
                registry: &self.registry,
                scene: &mut *scene,
                events: &self.events,
            };
            let edges = entity_contacts.remove(id).unwrap_or_default();
            object.resolve_drops(&edges, &releases, &dragged, &mut ctx);
        }

        self.events.process()
    }

    /// End every session on every object and deliver the resulting events
    pub fn shutdown(&mut self, scene: &mut dyn Scene, time: FrameTime) -> Vec<InteractionEvent> {
        let ids: Vec<EntityId> = self.objects.keys().copied().collect();
        for id in ids {
            self.unregister_object(id, scene, time);
        }
        self.pending_releases.clear();
        self.events.process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clickable::ClickableConfig;
    use crate::scene::MemoryScene;
    use grasp_collide::ColliderDesc;
    use grasp_gesture::{JointFrame, PinchClassifier, PinchConfig};
    use grasp_math::Transform;

    fn system() -> InteractionSystem {
        let mut registry = GestureRegistry::new();
        registry.register(Box::new(PinchClassifier::new(PinchConfig::default()))).unwrap();
        InteractionSystem::new(registry)
    }

    #[test]
    fn test_register_errors() {
        let mut scene = MemoryScene::new();
        let id = scene.spawn(Transform::IDENTITY);
        let mut system = system();

        system
            .register_object(InteractableObject::new(id, ColliderDesc::default()), &scene)
            .unwrap();
        assert_eq!(
            system.register_object(InteractableObject::new(id, ColliderDesc::default()), &scene),
            Err(InteractError::DuplicateObject(id))
        );

        let ghost = EntityId::new(99, 0);
        assert_eq!(
            system.register_object(InteractableObject::new(ghost, ColliderDesc::default()), &scene),
            Err(InteractError::EntityNotFound(ghost))
        );
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_missing_source_is_inert() {
        let mut scene = MemoryScene::new();
        let id = scene.spawn(Transform::IDENTITY);
        let mut system = system();
        let object = InteractableObject::new(id, ColliderDesc::default()).with_clickable(ClickableConfig::default());
        system.register_object(object, &scene).unwrap();

        let events = system.tick(&JointFrame::new(), &mut scene, FrameTime::default());
        assert!(events.is_empty());
        assert!(!system.object(id).unwrap().state().clicked);
    }

    #[test]
    fn test_unregister_unknown() {
        let mut scene = MemoryScene::new();
        let mut system = system();
        assert!(system
            .unregister_object(EntityId::new(5, 0), &mut scene, FrameTime::default())
            .is_none());
    }
}
