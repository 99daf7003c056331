//! Scene transform collaborator
//!
//! The interaction core never owns the scene graph. It reads and writes
//! world poses and parent links through [`Scene`]; [`MemoryScene`] is a
//! small in-memory graph for hosts without one of their own and for tests.

use crate::error::{InteractError, Result};
use grasp_core::{EntityId, EntityIdGenerator};
use grasp_math::Transform;
use std::collections::{BTreeMap, BTreeSet};

/// Read/write access to entity transforms and the parent graph
pub trait Scene {
    fn contains(&self, id: EntityId) -> bool;

    /// World-space pose, `None` if the entity does not exist
    fn world_transform(&self, id: EntityId) -> Option<Transform>;

    /// Place an entity in world space, keeping its current parent
    fn set_world_transform(&mut self, id: EntityId, world: Transform) -> Result<()>;

    fn parent(&self, id: EntityId) -> Option<EntityId>;

    /// Move an entity under `parent`, preserving its world pose
    fn set_parent(&mut self, id: EntityId, parent: Option<EntityId>) -> Result<()>;

    fn name(&self, id: EntityId) -> Option<&str>;

    fn has_tag(&self, id: EntityId, tag: &str) -> bool;

    fn entities(&self) -> Vec<EntityId>;

    /// Bumped on every structural change (spawn, despawn, reparent, name or
    /// tag edits). Transform writes do not count.
    fn revision(&self) -> u64;
}

/// One entity in a [`MemoryScene`]
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: Option<String>,
    pub tags: BTreeSet<String>,
    pub parent: Option<EntityId>,
    pub local: Transform,
}

/// Parent/child transform graph held in memory
#[derive(Default)]
pub struct MemoryScene {
    nodes: BTreeMap<EntityId, SceneNode>,
    ids: EntityIdGenerator,
    revision: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a root entity
    pub fn spawn(&mut self, local: Transform) -> EntityId {
        self.insert(SceneNode {
            local,
            ..Default::default()
        })
    }

    pub fn spawn_named(&mut self, name: impl Into<String>, local: Transform) -> EntityId {
        self.insert(SceneNode {
            name: Some(name.into()),
            local,
            ..Default::default()
        })
    }

    /// Spawn under `parent` with a pose local to it
    pub fn spawn_child(&mut self, parent: EntityId, local: Transform) -> Result<EntityId> {
        if !self.nodes.contains_key(&parent) {
            return Err(InteractError::EntityNotFound(parent));
        }
        Ok(self.insert(SceneNode {
            parent: Some(parent),
            local,
            ..Default::default()
        }))
    }

    fn insert(&mut self, node: SceneNode) -> EntityId {
        let id = self.ids.next();
        self.nodes.insert(id, node);
        self.revision += 1;
        id
    }

    /// Remove an entity; its children keep their world pose as roots
    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(InteractError::EntityNotFound(id));
        }
        let children: Vec<EntityId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(id))
            .map(|(child, _)| *child)
            .collect();
        for child in children {
            self.set_parent(child, None)?;
        }
        self.nodes.remove(&id);
        self.revision += 1;
        Ok(())
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: EntityId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or(InteractError::EntityNotFound(id))
    }

    pub fn add_tag(&mut self, id: EntityId, tag: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.tags.insert(tag.into());
        self.revision += 1;
        Ok(())
    }

    pub fn remove_tag(&mut self, id: EntityId, tag: &str) -> Result<bool> {
        let removed = self.node_mut(id)?.tags.remove(tag);
        if removed {
            self.revision += 1;
        }
        Ok(removed)
    }

    pub fn set_name(&mut self, id: EntityId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = Some(name.into());
        self.revision += 1;
        Ok(())
    }

    pub fn local_transform(&self, id: EntityId) -> Option<Transform> {
        self.nodes.get(&id).map(|node| node.local)
    }

    pub fn set_local_transform(&mut self, id: EntityId, local: Transform) -> Result<()> {
        self.node_mut(id)?.local = local;
        Ok(())
    }

    /// Is `ancestor` on the parent chain of `id` (or `id` itself)?
    fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|node| node.parent);
        }
        false
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Scene for MemoryScene {
    fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => Some(self.world_transform(parent)?.compose(&node.local)),
            None => Some(node.local),
        }
    }

    fn set_world_transform(&mut self, id: EntityId, world: Transform) -> Result<()> {
        let parent = self.nodes.get(&id).ok_or(InteractError::EntityNotFound(id))?.parent;
        let local = match parent.and_then(|p| self.world_transform(p)) {
            Some(parent_world) => world.relative_to(&parent_world),
            None => world,
        };
        self.node_mut(id)?.local = local;
        Ok(())
    }

    fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    fn set_parent(&mut self, id: EntityId, parent: Option<EntityId>) -> Result<()> {
        let world = self.world_transform(id).ok_or(InteractError::EntityNotFound(id))?;
        if let Some(parent) = parent {
            if !self.nodes.contains_key(&parent) {
                return Err(InteractError::EntityNotFound(parent));
            }
            if self.is_ancestor(id, parent) {
                return Err(InteractError::ParentCycle { child: id, parent });
            }
        }
        self.node_mut(id)?.parent = parent;
        self.revision += 1;
        self.set_world_transform(id, world)
    }

    fn name(&self, id: EntityId) -> Option<&str> {
        self.nodes.get(&id).and_then(|node| node.name.as_deref())
    }

    fn has_tag(&self, id: EntityId, tag: &str) -> bool {
        self.nodes.get(&id).map_or(false, |node| node.tags.contains(tag))
    }

    fn entities(&self) -> Vec<EntityId> {
        self.nodes.keys().copied().collect()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
