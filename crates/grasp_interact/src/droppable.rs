//! Droppable: a zone that reacts to draggables released over it
//!
//! A droppable follows which draggable entities overlap it through entity
//! contact edges. `dragover` is raised while an overlapping entity is being
//! dragged and passes the [`AcceptPattern`]. When such a drag ends over the
//! zone, exactly one `DragDrop` or `DropRejected` is emitted for that drag
//! session.

use crate::context::{FrameContext, ObjectState};
use crate::draggable::DragRelease;
use crate::error::{InteractError, Result};
use crate::event::InteractionEvent;
use crate::scene::Scene;
use grasp_collide::{ColliderDesc, ContactEdge};
use grasp_core::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Default edge length of a drop zone's collider
pub const DEFAULT_DROP_ZONE_SIZE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroppableConfig {
    /// Selector list such as `"#crate, .fruit"`; `None` accepts everything
    pub accepts: Option<String>,
    /// Recompute matches when the scene structure changes
    pub auto_update: bool,
}

impl Default for DroppableConfig {
    fn default() -> Self {
        Self {
            accepts: None,
            auto_update: true,
        }
    }
}

impl DroppableConfig {
    pub fn with_accepts(mut self, pattern: impl Into<String>) -> Self {
        self.accepts = Some(pattern.into());
        self
    }

    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Any,
    Name(String),
    Tag(String),
}

/// Comma-separated selectors: `*`, `#name`, `.tag`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptPattern {
    selectors: Vec<Selector>,
}

impl AcceptPattern {
    pub fn matches(&self, scene: &dyn Scene, id: EntityId) -> bool {
        self.selectors.iter().any(|selector| match selector {
            Selector::Any => true,
            Selector::Name(name) => scene.name(id) == Some(name.as_str()),
            Selector::Tag(tag) => scene.has_tag(id, tag),
        })
    }
}

impl FromStr for AcceptPattern {
    type Err = InteractError;

    fn from_str(pattern: &str) -> Result<Self> {
        let selectors = pattern
            .split(',')
            .map(str::trim)
            .map(|part| match part {
                "*" => Ok(Selector::Any),
                _ => match (part.strip_prefix('#'), part.strip_prefix('.')) {
                    (Some(name), _) if !name.is_empty() => Ok(Selector::Name(name.to_string())),
                    (_, Some(tag)) if !tag.is_empty() => Ok(Selector::Tag(tag.to_string())),
                    _ => Err(InteractError::InvalidPattern(pattern.to_string())),
                },
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { selectors })
    }
}

#[derive(Debug, Clone)]
struct AcceptCache {
    revision: u64,
    accepted: BTreeSet<EntityId>,
}

pub struct Droppable {
    config: DroppableConfig,
    pattern: Option<AcceptPattern>,
    cache: Option<AcceptCache>,
    colliding: BTreeSet<EntityId>,
    /// (dragged entity, drag session) pairs already resolved
    resolved: BTreeSet<(EntityId, u64)>,
}

impl Droppable {
    pub fn new(config: DroppableConfig) -> Result<Self> {
        let pattern = config.accepts.as_deref().map(AcceptPattern::from_str).transpose()?;
        Ok(Self {
            config,
            pattern,
            cache: None,
            colliding: BTreeSet::new(),
            resolved: BTreeSet::new(),
        })
    }

    /// Collider a drop zone gets when the host does not size one
    pub fn default_collider() -> ColliderDesc {
        ColliderDesc::cuboid(DEFAULT_DROP_ZONE_SIZE, DEFAULT_DROP_ZONE_SIZE, DEFAULT_DROP_ZONE_SIZE)
    }

    pub fn config(&self) -> &DroppableConfig {
        &self.config
    }

    /// Draggable entities currently overlapping the zone
    pub fn colliding(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.colliding.iter().copied()
    }

    /// Does the zone take `id`? Matches are cached per scene revision.
    pub fn accepts(&mut self, scene: &dyn Scene, id: EntityId) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        let stale = match &self.cache {
            None => true,
            Some(cache) => self.config.auto_update && cache.revision != scene.revision(),
        };
        if stale {
            let accepted: BTreeSet<EntityId> = scene
                .entities()
                .into_iter()
                .filter(|candidate| pattern.matches(scene, *candidate))
                .collect();
            log::debug!("accept pattern matched {} entities", accepted.len());
            self.cache = Some(AcceptCache {
                revision: scene.revision(),
                accepted,
            });
        }
        self.cache.as_ref().map_or(false, |cache| cache.accepted.contains(&id))
    }

    pub fn on_entity_contact(&mut self, edge: &ContactEdge) {
        let Some(entity) = edge.contactor.entity() else {
            return;
        };
        if edge.entering {
            self.colliding.insert(entity);
        } else {
            self.colliding.remove(&entity);
            self.resolved.retain(|(resolved, _)| *resolved != entity);
        }
    }

    /// Resolve a finished drag; ignored unless the entity is over the zone
    pub fn on_drag_release(&mut self, release: &DragRelease, ctx: &mut FrameContext) {
        if !self.colliding.contains(&release.dragged) {
            return;
        }
        if !self.resolved.insert((release.dragged, release.session)) {
            return;
        }
        let droppable = ctx.object;
        let event = if self.accepts(&*ctx.scene, release.dragged) {
            log::debug!("drag-drop {} onto {droppable}", release.dragged);
            InteractionEvent::DragDrop {
                droppable,
                dropped: release.dragged,
                hand: release.hand,
            }
        } else {
            log::debug!("drop of {} rejected by {droppable}", release.dragged);
            InteractionEvent::DropRejected {
                droppable,
                dropped: release.dragged,
                hand: release.hand,
            }
        };
        ctx.emit(event);
    }

    /// Recompute `dragover` from the entities being dragged this frame
    pub fn refresh(&mut self, dragged: &BTreeSet<EntityId>, ctx: &mut FrameContext, state: &mut ObjectState) {
        let candidates: Vec<EntityId> = self.colliding.intersection(dragged).copied().collect();
        let over = candidates
            .into_iter()
            .find(|candidate| self.accepts(&*ctx.scene, *candidate));

        match (state.dragover, over) {
            (false, Some(entity)) => {
                state.dragover = true;
                log::debug!("dragover-start {} by {entity}", ctx.object);
                ctx.emit(InteractionEvent::DragOverStart {
                    droppable: ctx.object,
                    dragged: entity,
                });
            }
            (true, None) => {
                state.dragover = false;
                log::debug!("dragover-end {}", ctx.object);
                ctx.emit(InteractionEvent::DragOverEnd { droppable: ctx.object });
            }
            _ => {}
        }
    }

    pub fn shutdown(&mut self, ctx: &mut FrameContext, state: &mut ObjectState) {
        self.colliding.clear();
        self.resolved.clear();
        self.refresh(&BTreeSet::new(), ctx, state);
    }
}
