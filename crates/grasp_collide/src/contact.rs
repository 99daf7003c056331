//! Edge-triggered contact tracking
//!
//! A [`ContactTracker`] belongs to one object and remembers which
//! contactors (hands or other entities) touched it last frame. Feeding it
//! this frame's overlap booleans yields an edge only on change.

use crate::obb::Obb;
use grasp_core::{EntityId, HandSide, PerHand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What can touch an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Contactor {
    Hand(HandSide),
    Entity(EntityId),
}

impl Contactor {
    pub fn hand(&self) -> Option<HandSide> {
        match self {
            Contactor::Hand(side) => Some(*side),
            Contactor::Entity(_) => None,
        }
    }

    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Contactor::Hand(_) => None,
            Contactor::Entity(id) => Some(*id),
        }
    }
}

/// A change in contact between an object and a contactor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEdge {
    pub object: EntityId,
    pub contactor: Contactor,
    /// `true` on enter, `false` on exit
    pub entering: bool,
}

impl ContactEdge {
    pub fn enter(object: EntityId, contactor: Contactor) -> Self {
        Self { object, contactor, entering: true }
    }

    pub fn exit(object: EntityId, contactor: Contactor) -> Self {
        Self { object, contactor, entering: false }
    }

    /// Hand side, when the contactor is a hand
    pub fn hand(&self) -> Option<HandSide> {
        self.contactor.hand()
    }
}

/// Previous-frame contact set for one object
#[derive(Debug, Clone)]
pub struct ContactTracker {
    object: EntityId,
    touching: BTreeSet<Contactor>,
}

impl ContactTracker {
    pub fn new(object: EntityId) -> Self {
        Self {
            object,
            touching: BTreeSet::new(),
        }
    }

    pub fn object(&self) -> EntityId {
        self.object
    }

    /// Record this frame's overlap state for `contactor`
    pub fn update(&mut self, contactor: Contactor, touching: bool) -> Option<ContactEdge> {
        let was_touching = self.touching.contains(&contactor);
        match (was_touching, touching) {
            (false, true) => {
                self.touching.insert(contactor);
                log::debug!("contact enter: {} <- {:?}", self.object, contactor);
                Some(ContactEdge::enter(self.object, contactor))
            }
            (true, false) => {
                self.touching.remove(&contactor);
                log::debug!("contact exit: {} <- {:?}", self.object, contactor);
                Some(ContactEdge::exit(self.object, contactor))
            }
            _ => None,
        }
    }

    /// Run the overlap test for `contactor`; a missing box means no contact
    pub fn evaluate(&mut self, object_box: Option<&Obb>, contactor: Contactor, other: Option<&Obb>) -> Option<ContactEdge> {
        let touching = match (object_box, other) {
            (Some(a), Some(b)) => crate::sat::intersects(a, b),
            _ => false,
        };
        self.update(contactor, touching)
    }

    pub fn is_touching(&self, contactor: Contactor) -> bool {
        self.touching.contains(&contactor)
    }

    pub fn touching(&self) -> impl Iterator<Item = Contactor> + '_ {
        self.touching.iter().copied()
    }

    /// Hands currently in contact
    pub fn hands(&self) -> PerHand<bool> {
        PerHand::from_fn(|side| self.touching.contains(&Contactor::Hand(side)))
    }

    /// Emit exits for every contactor `keep` rejects
    pub fn retain(&mut self, mut keep: impl FnMut(Contactor) -> bool) -> Vec<ContactEdge> {
        let gone: Vec<Contactor> = self.touching.iter().copied().filter(|c| !keep(*c)).collect();
        gone.into_iter().filter_map(|c| self.update(c, false)).collect()
    }

    /// Emit exits for every current contact
    pub fn reset(&mut self) -> Vec<ContactEdge> {
        self.retain(|_| false)
    }
}
