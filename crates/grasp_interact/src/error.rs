//! Error types for interaction setup

use grasp_core::EntityId;
use grasp_gesture::GestureKind;
use thiserror::Error;

/// Interaction setup and scene errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InteractError {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Object already registered: {0}")]
    DuplicateObject(EntityId),

    /// No classifier of this kind is registered
    #[error("No {0} gesture source registered")]
    MissingGestureSource(GestureKind),

    /// Droppable acceptance pattern could not be parsed
    #[error("Invalid accept pattern: {0}")]
    InvalidPattern(String),

    /// Reparenting would make an entity its own ancestor
    #[error("Reparenting {child} under {parent} would create a cycle")]
    ParentCycle { child: EntityId, parent: EntityId },
}

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractError>;
