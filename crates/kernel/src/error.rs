use vrscene_common::EntityId;
use vrscene_ecs::{ArchetypeKind, ComponentKind};

/// Registration used at the wrong lifecycle stage, or against the registry.
///
/// These are programmer errors: fatal and never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("cannot register {item}: entities already exist")]
    RegistrationClosed { item: String },
    #[error("archetype `{0}` registered twice")]
    DuplicateArchetype(ArchetypeKind),
    #[error("component `{0}` registered twice")]
    DuplicateComponent(ComponentKind),
    #[error("system `{0}` registered twice")]
    DuplicateSystem(String),
    #[error("archetype `{0}` is not registered")]
    UnregisteredArchetype(ArchetypeKind),
    #[error("component `{0}` is not registered")]
    UnregisteredComponent(ComponentKind),
}

/// Errors from world operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
    #[error("cannot parent {child} under {parent}: it would become its own ancestor")]
    ParentCycle { child: EntityId, parent: EntityId },
}
