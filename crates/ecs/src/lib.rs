//! Archetype and component declarations.
//!
//! Every kind of data an entity can carry is declared here, together with the
//! archetypes that decide which host primitive backs an entity.
//!
//! # Invariants
//! - A component kind appears at most once per entity ([`ComponentSet`]).
//! - Iteration over an entity's components is ordered by [`ComponentKind`].
//! - Components referencing host objects hold handles, never ownership.

mod archetype;
mod component;
mod set;

pub use archetype::{ArchetypeKind, Geometry, Material, Primitive};
pub use component::{
    Animation, Component, ComponentData, ComponentKind, ConstrainOnHeld, ExternalNodeBinding,
    FitMode, GltfLoader, GltfModel, Held, Holdable, Hoverable, Hovered, Image, InteractionState,
    Interactor, Loading, LoadingCube, MediaLoader, PhysicsBody, PhysicsConstraint, PhysicsShape,
    Rotating, ShapeKind, SpawnPoint,
};
pub use set::ComponentSet;
