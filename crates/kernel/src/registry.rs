use vrscene_ecs::{ArchetypeKind, ComponentKind};

use crate::error::ConfigurationError;
use crate::system::System;
use crate::world::World;

/// Archetypes and component kinds a world accepts, in registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    archetypes: Vec<ArchetypeKind>,
    components: Vec<ComponentKind>,
}

impl Registry {
    /// Registered archetypes, in registration order.
    pub fn archetypes(&self) -> &[ArchetypeKind] {
        &self.archetypes
    }

    /// Registered component kinds, in registration order.
    pub fn components(&self) -> &[ComponentKind] {
        &self.components
    }

    /// Whether `archetype` may be used by `World::create_entity`.
    pub fn has_archetype(&self, archetype: ArchetypeKind) -> bool {
        self.archetypes.contains(&archetype)
    }

    /// Whether components of `kind` may be attached.
    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.contains(&kind)
    }

    pub(crate) fn add_archetype(
        &mut self,
        archetype: ArchetypeKind,
    ) -> Result<(), ConfigurationError> {
        if self.has_archetype(archetype) {
            return Err(ConfigurationError::DuplicateArchetype(archetype));
        }
        self.archetypes.push(archetype);
        Ok(())
    }

    pub(crate) fn add_component(&mut self, kind: ComponentKind) -> Result<(), ConfigurationError> {
        if self.has_component(kind) {
            return Err(ConfigurationError::DuplicateComponent(kind));
        }
        self.components.push(kind);
        Ok(())
    }
}

/// Collects a world's configuration and produces the world in one step.
///
/// Whatever order the builder methods are called in, [`WorldBuilder::build`]
/// registers all archetypes first, then all components, then systems in the
/// order they were added. Systems may therefore query any component given to
/// the same builder. The returned world has no entities yet, so further
/// registration on it is still possible until the first entity is created.
#[derive(Debug, Default)]
pub struct WorldBuilder {
    archetypes: Vec<ArchetypeKind>,
    components: Vec<ComponentKind>,
    systems: Vec<Box<dyn System>>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archetype(mut self, archetype: ArchetypeKind) -> Self {
        self.archetypes.push(archetype);
        self
    }

    pub fn archetypes(mut self, archetypes: impl IntoIterator<Item = ArchetypeKind>) -> Self {
        self.archetypes.extend(archetypes);
        self
    }

    pub fn component(mut self, kind: ComponentKind) -> Self {
        self.components.push(kind);
        self
    }

    pub fn components(mut self, kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        self.components.extend(kinds);
        self
    }

    /// Append a system to the execution order. Any external dependency it
    /// needs must be captured in `system` already.
    pub fn system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn systems(mut self, systems: impl IntoIterator<Item = Box<dyn System>>) -> Self {
        self.systems.extend(systems);
        self
    }

    pub fn build(self) -> Result<World, ConfigurationError> {
        let mut world = World::new();
        for archetype in self.archetypes {
            world.register_archetype(archetype)?;
        }
        for kind in self.components {
            world.register_component(kind)?;
        }
        for system in self.systems {
            world.register_boxed_system(system)?;
        }
        tracing::debug!(
            archetypes = world.registry().archetypes().len(),
            components = world.registry().components().len(),
            systems = world.system_count(),
            "world built"
        );
        Ok(world)
    }
}
