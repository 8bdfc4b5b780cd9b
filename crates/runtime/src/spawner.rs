use glam::Vec3;
use vrscene_common::{EntityId, Transform};
use vrscene_ecs::{
    ArchetypeKind, ConstrainOnHeld, Geometry, Holdable, Hoverable, Material, PhysicsBody,
    PhysicsShape, Primitive,
};
use vrscene_kernel::{World, WorldError};

use crate::bootstrap::SceneHandles;
use crate::config::SpawnerConfig;
use crate::host::SceneGraph;

/// Builds translucent, holdable physics boxes under the scene root.
///
/// Every call adds one entity; there is no cap on how many accumulate.
#[derive(Debug, Clone)]
pub struct BoxSpawner {
    config: SpawnerConfig,
}

impl BoxSpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// What the host is asked to render for each box.
    pub fn primitive(&self) -> Primitive {
        Primitive::mesh(
            Geometry::Box {
                size: Vec3::splat(self.config.box_size),
            },
            Material::translucent(self.config.color, self.config.opacity),
        )
    }

    /// Add one box entity under the scene root and its node under the
    /// host root node. On failure nothing is left in the world.
    pub fn spawn<S: SceneGraph + ?Sized>(
        &self,
        world: &mut World,
        scene: &mut S,
        handles: &SceneHandles,
    ) -> Result<EntityId, WorldError> {
        let id = world.create_entity(Some(ArchetypeKind::Mesh))?.id();
        if let Err(err) = self.populate(world, id, handles.root) {
            // Roll back so a half-built box never reaches a system.
            world.remove_entity(id)?;
            return Err(err);
        }

        let node = scene.create_node(&self.primitive());
        scene.set_position(node, self.config.offset);
        scene.attach_child(handles.root_node, node);
        world.set_primitive(id, node)?;

        tracing::debug!(entity = %id, ?node, "box spawned");
        Ok(id)
    }

    fn populate(&self, world: &mut World, id: EntityId, root: EntityId) -> Result<(), WorldError> {
        world
            .entity_mut(id)?
            .with(Hoverable)?
            .with(Holdable)?
            .with(PhysicsBody::default())?
            .with(PhysicsShape::manual_box(self.config.half_extents))?
            .with(ConstrainOnHeld)?
            .with_transform(Transform::from_position(self.config.offset))
            .with_parent(root)?;
        Ok(())
    }
}
