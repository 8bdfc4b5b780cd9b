use serde::Serialize;
use std::collections::BTreeMap;
use vrscene_common::EntityId;
use vrscene_ecs::{ArchetypeKind, ComponentKind};
use vrscene_kernel::World;

/// World inspector for developer tooling.
pub struct WorldInspector;

impl WorldInspector {
    /// Frame counters, entity count, and system order. Does not drain events.
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            frame: world.frame(),
            elapsed: world.elapsed(),
            entity_count: world.entity_count(),
            systems: world.system_names().into_iter().map(String::from).collect(),
            pending_events: world.events().len(),
        }
    }

    /// Snapshot of one entity, or `None` if it does not exist.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(|data| {
            let p = data.transform.position;
            let r = data.transform.rotation;
            let s = data.transform.scale;
            EntityInfo {
                id,
                archetype: data.archetype,
                parent: data.parent,
                children: world.children(id).len(),
                components: data.components.kinds().collect(),
                position: [p.x, p.y, p.z],
                rotation: [r.x, r.y, r.z, r.w],
                scale: [s.x, s.y, s.z],
            }
        })
    }

    /// All entity ids, in the world's storage order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().keys().copied().collect()
    }

    /// How many entities carry each component kind. Kinds nobody carries
    /// are left out.
    pub fn component_histogram(world: &World) -> BTreeMap<ComponentKind, usize> {
        let mut histogram = BTreeMap::new();
        for data in world.entities().values() {
            for kind in data.components.kinds() {
                *histogram.entry(kind).or_insert(0) += 1;
            }
        }
        histogram
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub frame: u64,
    /// Seconds, as last passed to `World::tick`.
    pub elapsed: f64,
    pub entity_count: usize,
    /// Registered systems in execution order.
    pub systems: Vec<String>,
    pub pending_events: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: frame={} elapsed={:.3}s entities={} systems=[{}] pending_events={}",
            self.frame,
            self.elapsed,
            self.entity_count,
            self.systems.join(", "),
            self.pending_events
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub archetype: Option<ArchetypeKind>,
    pub parent: Option<EntityId>,
    pub children: usize,
    pub components: Vec<ComponentKind>,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let archetype = self.archetype.map_or("-", ArchetypeKind::name);
        let components: Vec<_> = self.components.iter().map(|k| k.name()).collect();
        write!(
            f,
            "Entity [{}] {archetype} pos=({:.2}, {:.2}, {:.2}) children={} components=[{}]",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.children,
            components.join(", "),
        )
    }
}
