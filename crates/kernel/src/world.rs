use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vrscene_common::{EntityId, NodeHandle, Transform};
use vrscene_ecs::{ArchetypeKind, Component, ComponentData, ComponentKind, ComponentSet};

use crate::error::{ConfigurationError, WorldError};
use crate::registry::Registry;
use crate::system::{FrameTime, Query, System};

/// An event record produced by every structural mutation to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was created, optionally with an archetype.
    Spawned {
        id: EntityId,
        archetype: Option<ArchetypeKind>,
    },
    /// Entity was removed along with all its components.
    Despawned { id: EntityId },
    ComponentAdded { id: EntityId, kind: ComponentKind },
    ComponentReplaced { id: EntityId, kind: ComponentKind },
    ComponentRemoved { id: EntityId, kind: ComponentKind },
    /// Entity was attached under `parent` (or detached when `None`).
    Parented {
        child: EntityId,
        parent: Option<EntityId>,
    },
    /// All systems ran once.
    Ticked { frame: u64, delta: f32 },
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub archetype: Option<ArchetypeKind>,
    /// Host node backing this entity's archetype, once the host built it.
    pub primitive: Option<NodeHandle>,
    pub transform: Transform,
    pub parent: Option<EntityId>,
    pub components: ComponentSet,
}

/// The container for one running scene.
///
/// Owns the registry, every live entity with its components, and the fixed
/// system execution order. All mutations go through explicit operations and
/// are recorded in an event log.
#[derive(Debug, Default)]
pub struct World {
    registry: Registry,
    entities: BTreeMap<EntityId, EntityData>,
    systems: Vec<Box<dyn System>>,
    /// Set by the first entity creation; closes registration for good.
    sealed: bool,
    frame: u64,
    elapsed: f64,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an empty world with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registration ---

    /// Allow entities of `archetype`. Only while no entity exists.
    pub fn register_archetype(
        &mut self,
        archetype: ArchetypeKind,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open(|| format!("archetype `{archetype}`"))?;
        self.registry.add_archetype(archetype)?;
        Ok(self)
    }

    /// Allow components of `kind`. Only while no entity exists.
    pub fn register_component(
        &mut self,
        kind: ComponentKind,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open(|| format!("component `{kind}`"))?;
        self.registry.add_component(kind)?;
        Ok(self)
    }

    /// Append `system` to the execution order.
    pub fn register_system(
        &mut self,
        system: impl System + 'static,
    ) -> Result<&mut Self, ConfigurationError> {
        self.register_boxed_system(Box::new(system))
    }

    pub fn register_boxed_system(
        &mut self,
        system: Box<dyn System>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_open(|| format!("system `{}`", system.name()))?;
        if self.systems.iter().any(|s| s.name() == system.name()) {
            return Err(ConfigurationError::DuplicateSystem(system.name().to_string()));
        }
        if let Some(kind) = system
            .query()
            .kinds()
            .find(|k| !self.registry.has_component(*k))
        {
            return Err(ConfigurationError::UnregisteredComponent(kind));
        }
        tracing::debug!(system = system.name(), order = self.systems.len(), "system registered");
        self.systems.push(system);
        Ok(self)
    }

    fn ensure_open(&self, item: impl FnOnce() -> String) -> Result<(), ConfigurationError> {
        if self.sealed {
            return Err(ConfigurationError::RegistrationClosed { item: item() });
        }
        Ok(())
    }

    /// Whether registration calls are still accepted.
    pub fn registration_open(&self) -> bool {
        !self.sealed
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Registered system names in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    // --- Entities ---

    /// Allocate a new entity, optionally shaped by a registered archetype.
    pub fn create_entity(
        &mut self,
        archetype: Option<ArchetypeKind>,
    ) -> Result<EntityMut<'_>, WorldError> {
        if let Some(a) = archetype {
            if !self.registry.has_archetype(a) {
                return Err(ConfigurationError::UnregisteredArchetype(a).into());
            }
        }
        let id = EntityId::new();
        self.sealed = true;
        self.entities.insert(
            id,
            EntityData {
                archetype,
                ..EntityData::default()
            },
        );
        self.event_log.push(WorldEvent::Spawned { id, archetype });
        Ok(EntityMut { world: self, id })
    }

    /// Fluent access to an existing entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<EntityMut<'_>, WorldError> {
        if !self.entities.contains_key(&id) {
            return Err(WorldError::EntityNotFound(id));
        }
        Ok(EntityMut { world: self, id })
    }

    /// Attach `component`, replacing any instance of the same kind.
    /// Returns the entity for chaining.
    pub fn add_component(
        &mut self,
        id: EntityId,
        component: impl Into<Component>,
    ) -> Result<EntityId, WorldError> {
        let component = component.into();
        let kind = component.kind();
        if !self.registry.has_component(kind) {
            return Err(ConfigurationError::UnregisteredComponent(kind).into());
        }
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        let event = match data.components.insert(component) {
            Some(_) => WorldEvent::ComponentReplaced { id, kind },
            None => WorldEvent::ComponentAdded { id, kind },
        };
        self.event_log.push(event);
        Ok(id)
    }

    pub fn remove_component(
        &mut self,
        id: EntityId,
        kind: ComponentKind,
    ) -> Result<Option<Component>, WorldError> {
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        let removed = data.components.remove(kind);
        if removed.is_some() {
            self.event_log.push(WorldEvent::ComponentRemoved { id, kind });
        }
        Ok(removed)
    }

    /// Detach every component and drop the entity. Children are orphaned,
    /// not removed. The host objects it referenced are left alone.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<EntityData, WorldError> {
        let mut data = self
            .entities
            .remove(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        for component in data.components.clear() {
            self.event_log.push(WorldEvent::ComponentRemoved {
                id,
                kind: component.kind(),
            });
        }
        for (child, child_data) in self.entities.iter_mut() {
            if child_data.parent == Some(id) {
                child_data.parent = None;
                self.event_log.push(WorldEvent::Parented {
                    child: *child,
                    parent: None,
                });
            }
        }
        self.event_log.push(WorldEvent::Despawned { id });
        Ok(data)
    }

    /// Put `child` under `parent` in the world hierarchy. Fails if `parent`
    /// is `child` itself or one of its descendants.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), WorldError> {
        if let Some(p) = parent {
            if !self.entities.contains_key(&p) {
                return Err(WorldError::EntityNotFound(p));
            }
            if !self.entities.contains_key(&child) {
                return Err(WorldError::EntityNotFound(child));
            }
            let mut cursor = Some(p);
            while let Some(ancestor) = cursor {
                if ancestor == child {
                    return Err(WorldError::ParentCycle { child, parent: p });
                }
                cursor = self.entities.get(&ancestor).and_then(|d| d.parent);
            }
        }
        let data = self
            .entities
            .get_mut(&child)
            .ok_or(WorldError::EntityNotFound(child))?;
        data.parent = parent;
        self.event_log.push(WorldEvent::Parented { child, parent });
        Ok(())
    }

    pub fn children(&self, parent: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, d)| d.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Record the host node backing `id`.
    pub fn set_primitive(&mut self, id: EntityId, node: NodeHandle) -> Result<(), WorldError> {
        let data = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        data.primitive = Some(node);
        Ok(())
    }

    /// Update an entity's transform. Returns false if the entity is unknown.
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> bool {
        match self.entities.get_mut(&id) {
            Some(data) => {
                data.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Entity record, or `None` if `id` is not alive.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Mutable entity record. Edits made here are not logged as events.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Typed component of an entity.
    pub fn component<T: ComponentData>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(&id)?.components.get::<T>()
    }

    /// Typed mutable component of an entity.
    pub fn component_mut<T: ComponentData>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&id)?.components.get_mut::<T>()
    }

    pub fn has_component(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|d| d.components.contains(kind))
    }

    /// Ids of every entity matching `query`, in canonical order.
    pub fn query(&self, query: &Query) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, d)| query.matches(&d.components))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    // --- Frame ---

    /// Number of ticks run so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Elapsed seconds passed to the most recent tick.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Run every registered system once, in registration order.
    ///
    /// Each system gets the entities matching its query as the world stands
    /// when it starts, so it observes everything earlier systems wrote.
    pub fn tick(&mut self, delta: f32, elapsed: f64) {
        self.frame += 1;
        self.elapsed = elapsed;
        let _span = tracing::debug_span!("world_tick", frame = self.frame).entered();
        let time = FrameTime {
            delta,
            elapsed,
            frame: self.frame,
        };

        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            let matched = self.query(&system.query());
            tracing::trace!(system = system.name(), matched = matched.len(), "running system");
            system.run(self, &matched, time);
        }
        // Keep anything registered while the systems were detached.
        systems.append(&mut self.systems);
        self.systems = systems;

        self.event_log.push(WorldEvent::Ticked {
            frame: self.frame,
            delta,
        });
    }

    // --- Events ---

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }
}

/// Fluent handle to one entity, returned by [`World::create_entity`].
pub struct EntityMut<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> EntityMut<'w> {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component and keep chaining.
    pub fn with(self, component: impl Into<Component>) -> Result<Self, WorldError> {
        self.world.add_component(self.id, component)?;
        Ok(self)
    }

    pub fn with_transform(self, transform: Transform) -> Self {
        self.world.set_transform(self.id, transform);
        self
    }

    pub fn with_parent(self, parent: EntityId) -> Result<Self, WorldError> {
        self.world.set_parent(self.id, Some(parent))?;
        Ok(self)
    }

    pub fn with_primitive(self, node: NodeHandle) -> Result<Self, WorldError> {
        self.world.set_primitive(self.id, node)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use vrscene_ecs::{Held, Holdable, Hoverable, Interactor, PhysicsBody};

    type Log = Rc<RefCell<Vec<(String, Vec<EntityId>, FrameTime)>>>;

    /// Records every invocation into a shared log.
    #[derive(Debug)]
    struct Recorder {
        name: String,
        query: Query,
        log: Log,
    }

    impl Recorder {
        fn new(name: &str, query: Query, log: &Log) -> Self {
            Self {
                name: name.to_string(),
                query,
                log: Rc::clone(log),
            }
        }
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn query(&self) -> Query {
            self.query.clone()
        }

        fn run(&mut self, _world: &mut World, matched: &[EntityId], time: FrameTime) {
            self.log
                .borrow_mut()
                .push((self.name.clone(), matched.to_vec(), time));
        }
    }

    /// Marks every hoverable entity as held by "rightHand".
    #[derive(Debug)]
    struct Grabber;

    impl System for Grabber {
        fn name(&self) -> &str {
            "grabber"
        }

        fn query(&self) -> Query {
            Query::new().with(ComponentKind::Hoverable)
        }

        fn run(&mut self, world: &mut World, matched: &[EntityId], _time: FrameTime) {
            for id in matched {
                world
                    .add_component(
                        *id,
                        Held {
                            interactor: "rightHand".into(),
                        },
                    )
                    .unwrap();
            }
        }
    }

    /// Removes every entity it matches.
    #[derive(Debug)]
    struct Reaper;

    impl System for Reaper {
        fn name(&self) -> &str {
            "reaper"
        }

        fn query(&self) -> Query {
            Query::new().with(ComponentKind::Held)
        }

        fn run(&mut self, world: &mut World, matched: &[EntityId], _time: FrameTime) {
            for id in matched {
                world.remove_entity(*id).unwrap();
            }
        }
    }

    fn registered_world() -> World {
        let mut world = World::new();
        for a in ArchetypeKind::ALL {
            world.register_archetype(a).unwrap();
        }
        for k in ComponentKind::ALL {
            world.register_component(*k).unwrap();
        }
        world
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.frame(), 0);
        assert_eq!(w.entity_count(), 0);
        assert!(w.registration_open());
    }

    #[test]
    fn registration_chains() {
        let mut w = World::new();
        w.register_archetype(ArchetypeKind::Scene)
            .unwrap()
            .register_component(ComponentKind::Interactor)
            .unwrap();
        assert!(w.registry().has_archetype(ArchetypeKind::Scene));
        assert!(w.registry().has_component(ComponentKind::Interactor));
    }

    #[test]
    fn registration_fails_after_first_entity() {
        let mut w = registered_world();
        w.create_entity(None).unwrap();
        assert!(!w.registration_open());

        let err = w.register_archetype(ArchetypeKind::Bone);
        assert!(matches!(err, Err(ConfigurationError::RegistrationClosed { .. })));
        let log = Log::default();
        let err = w.register_system(Recorder::new("late", Query::new(), &log));
        assert!(matches!(err, Err(ConfigurationError::RegistrationClosed { .. })));
    }

    #[test]
    fn registration_stays_closed_after_removal() {
        let mut w = registered_world();
        let id = w.create_entity(None).unwrap().id();
        w.remove_entity(id).unwrap();
        assert_eq!(w.entity_count(), 0);
        assert!(w.register_component(ComponentKind::Held).is_err());
    }

    #[test]
    fn unregistered_archetype_is_rejected() {
        let mut w = World::new();
        let err = w.create_entity(Some(ArchetypeKind::Mesh)).err();
        assert_eq!(
            err,
            Some(WorldError::Configuration(
                ConfigurationError::UnregisteredArchetype(ArchetypeKind::Mesh)
            ))
        );
        // A rejected creation does not close registration.
        assert!(w.registration_open());
    }

    #[test]
    fn unregistered_component_is_rejected() {
        let mut w = World::new();
        let id = w.create_entity(None).unwrap().id();
        let err = w.add_component(id, Hoverable).unwrap_err();
        assert_eq!(
            err,
            WorldError::Configuration(ConfigurationError::UnregisteredComponent(
                ComponentKind::Hoverable
            ))
        );
    }

    #[test]
    fn add_component_chains_and_replaces() {
        let mut w = registered_world();
        let id = w
            .create_entity(None)
            .unwrap()
            .with(Interactor::new("leftHand"))
            .unwrap()
            .with(Interactor::new("rightHand"))
            .unwrap()
            .id();
        assert_eq!(w.component::<Interactor>(id).unwrap().id, "rightHand");
        assert_eq!(w.get(id).unwrap().components.len(), 1);
        assert!(w
            .events()
            .contains(&WorldEvent::ComponentReplaced { id, kind: ComponentKind::Interactor }));
    }

    #[test]
    fn add_component_to_missing_entity() {
        let mut w = registered_world();
        let ghost = EntityId::new();
        assert_eq!(
            w.add_component(ghost, Hoverable),
            Err(WorldError::EntityNotFound(ghost))
        );
    }

    #[test]
    fn set_parent_rejects_cycles() {
        let mut w = registered_world();
        let a = w.create_entity(None).unwrap().id();
        let b = w.create_entity(None).unwrap().id();
        let c = w.create_entity(None).unwrap().id();
        w.set_parent(b, Some(a)).unwrap();
        w.set_parent(c, Some(b)).unwrap();

        assert_eq!(
            w.set_parent(a, Some(a)),
            Err(WorldError::ParentCycle { child: a, parent: a })
        );
        assert_eq!(
            w.set_parent(a, Some(c)),
            Err(WorldError::ParentCycle { child: a, parent: c })
        );
        assert_eq!(w.get(a).unwrap().parent, None);

        // Moving a subtree sideways is fine.
        w.set_parent(c, Some(a)).unwrap();
        assert_eq!(w.children(a), {
            let mut ids = vec![b, c];
            ids.sort();
            ids
        });
    }

    #[test]
    fn remove_entity_detaches_components_and_orphans_children() {
        let mut w = registered_world();
        let parent = w.create_entity(Some(ArchetypeKind::Scene)).unwrap().id();
        let child = w
            .create_entity(Some(ArchetypeKind::Mesh))
            .unwrap()
            .with(Hoverable)
            .unwrap()
            .with(Holdable)
            .unwrap()
            .with_parent(parent)
            .unwrap()
            .id();
        assert_eq!(w.children(parent), vec![child]);

        let data = w.remove_entity(child).unwrap();
        assert!(data.components.is_empty());
        assert!(!w.contains(child));

        let child2 = w.create_entity(None).unwrap().with_parent(parent).unwrap().id();
        w.remove_entity(parent).unwrap();
        assert_eq!(w.get(child2).unwrap().parent, None);
    }

    #[test]
    fn remove_component_reports_previous_value() {
        let mut w = registered_world();
        let id = w.create_entity(None).unwrap().with(PhysicsBody::default()).unwrap().id();
        let removed = w.remove_component(id, ComponentKind::PhysicsBody).unwrap();
        assert!(matches!(removed, Some(Component::PhysicsBody(_))));
        assert_eq!(w.remove_component(id, ComponentKind::PhysicsBody).unwrap(), None);
    }

    #[test]
    fn tick_runs_systems_in_registration_order_with_same_time() {
        let log = Log::default();
        let mut w = registered_world();
        w.register_system(Recorder::new("first", Query::new(), &log)).unwrap();
        w.register_system(Recorder::new("second", Query::new(), &log)).unwrap();
        w.register_system(Recorder::new("third", Query::new(), &log)).unwrap();

        w.tick(0.016, 1.5);

        let log = log.borrow();
        let names: Vec<_> = log.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        for (_, _, time) in log.iter() {
            assert_eq!(time.delta, 0.016);
            assert_eq!(time.elapsed, 1.5);
            assert_eq!(time.frame, 1);
        }
        assert_eq!(w.frame(), 1);
    }

    #[test]
    fn later_systems_see_earlier_writes_in_same_tick() {
        let log = Log::default();
        let mut w = registered_world();
        w.register_system(Grabber).unwrap();
        w.register_system(Recorder::new("held", Query::new().with(ComponentKind::Held), &log))
            .unwrap();
        let id = w.create_entity(None).unwrap().with(Hoverable).unwrap().id();

        w.tick(0.016, 0.016);

        assert_eq!(log.borrow()[0].1, vec![id]);
    }

    #[test]
    fn removed_entity_is_absent_from_later_systems() {
        let log = Log::default();
        let mut w = registered_world();
        w.register_system(Reaper).unwrap();
        w.register_system(Recorder::new("all", Query::new(), &log)).unwrap();
        let keep = w.create_entity(None).unwrap().id();
        let doomed = w
            .create_entity(None)
            .unwrap()
            .with(Held::default())
            .unwrap()
            .id();

        w.tick(0.016, 0.016);
        assert_eq!(log.borrow()[0].1, vec![keep]);
        assert!(!w.contains(doomed));

        w.tick(0.016, 0.032);
        assert_eq!(log.borrow()[1].1, vec![keep]);
    }

    #[test]
    fn externally_removed_entity_skipped_next_tick() {
        let log = Log::default();
        let mut w = registered_world();
        w.register_system(Recorder::new("hover", Query::new().with(ComponentKind::Hoverable), &log))
            .unwrap();
        let a = w.create_entity(None).unwrap().with(Hoverable).unwrap().id();
        let b = w.create_entity(None).unwrap().with(Hoverable).unwrap().id();
        w.tick(0.016, 0.016);
        assert_eq!(log.borrow()[0].1.len(), 2);

        w.remove_entity(a).unwrap();
        w.tick(0.016, 0.032);
        assert_eq!(log.borrow()[1].1, vec![b]);
    }

    #[test]
    fn duplicate_system_name_rejected() {
        let log = Log::default();
        let mut w = World::new();
        w.register_system(Recorder::new("dup", Query::new(), &log)).unwrap();
        let err = w.register_system(Recorder::new("dup", Query::new(), &log)).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateSystem("dup".into()));
    }

    #[test]
    fn events_are_recorded_and_drained() {
        let mut w = registered_world();
        let id = w.create_entity(None).unwrap().with(Hoverable).unwrap().id();
        w.tick(0.016, 0.016);
        let events = w.drain_events();
        assert_eq!(
            events,
            vec![
                WorldEvent::Spawned { id, archetype: None },
                WorldEvent::ComponentAdded { id, kind: ComponentKind::Hoverable },
                WorldEvent::Ticked { frame: 1, delta: 0.016 },
            ]
        );
        assert!(w.events().is_empty());
    }

    #[test]
    fn set_parent_requires_existing_parent() {
        let mut w = registered_world();
        let child = w.create_entity(None).unwrap().id();
        let ghost = EntityId::new();
        assert_eq!(
            w.set_parent(child, Some(ghost)),
            Err(WorldError::EntityNotFound(ghost))
        );
    }

    fn register_op(world: &mut World, op: u8, i: usize) -> Result<(), ConfigurationError> {
        match op {
            0 => world
                .register_archetype(ArchetypeKind::ALL[i % ArchetypeKind::ALL.len()])
                .map(|_| ()),
            1 => world
                .register_component(ComponentKind::ALL[i % ComponentKind::ALL.len()])
                .map(|_| ()),
            _ => {
                let log = Log::default();
                world
                    .register_system(Recorder::new(&format!("system-{i}"), Query::new(), &log))
                    .map(|_| ())
            }
        }
    }

    proptest! {
        #[test]
        fn registration_closes_after_first_entity(
            before in prop::collection::vec(0u8..3, 0..24),
            after in prop::collection::vec(0u8..3, 1..12),
        ) {
            let mut world = World::new();
            for (i, op) in before.iter().enumerate() {
                // Duplicates are allowed to fail here; only closure matters.
                let _ = register_op(&mut world, *op, i);
            }
            world.create_entity(None).unwrap();
            for (i, op) in after.iter().enumerate() {
                let result = register_op(&mut world, *op, i + 100);
                let closed = matches!(result, Err(ConfigurationError::RegistrationClosed { .. }));
                prop_assert!(closed);
            }
        }
    }
}
