//! Reference systems for the canonical frame order:
//! interaction (host supplied) → [`ConstrainOnHeldSystem`] →
//! [`PhysicsSystem`] → [`RotationSystem`].

use glam::Quat;
use vrscene_common::EntityId;
use vrscene_ecs::{
    ComponentKind, Held, Interactor, PhysicsBody, PhysicsConstraint, PhysicsShape, Rotating,
};
use vrscene_kernel::{FrameTime, Query, System, World};

use crate::host::PhysicsEngine;

/// Keeps a `PhysicsConstraint` on every `ConstrainOnHeld` entity exactly while
/// it is `Held`, targeting the holding interactor.
///
/// Must run after whatever writes `Held`, and before physics.
#[derive(Debug, Default)]
pub struct ConstrainOnHeldSystem;

impl ConstrainOnHeldSystem {
    fn interactor_entity(world: &World, interactor: &str) -> Option<EntityId> {
        world
            .query(&Query::new().with(ComponentKind::Interactor))
            .into_iter()
            .find(|id| world.component::<Interactor>(*id).is_some_and(|i| i.id == interactor))
    }
}

impl System for ConstrainOnHeldSystem {
    fn name(&self) -> &str {
        "constrain-on-held"
    }

    fn query(&self) -> Query {
        Query::new().with(ComponentKind::ConstrainOnHeld)
    }

    fn run(&mut self, world: &mut World, matched: &[EntityId], _time: FrameTime) {
        for &id in matched {
            let holder = world.component::<Held>(id).map(|h| h.interactor.clone());
            let constrained = world.component::<PhysicsConstraint>(id).map(|c| c.target);
            let target = holder
                .as_deref()
                .and_then(|interactor| Self::interactor_entity(world, interactor));

            match (target, constrained) {
                (Some(target), current) if current != Some(target) => {
                    if let Err(err) = world.add_component(id, PhysicsConstraint { target }) {
                        tracing::warn!(entity = %id, %err, "cannot constrain held entity");
                    } else {
                        tracing::debug!(entity = %id, holder = %target, "constrained to holder");
                    }
                }
                (None, Some(_)) => {
                    if let Err(err) = world.remove_component(id, ComponentKind::PhysicsConstraint) {
                        tracing::warn!(entity = %id, %err, "cannot release constraint");
                    } else {
                        tracing::debug!(entity = %id, "constraint released");
                    }
                }
                _ => {}
            }
        }
    }
}

/// Bridges `PhysicsBody` components to the host physics engine.
///
/// Bodies without an id are created in the engine; dirty bodies are pushed
/// and marked clean. The engine handle is fixed when the system is built.
#[derive(Debug)]
pub struct PhysicsSystem<E> {
    engine: E,
}

impl<E: PhysicsEngine> PhysicsSystem<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: PhysicsEngine + std::fmt::Debug> System for PhysicsSystem<E> {
    fn name(&self) -> &str {
        "physics"
    }

    fn query(&self) -> Query {
        Query::new().with(ComponentKind::PhysicsBody)
    }

    fn run(&mut self, world: &mut World, matched: &[EntityId], _time: FrameTime) {
        for &id in matched {
            let Some(data) = world.get(id) else { continue };
            let Some(body) = data.components.get::<PhysicsBody>().copied() else {
                continue;
            };
            let transform = data.transform;

            let synced = match body.uuid {
                None => {
                    let shape = data.components.get::<PhysicsShape>().copied();
                    let uuid = self.engine.create_body(shape.as_ref(), &transform);
                    tracing::debug!(entity = %id, ?uuid, "physics body created");
                    PhysicsBody {
                        uuid: Some(uuid),
                        needs_update: false,
                    }
                }
                Some(uuid) if body.needs_update => {
                    self.engine.sync_body(uuid, &transform);
                    PhysicsBody {
                        uuid: Some(uuid),
                        needs_update: false,
                    }
                }
                Some(_) => continue,
            };
            if let Some(slot) = world.component_mut::<PhysicsBody>(id) {
                *slot = synced;
            }
        }
    }
}

/// Spins `Rotating` entities about +Y.
#[derive(Debug, Default)]
pub struct RotationSystem;

impl System for RotationSystem {
    fn name(&self) -> &str {
        "rotation"
    }

    fn query(&self) -> Query {
        Query::new().with(ComponentKind::Rotating)
    }

    fn run(&mut self, world: &mut World, matched: &[EntityId], time: FrameTime) {
        for &id in matched {
            let Some(data) = world.get_mut(id) else { continue };
            let Some(speed) = data.components.get::<Rotating>().map(|r| r.speed) else {
                continue;
            };
            let spin = Quat::from_rotation_y(speed * time.delta);
            data.transform.rotation = spin * data.transform.rotation;
        }
    }
}
