//! Contracts the host application fulfils. The runtime reaches the outside
//! world only through these traits.

use glam::Vec3;
use std::cell::RefCell;
use std::rc::Rc;
use vrscene_common::{NodeHandle, PhysicsBodyId, Transform};
use vrscene_ecs::{PhysicsShape, Primitive};
use vrscene_kernel::System;

/// Result of looking up a host object by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    /// Not there yet, but expected once host startup progresses.
    Pending,
    /// Unknown identifier; waiting will not help.
    Missing,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Pending | Self::Missing => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Boolean readiness flags for named host subsystems.
pub trait ReadinessSignal {
    fn is_ready(&self, subsystem: &str) -> bool;
}

/// Finds host nodes by well-known identifier.
pub trait NodeResolver {
    fn resolve_node(&self, id: &str) -> Lookup<NodeHandle>;

    /// Physics body the host already associated with `node`.
    fn physics_body(&self, node: NodeHandle) -> Lookup<PhysicsBodyId>;
}

/// The host-owned scene graph used for rendering.
pub trait SceneGraph {
    /// The node every scene root is attached under.
    fn root(&self) -> NodeHandle;

    fn create_node(&mut self, primitive: &Primitive) -> NodeHandle;

    fn attach_child(&mut self, parent: NodeHandle, child: NodeHandle);

    fn set_position(&mut self, node: NodeHandle, position: Vec3);
}

/// Everything the runtime needs from the host.
pub trait Host: ReadinessSignal + NodeResolver + SceneGraph {}

impl<T: ReadinessSignal + NodeResolver + SceneGraph + ?Sized> Host for T {}

/// Produces the frame systems, in execution order, when the bootstrap
/// registers them. Called only once the host is ready, so systems can capture
/// host services (a physics engine) at construction.
pub trait SystemSource {
    fn build_systems(&mut self) -> Vec<Box<dyn System>>;
}

impl<F> SystemSource for F
where
    F: FnMut() -> Vec<Box<dyn System>>,
{
    fn build_systems(&mut self) -> Vec<Box<dyn System>> {
        self()
    }
}

/// The slice of a physics engine the physics system drives.
pub trait PhysicsEngine {
    fn create_body(&mut self, shape: Option<&PhysicsShape>, transform: &Transform) -> PhysicsBodyId;

    fn sync_body(&mut self, body: PhysicsBodyId, transform: &Transform);
}

impl<E: PhysicsEngine + ?Sized> PhysicsEngine for Rc<RefCell<E>> {
    fn create_body(
        &mut self,
        shape: Option<&PhysicsShape>,
        transform: &Transform,
    ) -> PhysicsBodyId {
        self.borrow_mut().create_body(shape, transform)
    }

    fn sync_body(&mut self, body: PhysicsBodyId, transform: &Transform) {
        self.borrow_mut().sync_body(body, transform);
    }
}
