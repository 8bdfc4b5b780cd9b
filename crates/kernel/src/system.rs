use vrscene_common::EntityId;
use vrscene_ecs::{ComponentKind, ComponentSet};

use crate::world::World;

/// Timing handed to every system during one tick. Both values are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub delta: f32,
    pub elapsed: f64,
    /// 1-based index of the tick being run.
    pub frame: u64,
}

/// Component predicate selecting the entities a system processes.
///
/// An entity matches when it carries every `with` kind and none of the
/// `without` kinds. The empty query matches every entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    with: Vec<ComponentKind>,
    without: Vec<ComponentKind>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ComponentKind) -> Self {
        if !self.with.contains(&kind) {
            self.with.push(kind);
        }
        self
    }

    pub fn without(mut self, kind: ComponentKind) -> Self {
        if !self.without.contains(&kind) {
            self.without.push(kind);
        }
        self
    }

    pub fn matches(&self, components: &ComponentSet) -> bool {
        self.with.iter().all(|k| components.contains(*k))
            && !self.without.iter().any(|k| components.contains(*k))
    }

    /// Every kind the query mentions.
    pub fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.with.iter().chain(self.without.iter()).copied()
    }
}

/// A unit of per-frame logic.
///
/// Systems are executed in registration order. They receive the world and the
/// ids matching [`System::query`] at the moment they are invoked; writes they
/// make are visible to every system that runs after them in the same tick.
pub trait System: std::fmt::Debug {
    /// Human-readable name, unique within a world.
    fn name(&self) -> &str;

    /// Entities this system wants to process.
    fn query(&self) -> Query;

    /// Called once per tick.
    fn run(&mut self, world: &mut World, matched: &[EntityId], time: FrameTime);
}
