//! World Kernel: the container owning every entity, component, and system of
//! a running scene.
//!
//! # Invariants
//! - Archetypes, components, and systems are registered before the first
//!   entity is created; afterwards registration fails with
//!   [`ConfigurationError::RegistrationClosed`].
//! - [`World::tick`] runs each system exactly once, in registration order.
//!   A system sees every write made by systems registered before it in the
//!   same tick.
//! - Matching sets are computed when each system is invoked, so a removed
//!   entity is never handed to a later system.
//! - Host handles stored on entities are references; the world never frees
//!   the objects behind them.

pub mod error;
pub mod registry;
pub mod system;
pub mod world;

pub use error::{ConfigurationError, WorldError};
pub use registry::{Registry, WorldBuilder};
pub use system::{FrameTime, Query, System};
pub use world::{EntityData, EntityMut, World, WorldEvent};
