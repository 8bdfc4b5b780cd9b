//! Runtime: everything between the host application and the world kernel.
//!
//! The host calls [`WorldManager::tick`] once per frame. Until the host
//! reports its readiness subsystem ready, ticks do nothing. The first ready
//! tick runs the [`SceneBootstrap`] (registration, scene root, the four
//! interaction sources) and then the frame's systems, all in the same call.
//! Input events become [`vrscene_input::SceneCommand`]s that are applied at
//! the start of the following tick.
//!
//! # Invariants
//! - Bootstrap succeeds at most once per manager.
//! - A failed bootstrap leaves neither world entities nor host nodes behind.
//! - Host objects are looked up and referenced, never created or destroyed,
//!   except for the primitives this crate asks the scene graph to build.

pub mod bootstrap;
pub mod config;
pub mod gate;
pub mod headless;
pub mod host;
pub mod manager;
pub mod spawner;
pub mod systems;

pub use bootstrap::{BootstrapError, InteractorHandle, Scene, SceneBootstrap, SceneHandles};
pub use config::{ConfigError, InteractionSource, SceneConfig, SpawnerConfig};
pub use gate::{GateState, InitGate};
pub use headless::{HeadlessHost, HeadlessNode, HeadlessPhysics};
pub use host::{
    Host, Lookup, NodeResolver, PhysicsEngine, ReadinessSignal, SceneGraph, SystemSource,
};
pub use manager::{FrameStatus, RuntimeError, WorldManager};
pub use spawner::BoxSpawner;
pub use systems::{ConstrainOnHeldSystem, PhysicsSystem, RotationSystem};
