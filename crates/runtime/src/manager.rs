use vrscene_input::{CommandQueue, InputEvent, KeyBindings, SceneCommand};
use vrscene_kernel::{World, WorldError};

use crate::bootstrap::{BootstrapError, Scene, SceneBootstrap};
use crate::config::SceneConfig;
use crate::gate::InitGate;
use crate::host::{Host, SystemSource};
use crate::spawner::BoxSpawner;

/// What a call to [`WorldManager::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// The readiness subsystem is not up yet (or a resource is still
    /// pending); no world work happened.
    NotReady,
    /// Bootstrap ran in this call, followed by the frame's systems.
    Bootstrapped,
    Ran,
}

/// Errors surfaced to the host by the frame driver.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("scene bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
    #[error("scene command failed: {0}")]
    Command(#[from] WorldError),
}

/// Owns the host handle, the deferred-init gate around the scene, and the
/// spawn command queue. The host calls [`tick`](Self::tick) once per frame
/// and forwards key events to [`handle_input`](Self::handle_input).
pub struct WorldManager<H> {
    host: H,
    config: SceneConfig,
    systems: Box<dyn SystemSource>,
    gate: InitGate<Scene>,
    spawner: BoxSpawner,
    bindings: KeyBindings,
    commands: CommandQueue,
    /// Last fatal bootstrap error, so a repeat is not logged every frame.
    bootstrap_error: Option<BootstrapError>,
}

impl<H: Host> WorldManager<H> {
    /// `systems` is asked for the frame systems once, when bootstrap runs.
    pub fn new(host: H, config: SceneConfig, systems: impl SystemSource + 'static) -> Self {
        let bindings =
            KeyBindings::new().bind(config.spawner.trigger_key.clone(), SceneCommand::SpawnBox);
        Self {
            gate: InitGate::new(config.readiness_subsystem.clone()),
            spawner: BoxSpawner::new(config.spawner.clone()),
            bindings,
            commands: CommandQueue::new(),
            bootstrap_error: None,
            systems: Box::new(systems),
            config,
            host,
        }
    }

    /// Advance one frame. Times are in milliseconds and reach systems in
    /// seconds.
    ///
    /// Order within a ready frame: bootstrap (first time only), queued
    /// commands, then every system once. A failing command does not stop
    /// the others or the systems; the first such error is returned after
    /// the frame has run.
    pub fn tick(&mut self, delta_ms: f64, elapsed_ms: f64) -> Result<FrameStatus, RuntimeError> {
        let Self {
            host,
            config,
            systems,
            gate,
            spawner,
            commands,
            bootstrap_error,
            ..
        } = self;

        let bootstrapping = !gate.is_initialized();
        let polled = gate.poll(&mut *host, |host| {
            SceneBootstrap::new(config).run(host, &mut **systems)
        });
        let scene = match polled {
            Ok(Some(scene)) => scene,
            Ok(None) => return Ok(FrameStatus::NotReady),
            Err(err) if err.is_retryable() => {
                tracing::debug!(%err, "bootstrap deferred");
                return Ok(FrameStatus::NotReady);
            }
            Err(err) => {
                if bootstrap_error.as_ref() != Some(&err) {
                    tracing::error!(%err, "bootstrap failed");
                    *bootstrap_error = Some(err.clone());
                }
                return Err(err.into());
            }
        };
        if bootstrapping {
            *bootstrap_error = None;
        }

        let _span = tracing::debug_span!("frame", frame = scene.world.frame() + 1).entered();
        let mut failed = None;
        for command in commands.drain() {
            let applied = match command {
                SceneCommand::SpawnBox => spawner
                    .spawn(&mut scene.world, &mut *host, &scene.handles)
                    .map(|_| ()),
            };
            if let Err(err) = applied {
                tracing::warn!(?command, %err, "scene command failed");
                failed.get_or_insert(err);
            }
        }

        scene.world.tick((delta_ms / 1000.0) as f32, elapsed_ms / 1000.0);
        for event in scene.world.drain_events() {
            tracing::trace!(?event, "world event");
        }

        if let Some(err) = failed {
            return Err(err.into());
        }
        Ok(if bootstrapping {
            FrameStatus::Bootstrapped
        } else {
            FrameStatus::Ran
        })
    }

    /// Route a host input event. Bound events enqueue a command for the next
    /// tick; nothing is bound until the scene exists. Returns whether a
    /// command was queued.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        if !self.gate.is_initialized() {
            tracing::trace!(?event, "input before bootstrap ignored");
            return false;
        }
        self.bindings.dispatch(event, &self.commands)
    }

    /// The command queue drained at the start of each ready tick.
    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_initialized()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.gate.get()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.gate.get_mut()
    }

    pub fn world(&self) -> Option<&World> {
        self.scene().map(|s| &s.world)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn bootstrap_attempts(&self) -> u64 {
        self.gate.attempts()
    }

    pub fn readiness_polls(&self) -> u64 {
        self.gate.polls()
    }

    /// The last fatal bootstrap error, kept until bootstrap succeeds.
    pub fn bootstrap_error(&self) -> Option<&BootstrapError> {
        self.bootstrap_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, HeadlessPhysics};
    use crate::host::SceneGraph;
    use crate::systems::{ConstrainOnHeldSystem, PhysicsSystem, RotationSystem};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use vrscene_common::EntityId;
    use vrscene_kernel::{FrameTime, Query, System};

    /// Records every invocation.
    #[derive(Debug)]
    struct Tally {
        runs: Rc<RefCell<Vec<FrameTime>>>,
    }

    impl System for Tally {
        fn name(&self) -> &str {
            "tally"
        }

        fn query(&self) -> Query {
            Query::new()
        }

        fn run(&mut self, _world: &mut World, _matched: &[EntityId], time: FrameTime) {
            self.runs.borrow_mut().push(time);
        }
    }

    struct Harness {
        manager: WorldManager<HeadlessHost>,
        builds: Rc<Cell<u32>>,
        runs: Rc<RefCell<Vec<FrameTime>>>,
    }

    fn harness(host: HeadlessHost) -> Harness {
        let builds = Rc::new(Cell::new(0));
        let runs = Rc::new(RefCell::new(Vec::new()));
        let source = {
            let builds = Rc::clone(&builds);
            let runs = Rc::clone(&runs);
            move || -> Vec<Box<dyn System>> {
                builds.set(builds.get() + 1);
                vec![Box::new(Tally {
                    runs: Rc::clone(&runs),
                })]
            }
        };
        Harness {
            manager: WorldManager::new(host, SceneConfig::default(), source),
            builds,
            runs,
        }
    }

    fn not_ready_rig() -> HeadlessHost {
        let mut host = HeadlessHost::with_default_rig();
        host.set_ready("physics", false);
        host
    }

    #[test]
    fn bootstrap_waits_for_readiness_then_runs_once() {
        let mut h = harness(not_ready_rig());

        for _ in 0..10 {
            assert_eq!(h.manager.tick(16.0, 0.0).unwrap(), FrameStatus::NotReady);
        }
        assert!(h.manager.world().is_none());
        assert_eq!(h.builds.get(), 0);
        assert!(h.runs.borrow().is_empty());

        h.manager.host_mut().set_ready("physics", true);
        assert_eq!(h.manager.tick(16.0, 176.0).unwrap(), FrameStatus::Bootstrapped);
        assert_eq!(h.manager.readiness_polls(), 11);

        for _ in 0..5 {
            assert_eq!(h.manager.tick(16.0, 200.0).unwrap(), FrameStatus::Ran);
        }
        assert_eq!(h.builds.get(), 1);
        assert_eq!(h.manager.bootstrap_attempts(), 1);
        assert_eq!(h.runs.borrow().len(), 6);
    }

    #[test]
    fn systems_run_in_the_bootstrap_tick_with_seconds() {
        let mut h = harness(HeadlessHost::with_default_rig());
        assert_eq!(h.manager.tick(16.0, 250.0).unwrap(), FrameStatus::Bootstrapped);

        let runs = h.runs.borrow();
        assert_eq!(runs.len(), 1);
        assert!((runs[0].delta - 0.016).abs() < 1e-6);
        assert!((runs[0].elapsed - 0.25).abs() < 1e-9);
        assert_eq!(runs[0].frame, 1);
    }

    #[test]
    fn bootstrap_creates_five_entities() {
        let mut h = harness(HeadlessHost::with_default_rig());
        h.manager.tick(16.0, 16.0).unwrap();
        assert_eq!(h.manager.world().unwrap().entity_count(), 5);
    }

    #[test]
    fn missing_hand_controller_aborts_without_residue() {
        let mut host = HeadlessHost::with_default_rig();
        host.remove_element("player-left-controller");
        let mut h = harness(host);

        let err = h.manager.tick(16.0, 16.0).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Bootstrap(BootstrapError::MissingExternalResource { .. })
        ));
        assert!(!h.manager.is_initialized());
        assert!(h.manager.world().is_none());
        let root = h.manager.host().root();
        assert!(h.manager.host().children(root).is_empty());
        assert_eq!(h.builds.get(), 0);

        // Repeats keep the same recorded error.
        assert!(h.manager.tick(16.0, 32.0).is_err());
        assert_eq!(
            h.manager.bootstrap_error(),
            Some(&BootstrapError::MissingExternalResource {
                id: "player-left-controller".into()
            })
        );

        // Fixing the host lets a later tick succeed.
        h.manager.host_mut().add_element("player-left-controller");
        assert_eq!(h.manager.tick(16.0, 48.0).unwrap(), FrameStatus::Bootstrapped);
        assert_eq!(h.manager.bootstrap_attempts(), 3);
        assert!(h.manager.bootstrap_error().is_none());
    }

    #[test]
    fn pending_controller_is_treated_as_not_ready() {
        let mut host = HeadlessHost::with_default_rig();
        host.mark_pending("player-right-controller");
        let mut h = harness(host);

        assert_eq!(h.manager.tick(16.0, 16.0).unwrap(), FrameStatus::NotReady);
        assert!(!h.manager.is_initialized());
        assert!(h.manager.bootstrap_error().is_none());

        h.manager.host_mut().add_element("player-right-controller");
        assert_eq!(h.manager.tick(16.0, 32.0).unwrap(), FrameStatus::Bootstrapped);
    }

    #[test]
    fn key_presses_spawn_on_the_next_tick() {
        let mut h = harness(HeadlessHost::with_default_rig());
        h.manager.tick(16.0, 16.0).unwrap();

        for _ in 0..3 {
            assert!(h.manager.handle_input(&InputEvent::key_up("j")));
        }
        assert!(!h.manager.handle_input(&InputEvent::key_down("j")));
        assert!(!h.manager.handle_input(&InputEvent::key_up("k")));
        assert_eq!(h.manager.world().unwrap().entity_count(), 5);
        assert_eq!(h.manager.commands().len(), 3);

        h.manager.tick(16.0, 32.0).unwrap();
        let scene = h.manager.scene().unwrap();
        assert_eq!(scene.world.entity_count(), 8);
        assert_eq!(scene.world.children(scene.handles.root).len(), 3);
        assert!(h.manager.commands().is_empty());
    }

    #[test]
    fn failed_spawns_do_not_skip_the_frame() {
        let mut h = harness(HeadlessHost::with_default_rig());
        h.manager.tick(16.0, 16.0).unwrap();

        let scene = h.manager.scene_mut().unwrap();
        let root = scene.handles.root;
        scene.world.remove_entity(root).unwrap();

        h.manager.commands().push(SceneCommand::SpawnBox);
        h.manager.commands().push(SceneCommand::SpawnBox);
        let err = h.manager.tick(16.0, 32.0).unwrap_err();

        assert!(matches!(
            err,
            RuntimeError::Command(WorldError::EntityNotFound(id)) if id == root
        ));
        assert_eq!(h.runs.borrow().len(), 2);
        let world = h.manager.world().unwrap();
        assert_eq!(world.frame(), 2);
        assert_eq!(world.entity_count(), 4);
        assert!(h.manager.commands().is_empty());
    }

    #[test]
    fn input_before_bootstrap_is_ignored() {
        let h = harness(not_ready_rig());
        assert!(!h.manager.handle_input(&InputEvent::key_up("j")));
        assert!(h.manager.commands().is_empty());
    }

    #[test]
    fn queued_spawn_reaches_physics_in_the_same_tick() {
        let engine = Rc::new(RefCell::new(HeadlessPhysics::default()));
        let source = {
            let engine = Rc::clone(&engine);
            move || -> Vec<Box<dyn System>> {
                vec![
                    Box::new(ConstrainOnHeldSystem),
                    Box::new(PhysicsSystem::new(Rc::clone(&engine))),
                    Box::new(RotationSystem),
                ]
            }
        };
        let mut manager = WorldManager::new(not_ready_rig(), SceneConfig::default(), source);
        manager.commands().push(SceneCommand::SpawnBox);

        assert_eq!(manager.tick(16.0, 16.0).unwrap(), FrameStatus::NotReady);
        assert_eq!(manager.commands().len(), 1);

        manager.host_mut().set_ready("physics", true);
        assert_eq!(manager.tick(16.0, 32.0).unwrap(), FrameStatus::Bootstrapped);
        assert_eq!(manager.world().unwrap().entity_count(), 6);
        assert_eq!(
            manager.world().unwrap().system_names(),
            vec!["constrain-on-held", "physics", "rotation"]
        );
        // Only the spawned box lacked a body; interactor bodies are host owned.
        assert_eq!(engine.borrow().body_count(), 1);
    }
}
