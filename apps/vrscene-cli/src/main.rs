use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use vrscene_ecs::{ArchetypeKind, ComponentKind};
use vrscene_input::InputEvent;
use vrscene_kernel::System;
use vrscene_runtime::{
    ConstrainOnHeldSystem, FrameStatus, HeadlessHost, HeadlessPhysics, PhysicsSystem,
    RotationSystem, SceneConfig, WorldManager,
};
use vrscene_tools::{EntityInfo, WorldInspector, WorldSummary};

#[derive(Parser)]
#[command(name = "vrscene-cli", about = "Headless driver for the vrscene frame loop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and registry info
    Info,
    /// Print the scene configuration as JSON
    Config {
        /// Config file to load instead of the defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Drive the frame loop against an in-memory host
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Frame at which the readiness subsystem comes up (1-based)
        #[arg(long, default_value = "10")]
        ready_at: u64,
        /// Frames before which the trigger key is released; repeatable
        #[arg(long)]
        spawn_at: Vec<u64>,
        /// Frame duration in milliseconds
        #[arg(long, default_value = "16.0")]
        frame_ms: f64,
        /// Scene config file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Report {
    bootstrapped_at: Option<u64>,
    spawned: usize,
    physics_bodies: usize,
    summary: Option<WorldSummary>,
    components: BTreeMap<ComponentKind, usize>,
    entities: Vec<EntityInfo>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    match cli.command {
        Commands::Info => {
            println!("vrscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("archetypes: {}", ArchetypeKind::ALL.len());
            println!("components: {}", ComponentKind::ALL.len());
            let systems = ["interaction (host)", "constrain-on-held", "physics", "rotation"];
            println!("frame order: {}", systems.join(" -> "));
        }
        Commands::Config { config } => {
            let config = load_config(config)?;
            println!("{}", config.to_json_pretty()?);
        }
        Commands::Simulate {
            frames,
            ready_at,
            spawn_at,
            frame_ms,
            config,
            json,
        } => {
            let config = load_config(config)?;
            let report = simulate(config, frames, ready_at, &spawn_at, frame_ms)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading scene config {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn simulate(
    config: SceneConfig,
    frames: u64,
    ready_at: u64,
    spawn_at: &[u64],
    frame_ms: f64,
) -> anyhow::Result<Report> {
    let mut host = HeadlessHost::new();
    for source in &config.sources {
        host.add_element(&source.element_id);
    }

    let engine = Rc::new(RefCell::new(HeadlessPhysics::default()));
    let systems = {
        let engine = Rc::clone(&engine);
        move || -> Vec<Box<dyn System>> {
            vec![
                Box::new(ConstrainOnHeldSystem),
                Box::new(PhysicsSystem::new(Rc::clone(&engine))),
                Box::new(RotationSystem),
            ]
        }
    };

    let subsystem = config.readiness_subsystem.clone();
    let trigger = config.spawner.trigger_key.clone();
    let mut manager = WorldManager::new(host, config, systems);
    let mut bootstrapped_at = None;
    let mut spawned = 0;

    for frame in 1..=frames {
        if frame == ready_at {
            tracing::info!(frame, %subsystem, "host subsystem ready");
            manager.host_mut().set_ready(&subsystem, true);
        }
        if spawn_at.contains(&frame) {
            if manager.handle_input(&InputEvent::key_up(trigger.as_str())) {
                spawned += 1;
            } else {
                tracing::info!(frame, "spawn key ignored before bootstrap");
            }
        }

        let elapsed = frame as f64 * frame_ms;
        let status = manager
            .tick(frame_ms, elapsed)
            .with_context(|| format!("frame {frame}"))?;
        if status == FrameStatus::Bootstrapped {
            bootstrapped_at = Some(frame);
        }
    }

    let world = manager.world();
    Ok(Report {
        bootstrapped_at,
        spawned,
        physics_bodies: engine.borrow().body_count(),
        summary: world.map(WorldInspector::summary),
        components: world
            .map(WorldInspector::component_histogram)
            .unwrap_or_default(),
        entities: world
            .map(|w| {
                WorldInspector::list_entities(w)
                    .into_iter()
                    .filter_map(|id| WorldInspector::inspect_entity(w, id))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn print_report(report: &Report) {
    match (report.bootstrapped_at, &report.summary) {
        (Some(frame), Some(summary)) => {
            println!("Bootstrapped at frame {frame}");
            println!("{summary}");
        }
        _ => {
            println!("Never bootstrapped");
            return;
        }
    }
    println!(
        "Spawned boxes: {}, physics bodies created: {}",
        report.spawned, report.physics_bodies
    );
    for (kind, count) in &report.components {
        println!("  {kind}: {count}");
    }
    for info in &report.entities {
        println!("{info}");
    }
}
