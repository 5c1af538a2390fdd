//! sandbox: headless pathbudget run.
//!
//! Spawns a handful of pilots on a walled lattice arena.  Each pilot either
//! wanders (hovering random points and clicking now and then) or replays a
//! pointer script.  Every `reset_every_ticks` the world broadcasts an energy
//! reset.  Snapshots and tick summaries go to CSV.
//!
//! ```text
//! RUST_LOG=info cargo run -p sandbox -- demos/sandbox/sandbox.json
//! ```

mod arena;
mod config;

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use pb_core::{Position, SimRng, Tick};
use pb_motion::MovementState;
use pb_nav::{GraphNavigator, NavQuery};
use pb_output::{CsvWriter, OutputWriter, TraceObserver};
use pb_world::{
    LogObserver, Pilot, PointerController, WanderController, World, WorldBuilder, WorldEvent,
    WorldObserver, load_script_csv,
};

use arena::{HALF_EXTENT, build_arena};
use config::SandboxConfig;

const SNAP_RADIUS: f32 = 2.5;

// ── Observer fan-out ──────────────────────────────────────────────────────────

/// Feeds both the CSV trace and the log, and counts moves.
struct SandboxObserver<W: OutputWriter> {
    trace:   TraceObserver<W>,
    log:     LogObserver,
    commits: usize,
    arrived: usize,
}

impl<W: OutputWriter> WorldObserver for SandboxObserver<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.trace.on_tick_start(tick);
    }

    fn on_event(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::Committed { .. } => self.commits += 1,
            WorldEvent::MoveEnded { .. } => self.arrived += 1,
            _ => {}
        }
        self.trace.on_event(event);
        self.log.on_event(event);
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        self.trace.on_tick_end(tick, moving);
    }

    fn on_snapshot(&mut self, tick: Tick, pilots: &[Pilot]) {
        self.trace.on_snapshot(tick, pilots);
    }

    fn on_world_end(&mut self, final_tick: Tick) {
        self.trace.on_world_end(final_tick);
        self.log.on_world_end(final_tick);
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// Run to `end_tick` in chunks, broadcasting a reset between chunks.
fn run_world<Q: NavQuery, C: PointerController>(
    world: &mut World<Q, C>,
    cfg:   &SandboxConfig,
) -> Result<SandboxObserver<CsvWriter>> {
    let writer = CsvWriter::new(&cfg.output_dir)?;
    let mut obs = SandboxObserver {
        trace:   TraceObserver::new(writer, &world.config),
        log:     LogObserver::new(),
        commits: 0,
        arrived: 0,
    };

    let end = world.config.end_tick();
    let chunk = match cfg.reset_every_ticks {
        0 => world.config.total_ticks,
        n => n,
    };
    while world.current_tick() < end {
        let n = chunk.min(end.since(world.current_tick()));
        world.run_ticks(n, &mut obs)?;
        if world.current_tick() < end && cfg.reset_every_ticks > 0 {
            log::info!("{}: broadcasting energy reset", world.current_tick());
            world.request_reset();
        }
    }
    obs.on_world_end(world.current_tick());

    if let Some(e) = obs.trace.take_error() {
        log::error!("output error: {e}");
    }
    Ok(obs)
}

fn report<Q: NavQuery, C: PointerController>(
    world:   &World<Q, C>,
    obs:     &SandboxObserver<CsvWriter>,
    cfg:     &SandboxConfig,
    elapsed: std::time::Duration,
) {
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  moves committed : {}", obs.commits);
    println!("  moves finished  : {}", obs.arrived);
    println!("  output          : {}", cfg.output_dir.display());
    println!();

    println!("{:<8} {:<22} {:<9} {:>8} {:>8}", "Pilot", "Position", "State", "Energy", "Odo");
    println!("{}", "-".repeat(59));
    for pilot in &world.pilots {
        let state = match pilot.planner.state() {
            MovementState::Idle => "idle",
            MovementState::Moving(_) => "moving",
        };
        println!(
            "{:<8} {:<22} {:<9} {:>8.3} {:>8.2}",
            pilot.id.0,
            pilot.position().to_string(),
            state,
            pilot.planner.current_energy(),
            pilot.body.odometer(),
        );
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => SandboxConfig::load(Path::new(&path))?,
        None => SandboxConfig::default(),
    };
    cfg.world.validate()?;

    println!("=== sandbox: pathbudget ===");
    println!(
        "Pilots: {}  |  Ticks: {}  |  Seed: {}  |  Max energy: {}",
        cfg.pilots, cfg.world.total_ticks, cfg.world.seed, cfg.energy.max
    );

    // 1. Arena.
    let (graph, nodes) = build_arena()?;
    println!("Arena: {} nodes, {} edges", graph.node_count(), graph.edge_count());

    // 2. Spawn points: distinct random arena nodes.
    let mut rng = SimRng::new(cfg.world.seed);
    let mut free = nodes;
    let spawns: Vec<_> = rng
        .take_distinct(&mut free, cfg.pilots)
        .into_iter()
        .filter_map(|node| graph.position(node))
        .collect();
    let nav = GraphNavigator::new(graph, SNAP_RADIUS);

    // 3. Build and run with the chosen input source.
    let t0 = Instant::now();
    match &cfg.script {
        Some(path) => {
            let script = load_script_csv(path)?;
            println!("Script: {} samples from {}", script.len(), path.display());
            let mut world = WorldBuilder::new(cfg.world.clone(), nav, script)
                .energy(cfg.energy)
                .speed(cfg.speed)
                .spawn_many(spawns)
                .build()?;
            let obs = run_world(&mut world, &cfg)?;
            report(&world, &obs, &cfg, t0.elapsed());
        }
        None => {
            let (lo, hi) = (-HALF_EXTENT, HALF_EXTENT);
            let wander = WanderController::new(
                Position::new(lo, lo, 0.0),
                Position::new(hi, hi, 0.0),
                cfg.click_probability,
            );
            let mut world = WorldBuilder::new(cfg.world.clone(), nav, wander)
                .energy(cfg.energy)
                .speed(cfg.speed)
                .spawn_many(spawns)
                .build()?;
            let obs = run_world(&mut world, &cfg)?;
            report(&world, &obs, &cfg, t0.elapsed());
        }
    }

    Ok(())
}
