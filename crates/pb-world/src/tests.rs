//! Integration tests for pb-world.

use std::io::Cursor;

use pb_core::{AgentId, Position, Tick, WorldConfig};
use pb_energy::EnergyConfig;
use pb_motion::{RejectReason, StopReason};
use pb_nav::OpenFloor;

use crate::{
    NoopController, NoopObserver, Pilot, PointerSample, ScriptedController, WorldBuilder,
    WorldEvent, WorldObserver,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn p(x: f32, y: f32) -> Position {
    Position::new(x, y, 0.0)
}

fn test_config(total_ticks: u64) -> WorldConfig {
    WorldConfig {
        tick_duration_ms:      16,
        total_ticks,
        seed:                  42,
        num_threads:           Some(1),
        output_interval_ticks: total_ticks,
    }
}

/// Records everything the world reports.
#[derive(Default)]
struct Recorder {
    events:     Vec<WorldEvent>,
    tick_ends:  Vec<(Tick, usize)>,
    snapshots:  Vec<Tick>,
    world_ends: Vec<Tick>,
}

impl Recorder {
    fn of_agent(&self, agent: u32) -> Vec<WorldEvent> {
        self.events.iter().copied().filter(|e| e.agent() == AgentId(agent)).collect()
    }
}

impl WorldObserver for Recorder {
    fn on_event(&mut self, event: &WorldEvent) {
        self.events.push(*event);
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        self.tick_ends.push((tick, moving));
    }

    fn on_snapshot(&mut self, tick: Tick, _pilots: &[Pilot]) {
        self.snapshots.push(tick);
    }

    fn on_world_end(&mut self, final_tick: Tick) {
        self.world_ends.push(final_tick);
    }
}

/// Agent 0 hovers (4, 0) at tick 0 and clicks it at tick 1.
fn click_east_script() -> ScriptedController {
    ScriptedController::new()
        .with(AgentId(0), Tick(0), PointerSample::hover(p(4.0, 0.0)))
        .with(AgentId(0), Tick(1), PointerSample::click(p(4.0, 0.0)))
}

// ── WorldBuilder ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::WorldError;

    #[test]
    fn builds_with_defaults() {
        let world = WorldBuilder::new(test_config(10), OpenFloor, NoopController)
            .spawn(p(0.0, 0.0))
            .spawn(p(1.0, 0.0))
            .build()
            .unwrap();
        assert_eq!(world.pilots.len(), 2);
        assert_eq!(world.rngs.len(), 2);
        assert_eq!(world.pilots[1].id, AgentId(1));
        assert_eq!(world.pilots[1].position(), p(1.0, 0.0));
        assert_eq!(world.pilots[0].planner.current_energy(), 6.0);
        assert_eq!(world.current_tick(), Tick(0));
    }

    #[test]
    fn zero_tick_duration_errors() {
        let mut config = test_config(10);
        config.tick_duration_ms = 0;
        let result = WorldBuilder::new(config, OpenFloor, NoopController).build();
        assert!(matches!(result, Err(WorldError::Core(_))));
    }

    #[test]
    fn invalid_energy_errors() {
        let result = WorldBuilder::new(test_config(10), OpenFloor, NoopController)
            .energy(EnergyConfig { max: -1.0, ..EnergyConfig::default() })
            .spawn(p(0.0, 0.0))
            .build();
        assert!(matches!(result, Err(WorldError::Energy(_))));
    }

    #[test]
    fn invalid_speed_errors() {
        let result = WorldBuilder::new(test_config(10), OpenFloor, NoopController)
            .speed(0.0)
            .spawn(p(0.0, 0.0))
            .build();
        assert!(matches!(result, Err(WorldError::Nav(_))));
    }

    #[test]
    fn unknown_pilot_errors() {
        let world = WorldBuilder::new(test_config(10), OpenFloor, NoopController)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        assert!(world.pilot(AgentId(0)).is_ok());
        assert!(world.pilot(AgentId(5)).is_err());
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_loop {
    use super::*;

    #[test]
    fn run_stops_at_end_tick() {
        let mut world = WorldBuilder::new(test_config(5), OpenFloor, NoopController)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        assert_eq!(world.current_tick(), Tick(5));
        assert_eq!(rec.tick_ends.len(), 5);
        assert_eq!(rec.world_ends, vec![Tick(5)]);
        assert!(rec.events.is_empty());
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut world = WorldBuilder::new(test_config(2), OpenFloor, NoopController)
            .build()
            .unwrap();
        world.run_ticks(7, &mut NoopObserver).unwrap();
        assert_eq!(world.current_tick(), Tick(7));
    }

    #[test]
    fn snapshots_follow_output_interval() {
        let mut config = test_config(6);
        config.output_interval_ticks = 2;
        let mut world = WorldBuilder::new(config, OpenFloor, NoopController)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();
        assert_eq!(rec.snapshots, vec![Tick(0), Tick(2), Tick(4)]);
    }

    #[test]
    fn hover_then_click_walks_and_arrives() {
        let mut world = WorldBuilder::new(test_config(10), OpenFloor, click_east_script())
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        world.run_ticks(1, &mut rec).unwrap();
        let pilot = world.pilot(AgentId(0)).unwrap();
        assert_eq!(pilot.planner.predicted_energy(), 2.0);
        assert_eq!(pilot.planner.current_energy(), 6.0);
        assert_eq!(pilot.preview.ghost(), Some(p(4.0, 0.0)));

        world.run(&mut rec).unwrap();
        assert_eq!(
            rec.events[0],
            WorldEvent::Committed {
                agent:             AgentId(0),
                tick:              Tick(1),
                destination:       p(4.0, 0.0),
                residual:          2.0,
                reached_full_path: true,
            }
        );
        let WorldEvent::MoveEnded { tick, end, .. } = rec.events[1] else {
            panic!("expected a move end, got {:?}", rec.events[1]);
        };
        // Commit at 1, path resolved at 2, four unit steps.
        assert_eq!(tick, Tick(6));
        assert_eq!(end.reason, StopReason::Arrived);
        assert_eq!(end.started, Tick(1));
        assert_eq!(rec.events.len(), 2);

        let pilot = world.pilot(AgentId(0)).unwrap();
        assert_eq!(pilot.position(), p(4.0, 0.0));
        assert_eq!(pilot.planner.current_energy(), 2.0);
        assert!(!pilot.preview.is_visible());
        assert_eq!(rec.tick_ends[3], (Tick(3), 1));
        assert_eq!(rec.tick_ends[6], (Tick(6), 0));
    }

    #[test]
    fn click_while_moving_is_rejected() {
        let script = click_east_script()
            .with(AgentId(0), Tick(3), PointerSample::click(p(-9.0, -9.0)));
        let mut world = WorldBuilder::new(test_config(10), OpenFloor, script)
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        assert_eq!(
            rec.events[1],
            WorldEvent::Rejected {
                agent:  AgentId(0),
                tick:   Tick(3),
                target: p(-9.0, -9.0),
                reason: RejectReason::Busy,
            }
        );
        let pilot = world.pilot(AgentId(0)).unwrap();
        assert_eq!(pilot.position(), p(4.0, 0.0));
        assert_eq!(pilot.planner.current_energy(), 2.0);
    }

    #[test]
    fn click_when_exhausted_is_rejected() {
        let script = ScriptedController::new()
            .with(AgentId(0), Tick(0), PointerSample::click(p(4.0, 0.0)))
            .with(AgentId(0), Tick(5), PointerSample::click(p(4.0, 0.0)));
        let mut world = WorldBuilder::new(test_config(8), OpenFloor, script)
            .energy(EnergyConfig { max: 2.0, act_threshold: 0.5 })
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        assert!(matches!(
            rec.events[0],
            WorldEvent::Committed { reached_full_path: false, residual, .. } if residual == 0.0
        ));
        assert!(matches!(rec.events[1], WorldEvent::MoveEnded { tick: Tick(3), .. }));
        assert!(matches!(
            rec.events[2],
            WorldEvent::Rejected { tick: Tick(5), reason: RejectReason::Exhausted, .. }
        ));
        assert_eq!(world.pilot(AgentId(0)).unwrap().position(), p(2.0, 0.0));
    }

    #[test]
    fn pointer_miss_resets_prediction() {
        let script = ScriptedController::new()
            .with(AgentId(0), Tick(0), PointerSample::hover(p(3.0, 0.0)))
            .with(AgentId(0), Tick(1), PointerSample::default());
        let mut world = WorldBuilder::new(test_config(2), OpenFloor, script)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();

        world.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(world.pilots[0].planner.predicted_energy(), 3.0);
        world.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(world.pilots[0].planner.predicted_energy(), 6.0);
    }

    #[test]
    fn events_are_in_agent_order() {
        let mut script = ScriptedController::new();
        for i in 0..4 {
            script.insert(AgentId(i), Tick(2), PointerSample::click(p(i as f32, 3.0)));
        }
        let mut world = WorldBuilder::new(test_config(4), OpenFloor, script)
            .spawn_many((0..4).map(|i| p(i as f32, 0.0)))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        let agents: Vec<AgentId> = rec.events.iter().map(WorldEvent::agent).collect();
        assert_eq!(agents, (0..4).map(AgentId).collect::<Vec<_>>());
        assert!(rec.events.iter().all(|e| e.tick() == Tick(2)));
        assert_eq!(world.moving_count(), 4);
    }

    #[test]
    fn graph_navigator_truncates_around_corner() {
        use pb_nav::{GraphNavigator, NavGraphBuilder};

        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(p(0.0, 0.0));
        let n1 = b.add_node(p(5.0, 0.0));
        let n2 = b.add_node(p(5.0, 5.0));
        b.add_corridor(&[n0, n1, n2]).unwrap();
        let nav = GraphNavigator::new(b.build(), 2.0);

        let script = ScriptedController::new()
            .with(AgentId(0), Tick(0), PointerSample::click(p(5.0, 5.0)));
        let mut world = WorldBuilder::new(test_config(12), nav, script)
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run(&mut rec).unwrap();

        let WorldEvent::Committed { destination, residual, reached_full_path, .. } = rec.events[0] else {
            panic!("expected a commit, got {:?}", rec.events[0]);
        };
        assert!(destination.distance(p(5.0, 1.0)) < 1e-5);
        assert_eq!(residual, 0.0);
        assert!(!reached_full_path);

        assert!(matches!(rec.events[1], WorldEvent::MoveEnded { .. }));
        let pilot = world.pilot(AgentId(0)).unwrap();
        assert!(pilot.position().distance(p(5.0, 1.0)) < 1e-4);
        assert!((pilot.body.odometer() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn graph_navigator_never_travels_past_paid_energy() {
        use pb_nav::{GraphNavigator, NavGraphBuilder};

        const MAX: f32 = 1.5;

        // The snap radius reaches the middle waypoint from both ends.
        let mut b = NavGraphBuilder::new();
        let n0 = b.add_node(p(0.0, 0.0));
        let n1 = b.add_node(p(2.0, 0.0));
        let n2 = b.add_node(p(4.0, 0.0));
        b.add_corridor(&[n0, n1, n2]).unwrap();
        let nav = GraphNavigator::new(b.build(), 2.5);

        let script = ScriptedController::new()
            .with(AgentId(0), Tick(0), PointerSample::click(p(4.0, 0.0)))
            .with(AgentId(0), Tick(11), PointerSample::click(p(4.0, 0.0)));
        let mut world = WorldBuilder::new(test_config(20), nav, script)
            .energy(EnergyConfig { max: MAX, ..EnergyConfig::default() })
            .speed(0.5)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        let paid = |rec: &Recorder| -> f32 {
            rec.events
                .iter()
                .filter_map(|e| match e {
                    WorldEvent::Committed { residual, .. } => Some(MAX - residual),
                    _ => None,
                })
                .sum()
        };

        world.run_ticks(10, &mut rec).unwrap();
        let pilot = world.pilot(AgentId(0)).unwrap();
        assert!(pilot.position().distance(p(1.5, 0.0)) < 1e-4);
        assert!((pilot.body.odometer() - 1.5).abs() < 1e-4);
        assert!(pilot.body.odometer() <= paid(&rec) + 1e-4);

        world.request_reset();
        world.run(&mut rec).unwrap();
        let pilot = world.pilot(AgentId(0)).unwrap();
        assert!(pilot.position().distance(p(3.0, 0.0)) < 1e-4);
        assert!((pilot.body.odometer() - 3.0).abs() < 1e-4);
        assert!(pilot.body.odometer() <= paid(&rec) + 1e-4);
    }
}

// ── Energy reset ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod reset {
    use super::*;

    #[test]
    fn reset_after_move_refills_every_pilot() {
        let mut world = WorldBuilder::new(test_config(20), OpenFloor, click_east_script())
            .speed(1.0)
            .spawn_many([p(0.0, 0.0), p(10.0, 0.0)])
            .build()
            .unwrap();
        world.run_ticks(8, &mut NoopObserver).unwrap();
        assert_eq!(world.pilots[0].planner.current_energy(), 2.0);

        world.request_reset();
        world.request_reset();
        let mut rec = Recorder::default();
        world.run_ticks(2, &mut rec).unwrap();

        assert_eq!(
            rec.events,
            vec![
                WorldEvent::EnergyReset { agent: AgentId(0), tick: Tick(8), energy: 6.0 },
                WorldEvent::EnergyReset { agent: AgentId(1), tick: Tick(8), energy: 6.0 },
            ]
        );
        assert_eq!(world.pilots[0].planner.predicted_energy(), 6.0);
    }

    #[test]
    fn reset_mid_move_does_not_stop_it() {
        let mut world = WorldBuilder::new(test_config(20), OpenFloor, click_east_script())
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        world.run_ticks(3, &mut rec).unwrap();
        assert!(world.pilots[0].planner.state().is_moving());

        world.request_reset();
        world.run(&mut rec).unwrap();

        assert!(matches!(rec.events[1], WorldEvent::EnergyReset { tick: Tick(3), .. }));
        assert!(matches!(rec.events[2], WorldEvent::MoveEnded { tick: Tick(6), .. }));
        let pilot = &world.pilots[0];
        assert_eq!(pilot.position(), p(4.0, 0.0));
        assert_eq!(pilot.planner.current_energy(), 6.0);
    }

    #[test]
    fn reset_from_another_thread_is_observed() {
        let mut world = WorldBuilder::new(test_config(10), OpenFloor, NoopController)
            .spawn_many([p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)])
            .build()
            .unwrap();
        let handle = world.reset_handle();
        std::thread::spawn(move || handle.request_reset()).join().unwrap();

        let mut rec = Recorder::default();
        world.run_ticks(1, &mut rec).unwrap();
        assert_eq!(rec.events.len(), 3);
        assert!(rec.events.iter().all(|e| matches!(e, WorldEvent::EnergyReset { .. })));
    }
}

// ── Controllers ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod controllers {
    use super::*;
    use crate::{LogObserver, WanderController};

    fn wander_world(seed: u64) -> crate::World<OpenFloor, WanderController> {
        let mut config = test_config(300);
        config.seed = seed;
        let wander = WanderController::new(p(-5.0, -5.0), p(5.0, 5.0), 0.2);
        WorldBuilder::new(config, OpenFloor, wander)
            .speed(0.5)
            .spawn_many([p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)])
            .build()
            .unwrap()
    }

    fn wander_events(seed: u64) -> Vec<WorldEvent> {
        let mut world = wander_world(seed);
        let mut rec = Recorder::default();
        world.run_ticks(150, &mut rec).unwrap();
        world.request_reset();
        world.run(&mut rec).unwrap();
        rec.events
    }

    #[test]
    fn wander_is_deterministic_per_seed() {
        let a = wander_events(7);
        let b = wander_events(7);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn wander_only_commits_when_able() {
        let rec = Recorder { events: wander_events(11), ..Recorder::default() };
        for agent in 0..3 {
            let mut moving = false;
            for e in rec.of_agent(agent) {
                match e {
                    WorldEvent::Committed { .. } => {
                        assert!(!moving, "commit while moving: {e:?}");
                        moving = true;
                    }
                    WorldEvent::MoveEnded { .. } => moving = false,
                    WorldEvent::Rejected { reason, .. } => assert_eq!(reason, RejectReason::NoPath),
                    WorldEvent::EnergyReset { .. } => {}
                }
            }
        }
    }

    #[test]
    fn wander_energy_stays_in_bounds() {
        let mut world = wander_world(3);
        for _ in 0..300 {
            world.run_ticks(1, &mut NoopObserver).unwrap();
            for pilot in &world.pilots {
                let e = pilot.planner.current_energy();
                assert!((0.0..=6.0).contains(&e), "energy {e} out of range");
                assert!(pilot.planner.predicted_energy() <= e + 1e-6);
            }
        }
    }

    #[test]
    fn log_observer_counts_events() {
        let mut world = WorldBuilder::new(test_config(10), OpenFloor, click_east_script())
            .speed(1.0)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();
        let mut log = LogObserver::new();
        world.run(&mut log).unwrap();
        assert_eq!(log.event_count(), 2);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn thread_count_does_not_change_events() {
        let run = |threads: usize| {
            let mut config = test_config(200);
            config.num_threads = Some(threads);
            let wander = WanderController::new(p(-5.0, -5.0), p(5.0, 5.0), 0.3);
            let mut world = WorldBuilder::new(config, OpenFloor, wander)
                .speed(0.5)
                .spawn_many((0..16).map(|i| p(i as f32 * 0.25, 0.0)))
                .build()
                .unwrap();
            let mut rec = Recorder::default();
            world.run(&mut rec).unwrap();
            rec.events
        };
        assert_eq!(run(1), run(4));
    }
}

// ── Script loading ────────────────────────────────────────────────────────────

#[cfg(test)]
mod script {
    use super::*;
    use crate::{WorldError, load_script_csv, load_script_reader};

    const SCRIPT_CSV: &str = "\
agent_id,tick,x,y,z,click\n\
0,0,3.0,4.0,0.0,false\n\
0,1,3.0,4.0,0.0,true\n\
1,5,,,,0\n\
1,6,1.5,0,0,1\n\
";

    #[test]
    fn loads_samples() {
        let script = load_script_reader(Cursor::new(SCRIPT_CSV)).unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(script.last_tick(), Some(Tick(6)));
        assert_eq!(
            script.sample(AgentId(0), Tick(0)),
            Some(&PointerSample::hover(Position::new(3.0, 4.0, 0.0)))
        );
        assert_eq!(
            script.sample(AgentId(0), Tick(1)),
            Some(&PointerSample::click(Position::new(3.0, 4.0, 0.0)))
        );
        assert_eq!(script.sample(AgentId(1), Tick(5)), Some(&PointerSample::default()));
        assert_eq!(
            script.sample(AgentId(1), Tick(6)),
            Some(&PointerSample::click(Position::new(1.5, 0.0, 0.0)))
        );
        assert_eq!(script.sample(AgentId(2), Tick(0)), None);
    }

    #[test]
    fn partial_coordinates_error() {
        let csv = "agent_id,tick,x,y,z,click\n0,0,1.0,,0.0,false\n";
        let err = load_script_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, WorldError::Script(msg) if msg.contains("row 2")));
    }

    #[test]
    fn bad_click_errors() {
        let csv = "agent_id,tick,x,y,z,click\n0,0,1.0,2.0,0.0,maybe\n";
        assert!(matches!(load_script_reader(Cursor::new(csv)), Err(WorldError::Script(_))));
    }

    #[test]
    fn bad_number_errors() {
        let csv = "agent_id,tick,x,y,z,click\nzero,0,1.0,2.0,0.0,true\n";
        assert!(matches!(load_script_reader(Cursor::new(csv)), Err(WorldError::Script(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_script_csv(std::path::Path::new("/nonexistent/pb/script.csv")).unwrap_err();
        assert!(matches!(err, WorldError::Io(_)));
    }

    #[test]
    fn later_rows_replace_earlier() {
        let csv = "agent_id,tick,x,y,z,click\n0,0,1,1,0,false\n0,0,2,2,0,true\n";
        let script = load_script_reader(Cursor::new(csv)).unwrap();
        assert_eq!(script.len(), 1);
        assert_eq!(script.sample(AgentId(0), Tick(0)), Some(&PointerSample::click(p(2.0, 2.0))));
    }
}
