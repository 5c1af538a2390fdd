//! Integration tests for pb-output.

#[cfg(test)]
mod csv_tests {
    use std::path::Path;

    use crate::csv::{CsvWriter, SNAPSHOT_FILE, SNAPSHOT_HEADER, SUMMARY_FILE, SUMMARY_HEADER};
    use crate::row::{PilotSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    /// Header and body of a CSV file, as strings.
    fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).expect("open csv");
        let header = rdr.headers().expect("header").iter().map(str::to_owned).collect();
        let body = rdr
            .records()
            .map(|r| r.expect("record").iter().map(str::to_owned).collect())
            .collect();
        (header, body)
    }

    fn snap_row(agent_id: u32, tick: u64) -> PilotSnapshotRow {
        PilotSnapshotRow {
            agent_id,
            tick,
            x:                agent_id as f32,
            y:                0.5,
            z:                0.0,
            moving:           agent_id % 2 == 1,
            current_energy:   4.0,
            predicted_energy: 1.25,
            max_energy:       6.0,
        }
    }

    #[test]
    fn opening_writes_both_headers() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (header, body) = read_table(&dir.path().join(SNAPSHOT_FILE));
        assert_eq!(header, SNAPSHOT_HEADER);
        assert!(body.is_empty());
        let (header, body) = read_table(&dir.path().join(SUMMARY_FILE));
        assert_eq!(header, SUMMARY_HEADER);
        assert!(body.is_empty());
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("a");
        CsvWriter::new(&nested).unwrap();
        assert!(nested.join(SNAPSHOT_FILE).is_file());
        assert!(nested.join(SUMMARY_FILE).is_file());
    }

    #[test]
    fn snapshot_columns_are_formatted() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5)]).unwrap();
        w.write_snapshots(&[snap_row(2, 6)]).unwrap();
        w.finish().unwrap();

        let (_, body) = read_table(&dir.path().join(SNAPSHOT_FILE));
        assert_eq!(body.len(), 3);
        assert_eq!(
            body[1],
            ["1", "5", "1.0000", "0.5000", "0.0000", "1", "4.0000", "1.2500", "6.0000"]
        );
        assert_eq!(body[0][5], "0");
        assert_eq!(body[2][1], "6");
    }

    #[test]
    fn summary_columns_follow_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let row = TickSummaryRow { tick: 3, elapsed_ms: 48, moving_agents: 2, commits: 1 };
        w.write_tick_summary(&row).unwrap();
        w.finish().unwrap();

        let (_, body) = read_table(&dir.path().join(SUMMARY_FILE));
        assert_eq!(body, vec![vec!["3", "48", "2", "1"]]);
    }

    #[test]
    fn finish_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use pb_core::{AgentId, Position, Tick, WorldConfig};
    use pb_nav::OpenFloor;
    use pb_world::{NoopController, PointerSample, ScriptedController, WorldBuilder};

    use crate::row::{PilotSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputResult, TraceObserver};

    fn p(x: f32, y: f32) -> Position {
        Position::new(x, y, 0.0)
    }

    fn config(total_ticks: u64, interval: u64) -> WorldConfig {
        WorldConfig {
            tick_duration_ms:      16,
            total_ticks,
            seed:                  1,
            num_threads:           Some(1),
            output_interval_ticks: interval,
        }
    }

    /// Keeps rows in memory.
    #[derive(Default)]
    struct MemoryWriter {
        snapshots: Vec<PilotSnapshotRow>,
        summaries: Vec<TickSummaryRow>,
        finishes:  usize,
    }

    impl OutputWriter for MemoryWriter {
        fn write_snapshots(&mut self, rows: &[PilotSnapshotRow]) -> OutputResult<()> {
            self.snapshots.extend_from_slice(rows);
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    /// Fails every write.
    struct BrokenWriter;

    impl OutputWriter for BrokenWriter {
        fn write_snapshots(&mut self, _rows: &[PilotSnapshotRow]) -> OutputResult<()> {
            Err(std::io::Error::other("disk full").into())
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            Err(std::io::Error::other("disk full").into())
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn summaries_count_commits_and_moving() {
        let script = ScriptedController::new()
            .with(AgentId(0), Tick(1), PointerSample::click(p(4.0, 0.0)))
            .with(AgentId(1), Tick(1), PointerSample::click(p(0.0, 4.0)));
        let cfg = config(4, 0);
        let mut world = WorldBuilder::new(cfg.clone(), OpenFloor, script)
            .speed(1.0)
            .spawn_many([p(0.0, 0.0), p(0.0, 0.0)])
            .build()
            .unwrap();

        let mut obs = TraceObserver::new(MemoryWriter::default(), &cfg);
        world.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none());

        let w = obs.into_writer();
        assert!(w.snapshots.is_empty());
        assert_eq!(w.finishes, 1);
        assert_eq!(
            w.summaries,
            vec![
                TickSummaryRow { tick: 0, elapsed_ms: 0,  moving_agents: 0, commits: 0 },
                TickSummaryRow { tick: 1, elapsed_ms: 16, moving_agents: 2, commits: 2 },
                TickSummaryRow { tick: 2, elapsed_ms: 32, moving_agents: 2, commits: 0 },
                TickSummaryRow { tick: 3, elapsed_ms: 48, moving_agents: 2, commits: 0 },
            ]
        );
    }

    #[test]
    fn snapshots_carry_energy() {
        let script = ScriptedController::new()
            .with(AgentId(0), Tick(0), PointerSample::hover(p(1.5, 0.0)));
        let cfg = config(1, 1);
        let mut world = WorldBuilder::new(cfg.clone(), OpenFloor, script)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();

        let mut obs = TraceObserver::new(MemoryWriter::default(), &cfg);
        world.run(&mut obs).unwrap();

        let w = obs.into_writer();
        assert_eq!(
            w.snapshots,
            vec![PilotSnapshotRow {
                agent_id:         0,
                tick:             0,
                x:                0.0,
                y:                0.0,
                z:                0.0,
                moving:           false,
                current_energy:   6.0,
                predicted_energy: 4.5,
                max_energy:       6.0,
            }]
        );
    }

    #[test]
    fn write_errors_are_stored() {
        let cfg = config(3, 1);
        let mut world = WorldBuilder::new(cfg.clone(), OpenFloor, NoopController)
            .spawn(p(0.0, 0.0))
            .build()
            .unwrap();

        let mut obs = TraceObserver::new(BrokenWriter, &cfg);
        world.run(&mut obs).unwrap();
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn integration_csv() {
        use pb_energy::EnergyConfig;
        use pb_world::WanderController;

        let cfg = config(6, 2);
        let wander = WanderController::new(p(-3.0, -3.0), p(3.0, 3.0), 0.5);
        let mut world = WorldBuilder::new(cfg.clone(), OpenFloor, wander)
            .energy(EnergyConfig { max: 4.0, ..EnergyConfig::default() })
            .spawn_many([p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)])
            .build()
            .unwrap();

        let dir = tempfile::tempdir().expect("create temp dir");
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = TraceObserver::new(writer, &cfg);
        world.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 2 → snapshots at ticks 0, 2, 4 (3 ticks × 3 pilots)
        let mut rdr = csv::Reader::from_path(dir.path().join("pilot_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| &r[8] == "4.0000"));

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
    }
}
