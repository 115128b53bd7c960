#[cfg(test)]
mod integration {
    use std::time::Duration;

    use anyhow::Result;
    use impact::builtins::trench_world;
    use impact::subspecs::sub20_spec;
    use impact::{ControlInputs, ImpactDebug, MobileBody, Vec2f, WorldSpec};
    use sim::pilot::PilotSegment;
    use sim::{run, BodyOverrides, Config};
    use tracing::info;

    const SMALL: WorldSpec = WorldSpec { cols: 40, rows: 48, cell_size: 32 };

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn hold(thrust: f32, spray: f32, ballast: f32) -> Vec<PilotSegment> {
        vec![PilotSegment { ticks: 1, thrust, spray, ballast }]
    }

    fn scenario(ticks: u64, pilot: Vec<PilotSegment>) -> Config {
        Config { ticks, log_every: 0, world: SMALL, fish: 0, pilot, ..Config::default() }
    }

    #[test]
    fn flooded_tanks_sink_onto_the_seabed() -> Result<()> {
        init_tracing();
        let summary = run(&scenario(3000, hold(0.0, 0.0, 100.0)))?;
        info!(y = summary.final_state.position.y, collisions = summary.collisions, "sink run done");
        assert!(summary.collisions > 0);
        // seabed life starts around y 1248; the hull is 150 px tall
        assert!(summary.final_state.position.y > 1000.0, "y {}", summary.final_state.position.y);
        assert!(summary.max_depth > 50.0, "depth {}", summary.max_depth);
        assert!(summary.occupants_consistent);
        Ok(())
    }

    #[test]
    fn empty_tanks_ride_the_surface_and_heal() -> Result<()> {
        init_tracing();
        let summary = run(&scenario(800, hold(0.0, 0.0, 0.0)))?;
        let s = &summary.final_state;
        assert!(s.position.y > 395.0 && s.position.y < 420.0, "y {}", s.position.y);
        assert!(s.out_of_water_area > 0);
        assert!(summary.final_health.heal_rate > 0.0);
        let report = summary.last_report.expect("ran at least one tick");
        assert!(report.energy_in > 0.3, "energy_in {}", report.energy_in);
        Ok(())
    }

    #[test]
    fn full_drive_on_a_thin_battery_latches_empty() -> Result<()> {
        init_tracing();
        let mut cfg = scenario(200, hold(1.0, 1.0, 50.0));
        cfg.body = BodyOverrides { initial_energy: Some(0.006), ..Default::default() };
        let summary = run(&cfg)?;
        assert!(summary.final_health.battery_empty);
        assert!(summary.battery_empty_ticks > 100, "flat for {}", summary.battery_empty_ticks);
        Ok(())
    }

    #[test]
    fn crowded_water_keeps_the_index_in_sync() -> Result<()> {
        init_tracing();
        let cfg = Config { ticks: 600, seed: 11, log_every: 0, world: SMALL, fish: 6, ..Config::default() };
        let a = run(&cfg)?;
        let b = run(&cfg)?;
        assert!(a.occupants_consistent);
        assert_eq!(a.final_state, b.final_state);
        assert_eq!(a.hull_hits, b.hull_hits);
        Ok(())
    }

    #[test]
    fn debug_feed_sees_the_seabed_from_just_above_it() -> Result<()> {
        init_tracing();
        let mut world = trench_world(SMALL)?;
        // seabed top row 42 starts at y 1344; park the hull just above, clear of the ridge
        let mut sub = MobileBody::spawn_at(&mut world, sub20_spec(), Vec2f::new(200.0, 1250.0))?;
        let mut dbg = ImpactDebug::default();
        sub.step_dbg(&mut world, ControlInputs::default(), Duration::from_millis(16), &mut dbg)?;
        let window = dbg.window.expect("window inside the grid");
        assert!(window.contains(6, 42));
        assert!(dbg.solid_cells.contains(&(6, 42)));
        // only the seabed and the ridge column are solid terrain
        assert!(dbg.solid_cells.iter().all(|&(col, row)| row >= 42 || col == 13));
        Ok(())
    }
}
