use std::path::PathBuf;

use clap::Parser;
use impact::WorldSpec;
use sim::{load_config, run, Args, Config};

fn scratch_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sim-host-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
}

fn small(ticks: u64, seed: u64) -> Config {
    Config {
        ticks,
        seed,
        log_every: 0,
        world: WorldSpec { cols: 40, rows: 48, cell_size: 32 },
        fish: 2,
        ..Config::default()
    }
}

#[test]
fn config_file_round_trips_through_loader() {
    let path = scratch_config(
        "load",
        r#"
        ticks = 90
        seed = 42
        fish = 0
        spawn_x = 300.0

        [world]
        cols = 30
        rows = 40

        [body]
        initial_energy = 0.2

        [[pilot]]
        ticks = 45
        thrust = 1.0
        ballast = 80.0
        "#,
    );
    let cfg = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.ticks, 90);
    assert_eq!(cfg.seed, 42);
    assert_eq!(cfg.fish, 0);
    assert_eq!(cfg.spawn_x, Some(300.0));
    assert_eq!(cfg.world, WorldSpec { cols: 30, rows: 40, cell_size: 32 });
    assert_eq!(cfg.body.initial_energy, Some(0.2));
    assert_eq!(cfg.pilot.len(), 1);
    assert_eq!(cfg.pilot[0].ballast, 80.0);
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let cfg = load_config(&PathBuf::from("/definitely/not/here/sim.toml")).unwrap();
    assert_eq!(cfg.ticks, Config::default().ticks);
    assert_eq!(cfg.world, WorldSpec::default());
}

#[test]
fn malformed_config_names_the_file() {
    let path = scratch_config("bad", "ticks = [1, 2");
    let err = load_config(&path).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(format!("{err:#}").contains("sim-host-"), "{err:#}");
}

#[test]
fn command_line_overrides_config() {
    let args = Args::parse_from(["sim", "--config", "x.toml", "--ticks", "5", "--seed", "9"]);
    assert_eq!(args.config, PathBuf::from("x.toml"));
    let cfg = args.apply(Config::default());
    assert_eq!(cfg.ticks, 5);
    assert_eq!(cfg.seed, 9);
    assert!(!cfg.realtime);

    let args = Args::parse_from(["sim"]);
    assert_eq!(args.config, PathBuf::from("sim.toml"));
    let cfg = args.apply(Config { ticks: 77, ..Config::default() });
    assert_eq!(cfg.ticks, 77);
}

#[test]
fn same_seed_same_run() {
    let a = run(&small(300, 3)).unwrap();
    let b = run(&small(300, 3)).unwrap();
    assert_eq!(a.ticks, 300);
    assert_eq!(a.final_state, b.final_state);
    assert_eq!(a.final_health, b.final_health);
    assert_eq!(a.collisions, b.collisions);
    assert!(a.occupants_consistent && b.occupants_consistent);
}

#[test]
fn scripted_thrust_moves_the_sub() {
    let summary = run(&small(120, 1)).unwrap();
    // the default script opens with full thrust along +X
    assert!(summary.final_state.position.x > 640.0 + 10.0, "x {}", summary.final_state.position.x);
    assert!(summary.final_state.velocity > 0.0);
    assert!(summary.last_report.is_some());
}
