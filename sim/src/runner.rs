use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use impact::builtins::trench_world;
use impact::subspecs::{fish_spec, sub20_spec};
use impact::{BodyState, CellProps, ControlInputs, HealthSnapshot, ImpactOutcome, MobileBody, StepReport, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::pilot::{spawn_pilot, ControlLatch, PilotScript};
use crate::Config;

const SUB_PROPS: CellProps = CellProps::solid(0.8);
const FISH_PROPS: CellProps = CellProps { passable: true, resistance: 0.1, temperature: 0.0, risk: 0.02 };

/// End-of-run tallies for the piloted body.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub collisions: u64,
    pub hull_hits: u64,
    pub battery_empty_ticks: u64,
    /// Metres below the waterline.
    pub max_depth: f32,
    pub final_state: BodyState,
    pub final_health: HealthSnapshot,
    pub occupants_consistent: bool,
    pub last_report: Option<StepReport>,
}

struct Fish {
    body: MobileBody,
    controls: ControlInputs,
}

fn wander(rng: &mut StdRng) -> ControlInputs {
    ControlInputs {
        thrust: rng.gen_range(0.0..1.0),
        spray: rng.gen_range(-1.0..1.0),
        ballast_fill: rng.gen_range(40.0..60.0),
    }
}

fn spawn_fish(world: &mut World, rng: &mut StdRng, count: u32) -> Result<Vec<Fish>> {
    let width = world.grid.pixel_width();
    let mut school = Vec::with_capacity(count as usize);
    for i in 0..count {
        let x = rng.gen_range(width * 0.1..width * 0.9);
        let mut body = MobileBody::spawn(world, fish_spec(), x).with_context(|| format!("spawning fish {i}"))?;
        body.register_as_occupant(world, "fish", FISH_PROPS)?;
        school.push(Fish { body, controls: wander(rng) });
    }
    Ok(school)
}

/// Run the configured scenario to completion.
pub fn run(cfg: &Config) -> Result<RunSummary> {
    let mut world = trench_world(cfg.world).context("building trench world")?;
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    let spec = cfg.body.apply(sub20_spec());
    let x = cfg.spawn_x.unwrap_or(world.grid.pixel_width() / 2.0);
    let mut sub = MobileBody::spawn(&mut world, spec, x).context("spawning submersible")?;
    sub.register_as_occupant(&mut world, "sub20", SUB_PROPS)?;
    let mut school = spawn_fish(&mut world, &mut rng, cfg.fish)?;

    let dt = Duration::from_secs_f64(1.0 / f64::from(cfg.tick_rate_hz));
    let script = PilotScript::new(cfg.pilot.clone());
    let latch = ControlLatch::new();
    let stop = Arc::new(AtomicBool::new(false));
    let pilot = cfg.realtime.then(|| spawn_pilot(latch.clone(), script.clone(), dt, Arc::clone(&stop)));

    let mut summary = RunSummary {
        ticks: 0,
        collisions: 0,
        hull_hits: 0,
        battery_empty_ticks: 0,
        max_depth: 0.0,
        final_state: sub.state().clone(),
        final_health: sub.health().snapshot(),
        occupants_consistent: true,
        last_report: None,
    };
    info!(ticks = cfg.ticks, fish = cfg.fish, realtime = cfg.realtime, "simulation starting");

    let started = Instant::now();
    let result = (|| -> Result<()> {
        for tick in 0..cfg.ticks {
            let now = dt * tick as u32;
            world.environment.drift(now, &mut rng);

            if !cfg.realtime {
                latch.set(script.controls_at(tick));
            }
            let report = sub.step(&mut world, latch.sample(), now).with_context(|| format!("stepping sub at tick {tick}"))?;
            tally(&mut summary, &report);

            for fish in school.iter_mut() {
                // new course every two seconds and after every bump
                if tick % 120 == 0 {
                    fish.controls = wander(&mut rng);
                }
                let r = fish
                    .body
                    .step(&mut world, fish.controls, now)
                    .with_context(|| format!("stepping fish at tick {tick}"))?;
                if r.outcome.collided() {
                    fish.controls = wander(&mut rng);
                }
            }

            if cfg.log_every > 0 && tick % cfg.log_every == 0 {
                let s = sub.state();
                info!(
                    tick,
                    x = s.position.x,
                    y = s.position.y,
                    heading = s.heading,
                    velocity = s.velocity,
                    depth = report.depth,
                    pressure = report.pressure,
                    integrity = report.health.integrity,
                    energy = report.health.total_energy,
                    "telemetry"
                );
            }
            summary.ticks = tick + 1;
            summary.last_report = Some(report);

            if cfg.realtime {
                let target = dt * (tick + 1) as u32;
                if let Some(wait) = target.checked_sub(started.elapsed()) {
                    std::thread::sleep(wait);
                }
            }
        }
        Ok(())
    })();

    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = pilot {
        if handle.join().is_err() {
            warn!("pilot thread panicked");
        }
    }
    result?;

    summary.final_state = sub.state().clone();
    summary.final_health = sub.health().snapshot();
    summary.occupants_consistent = world.grid.occupants_consistent();
    if !summary.occupants_consistent {
        warn!("occupant index out of sync with population");
    }
    info!(
        ticks = summary.ticks,
        collisions = summary.collisions,
        hull_hits = summary.hull_hits,
        max_depth = summary.max_depth,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulation finished"
    );
    Ok(summary)
}

fn tally(summary: &mut RunSummary, report: &StepReport) {
    match report.outcome {
        ImpactOutcome::Collided { hull_damaged, off_map } => {
            summary.collisions += 1;
            if hull_damaged {
                summary.hull_hits += 1;
            }
            if off_map {
                debug!("sub pushed against the map edge");
            }
        }
        ImpactOutcome::Moved { .. } => {}
    }
    if report.health.battery_empty {
        summary.battery_empty_ticks += 1;
    }
    summary.max_depth = summary.max_depth.max(report.depth);
}
