//! Control input plumbing between a pilot (scripted or a peripheral thread)
//! and the simulation loop. The loop only sees scalar snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use impact::ControlInputs;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotSegment {
    pub ticks: u64,
    pub thrust: f32,
    pub spray: f32,
    pub ballast: f32,
}

impl Default for PilotSegment {
    fn default() -> Self {
        Self { ticks: 60, thrust: 0.0, spray: 0.0, ballast: 50.0 }
    }
}

impl PilotSegment {
    pub fn controls(&self) -> ControlInputs {
        ControlInputs { thrust: self.thrust, spray: self.spray, ballast_fill: self.ballast }
    }
}

/// Segments played back in order, wrapping around at the end.
#[derive(Debug, Clone, Default)]
pub struct PilotScript {
    segments: Vec<PilotSegment>,
    cycle: u64,
}

impl PilotScript {
    pub fn new(segments: Vec<PilotSegment>) -> Self {
        let cycle = segments.iter().map(|s| s.ticks).sum();
        Self { segments, cycle }
    }

    pub fn controls_at(&self, tick: u64) -> ControlInputs {
        if self.cycle == 0 {
            return ControlInputs::default();
        }
        let mut t = tick % self.cycle;
        for seg in &self.segments {
            if t < seg.ticks {
                return seg.controls();
            }
            t -= seg.ticks;
        }
        ControlInputs::default()
    }
}

/// Latest control values, written by the pilot and sampled once per tick.
#[derive(Debug, Clone, Default)]
pub struct ControlLatch {
    inner: Arc<Mutex<ControlInputs>>,
}

impl ControlLatch {
    pub fn new() -> Self { Self::default() }

    pub fn set(&self, controls: ControlInputs) {
        *self.inner.lock() = controls;
    }

    pub fn sample(&self) -> ControlInputs {
        *self.inner.lock()
    }
}

/// Replay `script` into `latch` on its own thread, one segment value per
/// `period`, until `stop` is raised.
pub fn spawn_pilot(latch: ControlLatch, script: PilotScript, period: Duration, stop: Arc<AtomicBool>) -> JoinHandle<u64> {
    thread::spawn(move || {
        let mut tick = 0u64;
        while !stop.load(Ordering::Relaxed) {
            latch.set(script.controls_at(tick));
            tick += 1;
            thread::sleep(period);
        }
        debug!(tick, "pilot thread stopped");
        tick
    })
}
