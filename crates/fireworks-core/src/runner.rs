//! Fixed-rate tick loop: poll stop, update, render, present, wait.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fireworks_platform::{Clock, Surface};
use tracing::{info, trace, warn};

use crate::config::ShowConfig;
use crate::show::Show;

/// Process-wide stop flag, checked once at the start of every tick.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Runner<S: Surface, C: Clock> {
    show: Show,
    surface: S,
    clock: C,
    stop: StopSignal,
    interval: Duration,
    next_tick: Duration,
    ticks: u64,
}

impl<S: Surface, C: Clock> Runner<S, C> {
    /// Builds the show at the clock's current time so launcher timers start now.
    pub fn new(config: ShowConfig, surface: S, clock: C, stop: StopSignal) -> Self {
        let now = clock.now();
        let interval = config.tick_interval();
        Self {
            show: Show::new(config, now),
            surface,
            clock,
            stop,
            interval,
            next_tick: now,
            ticks: 0,
        }
    }

    pub fn show(&self) -> &Show {
        &self.show
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// When the next tick is due, on the clock's timeline.
    pub fn next_deadline(&self) -> Duration {
        self.next_tick
    }

    /// One tick without pacing. Every launcher updates before anything is drawn.
    pub fn tick(&mut self) -> Flow {
        if self.stop.is_raised() {
            return Flow::Stop;
        }
        let now = self.clock.now();
        self.show.update(now);
        self.show.render(&mut self.surface);
        if let Err(err) = self.surface.present() {
            warn!("present failed: {err}");
        }
        self.ticks += 1;

        self.next_tick += self.interval;
        if self.next_tick < now {
            // Fell behind; resync instead of bursting through missed ticks.
            trace!(behind = ?(now - self.next_tick), "tick deadline missed");
            self.next_tick = now + self.interval;
        }
        Flow::Continue
    }

    /// `tick` followed by the frame-pacing wait.
    pub fn step(&mut self) -> Flow {
        let flow = self.tick();
        if flow == Flow::Continue {
            self.clock.wait_until(self.next_tick);
        }
        flow
    }

    /// Runs until the stop signal is raised. Returns the number of ticks run.
    pub fn run(&mut self) -> u64 {
        info!("show running at {:?} per tick", self.interval);
        while self.step() == Flow::Continue {}
        let stats = self.show.stats();
        info!(
            ticks = self.ticks,
            launched = stats.launched,
            "show stopped"
        );
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LauncherConfig;
    use crate::testing::{DrawCall, ManualClock, RecordingSurface};

    fn single_launcher(period_ms: u64) -> ShowConfig {
        ShowConfig {
            seed: Some(77),
            launchers: vec![LauncherConfig { x: 100, period_ms }],
            ..ShowConfig::default()
        }
    }

    fn runner(config: ShowConfig) -> Runner<RecordingSurface, ManualClock> {
        Runner::new(
            config,
            RecordingSurface::default(),
            ManualClock::default(),
            StopSignal::new(),
        )
    }

    #[test]
    fn three_shells_in_ten_seconds() {
        let mut runner = runner(single_launcher(3000));
        let mut spawn_times = Vec::new();
        let mut launched = 0;
        while runner.clock().now() < Duration::from_secs(10) {
            let now = runner.clock().now();
            assert_eq!(runner.step(), Flow::Continue);
            let total = runner.show().stats().launched;
            if total > launched {
                spawn_times.push(now);
                launched = total;
            }
        }
        assert_eq!(runner.ticks(), 601);
        assert_eq!(spawn_times.len(), 3);
        for (spawn, expected) in spawn_times.iter().zip([3000, 6000, 9000]) {
            let ms = spawn.as_millis() as i64;
            assert!((ms - expected).abs() <= 50, "spawn at {ms}ms, expected ~{expected}ms");
        }
    }

    #[test]
    fn each_tick_renders_one_complete_frame() {
        let mut runner = runner(single_launcher(1000));
        runner.step();
        runner.step();
        let calls = &runner.surface().calls;
        let presents: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == DrawCall::Present)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(presents.len(), 2);
        assert!(matches!(calls[0], DrawCall::Clear(_)));
        assert!(matches!(calls[presents[0] + 1], DrawCall::Clear(_)));
        assert_eq!(*calls.last().expect("calls"), DrawCall::Present);
    }

    #[test]
    fn stop_signal_ends_the_run() {
        let stop = StopSignal::new();
        let mut runner = Runner::new(
            single_launcher(1000),
            RecordingSurface::default(),
            ManualClock::default(),
            stop.clone(),
        );
        assert_eq!(runner.step(), Flow::Continue);
        stop.raise();
        let frames_before = runner.surface().calls.len();
        assert_eq!(runner.run(), 1);
        assert_eq!(runner.surface().calls.len(), frames_before);
    }

    #[test]
    fn pacing_waits_one_interval_per_tick() {
        let mut runner = runner(single_launcher(1000));
        for _ in 0..60 {
            runner.step();
        }
        assert_eq!(runner.clock().now(), Duration::from_nanos(16_666_666 * 60));
        assert_eq!(runner.next_deadline(), runner.clock().now());
    }

    #[test]
    fn late_ticks_resync_deadline() {
        let mut runner = runner(single_launcher(1000));
        runner.tick();
        runner.clock.advance(Duration::from_secs(2));
        runner.tick();
        assert_eq!(
            runner.next_deadline(),
            Duration::from_secs(2) + Duration::from_nanos(16_666_666)
        );
    }
}
