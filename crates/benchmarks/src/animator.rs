// Copyright 2025 Shellbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Counter animation.
//!
//! A [`Timeline`] is the pure part: it maps a step (or an elapsed time on
//! any clock) to the value a counter should show, following a quartic
//! ease-out from `0` to the target. An [`Animation`] drives one timeline on
//! tokio timers and publishes each value on a `watch` channel. Tick `k`
//! fires `k·D/N` after the start, so the last tick lands on `D`.
//!
//! ```text
//! v(i) = round(T · (1 − (1 − i/N)^4)),  v(0) = 0,  v(N) = T
//! ```
//!
//! # Example
//!
//! ```
//! use shellbench_benchmarks::animator::Timeline;
//!
//! let timeline = Timeline::with_defaults(12);
//! let values: Vec<u64> = timeline.values().collect();
//! assert_eq!(values.len(), 61);
//! assert_eq!(values.last(), Some(&12));
//! ```

use shellbench_core::config::AnimationConfig;
use shellbench_core::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// Default wall-clock length of one animation run.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Default number of ticks per run.
pub const DEFAULT_STEPS: u32 = 60;

/// Quartic ease-out: fast start, slow settle. `progress` is clamped to `[0, 1]`.
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(4)
}

/// Immutable description of one counter animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeline {
    target: u64,
    duration: Duration,
    steps: u32,
}

impl Timeline {
    /// Create a timeline.
    ///
    /// Returns `Err` if `steps` is zero or `duration` is too short to give
    /// every step a non-zero tick interval.
    pub fn new(target: u64, duration: Duration, steps: u32) -> Result<Self> {
        if steps == 0 {
            return Err(Error::invalid_input("animation needs at least one step"));
        }
        if (duration / steps).is_zero() {
            return Err(Error::invalid_input(format!(
                "animation duration {duration:?} is too short for {steps} steps"
            )));
        }
        Ok(Self {
            target,
            duration,
            steps,
        })
    }

    /// Timeline with the default 2 s / 60 step settings.
    pub fn with_defaults(target: u64) -> Self {
        Self {
            target,
            duration: DEFAULT_DURATION,
            steps: DEFAULT_STEPS,
        }
    }

    /// Timeline using configured duration and step count.
    pub fn from_config(target: u64, config: &AnimationConfig) -> Result<Self> {
        Self::new(target, config.duration(), config.steps)
    }

    /// Same duration and steps, different target.
    pub fn with_target(self, target: u64) -> Self {
        Self { target, ..self }
    }

    /// Final value.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Total duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Number of ticks.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Period between two ticks.
    pub fn tick_interval(&self) -> Duration {
        self.duration / self.steps
    }

    /// Offset of tick `step` from the start of a run, rounded up to the
    /// nanosecond. Tick `N` lands exactly on the duration.
    pub fn offset_of(&self, step: u32) -> Duration {
        let step = u128::from(step.min(self.steps));
        let nanos = (self.duration.as_nanos() * step).div_ceil(u128::from(self.steps));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Value shown after `step` ticks. Steps past the end yield the target.
    pub fn value_at(&self, step: u32) -> u64 {
        if step >= self.steps {
            return self.target;
        }
        let progress = f64::from(step) / f64::from(self.steps);
        (self.target as f64 * ease_out_quart(progress)).round() as u64
    }

    /// Number of whole ticks elapsed after `elapsed` on any clock.
    pub fn step_at(&self, elapsed: Duration) -> u32 {
        let step = elapsed.as_nanos() * u128::from(self.steps) / self.duration.as_nanos();
        step.min(u128::from(self.steps)) as u32
    }

    /// Value shown after `elapsed`.
    pub fn value_after(&self, elapsed: Duration) -> u64 {
        self.value_at(self.step_at(elapsed))
    }

    /// Lazy sequence `v(0) ..= v(N)`. Each call starts from the beginning.
    pub fn values(&self) -> TimelineValues {
        TimelineValues {
            timeline: *self,
            next: 0,
        }
    }
}

/// Iterator over the values of a [`Timeline`].
#[derive(Debug, Clone)]
pub struct TimelineValues {
    timeline: Timeline,
    next: u32,
}

impl Iterator for TimelineValues {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next > self.timeline.steps {
            return None;
        }
        let value = self.timeline.value_at(self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.timeline.steps + 1).saturating_sub(self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimelineValues {}

/// A live, restartable animation of one counter.
///
/// Dropping the animation stops its tick schedule.
#[derive(Debug)]
pub struct Animation {
    timeline: Timeline,
    tx: Arc<watch::Sender<u64>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
    started_at: Option<Instant>,
}

impl Animation {
    /// Create an idle animation showing `0`.
    pub fn new(timeline: Timeline) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            timeline,
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            task: None,
            started_at: None,
        }
    }

    /// Receive every published value.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Value currently shown.
    pub fn current_value(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Timeline in use.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// When the current run started.
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Whether a tick schedule is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start from `0` towards the current target, replacing any running schedule.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&mut self) {
        self.stop();
        let generation = self.generation.load(Ordering::SeqCst);
        self.tx.send_replace(0);
        let started_at = Instant::now();
        self.started_at = Some(started_at);
        self.task = Some(tokio::spawn(drive(
            self.timeline,
            started_at,
            Arc::clone(&self.tx),
            Arc::clone(&self.generation),
            generation,
        )));
    }

    /// Start again towards a new target.
    pub fn restart(&mut self, target: u64) {
        self.timeline = self.timeline.with_target(target);
        self.start();
    }

    /// Stop the running schedule, leaving the current value in place.
    pub fn stop(&mut self) {
        // Invalidate before aborting so a tick racing the abort is discarded.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn drive(
    timeline: Timeline,
    started_at: Instant,
    tx: Arc<watch::Sender<u64>>,
    generation: Arc<AtomicU64>,
    own: u64,
) {
    for step in 1..=timeline.steps() {
        // Absolute deadlines: no drift from a truncated period.
        tokio::time::sleep_until(started_at + timeline.offset_of(step)).await;
        let value = timeline.value_at(step);
        let published = tx.send_if_modified(|current| {
            if generation.load(Ordering::SeqCst) != own {
                return false;
            }
            let changed = *current != value;
            *current = value;
            changed
        });
        trace!(step, value, published, "animation tick");
        if generation.load(Ordering::SeqCst) != own {
            return;
        }
    }
}

/// Named counters animated together, each on its own schedule.
#[derive(Debug)]
pub struct FigureSet {
    template: Timeline,
    figures: Vec<(String, Animation)>,
}

impl FigureSet {
    /// Empty set whose figures share `template`'s duration and steps.
    pub fn new(template: Timeline) -> Self {
        Self {
            template,
            figures: Vec::new(),
        }
    }

    /// Add a figure, or retarget an existing one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, target: u64) {
        let name = name.into();
        let timeline = self.template.with_target(target);
        match self.figures.iter_mut().find(|(n, _)| *n == name) {
            Some((_, animation)) => animation.timeline = timeline,
            None => self.figures.push((name, Animation::new(timeline))),
        }
    }

    /// Start or restart every figure.
    pub fn start_all(&mut self) {
        for (_, animation) in &mut self.figures {
            animation.start();
        }
    }

    /// Figure by name.
    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.figures
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, animation)| animation)
    }

    /// Current value of every figure, in insertion order.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.figures
            .iter()
            .map(|(name, animation)| (name.clone(), animation.current_value()))
            .collect()
    }

    /// Whether any figure is still ticking.
    pub fn is_active(&self) -> bool {
        self.figures.iter().any(|(_, animation)| animation.is_active())
    }

    /// Number of figures.
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Whether the set has no figures.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}
