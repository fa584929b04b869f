#![forbid(unsafe_code)]

//! Resize storm generator and replay harness.
//!
//! Generates deterministic viewport-width sequences, plays them against a
//! [`Driver`], and checks that the carousel comes out of the storm with one
//! live session in the right mode and nothing leaked along the way.
//!
//! # Key Features
//!
//! - **Deterministic**: Same seed produces identical width sequences
//! - **Pattern Library**: Burst, sweep, oscillate, pathological, mixed
//! - **JSONL Logging**: One line per storm phase with a stable schema
//! - **Replay**: Record a storm and verify a later run reproduces it
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"storm_start","run_id":"...","case":"burst_50","seed":42,"pattern":"burst","event_count":50,"initial_width":1440,"env":{...}}
//! {"event":"storm_resize","idx":0,"width":1390,"delay_ms":10,"elapsed_ms":110}
//! {"event":"storm_settle","width":1390,"mode":"wide","sessions_created":1,"anchor":0,"checksum":"..."}
//! {"event":"storm_complete","outcome":"pass","total_resizes":50,"duration_ms":4100,"checksum":"..."}
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use hero_harness::resize_storm::{run_storm, ResizeStorm, StormConfig, StormPattern};
//!
//! let storm = ResizeStorm::new(
//!     StormConfig::default()
//!         .with_seed(42)
//!         .with_pattern(StormPattern::Burst { count: 50 }),
//! );
//! run_storm(&storm, CarouselConfig::default(), hero_cards())?.assert_passed();
//! ```

use std::fmt::Write as FmtWrite;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hero_carousel::layout::{LayoutMode, resolve};
use hero_carousel::{CardSpec, CarouselConfig, ConfigError};
use hero_runtime::resize_coalescer::CoalescerStats;
use serde_json::{Value, json};

use crate::driver::{Driver, ResizeDelivery};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

// ============================================================================
// Configuration
// ============================================================================

/// Pattern type for resize storm generation.
#[derive(Debug, Clone, PartialEq)]
pub enum StormPattern {
    /// Rapid burst of small width changes.
    Burst {
        /// Number of resize events.
        count: usize,
    },
    /// Gradual width sweep.
    Sweep {
        start_width: u32,
        end_width: u32,
        /// Number of steps.
        steps: usize,
    },
    /// Oscillate between two widths.
    Oscillate {
        width_a: u32,
        width_b: u32,
        /// Number of oscillations.
        cycles: usize,
    },
    /// Extremes, exact breakpoints and zero delays.
    Pathological {
        /// Number of events.
        count: usize,
    },
    /// Every other pattern, one after another.
    Mixed {
        /// Total number of events.
        count: usize,
    },
    /// Custom resize sequence.
    Custom {
        /// List of (width, delay_ms) tuples.
        events: Vec<(u32, u64)>,
    },
}

impl StormPattern {
    /// Pattern name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Burst { .. } => "burst",
            Self::Sweep { .. } => "sweep",
            Self::Oscillate { .. } => "oscillate",
            Self::Pathological { .. } => "pathological",
            Self::Mixed { .. } => "mixed",
            Self::Custom { .. } => "custom",
        }
    }

    /// Total number of events this pattern generates.
    #[must_use]
    pub fn event_count(&self) -> usize {
        match self {
            Self::Burst { count } | Self::Pathological { count } | Self::Mixed { count } => *count,
            Self::Sweep { steps, .. } => *steps,
            Self::Oscillate { cycles, .. } => cycles * 2,
            Self::Custom { events } => events.len(),
        }
    }
}

impl Default for StormPattern {
    fn default() -> Self {
        Self::Burst { count: 50 }
    }
}

/// Configuration for resize storm generation.
#[derive(Debug, Clone)]
pub struct StormConfig {
    /// Random seed for deterministic generation.
    pub seed: u64,
    pub pattern: StormPattern,
    /// Viewport width at mount.
    pub initial_width: u32,
    /// Minimum delay between resizes (ms).
    pub min_delay_ms: u64,
    /// Maximum delay between resizes (ms).
    pub max_delay_ms: u64,
    pub min_width: u32,
    pub max_width: u32,
    /// Breakpoints the pathological pattern aims at.
    pub boundaries: (u32, u32),
    /// Time to run before the first resize (ms).
    pub warmup_ms: u64,
    /// Time to run after the last resize before checking (ms).
    pub settle_ms: u64,
    /// Test case name for logging.
    pub case_name: String,
    /// Enable JSONL logging.
    pub logging_enabled: bool,
    /// When the driver hands each resize to the engine.
    pub delivery: ResizeDelivery,
}

impl Default for StormConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pattern: StormPattern::default(),
            initial_width: 1440,
            min_delay_ms: 5,
            max_delay_ms: 50,
            min_width: 320,
            max_width: 2560,
            boundaries: (768, 1024),
            warmup_ms: 100,
            settle_ms: 2000,
            case_name: "default".into(),
            logging_enabled: true,
            delivery: ResizeDelivery::OnFrame,
        }
    }
}

impl StormConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: StormPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn with_resize_delivery(mut self, delivery: ResizeDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    #[must_use]
    pub fn with_initial_width(mut self, width: u32) -> Self {
        self.initial_width = width;
        self
    }

    /// Set delay range between resizes.
    #[must_use]
    pub fn with_delay_range(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms;
        self
    }

    #[must_use]
    pub fn with_width_bounds(mut self, min_width: u32, max_width: u32) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    #[must_use]
    pub fn with_boundaries(mut self, narrow_max: u32, medium_max: u32) -> Self {
        self.boundaries = (narrow_max, medium_max);
        self
    }

    #[must_use]
    pub fn with_settle_ms(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    #[must_use]
    pub fn with_case_name(mut self, name: impl Into<String>) -> Self {
        self.case_name = name.into();
        self
    }

    #[must_use]
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }
}

// ============================================================================
// Seeded RNG
// ============================================================================

/// Simple LCG PRNG for deterministic generation.
#[derive(Debug, Clone)]
struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    fn next_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % (max - min))
    }

    fn next_width(&mut self, min: u32, max: u32) -> u32 {
        self.next_range(u64::from(min), u64::from(max)) as u32
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

// ============================================================================
// Resize Event
// ============================================================================

/// A single resize event in a storm sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    /// Target viewport width.
    pub width: u32,
    /// Delay before this resize (ms).
    pub delay_ms: u64,
    /// Index in the sequence.
    pub index: usize,
}

impl ResizeEvent {
    #[must_use]
    pub fn new(width: u32, delay_ms: u64, index: usize) -> Self {
        Self {
            width,
            delay_ms,
            index,
        }
    }

    /// Convert to JSONL format.
    #[must_use]
    pub fn to_jsonl(&self, elapsed_ms: u64) -> String {
        json!({
            "event": "storm_resize",
            "idx": self.index,
            "width": self.width,
            "delay_ms": self.delay_ms,
            "elapsed_ms": elapsed_ms,
        })
        .to_string()
    }
}

// ============================================================================
// Storm Generator
// ============================================================================

/// Resize storm generator.
#[derive(Debug, Clone)]
pub struct ResizeStorm {
    config: StormConfig,
    events: Vec<ResizeEvent>,
    run_id: String,
}

impl ResizeStorm {
    #[must_use]
    pub fn new(config: StormConfig) -> Self {
        let run_id = format!(
            "{:016x}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64 ^ config.seed)
                .unwrap_or(config.seed)
        );

        let mut storm = Self {
            config,
            events: Vec::new(),
            run_id,
        };
        storm.generate_events();
        storm
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    #[must_use]
    pub fn events(&self) -> &[ResizeEvent] {
        &self.events
    }

    #[must_use]
    pub fn config(&self) -> &StormConfig {
        &self.config
    }

    /// Width the viewport ends the storm at.
    #[must_use]
    pub fn final_width(&self) -> u32 {
        self.events
            .last()
            .map_or(self.config.initial_width, |e| e.width)
    }

    fn generate_events(&mut self) {
        let mut rng = SeededRng::new(self.config.seed);

        self.events = match &self.config.pattern {
            StormPattern::Burst { count } => self.generate_burst(&mut rng, *count),
            StormPattern::Sweep {
                start_width,
                end_width,
                steps,
            } => self.generate_sweep(*start_width, *end_width, *steps),
            StormPattern::Oscillate {
                width_a,
                width_b,
                cycles,
            } => self.generate_oscillate(&mut rng, *width_a, *width_b, *cycles),
            StormPattern::Pathological { count } => self.generate_pathological(&mut rng, *count),
            StormPattern::Mixed { count } => self.generate_mixed(&mut rng, *count),
            StormPattern::Custom { events } => events
                .iter()
                .enumerate()
                .map(|(i, (w, d))| ResizeEvent::new(*w, *d, i))
                .collect(),
        };
    }

    fn generate_burst(&self, rng: &mut SeededRng, count: usize) -> Vec<ResizeEvent> {
        let mut events = Vec::with_capacity(count);
        let mut width = i64::from(self.config.initial_width);

        for i in 0..count {
            // Rapid resizes with minimal delay
            let delay = rng.next_range(self.config.min_delay_ms, self.config.max_delay_ms / 2);

            if rng.chance(0.7) {
                let delta = rng.next_range(1, 120) as i64;
                let sign = if rng.chance(0.5) { 1 } else { -1 };
                width = (width + delta * sign).clamp(
                    i64::from(self.config.min_width),
                    i64::from(self.config.max_width),
                );
            }

            events.push(ResizeEvent::new(width as u32, delay, i));
        }
        events
    }

    fn generate_sweep(&self, start: u32, end: u32, steps: usize) -> Vec<ResizeEvent> {
        let mut events = Vec::with_capacity(steps);

        for i in 0..steps {
            let t = if steps > 1 {
                i as f64 / (steps - 1) as f64
            } else {
                1.0
            };
            let width = (f64::from(start) + (f64::from(end) - f64::from(start)) * t).round() as u32;
            let delay = (self.config.min_delay_ms + self.config.max_delay_ms) / 2;
            events.push(ResizeEvent::new(width, delay, i));
        }
        events
    }

    fn generate_oscillate(
        &self,
        rng: &mut SeededRng,
        width_a: u32,
        width_b: u32,
        cycles: usize,
    ) -> Vec<ResizeEvent> {
        let mut events = Vec::with_capacity(cycles * 2);

        for cycle in 0..cycles {
            let delay_a = rng.next_range(self.config.min_delay_ms, self.config.max_delay_ms);
            let delay_b = rng.next_range(self.config.min_delay_ms, self.config.max_delay_ms);
            events.push(ResizeEvent::new(width_a, delay_a, cycle * 2));
            events.push(ResizeEvent::new(width_b, delay_b, cycle * 2 + 1));
        }
        events
    }

    fn generate_pathological(&self, rng: &mut SeededRng, count: usize) -> Vec<ResizeEvent> {
        let (narrow_max, medium_max) = self.config.boundaries;
        let mut events = Vec::with_capacity(count);

        for i in 0..count {
            let (width, delay) = match i % 8 {
                0 => (self.config.min_width, 0),
                1 => (self.config.max_width, 0),
                2 => (narrow_max, 1),
                3 => (narrow_max + 1, 1),
                4 => (self.config.initial_width, 500),
                5 => (rng.next_width(self.config.min_width, self.config.max_width), 0),
                6 => (medium_max, rng.next_range(0, 1000)),
                _ => {
                    if (i / 8) % 2 == 0 {
                        (medium_max + 1, 5)
                    } else {
                        (self.config.min_width, 5)
                    }
                }
            };
            events.push(ResizeEvent::new(width, delay, i));
        }
        events
    }

    fn generate_mixed(&self, rng: &mut SeededRng, count: usize) -> Vec<ResizeEvent> {
        let segment = count / 4;
        let mut events = Vec::with_capacity(count);

        events.extend(self.generate_burst(rng, segment));

        let sweep = self.generate_sweep(self.config.min_width, self.config.max_width, segment);
        for (i, mut e) in sweep.into_iter().enumerate() {
            e.index = events.len() + i;
            events.push(e);
        }

        let (narrow_max, _) = self.config.boundaries;
        let oscillate = self.generate_oscillate(
            rng,
            narrow_max.saturating_sub(40),
            narrow_max + 40,
            segment / 2,
        );
        for (i, mut e) in oscillate.into_iter().enumerate() {
            e.index = events.len() + i;
            events.push(e);
        }

        let remaining = count - events.len();
        let pathological = self.generate_pathological(rng, remaining);
        for (i, mut e) in pathological.into_iter().enumerate() {
            e.index = events.len() + i;
            events.push(e);
        }

        events
    }

    /// Deterministic checksum of the event sequence.
    #[must_use]
    pub fn sequence_checksum(&self) -> String {
        let mut hash = FNV_OFFSET_BASIS;
        for event in &self.events {
            fnv_hash_bytes(&mut hash, &event.width.to_le_bytes());
            fnv_hash_bytes(&mut hash, &event.delay_ms.to_le_bytes());
            fnv_hash_bytes(&mut hash, &(event.index as u64).to_le_bytes());
        }
        format!("{hash:016x}")
    }

    /// Total duration of the storm (sum of delays).
    #[must_use]
    pub fn total_duration_ms(&self) -> u64 {
        self.events.iter().map(|e| e.delay_ms).sum()
    }
}

// ============================================================================
// JSONL Logger
// ============================================================================

/// JSONL logger for storm execution. Timestamps are virtual.
#[derive(Debug, Clone)]
pub struct StormLogger {
    lines: Vec<String>,
    run_id: String,
}

impl StormLogger {
    #[must_use]
    pub fn new(run_id: &str) -> Self {
        Self {
            lines: Vec::new(),
            run_id: run_id.to_string(),
        }
    }

    pub fn log_start(&mut self, storm: &ResizeStorm) {
        self.lines.push(
            json!({
                "event": "storm_start",
                "run_id": self.run_id,
                "case": storm.config.case_name,
                "seed": storm.config.seed,
                "pattern": storm.config.pattern.name(),
                "event_count": storm.events.len(),
                "initial_width": storm.config.initial_width,
                "env": capture_env(),
            })
            .to_string(),
        );
    }

    pub fn log_resize(&mut self, event: &ResizeEvent, elapsed_ms: u64) {
        self.lines.push(event.to_jsonl(elapsed_ms));
    }

    pub fn log_settle(
        &mut self,
        width: u32,
        mode: Option<LayoutMode>,
        sessions_created: u64,
        anchor: Option<usize>,
        stats: CoalescerStats,
        checksum: &str,
    ) {
        self.lines.push(
            json!({
                "event": "storm_settle",
                "width": width,
                "mode": mode.map(LayoutMode::as_str),
                "sessions_created": sessions_created,
                "anchor": anchor,
                "signals": stats.signals,
                "applies": stats.applies,
                "skipped": stats.skipped,
                "checksum": checksum,
            })
            .to_string(),
        );
    }

    pub fn log_error(&mut self, message: &str) {
        self.lines.push(
            json!({
                "event": "storm_error",
                "message": message,
            })
            .to_string(),
        );
    }

    pub fn log_complete(&mut self, outcome: &str, total_resizes: usize, duration_ms: u64, checksum: &str) {
        self.lines.push(
            json!({
                "event": "storm_complete",
                "outcome": outcome,
                "total_resizes": total_resizes,
                "duration_ms": duration_ms,
                "checksum": checksum,
            })
            .to_string(),
        );
    }

    #[must_use]
    pub fn to_jsonl(&self) -> String {
        self.lines.join("\n")
    }

}

// ============================================================================
// Storm Execution
// ============================================================================

/// Result of executing a resize storm.
#[derive(Debug, Clone)]
pub struct StormResult {
    pub passed: bool,
    pub total_resizes: usize,
    /// Virtual time the whole run took, warmup and settle included.
    pub duration_ms: u64,
    pub sequence_checksum: String,
    /// Checksum of the card transforms after settling.
    pub output_checksum: String,
    /// Checksum of the coalescer's decisions.
    pub decision_checksum: u64,
    /// The coalescer's decision log as JSONL.
    pub decisions_jsonl: String,
    pub sessions_created: u64,
    pub final_mode: Option<LayoutMode>,
    pub jsonl: String,
    pub errors: Vec<String>,
}

impl StormResult {
    /// Panic with the full log if the storm failed.
    pub fn assert_passed(&self) {
        if !self.passed {
            let mut msg = String::new();
            msg.push_str("\n=== Resize Storm Failed ===\n\n");
            let _ = writeln!(msg, "Resizes: {}", self.total_resizes);
            let _ = writeln!(msg, "Duration: {}ms", self.duration_ms);
            let _ = writeln!(msg, "Sessions created: {}", self.sessions_created);

            if !self.errors.is_empty() {
                msg.push_str("\nErrors:\n");
                for err in &self.errors {
                    let _ = writeln!(msg, "  - {err}");
                }
            }

            msg.push_str("\nJSONL Log:\n");
            msg.push_str(&self.jsonl);

            panic!("{msg}");
        }
    }
}

/// Play `storm` against a fresh engine and check the outcome.
pub fn run_storm(storm: &ResizeStorm, config: CarouselConfig, cards: Vec<CardSpec>) -> Result<StormResult, ConfigError> {
    let layout = config.layout.clone();
    let card_count = cards.len();
    let mut driver =
        Driver::new(config, cards, storm.config.initial_width)?.with_resize_delivery(storm.config.delivery);
    let mut logger = StormLogger::new(&storm.run_id);
    logger.log_start(storm);
    tracing::info!(
        run_id = storm.run_id.as_str(),
        pattern = storm.config.pattern.name(),
        seed = storm.config.seed,
        events = storm.events.len(),
        "storm started"
    );

    driver.mount();
    driver.run_for(Duration::from_millis(storm.config.warmup_ms));
    for event in &storm.events {
        driver.run_for(Duration::from_millis(event.delay_ms));
        driver.resize(event.width);
        logger.log_resize(event, driver.now().as_millis() as u64);
    }
    driver.run_for(Duration::from_millis(storm.config.settle_ms));

    let mut errors: Vec<String> = driver.violations().to_vec();
    let engine = driver.engine();
    let final_width = storm.final_width();
    let (expected_mode, expected_dims) = resolve(final_width, &layout, card_count);
    let buildable = card_count > 0 && expected_dims.max_falloff > 0.0;

    match engine.session() {
        Some(session) => {
            if session.mode() != expected_mode {
                errors.push(format!(
                    "settled in {} but width {final_width} is {}",
                    session.mode().as_str(),
                    expected_mode.as_str()
                ));
            }
            if *session.dims() != expected_dims {
                errors.push(format!("stale geometry after settling at width {final_width}"));
            }
            if !session.is_running() {
                errors.push("live session is not running".to_string());
            }
        }
        None if buildable => errors.push(format!("no live session after settling at width {final_width}")),
        None => {}
    }
    if engine.is_switching() {
        errors.push("mode switch still fading after settle".to_string());
    }
    if let Some(reconciler) = engine.reconciler() {
        if reconciler.has_pending() {
            errors.push("resize still pending after settle".to_string());
        }
    }

    let output_checksum = format!("{:016x}", driver.transforms_checksum());
    let sessions_created = engine.sessions_created();
    let final_mode = engine.mode();
    let decision_checksum = engine.reconciler().map_or(0, |r| r.decision_checksum());
    let decisions_jsonl = engine
        .reconciler()
        .map(|r| r.decision_logs_jsonl())
        .unwrap_or_default();
    logger.log_settle(
        final_width,
        final_mode,
        sessions_created,
        engine.session().map(|s| s.anchor()),
        engine.reconciler().map(|r| r.stats()).unwrap_or_default(),
        &output_checksum,
    );

    let seen = driver.violations().len();
    driver.unmount();
    errors.extend(driver.violations()[seen..].iter().cloned());
    for err in &errors {
        logger.log_error(err);
    }

    let passed = errors.is_empty();
    let duration_ms = driver.now().as_millis() as u64;
    logger.log_complete(
        if passed { "pass" } else { "fail" },
        storm.events.len(),
        duration_ms,
        &output_checksum,
    );
    tracing::info!(
        run_id = storm.run_id.as_str(),
        passed,
        sessions_created,
        errors = errors.len(),
        "storm complete"
    );

    Ok(StormResult {
        passed,
        total_resizes: storm.events.len(),
        duration_ms,
        sequence_checksum: storm.sequence_checksum(),
        output_checksum,
        decision_checksum,
        decisions_jsonl,
        sessions_created,
        final_mode,
        jsonl: if storm.config.logging_enabled {
            logger.to_jsonl()
        } else {
            String::new()
        },
        errors,
    })
}

// ============================================================================
// Replay Harness
// ============================================================================

/// Recorded storm for replay.
#[derive(Debug, Clone)]
pub struct RecordedStorm {
    pub config: StormConfig,
    pub events: Vec<ResizeEvent>,
    pub sequence_checksum: String,
    /// Expected output checksum (if known).
    pub expected_output_checksum: Option<String>,
}

impl RecordedStorm {
    #[must_use]
    pub fn record(storm: &ResizeStorm) -> Self {
        Self {
            config: storm.config.clone(),
            events: storm.events.clone(),
            sequence_checksum: storm.sequence_checksum(),
            expected_output_checksum: None,
        }
    }

    #[must_use]
    pub fn record_with_output(storm: &ResizeStorm, output_checksum: String) -> Self {
        let mut recorded = Self::record(storm);
        recorded.expected_output_checksum = Some(output_checksum);
        recorded
    }

    /// Whether `storm` replays this recording's sequence.
    #[must_use]
    pub fn verify_replay(&self, storm: &ResizeStorm) -> bool {
        self.sequence_checksum == storm.sequence_checksum()
    }

    /// Whether a run reproduced the recorded output.
    #[must_use]
    pub fn verify_output(&self, result: &StormResult) -> bool {
        self.expected_output_checksum
            .as_ref()
            .is_none_or(|expected| *expected == result.output_checksum)
    }

    /// Serialize to JSON for storage.
    #[must_use]
    pub fn to_json(&self) -> String {
        let events: Vec<Value> = self
            .events
            .iter()
            .map(|e| json!({ "width": e.width, "delay_ms": e.delay_ms, "index": e.index }))
            .collect();
        json!({
            "seed": self.config.seed,
            "pattern": self.config.pattern.name(),
            "case_name": self.config.case_name,
            "initial_width": self.config.initial_width,
            "events": events,
            "sequence_checksum": self.sequence_checksum,
            "expected_output_checksum": self.expected_output_checksum,
        })
        .to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn capture_env() -> Value {
    let seed = std::env::var("STORM_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);
    json!({ "env_seed": seed, "ci": std::env::var("CI").is_ok() })
}

/// Seed from `STORM_SEED`, or one derived from the clock and process id.
#[must_use]
pub fn get_storm_seed() -> u64 {
    std::env::var("STORM_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            let pid = u64::from(std::process::id());
            let time = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64;
            pid.wrapping_mul(time)
        })
}

#[inline]
fn fnv_hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

// ============================================================================
// Tests
// ============================================================================
