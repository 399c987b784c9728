//! Animation sequence registry.
//!
//! The [`AnimationLibrary`] resource holds every named frame sequence an actor
//! can play. Sequences are immutable after load; per-actor playback state
//! (active sequence, frame index, timer, effective interval) lives in the
//! [`Animation`](crate::components::animation::Animation) component.
//!
//! Libraries can be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "sequences": [
//!     { "name": "Idle", "frames": ["idle_0", "idle_1"], "frame_interval": 0.0833 },
//!     { "name": "Jump", "frames": ["jump_0", "jump_1"], "on_complete": { "ChainTo": "Flip" } },
//!     { "name": "Run", "frames": ["run_0", "run_1"],
//!       "timing": { "SpeedScaled": { "slow_speed": 5.0, "fast_speed": 9.0,
//!         "slow_interval": 0.1, "fast_interval": 0.004, "crawl_interval": 0.8 } } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const IDLE: &str = "Idle";
pub const WALK: &str = "Walk";
pub const RUN: &str = "Run";
pub const JUMP: &str = "Jump";
pub const FLIP: &str = "Flip";
pub const LAND: &str = "Land";
pub const CROUCH: &str = "Crouch";
pub const WALL: &str = "Wall";

/// Opaque image handle resolved by the rendering collaborator.
pub type FrameHandle = Arc<str>;

/// Twelve frames per second.
pub const DEFAULT_FRAME_INTERVAL: f32 = 1.0 / 12.0;

fn default_frame_interval() -> f32 {
    DEFAULT_FRAME_INTERVAL
}

/// What happens when playback steps past the last frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnComplete {
    #[default]
    Loop,
    ChainTo(String),
}

/// How a sequence's effective frame interval is derived each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FrameTiming {
    /// Always `frame_interval`.
    #[default]
    Fixed,
    /// Interval follows the actor's horizontal speed.
    SpeedScaled(SpeedScaledTiming),
}

/// Speed → frame interval mapping used by running cycles.
///
/// Below `slow_speed` the cycle crawls at `crawl_interval`. Between
/// `slow_speed` and `fast_speed` the interval is linearly interpolated from
/// `slow_interval` down to `fast_interval`, and it stays at `fast_interval`
/// above that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedScaledTiming {
    pub slow_speed: f32,
    pub fast_speed: f32,
    pub slow_interval: f32,
    pub fast_interval: f32,
    pub crawl_interval: f32,
}

impl Default for SpeedScaledTiming {
    fn default() -> Self {
        Self {
            slow_speed: 5.0,
            fast_speed: 9.0,
            slow_interval: 0.1,
            fast_interval: 0.004,
            crawl_interval: 0.8,
        }
    }
}

impl SpeedScaledTiming {
    pub fn interval_for(&self, speed: f32) -> f32 {
        let speed = speed.abs();
        if speed < self.slow_speed {
            return self.crawl_interval;
        }
        let span = self.fast_speed - self.slow_speed;
        let t = if span > 0.0 {
            ((speed - self.slow_speed) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.slow_interval + (self.fast_interval - self.slow_interval) * t
    }
}

/// One named frame sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDef {
    pub name: String,
    #[serde(default)]
    pub frames: Vec<FrameHandle>,
    /// Base seconds per frame.
    #[serde(default = "default_frame_interval")]
    pub frame_interval: f32,
    #[serde(default)]
    pub on_complete: OnComplete,
    #[serde(default)]
    pub timing: FrameTiming,
}

impl SequenceDef {
    pub fn new<F>(name: impl Into<String>, frames: impl IntoIterator<Item = F>, interval: f32) -> Self
    where
        F: Into<FrameHandle>,
    {
        Self {
            name: name.into(),
            frames: frames.into_iter().map(Into::into).collect(),
            frame_interval: interval,
            on_complete: OnComplete::Loop,
            timing: FrameTiming::Fixed,
        }
    }

    pub fn chain_to(mut self, next: impl Into<String>) -> Self {
        self.on_complete = OnComplete::ChainTo(next.into());
        self
    }

    pub fn with_timing(mut self, timing: FrameTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Zero-frame sequences are inert.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Seconds per frame at the given horizontal speed.
    pub fn effective_interval(&self, speed: f32) -> f32 {
        match self.timing {
            FrameTiming::Fixed => self.frame_interval,
            FrameTiming::SpeedScaled(scaled) => scaled.interval_for(speed),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    sequences: Vec<SequenceDef>,
}

/// Registry of frame sequences keyed by name.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationLibrary {
    sequences: FxHashMap<String, SequenceDef>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sequence. Names are unique keys.
    pub fn insert(&mut self, def: SequenceDef) -> Result<(), String> {
        if def.frame_interval.is_nan() || def.frame_interval < 0.0 {
            return Err(format!(
                "Sequence \"{}\" has an invalid frame_interval {}",
                def.name, def.frame_interval
            ));
        }
        if self.sequences.contains_key(&def.name) {
            return Err(format!("Duplicate animation sequence \"{}\"", def.name));
        }
        self.sequences.insert(def.name.clone(), def);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert); a later sequence with the
    /// same name replaces the earlier one.
    pub fn with_sequence(mut self, def: SequenceDef) -> Self {
        if self.sequences.insert(def.name.clone(), def).is_some() {
            warn!("Animation sequence replaced while building library");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&SequenceDef> {
        self.sequences.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sequences.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Sequence names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sequences.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Parse a library from its JSON form.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let file: LibraryFile = serde_json::from_str(json)
            .map_err(|e| format!("Failed to parse animation library: {}", e))?;
        let mut library = Self::new();
        for def in file.sequences {
            library.insert(def)?;
        }
        library.warn_dangling_chains();
        Ok(library)
    }

    /// Load a library from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read animation library {:?}: {}", path, e))?;
        let library = Self::from_json_str(&json)?;
        info!(
            "Loaded {} animation sequences from {:?}",
            library.len(),
            path
        );
        Ok(library)
    }

    /// Serialize to JSON, sequences sorted by name.
    pub fn to_json_string(&self) -> Result<String, String> {
        let mut sequences: Vec<SequenceDef> = self.sequences.values().cloned().collect();
        sequences.sort_by(|a, b| a.name.cmp(&b.name));
        serde_json::to_string_pretty(&LibraryFile { sequences })
            .map_err(|e| format!("Failed to serialize animation library: {}", e))
    }

    /// The standard platformer set with placeholder frame handles
    /// (`"idle_0"`, `"idle_1"`, ...).
    ///
    /// Jump chains into Flip, Land chains into Idle and Run speeds up with the
    /// actor's horizontal speed; everything else loops.
    pub fn platformer_defaults() -> Self {
        let frames = |prefix: &str, count: usize| -> Vec<String> {
            (0..count).map(|i| format!("{}_{}", prefix, i)).collect()
        };
        Self::new()
            .with_sequence(SequenceDef::new(IDLE, frames("idle", 4), DEFAULT_FRAME_INTERVAL))
            .with_sequence(SequenceDef::new(WALK, frames("walk", 6), DEFAULT_FRAME_INTERVAL))
            .with_sequence(
                SequenceDef::new(RUN, frames("run", 8), DEFAULT_FRAME_INTERVAL)
                    .with_timing(FrameTiming::SpeedScaled(SpeedScaledTiming::default())),
            )
            .with_sequence(
                SequenceDef::new(JUMP, frames("jump", 3), DEFAULT_FRAME_INTERVAL).chain_to(FLIP),
            )
            .with_sequence(SequenceDef::new(FLIP, frames("flip", 4), DEFAULT_FRAME_INTERVAL))
            .with_sequence(
                SequenceDef::new(LAND, frames("land", 2), DEFAULT_FRAME_INTERVAL).chain_to(IDLE),
            )
            .with_sequence(SequenceDef::new(CROUCH, frames("crouch", 2), DEFAULT_FRAME_INTERVAL))
            .with_sequence(SequenceDef::new(WALL, frames("wall", 2), DEFAULT_FRAME_INTERVAL))
    }

    /// Log every `ChainTo` whose target is not registered.
    pub fn warn_dangling_chains(&self) {
        for def in self.sequences.values() {
            if let OnComplete::ChainTo(next) = &def.on_complete
                && !self.sequences.contains_key(next)
            {
                warn!(
                    "Sequence \"{}\" chains to unknown sequence \"{}\"; it will loop instead",
                    def.name, next
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn run_interval_crawls_below_slow_speed() {
        let timing = SpeedScaledTiming::default();
        assert!(approx_eq(timing.interval_for(0.0), 0.8));
        assert!(approx_eq(timing.interval_for(4.99), 0.8));
    }

    #[test]
    fn run_interval_interpolates_between_bounds() {
        let timing = SpeedScaledTiming::default();
        assert!(approx_eq(timing.interval_for(5.0), 0.1));
        assert!(approx_eq(timing.interval_for(6.0), 0.076));
        assert!(approx_eq(timing.interval_for(7.0), 0.052));
        assert!(approx_eq(timing.interval_for(9.0), 0.004));
    }

    #[test]
    fn run_interval_is_monotonic_and_clamped() {
        let timing = SpeedScaledTiming::default();
        let mut previous = timing.interval_for(5.0);
        let mut speed = 5.0;
        while speed <= 9.0 {
            let interval = timing.interval_for(speed);
            assert!(interval <= previous + 1e-6);
            previous = interval;
            speed += 0.25;
        }
        assert!(approx_eq(timing.interval_for(12.0), 0.004));
        assert!(approx_eq(timing.interval_for(-12.0), 0.004));
    }

    #[test]
    fn fixed_timing_ignores_speed() {
        let def = SequenceDef::new(IDLE, ["a"], 0.25);
        assert!(approx_eq(def.effective_interval(0.0), 0.25));
        assert!(approx_eq(def.effective_interval(8.0), 0.25));
    }

    #[test]
    fn insert_rejects_duplicates() {
        let mut library = AnimationLibrary::new();
        assert!(library.insert(SequenceDef::new(IDLE, ["a"], 0.1)).is_ok());
        let err = library
            .insert(SequenceDef::new(IDLE, ["b"], 0.1))
            .unwrap_err();
        assert!(err.contains("Duplicate"));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn insert_rejects_negative_interval() {
        let mut library = AnimationLibrary::new();
        assert!(library.insert(SequenceDef::new(IDLE, ["a"], -1.0)).is_err());
        assert!(library.is_empty());
    }

    #[test]
    fn defaults_cover_every_selector_state() {
        let library = AnimationLibrary::platformer_defaults();
        for name in [IDLE, WALK, RUN, JUMP, FLIP, LAND, CROUCH, WALL] {
            assert!(library.contains(name), "missing {}", name);
        }
        assert_eq!(
            library.get(JUMP).unwrap().on_complete,
            OnComplete::ChainTo(FLIP.to_string())
        );
        assert_eq!(
            library.get(LAND).unwrap().on_complete,
            OnComplete::ChainTo(IDLE.to_string())
        );
        assert_eq!(library.get(WALK).unwrap().on_complete, OnComplete::Loop);
    }

    #[test]
    fn parses_json_with_defaults() {
        let json = r#"{
            "sequences": [
                { "name": "Idle", "frames": ["idle_0", "idle_1"] },
                { "name": "Jump", "frames": ["jump_0"], "frame_interval": 0.05,
                  "on_complete": { "ChainTo": "Flip" } },
                { "name": "Flip" }
            ]
        }"#;
        let library = AnimationLibrary::from_json_str(json).unwrap();
        assert_eq!(library.names(), vec!["Flip", "Idle", "Jump"]);

        let idle = library.get("Idle").unwrap();
        assert_eq!(idle.frames.len(), 2);
        assert_eq!(&*idle.frames[1], "idle_1");
        assert!(approx_eq(idle.frame_interval, DEFAULT_FRAME_INTERVAL));
        assert_eq!(idle.timing, FrameTiming::Fixed);

        assert!(library.get("Flip").unwrap().is_empty());
        assert_eq!(
            library.get("Jump").unwrap().on_complete,
            OnComplete::ChainTo("Flip".to_string())
        );
    }

    #[test]
    fn json_duplicate_is_an_error() {
        let json = r#"{ "sequences": [ { "name": "Idle" }, { "name": "Idle" } ] }"#;
        assert!(AnimationLibrary::from_json_str(json).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = AnimationLibrary::from_json_str("{ not json").unwrap_err();
        assert!(err.starts_with("Failed to parse animation library"));
    }

    #[test]
    fn json_output_parses_back_to_same_sequences() {
        let library = AnimationLibrary::platformer_defaults();
        let json = library.to_json_string().unwrap();
        let parsed = AnimationLibrary::from_json_str(&json).unwrap();
        assert_eq!(parsed.names(), library.names());
        assert_eq!(parsed.get(RUN), library.get(RUN));
    }
}
