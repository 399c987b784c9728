//! Animation playback state and the state-selector bookkeeping.
//!
//! - [`Animation`] – which sequence an actor is playing and where it is in it
//! - [`AnimationSelector`] – last committed state, jump suppression window and
//!   selection thresholds
//!
//! Sequence data comes from the
//! [`AnimationLibrary`](crate::resources::animationlibrary::AnimationLibrary);
//! these components only hold per-actor state.

use std::str::FromStr;

use bevy_ecs::prelude::Component;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::resources::animationlibrary::{AnimationLibrary, FrameHandle, OnComplete};

/// Per-actor playback state.
///
/// Created with no active sequence. `frame_index` is always inside the active
/// sequence's frames, or 0 when that sequence is empty.
#[derive(Debug, Clone, Component, Default, Serialize, Deserialize)]
pub struct Animation {
    pub active: Option<String>,
    pub frame_index: usize,
    pub elapsed_time: f32,
    /// Seconds per frame used by the last tick.
    pub effective_interval: f32,
}

/// Reported when playback steps past the last frame of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEnd {
    pub finished: String,
    /// Sequence chained into, or None if the finished one looped.
    pub next: Option<String>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Switch to `name`, restarting it from frame 0.
    ///
    /// Requesting the sequence that is already active is a no-op (the timer
    /// keeps running). Unknown names log a warning and leave playback
    /// untouched. Returns false only for unknown names.
    pub fn set_active(&mut self, name: &str, library: &AnimationLibrary) -> bool {
        if self.active.as_deref() == Some(name) {
            return true;
        }
        let Some(def) = library.get(name) else {
            warn!("Animation sequence \"{}\" not found", name);
            return false;
        };
        self.active = Some(def.name.clone());
        self.frame_index = 0;
        self.elapsed_time = 0.0;
        self.effective_interval = def.frame_interval;
        debug!("Switched to animation sequence: {}", name);
        true
    }

    /// Advance playback by `dt` seconds.
    ///
    /// `speed` is the actor's horizontal speed, used by speed-scaled
    /// sequences. At most one frame is advanced per call.
    pub fn tick(&mut self, dt: f32, speed: f32, library: &AnimationLibrary) -> Option<SequenceEnd> {
        let def = library.get(self.active.as_deref()?)?;
        if def.is_empty() {
            return None;
        }

        self.effective_interval = def.effective_interval(speed);
        self.elapsed_time += dt;
        if self.elapsed_time < self.effective_interval {
            return None;
        }
        self.elapsed_time = 0.0;
        self.frame_index += 1;
        if self.frame_index < def.frames.len() {
            return None;
        }

        let finished = def.name.clone();
        if let OnComplete::ChainTo(next) = &def.on_complete
            && *next != def.name
            && self.set_active(next, library)
        {
            return Some(SequenceEnd {
                finished,
                next: Some(next.clone()),
            });
        }
        self.frame_index = 0;
        Some(SequenceEnd {
            finished,
            next: None,
        })
    }

    /// Image handle of the current frame.
    pub fn current_frame(&self, library: &AnimationLibrary) -> Option<FrameHandle> {
        let def = library.get(self.active.as_deref()?)?;
        def.frames.get(self.frame_index).cloned()
    }
}

/// How a landing interacts with an open jump-suppression window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LandingPolicy {
    /// Every landing closes the window.
    #[default]
    AlwaysClear,
    /// A landing closes the window only once `min_suppression_frames` have
    /// passed since the jump; earlier landings still show "Land" but the
    /// window stays open until the ceiling.
    RespectMinimum,
}

impl FromStr for LandingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "respect_minimum" => Ok(Self::RespectMinimum),
            "always_clear" => Ok(Self::AlwaysClear),
            other => Err(format!("Unknown landing policy \"{}\"", other)),
        }
    }
}

impl LandingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RespectMinimum => "respect_minimum",
            Self::AlwaysClear => "always_clear",
        }
    }
}

/// Thresholds used when mapping physical state to an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorTuning {
    /// Speeds at or below this count as standing still.
    pub epsilon: f32,
    /// Grounded speeds above this play "Run" instead of "Walk".
    pub walk_run_threshold: f32,
    /// Render frames a jump suppresses selection for, at most.
    pub suppression_frames: u64,
    /// Render frames after a jump before a landing may end suppression.
    pub min_suppression_frames: u64,
    pub landing_policy: LandingPolicy,
}

impl Default for SelectorTuning {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            walk_run_threshold: 5.0,
            suppression_frames: 30,
            min_suppression_frames: 10,
            landing_policy: LandingPolicy::AlwaysClear,
        }
    }
}

/// Window after a jump during which automatic selection is skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Suppression {
    pub active: bool,
    /// Frame at which the window closes on its own.
    pub until_frame: u64,
    pub jumped_frame: Option<u64>,
}

impl Suppression {
    pub fn begin(&mut self, frame: u64, budget: u64) {
        self.active = true;
        self.until_frame = frame.saturating_add(budget);
        self.jumped_frame = Some(frame);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Close the window once the ceiling frame is reached.
    pub fn expire(&mut self, frame: u64) -> bool {
        if self.active && frame >= self.until_frame {
            self.active = false;
            return true;
        }
        false
    }

    /// Apply a landing at `frame`. Returns true if it closed an open window.
    pub fn on_landing(&mut self, frame: u64, min_frames: u64, policy: LandingPolicy) -> bool {
        let was_active = self.active;
        let qualifies = match policy {
            LandingPolicy::AlwaysClear => true,
            LandingPolicy::RespectMinimum => {
                !self.active
                    || self
                        .jumped_frame
                        .is_some_and(|jumped| frame.saturating_sub(jumped) >= min_frames)
            }
        };
        if qualifies {
            self.reset();
        }
        was_active && qualifies
    }
}

/// Selector bookkeeping for one actor.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimationSelector {
    /// Last state the selector committed (or forced).
    pub current: Option<&'static str>,
    pub suppression: Suppression,
    pub tuning: SelectorTuning,
}

impl AnimationSelector {
    pub fn new(tuning: SelectorTuning) -> Self {
        Self {
            current: None,
            suppression: Suppression::default(),
            tuning,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppression.active
    }
}
