//! Core tuning configuration.
//!
//! Movement, jump, animation-selection and timing parameters loaded from an INI
//! file. Defaults reproduce the stock platformer feel, so a missing file or
//! key is never fatal.
//!
//! # Configuration File Format
//!
//! ```ini
//! [movement]
//! max_speed = 10
//! airborne_speed_limit = 5
//! acceleration = 3
//! deceleration = 15
//! gravity = 9.81
//!
//! [jump]
//! impulse = 7
//! buffer_window = 0.25
//!
//! [animation]
//! suppression_frames = 30
//! min_suppression_frames = 10
//! walk_run_threshold = 5
//! epsilon = 0.1
//! landing_policy = always_clear
//!
//! [time]
//! fixed_step = 0.02
//! max_fixed_ticks_per_frame = 8
//! ```

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};

use crate::components::animation::{LandingPolicy, SelectorTuning};
use crate::components::motion::MotionTuning;
use crate::resources::fixedtime::{DEFAULT_FIXED_STEP, DEFAULT_MAX_TICKS_PER_FRAME, FixedTime};

const DEFAULT_CONFIG_PATH: &str = "./platformer.ini";

/// Tuning shared by every actor the simulation spawns.
#[derive(Resource, Debug, Clone)]
pub struct CoreConfig {
    pub motion: MotionTuning,
    pub selector: SelectorTuning,
    /// Seconds per fixed physics tick.
    pub fixed_step: f32,
    /// Catch-up cap for fixed ticks in a single render frame.
    pub max_fixed_ticks_per_frame: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfig {
    pub fn new() -> Self {
        Self {
            motion: MotionTuning::default(),
            selector: SelectorTuning::default(),
            fixed_step: DEFAULT_FIXED_STEP,
            max_fixed_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from `config_path`.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&ini);
        info!("Loaded config from {:?}", self.config_path);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut ini = Ini::new();
        ini.read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&ini);
        Ok(())
    }

    fn apply(&mut self, ini: &Ini) {
        // [movement]
        let motion = &mut self.motion;
        read_positive(ini, "movement", "max_speed", &mut motion.max_speed);
        read_positive(
            ini,
            "movement",
            "airborne_speed_limit",
            &mut motion.airborne_speed_limit,
        );
        read_positive(ini, "movement", "acceleration", &mut motion.acceleration);
        read_positive(ini, "movement", "deceleration", &mut motion.deceleration);
        read_non_negative(ini, "movement", "gravity", &mut motion.gravity);

        // [jump]
        read_non_negative(ini, "jump", "impulse", &mut motion.jump_impulse);
        read_non_negative(ini, "jump", "buffer_window", &mut motion.jump_buffer_window);

        // [animation]
        let selector = &mut self.selector;
        if let Some(frames) = ini.getuint("animation", "suppression_frames").ok().flatten() {
            selector.suppression_frames = frames;
        }
        if let Some(frames) = ini
            .getuint("animation", "min_suppression_frames")
            .ok()
            .flatten()
        {
            selector.min_suppression_frames = frames;
        }
        read_non_negative(
            ini,
            "animation",
            "walk_run_threshold",
            &mut selector.walk_run_threshold,
        );
        read_non_negative(ini, "animation", "epsilon", &mut selector.epsilon);
        if let Some(policy) = ini.get("animation", "landing_policy") {
            match policy.parse::<LandingPolicy>() {
                Ok(policy) => selector.landing_policy = policy,
                Err(e) => warn!("{}; keeping {}", e, selector.landing_policy.as_str()),
            }
        }

        // [time]
        read_positive(ini, "time", "fixed_step", &mut self.fixed_step);
        if let Some(max) = ini
            .getuint("time", "max_fixed_ticks_per_frame")
            .ok()
            .flatten()
        {
            if max == 0 {
                warn!("Ignoring time.max_fixed_ticks_per_frame = 0");
            } else {
                self.max_fixed_ticks_per_frame = max.min(u32::MAX as u64) as u32;
            }
        }

        info!(
            "Config: max_speed={}, accel={}, decel={}, jump={}, buffer={}s, suppression={}/{} frames, step={}s",
            self.motion.max_speed,
            self.motion.acceleration,
            self.motion.deceleration,
            self.motion.jump_impulse,
            self.motion.jump_buffer_window,
            self.selector.min_suppression_frames,
            self.selector.suppression_frames,
            self.fixed_step
        );
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        let m = &self.motion;
        ini.set("movement", "max_speed", Some(m.max_speed.to_string()));
        ini.set(
            "movement",
            "airborne_speed_limit",
            Some(m.airborne_speed_limit.to_string()),
        );
        ini.set("movement", "acceleration", Some(m.acceleration.to_string()));
        ini.set("movement", "deceleration", Some(m.deceleration.to_string()));
        ini.set("movement", "gravity", Some(m.gravity.to_string()));

        ini.set("jump", "impulse", Some(m.jump_impulse.to_string()));
        ini.set("jump", "buffer_window", Some(m.jump_buffer_window.to_string()));

        let s = &self.selector;
        ini.set(
            "animation",
            "suppression_frames",
            Some(s.suppression_frames.to_string()),
        );
        ini.set(
            "animation",
            "min_suppression_frames",
            Some(s.min_suppression_frames.to_string()),
        );
        ini.set(
            "animation",
            "walk_run_threshold",
            Some(s.walk_run_threshold.to_string()),
        );
        ini.set("animation", "epsilon", Some(s.epsilon.to_string()));
        ini.set(
            "animation",
            "landing_policy",
            Some(s.landing_policy.as_str().to_string()),
        );

        ini.set("time", "fixed_step", Some(self.fixed_step.to_string()));
        ini.set(
            "time",
            "max_fixed_ticks_per_frame",
            Some(self.max_fixed_ticks_per_frame.to_string()),
        );
        ini
    }

    /// Render the configuration as INI text.
    pub fn to_ini_string(&self) -> String {
        self.to_ini().writes()
    }

    /// Save configuration to `config_path`, creating the file if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        self.save_to(&self.config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        self.to_ini()
            .write(path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Fixed-step clock matching `[time]`.
    pub fn fixed_time(&self) -> FixedTime {
        FixedTime::new(self.fixed_step, self.max_fixed_ticks_per_frame)
    }
}

fn read_float(ini: &Ini, section: &str, key: &str) -> Option<f32> {
    match ini.getfloat(section, key) {
        Ok(value) => value.map(|v| v as f32),
        Err(e) => {
            warn!("Ignoring {}.{}: {}", section, key, e);
            None
        }
    }
}

fn read_positive(ini: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(value) = read_float(ini, section, key) {
        if value > 0.0 {
            *target = value;
        } else {
            warn!("Ignoring {}.{} = {}: must be positive", section, key, value);
        }
    }
}

fn read_non_negative(ini: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(value) = read_float(ini, section, key) {
        if value >= 0.0 {
            *target = value;
        } else {
            warn!("Ignoring {}.{} = {}: must not be negative", section, key, value);
        }
    }
}
