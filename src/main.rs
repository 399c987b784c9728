//! Headless platformer-core runner.
//!
//! Drives one player over a flat floor for a number of render frames and
//! prints a per-frame trace. Input comes from a fixed script, or from a seeded
//! random driver with `--seed`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use glam::Vec2;
use log::{info, warn};

use platformer_core::resources::animationlibrary::AnimationLibrary;
use platformer_core::resources::config::CoreConfig;
use platformer_core::simulation::{FlatFloor, Simulation};

/// Platformer core simulation runner
#[derive(Parser)]
#[command(version, about = "Runs the platformer gameplay core headless and prints a frame trace.")]
struct Cli {
    /// INI tuning file. Missing keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON animation library. Defaults to the built-in placeholder set.
    #[arg(long, value_name = "PATH")]
    animations: Option<PathBuf>,

    /// Render frames to simulate.
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Seconds per render frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Use random input seeded with this value instead of the script.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Write the effective animation library as JSON to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_animations: Option<PathBuf>,
}

/// Input for one frame: move axis and whether jump is held.
trait InputDriver {
    fn frame_input(&mut self, frame: u32) -> (Vec2, bool);
}

/// Idle, run right, jump, turn around mid-air, land, crouch.
struct ScriptedInput;

impl InputDriver for ScriptedInput {
    fn frame_input(&mut self, frame: u32) -> (Vec2, bool) {
        match frame {
            0..30 => (Vec2::ZERO, false),
            30..100 => (Vec2::X, false),
            100..104 => (Vec2::X, true),
            104..140 => (Vec2::NEG_X, false),
            140..170 => (Vec2::ZERO, false),
            170..200 => (Vec2::NEG_Y, false),
            200..203 => (Vec2::ZERO, true),
            _ => (Vec2::ZERO, false),
        }
    }
}

/// Changes direction every few frames and occasionally jumps.
struct RandomInput {
    rng: fastrand::Rng,
    axis: Vec2,
}

impl RandomInput {
    fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            axis: Vec2::ZERO,
        }
    }
}

impl InputDriver for RandomInput {
    fn frame_input(&mut self, frame: u32) -> (Vec2, bool) {
        if frame % 20 == 0 {
            let x = [-1.0, -0.5, 0.0, 0.5, 1.0][self.rng.usize(..5)];
            let y = if self.rng.u8(..8) == 0 { -1.0 } else { 0.0 };
            self.axis = Vec2::new(x, y);
        }
        (self.axis, self.rng.u8(..40) == 0)
    }
}

fn load_config(path: Option<PathBuf>) -> CoreConfig {
    let Some(path) = path else {
        return CoreConfig::new();
    };
    let mut config = CoreConfig::with_path(path);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    config
}

fn load_library(path: Option<PathBuf>) -> Result<AnimationLibrary, String> {
    match path {
        Some(path) => AnimationLibrary::load_from_file(path),
        None => Ok(AnimationLibrary::platformer_defaults()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = load_config(cli.config);
    let library = match load_library(cli.animations) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Early-exit: dump effective data files
    if let Some(path) = cli.write_config {
        if let Err(e) = config.save_to(&path) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }
    if let Some(path) = cli.write_animations {
        let written = library
            .to_json_string()
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        info!("Saved animation library to {:?}", path);
        return;
    }

    let mut driver: Box<dyn InputDriver> = match cli.seed {
        Some(seed) => Box::new(RandomInput::new(seed)),
        None => Box::new(ScriptedInput),
    };

    let mut sim = Simulation::new(config, library);
    let mut floor = FlatFloor::spawn(sim.world_mut(), 0.0);
    let player = sim.spawn_player(0.0, 1.0);

    println!("frame tick      x      y     vx     vy grounded anim   image     flip");
    for frame in 0..cli.frames {
        let (axis, jump) = driver.frame_input(frame);
        sim.set_move_axis(axis.x, axis.y);
        if jump {
            sim.press_jump();
        } else {
            sim.release_jump();
        }

        sim.advance(cli.frame_dt, &mut floor);

        let pos = sim.position(player).unwrap_or_default();
        let vel = sim.current_velocity(player).unwrap_or_default();
        println!(
            "{:5} {:4} {:6.2} {:6.2} {:6.2} {:6.2} {:8} {:6} {:9} {}",
            sim.frame_count(),
            sim.fixed_tick(),
            pos.x,
            pos.y,
            vel.x,
            vel.y,
            sim.is_grounded(player),
            sim.active_animation_name(player).unwrap_or("-"),
            sim.current_frame_image_handle(player).as_deref().unwrap_or("-"),
            if sim.flip_state(player) { "L" } else { "R" },
        );
    }

    info!(
        "Simulated {} frames ({} fixed ticks)",
        sim.frame_count(),
        sim.fixed_tick()
    );
}
