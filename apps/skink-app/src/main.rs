//! Headless driver for the skink procedural animation stack.
//!
//! Two modes:
//! - `walk`: build the synthetic quadruped, drag the point of interest,
//!   run frames, and report gait events and final poses.
//! - `info`: print workspace crate versions.

use clap::{Parser, Subcommand};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skink_character::{Character, CharacterConfig};
use skink_gait::LimbId;
use skink_test_utils::{quadruped_asset, test_rig_config};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Procedural quadruped animation, headless.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless walk toward a dragged target.
    Walk {
        /// Simulated seconds to run.
        #[arg(short, long, default_value_t = 5.0)]
        seconds: f32,

        /// Frames per second.
        #[arg(short, long, default_value_t = 60.0)]
        fps: f32,

        /// Target X coordinate (character space).
        #[arg(short = 'x', long, default_value_t = 1.0)]
        target_x: f32,

        /// Target Z coordinate (character space).
        #[arg(short = 'z', long, default_value_t = 0.3)]
        target_z: f32,

        /// Re-drag the target to random points every second, seeded.
        #[arg(short = 'w', long)]
        wander: Option<u64>,

        /// Optional TOML tuning file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run_walk(
    seconds: f32,
    fps: f32,
    target_x: f32,
    target_z: f32,
    wander: Option<u64>,
    config_path: Option<&str>,
) {
    let config = match config_path {
        Some(path) => match CharacterConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => CharacterConfig::default(),
    };

    let mut character = match Character::builder(quadruped_asset())
        .with_rig(test_rig_config())
        .with_config(config)
        .build()
    {
        Ok(character) => character,
        Err(e) => {
            eprintln!("failed to build character: {e}");
            std::process::exit(1);
        }
    };

    let dt = 1.0 / fps;
    let frames = (seconds * fps).ceil() as u64;
    let mut rng = wander.map(StdRng::seed_from_u64);

    character.begin_drag();
    character.set_touch_point(Vector3::new(target_x, 0.2, target_z));

    let mut steps = 0_u64;
    for frame in 0..frames {
        if let Some(rng) = &mut rng {
            // Pick a fresh drag point once per simulated second.
            if frame % fps.max(1.0) as u64 == 0 {
                let x: f32 = rng.gen_range(-1.0..1.0);
                let z: f32 = rng.gen_range(-1.0..1.0);
                character.set_touch_point(Vector3::new(x, 0.2, z));
            }
        }

        let time = frame as f32 * dt;
        for (limb, event) in character.update(dt) {
            println!("t={time:6.3}s  {limb}  {event:?}");
            if event == skink_gait::GaitEvent::StepCompleted {
                steps += 1;
            }
        }
    }

    println!("\nafter {seconds}s at {fps} fps: {steps} completed steps");
    let forward = character.skeleton().body_forward();
    println!(
        "body forward: ({:.3}, {:.3}, {:.3})",
        forward.x, forward.y, forward.z
    );
    for limb in LimbId::ALL {
        let chain = character.chain(limb.chain_kind());
        let pos = chain.effector_world(character.skeleton());
        println!(
            "{limb}: {:?} at ({:.3}, {:.3}, {:.3})",
            character.gait_phase(limb),
            pos.x,
            pos.y,
            pos.z
        );
    }
}

fn run_info() {
    println!("skink v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    for name in [
        "skink-core",
        "skink-rig",
        "skink-ik",
        "skink-gait",
        "skink-steer",
        "skink-character",
    ] {
        println!("  {name:<16} {}", env!("CARGO_PKG_VERSION"));
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Walk {
            seconds,
            fps,
            target_x,
            target_z,
            wander,
            config,
        }) => run_walk(
            seconds,
            fps,
            target_x,
            target_z,
            wander,
            config.as_deref(),
        ),
        Some(Commands::Info) => run_info(),
        None => run_walk(5.0, 60.0, 1.0, 0.3, None, None),
    }
}
