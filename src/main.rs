//! Lane Runner headless entry point
//!
//! Drives a session at a fixed frame rate with the autopilot steering, logs
//! the HUD once a second and prints a JSON run summary on exit.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use lane_runner::highscores::{FileHighScore, default_path};
use lane_runner::hud::{FrameSink, FrameView};
use lane_runner::sim::{GamePhase, TickInput};
use lane_runner::{Session, Settings, Tuning};

/// Headless runner for the lane-runner gameplay core.
#[derive(Debug, Parser)]
#[command(name = "lane-runner", version, about)]
struct Args {
    /// RNG seed; taken from the clock when not set.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Wall-clock seconds to simulate.
    #[arg(long, default_value = "60", value_name = "SECS")]
    seconds: f32,

    /// Simulated render frames per second.
    #[arg(long, default_value = "60", value_name = "RATE")]
    fps: u32,

    /// High score file. Overrides the settings file and the XDG default.
    #[arg(long, value_name = "FILE")]
    high_score_file: Option<PathBuf>,

    /// Tuning JSON (speeds, durations, generation weights).
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Settings JSON (volumes, FPS counter, high score path).
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Extra runs to start after losing.
    #[arg(long, default_value = "0", value_name = "N")]
    replays: u32,
}

/// Logs the HUD at most once per simulated second
#[derive(Default)]
struct HudLogger {
    last_second: Option<String>,
}

impl FrameSink for HudLogger {
    fn draw(&mut self, frame: &FrameView<'_>) {
        if self.last_second.as_ref() == Some(&frame.hud.time) {
            return;
        }
        self.last_second = Some(frame.hud.time.clone());
        let hud = frame.hud;
        log::info!(
            "{} | {} | {} | z={:.1} lane={:?} blocks={}{}{}",
            hud.time,
            hud.score,
            hud.high_score,
            frame.camera.position.z,
            frame.character.lane,
            frame.scene.block_count(),
            hud.fps.as_deref().map(|f| format!(" | {}", f)).unwrap_or_default(),
            if hud.effects.is_empty() {
                String::new()
            } else {
                format!(" | {}", hud.effects.join(", "))
            },
        );
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    anyhow::ensure!(args.fps > 0, "--fps must be positive");
    anyhow::ensure!(args.seconds >= 0.0, "--seconds must not be negative");

    let mut settings = Settings::load_or_default(args.settings.as_deref());
    settings.autopilot = true;
    let tuning = Tuning::load_or_default(args.tuning.as_deref());

    let high_score_path = args
        .high_score_file
        .clone()
        .or_else(|| settings.high_score_path.clone())
        .unwrap_or_else(default_path);
    log::info!("High score file: {}", high_score_path.display());

    let seed = args.seed.unwrap_or_else(clock_seed);
    let audio = settings.audio();
    let mut session = Session::new(
        seed,
        tuning,
        settings,
        Box::new(FileHighScore::new(high_score_path)),
        Box::new(audio),
    );

    let dt = 1.0 / args.fps as f32;
    let frames = (args.seconds * args.fps as f32).ceil() as u64;
    let mut replays_left = args.replays;
    let mut hud_logger = HudLogger::default();

    for _ in 0..frames {
        if session.state().phase == GamePhase::Lost {
            if replays_left == 0 {
                break;
            }
            replays_left -= 1;
            session.queue_input(&TickInput {
                replay: true,
                autopilot: true,
                ..TickInput::default()
            });
        }
        if !session.frame(dt) {
            break;
        }
        session.render(&mut hud_logger);
    }

    let summary = session.summary();
    let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
    println!("{}", json);
    Ok(())
}
