//! Rooftop Ronin headless runner
//!
//! Plays missions with the autopilot and prints one JSON report per attempt.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use glam::Vec2;
    use rooftop_ronin::sim::autopilot;
    use rooftop_ronin::{CAMPAIGN, MissionReport, Phase, Session, Tuning, ticks_to_ms};
    use serde::Serialize;

    #[derive(Parser, Debug)]
    #[command(name = "rooftop-ronin")]
    #[command(about = "Run Rooftop Ronin missions headless with the autopilot")]
    pub struct Cli {
        /// Mission to start at (1-based)
        #[arg(long, default_value_t = 1)]
        mission: usize,
        /// Seed for reproducible layouts (thread RNG when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file overriding balance values
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Give up on an attempt after this many ticks
        #[arg(long, default_value_t = 36_000)]
        max_ticks: u64,
        /// Keep going through the rest of the campaign after a clear
        #[arg(long, default_value_t = false)]
        campaign: bool,
        /// Retries allowed per mission after a failure
        #[arg(long, default_value_t = 0)]
        retries: u32,
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 900.0)]
        height: f32,
    }

    #[derive(Serialize)]
    struct RunSummary {
        attempts: Vec<MissionReport>,
        /// Attempts abandoned at the tick limit
        timed_out: u32,
        victory: bool,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("parsing tuning file {}", path.display()))
    }

    /// Tick until the attempt ends; `None` when the tick limit hits first
    fn play_attempt(session: &mut Session, max_ticks: u64) -> Option<MissionReport> {
        let tick_hz = session.tuning.tick_hz;
        while let Some(world) = session.world() {
            if world.time_ticks >= max_ticks {
                log::warn!(
                    "Mission {} abandoned after {} ticks at x={:.0}",
                    world.level.ordinal,
                    world.time_ticks,
                    world.player.body.pos.x
                );
                return None;
            }
            let now_ms = ticks_to_ms(world.time_ticks, tick_hz);
            let input = autopilot::drive(world, now_ms);
            session.tick(&input);
        }
        session.last_report().copied()
    }

    pub fn run(cli: Cli) -> Result<()> {
        if cli.mission == 0 || cli.mission > CAMPAIGN.len() {
            bail!("mission must be between 1 and {}", CAMPAIGN.len());
        }
        if !(cli.width > 0.0 && cli.height > 0.0) {
            bail!("viewport must have a positive size");
        }
        let tuning = load_tuning(cli.tuning.as_ref())?;

        let mut session = Session::new(tuning, Vec2::new(cli.width, cli.height));
        if let Some(seed) = cli.seed {
            session = session.with_seed(seed);
        }
        session.start_at(cli.mission - 1);

        let mut summary = RunSummary {
            attempts: Vec::new(),
            timed_out: 0,
            victory: false,
        };
        let mut retries_left = cli.retries;

        loop {
            match play_attempt(&mut session, cli.max_ticks) {
                Some(report) => summary.attempts.push(report),
                None => {
                    summary.timed_out += 1;
                    session.return_to_menu();
                    break;
                }
            }
            match session.phase {
                Phase::LevelClear if cli.campaign => {
                    retries_left = cli.retries;
                    session.next_level();
                }
                Phase::GameOver if retries_left > 0 => {
                    retries_left -= 1;
                    session.continue_mission();
                }
                _ => break,
            }
            if session.phase == Phase::Victory {
                summary.victory = true;
                break;
            }
        }

        let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        println!("{json}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Rooftop Ronin (headless) starting...");
    runner::run(runner::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless runner in the browser; embedders drive `Session` directly
}
