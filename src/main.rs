//! Raindrop Dodge headless runner
//!
//! Drives the simulation with the autopilot at a fixed frame rate and prints
//! a JSON summary per run.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use raindrop_dodge::sim::{GameEvent, PoolStats, autopilot};
    use raindrop_dodge::{Session, Settings};

    #[derive(Parser, Debug)]
    #[command(name = "raindrop-dodge")]
    #[command(about = "Run headless Raindrop Dodge games with the autopilot")]
    struct Cli {
        /// JSON settings file (missing fields use defaults)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Frame budget per run
        #[arg(long, default_value_t = 36_000)]
        frames: u32,
        /// Milliseconds between frames
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,
        #[arg(long, default_value = "Autopilot")]
        name: String,
        #[arg(long, default_value_t = 1)]
        runs: u32,
    }

    #[derive(Debug, Serialize)]
    struct RunSummary {
        run: u32,
        player: String,
        seed: u64,
        score: u64,
        survived_secs: u32,
        spawned: u64,
        tier: u32,
        frames: u32,
        game_over: bool,
        pool: PoolStats,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        log::info!("Raindrop Dodge (headless) starting...");

        let cli = Cli::parse();
        let settings = match &cli.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let mut session = Session::new(settings, cli.seed);
        let mut now = 0.0;
        let mut summaries = Vec::with_capacity(cli.runs as usize);

        for run in 1..=cli.runs {
            session.start(&cli.name, now)?;
            let mut frames = 0;
            let mut game_over = false;

            while frames < cli.frames && !game_over {
                let intent = session.simulation().and_then(|sim| {
                    let snap = sim.snapshot();
                    autopilot::steer(snap.actor, snap.objects(), sim.settings().arena())
                });
                session.set_intent(intent)?;
                now += cli.frame_ms;
                session.advance(now)?;
                frames += 1;

                for event in session.drain_events() {
                    if let GameEvent::GameOver {
                        final_score,
                        survived_secs,
                    } = event
                    {
                        log::info!("Game over: score={final_score}, survived={survived_secs}s");
                        game_over = true;
                    }
                }
            }

            let sim = session
                .simulation()
                .context("run vanished before its summary")?;
            summaries.push(RunSummary {
                run,
                player: cli.name.trim().to_string(),
                seed: sim.seed(),
                score: sim.score(),
                survived_secs: sim.survived_secs(),
                spawned: sim.state().spawned_total,
                tier: sim.state().tier,
                frames,
                game_over,
                pool: sim.pool().stats(),
            });
            session.return_to_menu()?;
        }

        println!("{}", serde_json::to_string_pretty(&summaries)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
