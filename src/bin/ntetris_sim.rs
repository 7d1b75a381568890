//! Headless replay: runs a seeded game with scripted controls and prints what
//! happened, ending with the textual snapshot of the scene.
//!
//! ```text
//! ntetris-sim [--seed N] [--millis N] [--frame-ms N] [--control-ms N] [--config PATH]
//! ```

use anyhow::{anyhow, bail, Context, Result};

use ntetris::core::{Game, GameConfig, LoweringResult, RubbleEvent, SimpleRng};
use ntetris::logging;
use ntetris::types::GameControl;

#[derive(Debug, Clone, PartialEq, Eq)]
struct SimArgs {
    seed: Option<u32>,
    millis: u64,
    frame_ms: u64,
    control_ms: u64,
    config: Option<String>,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            seed: None,
            millis: 120_000,
            frame_ms: 16,
            control_ms: 250,
            config: None,
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimArgs> {
    let mut parsed = SimArgs::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .ok_or_else(|| anyhow!("missing value for {}", flag))?;
        let number = || -> Result<u64> {
            value
                .parse()
                .with_context(|| format!("invalid value for {}: {}", flag, value))
        };
        match flag {
            "--seed" => parsed.seed = Some(number()? as u32),
            "--millis" => parsed.millis = number()?,
            "--frame-ms" => parsed.frame_ms = number()?.max(1),
            "--control-ms" => parsed.control_ms = number()?.max(1),
            "--config" => parsed.config = Some(value.clone()),
            other => bail!("unknown argument {}", other),
        }
        i += 2;
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    logging::init_from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let sim = parse_args(&args)?;

    let mut config = match &sim.config {
        Some(path) => GameConfig::from_json_str(
            &std::fs::read_to_string(path).with_context(|| format!("reading config {}", path))?,
        )?,
        None => GameConfig::from_env(),
    };
    if let Some(seed) = sim.seed {
        config.seed = seed;
    }

    // a second stream drives the scripted controls
    let mut script = SimpleRng::new(config.seed.wrapping_mul(31).wrapping_add(7));
    let mut game = Game::new(config)?;
    let mut next_control = sim.control_ms;

    let mut now = 0;
    while now <= sim.millis {
        let mut controls = Vec::new();
        if now >= next_control {
            next_control += sim.control_ms;
            let moves = &GameControl::ALL[..GameControl::ALL.len() - 1];
            controls.push(moves[(script.next_u32() % moves.len() as u32) as usize]);
        }

        let report = game.frame(now, &controls)?;
        for (player, result) in &report.lowerings {
            if *result != LoweringResult::Lowered {
                println!("{:>7}ms {:<5} {:?}", report.game_time, player.as_str(), result);
            }
        }
        for event in &report.events {
            if let RubbleEvent::ColumnCollapsed(col) = event {
                println!("{:>7}ms column {} collapsed", report.game_time, col);
            }
        }
        if report.game_over {
            println!("{:>7}ms game over", report.game_time);
            break;
        }
        now += sim.frame_ms;
    }

    println!("{}", game.scene().pretty_print_with_players());
    Ok(())
}
