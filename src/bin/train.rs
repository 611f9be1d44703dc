use std::{fmt::Display, fs, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde::{de::DeserializeOwned, Serialize};
use tabula::{
    algo::{tabular::Hashable, SarsaAgent},
    env::Environment,
    gym::{Corridor, Maze, TicTacToe},
    observer::{Console, Observer},
    sim::{self, Player},
    train::{Trainer, TrainerConfig},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "train")]
#[command(about = "Train and replay tabular SARSA(λ) agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Environment to run
    #[arg(long, global = true, value_enum, default_value_t = EnvKind::Corridor)]
    env: EnvKind,

    /// Maze layout file, the built-in maze is used if absent
    #[arg(long, global = true)]
    layout: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run training episodes, resuming from the snapshot if it exists
    Train {
        #[arg(long, default_value_t = 1000)]
        episodes: u32,

        /// Where learned values are loaded from and saved to
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// YAML trainer configuration
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the snapshot every this many episodes, `0` saves only at the end
        #[arg(long, default_value_t = 0)]
        checkpoint_every: u32,
    },
    /// Replay one greedy episode from a snapshot on the terminal
    Play {
        #[arg(long)]
        snapshot: PathBuf,

        /// Pause between frames
        #[arg(long, default_value_t = 300)]
        delay_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EnvKind {
    Corridor,
    Maze,
    TicTacToe,
}

struct TrainArgs {
    episodes: u32,
    snapshot: Option<PathBuf>,
    config: TrainerConfig,
    checkpoint_every: u32,
}

fn train<E, F>(make_cohort: F, args: TrainArgs) -> anyhow::Result<()>
where
    E: Environment,
    E::State: Hashable + Serialize + DeserializeOwned,
    E::Action: Hashable + Serialize + DeserializeOwned,
    F: FnMut() -> Vec<E>,
{
    let mut trainer = Trainer::new(args.config, make_cohort)?;
    if let Some(path) = args.snapshot.as_ref().filter(|p| p.exists()) {
        trainer
            .load(path)
            .with_context(|| format!("failed to resume from {}", path.display()))?;
    }

    let mut totals = Vec::new();
    for n in 1..=args.episodes {
        let summary = trainer.step()?;
        totals.resize(summary.scores.len(), 0.0);
        for (total, score) in totals.iter_mut().zip(&summary.scores) {
            *total += score;
        }

        if args.checkpoint_every > 0 && n % args.checkpoint_every == 0 {
            if let Some(path) = &args.snapshot {
                trainer.save(path)?;
            }
            info!("episode {n}: last scores {:?}", summary.scores);
        }
    }

    if let Some(path) = &args.snapshot {
        trainer.save(path)?;
    }

    let episodes = f64::from(args.episodes.max(1));
    for (slot, total) in totals.iter().enumerate() {
        println!("slot {slot}: mean score {:.3}", total / episodes);
    }
    println!("Training complete after {} episode(s)", trainer.episode());
    Ok(())
}

fn play<E, F>(mut make_cohort: F, snapshot: PathBuf, delay: Duration) -> anyhow::Result<()>
where
    E: Environment + Display,
    E::State: Hashable + Serialize + DeserializeOwned,
    E::Action: Hashable + Serialize + DeserializeOwned,
    F: FnMut() -> Vec<E>,
{
    let envs = make_cohort();
    let mut trainer = Trainer::new(TrainerConfig::default(), make_cohort)?;
    trainer
        .load(&snapshot)
        .with_context(|| format!("failed to load {}", snapshot.display()))?;

    let mut players: Vec<_> = envs
        .into_iter()
        .enumerate()
        .map(|(slot, env)| Player::new(env, trainer.greedy_agent(slot)))
        .collect();
    let mut console = Console::stdout().with_delay(delay);
    let mut observers: [&mut dyn Observer<E, SarsaAgent<E::State, E::Action>>; 1] =
        [&mut console];
    let ticks = sim::run(&mut players, &mut observers);

    for (slot, player) in players.iter().enumerate() {
        println!("slot {slot}: score {}", player.env().score());
    }
    println!("Finished after {ticks} tick(s)");
    Ok(())
}

fn load_maze(layout: Option<&PathBuf>) -> anyhow::Result<Maze> {
    match layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(Maze::parse(&text)?)
        }
        None => Ok(Maze::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let maze = load_maze(cli.layout.as_ref())?;

    match cli.command {
        Commands::Train {
            episodes,
            snapshot,
            config,
            checkpoint_every,
        } => {
            let config = match config {
                Some(path) => TrainerConfig::load(&path)
                    .with_context(|| format!("failed to load {}", path.display()))?,
                None => TrainerConfig::default(),
            };
            let args = TrainArgs {
                episodes,
                snapshot,
                config,
                checkpoint_every,
            };
            match cli.env {
                EnvKind::Corridor => train(|| vec![Corridor::default()], args),
                EnvKind::Maze => train(|| vec![maze.clone()], args),
                EnvKind::TicTacToe => train(TicTacToe::cohort, args),
            }
        }
        Commands::Play { snapshot, delay_ms } => {
            let delay = Duration::from_millis(delay_ms);
            match cli.env {
                EnvKind::Corridor => play(|| vec![Corridor::default()], snapshot, delay),
                EnvKind::Maze => play(|| vec![maze.clone()], snapshot, delay),
                EnvKind::TicTacToe => play(TicTacToe::cohort, snapshot, delay),
            }
        }
    }
}
