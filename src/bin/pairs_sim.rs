//! pairs-sim - play simulated pairs-matching games and report move counts.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use pair_match::core::GameConfig;
use pair_match::players::{
    simulate_many, PerfectMemoryPolicy, RandomPolicy, SelectionPolicy, SimulationSummary,
};

/// Which automated player to use.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    /// Flip uniformly at random.
    Random,
    /// Remember every revealed symbol.
    Memory,
}

impl PolicyKind {
    fn build(self) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy),
            PolicyKind::Memory => Box::new(PerfectMemoryPolicy::new()),
        }
    }
}

/// Simulate pairs-matching games.
#[derive(Parser, Debug)]
#[command(name = "pairs-sim")]
#[command(version)]
struct Cli {
    /// JSON game config (symbols, timing, seed). Defaults to the 6-pair board.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the config's seed.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of games to play.
    #[arg(short = 'n', long, default_value_t = 1000)]
    games: usize,

    /// Player policy.
    #[arg(short, long, value_enum, default_value_t = PolicyKind::Memory)]
    policy: PolicyKind,

    /// Give up on a game after this many moves.
    #[arg(long, default_value_t = 10_000)]
    max_moves: u32,

    /// Print one JSON line per game instead of a summary.
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut policy = cli.policy.build();

    tracing::info!(
        games = cli.games,
        policy = policy.name(),
        pairs = config.pair_count(),
        seed = config.seed,
        "starting simulation"
    );

    let reports = simulate_many(&config, policy.as_mut(), cli.games, cli.max_moves)?;

    if cli.json {
        for report in &reports {
            println!("{}", serde_json::to_string(report)?);
        }
        return Ok(());
    }

    match SimulationSummary::from_reports(&reports) {
        Some(summary) => {
            println!("policy:     {}", policy.name());
            println!("pairs:      {}", config.pair_count());
            println!("games:      {}", summary.games);
            println!("wins:       {}", summary.wins);
            println!("moves min:  {}", summary.min_moves);
            println!("moves max:  {}", summary.max_moves);
            println!("moves mean: {:.2}", summary.mean_moves);
        }
        None => println!("no games played"),
    }

    Ok(())
}
