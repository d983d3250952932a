//! Design engine campaign runner
//!
//! Runs a seeded multi-faction campaign and reports how each faction's
//! designs evolved.

use std::path::PathBuf;

use clap::Parser;
use fleet_forge::catalog::ComponentCatalog;
use fleet_forge::core::DesignerConfig;
use fleet_forge::sim::{run_campaign, CampaignConfig};

/// Design Sim - watch computer factions design and refit warships
#[derive(Parser, Debug)]
#[command(name = "design_sim")]
#[command(about = "Run a seeded campaign of computer factions designing warships")]
struct Args {
    /// Number of turns to simulate
    #[arg(long, default_value_t = 100)]
    turns: u32,

    /// Number of factions
    #[arg(long, default_value_t = 4)]
    factions: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Component catalog TOML (defaults to the built-in tree)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Designer config TOML (defaults to built-in constants)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full JSON report here instead of printing a summary only
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("design_sim failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> fleet_forge::core::Result<()> {
    let tree = match &args.catalog {
        Some(path) => ComponentCatalog::load(path)?,
        None => ComponentCatalog::standard()?,
    };
    let designer = match &args.config {
        Some(path) => DesignerConfig::load(path)?,
        None => DesignerConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let config = CampaignConfig {
        factions: args.factions,
        turns: args.turns,
        seed,
        ..CampaignConfig::default()
    };

    println!("Starting design campaign");
    println!("========================");
    println!("{} factions, {} turns, seed {}", config.factions, config.turns, seed);
    println!("Catalog: {} components", tree.len());
    println!();

    let output = run_campaign(&config, &tree, &designer)?;
    println!("{}", output.summary());

    println!("\n--- Final Designs ---");
    for faction in &output.factions {
        println!("{} (tech {}{})", faction.name, faction.tech_level, if faction.at_war { ", at war" } else { "" });
        for design in &faction.designs {
            println!(
                "  {:<28} {:<6} cost {:>7.1}  warp {}  ship {:>6.1}  colony {:>6.1}",
                design.name,
                design.hull.name(),
                design.cost,
                design.warp,
                design.ship_damage,
                design.colony_damage,
            );
        }
    }

    if let Some(path) = &args.output {
        std::fs::write(path, output.to_json())?;
        println!("\nFull output written to {}", path.display());
    }
    Ok(())
}
