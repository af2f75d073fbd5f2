mod config;
mod distance;
mod embed;
mod progress;
mod stimuli;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::{Config, DEFAULT_CONFIG_FILE};
use embed::bert::BertEmbedder;
use embed::elmo::ElmoEmbedder;
use embed::TokenEmbedder;

#[derive(Parser)]
#[command(
    name = "stimdist",
    version,
    about = "Pairwise contextual-embedding distances for ambiguous-word stimuli"
)]
struct Cli {
    /// Path to a stimdist.toml config (default: ./stimdist.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute all pairwise distances and write the output table
    Run {
        /// Override the input stimuli CSV
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the output CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write a default stimdist.toml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { input, output } => run(&config, input, output),
        Commands::Init => {
            config.save(Path::new(DEFAULT_CONFIG_FILE))?;
            println!("Wrote {DEFAULT_CONFIG_FILE}");
            Ok(())
        }
    }
}

fn run(config: &Config, input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let input = input.unwrap_or_else(|| config.paths.stimuli.clone());
    let output = output.unwrap_or_else(|| config.paths.output.clone());

    let rows = stimuli::load_stimuli(&input)?;
    println!("{} words with 4 sentence pairs each.", rows.len());

    let elmo = ElmoEmbedder::new(&config.providers.elmo.url, config.providers.elmo.layer);
    let bert = BertEmbedder::new(&config.providers.bert.url);
    println!(
        "Providers: {} (layer {}), {}",
        elmo.name(),
        config.providers.elmo.layer,
        bert.name()
    );

    let records = distance::compute_distances(&rows, &elmo, &bert)?;
    stimuli::write_records(&output, &records)?;

    println!("Wrote {} comparisons to {}", records.len(), output.display());
    Ok(())
}
