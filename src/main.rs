//! Recipe Resource Calculator
//!
//! Flattens crafting recipes plus desired target quantities into the raw
//! resources needed to produce them.

mod calculator;
mod error;
mod loader;
mod models;

use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Parser)]
#[command(name = "resource-calculator")]
#[command(about = "Flattens crafting recipes into raw resource requirements")]
struct Cli {
    /// Directory containing recipe definitions (*.txt, searched recursively)
    recipes: PathBuf,

    /// File listing target quantities, one `<amount> <item>` per line
    target: PathBuf,

    /// File the raw resource totals are written to
    output: PathBuf,

    /// Upper bound on expansion substitutions before assuming a recipe cycle
    #[arg(long, default_value_t = calculator::DEFAULT_MAX_PASSES)]
    max_passes: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.recipes.is_dir() {
        bail!("{} is not a readable directory", cli.recipes.display());
    }

    let index = loader::load_recipes(&cli.recipes)?;
    println!(
        "Loaded {} recipes from {}",
        index.len(),
        cli.recipes.display()
    );

    let target_text = fs::read_to_string(&cli.target)
        .with_context(|| format!("failed to read {}", cli.target.display()))?;
    let targets = loader::parse_targets(&target_text)
        .with_context(|| format!("malformed target file {}", cli.target.display()))?;

    let raw = calculator::expand(&index, targets, cli.max_passes)?;

    let file = fs::File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = BufWriter::new(file);
    loader::write_results(&mut writer, &raw)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Wrote {} raw resources to {}", raw.len(), cli.output.display());
    Ok(())
}
