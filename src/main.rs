extern crate survival_energy;

use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use survival_energy::output::FileOutput;
use survival_energy::run_scenario;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct ScenarioArgs {
    /// JSON scenario file
    input_file: PathBuf,
    /// Directory for the CSV reports (defaults to the input file's directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = ScenarioArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input_file = args.input_file.as_path();
    let input_file_stem = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("scenario");
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        input_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let output = FileOutput::new(output_dir, format!("{input_file_stem}_{{}}.csv"));

    run_scenario(BufReader::new(File::open(input_file)?), &output)?;

    Ok(())
}
