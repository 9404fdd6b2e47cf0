//! lintrain command line interface
//!
//! Runs the train/evaluate/persist pipeline over CSV feature splits and
//! inspects persisted models.

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use lintrain::driver;
use lintrain::persistence::SerializableModel;
use lintrain::{Config, Result};
use log::{error, info};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "lintrain")]
#[command(about = "Train and evaluate linear classifiers on CSV feature vectors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "lintrain contributors")]
struct Cli {
    /// Defaults to `train` with the standard output layout
    #[command(subcommand)]
    command: Option<Commands>,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both models, print their evaluation and save the SVC
    Train(TrainArgs),
    /// Display model information
    Info(InfoArgs),
}

#[derive(Args, Default)]
struct TrainArgs {
    /// Directory containing the split CSV files
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Name of the training split
    #[arg(long)]
    train_split: Option<String>,

    /// Name of the evaluation split
    #[arg(long)]
    test_split: Option<String>,

    /// Label decoder JSON file
    #[arg(long)]
    label_encoder: Option<PathBuf>,

    /// Output model file
    #[arg(short, long)]
    model: Option<PathBuf>,
}

impl TrainArgs {
    fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(dir) = self.csv_dir {
            config = config.with_csv_dir(dir);
        }
        if let Some(split) = self.train_split {
            config = config.with_train_split(split);
        }
        if let Some(split) = self.test_split {
            config = config.with_test_split(split);
        }
        if let Some(path) = self.label_encoder {
            config = config.with_label_encoder(path);
        }
        if let Some(path) = self.model {
            config = config.with_model_path(path);
        }
        config
    }
}

#[derive(Args)]
struct InfoArgs {
    /// Model file
    model: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Some(Commands::Train(args)) => train_command(args),
        Some(Commands::Info(args)) => info_command(args),
        None => train_command(TrainArgs::default()),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn train_command(args: TrainArgs) -> Result<()> {
    let config = args.into_config();
    info!("Training data: {:?}", config.train_path());
    info!("Evaluation data: {:?}", config.test_path());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    driver::run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn info_command(args: InfoArgs) -> Result<()> {
    info!("Loading model from: {:?}", args.model);
    let model = SerializableModel::load_from_file(&args.model)?;

    model.print_summary();

    println!("\nDecision Functions:");
    for (row, (weights, intercept)) in model
        .coefficients
        .iter()
        .zip(model.intercepts.iter())
        .enumerate()
    {
        let n_show = weights.len().min(5);
        let shown: Vec<String> = weights[..n_show].iter().map(|w| format!("{w:.6}")).collect();
        print!("  f{row}: intercept {intercept:.6}, weights [{}", shown.join(", "));
        if weights.len() > n_show {
            print!(", ... ({} more)", weights.len() - n_show);
        }
        println!("]");
    }

    Ok(())
}
