use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use arcade_core::configuration::DEFAULT_CONFIG_FILE;
use arcade_term::prelude::*;
use clap::Parser;
use simplelog::{LevelFilter, WriteLogger};

const DEBUG_LOG_FILE: &str = "debug.log";

/// Terminal arcade: the Number game and the ASL Learning Ladder.
#[derive(Debug, Parser)]
#[command(name = "term_arcade", version, about, long_about = None)]
struct Args {
    /// Write debug logs to debug.log in the working directory
    #[arg(long)]
    debug: bool,

    /// Configuration file to read
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory for saved players and scores, overriding the configuration
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.debug {
        setup_logging()?;
    }
    log::debug!("Starting with {args:?}");

    let mut config = ArcadeConfiguration::load(&args.config)?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = Some(data_dir);
    }

    let console = Console::new(BufReader::new(io::stdin()), io::stdout());
    Arcade::new(console, config)?.run()?;
    Ok(())
}

fn setup_logging() -> anyhow::Result<()> {
    WriteLogger::init(
        LevelFilter::Debug,
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        File::create(DEBUG_LOG_FILE)?,
    )?;
    Ok(())
}
