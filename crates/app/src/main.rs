#![warn(clippy::pedantic)]

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, info};

use gymlog_app::{
    api::Api,
    console::Console,
    log::{self as logger, FileLog},
    settings::{Overrides, Settings},
};
use gymlog_domain::Gym;

#[derive(Parser)]
#[command(name = "gymlog", about = "Record keeper for gym members, measurements and attendance")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, env = "GYMLOG_CONFIG")]
    config: Option<PathBuf>,

    /// File that log entries are appended to
    #[arg(long, env = "GYMLOG_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Minimum level of logged entries (off, error, warn, info, debug, trace)
    #[arg(long, env = "GYMLOG_LOG_LEVEL")]
    log_level: Option<LevelFilter>,

    /// Directory in which reports are written
    #[arg(long, env = "GYMLOG_REPORT_DIR")]
    report_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?.with_overrides(Overrides {
        log_file: args.log_file,
        log_level: args.log_level,
        report_dir: args.report_dir,
    });

    let log_file = FileLog::open(&settings.log_file)
        .with_context(|| format!("failed to open {}", settings.log_file.display()))?;
    logger::init(Arc::new(log_file), settings.log_level)?;
    info!("session started");

    let api = Api::new(Gym::new(), settings);
    Console::new(api, io::stdin().lock(), io::stdout().lock()).run()?;

    info!("session ended");
    Ok(())
}
