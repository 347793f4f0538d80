// File: src/logging.rs
//! One-shot bootstrap for the `log` facade: warnings to stderr, the full
//! info stream to a file under the data directory. UI layers call this
//! once at startup; calling it twice returns an error from the logger.
use crate::context::AppContext;
use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

pub fn init(ctx: &dyn AppContext) -> Result<()> {
    let log_path = ctx.get_data_dir()?.join("hecho.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Warn,
            simplelog::Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, simplelog::Config::default(), log_file),
    ])?;

    log::info!("logging initialized at {}", log_path.display());
    Ok(())
}
