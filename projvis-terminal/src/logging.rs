/// Logging setup
///
/// The viewer owns the terminal while it runs, so log output never goes to
/// stderr; it is written to a file when one is requested and dropped otherwise.
use std::fs::File;
use std::path::PathBuf;

use anyhow::Context as _;
use log::LevelFilter;

/// A [`clap::Args`] struct for options controlling log output.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct LoggingArgs {
    /// Write log messages to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Include debug messages in the log.
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}

impl LoggingArgs {
    pub fn level(&self) -> LevelFilter {
        match (&self.log_file, self.verbose) {
            (None, _) => LevelFilter::Off,
            (Some(_), false) => LevelFilter::Info,
            (Some(_), true) => LevelFilter::Debug,
        }
    }
}

/// Install a [`log`] global logger based on user-provided `options`.
pub fn install(options: &LoggingArgs) -> Result<(), anyhow::Error> {
    let Some(path) = &options.log_file else {
        log::set_max_level(LevelFilter::Off);
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    simplelog::WriteLogger::init(
        options.level(),
        simplelog::ConfigBuilder::new()
            .set_target_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Off)
            .build(),
        file,
    )
    .context("failed to initialize logging")?;
    Ok(())
}
