use std::path::PathBuf;

mod check;
mod checksum;
mod inspect;
mod terminal;

use anyhow::Context;
use chrono::NaiveDate;
use check::Check;
use checksum::Checksum;
use clap::ArgAction;
use inspect::Inspect;
use said::{Config, DoublingParity, Validator};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pin today's date (YYYY-MM-DD) instead of reading the clock
    ///
    /// The date decides which century a two digit birth year belongs to and
    /// which birth dates lie in the future.
    #[arg(long, value_name = "DATE", global = true)]
    today: Option<NaiveDate>,

    /// Checksum doubling rule (even or odd), overriding the config file
    #[arg(long, global = true)]
    parity: Option<DoublingParity>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let validator = self.validator()?;
        self.command.run(validator)
    }

    fn validator(&self) -> anyhow::Result<Validator> {
        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("could not load {}", path.display()))?,
            None => Config::default(),
        };
        tracing::debug!(?config, "loaded configuration");

        let mut validator = Validator::new(&config);
        if let Some(parity) = self.parity {
            validator = validator.with_parity(parity);
        }
        // Read the clock once so every number in this run shares one reference date.
        let today = self.today.unwrap_or_else(|| validator.reference_date());
        Ok(validator.with_reference_date(today))
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Validate identity numbers
    ///
    /// Exits with status 2 if any number is invalid.
    Check(Check),

    /// Decode the fields of a valid identity number
    Inspect(Inspect),

    /// Compute the check digit for a twelve digit prefix
    Checksum(Checksum),
}

impl Command {
    fn run(self, validator: Validator) -> anyhow::Result<()> {
        match self {
            Self::Check(command) => command.run(validator)?,
            Self::Inspect(command) => command.run(validator)?,
            Self::Checksum(command) => command.run(validator)?,
        }
        Ok(())
    }
}
