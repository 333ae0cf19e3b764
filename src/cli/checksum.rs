use anyhow::Context;
use clap::Parser;
use said::{Validator, domain::checksum::complete};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Compute the check digit for the first twelve digits")]
pub struct Checksum {
    /// The first twelve digits of an identity number
    prefix: String,

    /// Print only the completed thirteen digit number
    #[arg(long, short)]
    quiet: bool,
}

impl Checksum {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, validator: Validator) -> anyhow::Result<()> {
        let number = complete(&self.prefix, validator.parity())
            .with_context(|| format!("cannot compute a check digit for '{}'", self.prefix))?;
        let digit = &number[number.len() - 1..];

        if self.quiet {
            println!("{number}");
        } else {
            println!("Check digit: {}", digit.success());
            println!("Number:      {number}");
            println!("{}", format!("({} parity)", validator.parity()).dim());
        }
        Ok(())
    }
}
