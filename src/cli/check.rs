use std::{
    io::{self, BufRead},
    path::PathBuf,
    process,
};

use anyhow::Context;
use clap::Parser;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use said::{IdNumber, IdNumberError, Validator};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser)]
#[command(about = "Validate one or more identity numbers")]
pub struct Check {
    /// Identity numbers to validate
    ///
    /// When omitted, numbers are read one per line from --file or stdin.
    /// Spaces and hyphens inside a number are ignored.
    ids: Vec<String>,

    /// Read identity numbers from a file, one per line
    #[arg(long, short, value_name = "PATH", conflicts_with = "ids")]
    file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output; only the exit status reports the result
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug)]
struct Outcome<'a> {
    input: &'a str,
    result: Result<IdNumber, IdNumberError>,
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, validator: Validator) -> anyhow::Result<()> {
        let inputs = self.inputs()?;
        tracing::info!("validating {} identity numbers", inputs.len());

        let outcomes = validate_all(&inputs, validator);
        let invalid = outcomes.iter().filter(|o| o.result.is_err()).count();

        if !self.quiet {
            match self.output {
                OutputFormat::Table => Self::output_table(&outcomes, invalid),
                OutputFormat::Json => Self::output_json(&outcomes)?,
            }
        }

        if invalid > 0 {
            process::exit(2);
        }
        Ok(())
    }

    fn inputs(&self) -> anyhow::Result<Vec<String>> {
        if !self.ids.is_empty() {
            return Ok(self.ids.clone());
        }

        let lines = match &self.file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                content.lines().map(str::to_string).collect()
            }
            None => io::stdin()
                .lock()
                .lines()
                .collect::<Result<Vec<_>, _>>()
                .context("failed to read identity numbers from stdin")?,
        };

        Ok(collect_lines(lines))
    }

    fn output_table(outcomes: &[Outcome<'_>], invalid: usize) {
        let narrow = is_narrow();

        for outcome in outcomes {
            match &outcome.result {
                Ok(id) => println!("{} {}", "✓".success(), id.grouped()),
                Err(e) if narrow => {
                    println!("{} {}", "✗".failure(), outcome.input);
                    println!("  {}", e.to_string().dim());
                }
                Err(e) => println!(
                    "{} {:<20} {}",
                    "✗".failure(),
                    outcome.input,
                    e.to_string().dim()
                ),
            }
        }

        if outcomes.len() > 1 {
            println!();
            let valid = outcomes.len() - invalid;
            println!(
                "{} valid, {} invalid",
                valid.to_string().success(),
                if invalid == 0 {
                    invalid.to_string().success()
                } else {
                    invalid.to_string().failure()
                }
            );
        }
    }

    fn output_json(outcomes: &[Outcome<'_>]) -> anyhow::Result<()> {
        use serde_json::json;

        let results: Vec<_> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(id) => json!({
                    "input": outcome.input,
                    "valid": true,
                    "number": id.as_str(),
                }),
                Err(e) => json!({
                    "input": outcome.input,
                    "valid": false,
                    "error": e.to_string(),
                }),
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&results)?);
        Ok(())
    }
}

/// Trims line endings and drops blank lines.
fn collect_lines(lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Validates every input in parallel, preserving input order.
fn validate_all(inputs: &[String], validator: Validator) -> Vec<Outcome<'_>> {
    inputs
        .par_iter()
        .map(|input| Outcome {
            input,
            result: validator.parse(input),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn validator() -> Validator {
        Validator::default().with_reference_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    #[test]
    fn validate_all_preserves_order() {
        let inputs: Vec<String> = (0..200)
            .map(|i| {
                if i % 3 == 0 {
                    "8909185800088".to_string()
                } else {
                    format!("bad-{i}")
                }
            })
            .collect();

        let outcomes = validate_all(&inputs, validator());

        assert_eq!(outcomes.len(), inputs.len());
        for (i, (outcome, input)) in outcomes.iter().zip(&inputs).enumerate() {
            assert_eq!(outcome.input, input.as_str());
            assert_eq!(outcome.result.is_ok(), i % 3 == 0);
        }
    }

    #[test]
    fn collect_lines_skips_blanks() {
        let lines = vec![
            "8909185800088".to_string(),
            String::new(),
            "  890108 5800 08 8\r".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(
            collect_lines(lines),
            vec!["8909185800088".to_string(), "890108 5800 08 8".to_string()]
        );
    }

    #[test]
    fn inputs_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"8909185800088\n\n9213204720082\n").unwrap();

        let check = Check::try_parse_from(["check", "--file", file.path().to_str().unwrap()])
            .unwrap();
        assert_eq!(
            check.inputs().unwrap(),
            vec!["8909185800088".to_string(), "9213204720082".to_string()]
        );
    }

    #[test]
    fn ids_and_file_conflict() {
        assert!(Check::try_parse_from(["check", "--file", "ids.txt", "8909185800088"]).is_err());
    }

    #[test]
    fn failure_reason_is_reported() {
        let inputs = vec!["9213204720082".to_string()];
        let outcomes = validate_all(&inputs, validator());
        assert_eq!(outcomes[0].result, Err(IdNumberError::Month(13)));
    }
}
