use anyhow::Context;
use clap::Parser;
use said::{IdNumber, Validator};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show the fields encoded in an identity number")]
pub struct Inspect {
    /// The identity number to decode
    id: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Inspect {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, validator: Validator) -> anyhow::Result<()> {
        let id = validator
            .parse(&self.id)
            .with_context(|| format!("'{}' is not a valid identity number", self.id))?;
        let future = id.birth_date() > validator.reference_date();

        match self.output {
            OutputFormat::Table => Self::output_table(&id, future, validator),
            OutputFormat::Json => Self::output_json(&id, future, validator)?,
        }
        Ok(())
    }

    fn output_table(id: &IdNumber, future: bool, validator: Validator) {
        println!("{}", id.grouped().to_string().info());
        println!("{}", "─────────────────".dim());

        let birth_date = if future {
            format!("{} {}", id.birth_date(), "(after reference date)".failure())
        } else {
            id.birth_date().to_string()
        };
        println!("{:<14} {birth_date}", "Birth date");
        println!("{:<14} {} ({:04})", "Gender", id.gender(), id.gender_code());
        println!("{:<14} {}", "Citizenship", id.citizenship());
        println!("{:<14} {}", "Race digit", id.race_digit());
        println!(
            "{:<14} {} {}",
            "Check digit",
            id.check_digit(),
            format!("({} parity)", validator.parity()).dim()
        );
        println!(
            "{}",
            format!("Century resolved against {}", validator.reference_date()).dim()
        );
    }

    fn output_json(id: &IdNumber, future: bool, validator: Validator) -> anyhow::Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(&to_json(id, future, validator))?
        );
        Ok(())
    }
}

fn to_json(id: &IdNumber, future: bool, validator: Validator) -> serde_json::Value {
    use serde_json::json;

    json!({
        "number": id.as_str(),
        "birth_date": id.birth_date(),
        "date_of_birth": if future { None } else { Some(id.birth_date()) },
        "gender": id.gender(),
        "gender_code": id.gender_code(),
        "citizenship": id.citizenship(),
        "race_digit": id.race_digit(),
        "check_digit": id.check_digit(),
        "parity": validator.parity(),
        "reference_date": validator.reference_date(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn validator() -> Validator {
        Validator::default().with_reference_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    #[test]
    fn json_fields() {
        let validator = validator();
        let id = validator.parse("8909185800088").unwrap();
        let value = to_json(&id, false, validator);

        assert_eq!(value["number"], "8909185800088");
        assert_eq!(value["birth_date"], "1989-09-18");
        assert_eq!(value["date_of_birth"], "1989-09-18");
        assert_eq!(value["gender"], "male");
        assert_eq!(value["gender_code"], 5800);
        assert_eq!(value["citizenship"], "citizen");
        assert_eq!(value["race_digit"], 8);
        assert_eq!(value["check_digit"], 8);
        assert_eq!(value["parity"], "even");
        assert_eq!(value["reference_date"], "2026-10-15");
    }

    #[test]
    fn future_birth_date_is_null() {
        let validator = validator();
        let id = validator.parse("2612315000080").unwrap();
        let value = to_json(&id, true, validator);

        assert_eq!(value["birth_date"], "2026-12-31");
        assert!(value["date_of_birth"].is_null());
    }

    #[test]
    fn permanent_resident_json() {
        let validator = validator();
        let id = validator.parse("8001015000180").unwrap();
        assert_eq!(
            to_json(&id, false, validator)["citizenship"],
            "permanent_resident"
        );
    }

    #[test]
    fn invalid_number_is_an_error() {
        let inspect = Inspect::try_parse_from(["inspect", "8909185800087"]).unwrap();
        let error = inspect.run(validator()).unwrap_err();
        assert!(error.to_string().contains("is not a valid identity number"));
    }
}
