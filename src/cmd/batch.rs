//! Batch command - compare many salaries read from CSV or JSON

use crate::money::plain_amount;
use crate::tax::{compare, TaxInput};
use anyhow::Context;
use clap::Args;
use itaxc_derive::CsvSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::schema::CsvField;

const DEFAULT_BASIC_SALARY_PCT: Decimal = dec!(40);
const DEFAULT_NPS_PCT: Decimal = dec!(10);

#[derive(Args, Debug)]
pub struct BatchCommand {
    /// CSV or JSON file of salaries (or "-" to read CSV from stdin)
    #[arg(short, long)]
    file: PathBuf,

    /// Output as JSON instead of CSV
    #[arg(long)]
    json: bool,
}

/// One salary to evaluate
#[derive(Debug, Clone, Deserialize, JsonSchema, CsvSchema)]
pub struct BatchRecord {
    /// Free text identifying the row, copied to the output
    pub label: Option<String>,
    /// Gross annual income before any deductions
    #[schemars(with = "f64")]
    pub gross_income: Decimal,
    /// Basic salary as a percentage of gross income (default 40)
    #[schemars(with = "Option<f64>")]
    pub basic_salary_percent: Option<Decimal>,
    /// NPS contribution as a percentage of basic salary, 0 to 14 (default 10)
    #[schemars(with = "Option<f64>")]
    pub nps_percent: Option<Decimal>,
}

impl BatchRecord {
    fn to_input(&self) -> TaxInput {
        TaxInput {
            gross_income: self.gross_income,
            basic_salary_pct: self.basic_salary_percent.unwrap_or(DEFAULT_BASIC_SALARY_PCT),
            nps_pct: self.nps_percent.unwrap_or(DEFAULT_NPS_PCT),
        }
    }
}

/// Output row, one per input record
#[derive(Debug, Serialize)]
pub struct BatchRow {
    pub label: String,
    pub gross_income: String,
    pub taxable_income: String,
    pub fy24_25_total_tax: String,
    pub fy25_26_total_tax: String,
    pub difference: String,
}

impl BatchCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let records = read_records(&self.file)?;
        log::info!("Read {} salaries from {}", records.len(), self.file.display());
        let rows = evaluate(&records)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            Ok(())
        } else {
            self.write_csv(&rows)
        }
    }

    fn write_csv(&self, rows: &[BatchRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn evaluate(records: &[BatchRecord]) -> anyhow::Result<Vec<BatchRow>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let row_num = index + 1;
            let input = record.to_input();
            input
                .validate()
                .with_context(|| format!("invalid salary on row {}", row_num))?;
            let comparison = compare(&input)?;
            Ok(BatchRow {
                label: record.label.clone().unwrap_or_default(),
                gross_income: plain_amount(input.gross_income),
                taxable_income: plain_amount(comparison.breakdown.taxable_income),
                fy24_25_total_tax: plain_amount(comparison.previous.result.total_tax),
                fy25_26_total_tax: plain_amount(comparison.current.result.total_tax),
                difference: plain_amount(comparison.difference()),
            })
        })
        .collect()
}

/// Read records from CSV or JSON file based on extension (or CSV on stdin with "-")
pub fn read_records(path: &Path) -> anyhow::Result<Vec<BatchRecord>> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => read_json(reader),
        _ => read_csv(reader),
    }
}

fn read_from_stdin() -> anyhow::Result<Vec<BatchRecord>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }

    read_csv(io::Cursor::new(buffer))
}

fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<BatchRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut records = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let record: BatchRecord =
            result.with_context(|| format!("parsing CSV row {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn read_json<R: Read>(reader: R) -> anyhow::Result<Vec<BatchRecord>> {
    let records = serde_json::from_reader(reader).context("parsing JSON salaries")?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_optional_columns_use_defaults() {
        let data = "label,gross_income,basic_salary_percent,nps_percent\n\
                    alice,1800000,,\n\
                    bob,1275000,50,14\n";
        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let alice = records[0].to_input();
        assert_eq!(alice.basic_salary_pct, dec!(40));
        assert_eq!(alice.nps_pct, dec!(10));

        let bob = records[1].to_input();
        assert_eq!(bob.gross_income, dec!(1275000));
        assert_eq!(bob.nps_pct, dec!(14));
    }

    #[test]
    fn json_records() {
        let data = r#"[{"gross_income": 1800000, "label": "alice"}, {"gross_income": 500000, "nps_percent": 0}]"#;
        let records = read_json(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label.as_deref(), Some("alice"));
        assert_eq!(records[1].nps_percent, Some(dec!(0)));
    }

    #[test]
    fn evaluate_rows() {
        let data = "label,gross_income\nalice,1800000\nbob,1000000\n";
        let rows = evaluate(&read_csv(data.as_bytes()).unwrap()).unwrap();

        assert_eq!(rows[0].label, "alice");
        assert_eq!(rows[0].taxable_income, "1653000.00");
        assert_eq!(rows[0].fy24_25_total_tax, "203736.00");
        assert_eq!(rows[0].fy25_26_total_tax, "135824.00");
        assert_eq!(rows[0].difference, "-67912.00");

        assert_eq!(rows[1].fy24_25_total_tax, "0.00");
        assert_eq!(rows[1].fy25_26_total_tax, "0.00");
    }

    #[test]
    fn invalid_row_reports_row_number() {
        let data = "gross_income,nps_percent\n1800000,10\n1800000,20\n";
        let err = evaluate(&read_csv(data.as_bytes()).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "invalid salary on row 2");
    }

    #[test]
    fn csv_schema_from_doc_comments() {
        let schema = BatchRecord::csv_schema();
        assert_eq!(schema.len(), 4);
        assert_eq!(schema[0].name, "label");
        assert!(!schema[0].required);
        assert_eq!(schema[1].name, "gross_income");
        assert!(schema[1].required);
        assert_eq!(
            schema[1].description,
            "Gross annual income before any deductions"
        );
    }
}
