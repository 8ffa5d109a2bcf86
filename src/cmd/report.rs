//! Report command - plain text income tax report for a single fiscal year

use crate::cmd::IncomeArgs;
use crate::money::display_amount;
use crate::tax::income::{calculate_for_year, IncomeBreakdown};
use crate::tax::{FiscalYear, TaxResult};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;

const RULE_WIDTH: usize = 50;

#[derive(Args, Debug)]
pub struct ReportCommand {
    #[command(flatten)]
    income: IncomeArgs,

    /// Fiscal year to report, by end year (2026 for FY25-26, 2025 for FY24-25)
    #[arg(short, long, default_value_t = FiscalYear::CURRENT.0)]
    year: i32,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Open the written report with the system default application
    #[arg(long)]
    open: bool,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.income.to_input()?;
        let (breakdown, year_tax) = calculate_for_year(&input, FiscalYear(self.year))?;
        let report = generate_report(&breakdown, &year_tax.result);

        let path = match (&self.output, self.open) {
            (Some(path), _) => path.clone(),
            (None, true) => std::env::temp_dir().join("tax_report.txt"),
            (None, false) => {
                println!("{}", report);
                return Ok(());
            }
        };

        std::fs::write(&path, format!("{}\n", report))
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("{} report written to {}", year_tax.year, path.display());
        println!("Tax report written to: {}", path.display());

        if self.open {
            opener::open(&path)?;
        }
        Ok(())
    }
}

struct Section<'a> {
    title: &'a str,
    lines: Vec<(&'a str, Decimal)>,
}

/// Render the downloadable text report
pub fn generate_report(breakdown: &IncomeBreakdown, result: &TaxResult) -> String {
    let sections = [
        Section {
            title: "Income Details",
            lines: vec![
                ("Total Income", breakdown.gross_income),
                ("Basic Salary", breakdown.basic_salary),
                ("NPS Deduction", breakdown.nps_deduction),
                ("Standard Deduction", breakdown.standard_deduction),
                ("Taxable Income", breakdown.taxable_income),
            ],
        },
        Section {
            title: "Tax Calculation",
            lines: vec![
                ("Base Tax", result.base_tax),
                ("Health & Education Cess", result.cess),
                ("Total Tax", result.total_tax),
                ("Monthly Tax", result.monthly_tax()),
            ],
        },
        Section {
            title: "Additional Info",
            lines: vec![("Monthly Tax", result.monthly_tax())],
        },
    ];

    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec!["INCOME TAX REPORT".to_string(), rule.clone()];
    for section in &sections {
        lines.push(String::new());
        lines.push(format!("--- {} ---", section.title));
        for (label, value) in &section.lines {
            lines.push(format!("{}: {}", label, display_amount(*value)));
        }
    }
    lines.push(rule);
    lines.join("\n")
}
