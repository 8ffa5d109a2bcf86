//! Calc command - side-by-side comparison of FY25-26 and FY24-25 liability

use crate::cmd::IncomeArgs;
use crate::money::{display_amount, display_whole, plain_amount};
use crate::tax::income::YearTax;
use crate::tax::regime::REBATE_THRESHOLD;
use crate::tax::{compare, Change, Comparison, FiscalYear};
use clap::Args;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    #[command(flatten)]
    income: IncomeArgs,

    /// Show how taxable income is spread across each year's slabs
    #[arg(long)]
    slabs: bool,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

/// Comparison data for JSON output
#[derive(Debug, Serialize)]
struct ComparisonData {
    income: IncomeData,
    current: YearData,
    previous: YearData,
    difference: String,
    change: String,
}

#[derive(Debug, Serialize)]
struct IncomeData {
    gross_income: String,
    basic_salary: String,
    nps_deduction: String,
    nps_pct: String,
    standard_deduction: String,
    taxable_income: String,
}

#[derive(Debug, Serialize)]
struct YearData {
    fiscal_year: String,
    base_tax: String,
    cess: String,
    total_tax: String,
    monthly_tax: String,
}

impl From<&YearTax> for YearData {
    fn from(year_tax: &YearTax) -> Self {
        YearData {
            fiscal_year: year_tax.year.display(),
            base_tax: plain_amount(year_tax.result.base_tax),
            cess: plain_amount(year_tax.result.cess),
            total_tax: plain_amount(year_tax.result.total_tax),
            monthly_tax: plain_amount(year_tax.result.monthly_tax()),
        }
    }
}

#[derive(Tabled)]
struct DeductionRow {
    #[tabled(rename = "Item")]
    item: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct TaxRow {
    #[tabled(rename = "")]
    item: &'static str,
    #[tabled(rename = "FY25-26 (Current)")]
    current: String,
    #[tabled(rename = "FY24-25 (Previous)")]
    previous: String,
}

#[derive(Tabled)]
struct SlabRow {
    #[tabled(rename = "Slab")]
    range: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Income in Slab")]
    income: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let input = self.income.to_input()?;
        let comparison = compare(&input)?;
        log::info!(
            "Compared {} against {} for gross income {}",
            comparison.current.year,
            comparison.previous.year,
            input.gross_income
        );

        if self.json {
            self.print_json(&comparison)
        } else {
            self.print_comparison(&comparison)
        }
    }

    fn print_comparison(&self, comparison: &Comparison) -> anyhow::Result<()> {
        let breakdown = &comparison.breakdown;

        println!();
        println!("INCOME TAX (New Regime: FY24-25 vs FY25-26)");
        println!();

        let deductions = vec![
            DeductionRow {
                item: "Gross Income",
                amount: display_amount(breakdown.gross_income),
                note: String::new(),
            },
            DeductionRow {
                item: "Basic Salary",
                amount: display_amount(breakdown.basic_salary),
                note: format!("{}% of gross", self.income.basic_pct.normalize()),
            },
            DeductionRow {
                item: "NPS Contribution",
                amount: display_amount(breakdown.nps_deduction),
                note: format!("{}% of basic", self.income.nps_pct.normalize()),
            },
            DeductionRow {
                item: "Standard Deduction",
                amount: display_amount(breakdown.standard_deduction),
                note: "Fixed".to_string(),
            },
            DeductionRow {
                item: "Taxable Income",
                amount: display_amount(breakdown.taxable_income),
                note: String::new(),
            },
        ];
        println!("{}", right_aligned(Table::new(deductions), 1));
        println!();

        let current = &comparison.current.result;
        let previous = &comparison.previous.result;
        let rows = vec![
            TaxRow {
                item: "Base Tax",
                current: display_amount(current.base_tax),
                previous: display_amount(previous.base_tax),
            },
            TaxRow {
                item: "Health & Education Cess",
                current: display_amount(current.cess),
                previous: display_amount(previous.cess),
            },
            TaxRow {
                item: "Total Tax",
                current: display_amount(current.total_tax),
                previous: display_amount(previous.total_tax),
            },
            TaxRow {
                item: "Monthly Tax",
                current: display_amount(current.monthly_tax()),
                previous: display_amount(previous.monthly_tax()),
            },
        ];
        println!("{}", right_aligned(Table::new(rows), 1));
        println!();

        match comparison.change() {
            Change::Saving(amount) => println!("▼ Saving {} in FY25-26", display_amount(amount)),
            Change::Increase(amount) => {
                println!("▲ Increase {} in FY25-26", display_amount(amount))
            }
            Change::NoChange => println!("No change"),
        }

        if self.slabs {
            for year_tax in [&comparison.current, &comparison.previous] {
                println!();
                self.print_slabs(year_tax.year, comparison)?;
            }
        }
        println!();
        Ok(())
    }

    fn print_slabs(&self, year: FiscalYear, comparison: &Comparison) -> anyhow::Result<()> {
        let table = year.slab_table()?;
        let taxable_income = comparison.breakdown.taxable_income;
        let rows: Vec<SlabRow> = table
            .breakdown(taxable_income)
            .into_iter()
            .map(|portion| SlabRow {
                range: portion.slab.display_range(display_whole),
                rate: format!("{}%", portion.slab.rate_pct),
                income: display_amount(portion.income),
                tax: display_amount(portion.tax),
            })
            .collect();

        println!("{} SLABS (Taxable Income {})", year, display_amount(taxable_income));
        if rows.is_empty() {
            println!("  No taxable income");
        } else {
            println!("{}", right_aligned(Table::new(rows), 1));
        }
        if comparison.breakdown.gross_income <= REBATE_THRESHOLD {
            println!(
                "  Section 87A rebate applies: gross income {} is within {}",
                display_amount(comparison.breakdown.gross_income),
                display_whole(REBATE_THRESHOLD)
            );
        }
        Ok(())
    }

    fn print_json(&self, comparison: &Comparison) -> anyhow::Result<()> {
        let breakdown = &comparison.breakdown;
        let change = match comparison.change() {
            Change::Saving(_) => "saving",
            Change::Increase(_) => "increase",
            Change::NoChange => "no_change",
        };

        let data = ComparisonData {
            income: IncomeData {
                gross_income: plain_amount(breakdown.gross_income),
                basic_salary: plain_amount(breakdown.basic_salary),
                nps_deduction: plain_amount(breakdown.nps_deduction),
                nps_pct: self.income.nps_pct.normalize().to_string(),
                standard_deduction: plain_amount(breakdown.standard_deduction),
                taxable_income: plain_amount(breakdown.taxable_income),
            },
            current: (&comparison.current).into(),
            previous: (&comparison.previous).into(),
            difference: plain_amount(comparison.difference()),
            change: change.to_string(),
        };

        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }
}

fn right_aligned(mut table: Table, from_column: usize) -> Table {
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(from_column..)).with(Alignment::right()));
    table
}
