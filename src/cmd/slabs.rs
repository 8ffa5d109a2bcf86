//! Slabs command - show the new regime slab tables

use crate::money::display_whole;
use crate::tax::regime::{CESS_RATE, REBATE_THRESHOLD, STANDARD_DEDUCTION};
use crate::tax::FiscalYear;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SlabsCommand {
    /// Fiscal year by end year (e.g., 2026 for FY25-26). Shows all supported years if omitted
    #[arg(short, long, conflicts_with = "date")]
    year: Option<i32>,

    /// Show the slabs in force on this date (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,
}

#[derive(Tabled)]
struct SlabRow {
    #[tabled(rename = "From")]
    lower: String,
    #[tabled(rename = "To")]
    upper: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl SlabsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let years = match (self.year, self.date) {
            (Some(year), _) => vec![FiscalYear(year)],
            (None, Some(date)) => {
                let year = FiscalYear::from_date(date);
                log::debug!("{} falls in {}", date, year);
                vec![year]
            }
            (None, None) => FiscalYear::SUPPORTED.to_vec(),
        };

        for year in years {
            self.print_year(year)?;
        }

        println!(
            "Standard deduction {} | Section 87A rebate up to {} gross income | Cess {}%",
            display_whole(STANDARD_DEDUCTION),
            display_whole(REBATE_THRESHOLD),
            (CESS_RATE * Decimal::ONE_HUNDRED).normalize()
        );
        Ok(())
    }

    fn print_year(&self, year: FiscalYear) -> anyhow::Result<()> {
        let table = year.slab_table()?;
        let period = match (year.start_date(), year.end_date()) {
            (Some(start), Some(end)) => {
                format!(" ({} to {})", start.format("%-d %b %Y"), end.format("%-d %b %Y"))
            }
            _ => String::new(),
        };

        let rows: Vec<SlabRow> = table
            .slabs()
            .iter()
            .map(|slab| SlabRow {
                lower: display_whole(slab.lower),
                upper: slab.upper.map_or("-".to_string(), display_whole),
                rate: format!("{}%", slab.rate_pct),
            })
            .collect();

        let mut output = Table::new(rows);
        output
            .with(Style::rounded())
            .with(Modify::new(Columns::new(..)).with(Alignment::right()));

        println!("{} NEW REGIME{}", year, period);
        println!("{}", output);
        println!();
        Ok(())
    }
}
