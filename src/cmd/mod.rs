pub mod batch;
pub mod calc;
pub mod report;
pub mod schema;
pub mod slabs;

use crate::tax::income::InputError;
use crate::tax::TaxInput;
use clap::Args;
use rust_decimal::Decimal;

/// Salary figures shared by the single-calculation commands
#[derive(Args, Debug, Clone)]
pub struct IncomeArgs {
    /// Gross annual income before any deductions (₹)
    #[arg(short, long, default_value = "1800000")]
    pub income: Decimal,

    /// Basic salary as a percentage of gross income
    #[arg(short, long = "basic-pct", default_value = "40")]
    pub basic_pct: Decimal,

    /// NPS contribution as a percentage of basic salary (max 14)
    #[arg(short, long = "nps-pct", default_value = "10")]
    pub nps_pct: Decimal,
}

impl IncomeArgs {
    pub fn to_input(&self) -> Result<TaxInput, InputError> {
        let input = TaxInput {
            gross_income: self.income,
            basic_salary_pct: self.basic_pct,
            nps_pct: self.nps_pct,
        };
        input.validate()?;
        log::debug!("Validated input {:?}", input);
        Ok(input)
    }
}
