use crate::tax::regime::{
    FiscalYear, RegimeError, CESS_RATE, MAX_NPS_PCT, REBATE_THRESHOLD, STANDARD_DEDUCTION,
};
use crate::tax::slab::{calculate_slab_tax, percent_of, SlabTable};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("gross income cannot be negative: {0}")]
    NegativeIncome(Decimal),
    #[error("basic salary percentage must be between 0 and 100, got {0}")]
    BasicSalaryPctOutOfRange(Decimal),
    #[error("NPS contribution must be between 0 and 14% of basic salary, got {0}")]
    NpsPctOutOfRange(Decimal),
}

/// Raw salary figures supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxInput {
    pub gross_income: Decimal,
    pub basic_salary_pct: Decimal,
    pub nps_pct: Decimal,
}

impl TaxInput {
    pub fn validate(&self) -> Result<(), InputError> {
        if self.gross_income < Decimal::ZERO {
            return Err(InputError::NegativeIncome(self.gross_income));
        }
        if self.basic_salary_pct < Decimal::ZERO || self.basic_salary_pct > Decimal::ONE_HUNDRED {
            return Err(InputError::BasicSalaryPctOutOfRange(self.basic_salary_pct));
        }
        if self.nps_pct < Decimal::ZERO || self.nps_pct > MAX_NPS_PCT {
            return Err(InputError::NpsPctOutOfRange(self.nps_pct));
        }
        Ok(())
    }

    /// Derive deductions and taxable income
    pub fn breakdown(&self) -> IncomeBreakdown {
        let basic_salary = percent_of(self.gross_income, self.basic_salary_pct);
        let nps_deduction = percent_of(basic_salary, self.nps_pct);
        let taxable_income =
            (self.gross_income - STANDARD_DEDUCTION - nps_deduction).max(Decimal::ZERO);

        IncomeBreakdown {
            gross_income: self.gross_income,
            basic_salary,
            nps_deduction,
            standard_deduction: STANDARD_DEDUCTION,
            taxable_income,
        }
    }
}

/// Deductions applied to gross income
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeBreakdown {
    pub gross_income: Decimal,
    pub basic_salary: Decimal,
    pub nps_deduction: Decimal,
    pub standard_deduction: Decimal,
    pub taxable_income: Decimal,
}

/// Tax liability under a single slab table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxResult {
    pub base_tax: Decimal,
    pub cess: Decimal,
    pub total_tax: Decimal,
}

impl TaxResult {
    pub fn monthly_tax(&self) -> Decimal {
        self.total_tax / dec!(12)
    }
}

/// Apply the Section 87A rebate and cess on top of the slab tax.
///
/// The rebate is decided on `gross_income` (before deductions) while the slab
/// tax itself is charged on `taxable_income`.
pub fn compute_total_tax(
    gross_income: Decimal,
    taxable_income: Decimal,
    table: &SlabTable,
) -> TaxResult {
    let base_tax = if gross_income <= REBATE_THRESHOLD {
        log::debug!(
            "Gross income {} within rebate threshold {}, no tax payable",
            gross_income,
            REBATE_THRESHOLD
        );
        Decimal::ZERO
    } else {
        calculate_slab_tax(taxable_income, table)
    };
    let cess = base_tax * CESS_RATE;

    TaxResult {
        base_tax,
        cess,
        total_tax: base_tax + cess,
    }
}

/// Liability for one fiscal year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTax {
    pub year: FiscalYear,
    pub result: TaxResult,
}

/// Compute deductions and tax for a single fiscal year
pub fn calculate_for_year(
    input: &TaxInput,
    year: FiscalYear,
) -> Result<(IncomeBreakdown, YearTax), RegimeError> {
    let table = year.slab_table()?;
    let breakdown = input.breakdown();
    let result = compute_total_tax(breakdown.gross_income, breakdown.taxable_income, &table);
    log::debug!("{}: total tax {}", year, result.total_tax);
    Ok((breakdown, YearTax { year, result }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Saving(Decimal),
    Increase(Decimal),
    NoChange,
}

/// Current vs previous fiscal year comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub breakdown: IncomeBreakdown,
    pub current: YearTax,
    pub previous: YearTax,
}

impl Comparison {
    /// Current total minus previous total
    pub fn difference(&self) -> Decimal {
        self.current.result.total_tax - self.previous.result.total_tax
    }

    pub fn change(&self) -> Change {
        let difference = self.difference();
        if difference < Decimal::ZERO {
            Change::Saving(difference.abs())
        } else if difference > Decimal::ZERO {
            Change::Increase(difference)
        } else {
            Change::NoChange
        }
    }
}

/// Compare the liability for `input` under FY25-26 against FY24-25
pub fn compare(input: &TaxInput) -> Result<Comparison, RegimeError> {
    let (breakdown, current) = calculate_for_year(input, FiscalYear::CURRENT)?;
    let (_, previous) = calculate_for_year(input, FiscalYear::PREVIOUS)?;
    Ok(Comparison {
        breakdown,
        current,
        previous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(gross: Decimal, basic: Decimal, nps: Decimal) -> TaxInput {
        TaxInput {
            gross_income: gross,
            basic_salary_pct: basic,
            nps_pct: nps,
        }
    }

    fn fy25_26() -> SlabTable {
        FiscalYear::CURRENT.slab_table().unwrap()
    }

    #[test]
    fn deductions_derived_from_basic_salary() {
        let breakdown = input(dec!(1800000), dec!(40), dec!(10)).breakdown();
        assert_eq!(breakdown.basic_salary, dec!(720000));
        assert_eq!(breakdown.nps_deduction, dec!(72000));
        assert_eq!(breakdown.standard_deduction, dec!(75000));
        assert_eq!(breakdown.taxable_income, dec!(1653000));
    }

    #[test]
    fn taxable_income_never_negative() {
        let breakdown = input(dec!(50000), dec!(40), dec!(10)).breakdown();
        assert_eq!(breakdown.taxable_income, dec!(0));
    }

    #[test]
    fn rebate_applies_within_threshold() {
        let result = compute_total_tax(dec!(1200000), dec!(1100000), &fy25_26());
        assert_eq!(result, TaxResult::default());
    }

    #[test]
    fn rebate_boundary_is_inclusive() {
        let result = compute_total_tax(dec!(1275000), dec!(1200000), &fy25_26());
        assert_eq!(result.base_tax, dec!(0));
        assert_eq!(result.cess, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn rebate_uses_gross_not_taxable_income() {
        let result = compute_total_tax(dec!(1275001), dec!(1000000), &fy25_26());
        assert_eq!(result.base_tax, dec!(40000));
        assert_eq!(result.cess, dec!(1600));
        assert_eq!(result.total_tax, dec!(41600));
    }

    #[test]
    fn cess_is_four_percent_of_base_tax() {
        let table = fy25_26();
        for gross in [dec!(1300000), dec!(1800000), dec!(2500000.55), dec!(9999999)] {
            let taxable = input(gross, dec!(40), dec!(10)).breakdown().taxable_income;
            let result = compute_total_tax(gross, taxable, &table);
            assert_eq!(result.cess, result.base_tax * dec!(0.04));
            assert_eq!(result.total_tax, result.base_tax + result.cess);
        }
    }

    #[test]
    fn monthly_tax_is_a_twelfth() {
        let result = compute_total_tax(dec!(1275001), dec!(1000000), &fy25_26());
        assert_eq!(result.monthly_tax().round_dp(2), dec!(3466.67));
    }

    #[test]
    fn compare_default_salary() {
        let comparison = compare(&input(dec!(1800000), dec!(40), dec!(10))).unwrap();
        // FY25-26: 20000 + 40000 + 60000 + 53000 * 20% = 130600
        assert_eq!(comparison.current.year, FiscalYear(2026));
        assert_eq!(comparison.current.result.base_tax, dec!(130600));
        assert_eq!(comparison.current.result.total_tax, dec!(135824));
        // FY24-25: 15000 + 30000 + 45000 + 60000 + 153000 * 30% = 195900
        assert_eq!(comparison.previous.year, FiscalYear(2025));
        assert_eq!(comparison.previous.result.base_tax, dec!(195900));
        assert_eq!(comparison.previous.result.total_tax, dec!(203736));
        assert_eq!(comparison.change(), Change::Saving(dec!(67912)));
    }

    #[test]
    fn compare_within_rebate_is_no_change() {
        let comparison = compare(&input(dec!(1000000), dec!(40), dec!(10))).unwrap();
        assert_eq!(comparison.change(), Change::NoChange);
    }

    #[test]
    fn huge_income_compares_without_overflow() {
        let salary = input(dec!(10000000000000000000000000000), dec!(40), dec!(10));
        assert!(salary.validate().is_ok());
        let comparison = compare(&salary).unwrap();
        assert_eq!(comparison.breakdown.basic_salary, dec!(4000000000000000000000000000));
        assert!(comparison.current.result.total_tax > dec!(0));
        assert!(comparison.previous.result.total_tax > comparison.current.result.total_tax);

        let largest = input(Decimal::MAX, dec!(100), dec!(14));
        assert!(compare(&largest).is_ok());
    }

    #[test]
    fn negative_income_rejected() {
        assert_eq!(
            input(dec!(-1), dec!(40), dec!(10)).validate(),
            Err(InputError::NegativeIncome(dec!(-1)))
        );
    }

    #[test]
    fn basic_salary_pct_range_checked() {
        assert_eq!(
            input(dec!(100), dec!(100.5), dec!(10)).validate(),
            Err(InputError::BasicSalaryPctOutOfRange(dec!(100.5)))
        );
    }

    #[test]
    fn nps_pct_capped_at_fourteen() {
        assert!(input(dec!(100), dec!(40), dec!(14)).validate().is_ok());
        assert_eq!(
            input(dec!(100), dec!(40), dec!(15)).validate(),
            Err(InputError::NpsPctOutOfRange(dec!(15)))
        );
    }
}
