use super::slab::{Slab, SlabTable, SlabTableError};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flat standard deduction under the new regime
pub const STANDARD_DEDUCTION: Decimal = dec!(75000);

/// Section 87A: no tax is payable when *gross* income is at or below this
pub const REBATE_THRESHOLD: Decimal = dec!(1275000);

/// Health & Education Cess, as a fraction of base tax
pub const CESS_RATE: Decimal = dec!(0.04);

/// Maximum NPS contribution deductible under Section 80CCD, percent of basic salary
pub const MAX_NPS_PCT: Decimal = dec!(14);

const FY24_25_SLABS: &[(i64, Option<i64>, i64)] = &[
    (0, Some(300_000), 0),
    (300_000, Some(600_000), 5),
    (600_000, Some(900_000), 10),
    (900_000, Some(1_200_000), 15),
    (1_200_000, Some(1_500_000), 20),
    (1_500_000, None, 30),
];

const FY25_26_SLABS: &[(i64, Option<i64>, i64)] = &[
    (0, Some(400_000), 0),
    (400_000, Some(800_000), 5),
    (800_000, Some(1_200_000), 10),
    (1_200_000, Some(1_600_000), 15),
    (1_600_000, Some(2_000_000), 20),
    (2_000_000, Some(2_400_000), 25),
    (2_400_000, None, 30),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegimeError {
    #[error("no slab table for {0}, supported years are FY24-25 (2025) and FY25-26 (2026)")]
    UnsupportedYear(FiscalYear),
    #[error("invalid slab table for {year}: {source}")]
    InvalidSlabs {
        year: FiscalYear,
        #[source]
        source: SlabTableError,
    },
}

/// Indian Fiscal Year (runs 1 April to 31 March)
/// The year value represents the end year (e.g., 2026 = FY25-26)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    pub const PREVIOUS: FiscalYear = FiscalYear(2025);
    pub const CURRENT: FiscalYear = FiscalYear(2026);

    /// Years with a known new regime slab table, oldest first
    pub const SUPPORTED: [FiscalYear; 2] = [FiscalYear::PREVIOUS, FiscalYear::CURRENT];

    /// Create a fiscal year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        // January to March belong to the fiscal year ending this March
        if date.month() >= 4 {
            FiscalYear(date.year() + 1)
        } else {
            FiscalYear(date.year())
        }
    }

    /// Start date of the fiscal year (1 April of previous year)
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.0
            .checked_sub(1)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 4, 1))
    }

    /// End date of the fiscal year (31 March)
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 3, 31)
    }

    /// Display as "FY25-26" format
    pub fn display(&self) -> String {
        let end = i64::from(self.0);
        format!("FY{:02}-{:02}", (end - 1).rem_euclid(100), end.rem_euclid(100))
    }

    /// New regime slab table for this fiscal year
    pub fn slab_table(&self) -> Result<SlabTable, RegimeError> {
        let bounds = match self.0 {
            2025 => FY24_25_SLABS,
            2026 => FY25_26_SLABS,
            _ => return Err(RegimeError::UnsupportedYear(*self)),
        };
        let slabs = bounds
            .iter()
            .map(|&(lower, upper, rate)| {
                Slab::new(Decimal::from(lower), upper.map(Decimal::from), Decimal::from(rate))
            })
            .collect();
        SlabTable::new(slabs).map_err(|source| RegimeError::InvalidSlabs {
            year: *self,
            source,
        })
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
