use rust_decimal::Decimal;

/// A contiguous income range taxed at a single marginal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slab {
    pub lower: Decimal,
    /// `None` for the open-ended top slab
    pub upper: Option<Decimal>,
    /// Marginal rate in percent (e.g. 5 for 5%)
    pub rate_pct: Decimal,
}

impl Slab {
    pub fn new(lower: Decimal, upper: Option<Decimal>, rate_pct: Decimal) -> Self {
        Slab {
            lower,
            upper,
            rate_pct,
        }
    }

    /// Portion of `income` falling inside `[lower, upper]`
    pub fn income_in_slab(&self, income: Decimal) -> Decimal {
        if income <= self.lower {
            return Decimal::ZERO;
        }
        let top = match self.upper {
            Some(upper) => income.min(upper),
            None => income,
        };
        top - self.lower
    }

    /// Display as "400000 - 800000" style range using the given formatter
    pub fn display_range(&self, fmt: impl Fn(Decimal) -> String) -> String {
        match self.upper {
            Some(upper) => format!("{} - {}", fmt(self.lower), fmt(upper)),
            None => format!("{} and above", fmt(self.lower)),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SlabTableError {
    #[error("slab table has no slabs")]
    Empty,
    #[error("first slab must start at 0, found {0}")]
    NonZeroStart(Decimal),
    #[error("slab {index} is empty or inverted: {lower} >= {upper}")]
    InvertedSlab {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },
    #[error("slab {index} starts at {found} but previous slab ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },
    #[error("slab {0} is unbounded but is not the last slab")]
    UnboundedInnerSlab(usize),
    #[error("last slab must be unbounded, found upper bound {0}")]
    BoundedLastSlab(Decimal),
    #[error("slab {index} rate {rate}% is outside 0-100")]
    RateOutOfRange { index: usize, rate: Decimal },
}

/// Ordered set of slabs covering `[0, +inf)` with no gaps or overlaps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabTable {
    slabs: Vec<Slab>,
}

/// Income and tax attributed to a single slab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabTax {
    pub slab: Slab,
    pub income: Decimal,
    pub tax: Decimal,
}

impl SlabTable {
    pub fn new(slabs: Vec<Slab>) -> Result<Self, SlabTableError> {
        let first = slabs.first().ok_or(SlabTableError::Empty)?;
        if !first.lower.is_zero() {
            return Err(SlabTableError::NonZeroStart(first.lower));
        }

        let last_index = slabs.len() - 1;
        for (index, slab) in slabs.iter().enumerate() {
            if slab.rate_pct < Decimal::ZERO || slab.rate_pct > Decimal::ONE_HUNDRED {
                return Err(SlabTableError::RateOutOfRange {
                    index,
                    rate: slab.rate_pct,
                });
            }
            match slab.upper {
                Some(upper) if index == last_index => {
                    return Err(SlabTableError::BoundedLastSlab(upper));
                }
                Some(upper) if slab.lower >= upper => {
                    return Err(SlabTableError::InvertedSlab {
                        index,
                        lower: slab.lower,
                        upper,
                    });
                }
                Some(upper) => {
                    let next = slabs[index + 1].lower;
                    if next != upper {
                        return Err(SlabTableError::NotContiguous {
                            index: index + 1,
                            expected: upper,
                            found: next,
                        });
                    }
                }
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedInnerSlab(index));
                }
                None => {}
            }
        }

        Ok(SlabTable { slabs })
    }

    pub fn slabs(&self) -> &[Slab] {
        &self.slabs
    }

    /// Split `taxable_income` across the slabs it reaches
    pub fn breakdown(&self, taxable_income: Decimal) -> Vec<SlabTax> {
        self.slabs
            .iter()
            .take_while(|slab| taxable_income > slab.lower)
            .map(|slab| {
                let income = slab.income_in_slab(taxable_income);
                SlabTax {
                    slab: *slab,
                    income,
                    tax: percent_of(income, slab.rate_pct),
                }
            })
            .collect()
    }
}

/// `pct` percent of `amount`.
///
/// Multiplies first for precision and falls back to dividing first when the
/// product would overflow. Never panics for `pct` in 0-100.
pub fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    match amount.checked_mul(pct) {
        Some(product) => product / Decimal::ONE_HUNDRED,
        None => amount / Decimal::ONE_HUNDRED * pct,
    }
}

/// Progressive (marginal rate) tax on `taxable_income`. No rounding is applied.
pub fn calculate_slab_tax(taxable_income: Decimal, table: &SlabTable) -> Decimal {
    table
        .breakdown(taxable_income)
        .iter()
        .map(|portion| portion.tax)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn slab(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Slab {
        Slab::new(lower, upper, rate)
    }

    fn fy25_26() -> SlabTable {
        SlabTable::new(vec![
            slab(dec!(0), Some(dec!(400000)), dec!(0)),
            slab(dec!(400000), Some(dec!(800000)), dec!(5)),
            slab(dec!(800000), Some(dec!(1200000)), dec!(10)),
            slab(dec!(1200000), Some(dec!(1600000)), dec!(15)),
            slab(dec!(1600000), Some(dec!(2000000)), dec!(20)),
            slab(dec!(2000000), Some(dec!(2400000)), dec!(25)),
            slab(dec!(2400000), None, dec!(30)),
        ])
        .unwrap()
    }

    #[test]
    fn zero_income_has_zero_tax() {
        assert_eq!(calculate_slab_tax(dec!(0), &fy25_26()), dec!(0));
    }

    #[test]
    fn ten_lakh_taxable_income() {
        // 400000 @ 5% + 200000 @ 10%
        assert_eq!(calculate_slab_tax(dec!(1000000), &fy25_26()), dec!(40000));
    }

    #[test]
    fn income_on_upper_bound_takes_none_of_next_rate() {
        let table = fy25_26();
        assert_eq!(calculate_slab_tax(dec!(800000), &table), dec!(20000));
        assert_eq!(calculate_slab_tax(dec!(800001), &table), dec!(20000.10));
    }

    #[test]
    fn top_slab_is_unbounded() {
        // 20000 + 40000 + 60000 + 80000 + 100000 + 600000 * 30%
        assert_eq!(calculate_slab_tax(dec!(3000000), &fy25_26()), dec!(480000));
    }

    #[test]
    fn fractional_income_is_not_rounded() {
        assert_eq!(calculate_slab_tax(dec!(400000.50), &fy25_26()), dec!(0.025));
    }

    #[test]
    fn slab_tax_is_non_decreasing() {
        let table = fy25_26();
        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;
        while income <= dec!(3000000) {
            let tax = calculate_slab_tax(income, &table);
            assert!(tax >= Decimal::ZERO);
            assert!(tax >= previous, "tax fell at income {}", income);
            previous = tax;
            income += dec!(12345.67);
        }
    }

    #[test]
    fn largest_income_does_not_overflow() {
        let tax = calculate_slab_tax(Decimal::MAX, &fy25_26());
        assert!(tax > dec!(0));
        assert!(tax < Decimal::MAX);
    }

    #[test]
    fn percent_of_small_and_large_amounts() {
        assert_eq!(percent_of(dec!(720000), dec!(10)), dec!(72000));
        assert_eq!(percent_of(dec!(0.50), dec!(5)), dec!(0.025));
        let big = percent_of(Decimal::MAX, dec!(100));
        assert!(big > Decimal::MAX / dec!(2));
    }

    #[test]
    fn breakdown_stops_at_income() {
        let portions = fy25_26().breakdown(dec!(1000000));
        assert_eq!(portions.len(), 3);
        assert_eq!(portions[0].income, dec!(400000));
        assert_eq!(portions[0].tax, dec!(0));
        assert_eq!(portions[1].income, dec!(400000));
        assert_eq!(portions[1].tax, dec!(20000));
        assert_eq!(portions[2].income, dec!(200000));
        assert_eq!(portions[2].tax, dec!(20000));
    }

    #[test]
    fn empty_table_rejected() {
        assert_eq!(SlabTable::new(vec![]), Err(SlabTableError::Empty));
    }

    #[test]
    fn table_must_start_at_zero() {
        let result = SlabTable::new(vec![slab(dec!(100), None, dec!(10))]);
        assert_eq!(result, Err(SlabTableError::NonZeroStart(dec!(100))));
    }

    #[test]
    fn gap_between_slabs_rejected() {
        let result = SlabTable::new(vec![
            slab(dec!(0), Some(dec!(100)), dec!(0)),
            slab(dec!(200), None, dec!(10)),
        ]);
        assert_eq!(
            result,
            Err(SlabTableError::NotContiguous {
                index: 1,
                expected: dec!(100),
                found: dec!(200),
            })
        );
    }

    #[test]
    fn inverted_slab_rejected() {
        let result = SlabTable::new(vec![
            slab(dec!(0), Some(dec!(0)), dec!(0)),
            slab(dec!(0), None, dec!(10)),
        ]);
        assert!(matches!(
            result,
            Err(SlabTableError::InvertedSlab { index: 0, .. })
        ));
    }

    #[test]
    fn last_slab_must_be_unbounded() {
        let result = SlabTable::new(vec![slab(dec!(0), Some(dec!(100)), dec!(0))]);
        assert_eq!(result, Err(SlabTableError::BoundedLastSlab(dec!(100))));
    }

    #[test]
    fn unbounded_inner_slab_rejected() {
        let result = SlabTable::new(vec![
            slab(dec!(0), None, dec!(0)),
            slab(dec!(100), None, dec!(10)),
        ]);
        assert_eq!(result, Err(SlabTableError::UnboundedInnerSlab(0)));
    }

    #[test]
    fn rate_above_hundred_rejected() {
        let result = SlabTable::new(vec![slab(dec!(0), None, dec!(101))]);
        assert_eq!(
            result,
            Err(SlabTableError::RateOutOfRange {
                index: 0,
                rate: dec!(101)
            })
        );
    }
}
