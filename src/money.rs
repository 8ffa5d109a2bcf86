use rust_decimal::{Decimal, RoundingStrategy};

pub const RUPEE: &str = "₹";

/// Round to paise using half-up rounding, as shown on reports
pub fn round_paise(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Plain two decimal place amount for CSV and JSON output, e.g. "41600.00"
pub fn plain_amount(amount: Decimal) -> String {
    format!("{:.2}", round_paise(amount))
}

/// Currency display with thousands separators, e.g. "₹1,800,000.00"
pub fn display_amount(amount: Decimal) -> String {
    let rounded = round_paise(amount);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{}{}{}.{}", sign, RUPEE, group_thousands(whole), fraction)
}

/// Whole rupee display with thousands separators, e.g. "₹400,000"
pub fn display_whole(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{}{}", sign, RUPEE, group_thousands(&rounded.abs().to_string()))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
