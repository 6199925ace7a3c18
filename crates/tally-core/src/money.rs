//! Small helpers for decimal currency values

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// `numerator / denominator` as a float, 0.0 when the denominator is zero
pub fn ratio(numerator: Decimal, denominator: Decimal) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    numerator
        .checked_div(denominator)
        .and_then(|r| r.to_f64())
        .unwrap_or(0.0)
}

/// Share of `part` in `total` as a percentage (0-100), 0.0 when total is zero
pub fn percent_of(part: Decimal, total: Decimal) -> f64 {
    ratio(part, total) * 100.0
}

/// Sum an iterator of amounts, clamped at the `Decimal` range
pub fn sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

/// Arithmetic mean, zero for an empty set
pub fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total / Decimal::from(count)
}

/// Lossy float view of an amount, for comparisons against float thresholds
pub fn to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

/// Format as dollars with two decimals, e.g. `$20.00`
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(dec!(10), Decimal::ZERO), 0.0);
        assert_eq!(percent_of(dec!(25), dec!(100)), 25.0);
    }

    #[test]
    fn test_extreme_amounts_do_not_overflow() {
        assert_eq!(sum([Decimal::MAX, Decimal::MAX, dec!(1)]), Decimal::MAX);
        assert_eq!(ratio(Decimal::MAX, dec!(0.5)), 0.0);
        assert!(ratio(Decimal::MAX, Decimal::MAX) > 0.99);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(dec!(30), 3), dec!(10));
        assert_eq!(mean(dec!(30), 0), Decimal::ZERO);
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(20)), "$20.00");
        assert_eq!(format_usd(dec!(245.675)), "$245.68");
        assert_eq!(format_usd(dec!(0.5)), "$0.50");
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum([dec!(1.10), dec!(2.20)]), dec!(3.30));
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }
}
