//! Premium validation and euro formatting.

use super::MAX_MONTHLY_PREMIUM;
use crate::domain::Decimal;

const GROUP_SEPARATOR: char = '\u{202F}';
const CURRENCY_SUFFIX: &str = "\u{A0}€";

/// True iff `0 < premium <= 10000`.
pub fn is_valid_premium(premium: Decimal) -> bool {
    premium.is_positive() && premium <= MAX_MONTHLY_PREMIUM
}

/// Render an amount the way French-locale euro formatting does:
/// `1 234,56 €` (narrow no-break space for thousands, no-break space before
/// the symbol, always two decimals).
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_cents();
    let digits = format!("{:.2}", rounded.abs().inner());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + 8);
    if rounded.is_negative() {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(frac_part);
    out.push_str(CURRENCY_SUFFIX);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_premium_bounds() {
        assert!(is_valid_premium(dec("10000")));
        assert!(is_valid_premium(dec("0.01")));
        assert!(!is_valid_premium(dec("10000.01")));
        assert!(!is_valid_premium(Decimal::zero()));
        assert!(!is_valid_premium(dec("-5")));
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_currency(dec("321.3")), "321,30\u{A0}€");
        assert_eq!(format_currency(Decimal::zero()), "0,00\u{A0}€");
        assert_eq!(format_currency(dec("26.775")), "26,78\u{A0}€");
    }

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(format_currency(dec("1234.5")), "1\u{202F}234,50\u{A0}€");
        assert_eq!(
            format_currency(dec("1234567.891")),
            "1\u{202F}234\u{202F}567,89\u{A0}€"
        );
        assert_eq!(format_currency(dec("100000")), "100\u{202F}000,00\u{A0}€");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_currency(dec("-1500")), "-1\u{202F}500,00\u{A0}€");
        // Rounds to zero: no sign.
        assert_eq!(format_currency(dec("-0.001")), "0,00\u{A0}€");
    }
}
