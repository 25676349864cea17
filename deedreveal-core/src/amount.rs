//! Human-entered token amounts
//!
//! Balances and transfers are integer base units (`u128`) of a token with a
//! fixed number of fractional digits. This module converts between what a
//! person types into a form and those base units.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AmountError;

/// Fractional digits of the marketplace stablecoin.
pub const DEFAULT_DECIMALS: u8 = 6;

/// Largest supported precision. `10^36` still leaves headroom in a `u128`.
pub const MAX_DECIMALS: u8 = 36;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([0-9]+)(?:\.([0-9]*))?|\.([0-9]+))$").expect("valid regex")
});

/// Normalizes form input as it is typed. Never fails.
///
/// Keeps digits and the first decimal point, drops everything else and
/// removes redundant leading zeros. Trailing fractional zeros are kept so
/// the input does not jump while someone is typing `1.50`.
#[must_use]
pub fn sanitize_amount_input(input: &str) -> String {
    let mut integer = String::new();
    let mut fraction = String::new();
    let mut seen_point = false;

    for c in input.chars() {
        if c.is_ascii_digit() {
            if seen_point {
                fraction.push(c);
            } else {
                integer.push(c);
            }
        } else if c == '.' {
            seen_point = true;
        }
    }

    let trimmed = integer.trim_start_matches('0');
    let integer = if trimmed.is_empty() && (!integer.is_empty() || seen_point) {
        "0"
    } else {
        trimmed
    };

    if seen_point {
        format!("{integer}.{fraction}")
    } else {
        integer.to_string()
    }
}

/// Parses a human-entered amount into base units.
///
/// Accepts an optional leading `$` and `,`/`_` digit separators.
///
/// # Errors
///
/// Returns [`AmountError`] for empty or non-numeric input, for more
/// fractional digits than `decimals` allows, and on overflow.
pub fn parse_amount(input: &str, decimals: u8) -> Result<u128, AmountError> {
    check_decimals(decimals)?;

    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    let cleaned: String = trimmed.chars().filter(|c| !matches!(c, ',' | '_')).collect();
    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }

    let caps = AMOUNT_RE
        .captures(&cleaned)
        .ok_or_else(|| AmountError::Invalid {
            input: input.to_string(),
        })?;
    let integer = caps.get(1).map_or("", |m| m.as_str());
    let fraction = caps
        .get(2)
        .or_else(|| caps.get(3))
        .map_or("", |m| m.as_str())
        .trim_end_matches('0');

    if fraction.len() > usize::from(decimals) {
        return Err(AmountError::TooPrecise { decimals });
    }

    let scale = pow10(decimals)?;
    let whole = digits_to_u128(integer)?
        .checked_mul(scale)
        .ok_or(AmountError::Overflow)?;

    // fraction.len() <= decimals, so the exponent fits in a u8.
    let pad = u8::try_from(usize::from(decimals) - fraction.len())
        .map_err(|_| AmountError::Overflow)?;
    let part = digits_to_u128(fraction)?
        .checked_mul(pow10(pad)?)
        .ok_or(AmountError::Overflow)?;

    whole.checked_add(part).ok_or(AmountError::Overflow)
}

/// Formats base units as an exact decimal, trimming trailing zeros.
///
/// `format_amount(1_500_000, 6)` is `"1.5"`.
#[must_use]
pub fn format_amount(units: u128, decimals: u8) -> String {
    let (integer, fraction) = split_units(units, decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        integer
    } else {
        format!("{integer}.{fraction}")
    }
}

/// Formats base units for display: grouped integer part, fraction
/// truncated and padded to exactly `fraction_digits`.
///
/// `fraction_digits` is capped at [`MAX_DECIMALS`].
/// `format_amount_display(1_234_567_891, 6, 2)` is `"1,234.56"`.
#[must_use]
pub fn format_amount_display(units: u128, decimals: u8, fraction_digits: usize) -> String {
    let fraction_digits = fraction_digits.min(usize::from(MAX_DECIMALS));
    let (integer, fraction) = split_units(units, decimals);
    let grouped = group_thousands(&integer);
    if fraction_digits == 0 {
        return grouped;
    }

    let mut shown: String = fraction.chars().take(fraction_digits).collect();
    while shown.len() < fraction_digits {
        shown.push('0');
    }
    format!("{grouped}.{shown}")
}

/// Checks a transfer amount against the sender's balance.
///
/// # Errors
///
/// Returns [`AmountError::Zero`] for a zero amount and
/// [`AmountError::InsufficientBalance`] when the balance is too small.
pub const fn validate_transfer(amount: u128, balance: u128) -> Result<(), AmountError> {
    if amount == 0 {
        return Err(AmountError::Zero);
    }
    if amount > balance {
        return Err(AmountError::InsufficientBalance {
            requested: amount,
            available: balance,
        });
    }
    Ok(())
}

/// Rejects precisions above [`MAX_DECIMALS`].
///
/// # Errors
///
/// Returns [`AmountError::UnsupportedDecimals`] when `decimals` is too large.
pub const fn check_decimals(decimals: u8) -> Result<(), AmountError> {
    if decimals > MAX_DECIMALS {
        Err(AmountError::UnsupportedDecimals {
            decimals,
            max: MAX_DECIMALS,
        })
    } else {
        Ok(())
    }
}

fn pow10(exp: u8) -> Result<u128, AmountError> {
    10u128
        .checked_pow(u32::from(exp))
        .ok_or(AmountError::Overflow)
}

/// Folds ASCII digits into a `u128`. Callers pass regex-checked input.
fn digits_to_u128(digits: &str) -> Result<u128, AmountError> {
    digits.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(10).ok_or(AmountError::Overflow)?;
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(digit)))
            .ok_or(AmountError::Overflow)
    })
}

/// Splits base units into integer and zero-padded fraction digit strings.
fn split_units(units: u128, decimals: u8) -> (String, String) {
    let digits = units.to_string();
    let decimals = usize::from(decimals);
    if decimals == 0 {
        return (digits, String::new());
    }

    let padded = if digits.len() <= decimals {
        format!("{digits:0>width$}", width = decimals + 1)
    } else {
        digits
    };
    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    (integer.to_string(), fraction.to_string())
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_noise() {
        assert_eq!(sanitize_amount_input("$1,234.56"), "1234.56");
        assert_eq!(sanitize_amount_input(" 12 USDC"), "12");
        assert_eq!(sanitize_amount_input("abc"), "");
        assert_eq!(sanitize_amount_input(""), "");
    }

    #[test]
    fn sanitize_leading_zeros_and_points() {
        assert_eq!(sanitize_amount_input("007"), "7");
        assert_eq!(sanitize_amount_input("000"), "0");
        assert_eq!(sanitize_amount_input(".5"), "0.5");
        assert_eq!(sanitize_amount_input("."), "0.");
        assert_eq!(sanitize_amount_input("1.50"), "1.50");
        assert_eq!(sanitize_amount_input("1.2.3"), "1.23");
    }

    #[test]
    fn parse_whole_and_fractional() {
        assert_eq!(parse_amount("1", 6), Ok(1_000_000));
        assert_eq!(parse_amount("1.5", 6), Ok(1_500_000));
        assert_eq!(parse_amount("0.000001", 6), Ok(1));
        assert_eq!(parse_amount(".25", 6), Ok(250_000));
        assert_eq!(parse_amount("3.", 6), Ok(3_000_000));
        assert_eq!(parse_amount("0", 6), Ok(0));
    }

    #[test]
    fn parse_accepts_currency_formatting() {
        assert_eq!(parse_amount(" $1,234.50 ", 6), Ok(1_234_500_000));
        assert_eq!(parse_amount("1_000", 2), Ok(100_000));
    }

    #[test]
    fn parse_trailing_zeros_do_not_count_as_precision() {
        assert_eq!(parse_amount("1.500000000", 6), Ok(1_500_000));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(parse_amount("", 6), Err(AmountError::Empty));
        assert_eq!(parse_amount("  $ ", 6), Err(AmountError::Empty));
        assert!(matches!(parse_amount("1.2.3", 6), Err(AmountError::Invalid { .. })));
        assert!(matches!(parse_amount("-1", 6), Err(AmountError::Invalid { .. })));
        assert!(matches!(parse_amount("1e6", 6), Err(AmountError::Invalid { .. })));
        assert!(matches!(parse_amount(".", 6), Err(AmountError::Invalid { .. })));
    }

    #[test]
    fn parse_rejects_non_ascii_digits() {
        // Arabic-Indic one, fullwidth "1.5" and "12"
        for input in ["\u{661}", "\u{ff11}.\u{ff15}", "\u{ff11}\u{ff12}", "1\u{0662}"] {
            assert!(
                matches!(parse_amount(input, 6), Err(AmountError::Invalid { .. })),
                "{input:?} should be rejected"
            );
        }
        assert!(matches!(parse_amount("\u{661}", 0), Err(AmountError::Invalid { .. })));
    }

    #[test]
    fn parse_and_sanitize_agree_on_digits() {
        let input = "\u{ff11}\u{ff12}";
        assert_eq!(sanitize_amount_input(input), "");
        assert!(parse_amount(input, 6).is_err());
    }

    #[test]
    fn parse_rejects_excess_precision() {
        assert_eq!(
            parse_amount("0.0000001", 6),
            Err(AmountError::TooPrecise { decimals: 6 })
        );
        assert_eq!(parse_amount("1.5", 0), Err(AmountError::TooPrecise { decimals: 0 }));
    }

    #[test]
    fn parse_detects_overflow() {
        assert_eq!(
            parse_amount("1000000000000000000000000000000000000000", 0),
            Err(AmountError::Overflow)
        );
        assert_eq!(parse_amount("1000", 36), Err(AmountError::Overflow));
    }

    #[test]
    fn parse_rejects_unsupported_decimals() {
        assert_eq!(
            parse_amount("1", 37),
            Err(AmountError::UnsupportedDecimals {
                decimals: 37,
                max: MAX_DECIMALS
            })
        );
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_amount(1_500_000, 6), "1.5");
        assert_eq!(format_amount(1, 6), "0.000001");
        assert_eq!(format_amount(0, 6), "0");
        assert_eq!(format_amount(42, 0), "42");
        assert_eq!(format_amount(2_000_000, 6), "2");
    }

    #[test]
    fn display_groups_and_truncates() {
        assert_eq!(format_amount_display(1_234_567_891, 6, 2), "1,234.56");
        assert_eq!(format_amount_display(999_999, 6, 2), "0.99");
        assert_eq!(format_amount_display(5, 0, 2), "5.00");
        assert_eq!(format_amount_display(1_000_000_000_000, 6, 0), "1,000,000");
        assert_eq!(format_amount_display(123, 6, 8), "0.00012300");
    }

    #[test]
    fn display_caps_fraction_digits() {
        let shown = format_amount_display(1, 0, usize::MAX);
        assert_eq!(shown.len(), 2 + usize::from(MAX_DECIMALS));
        assert!(shown.starts_with("1."));
    }

    #[test]
    fn check_decimals_bounds() {
        assert_eq!(check_decimals(MAX_DECIMALS), Ok(()));
        assert_eq!(
            check_decimals(200),
            Err(AmountError::UnsupportedDecimals {
                decimals: 200,
                max: MAX_DECIMALS
            })
        );
    }

    #[test]
    fn transfer_validation() {
        assert_eq!(validate_transfer(0, 10), Err(AmountError::Zero));
        assert_eq!(
            validate_transfer(11, 10),
            Err(AmountError::InsufficientBalance {
                requested: 11,
                available: 10
            })
        );
        assert_eq!(validate_transfer(10, 10), Ok(()));
    }
}
