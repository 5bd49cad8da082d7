//! Fixed-width text layout
//!
//! Helpers for the 42-column receipt grid: two-column alignment, width
//! trimming and money/quantity formatting.

use rust_decimal::prelude::*;

use crate::encoding::sanitize;

/// Printable line width of the receipt grid, in characters.
pub const LINE_WIDTH: usize = 42;

/// Truncate `value` to at most `width` characters.
///
/// Values longer than the width keep `width - 1` characters plus a `.`
/// marker; a width of 1 keeps the first character alone.
pub fn trim_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 1 {
        return value.chars().take(1).collect();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('.');
    out
}

/// Lay `left` and `right` out on one line of `width` characters.
///
/// When both fit, `left` is padded so `right` ends flush at `width`.
/// Otherwise `left` is truncated to leave one separator space and the
/// right column keeps at most `width - 1` characters.
pub fn two_col(left: &str, right: &str, width: usize) -> String {
    let l = sanitize(left);
    let r = sanitize(right);
    if r.is_empty() {
        return trim_width(&l, width);
    }

    let l_len = l.chars().count();
    let r_len = r.chars().count();
    if l_len + 1 + r_len <= width {
        let mut out = l;
        out.extend(std::iter::repeat_n(' ', width - l_len - r_len));
        out.push_str(&r);
        return out;
    }

    let keep_left = width.saturating_sub(r_len + 1);
    format!(
        "{} {}",
        trim_width(&l, keep_left),
        trim_width(&r, r_len.min(width.saturating_sub(1)))
    )
}

/// Horizontal rule of `-`; width clamped to [24,64].
pub fn rule(width: usize) -> String {
    "-".repeat(width.clamp(24, 64))
}

/// Format a monetary value: 2 decimals (half-up), decimal comma,
/// space-grouped thousands, `EUR` suffix (`"1 234,50 EUR"`).
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (int_digits, frac_digits) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{},{} EUR", sign, group_thousands(int_digits), frac_digits)
}

/// Format a quantity: whole values print without decimals, fractional
/// values with up to 3 decimals and no trailing zeros (`"3"`, `"2.5"`).
pub fn format_qty(value: Decimal) -> String {
    if value.fract().is_zero() {
        return value.trunc().to_string();
    }
    let rounded = value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.3}", rounded);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut out = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(*c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_col_pads_to_exact_width() {
        let line = two_col("Subtotal", "12,34 EUR", LINE_WIDTH);
        assert_eq!(line.chars().count(), LINE_WIDTH);
        assert!(line.ends_with("12,34 EUR"));
        assert!(line.starts_with("Subtotal"));
    }

    #[test]
    fn test_two_col_empty_right_trims_left() {
        assert_eq!(two_col("Hello", "", 42), "Hello");
        let long = "x".repeat(60);
        let line = two_col(&long, "", 42);
        assert_eq!(line.chars().count(), 42);
        assert!(line.ends_with('.'));
    }

    #[test]
    fn test_two_col_truncates_overflowing_left() {
        let left = "Produto com um nome absurdamente comprido para caber".repeat(2);
        let line = two_col(&left, "1,00 EUR", 42);
        assert_eq!(line.chars().count(), 42);
        assert!(line.ends_with("1,00 EUR"));
        // one separator space before the right column
        assert_eq!(line.chars().nth(42 - 9), Some(' '));
    }

    #[test]
    fn test_trim_width_properties() {
        assert_eq!(trim_width("abc", 0), "");
        assert_eq!(trim_width("abc", 5), "abc");
        assert_eq!(trim_width("abcdef", 1), "a");
        assert_eq!(trim_width("abcdef", 4), "abc.");
        assert_eq!(trim_width("abcdef", 4).chars().count(), 4);
    }

    #[test]
    fn test_rule_clamps_width() {
        assert_eq!(rule(42).len(), 42);
        assert_eq!(rule(5).len(), 24);
        assert_eq!(rule(200).len(), 64);
    }

    #[test]
    fn test_format_money_rounds_half_up() {
        assert_eq!(format_money(Decimal::new(12345, 3)), "12,35 EUR");
        assert_eq!(format_money(Decimal::new(100, 2)), "1,00 EUR");
        assert_eq!(format_money(Decimal::ZERO), "0,00 EUR");
    }

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(Decimal::new(123450, 2)), "1 234,50 EUR");
        assert_eq!(format_money(Decimal::new(123456789, 2)), "1 234 567,89 EUR");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(Decimal::new(-550, 2)), "-5,50 EUR");
    }

    #[test]
    fn test_format_qty() {
        assert_eq!(format_qty(Decimal::from(3)), "3");
        assert_eq!(format_qty(Decimal::new(30, 1)), "3");
        assert_eq!(format_qty(Decimal::new(25, 1)), "2.5");
        assert_eq!(format_qty(Decimal::new(125, 3)), "0.125");
        assert_eq!(format_qty(Decimal::new(12345, 4)), "1.235");
    }
}
