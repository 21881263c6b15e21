//! Money formatting for API responses.
//!
//! Monetary values travel through the API twice: as a raw numeric value and
//! as a display string. Both must come from the same underlying amount, so
//! response shaping always calls [`format_price`] on the value it serializes.

use rust_decimal::Decimal;

/// Display prefix used by the storefront clients.
pub const CURRENCY_PREFIX: &str = "Rs.";

/// Renders an amount the way the clients display it: currency prefix,
/// thousands separators, two decimal places.
pub fn format_price(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int, frac)) => (int.to_string(), format!("{frac:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{CURRENCY_PREFIX} {sign}{grouped}.{frac_part}")
}

/// Line subtotal: quantity times the current unit price.
pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimal_places() {
        assert_eq!(format_price(Decimal::from(500)), "Rs. 500.00");
        assert_eq!(format_price(Decimal::new(12345, 1)), "Rs. 1,234.50");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(Decimal::from(1_234_567)), "Rs. 1,234,567.00");
        assert_eq!(format_price(Decimal::from(999)), "Rs. 999.00");
        assert_eq!(format_price(Decimal::from(1000)), "Rs. 1,000.00");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(format_price(Decimal::new(10999, 3)), "Rs. 11.00");
        assert_eq!(format_price(Decimal::ZERO), "Rs. 0.00");
    }

    #[test]
    fn negative_amounts_keep_the_sign() {
        assert_eq!(format_price(Decimal::from(-1500)), "Rs. -1,500.00");
    }

    #[test]
    fn subtotal_is_quantity_times_price() {
        assert_eq!(line_subtotal(Decimal::from(500), 2), Decimal::from(1000));
        assert_eq!(line_subtotal(Decimal::new(9950, 2), 3), Decimal::new(29850, 2));
    }
}
