use rust_decimal::Decimal;

use super::currency::group_thousands;

/// Plain quantity: grouped, trailing zeros dropped (`1250.500` is `1,250.5`).
pub fn format_number(value: Decimal) -> String {
    group_thousands(value.normalize())
}

/// A rate already expressed in percent (`5` is `5%`, `12.50` is `12.5%`).
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.round_dp(2).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(format_number(dec!(1250.500)), "1,250.5");
        assert_eq!(format_number(dec!(3)), "3");
        assert_eq!(format_number(dec!(-12000)), "-12,000");
        assert_eq!(format_number(dec!(0.00)), "0");
    }

    #[test]
    fn percents() {
        assert_eq!(format_percent(dec!(5)), "5%");
        assert_eq!(format_percent(dec!(12.50)), "12.5%");
        assert_eq!(format_percent(dec!(7.456)), "7.46%");
    }
}
