use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{CurrencySettings, DisplayFormat, RoundingMethod};

/// Round `value` to `decimals` places using `method`.
///
/// `Up` and `Down` are ceiling and floor: they round towards positive and
/// negative infinity regardless of the sign of the value.
pub fn round(value: Decimal, decimals: u32, method: RoundingMethod) -> Decimal {
    let strategy = match method {
        RoundingMethod::Standard => RoundingStrategy::MidpointAwayFromZero,
        RoundingMethod::Up => RoundingStrategy::ToPositiveInfinity,
        RoundingMethod::Down => RoundingStrategy::ToNegativeInfinity,
    };
    let mut rounded = value.round_dp_with_strategy(decimals, strategy);
    rounded.rescale(decimals);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Format an already rounded decimal with thousands separators, keeping
/// its scale (`-1234.50` becomes `-1,234.50`).
pub fn group_thousands(value: Decimal) -> String {
    let raw = value.abs().to_string();
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    if value.is_sign_negative() && !value.is_zero() {
        grouped.insert(0, '-');
    }
    grouped
}

/// Symbol for a currency code, limited to glyphs the built-in PDF fonts can
/// encode (WinAnsi). Codes whose sign is outside that set (AED, SAR, INR,
/// KWD, ...) return `None`, and [`format_currency`] then labels the amount
/// with the code even under [`DisplayFormat::Symbol`].
pub fn symbol_for(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" | "SGD" | "HKD" => Some("$"),
        "EUR" => Some("\u{20AC}"),
        "GBP" => Some("\u{00A3}"),
        "JPY" | "CNY" => Some("\u{00A5}"),
        _ => None,
    }
}

/// Format a monetary amount for display.
///
/// ```
/// use reportgen::format::format_currency;
/// use reportgen::model::{CurrencySettings, RoundingMethod};
/// use rust_decimal::Decimal;
///
/// let settings = CurrencySettings { rounding_method: RoundingMethod::Up, ..Default::default() };
/// assert_eq!(format_currency(Decimal::new(12341, 3), "AED", &settings), "AED 12.35");
/// ```
pub fn format_currency(amount: Decimal, code: &str, settings: &CurrencySettings) -> String {
    let rounded = round(amount, settings.decimals(), settings.rounding_method);
    let digits = group_thousands(rounded);
    let code = code.trim();
    if code.is_empty() {
        return digits;
    }
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    match (settings.display_format, symbol_for(code)) {
        (DisplayFormat::Symbol, Some(symbol)) => {
            if negative {
                format!("-{symbol}{}", &digits[1..])
            } else {
                format!("{symbol}{digits}")
            }
        }
        (DisplayFormat::Both, Some(symbol)) => {
            if negative {
                format!("-{symbol}{} {code}", &digits[1..])
            } else {
                format!("{symbol}{digits} {code}")
            }
        }
        _ => format!("{code} {digits}"),
    }
}

/// Format an amount with the configured rounding but no currency label.
pub fn format_amount(amount: Decimal, settings: &CurrencySettings) -> String {
    group_thousands(round(amount, settings.decimals(), settings.rounding_method))
}
