use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];
const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];
const SCALES: [(u64, &str); 4] = [
    (1_000_000_000_000, "Trillion"),
    (1_000_000_000, "Billion"),
    (1_000_000, "Million"),
    (1_000, "Thousand"),
];

/// English words for a whole number (`1250` is `One Thousand Two Hundred Fifty`).
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }
    let mut parts = Vec::new();
    let mut rest = n;
    for (scale, name) in SCALES {
        if rest >= scale {
            parts.push(format!("{} {name}", below_thousand(rest / scale)));
            rest %= scale;
        }
    }
    if rest > 0 {
        parts.push(below_thousand(rest));
    }
    parts.join(" ")
}

fn below_thousand(n: u64) -> String {
    let mut parts = Vec::new();
    let hundreds = n / 100;
    let rest = (n % 100) as usize;
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    if rest >= 20 {
        let ones = rest % 10;
        if ones == 0 {
            parts.push(TENS[rest / 10].to_string());
        } else {
            parts.push(format!("{}-{}", TENS[rest / 10], ONES[ones]));
        }
    } else if rest > 0 {
        parts.push(ONES[rest].to_string());
    }
    parts.join(" ")
}

/// Amount in words for invoice totals:
/// `1250.50 AED` is `One Thousand Two Hundred Fifty AED and 50/100 Only`.
pub fn amount_in_words(amount: Decimal, code: &str, decimals: u32) -> String {
    let rounded = amount.abs().round_dp(decimals);
    let whole = rounded.trunc().to_u64().unwrap_or(u64::MAX);
    let mut out = String::new();
    if amount.is_sign_negative() && !rounded.is_zero() {
        out.push_str("Minus ");
    }
    out.push_str(&number_to_words(whole));
    let code = code.trim();
    if !code.is_empty() {
        out.push(' ');
        out.push_str(code);
    }
    if decimals > 0 {
        let scale = Decimal::from(10u64.pow(decimals.min(9)));
        let minor = (rounded.fract() * scale).trunc().to_u64().unwrap_or(0);
        if minor > 0 {
            out.push_str(&format!(" and {minor:0width$}/{scale}", width = decimals.min(9) as usize));
        }
    }
    out.push_str(" Only");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_numbers() {
        assert_eq!(number_to_words(0), "Zero");
        assert_eq!(number_to_words(7), "Seven");
        assert_eq!(number_to_words(40), "Forty");
        assert_eq!(number_to_words(95), "Ninety-Five");
        assert_eq!(number_to_words(105), "One Hundred Five");
        assert_eq!(number_to_words(1250), "One Thousand Two Hundred Fifty");
        assert_eq!(
            number_to_words(2_000_017),
            "Two Million Seventeen"
        );
    }

    #[test]
    fn amounts_with_minor_units() {
        assert_eq!(
            amount_in_words(dec!(1250.50), "AED", 2),
            "One Thousand Two Hundred Fifty AED and 50/100 Only"
        );
        assert_eq!(amount_in_words(dec!(100), "USD", 2), "One Hundred USD Only");
        assert_eq!(amount_in_words(dec!(3.05), "", 2), "Three and 05/100 Only");
        assert_eq!(amount_in_words(dec!(-2), "AED", 2), "Minus Two AED Only");
    }
}
