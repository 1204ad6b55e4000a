//! Field-name semantics.
//!
//! Tabular rows carry no type information; a field's name decides whether
//! it is money, a date or plain text. Every output format asks this module,
//! so alignment and formatting agree across print, spreadsheet and CSV.

use serde::Serialize;

use crate::format::split_words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Currency,
    /// Quantities and counts.
    Number,
    /// A rate already expressed in percent.
    Percent,
    Date,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSemantics {
    pub kind: FieldKind,
    pub align: Align,
    /// Whether a totals row should sum this column.
    pub summable: bool,
}

impl FieldSemantics {
    pub const fn new(kind: FieldKind, align: Align, summable: bool) -> Self {
        Self {
            kind,
            align,
            summable,
        }
    }

    pub const TEXT: Self = Self::new(FieldKind::Text, Align::Left, false);
    pub const IDENT: Self = Self::new(FieldKind::Text, Align::Center, false);
    pub const DATE: Self = Self::new(FieldKind::Date, Align::Center, false);
    pub const MONEY: Self = Self::new(FieldKind::Currency, Align::Right, true);
    pub const UNIT_MONEY: Self = Self::new(FieldKind::Currency, Align::Right, false);
    pub const QUANTITY: Self = Self::new(FieldKind::Number, Align::Right, true);
    pub const MEASURE: Self = Self::new(FieldKind::Number, Align::Right, false);
    pub const PERCENT: Self = Self::new(FieldKind::Percent, Align::Right, false);

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Currency | FieldKind::Number | FieldKind::Percent
        )
    }
}

/// Substrings that mark a field as money.
pub const CURRENCY_TERMS: &[&str] = &[
    "amount",
    "vat",
    "tax",
    "total",
    "debit",
    "credit",
    "balance",
    "paid",
    "outstanding",
    "due",
    "value",
    "net",
    "gross",
    "revenue",
    "expense",
    "profit",
    "price",
    "cost",
    "fee",
    "discount",
];

/// Money fields that describe one unit and must not be summed.
const UNIT_TERMS: &[&str] = &["unit", "price", "rate", "average", "avg"];

/// Whole words that make a field a plain quantity.
const QUANTITY_WORDS: &[&str] = &["qty", "quantity", "count", "units", "pieces"];
const MEASURE_WORDS: &[&str] = &["days", "age", "percentile"];

/// Identifier fields that contain a money term but are text.
const TEXT_OVERRIDES: &[&str] = &[
    "vatnumber",
    "vatno",
    "vatid",
    "taxid",
    "taxnumber",
    "taxno",
    "trn",
    "vatregistrationnumber",
    "taxregistrationnumber",
];

/// Semantics of a field, decided by its name alone.
///
/// Order matters: identifier overrides, then dates (`dueDate` is a date),
/// then percentages and quantities, then the money vocabulary, then `id`.
pub fn semantics(name: &str) -> FieldSemantics {
    let lower = name.to_lowercase();
    let compact: String = lower.chars().filter(|c| c.is_alphanumeric()).collect();
    let words = split_words(name);

    if TEXT_OVERRIDES.contains(&compact.as_str())
        || (compact.ends_with("number") && (compact.contains("vat") || compact.contains("tax")))
    {
        return FieldSemantics::TEXT;
    }
    if lower.contains("date") {
        return FieldSemantics::DATE;
    }
    if lower.contains("percent")
        || words.iter().any(|w| w == "pct")
        || (lower.ends_with("rate") && (lower.contains("vat") || lower.contains("tax")))
    {
        return FieldSemantics::PERCENT;
    }
    if words.iter().any(|w| QUANTITY_WORDS.contains(&w.as_str())) {
        return FieldSemantics::QUANTITY;
    }
    if words.iter().any(|w| MEASURE_WORDS.contains(&w.as_str())) {
        return FieldSemantics::MEASURE;
    }
    if CURRENCY_TERMS.iter().any(|t| lower.contains(t)) {
        if UNIT_TERMS.iter().any(|t| lower.contains(t)) {
            return FieldSemantics::UNIT_MONEY;
        }
        return FieldSemantics::MONEY;
    }
    if lower.contains("id") {
        return FieldSemantics::IDENT;
    }
    FieldSemantics::TEXT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_fields_are_right_aligned_currency() {
        for name in [
            "amount",
            "vatAmount",
            "total",
            "debit",
            "closingBalance",
            "outstanding",
            "grossValue",
            "netVat",
            "discount",
        ] {
            let s = semantics(name);
            assert_eq!(s.kind, FieldKind::Currency, "{name}");
            assert_eq!(s.align, Align::Right, "{name}");
            assert!(s.summable, "{name}");
        }
    }

    #[test]
    fn unit_prices_are_not_summed() {
        for name in ["unitPrice", "unitCost", "price", "averageAmount"] {
            let s = semantics(name);
            assert_eq!(s.kind, FieldKind::Currency, "{name}");
            assert!(!s.summable, "{name}");
        }
    }

    #[test]
    fn dates_win_over_money_terms() {
        assert_eq!(semantics("dueDate").kind, FieldKind::Date);
        assert_eq!(semantics("invoice_date").align, Align::Center);
    }

    #[test]
    fn identifiers_and_overrides() {
        assert_eq!(semantics("vatNumber"), FieldSemantics::TEXT);
        assert_eq!(semantics("taxId"), FieldSemantics::TEXT);
        assert_eq!(semantics("customer_vat_number"), FieldSemantics::TEXT);
        assert_eq!(semantics("vendorId"), FieldSemantics::IDENT);
        assert_eq!(semantics("description"), FieldSemantics::TEXT);
    }

    #[test]
    fn quantities_rates_and_measures() {
        assert_eq!(semantics("quantity"), FieldSemantics::QUANTITY);
        assert_eq!(semantics("openingQty"), FieldSemantics::QUANTITY);
        assert_eq!(semantics("transactionCount"), FieldSemantics::QUANTITY);
        assert_eq!(semantics("accountCode"), FieldSemantics::TEXT);
        assert_eq!(semantics("vatRate"), FieldSemantics::PERCENT);
        assert_eq!(semantics("discountPercent"), FieldSemantics::PERCENT);
        assert_eq!(semantics("daysOverdue"), FieldSemantics::MEASURE);
    }
}
