use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::format::Formatter;
use crate::layout::FieldKind;
use crate::model::lenient;

/// The typed value behind a cell. Spreadsheets write this; print and CSV
/// write the preformatted display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Currency(Decimal),
    Number(Decimal),
    Percent(Decimal),
    Date(NaiveDate),
    Text(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: CellValue,
    pub display: String,
}

impl Cell {
    /// The stored value is rounded the way it is displayed, so every backend
    /// sums and writes the same figure.
    pub fn currency(value: Decimal, fmt: &Formatter) -> Self {
        Self {
            display: fmt.currency(value),
            value: CellValue::Currency(fmt.round(value)),
        }
    }

    pub fn number(value: Decimal, fmt: &Formatter) -> Self {
        Self {
            display: fmt.number(value),
            value: CellValue::Number(value),
        }
    }

    pub fn percent(value: Decimal, fmt: &Formatter) -> Self {
        Self {
            display: fmt.percent(value),
            value: CellValue::Percent(value),
        }
    }

    pub fn date(value: NaiveDate, fmt: &Formatter) -> Self {
        Self {
            display: fmt.date(value),
            value: CellValue::Date(value),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display: value.clone(),
            value: CellValue::Text(value),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
            display: String::new(),
        }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => Self::text(s.trim()),
            _ => Self::empty(),
        }
    }

    /// A date string formatted when it parses, shown verbatim otherwise.
    pub fn date_str(raw: Option<&str>, fmt: &Formatter) -> Self {
        match raw {
            Some(s) => match lenient::parse_date(s) {
                Some(d) => Self::date(d, fmt),
                None => Self::opt_text(Some(s)),
            },
            None => Self::empty(),
        }
    }

    /// Build a cell from a loosely typed JSON value of a known kind. Values
    /// that do not parse as their kind are kept as text.
    pub fn from_value(value: Option<&Value>, kind: FieldKind, fmt: &Formatter) -> Self {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Self::empty();
        };
        let typed = match kind {
            FieldKind::Currency => lenient::decimal(value).map(|d| Self::currency(d, fmt)),
            FieldKind::Number => lenient::decimal(value).map(|d| Self::number(d, fmt)),
            FieldKind::Percent => lenient::decimal(value).map(|d| Self::percent(d, fmt)),
            FieldKind::Date => lenient::date(value).map(|d| Self::date(d, fmt)),
            FieldKind::Text => None,
        };
        typed.unwrap_or_else(|| match lenient::text(value) {
            Some(s) if !s.trim().is_empty() => Self::text(s),
            _ => Self::empty(),
        })
    }

    pub fn decimal(&self) -> Option<Decimal> {
        match self.value {
            CellValue::Currency(d) | CellValue::Number(d) | CellValue::Percent(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.value, CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn cells_from_loose_values() {
        let fmt = Formatter::default();
        let c = Cell::from_value(Some(&json!("1,500.5")), FieldKind::Currency, &fmt);
        assert_eq!(c.value, CellValue::Currency(dec!(1500.5)));
        assert_eq!(c.display, "AED 1,500.50");

        let c = Cell::from_value(Some(&json!("pending")), FieldKind::Currency, &fmt);
        assert_eq!(c.value, CellValue::Text("pending".into()));

        let c = Cell::from_value(Some(&json!("2024-06-30")), FieldKind::Date, &fmt);
        assert_eq!(c.display, "30/06/2024");

        assert!(Cell::from_value(None, FieldKind::Text, &fmt).is_empty());
        assert!(Cell::from_value(Some(&json!(null)), FieldKind::Number, &fmt).is_empty());
    }

    #[test]
    fn decimal_only_for_numeric_cells() {
        let fmt = Formatter::default();
        assert_eq!(Cell::number(dec!(3), &fmt).decimal(), Some(dec!(3)));
        assert_eq!(Cell::text("3").decimal(), None);
    }
}
