use serde_json::Value;

use super::date::format_date_value;
use super::label::prettify;
use crate::model::{lenient, Row};

/// Render applied filters as one description line:
/// `Category: Travel, Meals | Status: Approved`.
///
/// Null and empty values are skipped; date-named keys are formatted with
/// `date_pattern`. Returns `None` when nothing remains.
pub fn describe_filters(filters: &Row, date_pattern: &str) -> Option<String> {
    let parts: Vec<String> = filters
        .iter()
        .filter_map(|(key, value)| {
            let rendered = render_value(key, value, date_pattern)?;
            Some(format!("{}: {rendered}", prettify(key)))
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

fn render_value(key: &str, value: &Value, date_pattern: &str) -> Option<String> {
    let is_date = key.to_lowercase().contains("date");
    let rendered = match value {
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| render_value(key, item, date_pattern))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => {
            // Range filters: {"from": .., "to": ..}
            let from = lenient::field(map, &["from", "start", "startDate", "min"])
                .and_then(|v| render_value(key, v, date_pattern));
            let to = lenient::field(map, &["to", "end", "endDate", "max"])
                .and_then(|v| render_value(key, v, date_pattern));
            match (from, to) {
                (Some(f), Some(t)) => Some(format!("{f} - {t}")),
                (Some(f), None) => Some(format!("from {f}")),
                (None, Some(t)) => Some(format!("until {t}")),
                (None, None) => lenient::text(value),
            }
        }
        _ if is_date => format_date_value(value, date_pattern),
        _ => lenient::text(value),
    }?;
    let trimmed = rendered.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn joins_scalar_and_array_filters() {
        let filters = row(json!({
            "category": ["Travel", "Meals"],
            "status": "approved",
            "vendor": null,
            "tags": []
        }));
        assert_eq!(
            describe_filters(&filters, "%d/%m/%Y").as_deref(),
            Some("Category: Travel, Meals | Status: approved")
        );
    }

    #[test]
    fn formats_date_ranges() {
        let filters = row(json!({
            "dateRange": {"from": "2024-01-01", "to": "2024-01-31"}
        }));
        assert_eq!(
            describe_filters(&filters, "%d/%m/%Y").as_deref(),
            Some("Date Range: 01/01/2024 - 31/01/2024")
        );
    }

    #[test]
    fn empty_filters_describe_nothing() {
        assert_eq!(describe_filters(&row(json!({"x": ""})), "%d/%m/%Y"), None);
    }
}
