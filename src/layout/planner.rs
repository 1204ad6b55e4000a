//! Column selection and width allocation for tabular sections.

use serde::Serialize;
use tracing::debug;

use super::semantics::{semantics, Align, FieldKind, FieldSemantics};
use crate::format::prettify;
use crate::model::Row;

/// Upper bound on columns for curated reports.
pub const MAX_CURATED_COLUMNS: usize = 6;
/// Below this many matched slots the curated rule tops up with raw columns.
pub const MIN_CURATED_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedColumn {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub align: Align,
    pub summable: bool,
    pub width: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnPlan {
    pub columns: Vec<PlannedColumn>,
}

impl ColumnPlan {
    pub fn keys(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn widths(&self) -> Vec<f32> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn align(&self, key: &str) -> Option<Align> {
        self.columns.iter().find(|c| c.key == key).map(|c| c.align)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}

/// One semantic slot of a curated rule: the first alias present in the
/// sample row fills it.
#[derive(Debug)]
pub struct Slot {
    pub aliases: &'static [&'static str],
    pub weight: f32,
}

#[derive(Debug)]
pub struct CuratedRule {
    pub slots: &'static [Slot],
    pub deny: &'static [&'static str],
}

/// How a report type picks its columns.
#[derive(Debug, Clone, Copy)]
pub enum ColumnPolicy {
    /// Every field of the sample row, in source order, equal widths.
    AllFields,
    Curated(&'static CuratedRule),
}

pub static EXPENSE_RULE: CuratedRule = CuratedRule {
    slots: &[
        Slot {
            aliases: &["date", "expenseDate", "transactionDate", "billDate", "spentOn"],
            weight: 1.0,
        },
        Slot {
            aliases: &["category", "categoryName", "expenseCategory"],
            weight: 1.4,
        },
        Slot {
            aliases: &["type", "expenseType", "kind"],
            weight: 1.0,
        },
        Slot {
            aliases: &["vendor", "vendorName", "merchant", "payee", "supplier"],
            weight: 1.4,
        },
        Slot {
            aliases: &["amount", "netAmount", "subtotal", "amountExclVat"],
            weight: 0.9,
        },
        Slot {
            aliases: &["vat", "vatAmount", "tax", "taxAmount"],
            weight: 1.0,
        },
        Slot {
            aliases: &["total", "totalAmount", "grossAmount", "amountInclVat"],
            weight: 1.0,
        },
        Slot {
            aliases: &["currency", "currencyCode"],
            weight: 1.0,
        },
        Slot {
            aliases: &["status", "approvalStatus"],
            weight: 0.8,
        },
    ],
    deny: &["notes", "note"],
};

pub fn policy_for(report_type: &str) -> ColumnPolicy {
    match report_type.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
        "expenses" | "expense" | "expense_list" | "expense_report" => {
            ColumnPolicy::Curated(&EXPENSE_RULE)
        }
        _ => ColumnPolicy::AllFields,
    }
}

/// Decide the visible columns, their widths and alignment for a report type.
///
/// A pure function of the report type and the sample row's field names:
/// widths share `content_width` by fixed weights and never depend on data.
pub fn plan_columns(report_type: &str, sample_row: &Row, content_width: f32) -> ColumnPlan {
    let picked: Vec<(String, f32)> = match policy_for(report_type) {
        ColumnPolicy::AllFields => sample_row.keys().map(|k| (k.clone(), 1.0)).collect(),
        ColumnPolicy::Curated(rule) => curate(rule, sample_row),
    };
    let plan = build_plan(picked, content_width);
    debug!(report_type, columns = ?plan.keys(), "planned columns");
    plan
}

fn curate(rule: &CuratedRule, row: &Row) -> Vec<(String, f32)> {
    let denied = |key: &str| rule.deny.iter().any(|d| d.eq_ignore_ascii_case(key));
    let find = |alias: &str| {
        row.keys()
            .find(|k| k.eq_ignore_ascii_case(alias) && !denied(k.as_str()))
            .cloned()
    };

    let mut picked: Vec<(String, f32)> = Vec::new();
    for slot in rule.slots {
        if let Some(key) = slot.aliases.iter().find_map(|alias| find(*alias)) {
            if !picked.iter().any(|(k, _)| *k == key) {
                picked.push((key, slot.weight));
            }
        }
    }

    if picked.len() < MIN_CURATED_SLOTS {
        for key in row.keys() {
            if picked.len() >= MAX_CURATED_COLUMNS {
                break;
            }
            if denied(key.as_str()) || picked.iter().any(|(k, _)| k == key) {
                continue;
            }
            picked.push((key.clone(), 1.0));
        }
    }
    picked.truncate(MAX_CURATED_COLUMNS);
    picked
}

fn build_plan(picked: Vec<(String, f32)>, content_width: f32) -> ColumnPlan {
    let total_weight: f32 = picked.iter().map(|(_, w)| *w).sum();
    let columns = picked
        .into_iter()
        .map(|(key, weight)| {
            let FieldSemantics {
                kind,
                align,
                summable,
            } = semantics(&key);
            let width = if total_weight > 0.0 {
                content_width * weight / total_weight
            } else {
                0.0
            };
            PlannedColumn {
                label: prettify(&key),
                key,
                kind,
                align,
                summable,
                width,
            }
        })
        .collect();
    ColumnPlan { columns }
}

/// A column fixed by a structured renderer rather than sniffed from data.
#[derive(Debug, Clone, Copy)]
pub struct FixedColumn {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f32,
}

impl FixedColumn {
    pub const fn new(key: &'static str, label: &'static str, weight: f32) -> Self {
        Self { key, label, weight }
    }
}

/// Plan a fixed column set; semantics still come from the key.
pub fn plan_fixed(columns: &[FixedColumn], content_width: f32) -> ColumnPlan {
    let mut plan = build_plan(
        columns
            .iter()
            .map(|c| (c.key.to_string(), c.weight))
            .collect(),
        content_width,
    );
    for (planned, fixed) in plan.columns.iter_mut().zip(columns) {
        planned.label = fixed.label.to_string();
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(v: Value) -> Row {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    fn expense_row() -> Row {
        row(json!({
            "id": "exp_1",
            "notes": "team lunch",
            "vendor": "Cafe",
            "date": "2024-01-02",
            "category": "Meals",
            "amount": 100,
            "vat": 5,
            "total": 105,
            "status": "approved"
        }))
    }

    #[test]
    fn expense_plan_is_curated() {
        let plan = plan_columns("expenses", &expense_row(), 600.0);
        let keys = plan.keys();
        assert!(keys.len() <= MAX_CURATED_COLUMNS);
        assert!(!keys.contains(&"notes"));
        assert!(keys.contains(&"date"));
        assert!(keys.contains(&"amount"));
        assert_eq!(keys, ["date", "category", "vendor", "amount", "vat", "total"]);
    }

    #[test]
    fn expense_weights_are_fixed() {
        let plan = plan_columns("expenses", &expense_row(), 660.0);
        let widths = plan.widths();
        let total: f32 = widths.iter().sum();
        assert!((total - 660.0).abs() < 0.01);
        // category and vendor are wider than date; amount narrower.
        assert!(widths[1] > widths[0]);
        assert!(widths[2] > widths[0]);
        assert!(widths[3] < widths[0]);
    }

    #[test]
    fn sparse_expense_rows_are_topped_up() {
        let sparse = row(json!({
            "date": "2024-01-02",
            "amount": 10,
            "reference": "R-1",
            "notes": "x",
            "project": "P",
            "department": "Ops",
            "owner": "Sam",
            "code": "C"
        }));
        let plan = plan_columns("expenses", &sparse, 600.0);
        assert_eq!(
            plan.keys(),
            ["date", "amount", "reference", "project", "department", "owner"]
        );
    }

    #[test]
    fn other_types_show_every_field_in_order() {
        let r = row(json!({"customer": "A", "invoiceDate": "2024-01-01", "notes": "n", "amount": 5}));
        let plan = plan_columns("income", &r, 400.0);
        assert_eq!(plan.keys(), ["customer", "invoiceDate", "notes", "amount"]);
        assert!(plan.widths().iter().all(|w| (*w - 100.0).abs() < 0.01));
        assert_eq!(plan.align("amount"), Some(Align::Right));
        assert_eq!(plan.align("invoiceDate"), Some(Align::Center));
        assert_eq!(plan.align("customer"), Some(Align::Left));
    }

    #[test]
    fn planning_is_deterministic() {
        let a = plan_columns("expenses", &expense_row(), 500.0);
        let b = plan_columns("expenses", &expense_row(), 500.0);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_plans_keep_labels() {
        let plan = plan_fixed(
            &[
                FixedColumn::new("accountCode", "Code", 0.6),
                FixedColumn::new("balance", "Balance", 1.0),
            ],
            160.0,
        );
        assert_eq!(plan.columns[0].label, "Code");
        assert_eq!(plan.columns[1].kind, FieldKind::Currency);
        assert!((plan.columns[0].width - 60.0).abs() < 0.01);
    }
}
