//! Breakdowns of tabular rows by category, vendor, customer or month.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use super::cell::Cell;
use super::table::Table;
use crate::format::Formatter;
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{lenient, Row};

pub const AMOUNT_KEYS: &[&str] = &["amount", "netAmount", "subtotal", "amountExclVat"];
pub const VAT_KEYS: &[&str] = &["vat", "vatAmount", "tax", "taxAmount"];
pub const TOTAL_KEYS: &[&str] = &["total", "totalAmount", "grossAmount", "amountInclVat"];
pub const DATE_KEYS: &[&str] = &[
    "date",
    "expenseDate",
    "transactionDate",
    "invoiceDate",
    "billDate",
    "createdAt",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PivotKind {
    Category,
    Vendor,
    Customer,
    Month,
}

impl PivotKind {
    pub fn sheet_name(self) -> &'static str {
        match self {
            Self::Category => "Category Summary",
            Self::Vendor => "Vendor Summary",
            Self::Customer => "Customer Summary",
            Self::Month => "Monthly Breakdown",
        }
    }

    fn key_column(self) -> FixedColumn {
        match self {
            Self::Category => FixedColumn::new("category", "Category", 1.8),
            Self::Vendor => FixedColumn::new("vendor", "Vendor", 1.8),
            Self::Customer => FixedColumn::new("customer", "Customer", 1.8),
            Self::Month => FixedColumn::new("month", "Month", 1.8),
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Category => &["category", "categoryName", "expenseCategory"],
            Self::Vendor => &["vendor", "vendorName", "merchant", "payee", "supplier"],
            Self::Customer => &["customer", "customerName", "client", "party"],
            Self::Month => DATE_KEYS,
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            Self::Category => "Uncategorized",
            Self::Vendor => "Unknown vendor",
            Self::Customer => "Unknown customer",
            Self::Month => "Undated",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    count: u64,
    amount: Decimal,
    vat: Decimal,
    total: Decimal,
}

/// Net, VAT and gross figures of one row. A missing gross is net plus VAT.
pub fn row_figures(row: &Row) -> (Decimal, Decimal, Decimal) {
    let amount = lenient::field_decimal(row, AMOUNT_KEYS).unwrap_or_default();
    let vat = lenient::field_decimal(row, VAT_KEYS).unwrap_or_default();
    let total = lenient::field_decimal(row, TOTAL_KEYS).unwrap_or(amount + vat);
    (amount, vat, total)
}

/// Aggregate rows in one pass. Groups keep first-seen order, except months,
/// which are sorted chronologically with undated rows last.
pub fn pivot_table(kind: PivotKind, rows: &[Row], fmt: &Formatter) -> Table {
    // (sort key, label, bucket); sort key only used for months
    let mut groups: Vec<(Option<NaiveDate>, String, Bucket)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let (sort_key, label) = match kind {
            PivotKind::Month => match lenient::field_date(row, kind.aliases()) {
                Some(d) => {
                    let first = d.with_day(1).unwrap_or(d);
                    (Some(first), first.format("%b %Y").to_string())
                }
                None => (None, kind.fallback().to_string()),
            },
            _ => (
                None,
                lenient::field_text(row, kind.aliases())
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|| kind.fallback().to_string()),
            ),
        };
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            groups.push((sort_key, label, Bucket::default()));
            groups.len() - 1
        });
        let (amount, vat, total) = row_figures(row);
        let bucket = &mut groups[slot].2;
        bucket.count += 1;
        bucket.amount += amount;
        bucket.vat += vat;
        bucket.total += total;
    }

    if kind == PivotKind::Month {
        // None sorts first for Option; undated goes last instead.
        groups.sort_by_key(|(date, _, _)| (date.is_none(), *date));
    }

    let plan = plan_fixed(
        &[
            kind.key_column(),
            FixedColumn::new("count", "Count", 0.8),
            FixedColumn::new("amount", "Amount", 1.2),
            FixedColumn::new("vat", "VAT", 1.0),
            FixedColumn::new("total", "Total", 1.2),
        ],
        1.0,
    );
    let mut table = Table::from_plan(&plan);
    for (_, label, bucket) in groups {
        table.push(vec![
            Cell::text(label),
            Cell::number(Decimal::from(bucket.count), fmt),
            Cell::currency(bucket.amount, fmt),
            Cell::currency(bucket.vat, fmt),
            Cell::currency(bucket.total, fmt),
        ]);
    }
    table.with_totals("Total", fmt)
}
