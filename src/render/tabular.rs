//! List reports: one row per record.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::descriptor::{self, ReportTypeDescriptor};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{pivot_table, row_figures, PivotKind, Section, AMOUNT_KEYS, TOTAL_KEYS, VAT_KEYS};
use crate::model::{lenient, Row};

pub static DESCRIPTORS: &[&ReportTypeDescriptor] = &[
    &descriptor::EXPENSES,
    &descriptor::INCOME,
    &descriptor::SALES,
    &descriptor::PURCHASES,
    &descriptor::TRANSACTIONS,
    &descriptor::CUSTOMERS,
    &descriptor::VENDORS,
    &descriptor::PRODUCTS,
    &descriptor::INVOICES,
];

const CATEGORY_KEYS: &[&str] = &["category", "categoryName", "expenseCategory"];
const VENDOR_KEYS: &[&str] = &["vendor", "vendorName", "merchant", "payee", "supplier"];
const CUSTOMER_KEYS: &[&str] = &["customer", "customerName", "client", "party"];

pub struct TabularRenderer {
    descriptor: &'static ReportTypeDescriptor,
}

impl TabularRenderer {
    pub fn new(descriptor: &'static ReportTypeDescriptor) -> Self {
        Self { descriptor }
    }
}

/// Count, net/VAT/gross sums, the average gross and the largest category
/// and vendor by gross. Money figures are only set when some row carries
/// the field.
pub fn list_figures(rows: &[Row]) -> Figures {
    let mut figures = Figures::default();
    figures.set("count", Decimal::from(rows.len()));
    if rows.is_empty() {
        return figures;
    }

    let has = |keys: &[&str]| rows.iter().any(|r| lenient::field(r, keys).is_some());
    let (mut amount, mut vat, mut total) = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for row in rows {
        let (a, v, t) = row_figures(row);
        amount += a;
        vat += v;
        total += t;
    }
    if has(AMOUNT_KEYS) {
        figures.set("totalAmount", amount);
    }
    if has(VAT_KEYS) {
        figures.set("totalVat", vat);
    }
    if has(AMOUNT_KEYS) || has(TOTAL_KEYS) {
        figures.set("grandTotal", total);
        figures.set("averageAmount", total / Decimal::from(rows.len()));
    }
    if let Some(top) = top_by_total(rows, CATEGORY_KEYS) {
        figures.set_text("topCategory", top);
    }
    if let Some(top) = top_by_total(rows, VENDOR_KEYS) {
        figures.set_text("topVendor", top);
    }
    figures
}

/// The group with the largest gross; ties go to the first seen.
fn top_by_total(rows: &[Row], keys: &[&str]) -> Option<String> {
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, Decimal> = HashMap::new();
    for row in rows {
        let Some(name) = lenient::field_text(row, keys) else {
            continue;
        };
        let (_, _, total) = row_figures(row);
        let entry = sums.entry(name.clone()).or_insert_with(|| {
            order.push(name);
            Decimal::ZERO
        });
        *entry += total;
    }
    let mut best: Option<(&String, Decimal)> = None;
    for name in &order {
        let sum = sums.get(name).copied().unwrap_or_default();
        if best.map_or(true, |(_, b)| sum > b) {
            best = Some((name, sum));
        }
    }
    best.map(|(name, _)| name.clone())
}

fn pivot_applies(kind: PivotKind, rows: &[Row]) -> bool {
    let keys: &[&str] = match kind {
        PivotKind::Category => CATEGORY_KEYS,
        PivotKind::Vendor => VENDOR_KEYS,
        PivotKind::Customer => CUSTOMER_KEYS,
        PivotKind::Month => crate::document::DATE_KEYS,
    };
    match kind {
        PivotKind::Month => rows.iter().any(|r| lenient::field_date(r, keys).is_some()),
        _ => rows.iter().any(|r| lenient::field_text(r, keys).is_some()),
    }
}

impl ReportRenderer for TabularRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        self.descriptor
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        list_figures(ctx.rows())
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let rows = ctx.rows();
        let mut sections = vec![ctx.rows_section("Details", Some(rows))];
        if rows.is_empty() {
            return sections;
        }
        for &kind in self.descriptor.pivots {
            if pivot_applies(kind, rows) {
                let table = pivot_table(kind, rows, &ctx.fmt);
                sections.push(
                    Section::table(kind.sheet_name(), table)
                        .on_sheet(kind.sheet_name())
                        .sheet_only(),
                );
            }
        }
        sections
    }
}
