use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, STOCK_BALANCE};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::Section;
use crate::model::{lenient, Row, StockBalance, StockSummary};

pub struct StockBalanceRenderer;

/// Figure key and the row fields summed when the summary omits it.
const QUANTITY_FIELDS: &[(&str, &[&str])] = &[
    ("openingQty", &["openingQty", "openingQuantity", "opening"]),
    ("inwardsQty", &["inwardsQty", "inwardsQuantity", "inwards", "received"]),
    ("outwardsQty", &["outwardsQty", "outwardsQuantity", "outwards", "issued"]),
    ("adjustmentQty", &["adjustmentQty", "adjustmentQuantity", "adjustments"]),
    ("closingQty", &["closingQty", "closingQuantity", "closing", "quantity"]),
    ("closingValue", &["closingValue", "stockValue", "value", "totalValue"]),
];

fn given(summary: &StockSummary, key: &str) -> Option<Decimal> {
    match key {
        "openingQty" => summary.opening_qty,
        "inwardsQty" => summary.inwards_qty,
        "outwardsQty" => summary.outwards_qty,
        "adjustmentQty" => summary.adjustment_qty,
        "closingQty" => summary.closing_qty,
        "closingValue" => summary.closing_value,
        _ => None,
    }
}

fn column_sum(rows: &[Row], keys: &[&str]) -> Option<Decimal> {
    let values: Vec<Decimal> = rows
        .iter()
        .filter_map(|r| lenient::field_decimal(r, keys))
        .collect();
    (!values.is_empty()).then(|| values.into_iter().sum())
}

impl ReportRenderer for StockBalanceRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &STOCK_BALANCE
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let stock: StockBalance = ctx.decode();
        let rows = stock.items.as_deref().unwrap_or_default();
        let summary = stock.summary.clone().unwrap_or_default();
        let mut figures = Figures::default();
        for (key, fields) in QUANTITY_FIELDS {
            if let Some(value) = given(&summary, key).or_else(|| column_sum(rows, fields)) {
                figures.set(key, value);
            }
        }
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let stock: StockBalance = ctx.decode();
        vec![ctx.rows_section("Stock Items", stock.items.as_deref())]
    }
}
