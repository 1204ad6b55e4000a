//! The generic summary-card renderer.
//!
//! A card's value is looked up by the keys of its [`CardSpec`], first in the
//! precomputed `metadata.summary`, then at the top level of a structured
//! payload, then in the figures the type's renderer computed. Cards whose
//! value resolves nowhere are left out.

use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;

use super::descriptor::{CardSpec, ReportTypeDescriptor};
use super::RenderContext;
use crate::document::{Cell, SummaryCard};
use crate::layout::FieldKind;
use crate::model::lenient;

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Amount(Decimal),
    Text(String),
}

/// Figures computed by a renderer from its payload.
#[derive(Debug, Clone, Default)]
pub struct Figures {
    values: HashMap<String, Figure>,
}

impl Figures {
    pub fn set(&mut self, key: &str, value: Decimal) -> &mut Self {
        self.values.insert(key.to_string(), Figure::Amount(value));
        self
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.to_string(), Figure::Text(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Figure> {
        self.values.get(key)
    }

    pub fn amount(&self, key: &str) -> Option<Decimal> {
        match self.values.get(key) {
            Some(Figure::Amount(d)) => Some(*d),
            _ => None,
        }
    }
}

pub fn render_cards(
    descriptor: &ReportTypeDescriptor,
    figures: &Figures,
    ctx: &RenderContext<'_>,
) -> Vec<SummaryCard> {
    descriptor
        .cards
        .iter()
        .filter_map(|spec| {
            let value = resolve(spec, figures, ctx)?;
            Some(SummaryCard {
                label: spec.label.to_string(),
                value,
            })
        })
        .collect()
}

fn resolve(spec: &CardSpec, figures: &Figures, ctx: &RenderContext<'_>) -> Option<Cell> {
    let sources = [ctx.report.metadata.summary.as_ref(), ctx.report.object()];
    for source in sources.into_iter().flatten() {
        if let Some(cell) = lenient::field(source, spec.keys).and_then(|v| cell_from(spec, v, ctx)) {
            return Some(cell);
        }
    }
    spec.keys.iter().find_map(|key| {
        figures.get(key).and_then(|figure| match figure {
            Figure::Amount(d) => Some(numeric_cell(spec.kind, *d, ctx)),
            Figure::Text(s) if !s.trim().is_empty() => Some(Cell::text(s.trim())),
            Figure::Text(_) => None,
        })
    })
}

fn cell_from(spec: &CardSpec, value: &Value, ctx: &RenderContext<'_>) -> Option<Cell> {
    match spec.kind {
        FieldKind::Text | FieldKind::Date => {
            lenient::text(value).filter(|s| !s.trim().is_empty()).map(Cell::text)
        }
        kind => lenient::decimal(value).map(|d| numeric_cell(kind, d, ctx)),
    }
}

fn numeric_cell(kind: FieldKind, value: Decimal, ctx: &RenderContext<'_>) -> Cell {
    match kind {
        FieldKind::Currency => Cell::currency(value, &ctx.fmt),
        FieldKind::Percent => Cell::percent(value, &ctx.fmt),
        _ => Cell::number(value, &ctx.fmt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatter;
    use crate::model::ReportData;
    use crate::render::descriptor::{EXPENSES, VAT};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn metadata_summary_wins_over_figures() {
        let report = ReportData::from_value(json!({
            "type": "expenses",
            "data": [],
            "metadata": {"summary": {"totalAmount": 999, "topVendor": {"name": "Cafe"}}}
        }))
        .unwrap();
        let ctx = RenderContext::new(&report, Formatter::default());
        let mut figures = Figures::default();
        figures.set("totalAmount", dec!(1)).set("count", dec!(0));
        let cards = render_cards(&EXPENSES, &figures, &ctx);
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Total Amount", "Expenses", "Top Vendor"]);
        assert_eq!(cards[0].value.display, "AED 999.00");
        assert_eq!(cards[2].value.display, "Cafe");
    }

    #[test]
    fn structured_payload_top_level_is_a_source() {
        let report = ReportData::from_value(json!({
            "type": "vat",
            "data": {"outputVat": "150.5"}
        }))
        .unwrap();
        let ctx = RenderContext::new(&report, Formatter::default());
        let mut figures = Figures::default();
        figures
            .set("outputVat", dec!(1))
            .set("inputVat", dec!(50))
            .set("netVat", dec!(100.5));
        let cards = render_cards(&VAT, &figures, &ctx);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].value.display, "AED 150.50");
        assert_eq!(cards[1].value.display, "AED 50.00");
    }
}
