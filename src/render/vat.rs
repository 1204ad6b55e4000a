use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, VAT};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section, VAT_KEYS};
use crate::model::{lenient, Row, VatReport};

pub struct VatRenderer;

struct VatFigures {
    output_vat: Decimal,
    input_vat: Decimal,
    net_vat: Decimal,
    total_sales: Decimal,
    total_purchases: Decimal,
}

fn sum_vat(rows: Option<&Vec<Row>>) -> Decimal {
    rows.into_iter()
        .flatten()
        .filter_map(|r| lenient::field_decimal(r, VAT_KEYS))
        .sum()
}

fn sum_net(rows: Option<&Vec<Row>>) -> Decimal {
    rows.into_iter()
        .flatten()
        .filter_map(|r| lenient::field_decimal(r, crate::document::AMOUNT_KEYS))
        .sum()
}

/// Given figures win; missing ones are derived from the itemized lists.
fn vat_figures(vat: &VatReport) -> VatFigures {
    let output_vat = vat.output_vat.unwrap_or_else(|| sum_vat(vat.sales.as_ref()));
    let input_vat = vat.input_vat.unwrap_or_else(|| sum_vat(vat.purchases.as_ref()));
    VatFigures {
        output_vat,
        input_vat,
        net_vat: vat.net_vat.unwrap_or(output_vat - input_vat),
        total_sales: vat.total_sales.unwrap_or_else(|| sum_net(vat.sales.as_ref())),
        total_purchases: vat
            .total_purchases
            .unwrap_or_else(|| sum_net(vat.purchases.as_ref())),
    }
}

impl ReportRenderer for VatRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &VAT
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let f = vat_figures(&ctx.decode::<VatReport>());
        let mut figures = Figures::default();
        figures
            .set("outputVat", f.output_vat)
            .set("inputVat", f.input_vat)
            .set("netVat", f.net_vat);
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let vat: VatReport = ctx.decode();
        let f = vat_figures(&vat);
        let fmt = &ctx.fmt;

        let net_label = if f.net_vat < Decimal::ZERO {
            "Net VAT Refundable"
        } else {
            "Net VAT Payable"
        };
        let mut sections = vec![Section::key_values(
            "VAT Return Summary",
            vec![
                KeyValue::new("Total Sales", Cell::currency(f.total_sales, fmt)),
                KeyValue::new("Output VAT", Cell::currency(f.output_vat, fmt)),
                KeyValue::new("Total Purchases", Cell::currency(f.total_purchases, fmt)),
                KeyValue::new("Input VAT", Cell::currency(f.input_vat, fmt)),
                KeyValue::new(net_label, Cell::currency(f.net_vat.abs(), fmt)).emphasized(),
            ],
        )];

        sections.push(
            ctx.rows_section("Sales (Output VAT)", vat.sales.as_deref())
                .on_sheet("Sales"),
        );
        sections.push(
            ctx.rows_section("Purchases (Input VAT)", vat.purchases.as_deref())
                .on_sheet("Purchases"),
        );
        // Adjustments are optional: only shown when the provider sends the list.
        if vat.adjustments.is_some() {
            sections.push(
                ctx.rows_section("Adjustments", vat.adjustments.as_deref())
                    .on_sheet("Adjustments"),
            );
        }
        sections
    }
}
