//! Single tax invoice. Print uses the fixed [`InvoiceLayout`]; the
//! spreadsheet and CSV get the same content as ordinary sections.

use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, TAX_INVOICE};
use super::{RenderContext, ReportRenderer};
use crate::document::{Cell, InvoiceLayout, KeyValue, PartyBlock, Rgb, Section, Table};
use crate::format::Formatter;
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{InvoiceParty, ReportMetadata, TaxInvoice};

pub struct TaxInvoiceRenderer;

const ITEM_COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("description", "Description", 2.4),
    FixedColumn::new("quantity", "Qty", 0.6),
    FixedColumn::new("unitPrice", "Unit Price", 1.0),
    FixedColumn::new("discount", "Discount", 0.9),
    FixedColumn::new("vatRate", "VAT %", 0.6),
    FixedColumn::new("vatAmount", "VAT", 0.9),
    FixedColumn::new("total", "Total", 1.1),
];

fn party_lines(party: &InvoiceParty) -> Vec<String> {
    let mut lines: Vec<String> = [&party.address, &party.email, &party.phone]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect();
    if let Some(trn) = party.trn.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("TRN: {}", trn.trim()));
    }
    lines
}

fn party_block(heading: &str, party: &InvoiceParty) -> PartyBlock {
    PartyBlock {
        heading: heading.to_string(),
        name: party.name.clone().filter(|s| !s.trim().is_empty()),
        lines: party_lines(party),
    }
}

/// The seller: the payload's company block, else the report's organization.
fn seller(invoice: &TaxInvoice, meta: &ReportMetadata) -> InvoiceParty {
    match &invoice.company {
        Some(company) if !company.is_empty() => company.clone(),
        _ => InvoiceParty {
            name: meta.organization_name.clone(),
            address: meta.organization_address.clone(),
            email: meta.organization_email.clone(),
            phone: meta.organization_phone.clone(),
            trn: meta.organization_tax_number.clone(),
        },
    }
}

fn details(invoice: &TaxInvoice, fmt: &Formatter) -> Vec<KeyValue> {
    let mut details = vec![
        KeyValue::new("Invoice Number", Cell::opt_text(invoice.invoice_number.as_deref())),
        KeyValue::new("Invoice Date", Cell::date_str(invoice.invoice_date.as_deref(), fmt)),
        KeyValue::new("Due Date", Cell::date_str(invoice.due_date.as_deref(), fmt)),
        KeyValue::new("Status", Cell::opt_text(invoice.status.as_deref())),
        KeyValue::new("Reference", Cell::opt_text(invoice.reference.as_deref())),
    ];
    details.retain(|kv| !kv.value.is_empty());
    details
}

fn items_table(invoice: &TaxInvoice, fmt: &Formatter) -> Table {
    let mut table = Table::from_plan(&plan_fixed(ITEM_COLUMNS, 1.0));
    for line in invoice.lines() {
        table.push(vec![
            Cell::opt_text(Some(&line.description)),
            Cell::number(line.quantity(), fmt),
            Cell::currency(line.unit_price, fmt),
            Cell::currency(line.discount, fmt),
            line.vat_rate.map_or_else(Cell::empty, |r| Cell::percent(r, fmt)),
            Cell::currency(line.vat(), fmt),
            Cell::currency(line.line_total(), fmt),
        ]);
    }
    table
}

fn totals(invoice: &TaxInvoice, fmt: &Formatter) -> Vec<KeyValue> {
    let mut totals = vec![KeyValue::new("Subtotal", Cell::currency(invoice.subtotal(), fmt))];
    let discount = invoice.discount_total();
    if !discount.is_zero() {
        totals.push(KeyValue::new("Discount", Cell::currency(-discount, fmt)));
    }
    totals.push(KeyValue::new("VAT", Cell::currency(invoice.vat_total(), fmt)));
    totals.push(KeyValue::new("Total", Cell::currency(invoice.total(), fmt)).emphasized());
    if let Some(paid) = invoice.amount_paid.filter(|p| !p.is_zero()) {
        totals.push(KeyValue::new("Amount Paid", Cell::currency(paid, fmt)));
        totals.push(KeyValue::new("Balance Due", Cell::currency(invoice.balance_due(), fmt)));
    }
    totals
}

fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ReportRenderer for TaxInvoiceRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &TAX_INVOICE
    }

    /// The invoice's own currency applies when the metadata names none.
    fn prepare(&self, ctx: &mut RenderContext<'_>) {
        let has_meta_currency = ctx
            .report
            .metadata
            .currency
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if has_meta_currency {
            return;
        }
        let invoice: TaxInvoice = ctx.decode();
        if let Some(code) = invoice.currency.as_deref() {
            ctx.fmt = ctx.fmt.clone().with_currency(code);
        }
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let invoice: TaxInvoice = ctx.decode();
        let fmt = &ctx.fmt;

        let mut sections = vec![Section::key_values("Invoice Details", details(&invoice, fmt))];
        if let Some(customer) = invoice.customer.as_ref().filter(|c| !c.is_empty()) {
            let block = party_block("Bill To", customer);
            let mut items: Vec<KeyValue> = Vec::new();
            if let Some(name) = block.name {
                items.push(KeyValue::new("Name", Cell::text(name)));
            }
            items.extend(block.lines.into_iter().map(|l| KeyValue::new("", Cell::text(l))));
            sections.push(Section::key_values("Bill To", items));
        }
        sections.push(Section::table("Items", items_table(&invoice, fmt)));

        let mut total_items = totals(&invoice, fmt);
        total_items.push(KeyValue::new("Amount in Words", Cell::text(fmt.in_words(invoice.total()))));
        sections.push(Section::key_values("Totals", total_items));

        for (title, body) in [
            ("Notes", &invoice.notes),
            ("Payment Terms", &invoice.payment_terms),
            ("Terms and Conditions", &invoice.terms_and_conditions),
        ] {
            if let Some(body) = text(body) {
                sections.push(Section::paragraph(title, body));
            }
        }
        sections
    }

    fn invoice_layout(&self, ctx: &mut RenderContext<'_>) -> Option<InvoiceLayout> {
        let invoice: TaxInvoice = ctx.decode();
        let fmt = &ctx.fmt;
        let accent = invoice
            .theme
            .as_ref()
            .and_then(|t| t.accent_color.as_deref())
            .and_then(Rgb::from_hex)
            .unwrap_or(TAX_INVOICE.accent);
        let total = invoice.total();
        Some(InvoiceLayout {
            heading: "TAX INVOICE".to_string(),
            accent,
            details: details(&invoice, fmt),
            company: party_block("From", &seller(&invoice, &ctx.report.metadata)),
            customer: party_block("Bill To", &invoice.customer.clone().unwrap_or_default()),
            items: items_table(&invoice, fmt),
            totals: totals(&invoice, fmt),
            amount_in_words: (total > Decimal::ZERO).then(|| fmt.in_words(total)),
            notes: text(&invoice.notes),
            payment_terms: text(&invoice.payment_terms),
            terms_and_conditions: text(&invoice.terms_and_conditions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionBody;
    use crate::model::ReportData;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn report(metadata: serde_json::Value) -> ReportData {
        ReportData::from_value(json!({
            "type": "tax_invoice",
            "data": {
                "invoiceNumber": "INV-1001",
                "invoiceDate": "2024-05-01",
                "currency": "usd",
                "customer": {"name": "Globex LLC", "address": "Abu Dhabi", "trn": "100200300400500"},
                "items": [
                    {"description": "Consulting", "quantity": 2, "unitPrice": 500, "vatRate": 5},
                    {"description": "Travel", "unitPrice": 250.5}
                ],
                "notes": "Thank you",
                "theme": {"accentColor": "#0F766E"}
            },
            "metadata": metadata
        }))
        .unwrap()
    }

    #[test]
    fn invoice_currency_applies_without_metadata_currency() {
        let r = report(json!({}));
        let mut ctx = RenderContext::new(&r, Formatter::default());
        TaxInvoiceRenderer.prepare(&mut ctx);
        assert_eq!(ctx.fmt.currency_code(), "USD");

        let r = report(json!({"currency": "EUR"}));
        let mut ctx = RenderContext::new(&r, Formatter::for_report(&r.metadata, &Default::default()));
        TaxInvoiceRenderer.prepare(&mut ctx);
        assert_eq!(ctx.fmt.currency_code(), "EUR");
    }

    #[test]
    fn layout_totals_and_accent() {
        let r = report(json!({"organizationName": "Acme Trading"}));
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let layout = TaxInvoiceRenderer.invoice_layout(&mut ctx).unwrap();
        assert_eq!(layout.accent, Rgb::new(0x0F, 0x76, 0x6E));
        assert_eq!(layout.company.name.as_deref(), Some("Acme Trading"));
        assert_eq!(layout.customer.lines, ["Abu Dhabi", "TRN: 100200300400500"]);
        assert_eq!(layout.items.rows.len(), 2);

        let total = layout.totals.iter().find(|kv| kv.emphasis).unwrap();
        assert_eq!(total.label, "Total");
        assert_eq!(total.value.decimal(), Some(dec!(1300.5)));
        assert!(layout.amount_in_words.unwrap().starts_with("One Thousand Three Hundred"));
    }

    #[test]
    fn sections_mirror_the_layout() {
        let r = report(json!({}));
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = TaxInvoiceRenderer.render_sections(&mut ctx);
        let titles: Vec<_> = sections.iter().filter_map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, ["Invoice Details", "Bill To", "Items", "Totals", "Notes"]);
        let SectionBody::KeyValues(details) = &sections[0].body else {
            panic!("expected key values");
        };
        assert_eq!(details[1].value.display, "01/05/2024");
    }
}
