//! Fixed-region layout of a tax invoice.

use super::controller::{PageHeader, PaginationController};
use super::fonts::{fit, text_width, wrap};
use super::geometry::Geometry;
use crate::document::{InvoiceLayout, PartyBlock, Rgb, NO_DATA};

const GAP: f32 = 12.0;

pub fn header(invoice: &InvoiceLayout, logo: Option<(f32, f32)>) -> PageHeader {
    PageHeader {
        title: invoice.heading.clone(),
        organization: invoice.company.name.clone(),
        lines: invoice.company.lines.clone(),
        accent: invoice.accent,
        logo,
    }
}

pub fn layout(c: &mut PaginationController, invoice: &InvoiceLayout) {
    let accent = invoice.accent;
    parties_and_details(c, invoice);
    c.gap(GAP);

    c.write_section_title("Items", accent);
    if invoice.items.is_empty() {
        c.write_notice(NO_DATA);
    } else {
        c.write_table(&invoice.items, accent);
    }
    c.gap(GAP);

    c.write_key_values(&invoice.totals, accent, true);
    if let Some(words) = &invoice.amount_in_words {
        c.gap(GAP / 2.0);
        c.write_paragraph(&format!("Amount in words: {words}"));
    }

    for (title, text) in [
        ("Notes", &invoice.notes),
        ("Payment Terms", &invoice.payment_terms),
        ("Terms and Conditions", &invoice.terms_and_conditions),
    ] {
        if let Some(text) = text.as_deref().filter(|t| !t.trim().is_empty()) {
            c.gap(GAP);
            c.write_section_title(title, accent);
            c.write_paragraph(text);
        }
    }
}

/// Bill-to block on the left, invoice details on the right, side by side.
fn parties_and_details(c: &mut PaginationController, invoice: &InvoiceLayout) {
    let g = *c.geometry();
    let column = (g.content_width() - GAP) / 2.0;
    let customer = party_lines(&invoice.customer, column, &g);
    let rows = customer.len().max(invoice.details.len());
    if rows == 0 {
        return;
    }
    let height = rows as f32 * g.line_height() + 4.0;
    let accent = invoice.accent;

    c.block(height, |page, top, g| {
        let baseline = |i: usize| top + (i as f32 + 0.75) * g.line_height();
        for (i, (text, bold)) in customer.iter().enumerate() {
            let color = if i == 0 { accent } else { Rgb::TEXT };
            page.text(g.margin_left, baseline(i), text.clone(), g.font_size, *bold, color);
        }

        let x = g.margin_left + column + GAP;
        for (i, item) in invoice.details.iter().enumerate() {
            let half = column / 2.0;
            page.text(x, baseline(i), fit(&item.label, half, g.font_size, false), g.font_size, false, Rgb::MUTED);
            let value = fit(&item.value.display, half, g.font_size, true);
            let vw = text_width(&value, g.font_size, true);
            page.text(g.right() - vw, baseline(i), value, g.font_size, true, Rgb::TEXT);
        }
    });
}

/// Heading, name and wrapped address lines with their weight.
fn party_lines(party: &PartyBlock, width: f32, g: &Geometry) -> Vec<(String, bool)> {
    if party.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![(party.heading.clone(), true)];
    if let Some(name) = &party.name {
        lines.push((fit(name, width, g.font_size, true), true));
    }
    for line in &party.lines {
        lines.extend(wrap(line, width, g.font_size, false).into_iter().map(|l| (l, false)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, KeyValue, Table};
    use crate::format::Formatter;
    use rust_decimal::Decimal;

    fn invoice() -> InvoiceLayout {
        let fmt = Formatter::default();
        InvoiceLayout {
            heading: "TAX INVOICE".into(),
            accent: Rgb::new(0x0F, 0x76, 0x6E),
            details: vec![KeyValue::new("Invoice No", Cell::text("INV-001"))],
            company: PartyBlock {
                heading: "From".into(),
                name: Some("Acme Trading LLC".into()),
                lines: vec!["Dubai".into()],
            },
            customer: PartyBlock {
                heading: "Bill To".into(),
                name: Some("Globex".into()),
                lines: vec!["Abu Dhabi".into(), "TRN: 200".into()],
            },
            items: Table::new(Vec::new()),
            totals: vec![KeyValue::new("Total", Cell::currency(Decimal::from(105), &fmt)).emphasized()],
            amount_in_words: Some("One Hundred Five Dirhams Only".into()),
            notes: Some("Thank you".into()),
            payment_terms: None,
            terms_and_conditions: Some("  ".into()),
        }
    }

    #[test]
    fn draws_every_region() {
        let inv = invoice();
        let mut c = PaginationController::new(Geometry::default(), header(&inv, None));
        layout(&mut c, &inv);
        let pages = c.finish();
        assert_eq!(pages.len(), 1);
        let page = &pages[0];
        for text in ["TAX INVOICE", "Acme Trading LLC", "Bill To", "Globex", "INV-001", "AED 105.00", "Thank you"] {
            assert!(page.contains_text(text), "missing {text}");
        }
        assert!(page.contains_text(NO_DATA));
        assert!(page.contains_text("One Hundred Five Dirhams Only"));
        assert!(!page.contains_text("Terms and Conditions"));
    }
}
