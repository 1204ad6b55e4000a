//! Receivables and payables aging: the open documents plus a per-party
//! breakdown into overdue buckets.

use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, PAYABLES, RECEIVABLES};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, Section, Table};
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{lenient, AgingReport, Row};

const OUTSTANDING_KEYS: &[&str] = &["outstanding", "balance", "balanceDue", "amountDue", "outstandingAmount"];
const AMOUNT_KEYS: &[&str] = &["amount", "total", "totalAmount", "invoiceAmount", "billAmount"];
const PAID_KEYS: &[&str] = &["paid", "amountPaid", "paidAmount"];
const DAYS_KEYS: &[&str] = &["daysOverdue", "daysPastDue", "overdueDays", "age", "days"];

const BUCKET_KEYS: [&str; 5] = ["current", "days1To30", "days31To60", "days61To90", "over90"];

pub struct AgingRenderer {
    descriptor: &'static ReportTypeDescriptor,
    party_label: &'static str,
    party_keys: &'static [&'static str],
}

impl AgingRenderer {
    pub fn receivables() -> Self {
        Self {
            descriptor: &RECEIVABLES,
            party_label: "Customer",
            party_keys: &["customer", "customerName", "client", "party", "name"],
        }
    }

    pub fn payables() -> Self {
        Self {
            descriptor: &PAYABLES,
            party_label: "Vendor",
            party_keys: &["vendor", "vendorName", "supplier", "party", "name"],
        }
    }
}

/// Outstanding amount of one open document.
fn outstanding(row: &Row) -> Decimal {
    lenient::field_decimal(row, OUTSTANDING_KEYS).unwrap_or_else(|| {
        lenient::field_decimal(row, AMOUNT_KEYS).unwrap_or_default()
            - lenient::field_decimal(row, PAID_KEYS).unwrap_or_default()
    })
}

/// Bucket index into [`BUCKET_KEYS`]; not yet overdue is current.
fn bucket(row: &Row) -> usize {
    let days = lenient::field_decimal(row, DAYS_KEYS).unwrap_or_default();
    match days {
        d if d <= Decimal::ZERO => 0,
        d if d <= Decimal::from(30) => 1,
        d if d <= Decimal::from(60) => 2,
        d if d <= Decimal::from(90) => 3,
        _ => 4,
    }
}

#[derive(Default)]
struct PartyAging {
    name: String,
    buckets: [Decimal; 5],
}

impl PartyAging {
    fn total(&self) -> Decimal {
        self.buckets.iter().sum()
    }
}

fn by_party(rows: &[Row], keys: &[&str]) -> Vec<PartyAging> {
    let mut parties: Vec<PartyAging> = Vec::new();
    for row in rows {
        let name = lenient::field_text(row, keys).unwrap_or_else(|| "Unknown".to_string());
        let index = match parties.iter().position(|p| p.name == name) {
            Some(i) => i,
            None => {
                parties.push(PartyAging {
                    name,
                    ..Default::default()
                });
                parties.len() - 1
            }
        };
        parties[index].buckets[bucket(row)] += outstanding(row);
    }
    parties
}

impl AgingRenderer {
    fn party_table(&self, ctx: &RenderContext<'_>, rows: &[Row]) -> Table {
        let fmt = &ctx.fmt;
        let columns = [
            FixedColumn::new("party", self.party_label, 1.8),
            FixedColumn::new("currentDue", "Current", 1.0),
            FixedColumn::new("due1To30", "1-30", 1.0),
            FixedColumn::new("due31To60", "31-60", 1.0),
            FixedColumn::new("due61To90", "61-90", 1.0),
            FixedColumn::new("dueOver90", "Over 90", 1.0),
            FixedColumn::new("totalDue", "Total", 1.1),
        ];
        let mut table = Table::from_plan(&plan_fixed(&columns, 1.0));
        for party in by_party(rows, self.party_keys) {
            let mut cells = vec![Cell::text(party.name.clone())];
            cells.extend(party.buckets.iter().map(|b| Cell::currency(*b, fmt)));
            cells.push(Cell::currency(party.total(), fmt));
            table.push(cells);
        }
        table.with_totals("Total", fmt)
    }
}

impl ReportRenderer for AgingRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        self.descriptor
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let aging: AgingReport = ctx.decode();
        let rows = aging.items.as_deref().unwrap_or_default();
        let mut computed = [Decimal::ZERO; 5];
        for row in rows {
            computed[bucket(row)] += outstanding(row);
        }
        let s = aging.summary.unwrap_or_default();
        let provided = [s.current, s.days_1_to_30, s.days_31_to_60, s.days_61_to_90, s.over_90];

        let mut figures = Figures::default();
        let mut total = Decimal::ZERO;
        for ((key, given), computed) in BUCKET_KEYS.iter().zip(provided).zip(computed) {
            let value = given.unwrap_or(computed);
            total += value;
            figures.set(key, value);
        }
        figures.set("totalOutstanding", s.total_outstanding.unwrap_or(total));
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let aging: AgingReport = ctx.decode();
        if let Some(as_of) = &aging.as_of {
            ctx.as_of = Some(as_of.clone());
        }
        let rows = aging.items.as_deref().unwrap_or_default();
        let details = ctx.rows_section("Open Items", aging.items.as_deref());
        if rows.is_empty() {
            return vec![details];
        }
        let by_party = Section::table(
            format!("Aging by {}", self.party_label),
            self.party_table(ctx, rows),
        );
        vec![by_party, details.on_sheet("Open Items")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatter;
    use crate::model::ReportData;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn report() -> ReportData {
        ReportData::from_value(json!({
            "type": "receivables",
            "data": {
                "asOf": "2024-03-31",
                "items": [
                    {"invoiceNumber": "INV-1", "customer": "Acme", "amount": 500, "paid": 100, "daysOverdue": 0},
                    {"invoiceNumber": "INV-2", "customer": "Acme", "outstanding": 250, "daysOverdue": 45},
                    {"invoiceNumber": "INV-3", "customer": "Globex", "outstanding": 80, "daysOverdue": 120}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn buckets_from_days_overdue() {
        let r = report();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let cards = AgingRenderer::receivables().render_summary(&mut ctx);
        assert_eq!(cards[0].label, "Total Outstanding");
        assert_eq!(cards[0].value.decimal(), Some(dec!(730)));
        assert_eq!(cards[1].value.decimal(), Some(dec!(400)));
        assert_eq!(cards[3].value.decimal(), Some(dec!(250)));
        assert_eq!(cards[5].value.decimal(), Some(dec!(80)));
    }

    #[test]
    fn party_breakdown_groups_in_first_seen_order() {
        let r = report();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = AgingRenderer::receivables().render_sections(&mut ctx);
        assert_eq!(sections[0].title.as_deref(), Some("Aging by Customer"));
        let table = sections[0].as_table().unwrap();
        assert_eq!(table.columns[0].label, "Customer");
        assert_eq!(table.rows[0][0].display, "Acme");
        assert_eq!(table.rows[0][6].decimal(), Some(dec!(650)));
        assert_eq!(table.sum_key("totalDue"), dec!(730));
        assert_eq!(ctx.as_of.as_deref(), Some("2024-03-31"));
    }

    #[test]
    fn payables_label_vendors() {
        let r = ReportData::from_value(json!({
            "type": "payables",
            "data": {"bills": [{"vendor": "Supplier Co", "outstanding": 10}]}
        }))
        .unwrap();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = AgingRenderer::payables().render_sections(&mut ctx);
        assert_eq!(sections[0].title.as_deref(), Some("Aging by Vendor"));
    }

    #[test]
    fn no_items_is_a_notice() {
        let r = ReportData::from_value(json!({"type": "receivables", "data": {"items": []}})).unwrap();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = AgingRenderer::receivables().render_sections(&mut ctx);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_notice());
    }
}
