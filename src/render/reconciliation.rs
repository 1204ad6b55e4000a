use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, BANK_RECONCILIATION};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section};
use crate::model::BankReconciliation;

pub struct ReconciliationRenderer;

fn count(rows: Option<&Vec<crate::model::Row>>) -> usize {
    rows.map_or(0, Vec::len)
}

fn difference(rec: &BankReconciliation) -> Decimal {
    rec.difference.unwrap_or_else(|| {
        rec.statement_balance.unwrap_or_default() - rec.book_balance.unwrap_or_default()
    })
}

impl ReportRenderer for ReconciliationRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &BANK_RECONCILIATION
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let rec: BankReconciliation = ctx.decode();
        let unmatched = count(rec.unmatched_bank.as_ref()) + count(rec.unmatched_book.as_ref());
        let mut figures = Figures::default();
        if let Some(balance) = rec.statement_balance {
            figures.set("statementBalance", balance);
        }
        if let Some(balance) = rec.book_balance {
            figures.set("bookBalance", balance);
        }
        figures
            .set("difference", difference(&rec))
            .set("matchedCount", Decimal::from(count(rec.matched.as_ref())))
            .set("unmatchedCount", Decimal::from(unmatched));
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let rec: BankReconciliation = ctx.decode();
        if let Some(date) = &rec.statement_date {
            ctx.as_of = Some(date.clone());
        }
        let fmt = &ctx.fmt;

        let account = rec.bank_account.clone().unwrap_or_default();
        let mut details = vec![
            KeyValue::new("Account", Cell::opt_text(account.name.as_deref())),
            KeyValue::new("Account Number", Cell::opt_text(account.account_number.as_deref())),
            KeyValue::new("Bank", Cell::opt_text(account.bank_name.as_deref())),
            KeyValue::new("Statement Date", Cell::date_str(rec.statement_date.as_deref(), fmt)),
        ];
        details.retain(|kv| !kv.value.is_empty());
        let diff = difference(&rec);
        details.push(KeyValue::new(
            "Status",
            Cell::text(if fmt.round(diff).is_zero() {
                "Reconciled"
            } else {
                "Unreconciled"
            }),
        ));

        vec![
            Section::key_values("Bank Account", details),
            ctx.rows_section("Matched Transactions", rec.matched.as_deref())
                .on_sheet("Matched"),
            ctx.rows_section("Unmatched Bank Transactions", rec.unmatched_bank.as_deref())
                .on_sheet("Unmatched Bank"),
            ctx.rows_section("Unmatched Book Entries", rec.unmatched_book.as_deref())
                .on_sheet("Unmatched Book"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SectionBody, SheetPlacement};
    use crate::format::Formatter;
    use crate::model::ReportData;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn report() -> ReportData {
        ReportData::from_value(json!({
            "type": "bank_reconciliation",
            "data": {
                "bankAccount": {"name": "Operating", "accountNumber": "AE07 0331", "bankName": "ENBD"},
                "statementDate": "2024-01-31",
                "statementBalance": 1500,
                "bookBalance": 1450,
                "matched": [{"date": "2024-01-03", "description": "Rent", "amount": 100}],
                "unmatchedBank": [{"date": "2024-01-30", "description": "Fee", "amount": 50}],
                "unmatchedBook": []
            }
        }))
        .unwrap()
    }

    #[test]
    fn difference_and_counts() {
        let r = report();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let cards = ReconciliationRenderer.render_summary(&mut ctx);
        assert_eq!(cards[2].value.decimal(), Some(dec!(50)));
        assert_eq!(cards[3].value.display, "1");
        assert_eq!(cards[4].value.display, "1");
    }

    #[test]
    fn sections_land_on_their_own_sheets() {
        let r = report();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = ReconciliationRenderer.render_sections(&mut ctx);
        assert_eq!(sections[0].placement, SheetPlacement::Summary);
        assert_eq!(sections[2].placement, SheetPlacement::Own("Unmatched Bank".into()));
        assert!(sections[3].is_notice());

        let SectionBody::KeyValues(items) = &sections[0].body else {
            panic!("expected key values");
        };
        assert_eq!(items[3].value.display, "31/01/2024");
        assert_eq!(items.last().unwrap().value.display, "Unreconciled");
    }
}
