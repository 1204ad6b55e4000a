use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, TRIAL_BALANCE};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section, Table};
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{NormalBalance, TrialBalance, TrialBalanceAccount};

pub struct TrialBalanceRenderer;

const COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("accountCode", "Code", 0.7),
    FixedColumn::new("accountName", "Account", 1.8),
    FixedColumn::new("accountType", "Type", 0.9),
    FixedColumn::new("openingDebit", "Opening Dr", 1.0),
    FixedColumn::new("openingCredit", "Opening Cr", 1.0),
    FixedColumn::new("periodDebit", "Period Dr", 1.0),
    FixedColumn::new("periodCredit", "Period Cr", 1.0),
    FixedColumn::new("closingDebit", "Closing Dr", 1.0),
    FixedColumn::new("closingCredit", "Closing Cr", 1.0),
    FixedColumn::new("balance", "Balance", 1.1),
];

/// Closing balance as displayed: credit-normal accounts are sign-inverted.
pub fn display_balance(account: &TrialBalanceAccount) -> Decimal {
    NormalBalance::from_account_type(&account.account_type)
        .display_balance(account.stored_closing_balance())
}

#[derive(Default)]
struct Sums {
    opening_debit: Decimal,
    opening_credit: Decimal,
    period_debit: Decimal,
    period_credit: Decimal,
    closing_debit: Decimal,
    closing_credit: Decimal,
}

fn sums(accounts: &[TrialBalanceAccount]) -> Sums {
    accounts.iter().fold(Sums::default(), |mut s, a| {
        s.opening_debit += a.opening_debit;
        s.opening_credit += a.opening_credit;
        s.period_debit += a.period_debit;
        s.period_credit += a.period_credit;
        s.closing_debit += a.closing_debit;
        s.closing_credit += a.closing_credit;
        s
    })
}

impl ReportRenderer for TrialBalanceRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &TRIAL_BALANCE
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let tb: TrialBalance = ctx.decode();
        let s = sums(tb.accounts.as_deref().unwrap_or_default());
        let mut figures = Figures::default();
        figures
            .set("openingDebit", s.opening_debit)
            .set("openingCredit", s.opening_credit)
            .set("openingBalance", s.opening_debit - s.opening_credit)
            .set("periodDebit", s.period_debit)
            .set("periodCredit", s.period_credit)
            .set("periodBalance", s.period_debit - s.period_credit)
            .set("closingDebit", s.closing_debit)
            .set("closingCredit", s.closing_credit)
            .set("closingBalance", s.closing_debit - s.closing_credit);
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let tb: TrialBalance = ctx.decode();
        if let Some(as_of) = &tb.as_of {
            ctx.as_of = Some(as_of.clone());
        }
        let accounts = tb.accounts.unwrap_or_default();
        let fmt = &ctx.fmt;

        let mut table = Table::from_plan(&plan_fixed(COLUMNS, 1.0));
        for a in &accounts {
            table.push(vec![
                Cell::opt_text(Some(&a.account_code)),
                Cell::opt_text(Some(&a.account_name)),
                Cell::opt_text(Some(&a.account_type)),
                Cell::currency(a.opening_debit, fmt),
                Cell::currency(a.opening_credit, fmt),
                Cell::currency(a.period_debit, fmt),
                Cell::currency(a.period_credit, fmt),
                Cell::currency(a.closing_debit, fmt),
                Cell::currency(a.closing_credit, fmt),
                Cell::currency(display_balance(a), fmt),
            ]);
        }
        let table = table.with_totals("Total", fmt);
        let mut sections = vec![Section::table("Accounts", table)];

        if !accounts.is_empty() {
            let s = sums(&accounts);
            let difference = s.closing_debit - s.closing_credit;
            let status = if fmt.round(difference).is_zero() {
                "Balanced"
            } else {
                "Out of balance"
            };
            sections.push(Section::key_values(
                "Trial Balance Check",
                vec![
                    KeyValue::new("Total Closing Debit", Cell::currency(s.closing_debit, fmt)),
                    KeyValue::new("Total Closing Credit", Cell::currency(s.closing_credit, fmt)),
                    KeyValue::new("Difference", Cell::currency(difference, fmt)),
                    KeyValue::new("Status", Cell::text(status)).emphasized(),
                ],
            ));
        }
        sections
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
            "type": "trial_balance",
            "data": {"accounts": [
                {"accountCode": "1000", "accountName": "Cash", "accountType": "Asset",
                 "closingDebit": 100, "closingCredit": 0, "closingBalance": 100},
                {"accountCode": "2000", "accountName": "Payables", "accountType": "Liability",
                 "closingDebit": 0, "closingCredit": 100, "closingBalance": 100}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn credit_normal_balances_are_inverted() {
        let report = report();
        let mut ctx = RenderContext::new(&report, Formatter::default());
        let sections = TrialBalanceRenderer.render_sections(&mut ctx);
        let table = sections[0].as_table().unwrap();
        let balance = table.column_index("balance").unwrap();
        assert_eq!(table.rows[0][balance].display, "AED 100.00");
        assert_eq!(table.rows[1][balance].display, "AED -100.00");
    }

    #[test]
    fn cards_are_debit_credit_balance_triples() {
        let report = report();
        let mut ctx = RenderContext::new(&report, Formatter::default());
        let cards = TrialBalanceRenderer.render_summary(&mut ctx);
        assert_eq!(cards.len(), 9);
        assert_eq!(cards[6].label, "Closing Debit");
        assert_eq!(cards[6].value.decimal(), Some(dec!(100)));
        assert_eq!(cards[8].value.decimal(), Some(dec!(0)));
    }

    #[test]
    fn balance_check_reports_status() {
        let report = report();
        let mut ctx = RenderContext::new(&report, Formatter::default());
        let sections = TrialBalanceRenderer.render_sections(&mut ctx);
        let check = sections[1].clone();
        assert_eq!(check.title.as_deref(), Some("Trial Balance Check"));
        let crate::document::SectionBody::KeyValues(items) = check.body else {
            panic!("expected key values");
        };
        assert_eq!(items[3].value.display, "Balanced");
    }

    #[test]
    fn no_accounts_is_a_notice() {
        let report = ReportData::from_value(json!({"type": "trial_balance", "data": {}})).unwrap();
        let mut ctx = RenderContext::new(&report, Formatter::default());
        let sections = TrialBalanceRenderer.render_sections(&mut ctx);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_notice());
    }
}
