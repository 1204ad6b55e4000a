//! General ledger: an accounts overview plus one running-balance table per
//! account, each on its own sheet.

use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, GENERAL_LEDGER};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, Section, Table};
use crate::format::Formatter;
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{lenient, GeneralLedger, LedgerAccount, Row};

pub struct GeneralLedgerRenderer;

const OVERVIEW_COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("accountCode", "Code", 0.7),
    FixedColumn::new("accountName", "Account", 2.0),
    FixedColumn::new("openingBalance", "Opening", 1.0),
    FixedColumn::new("totalDebit", "Debit", 1.0),
    FixedColumn::new("totalCredit", "Credit", 1.0),
    FixedColumn::new("closingBalance", "Closing", 1.0),
];

const ENTRY_COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("date", "Date", 0.8),
    FixedColumn::new("reference", "Reference", 0.9),
    FixedColumn::new("description", "Description", 2.0),
    FixedColumn::new("debit", "Debit", 1.0),
    FixedColumn::new("credit", "Credit", 1.0),
    FixedColumn::new("balance", "Balance", 1.0),
];

const REFERENCE_KEYS: &[&str] = &["reference", "ref", "entryNumber", "journalNumber", "documentNumber"];
const DESCRIPTION_KEYS: &[&str] = &["description", "memo", "narration", "details"];

fn entry_debit(row: &Row) -> Decimal {
    lenient::field_decimal(row, &["debit", "debitAmount"]).unwrap_or_default()
}

fn entry_credit(row: &Row) -> Decimal {
    lenient::field_decimal(row, &["credit", "creditAmount"]).unwrap_or_default()
}

struct AccountTotals {
    debit: Decimal,
    credit: Decimal,
    closing: Decimal,
}

/// Provided totals win; missing ones come from the entries.
fn account_totals(account: &LedgerAccount) -> AccountTotals {
    let entries = account.entries.as_deref().unwrap_or_default();
    let debit = account
        .total_debit
        .unwrap_or_else(|| entries.iter().map(entry_debit).sum());
    let credit = account
        .total_credit
        .unwrap_or_else(|| entries.iter().map(entry_credit).sum());
    AccountTotals {
        debit,
        credit,
        closing: account
            .closing_balance
            .unwrap_or(account.opening_balance + debit - credit),
    }
}

fn entries_table(account: &LedgerAccount, fmt: &Formatter) -> Table {
    let mut table = Table::from_plan(&plan_fixed(ENTRY_COLUMNS, 1.0));
    table.push(vec![
        Cell::empty(),
        Cell::empty(),
        Cell::text("Opening Balance"),
        Cell::empty(),
        Cell::empty(),
        Cell::currency(account.opening_balance, fmt),
    ]);

    let mut running = account.opening_balance;
    for entry in account.entries.as_deref().unwrap_or_default() {
        let debit = entry_debit(entry);
        let credit = entry_credit(entry);
        running = lenient::field_decimal(entry, &["balance", "runningBalance"])
            .unwrap_or(running + debit - credit);
        table.push(vec![
            Cell::date_str(lenient::field_text(entry, crate::document::DATE_KEYS).as_deref(), fmt),
            Cell::opt_text(lenient::field_text(entry, REFERENCE_KEYS).as_deref()),
            Cell::opt_text(lenient::field_text(entry, DESCRIPTION_KEYS).as_deref()),
            Cell::currency(debit, fmt),
            Cell::currency(credit, fmt),
            Cell::currency(running, fmt),
        ]);
    }

    let totals = account_totals(account);
    table.with_totals_row(vec![
        Cell::empty(),
        Cell::empty(),
        Cell::text("Closing Balance"),
        Cell::currency(totals.debit, fmt),
        Cell::currency(totals.credit, fmt),
        Cell::currency(totals.closing, fmt),
    ])
}

impl ReportRenderer for GeneralLedgerRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &GENERAL_LEDGER
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let ledger: GeneralLedger = ctx.decode();
        let accounts = ledger.accounts.unwrap_or_default();
        let (debit, credit) = accounts.iter().map(account_totals).fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(d, c), t| (d + t.debit, c + t.credit),
        );
        let mut figures = Figures::default();
        figures
            .set("accountCount", Decimal::from(accounts.len()))
            .set("totalDebit", debit)
            .set("totalCredit", credit);
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let ledger: GeneralLedger = ctx.decode();
        let accounts = ledger.accounts.unwrap_or_default();
        let fmt = &ctx.fmt;

        let mut overview = Table::from_plan(&plan_fixed(OVERVIEW_COLUMNS, 1.0));
        for account in &accounts {
            let totals = account_totals(account);
            overview.push(vec![
                Cell::opt_text(Some(&account.account_code)),
                Cell::opt_text(Some(&account.account_name)),
                Cell::currency(account.opening_balance, fmt),
                Cell::currency(totals.debit, fmt),
                Cell::currency(totals.credit, fmt),
                Cell::currency(totals.closing, fmt),
            ]);
        }
        // Opening and closing balances are positions, not flows.
        let debit = overview.sum_key("totalDebit");
        let credit = overview.sum_key("totalCredit");
        let overview = overview.with_totals_row(vec![
            Cell::text("Total"),
            Cell::empty(),
            Cell::empty(),
            Cell::currency(debit, fmt),
            Cell::currency(credit, fmt),
            Cell::empty(),
        ]);

        let mut sections = vec![Section::table("Accounts", overview)];
        for account in &accounts {
            let name = account.display_name();
            let has_entries = account.entries.as_ref().is_some_and(|e| !e.is_empty());
            let section = if has_entries {
                Section::table(name.clone(), entries_table(account, fmt))
            } else {
                Section::no_data(name.clone())
            };
            sections.push(section.on_sheet(name));
        }
        sections
    }
}
