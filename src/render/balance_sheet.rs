use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, BALANCE_SHEET};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section, Table};
use crate::format::Formatter;
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{BalanceSheet, BalanceSheetAccount, NormalBalance};

pub struct BalanceSheetRenderer;

const COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("accountCode", "Code", 0.7),
    FixedColumn::new("accountName", "Account", 2.2),
    FixedColumn::new("accountSubType", "Classification", 1.2),
    FixedColumn::new("balance", "Balance", 1.1),
];

/// Balances shown with the section's sign convention; an account without a
/// type takes the section's.
fn shown(account: &BalanceSheetAccount, section_type: &str) -> Decimal {
    let account_type = if account.account_type.trim().is_empty() {
        section_type
    } else {
        account.account_type.as_str()
    };
    NormalBalance::from_account_type(account_type).display_balance(account.balance)
}

struct Group<'a> {
    title: &'static str,
    account_type: &'static str,
    accounts: Option<&'a [BalanceSheetAccount]>,
}

impl Group<'_> {
    fn total(&self) -> Decimal {
        self.accounts
            .unwrap_or_default()
            .iter()
            .map(|a| shown(a, self.account_type))
            .sum()
    }

    fn table(&self, fmt: &Formatter) -> Table {
        let mut table = Table::from_plan(&plan_fixed(COLUMNS, 1.0));
        for a in self.accounts.unwrap_or_default() {
            table.push(vec![
                Cell::opt_text(Some(&a.account_code)),
                Cell::opt_text(Some(&a.account_name)),
                Cell::opt_text(a.account_sub_type.as_deref()),
                Cell::currency(shown(a, self.account_type), fmt),
            ]);
        }
        table.with_totals(&format!("Total {}", self.title), fmt)
    }
}

struct Totals {
    assets: Decimal,
    liabilities: Decimal,
    equity: Decimal,
}

impl Totals {
    fn liabilities_and_equity(&self) -> Decimal {
        self.liabilities + self.equity
    }
}

fn groups(bs: &BalanceSheet) -> [Group<'_>; 3] {
    [
        Group {
            title: "Assets",
            account_type: "asset",
            accounts: bs.assets.as_deref(),
        },
        Group {
            title: "Liabilities",
            account_type: "liability",
            accounts: bs.liabilities.as_deref(),
        },
        Group {
            title: "Equity",
            account_type: "equity",
            accounts: bs.equity.as_deref(),
        },
    ]
}

/// Provided totals win; missing ones are summed from the accounts.
fn totals(bs: &BalanceSheet) -> Totals {
    let [assets, liabilities, equity] = groups(bs);
    let given = bs.totals.clone().unwrap_or_default();
    Totals {
        assets: given.total_assets.unwrap_or_else(|| assets.total()),
        liabilities: given.total_liabilities.unwrap_or_else(|| liabilities.total()),
        equity: given.total_equity.unwrap_or_else(|| equity.total()),
    }
}

impl ReportRenderer for BalanceSheetRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &BALANCE_SHEET
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let t = totals(&ctx.decode::<BalanceSheet>());
        let mut figures = Figures::default();
        figures
            .set("totalAssets", t.assets)
            .set("totalLiabilities", t.liabilities)
            .set("totalEquity", t.equity)
            .set("liabilitiesAndEquity", t.liabilities_and_equity());
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let bs: BalanceSheet = ctx.decode();
        if let Some(as_of) = &bs.as_of {
            ctx.as_of = Some(as_of.clone());
        }
        let fmt = &ctx.fmt;

        let mut sections: Vec<Section> = groups(&bs)
            .iter()
            .map(|g| Section::table(g.title, g.table(fmt)))
            .collect();

        let t = totals(&bs);
        let difference = t.assets - t.liabilities_and_equity();
        let status = if fmt.round(difference).is_zero() {
            "Balanced"
        } else {
            "Out of balance"
        };
        sections.push(Section::key_values(
            "Balance Check",
            vec![
                KeyValue::new("Total Assets", Cell::currency(t.assets, fmt)),
                KeyValue::new(
                    "Total Liabilities + Equity",
                    Cell::currency(t.liabilities_and_equity(), fmt),
                ),
                KeyValue::new("Difference", Cell::currency(difference, fmt)),
                KeyValue::new("Status", Cell::text(status)).emphasized(),
            ],
        ));
        sections
    }
}
