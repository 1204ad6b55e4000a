use rust_decimal::Decimal;

use super::descriptor::{ReportTypeDescriptor, PROFIT_LOSS};
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section, Table};
use crate::format::Formatter;
use crate::layout::{plan_fixed, FixedColumn};
use crate::model::{ProfitLoss, ProfitLossLine};

pub struct ProfitLossRenderer;

const COLUMNS: &[FixedColumn] = &[
    FixedColumn::new("accountCode", "Code", 0.7),
    FixedColumn::new("accountName", "Account", 2.6),
    FixedColumn::new("amount", "Amount", 1.2),
];

fn sum(lines: Option<&Vec<ProfitLossLine>>) -> Decimal {
    lines.into_iter().flatten().map(|l| l.amount).sum()
}

struct Totals {
    revenue: Decimal,
    cost_of_sales: Decimal,
    gross_profit: Decimal,
    expenses: Decimal,
    net_profit: Decimal,
}

/// Provided summary figures win; the rest are derived from the lines.
fn totals(pl: &ProfitLoss) -> Totals {
    let given = pl.summary.clone().unwrap_or_default();
    let revenue = given.total_revenue.unwrap_or_else(|| sum(pl.revenue.as_ref()));
    let cost_of_sales = given
        .total_cost_of_sales
        .unwrap_or_else(|| sum(pl.cost_of_sales.as_ref()));
    let gross_profit = given.gross_profit.unwrap_or(revenue - cost_of_sales);
    let expenses = given.total_expenses.unwrap_or_else(|| sum(pl.expenses.as_ref()));
    let other = sum(pl.other_income.as_ref()) - sum(pl.other_expenses.as_ref());
    Totals {
        revenue,
        cost_of_sales,
        gross_profit,
        expenses,
        net_profit: given.net_profit.unwrap_or(gross_profit - expenses + other),
    }
}

fn lines_section(title: &str, lines: Option<&Vec<ProfitLossLine>>, fmt: &Formatter) -> Section {
    let mut table = Table::from_plan(&plan_fixed(COLUMNS, 1.0));
    for line in lines.into_iter().flatten() {
        table.push(vec![
            Cell::opt_text(Some(&line.account_code)),
            Cell::opt_text(Some(&line.account_name)),
            Cell::currency(line.amount, fmt),
        ]);
    }
    Section::table(title, table.with_totals(&format!("Total {title}"), fmt))
}

impl ReportRenderer for ProfitLossRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &PROFIT_LOSS
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        let t = totals(&ctx.decode::<ProfitLoss>());
        let mut figures = Figures::default();
        figures
            .set("totalRevenue", t.revenue)
            .set("totalCostOfSales", t.cost_of_sales)
            .set("grossProfit", t.gross_profit)
            .set("totalExpenses", t.expenses)
            .set("netProfit", t.net_profit);
        figures
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let pl: ProfitLoss = ctx.decode();
        let t = totals(&pl);
        let fmt = &ctx.fmt;

        let mut sections = vec![lines_section("Revenue", pl.revenue.as_ref(), fmt)];
        if pl.cost_of_sales.is_some() {
            sections.push(lines_section("Cost of Sales", pl.cost_of_sales.as_ref(), fmt));
        }
        sections.push(lines_section("Operating Expenses", pl.expenses.as_ref(), fmt));
        if pl.other_income.is_some() {
            sections.push(lines_section("Other Income", pl.other_income.as_ref(), fmt));
        }
        if pl.other_expenses.is_some() {
            sections.push(lines_section("Other Expenses", pl.other_expenses.as_ref(), fmt));
        }

        let net_label = if t.net_profit < Decimal::ZERO {
            "Net Loss"
        } else {
            "Net Profit"
        };
        sections.push(Section::key_values(
            "Net Profit",
            vec![
                KeyValue::new("Total Revenue", Cell::currency(t.revenue, fmt)),
                KeyValue::new("Cost of Sales", Cell::currency(t.cost_of_sales, fmt)),
                KeyValue::new("Gross Profit", Cell::currency(t.gross_profit, fmt)),
                KeyValue::new("Operating Expenses", Cell::currency(t.expenses, fmt)),
                KeyValue::new(net_label, Cell::currency(t.net_profit, fmt)).emphasized(),
            ],
        ));
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionBody;
    use crate::model::ReportData;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn render(data: serde_json::Value) -> (Vec<crate::document::SummaryCard>, Vec<Section>) {
        let report = ReportData::from_value(json!({"type": "pnl", "data": data})).unwrap();
        let mut ctx = RenderContext::new(&report, Formatter::default());
        (
            ProfitLossRenderer.render_summary(&mut ctx),
            ProfitLossRenderer.render_sections(&mut ctx),
        )
    }

    #[test]
    fn derives_gross_and_net() {
        let (cards, sections) = render(json!({
            "revenue": [{"accountCode": "4000", "accountName": "Sales", "amount": 1000}],
            "costOfSales": [{"accountName": "Purchases", "amount": 400}],
            "expenses": [{"accountName": "Rent", "amount": 250}],
            "otherIncome": [{"accountName": "Interest", "amount": 10}]
        }));
        assert_eq!(cards[2].value.decimal(), Some(dec!(600)));
        assert_eq!(cards[4].value.decimal(), Some(dec!(360)));
        let titles: Vec<_> = sections.iter().filter_map(|s| s.title.as_deref()).collect();
        assert_eq!(
            titles,
            ["Revenue", "Cost of Sales", "Operating Expenses", "Other Income", "Net Profit"]
        );
    }

    #[test]
    fn loss_is_labelled() {
        let (_, sections) = render(json!({
            "revenue": [],
            "expenses": [{"accountName": "Rent", "amount": 250}]
        }));
        assert!(sections[0].is_notice());
        let SectionBody::KeyValues(items) = &sections.last().unwrap().body else {
            panic!("expected key values");
        };
        let last = items.last().unwrap();
        assert_eq!(last.label, "Net Loss");
        assert_eq!(last.value.display, "AED -250.00");
    }
}
