//! Static per-type presentation data: titles, accent colours and the fixed
//! set of summary cards each report type shows.

use serde::Serialize;

use crate::document::{PivotKind, Rgb};
use crate::layout::FieldKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Payload is an array of rows.
    Tabular,
    /// Payload is a nested object.
    Structured,
}

/// One summary card: a label and where its value comes from. The first key
/// that resolves wins; see [`super::summary`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CardSpec {
    pub label: &'static str,
    pub keys: &'static [&'static str],
    pub kind: FieldKind,
}

const fn money(label: &'static str, keys: &'static [&'static str]) -> CardSpec {
    CardSpec {
        label,
        keys,
        kind: FieldKind::Currency,
    }
}

const fn number(label: &'static str, keys: &'static [&'static str]) -> CardSpec {
    CardSpec {
        label,
        keys,
        kind: FieldKind::Number,
    }
}

const fn text(label: &'static str, keys: &'static [&'static str]) -> CardSpec {
    CardSpec {
        label,
        keys,
        kind: FieldKind::Text,
    }
}

#[derive(Debug, Serialize)]
pub struct ReportTypeDescriptor {
    pub tag: &'static str,
    pub aliases: &'static [&'static str],
    /// Empty for the generic fallbacks, which title themselves from the tag.
    pub title: &'static str,
    pub shape: Shape,
    pub accent: Rgb,
    pub cards: &'static [CardSpec],
    /// Breakdown sheets for tabular reports.
    pub pivots: &'static [PivotKind],
}

impl ReportTypeDescriptor {
    pub fn matches(&self, normalized_tag: &str) -> bool {
        self.tag == normalized_tag || self.aliases.contains(&normalized_tag)
    }
}

/// Lowercase, trimmed, with dashes and spaces as underscores.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace(['-', ' '], "_")
}

const LIST_CARDS: &[CardSpec] = &[
    number("Records", &["count", "totalCount", "recordCount"]),
    money("Total Amount", &["totalAmount"]),
    money("Total VAT", &["totalVat", "vatTotal"]),
    money("Grand Total", &["grandTotal", "totalWithVat"]),
];

const EXPENSE_CARDS: &[CardSpec] = &[
    money("Total Amount", &["totalAmount"]),
    money("Total VAT", &["totalVat", "vatTotal"]),
    money("Grand Total", &["grandTotal", "totalWithVat"]),
    number("Expenses", &["count", "totalCount", "expenseCount"]),
    money("Average Expense", &["averageAmount", "average", "averageExpense"]),
    text("Top Category", &["topCategory"]),
    text("Top Vendor", &["topVendor"]),
];

const VAT_CARDS: &[CardSpec] = &[
    money("Output VAT", &["outputVat"]),
    money("Input VAT", &["inputVat"]),
    money("Net VAT", &["netVat"]),
];

const TRIAL_BALANCE_CARDS: &[CardSpec] = &[
    money("Opening Debit", &["openingDebit"]),
    money("Opening Credit", &["openingCredit"]),
    money("Opening Balance", &["openingBalance"]),
    money("Period Debit", &["periodDebit"]),
    money("Period Credit", &["periodCredit"]),
    money("Net Movement", &["periodBalance"]),
    money("Closing Debit", &["closingDebit"]),
    money("Closing Credit", &["closingCredit"]),
    money("Closing Balance", &["closingBalance"]),
];

const BALANCE_SHEET_CARDS: &[CardSpec] = &[
    money("Total Assets", &["totalAssets"]),
    money("Total Liabilities", &["totalLiabilities"]),
    money("Total Equity", &["totalEquity"]),
    money("Liabilities + Equity", &["liabilitiesAndEquity"]),
];

const PROFIT_LOSS_CARDS: &[CardSpec] = &[
    money("Revenue", &["totalRevenue"]),
    money("Cost of Sales", &["totalCostOfSales"]),
    money("Gross Profit", &["grossProfit"]),
    money("Operating Expenses", &["totalExpenses"]),
    money("Net Profit", &["netProfit"]),
];

const RECONCILIATION_CARDS: &[CardSpec] = &[
    money("Statement Balance", &["statementBalance"]),
    money("Book Balance", &["bookBalance"]),
    money("Difference", &["difference"]),
    number("Matched", &["matchedCount"]),
    number("Unmatched", &["unmatchedCount"]),
];

const STOCK_CARDS: &[CardSpec] = &[
    number("Opening", &["openingQty"]),
    number("Inwards", &["inwardsQty"]),
    number("Outwards", &["outwardsQty"]),
    number("Adjustments", &["adjustmentQty"]),
    number("Closing", &["closingQty"]),
    money("Stock Value", &["closingValue"]),
];

const AGING_CARDS: &[CardSpec] = &[
    money("Total Outstanding", &["totalOutstanding"]),
    money("Current", &["current"]),
    money("1-30 Days", &["days1To30"]),
    money("31-60 Days", &["days31To60"]),
    money("61-90 Days", &["days61To90"]),
    money("Over 90 Days", &["over90"]),
];

const LEDGER_CARDS: &[CardSpec] = &[
    number("Accounts", &["accountCount"]),
    money("Total Debit", &["totalDebit"]),
    money("Total Credit", &["totalCredit"]),
];

const fn tabular(
    tag: &'static str,
    aliases: &'static [&'static str],
    title: &'static str,
    accent: Rgb,
    pivots: &'static [PivotKind],
) -> ReportTypeDescriptor {
    ReportTypeDescriptor {
        tag,
        aliases,
        title,
        shape: Shape::Tabular,
        accent,
        cards: LIST_CARDS,
        pivots,
    }
}

const fn structured(
    tag: &'static str,
    aliases: &'static [&'static str],
    title: &'static str,
    accent: Rgb,
    cards: &'static [CardSpec],
) -> ReportTypeDescriptor {
    ReportTypeDescriptor {
        tag,
        aliases,
        title,
        shape: Shape::Structured,
        accent,
        cards,
        pivots: &[],
    }
}

pub static EXPENSES: ReportTypeDescriptor = ReportTypeDescriptor {
    tag: "expenses",
    aliases: &["expense", "expense_list", "expense_report"],
    title: "Expense Report",
    shape: Shape::Tabular,
    accent: Rgb::new(0xB9, 0x1C, 0x1C),
    cards: EXPENSE_CARDS,
    pivots: &[PivotKind::Category, PivotKind::Vendor, PivotKind::Month],
};

pub static INCOME: ReportTypeDescriptor = tabular(
    "income",
    &["income_list", "income_report"],
    "Income Report",
    Rgb::new(0x04, 0x78, 0x57),
    &[PivotKind::Customer, PivotKind::Month],
);

pub static SALES: ReportTypeDescriptor = tabular(
    "sales",
    &["sales_report", "sales_orders"],
    "Sales Report",
    Rgb::new(0x04, 0x78, 0x57),
    &[PivotKind::Customer, PivotKind::Month],
);

pub static PURCHASES: ReportTypeDescriptor = tabular(
    "purchases",
    &["purchase_report", "bills"],
    "Purchases Report",
    Rgb::new(0x92, 0x40, 0x0E),
    &[PivotKind::Vendor, PivotKind::Month],
);

pub static TRANSACTIONS: ReportTypeDescriptor = tabular(
    "transactions",
    &["transaction_list", "bank_transactions"],
    "Transactions",
    Rgb::new(0x1F, 0x4E, 0x79),
    &[PivotKind::Month],
);

pub static CUSTOMERS: ReportTypeDescriptor = tabular(
    "customers",
    &["customer_list"],
    "Customer List",
    Rgb::new(0x1D, 0x4E, 0xD8),
    &[],
);

pub static VENDORS: ReportTypeDescriptor = tabular(
    "vendors",
    &["vendor_list", "suppliers"],
    "Vendor List",
    Rgb::new(0x6D, 0x28, 0xD9),
    &[],
);

pub static PRODUCTS: ReportTypeDescriptor = tabular(
    "products",
    &["product_list", "items"],
    "Product List",
    Rgb::new(0x0F, 0x76, 0x6E),
    &[],
);

pub static INVOICES: ReportTypeDescriptor = tabular(
    "invoices",
    &["invoice_list", "sales_invoices"],
    "Invoice Register",
    Rgb::new(0x1D, 0x4E, 0xD8),
    &[PivotKind::Customer, PivotKind::Month],
);

pub static VAT: ReportTypeDescriptor = structured(
    "vat",
    &["vat_report", "vat_return", "vat_summary"],
    "VAT Report",
    Rgb::new(0x7C, 0x3A, 0xED),
    VAT_CARDS,
);

pub static TRIAL_BALANCE: ReportTypeDescriptor = structured(
    "trial_balance",
    &["trialbalance", "tb"],
    "Trial Balance",
    Rgb::new(0x1F, 0x4E, 0x79),
    TRIAL_BALANCE_CARDS,
);

pub static BALANCE_SHEET: ReportTypeDescriptor = structured(
    "balance_sheet",
    &["balancesheet", "statement_of_financial_position"],
    "Balance Sheet",
    Rgb::new(0x0E, 0x74, 0x90),
    BALANCE_SHEET_CARDS,
);

pub static PROFIT_LOSS: ReportTypeDescriptor = structured(
    "profit_loss",
    &["profit_and_loss", "pnl", "income_statement"],
    "Profit and Loss Statement",
    Rgb::new(0x04, 0x78, 0x57),
    PROFIT_LOSS_CARDS,
);

pub static BANK_RECONCILIATION: ReportTypeDescriptor = structured(
    "bank_reconciliation",
    &["reconciliation", "bank_rec"],
    "Bank Reconciliation",
    Rgb::new(0x1E, 0x40, 0xAF),
    RECONCILIATION_CARDS,
);

pub static STOCK_BALANCE: ReportTypeDescriptor = structured(
    "stock_balance",
    &["stock", "inventory", "inventory_balance"],
    "Stock Balance Report",
    Rgb::new(0x0F, 0x76, 0x6E),
    STOCK_CARDS,
);

pub static RECEIVABLES: ReportTypeDescriptor = structured(
    "receivables",
    &["accounts_receivable", "ar_aging", "aged_receivables", "receivables_aging"],
    "Accounts Receivable Aging",
    Rgb::new(0x1D, 0x4E, 0xD8),
    AGING_CARDS,
);

pub static PAYABLES: ReportTypeDescriptor = structured(
    "payables",
    &["accounts_payable", "ap_aging", "aged_payables", "payables_aging"],
    "Accounts Payable Aging",
    Rgb::new(0xB4, 0x53, 0x09),
    AGING_CARDS,
);

pub static GENERAL_LEDGER: ReportTypeDescriptor = structured(
    "general_ledger",
    &["ledger", "gl"],
    "General Ledger",
    Rgb::new(0x37, 0x41, 0x51),
    LEDGER_CARDS,
);

pub static TAX_INVOICE: ReportTypeDescriptor = structured(
    "tax_invoice",
    &["invoice", "invoice_document"],
    "Tax Invoice",
    Rgb::new(0x1F, 0x4E, 0x79),
    &[],
);

pub static GENERIC_TABULAR: ReportTypeDescriptor = tabular(
    "",
    &[],
    "",
    Rgb::new(0x1F, 0x4E, 0x79),
    &[],
);

pub static GENERIC_OBJECT: ReportTypeDescriptor = structured(
    "",
    &[],
    "",
    Rgb::new(0x1F, 0x4E, 0x79),
    &[],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_tags() {
        assert_eq!(normalize_tag(" Trial-Balance "), "trial_balance");
        assert_eq!(normalize_tag("profit and loss"), "profit_and_loss");
    }

    #[test]
    fn aliases_match() {
        assert!(PROFIT_LOSS.matches("pnl"));
        assert!(PROFIT_LOSS.matches("profit_loss"));
        assert!(!PROFIT_LOSS.matches("balance_sheet"));
    }

    #[test]
    fn fixed_card_sets() {
        let labels: Vec<&str> = VAT.cards.iter().map(|c| c.label).collect();
        assert_eq!(labels, ["Output VAT", "Input VAT", "Net VAT"]);
        assert_eq!(TRIAL_BALANCE.cards.len(), 9);
        assert_eq!(STOCK_BALANCE.cards.len(), 6);
    }
}
