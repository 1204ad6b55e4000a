//! Typed payloads of the structured report types.
//!
//! All fields default so a partially populated payload still renders;
//! itemized arrays stay as generic rows where the column planner decides
//! their presentation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::Row;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VatReport {
    #[serde(alias = "outputVAT", alias = "totalOutputVat", alias = "vatOnSales", deserialize_with = "lenient::de_opt_decimal")]
    pub output_vat: Option<Decimal>,
    #[serde(alias = "inputVAT", alias = "totalInputVat", alias = "vatOnPurchases", deserialize_with = "lenient::de_opt_decimal")]
    pub input_vat: Option<Decimal>,
    #[serde(alias = "netVAT", alias = "vatPayable", alias = "netVatPayable", deserialize_with = "lenient::de_opt_decimal")]
    pub net_vat: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_sales: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_purchases: Option<Decimal>,
    #[serde(alias = "outputItems", alias = "salesItems", deserialize_with = "lenient::de_opt_rows")]
    pub sales: Option<Vec<Row>>,
    #[serde(alias = "inputItems", alias = "purchaseItems", alias = "expenses", deserialize_with = "lenient::de_opt_rows")]
    pub purchases: Option<Vec<Row>>,
    #[serde(deserialize_with = "lenient::de_opt_rows")]
    pub adjustments: Option<Vec<Row>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrialBalanceAccount {
    #[serde(alias = "code", deserialize_with = "lenient::de_string")]
    pub account_code: String,
    #[serde(alias = "name", deserialize_with = "lenient::de_string")]
    pub account_name: String,
    #[serde(alias = "type", deserialize_with = "lenient::de_string")]
    pub account_type: String,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub opening_debit: Decimal,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub opening_credit: Decimal,
    #[serde(alias = "debit", deserialize_with = "lenient::de_decimal")]
    pub period_debit: Decimal,
    #[serde(alias = "credit", deserialize_with = "lenient::de_decimal")]
    pub period_credit: Decimal,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub closing_debit: Decimal,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub closing_credit: Decimal,
    /// Stored (debit-positive) closing balance.
    #[serde(alias = "balance", deserialize_with = "lenient::de_opt_decimal")]
    pub closing_balance: Option<Decimal>,
}

impl TrialBalanceAccount {
    pub fn stored_closing_balance(&self) -> Decimal {
        self.closing_balance
            .unwrap_or(self.closing_debit - self.closing_credit)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrialBalance {
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub accounts: Option<Vec<TrialBalanceAccount>>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetAccount {
    #[serde(alias = "code", deserialize_with = "lenient::de_string")]
    pub account_code: String,
    #[serde(alias = "name", deserialize_with = "lenient::de_string")]
    pub account_name: String,
    #[serde(alias = "type", deserialize_with = "lenient::de_string")]
    pub account_type: String,
    #[serde(alias = "subType", alias = "subtype", deserialize_with = "lenient::de_opt_string")]
    pub account_sub_type: Option<String>,
    #[serde(alias = "amount", alias = "closingBalance", deserialize_with = "lenient::de_decimal")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheetTotals {
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_assets: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_liabilities: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_equity: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheet {
    #[serde(alias = "date", deserialize_with = "lenient::de_opt_string")]
    pub as_of: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub assets: Option<Vec<BalanceSheetAccount>>,
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub liabilities: Option<Vec<BalanceSheetAccount>>,
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub equity: Option<Vec<BalanceSheetAccount>>,
    pub totals: Option<BalanceSheetTotals>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitLossLine {
    #[serde(alias = "code", deserialize_with = "lenient::de_string")]
    pub account_code: String,
    #[serde(alias = "name", alias = "category", deserialize_with = "lenient::de_string")]
    pub account_name: String,
    #[serde(alias = "total", alias = "balance", deserialize_with = "lenient::de_decimal")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitLossSummary {
    #[serde(alias = "revenue", deserialize_with = "lenient::de_opt_decimal")]
    pub total_revenue: Option<Decimal>,
    #[serde(alias = "costOfSales", alias = "totalCogs", deserialize_with = "lenient::de_opt_decimal")]
    pub total_cost_of_sales: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub gross_profit: Option<Decimal>,
    #[serde(alias = "totalOperatingExpenses", deserialize_with = "lenient::de_opt_decimal")]
    pub total_expenses: Option<Decimal>,
    #[serde(alias = "netIncome", deserialize_with = "lenient::de_opt_decimal")]
    pub net_profit: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfitLoss {
    #[serde(alias = "income", alias = "sales", deserialize_with = "lenient::de_opt_items")]
    pub revenue: Option<Vec<ProfitLossLine>>,
    #[serde(alias = "cogs", alias = "costOfGoodsSold", deserialize_with = "lenient::de_opt_items")]
    pub cost_of_sales: Option<Vec<ProfitLossLine>>,
    #[serde(alias = "operatingExpenses", deserialize_with = "lenient::de_opt_items")]
    pub expenses: Option<Vec<ProfitLossLine>>,
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub other_income: Option<Vec<ProfitLossLine>>,
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub other_expenses: Option<Vec<ProfitLossLine>>,
    pub summary: Option<ProfitLossSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankAccountInfo {
    #[serde(alias = "accountName", deserialize_with = "lenient::de_opt_string")]
    pub name: Option<String>,
    #[serde(alias = "iban", deserialize_with = "lenient::de_opt_string")]
    pub account_number: Option<String>,
    #[serde(alias = "bank", deserialize_with = "lenient::de_opt_string")]
    pub bank_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankReconciliation {
    #[serde(alias = "account")]
    pub bank_account: Option<BankAccountInfo>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub statement_date: Option<String>,
    #[serde(alias = "bankBalance", deserialize_with = "lenient::de_opt_decimal")]
    pub statement_balance: Option<Decimal>,
    #[serde(alias = "ledgerBalance", deserialize_with = "lenient::de_opt_decimal")]
    pub book_balance: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub difference: Option<Decimal>,
    #[serde(alias = "matchedTransactions", deserialize_with = "lenient::de_opt_rows")]
    pub matched: Option<Vec<Row>>,
    #[serde(alias = "unmatchedStatement", alias = "unmatchedBankTransactions", deserialize_with = "lenient::de_opt_rows")]
    pub unmatched_bank: Option<Vec<Row>>,
    #[serde(alias = "unmatchedLedger", alias = "unmatchedBookEntries", deserialize_with = "lenient::de_opt_rows")]
    pub unmatched_book: Option<Vec<Row>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockSummary {
    #[serde(alias = "opening", alias = "openingQuantity", deserialize_with = "lenient::de_opt_decimal")]
    pub opening_qty: Option<Decimal>,
    #[serde(alias = "inwards", alias = "inwardsQuantity", deserialize_with = "lenient::de_opt_decimal")]
    pub inwards_qty: Option<Decimal>,
    #[serde(alias = "outwards", alias = "outwardsQuantity", deserialize_with = "lenient::de_opt_decimal")]
    pub outwards_qty: Option<Decimal>,
    #[serde(alias = "adjustments", alias = "adjustmentQuantity", deserialize_with = "lenient::de_opt_decimal")]
    pub adjustment_qty: Option<Decimal>,
    #[serde(alias = "closing", alias = "closingQuantity", deserialize_with = "lenient::de_opt_decimal")]
    pub closing_qty: Option<Decimal>,
    #[serde(alias = "totalValue", alias = "stockValue", deserialize_with = "lenient::de_opt_decimal")]
    pub closing_value: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockBalance {
    #[serde(alias = "products", deserialize_with = "lenient::de_opt_rows")]
    pub items: Option<Vec<Row>>,
    pub summary: Option<StockSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgingSummary {
    #[serde(alias = "total", deserialize_with = "lenient::de_opt_decimal")]
    pub total_outstanding: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub current: Option<Decimal>,
    #[serde(rename = "days1To30", alias = "days1to30", alias = "1-30", deserialize_with = "lenient::de_opt_decimal")]
    pub days_1_to_30: Option<Decimal>,
    #[serde(rename = "days31To60", alias = "days31to60", alias = "31-60", deserialize_with = "lenient::de_opt_decimal")]
    pub days_31_to_60: Option<Decimal>,
    #[serde(rename = "days61To90", alias = "days61to90", alias = "61-90", deserialize_with = "lenient::de_opt_decimal")]
    pub days_61_to_90: Option<Decimal>,
    #[serde(rename = "over90", alias = "days90Plus", alias = "90+", deserialize_with = "lenient::de_opt_decimal")]
    pub over_90: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgingReport {
    #[serde(alias = "invoices", alias = "bills", alias = "customers", alias = "vendors", deserialize_with = "lenient::de_opt_rows")]
    pub items: Option<Vec<Row>>,
    pub summary: Option<AgingSummary>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub as_of: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerAccount {
    #[serde(alias = "code", deserialize_with = "lenient::de_string")]
    pub account_code: String,
    #[serde(alias = "name", deserialize_with = "lenient::de_string")]
    pub account_name: String,
    #[serde(alias = "type", deserialize_with = "lenient::de_string")]
    pub account_type: String,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub opening_balance: Decimal,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub closing_balance: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_debit: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub total_credit: Option<Decimal>,
    #[serde(alias = "transactions", alias = "lines", deserialize_with = "lenient::de_opt_rows")]
    pub entries: Option<Vec<Row>>,
}

impl LedgerAccount {
    /// `"1000 - Cash"`, or whichever half is present.
    pub fn display_name(&self) -> String {
        match (self.account_code.trim(), self.account_name.trim()) {
            ("", "") => "Unnamed account".to_string(),
            ("", name) => name.to_string(),
            (code, "") => code.to_string(),
            (code, name) => format!("{code} - {name}"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralLedger {
    #[serde(deserialize_with = "lenient::de_opt_items")]
    pub accounts: Option<Vec<LedgerAccount>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceParty {
    #[serde(alias = "customerName", alias = "companyName", deserialize_with = "lenient::de_opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub phone: Option<String>,
    #[serde(alias = "vatNumber", alias = "taxNumber", alias = "trnNumber", deserialize_with = "lenient::de_opt_string")]
    pub trn: Option<String>,
}

impl InvoiceParty {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.trn.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceLine {
    #[serde(alias = "name", alias = "productName", alias = "item", deserialize_with = "lenient::de_string")]
    pub description: String,
    #[serde(alias = "qty", deserialize_with = "lenient::de_opt_decimal")]
    pub quantity: Option<Decimal>,
    #[serde(alias = "rate", alias = "price", deserialize_with = "lenient::de_decimal")]
    pub unit_price: Decimal,
    #[serde(deserialize_with = "lenient::de_decimal")]
    pub discount: Decimal,
    #[serde(alias = "taxRate", deserialize_with = "lenient::de_opt_decimal")]
    pub vat_rate: Option<Decimal>,
    #[serde(alias = "taxAmount", alias = "vat", deserialize_with = "lenient::de_opt_decimal")]
    pub vat_amount: Option<Decimal>,
    #[serde(alias = "amount", alias = "lineTotal", deserialize_with = "lenient::de_opt_decimal")]
    pub total: Option<Decimal>,
}

impl InvoiceLine {
    pub fn quantity(&self) -> Decimal {
        self.quantity.unwrap_or(Decimal::ONE)
    }

    /// Quantity times unit price, less discount.
    pub fn net(&self) -> Decimal {
        self.quantity() * self.unit_price - self.discount
    }

    pub fn vat(&self) -> Decimal {
        self.vat_amount.unwrap_or_else(|| {
            self.vat_rate
                .map(|rate| self.net() * rate / Decimal::ONE_HUNDRED)
                .unwrap_or_default()
        })
    }

    pub fn line_total(&self) -> Decimal {
        self.total.unwrap_or_else(|| self.net() + self.vat())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceTheme {
    #[serde(alias = "primaryColor", alias = "color", deserialize_with = "lenient::de_opt_string")]
    pub accent_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxInvoice {
    #[serde(alias = "number", deserialize_with = "lenient::de_opt_string")]
    pub invoice_number: Option<String>,
    #[serde(alias = "date", alias = "issueDate", deserialize_with = "lenient::de_opt_string")]
    pub invoice_date: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub due_date: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub status: Option<String>,
    #[serde(alias = "poNumber", deserialize_with = "lenient::de_opt_string")]
    pub reference: Option<String>,
    #[serde(alias = "billTo", alias = "client")]
    pub customer: Option<InvoiceParty>,
    #[serde(alias = "seller", alias = "organization")]
    pub company: Option<InvoiceParty>,
    #[serde(alias = "lineItems", alias = "lines", deserialize_with = "lenient::de_opt_items")]
    pub items: Option<Vec<InvoiceLine>>,
    #[serde(deserialize_with = "lenient::de_opt_decimal")]
    pub subtotal: Option<Decimal>,
    #[serde(alias = "totalDiscount", deserialize_with = "lenient::de_opt_decimal")]
    pub discount_total: Option<Decimal>,
    #[serde(alias = "totalVat", alias = "vatAmount", alias = "taxTotal", deserialize_with = "lenient::de_opt_decimal")]
    pub vat_total: Option<Decimal>,
    #[serde(alias = "grandTotal", alias = "totalAmount", deserialize_with = "lenient::de_opt_decimal")]
    pub total: Option<Decimal>,
    #[serde(alias = "paidAmount", deserialize_with = "lenient::de_opt_decimal")]
    pub amount_paid: Option<Decimal>,
    #[serde(alias = "amountDue", deserialize_with = "lenient::de_opt_decimal")]
    pub balance_due: Option<Decimal>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub currency: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub payment_terms: Option<String>,
    #[serde(alias = "terms", deserialize_with = "lenient::de_opt_string")]
    pub terms_and_conditions: Option<String>,
    pub theme: Option<InvoiceTheme>,
}

impl TaxInvoice {
    pub fn lines(&self) -> &[InvoiceLine] {
        self.items.as_deref().unwrap_or_default()
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal.unwrap_or_else(|| {
            self.lines()
                .iter()
                .map(|l| l.quantity() * l.unit_price)
                .sum()
        })
    }

    pub fn discount_total(&self) -> Decimal {
        self.discount_total
            .unwrap_or_else(|| self.lines().iter().map(|l| l.discount).sum())
    }

    pub fn vat_total(&self) -> Decimal {
        self.vat_total
            .unwrap_or_else(|| self.lines().iter().map(InvoiceLine::vat).sum())
    }

    pub fn total(&self) -> Decimal {
        self.total
            .unwrap_or_else(|| self.subtotal() - self.discount_total() + self.vat_total())
    }

    pub fn balance_due(&self) -> Decimal {
        self.balance_due
            .unwrap_or_else(|| self.total() - self.amount_paid.unwrap_or_default())
    }
}
