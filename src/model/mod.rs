//! Input contract: the report payload handed to the engine.

pub mod lenient;
mod metadata;
mod structured;

pub use metadata::{CurrencySettings, DisplayFormat, LogoBuffer, ReportMetadata, ReportPeriod, RoundingMethod};
pub use structured::{
    AgingReport, AgingSummary, BalanceSheet, BalanceSheetAccount, BalanceSheetTotals,
    BankAccountInfo, BankReconciliation, GeneralLedger, InvoiceLine, InvoiceParty, InvoiceTheme,
    LedgerAccount, ProfitLoss, ProfitLossLine, ProfitLossSummary, StockBalance, StockSummary,
    TaxInvoice, TrialBalance, TrialBalanceAccount, VatReport,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{ReportError, Result};

/// One tabular row: field name to scalar (or array) value, in source order.
pub type Row = serde_json::Map<String, Value>;

/// A complete report as produced by a data provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportData {
    #[serde(rename = "type")]
    pub report_type: String,
    #[serde(default)]
    pub data: ReportPayload,
    #[serde(default)]
    pub metadata: ReportMetadata,
}

/// The report body. The shape follows from the report type; the only
/// runtime distinction is tabular versus structured.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReportPayload {
    Tabular(Vec<Row>),
    Structured(Row),
    #[default]
    Empty,
}

impl ReportPayload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(_) => Self::Tabular(lenient::rows(value).unwrap_or_default()),
            Value::Object(map) => Self::Structured(map),
            _ => Self::Empty,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Tabular(rows) => Value::Array(rows.iter().cloned().map(Value::Object).collect()),
            Self::Structured(map) => Value::Object(map.clone()),
            Self::Empty => Value::Null,
        }
    }
}

impl<'de> Deserialize<'de> for ReportPayload {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(d)?))
    }
}

impl Serialize for ReportPayload {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(s)
    }
}

impl ReportData {
    /// Parse a report from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ReportError::InvalidReport(
                "top-level JSON must be an object".to_string(),
            ));
        }
        let report: ReportData = serde_json::from_value(value)?;
        if report.report_type.trim().is_empty() {
            return Err(ReportError::InvalidReport("missing report type".to_string()));
        }
        Ok(report)
    }

    pub fn is_tabular(&self) -> bool {
        matches!(self.data, ReportPayload::Tabular(_))
    }

    /// Rows of a tabular payload; empty for structured payloads.
    pub fn rows(&self) -> &[Row] {
        match &self.data {
            ReportPayload::Tabular(rows) => rows,
            _ => &[],
        }
    }

    /// The object of a structured payload.
    pub fn object(&self) -> Option<&Row> {
        match &self.data {
            ReportPayload::Structured(map) => Some(map),
            _ => None,
        }
    }

    /// Decode a structured payload into its typed form.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_value(self.data.to_value())
    }

    pub fn currency(&self) -> Option<&str> {
        self.metadata.currency.as_deref()
    }
}

/// Which side of the ledger an account normally carries its balance on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    /// Asset, expense.
    Debit,
    /// Liability, equity, revenue.
    Credit,
}

impl NormalBalance {
    pub fn from_account_type(account_type: &str) -> Self {
        let t = account_type.trim().to_lowercase();
        let credit_terms = ["liabilit", "equity", "revenue", "income", "capital", "payable"];
        if credit_terms.iter().any(|term| t.contains(term)) {
            Self::Credit
        } else {
            Self::Debit
        }
    }

    /// The balance as displayed: credit-normal accounts are sign-inverted.
    pub fn display_balance(self, stored: rust_decimal::Decimal) -> rust_decimal::Decimal {
        match self {
            Self::Debit => stored,
            Self::Credit => -stored,
        }
    }
}
