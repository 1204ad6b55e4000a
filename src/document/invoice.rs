use serde::Serialize;

use super::color::Rgb;
use super::table::Table;
use super::KeyValue;

/// A name with its address and contact lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartyBlock {
    pub heading: String,
    pub name: Option<String>,
    pub lines: Vec<String>,
}

impl PartyBlock {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.lines.is_empty()
    }
}

/// The fixed single-page regions of a tax invoice, drawn by the print
/// backend instead of the generic section flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLayout {
    pub heading: String,
    pub accent: Rgb,
    /// Invoice number, dates, status and reference, in display order.
    pub details: Vec<KeyValue>,
    pub company: PartyBlock,
    pub customer: PartyBlock,
    pub items: Table,
    /// Subtotal through balance due; the emphasized entry is the grand total.
    pub totals: Vec<KeyValue>,
    pub amount_in_words: Option<String>,
    pub notes: Option<String>,
    pub payment_terms: Option<String>,
    pub terms_and_conditions: Option<String>,
}
