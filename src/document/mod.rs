//! Format-neutral document model.
//!
//! Renderers turn a report into a [`Document`]; the print, spreadsheet and
//! CSV backends each consume the same document, so every figure is computed
//! and formatted exactly once.

mod cell;
mod color;
mod invoice;
mod pivot;
mod table;

pub use cell::{Cell, CellValue};
pub use color::Rgb;
pub use invoice::{InvoiceLayout, PartyBlock};
pub use pivot::{pivot_table, row_figures, PivotKind, AMOUNT_KEYS, DATE_KEYS, TOTAL_KEYS, VAT_KEYS};
pub use table::{Column, Table};

use serde::Serialize;

/// Shown in place of a section whose itemized data is empty or absent.
pub const NO_DATA: &str = "No data available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValue {
    pub label: String,
    pub value: Cell,
    /// Drawn bold (grand totals, net figures).
    pub emphasis: bool,
}

impl KeyValue {
    pub fn new(label: impl Into<String>, value: Cell) -> Self {
        Self {
            label: label.into(),
            value,
            emphasis: false,
        }
    }

    pub fn emphasized(mut self) -> Self {
        self.emphasis = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SectionBody {
    Table(Table),
    KeyValues(Vec<KeyValue>),
    Notice(String),
    Paragraph(String),
}

/// Which spreadsheet a section lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SheetPlacement {
    Summary,
    Own(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: Option<String>,
    pub body: SectionBody,
    pub placement: SheetPlacement,
    /// Breakdown sections that only the spreadsheet emits.
    pub sheet_only: bool,
}

impl Section {
    fn with_body(title: Option<String>, body: SectionBody) -> Self {
        Self {
            title,
            body,
            placement: SheetPlacement::Summary,
            sheet_only: false,
        }
    }

    /// A table section; a table without body rows becomes the no-data notice.
    pub fn table(title: impl Into<String>, table: Table) -> Self {
        let title = Some(title.into());
        if table.is_empty() {
            Self::with_body(title, SectionBody::Notice(NO_DATA.to_string()))
        } else {
            Self::with_body(title, SectionBody::Table(table))
        }
    }

    pub fn no_data(title: impl Into<String>) -> Self {
        Self::with_body(Some(title.into()), SectionBody::Notice(NO_DATA.to_string()))
    }

    pub fn notice(title: Option<String>, message: impl Into<String>) -> Self {
        Self::with_body(title, SectionBody::Notice(message.into()))
    }

    pub fn key_values(title: impl Into<String>, items: Vec<KeyValue>) -> Self {
        Self::with_body(Some(title.into()), SectionBody::KeyValues(items))
    }

    pub fn paragraph(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_body(Some(title.into()), SectionBody::Paragraph(text.into()))
    }

    pub fn on_sheet(mut self, name: impl Into<String>) -> Self {
        self.placement = SheetPlacement::Own(name.into());
        self
    }

    pub fn sheet_only(mut self) -> Self {
        self.sheet_only = true;
        self
    }

    pub fn as_table(&self) -> Option<&Table> {
        match &self.body {
            SectionBody::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self.body, SectionBody::Notice(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: Cell,
}

/// The identity block repeated at the top of every page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Identity {
    pub organization: Option<String>,
    /// Address, phone, email and website joined on one line.
    pub contact: Option<String>,
    pub tax_number: Option<String>,
    pub period: Option<String>,
    pub filters: Option<String>,
    pub generated: Option<String>,
}

impl Identity {
    /// Every present line below the title, in display order.
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(contact) = &self.contact {
            lines.push(contact.clone());
        }
        if let Some(trn) = &self.tax_number {
            lines.push(format!("TRN: {trn}"));
        }
        if let Some(period) = &self.period {
            lines.push(format!("Period: {period}"));
        }
        if let Some(filters) = &self.filters {
            lines.push(format!("Filters: {filters}"));
        }
        if let Some(generated) = &self.generated {
            lines.push(generated.clone());
        }
        lines
    }
}

/// Workbook/document properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Properties {
    pub title: String,
    pub company: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Canonical report type tag.
    pub report_type: String,
    pub title: String,
    pub accent: Rgb,
    pub currency: String,
    /// Decimal places of currency amounts.
    pub decimals: u32,
    pub identity: Identity,
    pub cards: Vec<SummaryCard>,
    pub sections: Vec<Section>,
    pub invoice: Option<InvoiceLayout>,
    pub properties: Properties,
}

impl Document {
    /// Sections the print and CSV backends emit.
    pub fn flow_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.sheet_only)
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.title.as_deref() == Some(title))
    }

    pub fn card(&self, label: &str) -> Option<&SummaryCard> {
        self.cards.iter().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Formatter;
    use crate::layout::{plan_fixed, FixedColumn};

    #[test]
    fn empty_table_becomes_notice() {
        let plan = plan_fixed(&[FixedColumn::new("amount", "Amount", 1.0)], 1.0);
        let section = Section::table("Sales", Table::from_plan(&plan));
        assert!(section.is_notice());
        assert_eq!(section.body, SectionBody::Notice(NO_DATA.to_string()));
        assert!(section.as_table().is_none());
    }

    #[test]
    fn non_empty_table_is_kept() {
        let fmt = Formatter::default();
        let plan = plan_fixed(&[FixedColumn::new("amount", "Amount", 1.0)], 1.0);
        let mut table = Table::from_plan(&plan);
        table.push(vec![Cell::currency(rust_decimal::Decimal::ONE, &fmt)]);
        let section = Section::table("Sales", table).on_sheet("Sales");
        assert!(section.as_table().is_some());
        assert_eq!(section.placement, SheetPlacement::Own("Sales".into()));
    }

    #[test]
    fn identity_lines_skip_missing_parts() {
        let identity = Identity {
            tax_number: Some("100".into()),
            period: Some("01/01/2024 - 31/01/2024".into()),
            ..Default::default()
        };
        assert_eq!(
            identity.detail_lines(),
            ["TRN: 100", "Period: 01/01/2024 - 31/01/2024"]
        );
    }
}
