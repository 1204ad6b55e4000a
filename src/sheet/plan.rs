//! The workbook as plain data: sheets, styled rows and highlight ranges.
//!
//! Planning is kept apart from writing so the sheet layout can be checked
//! without reading an `.xlsx` back.

use tracing::debug;

use super::names::SheetNames;
use crate::config::SheetSettings;
use crate::document::{Cell, Document, KeyValue, Section, SectionBody, SheetPlacement, Table};
use crate::layout::{Align, FieldKind};

pub const SUMMARY_SHEET: &str = "Summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Title,
    Identity,
    SectionTitle,
    Header,
    Body,
    /// Alternating body row.
    Zebra,
    Totals,
    KeyValue,
    /// Grand totals and net figures in a key-value block.
    Emphasis,
    Notice,
    Paragraph,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub cell: Cell,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub style: RowStyle,
    pub cells: Vec<PlannedCell>,
}

impl SheetRow {
    fn text(style: RowStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            cells: vec![PlannedCell {
                cell: Cell::text(text),
                align: Align::Left,
            }],
        }
    }

    fn blank() -> Self {
        Self {
            style: RowStyle::Blank,
            cells: Vec::new(),
        }
    }

    /// Display strings, for tests and width estimates.
    pub fn displays(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.cell.display.as_str()).collect()
    }
}

/// A column range of data rows to highlight when positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub column: u16,
    pub first_row: u32,
    pub last_row: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub name: String,
    pub rows: Vec<SheetRow>,
    pub widths: Vec<f64>,
    /// Rows above this index stay frozen.
    pub freeze_below: Option<u32>,
    pub highlights: Vec<Highlight>,
}

impl SheetPlan {
    fn new(name: String) -> Self {
        Self {
            name,
            rows: Vec::new(),
            widths: Vec::new(),
            freeze_below: None,
            highlights: Vec::new(),
        }
    }

    fn next_row(&self) -> u32 {
        self.rows.len() as u32
    }

    fn push(&mut self, row: SheetRow) {
        self.rows.push(row);
    }

    fn identity(&mut self, document: &Document) {
        self.push(SheetRow::text(RowStyle::Title, &document.title));
        if let Some(org) = &document.identity.organization {
            self.push(SheetRow::text(RowStyle::Identity, org));
        }
        for line in document.identity.detail_lines() {
            self.push(SheetRow::text(RowStyle::Identity, line));
        }
        self.push(SheetRow::blank());
    }

    fn key_values(&mut self, items: &[KeyValue]) {
        for item in items {
            let style = if item.emphasis { RowStyle::Emphasis } else { RowStyle::KeyValue };
            self.push(SheetRow {
                style,
                cells: vec![
                    PlannedCell {
                        cell: Cell::text(&item.label),
                        align: Align::Left,
                    },
                    PlannedCell {
                        cell: item.value.clone(),
                        align: Align::Right,
                    },
                ],
            });
        }
    }

    fn table(&mut self, table: &Table) {
        if self.freeze_below.is_none() {
            self.freeze_below = Some(self.next_row() + 1);
        }
        self.push(SheetRow {
            style: RowStyle::Header,
            cells: table
                .columns
                .iter()
                .map(|c| PlannedCell {
                    cell: Cell::text(&c.label),
                    align: Align::Center,
                })
                .collect(),
        });

        let first_body = self.next_row();
        for (i, row) in table.rows.iter().enumerate() {
            let style = if i % 2 == 1 { RowStyle::Zebra } else { RowStyle::Body };
            self.push(planned_row(style, table, row));
        }
        if !table.rows.is_empty() {
            let last_body = self.next_row() - 1;
            for (i, column) in table.columns.iter().enumerate() {
                if column.kind == FieldKind::Currency && column.key.to_lowercase().contains("vat") {
                    self.highlights.push(Highlight {
                        column: i as u16,
                        first_row: first_body,
                        last_row: last_body,
                    });
                }
            }
        }

        if let Some(totals) = &table.totals {
            self.push(planned_row(RowStyle::Totals, table, totals));
        }
    }

    fn section(&mut self, section: &Section) {
        if let Some(title) = &section.title {
            self.push(SheetRow::text(RowStyle::SectionTitle, title));
        }
        match &section.body {
            SectionBody::Table(table) => self.table(table),
            SectionBody::KeyValues(items) => self.key_values(items),
            SectionBody::Notice(message) => self.push(SheetRow::text(RowStyle::Notice, message)),
            SectionBody::Paragraph(text) => self.push(SheetRow::text(RowStyle::Paragraph, text)),
        }
        self.push(SheetRow::blank());
    }

    /// Widths from the longest display per column, bounded by settings.
    /// Free-text rows spanning the sheet do not widen the first column.
    fn size_columns(&mut self, settings: &SheetSettings) {
        let mut widths: Vec<f64> = Vec::new();
        for row in &self.rows {
            if matches!(
                row.style,
                RowStyle::Title | RowStyle::Identity | RowStyle::SectionTitle | RowStyle::Notice | RowStyle::Paragraph
            ) {
                continue;
            }
            for (i, cell) in row.cells.iter().enumerate() {
                let chars = cell.cell.display.chars().count() as f64 + 2.0;
                if widths.len() <= i {
                    widths.resize(i + 1, settings.column_width);
                }
                widths[i] = widths[i].max(chars);
            }
        }
        self.widths = widths
            .into_iter()
            .map(|w| w.clamp(settings.column_width, settings.max_column_width.max(settings.column_width)))
            .collect();
    }
}

fn planned_row(style: RowStyle, table: &Table, cells: &[Cell]) -> SheetRow {
    SheetRow {
        style,
        cells: table
            .columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| PlannedCell {
                cell: cell.clone(),
                align: column.align,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookPlan {
    pub sheets: Vec<SheetPlan>,
}

impl WorkbookPlan {
    pub fn sheet(&self, name: &str) -> Option<&SheetPlan> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Summary sheet first (identity, cards, summary-placed sections), then one
/// sheet per distinct placement name in order of first appearance.
pub fn plan_workbook(document: &Document, settings: &SheetSettings) -> WorkbookPlan {
    let mut names = SheetNames::new();
    let mut summary = SheetPlan::new(names.claim(SUMMARY_SHEET));
    summary.identity(document);
    if !document.cards.is_empty() {
        summary.push(SheetRow::text(RowStyle::SectionTitle, "Summary"));
        let cards: Vec<KeyValue> = document
            .cards
            .iter()
            .map(|c| KeyValue::new(&c.label, c.value.clone()))
            .collect();
        summary.key_values(&cards);
        summary.push(SheetRow::blank());
    }

    let mut own: Vec<(String, SheetPlan)> = Vec::new();
    for section in &document.sections {
        match &section.placement {
            SheetPlacement::Summary => summary.section(section),
            SheetPlacement::Own(placement) => {
                let index = match own.iter().position(|(p, _)| p == placement) {
                    Some(i) => i,
                    None => {
                        let mut sheet = SheetPlan::new(names.claim(placement));
                        sheet.identity(document);
                        own.push((placement.clone(), sheet));
                        own.len() - 1
                    }
                };
                own[index].1.section(section);
            }
        }
    }

    let mut sheets = vec![summary];
    sheets.extend(own.into_iter().map(|(_, sheet)| sheet));
    for sheet in &mut sheets {
        sheet.size_columns(settings);
    }
    debug!(sheets = sheets.len(), "planned workbook");
    WorkbookPlan { sheets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Identity, Properties, Rgb, SummaryCard};
    use crate::format::Formatter;
    use crate::layout::{plan_fixed, FixedColumn};
    use rust_decimal_macros::dec;

    fn document(sections: Vec<Section>) -> Document {
        let fmt = Formatter::default();
        Document {
            report_type: "vat".into(),
            title: "VAT Return".into(),
            accent: Rgb::BLACK,
            currency: "AED".into(),
            decimals: 2,
            identity: Identity {
                organization: Some("Acme".into()),
                ..Default::default()
            },
            cards: vec![SummaryCard {
                label: "Net VAT".into(),
                value: Cell::currency(dec!(25), &fmt),
            }],
            sections,
            invoice: None,
            properties: Properties::default(),
        }
    }

    fn sales() -> Table {
        let fmt = Formatter::default();
        let plan = plan_fixed(
            &[
                FixedColumn::new("invoiceNumber", "Invoice", 1.0),
                FixedColumn::new("amount", "Amount", 1.0),
                FixedColumn::new("vatAmount", "VAT", 1.0),
            ],
            1.0,
        );
        let mut table = Table::from_plan(&plan);
        for (n, amount, vat) in [("INV-1", dec!(100), dec!(5)), ("INV-2", dec!(200), dec!(10)), ("INV-3", dec!(50), dec!(0))] {
            table.push(vec![Cell::text(n), Cell::currency(amount, &fmt), Cell::currency(vat, &fmt)]);
        }
        table.with_totals("Total", &fmt)
    }

    #[test]
    fn own_placements_get_their_own_sheets() {
        let doc = document(vec![
            Section::table("Sales", sales()).on_sheet("Sales"),
            Section::no_data("Purchases").on_sheet("Purchases"),
        ]);
        let plan = plan_workbook(&doc, &SheetSettings::default());
        assert_eq!(plan.names(), ["Summary", "Sales", "Purchases"]);

        let purchases = plan.sheet("Purchases").unwrap();
        assert!(purchases.rows.iter().any(|r| r.style == RowStyle::Notice));
        assert!(!purchases.rows.iter().any(|r| r.style == RowStyle::Header));
    }

    #[test]
    fn vat_highlight_covers_data_rows_only() {
        let doc = document(vec![Section::table("Sales", sales())]);
        let plan = plan_workbook(&doc, &SheetSettings::default());
        let summary = plan.sheet("Summary").unwrap();
        assert_eq!(summary.highlights.len(), 1);
        let h = summary.highlights[0];
        assert_eq!(h.column, 2);
        assert_eq!(summary.rows[h.first_row as usize].style, RowStyle::Body);
        assert_eq!(summary.rows[h.last_row as usize].style, RowStyle::Body);
        assert_eq!(summary.rows[h.last_row as usize + 1].style, RowStyle::Totals);
        assert_eq!(summary.rows[h.first_row as usize - 1].style, RowStyle::Header);
    }

    #[test]
    fn header_of_first_table_is_frozen() {
        let doc = document(vec![Section::table("Sales", sales())]);
        let plan = plan_workbook(&doc, &SheetSettings::default());
        let summary = plan.sheet("Summary").unwrap();
        let freeze = summary.freeze_below.unwrap() as usize;
        assert_eq!(summary.rows[freeze - 1].style, RowStyle::Header);
    }

    #[test]
    fn zebra_alternates_and_totals_keep_display() {
        let doc = document(vec![Section::table("Sales", sales())]);
        let plan = plan_workbook(&doc, &SheetSettings::default());
        let styles: Vec<RowStyle> = plan.sheets[0]
            .rows
            .iter()
            .map(|r| r.style)
            .filter(|s| matches!(s, RowStyle::Body | RowStyle::Zebra | RowStyle::Totals))
            .collect();
        assert_eq!(styles, [RowStyle::Body, RowStyle::Zebra, RowStyle::Body, RowStyle::Totals]);
        let totals = plan.sheets[0].rows.iter().find(|r| r.style == RowStyle::Totals).unwrap();
        assert_eq!(totals.displays(), ["Total", "AED 350.00", "AED 15.00"]);
    }

    #[test]
    fn clashing_placements_are_renamed() {
        let doc = document(vec![
            Section::no_data("A").on_sheet("Cash/Bank"),
            Section::no_data("B").on_sheet("Cash:Bank"),
        ]);
        let plan = plan_workbook(&doc, &SheetSettings::default());
        assert_eq!(plan.names(), ["Summary", "CashBank", "CashBank (2)"]);
    }
}
