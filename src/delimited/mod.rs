//! The delimited-text backend: one forward pass over the document.
//!
//! Cells are written as their display strings, so currency and dates read
//! the same as in print. Quoting is the `csv` writer's: a field holding the
//! delimiter, a quote or a line break is wrapped in quotes with inner
//! quotes doubled.

use csv::{Terminator, Writer, WriterBuilder};
use tracing::debug;

use crate::config::CsvSettings;
use crate::document::{Document, Section, SectionBody, Table};
use crate::error::{ReportError, Result};

pub const SUMMARY_HEADING: &str = "SUMMARY";

struct CsvBuilder {
    writer: Writer<Vec<u8>>,
}

impl CsvBuilder {
    fn new(settings: &CsvSettings) -> Self {
        let writer = WriterBuilder::new()
            .flexible(true)
            .delimiter(settings.delimiter_byte())
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        Self { writer }
    }

    fn record<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        Ok(())
    }

    /// An empty record: just the terminator.
    fn blank(&mut self) -> Result<()> {
        self.record(None::<&[u8]>)
    }

    fn preamble(&mut self, document: &Document) -> Result<()> {
        self.record([document.title.as_str()])?;
        if let Some(org) = &document.identity.organization {
            self.record([org.as_str()])?;
        }
        for line in document.identity.detail_lines() {
            self.record([line])?;
        }
        self.blank()
    }

    fn summary(&mut self, document: &Document) -> Result<()> {
        if document.cards.is_empty() {
            return Ok(());
        }
        self.record([SUMMARY_HEADING])?;
        for card in &document.cards {
            self.record([card.label.as_str(), card.value.display.as_str()])?;
        }
        self.blank()
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        self.record(table.columns.iter().map(|c| c.label.as_str()))?;
        for row in &table.rows {
            self.record(row.iter().map(|c| c.display.as_str()))?;
        }
        if let Some(totals) = &table.totals {
            self.record(totals.iter().map(|c| c.display.as_str()))?;
        }
        Ok(())
    }

    fn section(&mut self, section: &Section) -> Result<()> {
        if let Some(title) = &section.title {
            self.record([title.as_str()])?;
        }
        match &section.body {
            SectionBody::Table(table) => self.table(table)?,
            SectionBody::KeyValues(items) => {
                for item in items {
                    self.record([item.label.as_str(), item.value.display.as_str()])?;
                }
            }
            SectionBody::Notice(message) => self.record([message.as_str()])?,
            SectionBody::Paragraph(text) => self.record([text.as_str()])?,
        }
        self.blank()
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}

/// Serialize the document as UTF-8 delimited text with `\n` line endings.
pub fn render(document: &Document, settings: &CsvSettings) -> Result<Vec<u8>> {
    let mut builder = CsvBuilder::new(settings);
    builder.preamble(document)?;
    builder.summary(document)?;
    for section in document.flow_sections() {
        builder.section(section)?;
    }
    let bytes = builder.finish()?;
    debug!(bytes = bytes.len(), "wrote delimited text");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Identity, KeyValue, Properties, Rgb, SummaryCard, NO_DATA};
    use crate::format::Formatter;
    use crate::layout::{plan_fixed, FixedColumn};
    use rust_decimal_macros::dec;

    fn document(sections: Vec<Section>) -> Document {
        let fmt = Formatter::default();
        Document {
            report_type: "sales".into(),
            title: "Sales Report".into(),
            accent: Rgb::BLACK,
            currency: "AED".into(),
            decimals: 2,
            identity: Identity {
                organization: Some("Acme".into()),
                ..Default::default()
            },
            cards: vec![SummaryCard {
                label: "Total Amount".into(),
                value: Cell::currency(dec!(1200), &fmt),
            }],
            sections,
            invoice: None,
            properties: Properties::default(),
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn quotes_fields_with_commas_and_quotes() {
        let fmt = Formatter::default();
        let plan = plan_fixed(
            &[FixedColumn::new("description", "Description", 2.0), FixedColumn::new("amount", "Amount", 1.0)],
            1.0,
        );
        let mut table = Table::from_plan(&plan);
        table.push(vec![Cell::text("Invoice, \"ACME\" Corp"), Cell::currency(dec!(1200), &fmt)]);
        let doc = document(vec![Section::table("Sales", table.with_totals("Total", &fmt))]);
        let out = text(render(&doc, &CsvSettings::default()).unwrap());
        assert!(out.contains("\"Invoice, \"\"ACME\"\" Corp\",\"AED 1,200.00\"\n"));
        assert!(out.contains("Total,\"AED 1,200.00\"\n"));
        assert!(!out.contains('\r'));
    }

    #[test]
    fn preamble_then_summary_then_sections() {
        let doc = document(vec![
            Section::no_data("Purchases"),
            Section::key_values("Totals", vec![KeyValue::new("Net", Cell::text("5"))]),
        ]);
        let out = text(render(&doc, &CsvSettings::default()).unwrap());
        assert!(out.starts_with("Sales Report\nAcme\n\nSUMMARY\nTotal Amount,\"AED 1,200.00\"\n\nPurchases\n"));
        assert!(out.ends_with("Net,5\n\n"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Sales Report");
        assert_eq!(lines[1], "Acme");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], SUMMARY_HEADING);
        assert_eq!(lines[4], "Total Amount,\"AED 1,200.00\"");
        assert!(lines.contains(&"Purchases"));
        assert!(lines.contains(&NO_DATA));
        assert!(lines.contains(&"Net,5"));
    }

    #[test]
    fn honours_the_delimiter() {
        let doc = document(Vec::new());
        let out = text(render(&doc, &CsvSettings { delimiter: ';' }).unwrap());
        assert!(out.contains("Total Amount;AED 1,200.00\n"));
    }

    #[test]
    fn sheet_only_sections_are_skipped() {
        let doc = document(vec![Section::no_data("By Category").on_sheet("Category Summary").sheet_only()]);
        let out = text(render(&doc, &CsvSettings::default()).unwrap());
        assert!(!out.contains("By Category"));
    }
}
