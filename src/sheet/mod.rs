//! The multi-sheet spreadsheet backend.
//!
//! [`plan_workbook`] lays the document out as plain rows; [`render`] writes
//! that plan with `rust_xlsxwriter`.

mod names;
mod plan;
mod styles;

pub use names::{sanitize, SheetNames, MAX_SHEET_NAME};
pub use plan::{plan_workbook, Highlight, PlannedCell, RowStyle, SheetPlan, SheetRow, WorkbookPlan, SUMMARY_SHEET};
pub use styles::{currency_format, Styles};

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    ConditionalFormatCell, ConditionalFormatCellRule, DocProperties, ExcelDateTime, Workbook, Worksheet,
};
use tracing::debug;

use crate::config::SheetSettings;
use crate::document::{CellValue, Document};
use crate::error::Result;

pub struct SheetOutput {
    pub bytes: Vec<u8>,
    pub sheets: Vec<String>,
}

pub fn render(document: &Document, settings: &SheetSettings) -> Result<SheetOutput> {
    let plan = plan_workbook(document, settings);
    let styles = Styles::new(settings, &document.currency, document.decimals);

    let mut workbook = Workbook::new();
    let mut properties = DocProperties::new().set_title(&document.properties.title);
    if let Some(company) = &document.properties.company {
        properties = properties.set_company(company);
    }
    if let Some(author) = &document.properties.author {
        properties = properties.set_author(author);
    }
    workbook.set_properties(&properties);

    for sheet in &plan.sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, sheet, &styles)?;
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(sheets = plan.sheets.len(), bytes = bytes.len(), "wrote workbook");
    Ok(SheetOutput {
        bytes,
        sheets: plan.sheets.into_iter().map(|s| s.name).collect(),
    })
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetPlan, styles: &Styles) -> Result<()> {
    worksheet.set_name(&sheet.name)?;
    for (col, width) in sheet.widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    for (r, row) in sheet.rows.iter().enumerate() {
        let r = r as u32;
        for (c, planned) in row.cells.iter().enumerate() {
            let c = c as u16;
            let format = styles.cell(row.style, &planned.cell.value, planned.align);
            match &planned.cell.value {
                CellValue::Currency(v) | CellValue::Number(v) | CellValue::Percent(v) => match v.to_f64() {
                    Some(n) => worksheet.write_number_with_format(r, c, n, &format)?,
                    None => worksheet.write_string_with_format(r, c, &planned.cell.display, &format)?,
                },
                CellValue::Date(d) => match excel_date(*d) {
                    Some(dt) => worksheet.write_datetime_with_format(r, c, &dt, &format)?,
                    None => worksheet.write_string_with_format(r, c, &planned.cell.display, &format)?,
                },
                CellValue::Text(_) => worksheet.write_string_with_format(r, c, &planned.cell.display, &format)?,
                CellValue::Empty => worksheet.write_blank(r, c, &format)?,
            };
        }
    }

    if let Some(row) = sheet.freeze_below {
        worksheet.set_freeze_panes(row, 0)?;
    }

    let highlight = styles.highlight();
    for h in &sheet.highlights {
        let rule = ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::GreaterThan(0))
            .set_format(&highlight);
        worksheet.add_conditional_format(h.first_row, h.column, h.last_row, h.column, &rule)?;
    }
    Ok(())
}

fn excel_date(date: chrono::NaiveDate) -> Option<ExcelDateTime> {
    use chrono::Datelike;
    let year = u16::try_from(date.year()).ok()?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}
