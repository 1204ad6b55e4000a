use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

use super::plan::RowStyle;
use crate::config::SheetSettings;
use crate::document::{CellValue, Rgb};
use crate::layout::Align;

const DATE_FORMAT: &str = "dd/mm/yyyy";
const PERCENT_FORMAT: &str = "0.00\"%\"";
const NUMBER_FORMAT: &str = "#,##0.####";

fn color(rgb: Rgb) -> Color {
    Color::RGB(rgb.to_u32())
}

/// Number format for currency amounts, labelled with the report currency
/// the way the display strings are (`AED -100.00`).
pub fn currency_format(code: &str, decimals: u32) -> String {
    let fraction = if decimals == 0 {
        String::new()
    } else {
        format!(".{}", "0".repeat(decimals as usize))
    };
    let code = code.trim().replace('"', "");
    if code.is_empty() {
        format!("#,##0{fraction};-#,##0{fraction}")
    } else {
        format!("\"{code}\" #,##0{fraction};\"{code}\" -#,##0{fraction}")
    }
}

/// Cell formats for one workbook.
pub struct Styles {
    header: Rgb,
    zebra: Rgb,
    total: Rgb,
    highlight: Rgb,
    currency: String,
}

impl Styles {
    pub fn new(settings: &SheetSettings, currency: &str, decimals: u32) -> Self {
        Self {
            header: settings.header_rgb(),
            zebra: settings.zebra_rgb(),
            total: settings.total_rgb(),
            highlight: settings.highlight_rgb(),
            currency: currency_format(currency, decimals),
        }
    }

    pub fn currency_num_format(&self) -> &str {
        &self.currency
    }

    fn row_base(&self, style: RowStyle) -> Format {
        match style {
            RowStyle::Title => Format::new().set_bold().set_font_size(14).set_font_color(color(self.header)),
            RowStyle::Identity => Format::new().set_font_color(color(Rgb::MUTED)),
            RowStyle::SectionTitle => Format::new().set_bold().set_font_size(12).set_font_color(color(self.header)),
            RowStyle::Header => Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(color(self.header))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            RowStyle::Body | RowStyle::KeyValue => Format::new().set_border(FormatBorder::Thin),
            RowStyle::Zebra => Format::new()
                .set_border(FormatBorder::Thin)
                .set_background_color(color(self.zebra)),
            RowStyle::Totals | RowStyle::Emphasis => Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_background_color(color(self.total)),
            RowStyle::Notice => Format::new().set_italic().set_font_color(color(Rgb::MUTED)),
            RowStyle::Paragraph => Format::new().set_text_wrap(),
            RowStyle::Blank => Format::new(),
        }
    }

    /// The format of one cell: row style, then value number format, then
    /// column alignment.
    pub fn cell(&self, style: RowStyle, value: &CellValue, align: Align) -> Format {
        let mut format = self.row_base(style);
        format = match value {
            CellValue::Currency(_) => format.set_num_format(&self.currency),
            CellValue::Number(_) => format.set_num_format(NUMBER_FORMAT),
            CellValue::Percent(_) => format.set_num_format(PERCENT_FORMAT),
            CellValue::Date(_) => format.set_num_format(DATE_FORMAT),
            CellValue::Text(_) | CellValue::Empty => format,
        };
        if style == RowStyle::Header {
            return format;
        }
        match align {
            Align::Left => format.set_align(FormatAlign::Left),
            Align::Center => format.set_align(FormatAlign::Center),
            Align::Right => format.set_align(FormatAlign::Right),
        }
    }

    /// Fill applied to positive VAT cells.
    pub fn highlight(&self) -> Format {
        Format::new().set_background_color(color(self.highlight))
    }
}
