//! The cursor-based page layout state machine.
//!
//! The controller tracks a vertical write position on the current page.
//! Every `write_*` call either advances the cursor or starts a new page;
//! a new page always repaints the identity header, and a table row that
//! overflows also repaints its table header before it is drawn.

use tracing::debug;

use super::fonts::{fit, text_width, wrap};
use super::geometry::Geometry;
use super::page::{DrawOp, PageBuffer};
use crate::document::{Cell, Column, Document, KeyValue, Rgb, Section, SectionBody, SummaryCard, Table};
use crate::layout::{Align, FieldKind};

const CELL_PADDING: f32 = 4.0;
const CARDS_PER_ROW: usize = 3;
const CARD_HEIGHT: f32 = 44.0;
const CARD_GAP: f32 = 8.0;
const SECTION_GAP: f32 = 12.0;
const ACCENT_BAND: f32 = 6.0;
const KEY_VALUE_WIDTH: f32 = 300.0;
const MIN_FIGURE_SIZE: f32 = 5.0;

/// The identity block painted at a fixed offset on every page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHeader {
    pub title: String,
    pub organization: Option<String>,
    pub lines: Vec<String>,
    pub accent: Rgb,
    /// Drawn logo size, when a logo is available.
    pub logo: Option<(f32, f32)>,
}

impl PageHeader {
    pub fn for_document(document: &Document, logo: Option<(f32, f32)>) -> Self {
        Self {
            title: document.title.clone(),
            organization: document.identity.organization.clone(),
            lines: document.identity.detail_lines(),
            accent: document.accent,
            logo,
        }
    }

    fn text_lines(&self) -> usize {
        self.lines.len() + usize::from(self.organization.is_some())
    }

    /// Height from the top margin to the first body line.
    pub fn height(&self, g: &Geometry) -> f32 {
        let text = g.title_font_size * 1.25 + self.text_lines() as f32 * g.line_height();
        let logo = self.logo.map_or(0.0, |(_, h)| h);
        text.max(logo) + 16.0
    }

    fn draw(&self, page: &mut PageBuffer, g: &Geometry) {
        page.rect(0.0, 0.0, g.width, ACCENT_BAND, self.accent);

        let top = g.margin_top;
        let mut x = g.margin_left;
        if let Some((width, height)) = self.logo {
            page.ops.push(DrawOp::Logo {
                x,
                y: top,
                width,
                height,
            });
            x += width + 12.0;
        }
        let room = (g.right() - x).max(1.0);

        page.text(
            x,
            top + g.title_font_size,
            fit(&self.title, room, g.title_font_size, true),
            g.title_font_size,
            true,
            self.accent,
        );
        let mut line_top = top + g.title_font_size * 1.25;
        if let Some(org) = &self.organization {
            let size = g.font_size + 1.0;
            page.text(x, line_top + g.line_height() * 0.75, fit(org, room, size, true), size, true, Rgb::TEXT);
            line_top += g.line_height();
        }
        for line in &self.lines {
            page.text(
                x,
                line_top + g.line_height() * 0.75,
                fit(line, room, g.font_size, false),
                g.font_size,
                false,
                Rgb::MUTED,
            );
            line_top += g.line_height();
        }

        let rule_y = top + self.height(g) - 8.0;
        page.hline(g.margin_left, g.right(), rule_y, Rgb::RULE, 0.75);
    }
}

pub struct PaginationController {
    geometry: Geometry,
    header: PageHeader,
    pages: Vec<PageBuffer>,
    cursor_y: f32,
}

impl PaginationController {
    pub fn new(geometry: Geometry, header: PageHeader) -> Self {
        Self {
            geometry,
            header,
            pages: Vec::new(),
            cursor_y: 0.0,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// First body line below the identity header.
    pub fn body_top(&self) -> f32 {
        self.geometry.margin_top + self.header.height(&self.geometry)
    }

    /// Table rows that fit on one page below the identity header and a
    /// table header. Mirrors the overflow check of [`Self::write_row`].
    pub fn rows_per_page(&self) -> usize {
        let g = &self.geometry;
        let mut y = self.body_top() + g.header_row_height;
        let mut rows = 0;
        while y + g.row_height <= g.body_limit() {
            y += g.row_height;
            rows += 1;
        }
        rows.max(1)
    }

    fn start_page(&mut self) {
        let index = self.pages.len();
        let mut page = PageBuffer::new(index);
        self.header.draw(&mut page, &self.geometry);
        self.pages.push(page);
        self.cursor_y = self.body_top();
        debug!(page = index + 1, "started page");
    }

    fn page(&mut self) -> &mut PageBuffer {
        if self.pages.is_empty() {
            self.start_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn mark(&self) -> (usize, f32) {
        (self.pages.len(), self.cursor_y)
    }

    fn check_progress(&self, before: (usize, f32)) {
        debug_assert!(
            self.pages.len() > before.0 || self.cursor_y > before.1,
            "layout write neither advanced the cursor nor started a page"
        );
    }

    fn advance(&mut self, dy: f32) {
        debug_assert!(dy > 0.0);
        self.cursor_y += dy;
    }

    /// Start a new page if `height` does not fit below the cursor. A block
    /// at the top of a fresh page is placed even if it is taller than the page.
    fn ensure(&mut self, height: f32) {
        let fresh = self.cursor_y <= self.body_top();
        if self.pages.is_empty() || (!fresh && self.cursor_y + height > self.geometry.body_limit()) {
            self.start_page();
        }
    }

    /// Reserve `height` (breaking the page first if needed), draw into it and
    /// advance past it.
    pub fn block(&mut self, height: f32, draw: impl FnOnce(&mut PageBuffer, f32, &Geometry)) {
        let before = self.mark();
        self.ensure(height);
        let top = self.cursor_y;
        let geometry = self.geometry;
        draw(self.page(), top, &geometry);
        self.advance(height.max(f32::EPSILON));
        self.check_progress(before);
    }

    pub fn gap(&mut self, height: f32) {
        if !self.pages.is_empty() && height > 0.0 {
            self.advance(height);
        }
    }

    /// A bold title kept on the same page as the start of its content.
    pub fn write_section_title(&mut self, title: &str, accent: Rgb) {
        let before = self.mark();
        let g = self.geometry;
        let title_height = g.line_height() + 4.0;
        self.ensure(title_height + g.header_row_height + g.row_height);
        let y = self.cursor_y + g.line_height();
        let text = fit(title, g.content_width(), g.font_size + 2.0, true);
        self.page().text(g.margin_left, y, text, g.font_size + 2.0, true, accent);
        self.advance(title_height);
        self.check_progress(before);
    }

    pub fn write_table_header(&mut self, table: &Table, accent: Rgb) {
        let before = self.mark();
        let g = self.geometry;
        self.ensure(g.header_row_height + g.row_height);
        self.draw_table_header(table, accent);
        self.check_progress(before);
    }

    fn draw_table_header(&mut self, table: &Table, accent: Rgb) {
        let g = self.geometry;
        let y = self.cursor_y;
        let page = self.page();
        page.rect(g.margin_left, y, g.content_width(), g.header_row_height, accent);
        let labels: Vec<String> = table.columns.iter().map(|c| c.label.clone()).collect();
        draw_cells(page, &g, &table.columns, &labels, y, g.header_row_height, true, Rgb::WHITE);
        self.advance(g.header_row_height);
    }

    /// One body row. The overflow check runs before anything is drawn, so
    /// a row is never split across pages; zebra tint follows `row_index`
    /// across page breaks.
    pub fn write_row(&mut self, table: &Table, cells: &[Cell], row_index: usize, accent: Rgb) {
        let before = self.mark();
        let g = self.geometry;
        if self.pages.is_empty() || self.cursor_y + g.row_height > g.body_limit() {
            self.start_page();
            self.draw_table_header(table, accent);
            debug!(page = self.pages.len(), row_index, "table continued on new page");
        }
        let y = self.cursor_y;
        let page = self.page();
        if row_index % 2 == 1 {
            page.rect(g.margin_left, y, g.content_width(), g.row_height, accent.lighten(0.92));
        }
        let texts: Vec<String> = cells.iter().map(|c| c.display.clone()).collect();
        draw_cells(page, &g, &table.columns, &texts, y, g.row_height, false, Rgb::TEXT);
        page.body_rows += 1;
        self.advance(g.row_height);
        self.check_progress(before);
    }

    pub fn write_totals_row(&mut self, table: &Table, cells: &[Cell], accent: Rgb) {
        let before = self.mark();
        let g = self.geometry;
        if self.pages.is_empty() || self.cursor_y + g.row_height > g.body_limit() {
            self.start_page();
            self.draw_table_header(table, accent);
        }
        let y = self.cursor_y;
        let page = self.page();
        page.rect(g.margin_left, y, g.content_width(), g.row_height, accent.lighten(0.8));
        page.hline(g.margin_left, g.right(), y, accent, 1.0);
        let texts: Vec<String> = cells.iter().map(|c| c.display.clone()).collect();
        draw_cells(page, &g, &table.columns, &texts, y, g.row_height, true, Rgb::TEXT);
        self.advance(g.row_height);
        self.check_progress(before);
    }

    pub fn write_table(&mut self, table: &Table, accent: Rgb) {
        self.write_table_header(table, accent);
        for (i, row) in table.rows.iter().enumerate() {
            self.write_row(table, row, i, accent);
        }
        if let Some(totals) = &table.totals {
            self.write_totals_row(table, totals, accent);
        }
    }

    /// The one-line notice that replaces an empty section.
    pub fn write_notice(&mut self, message: &str) {
        let g = self.geometry;
        self.block(g.row_height, |page, y, g| {
            let text = fit(message, g.content_width(), g.font_size, false);
            page.text(g.margin_left + CELL_PADDING, y + baseline(g.row_height, g.font_size), text, g.font_size, false, Rgb::MUTED);
        });
    }

    /// Label/value rows in a block of bounded width, anchored left or right.
    pub fn write_key_values(&mut self, items: &[KeyValue], accent: Rgb, anchor_right: bool) {
        let g = self.geometry;
        let width = KEY_VALUE_WIDTH.min(g.content_width());
        let x = if anchor_right { g.right() - width } else { g.margin_left };
        for item in items {
            self.block(g.row_height, |page, y, g| {
                if item.emphasis {
                    page.rect(x, y, width, g.row_height, accent.lighten(0.85));
                }
                let text_y = y + baseline(g.row_height, g.font_size);
                let half = width / 2.0 - CELL_PADDING * 2.0;
                let label = fit(&item.label, half, g.font_size, item.emphasis);
                page.text(x + CELL_PADDING, text_y, label, g.font_size, item.emphasis, Rgb::MUTED);
                let value = fit(&item.value.display, half, g.font_size, true);
                let vw = text_width(&value, g.font_size, true);
                page.text(x + width - CELL_PADDING - vw, text_y, value, g.font_size, true, Rgb::TEXT);
                page.hline(x, x + width, y + g.row_height, Rgb::RULE, 0.3);
            });
        }
    }

    pub fn write_paragraph(&mut self, text: &str) {
        let g = self.geometry;
        for line in wrap(text, g.content_width(), g.font_size, false) {
            self.block(g.line_height(), |page, y, g| {
                page.text(g.margin_left, y + g.line_height() * 0.75, line, g.font_size, false, Rgb::TEXT);
            });
        }
    }

    /// The summary band: fixed-size cards, three per row.
    pub fn write_cards(&mut self, cards: &[SummaryCard], accent: Rgb) {
        let g = self.geometry;
        let per_row = CARDS_PER_ROW as f32;
        let width = (g.content_width() - CARD_GAP * (per_row - 1.0)) / per_row;
        for chunk in cards.chunks(CARDS_PER_ROW) {
            self.block(CARD_HEIGHT + CARD_GAP, |page, y, g| {
                for (i, card) in chunk.iter().enumerate() {
                    let x = g.margin_left + i as f32 * (width + CARD_GAP);
                    page.rect(x, y, width, CARD_HEIGHT, accent.lighten(0.9));
                    page.rect(x, y, 3.0, CARD_HEIGHT, accent);
                    let room = width - 20.0;
                    page.text(x + 10.0, y + 16.0, fit(&card.label, room, g.font_size, false), g.font_size, false, Rgb::MUTED);
                    let size = g.font_size + 4.0;
                    page.text(x + 10.0, y + 34.0, fit(&card.value.display, room, size, true), size, true, Rgb::TEXT);
                }
            });
        }
    }

    pub fn write_section(&mut self, section: &Section, accent: Rgb) {
        if let Some(title) = &section.title {
            self.write_section_title(title, accent);
        }
        match &section.body {
            SectionBody::Table(table) => self.write_table(table, accent),
            SectionBody::KeyValues(items) => self.write_key_values(items, accent, false),
            SectionBody::Notice(message) => self.write_notice(message),
            SectionBody::Paragraph(text) => self.write_paragraph(text),
        }
        self.gap(SECTION_GAP);
    }

    /// The laid-out pages; an empty document still has its first page.
    pub fn finish(mut self) -> Vec<PageBuffer> {
        if self.pages.is_empty() {
            self.start_page();
        }
        self.pages
    }
}

fn baseline(row_height: f32, size: f32) -> f32 {
    row_height / 2.0 + size * 0.35
}

/// Left edges of each column across the content width.
fn column_edges(g: &Geometry, columns: &[Column]) -> Vec<(f32, f32)> {
    let mut x = g.margin_left;
    columns
        .iter()
        .map(|c| {
            let width = c.width * g.content_width();
            let edge = (x, width);
            x += width;
            edge
        })
        .collect()
}

/// Figures shrink to fit their column; only below the minimum size are they clipped.
fn cell_font_size(column: &Column, text: &str, room: f32, size: f32, bold: bool) -> f32 {
    if !matches!(column.kind, FieldKind::Currency | FieldKind::Number | FieldKind::Percent) {
        return size;
    }
    let width = text_width(text, size, bold);
    if width <= room || width == 0.0 {
        size
    } else {
        (size * room / width).max(MIN_FIGURE_SIZE)
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_cells(
    page: &mut PageBuffer,
    g: &Geometry,
    columns: &[Column],
    texts: &[String],
    y: f32,
    height: f32,
    bold: bool,
    color: Rgb,
) {
    let text_y = y + baseline(height, g.font_size);
    for ((x, width), (column, text)) in column_edges(g, columns).into_iter().zip(columns.iter().zip(texts)) {
        let room = (width - CELL_PADDING * 2.0).max(0.0);
        let size = cell_font_size(column, text, room, g.font_size, bold);
        let text = fit(text, room, size, bold);
        let tw = text_width(&text, size, bold);
        let tx = match column.align {
            Align::Left => x + CELL_PADDING,
            Align::Center => x + (width - tw) / 2.0,
            Align::Right => x + width - CELL_PADDING - tw,
        };
        page.text(tx, text_y, text, size, bold, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Cell;
    use crate::format::Formatter;
    use crate::layout::{plan_fixed, FixedColumn};
    use rust_decimal::Decimal;

    fn header() -> PageHeader {
        PageHeader {
            title: "Expense Report".into(),
            organization: Some("Acme".into()),
            lines: vec!["Period: 01/01/2024 - 31/01/2024".into()],
            accent: Rgb::new(0x1F, 0x4E, 0x79),
            logo: None,
        }
    }

    fn table(rows: usize) -> Table {
        let fmt = Formatter::default();
        let plan = plan_fixed(
            &[FixedColumn::new("description", "Description", 2.0), FixedColumn::new("amount", "Amount", 1.0)],
            1.0,
        );
        let mut t = Table::from_plan(&plan);
        for i in 0..rows {
            t.push(vec![Cell::text(format!("Row {i}")), Cell::currency(Decimal::from(i), &fmt)]);
        }
        t
    }

    #[test]
    fn rows_break_onto_new_pages_with_repainted_headers() {
        let mut c = PaginationController::new(Geometry::default(), header());
        let per_page = c.rows_per_page();
        let t = table(per_page * 2 + 1);
        c.write_table(&t, Rgb::BLACK);
        let pages = c.finish();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].body_rows, per_page);
        assert_eq!(pages[1].body_rows, per_page);
        assert_eq!(pages[2].body_rows, 1);
        for page in &pages {
            assert!(page.contains_text("Expense Report"));
            assert!(page.contains_text("Description"));
        }
    }

    #[test]
    fn rows_never_cross_the_bottom_limit() {
        let g = Geometry::default();
        let mut c = PaginationController::new(g, header());
        c.write_table(&table(100), Rgb::BLACK);
        for page in c.finish() {
            for op in &page.ops {
                if let DrawOp::Rect { y, height, .. } = op {
                    assert!(y + height <= g.body_limit() + 1e-3);
                }
            }
        }
    }

    #[test]
    fn zebra_continues_across_pages() {
        let mut c = PaginationController::new(Geometry::default(), header());
        let per_page = c.rows_per_page();
        let first_row_top = c.body_top() + c.geometry().header_row_height;
        c.write_table(&table(per_page + 2), Rgb::BLACK);
        let pages = c.finish();
        let zebra = Rgb::BLACK.lighten(0.92);
        let tinted = pages[1].ops.iter().any(|op| {
            matches!(op, DrawOp::Rect { fill, y, .. } if *fill == zebra && (*y - first_row_top).abs() < 1e-3)
        });
        // Row `per_page` opens page 2; it is tinted exactly when its index is odd.
        assert_eq!(tinted, per_page % 2 == 1);
    }

    #[test]
    fn notice_replaces_table_and_advances() {
        let mut c = PaginationController::new(Geometry::default(), header());
        c.write_section(&Section::no_data("Sales"), Rgb::BLACK);
        let before = c.cursor_y();
        c.write_notice("No data available");
        assert!(c.cursor_y() > before);
        let pages = c.finish();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("No data available"));
        assert_eq!(pages[0].body_rows, 0);
    }

    #[test]
    fn empty_document_has_one_page() {
        let c = PaginationController::new(Geometry::default(), header());
        assert_eq!(c.finish().len(), 1);
    }
}
