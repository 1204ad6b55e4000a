//! The paginated print backend.
//!
//! Rendering is two-phase: [`layout`] walks the document through the
//! [`PaginationController`] into buffered pages (footers stamped once the
//! page count is known), then [`finalize::emit`] serializes them.

mod controller;
mod finalize;
mod fonts;
mod geometry;
mod invoice;
mod page;

pub use controller::{PageHeader, PaginationController};
pub use fonts::{fit, text_width, wrap};
pub use geometry::Geometry;
pub use page::{DrawOp, PageBuffer};

use tracing::debug;

use crate::config::LayoutSettings;
use crate::document::Document;
use crate::error::Result;
use crate::logo::LogoImage;

pub struct PrintOutput {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

fn controller(document: &Document, settings: &LayoutSettings, logo: Option<(f32, f32)>) -> PaginationController {
    let geometry = Geometry::from_settings(settings);
    let header = match &document.invoice {
        Some(inv) => invoice::header(inv, logo),
        None => PageHeader::for_document(document, logo),
    };
    PaginationController::new(geometry, header)
}

/// Table body rows that fit on a continuation page of this document.
pub fn rows_per_page(document: &Document, settings: &LayoutSettings, logo: Option<(f32, f32)>) -> usize {
    controller(document, settings, logo).rows_per_page()
}

/// Lay the document out into finished pages, footers included.
pub fn layout(document: &Document, settings: &LayoutSettings, logo: Option<(f32, f32)>) -> Vec<PageBuffer> {
    let mut c = controller(document, settings, logo);
    let geometry = *c.geometry();

    match &document.invoice {
        Some(inv) => invoice::layout(&mut c, inv),
        None => {
            if !document.cards.is_empty() {
                c.write_cards(&document.cards, document.accent);
                c.gap(4.0);
            }
            for section in document.flow_sections() {
                c.write_section(section, document.accent);
            }
        }
    }

    let mut pages = c.finish();
    finalize::stamp_footers(&mut pages, &geometry, &document.title);
    debug!(report_type = %document.report_type, pages = pages.len(), "laid out print document");
    pages
}

pub fn render(document: &Document, settings: &LayoutSettings, logo: Option<&LogoImage>) -> Result<PrintOutput> {
    let pages = layout(document, settings, logo.map(LogoImage::size));
    let geometry = Geometry::from_settings(settings);
    let bytes = finalize::emit(&pages, &geometry, &document.title, logo)?;
    Ok(PrintOutput {
        bytes,
        pages: pages.len(),
    })
}
