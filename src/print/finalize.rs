//! Second pass over the laid-out pages: footers, then PDF emission.
//!
//! "Page i of N" needs the final page count, so footers are stamped only
//! after layout has finished.

use std::io::BufWriter;

use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Pt, Rect, Rgb as PdfRgb,
};
use tracing::debug;

use super::fonts::{fit, text_width};
use super::geometry::Geometry;
use super::page::{DrawOp, PageBuffer};
use crate::document::Rgb;
use crate::error::{ReportError, Result};
use crate::logo::LogoImage;

/// Stamp the footer on every page, at a position independent of the cursor.
pub fn stamp_footers(pages: &mut [PageBuffer], g: &Geometry, title: &str) {
    let total = pages.len();
    let size = (g.font_size - 1.0).max(4.0);
    for page in pages.iter_mut() {
        let label = format!("Page {} of {total}", page.index + 1);
        let label_width = text_width(&label, size, false);
        let rule_y = g.body_limit() + g.bottom_margin / 4.0;
        page.hline(g.margin_left, g.right(), rule_y, Rgb::RULE, 0.5);
        page.text(g.right() - label_width, g.footer_baseline(), label, size, false, Rgb::MUTED);
        let room = (g.content_width() - label_width - 12.0).max(0.0);
        page.text(g.margin_left, g.footer_baseline(), fit(title, room, size, false), size, false, Rgb::MUTED);
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn color(c: Rgb) -> Color {
    let (r, g, b) = c.unit();
    Color::Rgb(PdfRgb::new(r, g, b, None))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Serialize buffered pages into PDF bytes.
pub fn emit(pages: &[PageBuffer], g: &Geometry, title: &str, logo: Option<&LogoImage>) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(title, mm(g.width), mm(g.height), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?,
    };

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(mm(g.width), mm(g.height), "Layer 1");
            doc.get_page(p).get_layer(l)
        };
        for op in &page.ops {
            draw(&layer, op, g, &fonts, logo);
        }
    }
    debug!(pages = pages.len(), "emitting print document");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
    buf.into_inner().map_err(|e| ReportError::Pdf(e.to_string()))
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, g: &Geometry, fonts: &Fonts, logo: Option<&LogoImage>) {
    let flip = |y: f32| g.height - y;
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            size,
            bold,
            color: c,
        } => {
            layer.set_fill_color(color(*c));
            let font = if *bold { &fonts.bold } else { &fonts.regular };
            layer.use_text(text.as_str(), *size, mm(*x), mm(flip(*y)), font);
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            layer.set_fill_color(color(*fill));
            layer.add_rect(Rect::new(mm(*x), mm(flip(y + height)), mm(x + width), mm(flip(*y))));
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color: c,
            thickness,
        } => {
            layer.set_outline_color(color(*c));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(mm(*x1), mm(flip(*y1))), false),
                    (Point::new(mm(*x2), mm(flip(*y2))), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Logo {
            x,
            y,
            width,
            height,
        } => {
            let Some(logo) = logo else {
                return;
            };
            let (px_w, px_h) = logo.image.dimensions();
            let (px_w, px_h) = (px_w as f32, px_h as f32);
            Image::from_dynamic_image(&logo.image).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(mm(*x)),
                    translate_y: Some(mm(flip(y + height))),
                    // At 72 dpi one pixel is one point.
                    scale_x: Some(width / px_w),
                    scale_y: Some(height / px_h),
                    dpi: Some(72.0),
                    ..Default::default()
                },
            );
        }
    }
}
