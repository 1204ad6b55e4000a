//! Fallbacks for report types without a dedicated renderer.

use serde_json::{Map, Value};

use super::descriptor::{ReportTypeDescriptor, GENERIC_OBJECT, GENERIC_TABULAR};
use super::tabular::list_figures;
use super::{Figures, RenderContext, ReportRenderer};
use crate::document::{Cell, KeyValue, Section};
use crate::format::prettify;
use crate::layout::semantics;
use crate::model::lenient;

/// Any array of rows: every field as a column.
pub struct GenericTabularRenderer;

impl ReportRenderer for GenericTabularRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &GENERIC_TABULAR
    }

    fn figures(&self, ctx: &mut RenderContext<'_>) -> Figures {
        list_figures(ctx.rows())
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        vec![ctx.rows_section("Details", Some(ctx.rows()))]
    }
}

/// Any object: scalars as a key-value block, arrays of objects as tables on
/// their own sheets, nested objects as titled sub-sections.
pub struct GenericObjectRenderer;

impl ReportRenderer for GenericObjectRenderer {
    fn descriptor(&self) -> &ReportTypeDescriptor {
        &GENERIC_OBJECT
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section> {
        let Some(object) = ctx.report.object() else {
            return vec![Section::no_data("Details")];
        };
        let mut sections = Vec::new();
        object_sections(ctx, "Details", None, object, &mut sections);
        if sections.is_empty() {
            sections.push(Section::no_data("Details"));
        }
        sections
    }
}

fn scalar_cell(key: &str, value: &Value, ctx: &RenderContext<'_>) -> Cell {
    Cell::from_value(Some(value), semantics(key).kind, &ctx.fmt)
}

/// `parent` prefixes nested titles so sibling objects stay distinguishable.
fn object_sections(
    ctx: &RenderContext<'_>,
    title: &str,
    parent: Option<&str>,
    object: &Map<String, Value>,
    out: &mut Vec<Section>,
) {
    let scalars: Vec<KeyValue> = object
        .iter()
        .filter(|(_, v)| !v.is_array() && !v.is_object())
        .map(|(k, v)| KeyValue::new(prettify(k), scalar_cell(k, v, ctx)))
        .collect();
    if !scalars.is_empty() {
        out.push(Section::key_values(title, scalars));
    }

    for (key, value) in object {
        let name = match parent {
            Some(p) => format!("{p} - {}", prettify(key)),
            None => prettify(key),
        };
        match value {
            Value::Array(items) if items.is_empty() => {
                out.push(Section::no_data(name.clone()).on_sheet(name));
            }
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let rows = lenient::rows(value.clone()).unwrap_or_default();
                out.push(ctx.rows_section(&name, Some(&rows)).on_sheet(name));
            }
            Value::Array(items) => {
                let text: Vec<String> = items.iter().filter_map(lenient::text).collect();
                out.push(Section::paragraph(name, text.join(", ")));
            }
            Value::Object(nested) => object_sections(ctx, &name, Some(&name), nested, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{SectionBody, SheetPlacement};
    use crate::format::Formatter;
    use crate::model::ReportData;
    use serde_json::json;

    #[test]
    fn object_payload_becomes_sections() {
        let r = ReportData::from_value(json!({
            "type": "cash_flow",
            "data": {
                "openingBalance": 1000,
                "period": "Q1",
                "inflows": [{"source": "Sales", "amount": 700}],
                "outflows": [],
                "tags": ["audited", "final"],
                "financing": {"loans": 200}
            }
        }))
        .unwrap();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = GenericObjectRenderer.render_sections(&mut ctx);
        let titles: Vec<_> = sections.iter().filter_map(|s| s.title.as_deref()).collect();
        assert_eq!(titles, ["Details", "Inflows", "Outflows", "Tags", "Financing"]);

        let SectionBody::KeyValues(details) = &sections[0].body else {
            panic!("expected key values");
        };
        assert_eq!(details[0].label, "Opening Balance");
        assert_eq!(details[0].value.display, "AED 1,000.00");
        assert_eq!(details[1].value.display, "Q1");

        assert_eq!(sections[1].placement, SheetPlacement::Own("Inflows".into()));
        assert!(sections[2].is_notice());
        assert_eq!(sections[3].body, SectionBody::Paragraph("audited, final".into()));
    }

    #[test]
    fn money_scalars_are_currency() {
        let r = ReportData::from_value(json!({"type": "x", "data": {"totalAmount": 5}})).unwrap();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = GenericObjectRenderer.render_sections(&mut ctx);
        let SectionBody::KeyValues(items) = &sections[0].body else {
            panic!("expected key values");
        };
        assert_eq!(items[0].value.display, "AED 5.00");
    }

    #[test]
    fn empty_object_is_a_notice() {
        let r = ReportData::from_value(json!({"type": "x", "data": {}})).unwrap();
        let mut ctx = RenderContext::new(&r, Formatter::default());
        let sections = GenericObjectRenderer.render_sections(&mut ctx);
        assert!(sections[0].is_notice());
    }
}
