//! Per-report-type renderers and the registry that dispatches to them.
//!
//! Each strategy turns one report type into the format-neutral
//! [`Document`]: a summary band of cards plus itemized sections. New report
//! types are added by registering another [`ReportRenderer`].

mod aging;
mod balance_sheet;
pub mod descriptor;
mod generic;
mod invoice;
mod ledger;
mod profit_loss;
mod reconciliation;
mod stock;
pub mod summary;
mod tabular;
mod trial_balance;
mod vat;

pub use descriptor::{normalize_tag, CardSpec, ReportTypeDescriptor, Shape};
pub use summary::{Figure, Figures};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::document::{
    Document, Identity, InvoiceLayout, Properties, Section, SummaryCard, Table,
};
use crate::format::{describe_filters, prettify, Formatter};
use crate::layout::plan_columns;
use crate::model::{ReportData, ReportPayload, Row};

/// Everything a renderer needs while building one document.
pub struct RenderContext<'a> {
    pub report: &'a ReportData,
    pub fmt: Formatter,
    /// Canonical tag of the renderer handling this report.
    pub tag: String,
    /// Set by renderers whose payload carries an as-of date.
    pub as_of: Option<String>,
    warnings: Vec<String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(report: &'a ReportData, fmt: Formatter) -> Self {
        Self {
            report,
            fmt,
            tag: normalize_tag(&report.report_type),
            as_of: None,
            warnings: Vec::new(),
        }
    }

    /// Record a degradation: logged and returned to the caller. Repeats of
    /// the same message are recorded once.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if self.warnings.contains(&message) {
            return;
        }
        warn!(report_type = %self.report.report_type, "{message}");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    pub fn rows(&self) -> &'a [Row] {
        self.report.rows()
    }

    /// Decode the structured payload. A missing payload decodes to the
    /// default; an undecodable one is a warning and also the default.
    pub fn decode<T: DeserializeOwned + Default>(&mut self) -> T {
        match &self.report.data {
            ReportPayload::Empty => T::default(),
            ReportPayload::Tabular(_) => {
                self.warn(format!(
                    "expected an object payload for '{}', got an array",
                    self.report.report_type
                ));
                T::default()
            }
            ReportPayload::Structured(_) => match self.report.decode::<T>() {
                Ok(value) => value,
                Err(e) => {
                    self.warn(format!("could not decode '{}' payload: {e}", self.report.report_type));
                    T::default()
                }
            },
        }
    }

    /// A table of rows whose columns the planner picks for this report type,
    /// with a totals row over the summable columns.
    pub fn planned_table(&self, rows: &[Row]) -> Table {
        let Some(sample) = rows.first() else {
            return Table::new(Vec::new());
        };
        let plan = plan_columns(&self.tag, sample, 1.0);
        Table::from_rows(&plan, rows, &self.fmt).with_totals("Total", &self.fmt)
    }

    /// A planned table section, or the no-data notice when `rows` is absent
    /// or empty.
    pub fn rows_section(&self, title: &str, rows: Option<&[Row]>) -> Section {
        match rows {
            Some(rows) if !rows.is_empty() => Section::table(title, self.planned_table(rows)),
            _ => Section::no_data(title),
        }
    }
}

/// One report type's rendering strategy.
pub trait ReportRenderer: Send + Sync {
    fn descriptor(&self) -> &ReportTypeDescriptor;

    /// Called before anything else; may adjust the formatter.
    fn prepare(&self, _ctx: &mut RenderContext<'_>) {}

    /// Figures the summary cards may draw on.
    fn figures(&self, _ctx: &mut RenderContext<'_>) -> Figures {
        Figures::default()
    }

    fn render_summary(&self, ctx: &mut RenderContext<'_>) -> Vec<SummaryCard> {
        let figures = self.figures(ctx);
        summary::render_cards(self.descriptor(), &figures, ctx)
    }

    fn render_sections(&self, ctx: &mut RenderContext<'_>) -> Vec<Section>;

    /// Fixed print layout, for document-style reports.
    fn invoice_layout(&self, _ctx: &mut RenderContext<'_>) -> Option<InvoiceLayout> {
        None
    }
}

pub struct Registry {
    renderers: Vec<Box<dyn ReportRenderer>>,
    generic_tabular: Box<dyn ReportRenderer>,
    generic_object: Box<dyn ReportRenderer>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// A registry with only the generic fallbacks.
    pub fn empty() -> Self {
        Self {
            renderers: Vec::new(),
            generic_tabular: Box::new(generic::GenericTabularRenderer),
            generic_object: Box::new(generic::GenericObjectRenderer),
        }
    }

    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for descriptor in tabular::DESCRIPTORS {
            registry.register(Box::new(tabular::TabularRenderer::new(descriptor)));
        }
        registry.register(Box::new(vat::VatRenderer));
        registry.register(Box::new(trial_balance::TrialBalanceRenderer));
        registry.register(Box::new(balance_sheet::BalanceSheetRenderer));
        registry.register(Box::new(profit_loss::ProfitLossRenderer));
        registry.register(Box::new(reconciliation::ReconciliationRenderer));
        registry.register(Box::new(stock::StockBalanceRenderer));
        registry.register(Box::new(aging::AgingRenderer::receivables()));
        registry.register(Box::new(aging::AgingRenderer::payables()));
        registry.register(Box::new(ledger::GeneralLedgerRenderer));
        registry.register(Box::new(invoice::TaxInvoiceRenderer));
        registry
    }

    /// Later registrations take precedence over earlier ones for the same tag.
    pub fn register(&mut self, renderer: Box<dyn ReportRenderer>) {
        self.renderers.insert(0, renderer);
    }

    pub fn lookup(&self, tag: &str) -> Option<&dyn ReportRenderer> {
        let tag = normalize_tag(tag);
        self.renderers
            .iter()
            .find(|r| r.descriptor().matches(&tag))
            .map(|r| r.as_ref())
    }

    /// Registered descriptors, in registration order.
    pub fn descriptors(&self) -> Vec<&ReportTypeDescriptor> {
        self.renderers.iter().rev().map(|r| r.descriptor()).collect()
    }

    /// The renderer for a report. Unknown types, and known types whose
    /// payload has the other shape, fall back to a generic renderer.
    pub fn resolve(&self, report: &ReportData) -> (&dyn ReportRenderer, Option<String>) {
        let payload_shape = match report.data {
            ReportPayload::Tabular(_) => Some(Shape::Tabular),
            ReportPayload::Structured(_) => Some(Shape::Structured),
            ReportPayload::Empty => None,
        };
        let fallback = |shape: Option<Shape>| match shape {
            Some(Shape::Tabular) => self.generic_tabular.as_ref(),
            _ => self.generic_object.as_ref(),
        };

        match self.lookup(&report.report_type) {
            Some(renderer) => {
                let expected = renderer.descriptor().shape;
                match payload_shape {
                    Some(shape) if shape != expected => (
                        fallback(Some(shape)),
                        Some(format!(
                            "report type '{}' expects a {} payload; rendering generically",
                            report.report_type,
                            if expected == Shape::Tabular { "tabular" } else { "structured" }
                        )),
                    ),
                    _ => (renderer, None),
                }
            }
            None => (
                fallback(payload_shape),
                Some(format!(
                    "no renderer for report type '{}'; rendering generically",
                    report.report_type
                )),
            ),
        }
    }
}

/// The result of rendering a report into the neutral document model.
pub struct Rendered {
    pub document: Document,
    pub warnings: Vec<String>,
}

/// Build the format-neutral document for a report.
pub fn build_document(registry: &Registry, report: &ReportData, config: &EngineConfig) -> Rendered {
    let fmt = Formatter::for_report(&report.metadata, &config.format);
    let mut ctx = RenderContext::new(report, fmt);
    let (renderer, fallback_note) = registry.resolve(report);
    if let Some(note) = fallback_note {
        ctx.warn(note);
    }
    let descriptor = renderer.descriptor();
    if !descriptor.tag.is_empty() {
        ctx.tag = descriptor.tag.to_string();
    }

    renderer.prepare(&mut ctx);
    let cards = renderer.render_summary(&mut ctx);
    let sections = renderer.render_sections(&mut ctx);
    let invoice = renderer.invoice_layout(&mut ctx);
    debug!(
        report_type = %ctx.tag,
        cards = cards.len(),
        sections = sections.len(),
        "built document"
    );

    let meta = &report.metadata;
    let title = meta
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| (!descriptor.title.is_empty()).then(|| descriptor.title.to_string()))
        .unwrap_or_else(|| format!("{} Report", prettify(&report.report_type)));

    let identity = identity(&ctx);
    let accent = invoice.as_ref().map(|i| i.accent).unwrap_or(descriptor.accent);
    let document = Document {
        report_type: ctx.tag.clone(),
        properties: Properties {
            title: title.clone(),
            company: meta.organization_name.clone(),
            author: meta.generated_by_name.clone(),
        },
        title,
        accent,
        currency: ctx.fmt.currency_code().to_string(),
        decimals: ctx.fmt.decimals(),
        identity,
        cards,
        sections,
        invoice,
    };
    Rendered {
        document,
        warnings: ctx.into_warnings(),
    }
}

fn identity(ctx: &RenderContext<'_>) -> Identity {
    let meta = &ctx.report.metadata;
    let contact = meta.contact_parts();
    let period = meta
        .report_period
        .as_ref()
        .and_then(|p| ctx.fmt.period(p))
        .or_else(|| {
            ctx.as_of
                .as_deref()
                .map(|d| format!("As of {}", ctx.fmt.date_str(d)))
        });
    let generated = match (&meta.generated_at, &meta.generated_by_name) {
        (Some(at), Some(by)) => Some(format!("Generated {} by {by}", ctx.fmt.timestamp(at))),
        (Some(at), None) => Some(format!("Generated {}", ctx.fmt.timestamp(at))),
        (None, Some(by)) => Some(format!("Generated by {by}")),
        (None, None) => None,
    };
    Identity {
        organization: meta.organization_name.clone(),
        contact: (!contact.is_empty()).then(|| contact.join(" | ")),
        tax_number: meta.organization_tax_number.clone(),
        period,
        filters: meta
            .filters
            .as_ref()
            .and_then(|f| describe_filters(f, ctx.fmt.date_pattern())),
        generated,
    }
}
