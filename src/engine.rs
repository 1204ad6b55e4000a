//! The report dispatcher: one call renders one report into one format.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::delimited;
use crate::error::{ReportError, Result};
use crate::logo::{self, HttpFetcher, LogoFetcher, LogoImage, LogoSource};
use crate::model::ReportData;
use crate::print;
use crate::render::{build_document, Registry, Rendered, ReportRenderer};
use crate::sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Paginated PDF.
    Print,
    /// Multi-sheet `.xlsx` workbook.
    Sheet,
    /// Delimited text.
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Print, Self::Sheet, Self::Csv];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Print => "pdf",
            Self::Sheet => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "print" => Ok(Self::Print),
            "xlsx" | "sheet" | "excel" => Ok(Self::Sheet),
            "csv" => Ok(Self::Csv),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A finished document and what happened while producing it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Page count of a print document.
    pub pages: Option<usize>,
    /// Sheet names of a workbook, in order.
    pub sheets: Vec<String>,
    /// Degradations that did not stop rendering.
    pub warnings: Vec<String>,
}

/// Renders reports with a fixed configuration and renderer registry.
///
/// Calls share no mutable state; every render builds its own document and
/// backend.
pub struct Engine {
    config: EngineConfig,
    registry: Registry,
    fetcher: Box<dyn LogoFetcher>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            registry: Registry::builtin(),
            fetcher: Box::new(HttpFetcher),
        }
    }

    /// Replace the remote logo fetcher.
    pub fn with_fetcher(mut self, fetcher: impl LogoFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Add a renderer; it takes precedence over built-ins for its tags.
    pub fn register(&mut self, renderer: Box<dyn ReportRenderer>) {
        self.registry.register(renderer);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The format-neutral document all three backends consume.
    pub fn document(&self, report: &ReportData) -> Rendered {
        build_document(&self.registry, report, &self.config)
    }

    fn logo(&self, report: &ReportData, warnings: &mut Vec<String>) -> Option<LogoImage> {
        let source = LogoSource::from_metadata(&report.metadata)?;
        match logo::resolve(&source, self.fetcher.as_ref(), &self.config.logo) {
            Ok(image) => Some(image),
            Err(e) => {
                let message = e.to_string();
                warn!("{message}; rendering without a logo");
                warnings.push(message);
                None
            }
        }
    }

    pub fn render(&self, format: OutputFormat, report: &ReportData) -> Result<RenderOutput> {
        let Rendered { document, mut warnings } = self.document(report);
        let mut output = RenderOutput {
            bytes: Vec::new(),
            format,
            pages: None,
            sheets: Vec::new(),
            warnings: Vec::new(),
        };

        match format {
            OutputFormat::Print => {
                // The logo is settled before layout starts.
                let logo = self.logo(report, &mut warnings);
                let printed = print::render(&document, &self.config.layout, logo.as_ref())?;
                output.bytes = printed.bytes;
                output.pages = Some(printed.pages);
            }
            OutputFormat::Sheet => {
                let workbook = sheet::render(&document, &self.config.sheet)?;
                output.bytes = workbook.bytes;
                output.sheets = workbook.sheets;
            }
            OutputFormat::Csv => {
                output.bytes = delimited::render(&document, &self.config.csv)?;
            }
        }

        debug!(
            report_type = %document.report_type,
            %format,
            bytes = output.bytes.len(),
            warnings = warnings.len(),
            "rendered report"
        );
        output.warnings = warnings;
        Ok(output)
    }

    /// Render and return only the bytes.
    pub fn generate(&self, format: OutputFormat, report: &ReportData) -> Result<Vec<u8>> {
        self.render(format, report).map(|out| out.bytes)
    }
}

/// Render with the default configuration.
pub fn generate(format: OutputFormat, report: &ReportData) -> Result<Vec<u8>> {
    Engine::default().generate(format, report)
}
