pub mod config;
pub mod delimited;
pub mod document;
pub mod engine;
pub mod error;
pub mod format;
pub mod layout;
pub mod logo;
pub mod model;
pub mod print;
pub mod render;
pub mod sheet;

pub use config::EngineConfig;
pub use document::{Cell, Document, Section, SectionBody, Table, NO_DATA};
pub use engine::{generate, Engine, OutputFormat, RenderOutput};
pub use error::{ReportError, Result};
pub use format::Formatter;
pub use layout::{plan_columns, semantics, Align, ColumnPlan, FieldKind, FieldSemantics};
pub use model::{ReportData, ReportMetadata, ReportPayload, Row};
pub use render::{Registry, ReportRenderer};
