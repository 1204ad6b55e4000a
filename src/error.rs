use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown output format '{0}'. Use 'pdf', 'xlsx' or 'csv'.")]
    UnknownFormat(String),

    #[error("Invalid report payload: {0}")]
    InvalidReport(String),

    #[error("Failed to decode report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to build print document: {0}")]
    Pdf(String),

    #[error("Failed to build workbook: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Logo unavailable: {0}")]
    Logo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
