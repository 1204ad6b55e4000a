//! Display formatting shared by every output format.
//!
//! Renderers never format numbers or dates themselves; they go through a
//! [`Formatter`] built once per render from the report metadata and the
//! engine configuration.

mod currency;
mod date;
mod filters;
mod label;
mod number;
mod words;

pub use currency::{format_amount, format_currency, group_thousands, round, symbol_for};
pub use date::{format_date, format_date_str, format_date_value, format_datetime};
pub use filters::describe_filters;
pub use label::{prettify, split_words};
pub use number::{format_number, format_percent};
pub use words::{amount_in_words, number_to_words};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::FormatSettings;
use crate::model::{lenient, CurrencySettings, ReportMetadata, ReportPeriod};

#[derive(Debug, Clone)]
pub struct Formatter {
    currency: String,
    settings: CurrencySettings,
    date_format: String,
    datetime_format: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::from_settings(&FormatSettings::default())
    }
}

impl Formatter {
    pub fn from_settings(settings: &FormatSettings) -> Self {
        Self {
            currency: settings.currency.clone(),
            settings: settings.currency_settings.clone(),
            date_format: settings.date_format.clone(),
            datetime_format: settings.datetime_format.clone(),
        }
    }

    /// Report metadata wins over configured defaults.
    pub fn for_report(metadata: &ReportMetadata, settings: &FormatSettings) -> Self {
        let mut fmt = Self::from_settings(settings);
        if let Some(code) = metadata.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            fmt.currency = code.trim().to_uppercase();
        }
        if let Some(cs) = &metadata.currency_settings {
            fmt.settings = cs.clone();
        }
        fmt
    }

    pub fn with_currency(mut self, code: &str) -> Self {
        if !code.trim().is_empty() {
            self.currency = code.trim().to_uppercase();
        }
        self
    }

    pub fn currency_code(&self) -> &str {
        &self.currency
    }

    pub fn currency_settings(&self) -> &CurrencySettings {
        &self.settings
    }

    pub fn decimals(&self) -> u32 {
        self.settings.decimals()
    }

    pub fn date_pattern(&self) -> &str {
        &self.date_format
    }

    /// Round with the report's rounding rule, without formatting.
    pub fn round(&self, value: Decimal) -> Decimal {
        round(value, self.decimals(), self.settings.rounding_method)
    }

    pub fn currency(&self, value: Decimal) -> String {
        format_currency(value, &self.currency, &self.settings)
    }

    pub fn amount(&self, value: Decimal) -> String {
        format_amount(value, &self.settings)
    }

    pub fn number(&self, value: Decimal) -> String {
        format_number(value)
    }

    pub fn percent(&self, value: Decimal) -> String {
        format_percent(value)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        format_date(date, &self.date_format)
    }

    pub fn date_str(&self, raw: &str) -> String {
        format_date_str(raw, &self.date_format)
    }

    /// Timestamps such as `generatedAt`; a bare date is formatted as a date.
    pub fn timestamp(&self, raw: &str) -> String {
        match lenient::parse_datetime(raw) {
            Some(dt) => format_datetime(dt, &self.datetime_format),
            None => self.date_str(raw),
        }
    }

    /// `01/01/2024 - 31/03/2024`, or a single bound when the other is missing.
    pub fn period(&self, period: &ReportPeriod) -> Option<String> {
        let start = period.start_date.as_deref().map(|s| self.date_str(s));
        let end = period.end_date.as_deref().map(|s| self.date_str(s));
        match (start, end) {
            (Some(s), Some(e)) => Some(format!("{s} - {e}")),
            (Some(s), None) => Some(format!("From {s}")),
            (None, Some(e)) => Some(format!("Up to {e}")),
            (None, None) => None,
        }
    }

    pub fn in_words(&self, value: Decimal) -> String {
        amount_in_words(value, &self.currency, self.decimals())
    }
}
