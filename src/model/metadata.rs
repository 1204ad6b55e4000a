use serde::{Deserialize, Deserializer, Serialize};

use super::lenient;
use super::Row;

/// How a currency amount is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Symbol,
    #[default]
    Code,
    Both,
}

/// How an amount is rounded to the configured number of decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingMethod {
    /// Half away from zero.
    #[default]
    Standard,
    /// Towards positive infinity.
    Up,
    /// Towards negative infinity.
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencySettings {
    #[serde(alias = "display_format", deserialize_with = "lenient::de_or_default")]
    pub display_format: DisplayFormat,
    /// Decimal places.
    #[serde(deserialize_with = "de_rounding")]
    pub rounding: u32,
    #[serde(alias = "rounding_method", deserialize_with = "lenient::de_or_default")]
    pub rounding_method: RoundingMethod,
}

const DEFAULT_DECIMALS: u32 = 2;

fn de_rounding<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(lenient::de_opt_whole(d)?.unwrap_or(DEFAULT_DECIMALS))
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            display_format: DisplayFormat::Code,
            rounding: DEFAULT_DECIMALS,
            rounding_method: RoundingMethod::Standard,
        }
    }
}

impl CurrencySettings {
    pub const MAX_DECIMALS: u32 = 10;

    /// Decimal places, clamped to a sane range.
    pub fn decimals(&self) -> u32 {
        self.rounding.min(Self::MAX_DECIMALS)
    }
}

/// Pre-fetched logo data as it arrived in the metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LogoBuffer {
    Bytes(Vec<u8>),
    /// Present but not decodable; holds the reason.
    Unreadable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPeriod {
    #[serde(alias = "from", alias = "start", deserialize_with = "lenient::de_opt_string")]
    pub start_date: Option<String>,
    #[serde(alias = "to", alias = "end", deserialize_with = "lenient::de_opt_string")]
    pub end_date: Option<String>,
}

/// Identity and presentation details that accompany a report payload.
///
/// Every field is optional; renderers omit whatever is missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportMetadata {
    #[serde(alias = "companyName", alias = "orgName", deserialize_with = "lenient::de_opt_string")]
    pub organization_name: Option<String>,
    #[serde(alias = "companyAddress", alias = "address", deserialize_with = "lenient::de_opt_string")]
    pub organization_address: Option<String>,
    #[serde(alias = "companyEmail", alias = "email", deserialize_with = "lenient::de_opt_string")]
    pub organization_email: Option<String>,
    #[serde(alias = "companyPhone", alias = "phone", deserialize_with = "lenient::de_opt_string")]
    pub organization_phone: Option<String>,
    #[serde(
        alias = "organizationTrn",
        alias = "trn",
        alias = "vatNumber",
        alias = "taxNumber",
        deserialize_with = "lenient::de_opt_string"
    )]
    pub organization_tax_number: Option<String>,
    #[serde(alias = "website", deserialize_with = "lenient::de_opt_string")]
    pub organization_website: Option<String>,
    /// Overrides the report type's default title.
    #[serde(alias = "reportTitle", deserialize_with = "lenient::de_opt_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub currency: Option<String>,
    #[serde(alias = "period", deserialize_with = "lenient::de_opt_item")]
    pub report_period: Option<ReportPeriod>,
    /// Precomputed aggregate figures (totals, averages, top category/vendor).
    #[serde(deserialize_with = "lenient::de_opt_item")]
    pub summary: Option<Row>,
    #[serde(deserialize_with = "lenient::de_opt_item")]
    pub currency_settings: Option<CurrencySettings>,
    /// Pre-fetched logo: a byte array, a Node Buffer object or base64 text.
    #[serde(deserialize_with = "lenient::de_opt_logo_buffer")]
    pub logo_buffer: Option<LogoBuffer>,
    #[serde(alias = "logo", deserialize_with = "lenient::de_opt_string")]
    pub logo_url: Option<String>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub logo_path: Option<String>,
    /// Free-form filters, rendered as a description line.
    #[serde(deserialize_with = "lenient::de_opt_item")]
    pub filters: Option<Row>,
    #[serde(deserialize_with = "lenient::de_opt_string")]
    pub generated_at: Option<String>,
    #[serde(alias = "generatedBy", deserialize_with = "lenient::de_opt_string")]
    pub generated_by_name: Option<String>,
}

impl ReportMetadata {
    /// Contact line parts in display order (address, phone, email, website).
    pub fn contact_parts(&self) -> Vec<&str> {
        [
            &self.organization_address,
            &self.organization_phone,
            &self.organization_email,
            &self.organization_website,
        ]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .filter(|s| !s.trim().is_empty())
        .collect()
    }

    pub fn has_summary(&self) -> bool {
        self.summary.as_ref().is_some_and(|s| !s.is_empty())
    }
}
