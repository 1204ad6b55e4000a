use serde::{Deserialize, Serialize};

use crate::document::Rgb;
use crate::model::CurrencySettings;

/// Engine-wide defaults, loaded from `config.toml`.
///
/// Every section and field is optional in the file; missing values fall back
/// to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutSettings,
    pub format: FormatSettings,
    pub logo: LogoSettings,
    pub sheet: SheetSettings,
    pub csv: CsvSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Print layout settings, in layout units (PDF points).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    /// Rows are never started below `page_height - bottom_margin`.
    pub bottom_margin: f32,
    pub row_height: f32,
    pub header_row_height: f32,
    pub font_size: f32,
    pub title_font_size: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin_left: 40.0,
            margin_right: 40.0,
            margin_top: 36.0,
            bottom_margin: 72.0,
            row_height: 18.0,
            header_row_height: 22.0,
            font_size: 8.5,
            title_font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Currency code used when the report metadata names none.
    pub currency: String,
    /// Used when the report metadata carries no `currencySettings`.
    pub currency_settings: CurrencySettings,
    /// chrono pattern for dates.
    pub date_format: String,
    /// chrono pattern for timestamps (generated-at lines).
    pub datetime_format: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            currency: "AED".to_string(),
            currency_settings: CurrencySettings::default(),
            date_format: "%d/%m/%Y".to_string(),
            datetime_format: "%d/%m/%Y %H:%M".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogoSettings {
    pub fetch_timeout_secs: u64,
    pub max_bytes: u64,
    /// Rendered logo box, in layout units.
    pub max_width: f32,
    pub max_height: f32,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 5,
            max_bytes: 5 * 1024 * 1024,
            max_width: 140.0,
            max_height: 48.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SheetSettings {
    pub header_color: String,
    pub zebra_color: String,
    pub total_color: String,
    pub highlight_color: String,
    pub column_width: f64,
    pub max_column_width: f64,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            header_color: "#1F4E79".to_string(),
            zebra_color: "#F2F6FC".to_string(),
            total_color: "#DDEBF7".to_string(),
            highlight_color: "#FFF2CC".to_string(),
            column_width: 16.0,
            max_column_width: 48.0,
        }
    }
}

impl SheetSettings {
    pub fn header_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.header_color).unwrap_or(Rgb::new(0x1F, 0x4E, 0x79))
    }

    pub fn zebra_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.zebra_color).unwrap_or(Rgb::new(0xF2, 0xF6, 0xFC))
    }

    pub fn total_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.total_color).unwrap_or(Rgb::new(0xDD, 0xEB, 0xF7))
    }

    pub fn highlight_rgb(&self) -> Rgb {
        Rgb::from_hex(&self.highlight_color).unwrap_or(Rgb::new(0xFF, 0xF2, 0xCC))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsvSettings {
    pub delimiter: char,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvSettings {
    /// The delimiter as a single byte; non-ASCII delimiters fall back to a comma.
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}
