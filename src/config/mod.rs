mod engine;

pub use engine::{
    CsvSettings, EngineConfig, FormatSettings, LayoutSettings, LogoSettings, Orientation,
    PageSize, SheetSettings,
};

use crate::error::{ReportError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, falling back to ~/.reportgen/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "reportgen") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        ReportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".reportgen"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml from the config directory.
///
/// A missing directory or file yields the built-in defaults; a file that
/// exists but does not parse is an error.
pub fn load_config(config_dir: &Path) -> Result<EngineConfig> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(EngineConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    parse_config(&content).map_err(|source| ReportError::ConfigParse { path, source })
}

pub fn parse_config(content: &str) -> std::result::Result<EngineConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the config directory with a template config.toml.
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(ReportError::AlreadyInitialized(config_dir.to_path_buf()));
    }
    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r##"# reportgen engine configuration. Every key is optional.

[layout]
page_size = "a4"           # a4 | letter
orientation = "portrait"   # portrait | landscape
margin_left = 40.0
margin_right = 40.0
margin_top = 36.0
bottom_margin = 72.0       # no row starts below page height minus this
row_height = 18.0
header_row_height = 22.0
font_size = 8.5
title_font_size = 16.0

[format]
currency = "AED"           # used when a report names no currency
date_format = "%d/%m/%Y"
datetime_format = "%d/%m/%Y %H:%M"

[format.currency_settings]
display_format = "code"    # symbol | code | both
rounding = 2
rounding_method = "standard"   # standard | up | down

[logo]
fetch_timeout_secs = 5
max_bytes = 5242880
max_width = 140.0
max_height = 48.0

[sheet]
header_color = "#1F4E79"
zebra_color = "#F2F6FC"
total_color = "#DDEBF7"
highlight_color = "#FFF2CC"
column_width = 16.0
max_column_width = 48.0

[csv]
delimiter = ","
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayFormat, RoundingMethod};

    #[test]
    fn template_parses_to_defaults() {
        let cfg = parse_config(CONFIG_TEMPLATE).unwrap();
        let defaults = EngineConfig::default();
        assert_eq!(cfg.layout.bottom_margin, defaults.layout.bottom_margin);
        assert_eq!(cfg.layout.page_size, PageSize::A4);
        assert_eq!(cfg.format.date_format, "%d/%m/%Y");
        assert_eq!(cfg.format.currency_settings.display_format, DisplayFormat::Code);
        assert_eq!(cfg.format.currency_settings.rounding_method, RoundingMethod::Standard);
        assert_eq!(cfg.csv.delimiter_byte(), b',');
        assert_eq!(cfg.sheet.header_color, "#1F4E79");
        assert_eq!(cfg.sheet.highlight_color, defaults.sheet.highlight_color);
        assert!(CONFIG_TEMPLATE.trim_end().ends_with("delimiter = \",\""));
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = parse_config("[layout]\nbottom_margin = 90.0\n").unwrap();
        assert_eq!(cfg.layout.bottom_margin, 90.0);
        assert_eq!(cfg.layout.row_height, 18.0);
        assert_eq!(cfg.logo.fetch_timeout_secs, 5);
    }

    #[test]
    fn missing_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent")).unwrap();
        assert_eq!(cfg.format.currency, "AED");
    }

    #[test]
    fn init_refuses_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_config_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::AlreadyInitialized(_)));
    }
}
