//! Logo resolution for the print backend.
//!
//! A logo comes from pre-fetched bytes, a local path or an http(s) URL.
//! Only raster images are embedded; SVG is rejected wherever it is
//! detected. Every failure here is recoverable: the engine records it as a
//! warning and lays the page out without a logo.

use std::path::PathBuf;
use std::time::Duration;

use printpdf::image_crate::{self, DynamicImage, GenericImageView, Rgb as Pixel, RgbImage};
use tracing::debug;
use ureq::Agent;

use crate::config::{expand_path, LogoSettings};
use crate::error::{ReportError, Result};
use crate::model::{LogoBuffer, ReportMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoSource {
    Buffer(Vec<u8>),
    /// Inline data that could not be decoded, with the reason.
    Unreadable(String),
    Path(PathBuf),
    Url(String),
}

impl LogoSource {
    /// Pre-fetched bytes win over a path, which wins over a URL. A
    /// `logoUrl` without an http(s) scheme is treated as a local path.
    pub fn from_metadata(meta: &ReportMetadata) -> Option<Self> {
        match &meta.logo_buffer {
            Some(LogoBuffer::Bytes(bytes)) if !bytes.is_empty() => return Some(Self::Buffer(bytes.clone())),
            Some(LogoBuffer::Unreadable(reason)) => return Some(Self::Unreadable(reason.clone())),
            _ => {}
        }
        if let Some(path) = meta.logo_path.as_deref().filter(|p| !p.trim().is_empty()) {
            return Some(Self::Path(expand_path(path.trim())));
        }
        let url = meta.logo_url.as_deref()?.trim();
        if url.is_empty() {
            None
        } else if is_remote(url) {
            Some(Self::Url(url.to_string()))
        } else {
            Some(Self::Path(expand_path(url)))
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Self::Buffer(_) | Self::Unreadable(_) => None,
            Self::Path(path) => path.to_str(),
            Self::Url(url) => Some(url.split(['?', '#']).next().unwrap_or(url)),
        }
    }
}

fn is_remote(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Raw bytes of a remote logo.
#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Downloads remote logos; swapped out in tests.
pub trait LogoFetcher: Send + Sync {
    fn fetch(&self, url: &str, settings: &LogoSettings) -> Result<Fetched>;
}

/// Blocking HTTP fetch bounded by the configured timeout and size limit.
pub struct HttpFetcher;

impl LogoFetcher for HttpFetcher {
    fn fetch(&self, url: &str, settings: &LogoSettings) -> Result<Fetched> {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(settings.fetch_timeout_secs)))
            .build()
            .into();

        let mut response = agent
            .get(url)
            .call()
            .map_err(|e| ReportError::Logo(format!("could not fetch {url}: {e}")))?;
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .body_mut()
            .with_config()
            .limit(settings.max_bytes)
            .read_to_vec()
            .map_err(|e| ReportError::Logo(format!("could not read {url}: {e}")))?;
        debug!(url, bytes = bytes.len(), "fetched logo");
        Ok(Fetched {
            bytes,
            content_type,
        })
    }
}

/// SVG by file extension, declared content type, or the document's first bytes.
pub fn is_svg(name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> bool {
    if name.is_some_and(|n| n.to_ascii_lowercase().ends_with(".svg")) {
        return true;
    }
    if content_type.is_some_and(|t| t.to_ascii_lowercase().contains("svg")) {
        return true;
    }
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || ((head.starts_with("<?xml") || head.starts_with("<!doctype")) && head.contains("<svg"))
}

/// A decoded logo, flattened onto white, with its drawn size in layout units.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub image: DynamicImage,
    pub width: f32,
    pub height: f32,
}

impl LogoImage {
    /// Fit `image` inside the configured logo box, keeping its aspect ratio.
    pub fn from_image(image: DynamicImage, settings: &LogoSettings) -> Result<Self> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(ReportError::Logo("image has no pixels".into()));
        }
        let scale = (settings.max_width / w as f32).min(settings.max_height / h as f32);
        Ok(Self {
            image: flatten(&image),
            width: w as f32 * scale,
            height: h as f32 * scale,
        })
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Composite any alpha channel onto a white background.
fn flatten(image: &DynamicImage) -> DynamicImage {
    let rgba = image.to_rgba8();
    let rgb = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let mix = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Pixel([mix(r), mix(g), mix(b)])
    });
    DynamicImage::ImageRgb8(rgb)
}

fn bytes_of(source: &LogoSource, fetcher: &dyn LogoFetcher, settings: &LogoSettings) -> Result<Fetched> {
    match source {
        LogoSource::Buffer(bytes) => Ok(Fetched {
            bytes: bytes.clone(),
            content_type: None,
        }),
        LogoSource::Unreadable(reason) => Err(ReportError::Logo(reason.clone())),
        LogoSource::Path(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| ReportError::Logo(format!("could not read {}: {e}", path.display())))?;
            Ok(Fetched {
                bytes,
                content_type: None,
            })
        }
        LogoSource::Url(url) => fetcher.fetch(url, settings),
    }
}

/// Load and decode a logo; any failure is a [`ReportError::Logo`].
pub fn resolve(source: &LogoSource, fetcher: &dyn LogoFetcher, settings: &LogoSettings) -> Result<LogoImage> {
    let fetched = bytes_of(source, fetcher, settings)?;
    if fetched.bytes.is_empty() {
        return Err(ReportError::Logo("logo is empty".into()));
    }
    if fetched.bytes.len() as u64 > settings.max_bytes {
        return Err(ReportError::Logo(format!(
            "logo is {} bytes, more than the {} byte limit",
            fetched.bytes.len(),
            settings.max_bytes
        )));
    }
    if is_svg(source.name(), fetched.content_type.as_deref(), &fetched.bytes) {
        return Err(ReportError::Logo("SVG logos are not supported; skipping".into()));
    }
    let image = image_crate::load_from_memory(&fetched.bytes)
        .map_err(|e| ReportError::Logo(format!("unsupported image: {e}")))?;
    LogoImage::from_image(image, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1x1 RGBA PNG.
    const PIXEL_PNG: [u8; 70] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64,
        0x60, 0xF8, 0x5F, 0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    struct Canned(Fetched);

    impl LogoFetcher for Canned {
        fn fetch(&self, _url: &str, _settings: &LogoSettings) -> Result<Fetched> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl LogoFetcher for Offline {
        fn fetch(&self, url: &str, _settings: &LogoSettings) -> Result<Fetched> {
            Err(ReportError::Logo(format!("could not fetch {url}: timed out")))
        }
    }

    #[test]
    fn detects_svg() {
        assert!(is_svg(Some("https://cdn.example.com/logo.SVG"), None, b""));
        assert!(is_svg(None, Some("image/svg+xml"), b""));
        assert!(is_svg(None, None, b"  <svg xmlns=\"http://www.w3.org/2000/svg\"/>"));
        assert!(is_svg(None, None, b"<?xml version=\"1.0\"?>\n<svg/>"));
        assert!(!is_svg(Some("logo.png"), Some("image/png"), &PIXEL_PNG));
    }

    #[test]
    fn decodes_buffer_into_logo_box() {
        let settings = LogoSettings::default();
        let logo = resolve(&LogoSource::Buffer(PIXEL_PNG.to_vec()), &Offline, &settings).unwrap();
        assert_eq!(logo.height, settings.max_height);
        assert_eq!(logo.width, settings.max_height);
    }

    #[test]
    fn wide_images_are_bounded_by_width() {
        let settings = LogoSettings::default();
        let image = DynamicImage::ImageRgb8(RgbImage::new(1000, 100));
        let logo = LogoImage::from_image(image, &settings).unwrap();
        assert!((logo.width - settings.max_width).abs() < 1e-3);
        assert!((logo.height - 14.0).abs() < 1e-3);
    }

    #[test]
    fn rejects_svg_from_url() {
        let fetcher = Canned(Fetched {
            bytes: b"<svg/>".to_vec(),
            content_type: Some("image/svg+xml".into()),
        });
        let source = LogoSource::Url("https://example.com/logo".into());
        let err = resolve(&source, &fetcher, &LogoSettings::default()).unwrap_err();
        assert!(err.to_string().contains("SVG"));
    }

    #[test]
    fn fetch_failure_is_a_logo_error() {
        let source = LogoSource::Url("https://example.com/logo.png".into());
        let err = resolve(&source, &Offline, &LogoSettings::default()).unwrap_err();
        assert!(matches!(err, ReportError::Logo(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = resolve(&LogoSource::Buffer(vec![1, 2, 3]), &Offline, &LogoSettings::default()).unwrap_err();
        assert!(matches!(err, ReportError::Logo(_)));
    }

    #[test]
    fn source_precedence() {
        let meta = ReportMetadata {
            logo_url: Some("https://example.com/a.png".into()),
            logo_path: Some("/tmp/logo.png".into()),
            ..Default::default()
        };
        assert_eq!(LogoSource::from_metadata(&meta), Some(LogoSource::Path("/tmp/logo.png".into())));

        let meta = ReportMetadata {
            logo_url: Some("https://example.com/a.png".into()),
            ..Default::default()
        };
        assert!(matches!(LogoSource::from_metadata(&meta), Some(LogoSource::Url(_))));
        assert_eq!(LogoSource::from_metadata(&ReportMetadata::default()), None);
    }

    #[test]
    fn inline_bytes_win_and_unreadable_data_is_reported() {
        let meta = ReportMetadata {
            logo_buffer: Some(LogoBuffer::Bytes(PIXEL_PNG.to_vec())),
            logo_url: Some("https://example.com/a.png".into()),
            ..Default::default()
        };
        assert_eq!(LogoSource::from_metadata(&meta), Some(LogoSource::Buffer(PIXEL_PNG.to_vec())));

        let meta = ReportMetadata {
            logo_buffer: Some(LogoBuffer::Unreadable("logo buffer is not valid base64".into())),
            ..Default::default()
        };
        let source = LogoSource::from_metadata(&meta).unwrap();
        let err = resolve(&source, &Offline, &LogoSettings::default()).unwrap_err();
        assert!(err.to_string().contains("not valid base64"));

        let meta = ReportMetadata {
            logo_buffer: Some(LogoBuffer::Bytes(Vec::new())),
            logo_path: Some("/tmp/logo.png".into()),
            ..Default::default()
        };
        assert_eq!(LogoSource::from_metadata(&meta), Some(LogoSource::Path("/tmp/logo.png".into())));
    }
}
