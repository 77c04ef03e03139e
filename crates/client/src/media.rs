//! Media URL resolution.
//!
//! Catalog covers and product media arrive either as absolute URLs or as
//! bare storage paths relative to the CDN. Blank paths resolve to an inline
//! SVG placeholder so the UI never renders a broken image.

use crate::config::ClientConfig;

/// Inline placeholder shown when an item has no usable image path.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;utf8,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%20width%3D%22600%22%20height%3D%22400%22%3E%3Crect%20width%3D%22100%25%22%20height%3D%22100%25%22%20fill%3D%22%23f3f4f6%22%2F%3E%3Ctext%20x%3D%2250%25%22%20y%3D%2250%25%22%20dominant-baseline%3D%22middle%22%20text-anchor%3D%22middle%22%20font-family%3D%22sans-serif%22%20font-size%3D%2220%22%20fill%3D%22%236b7280%22%3Esem%20imagem%3C%2Ftext%3E%3C%2Fsvg%3E";

/// Resolves bare storage paths against the configured CDN base.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base_url: String,
}

impl MediaResolver {
    /// Create a resolver from configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let mut base_url = config.media_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Resolve a media path to a displayable URL.
    ///
    /// Absolute `http(s)` URLs pass through unchanged; bare paths are joined
    /// onto the CDN base; blank or absent paths yield the placeholder.
    #[must_use]
    pub fn resolve(&self, path: Option<&str>) -> String {
        let Some(trimmed) = path.map(str::trim).filter(|p| !p.is_empty()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("{}{trimmed}", self.base_url)
        }
    }
}
