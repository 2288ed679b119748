//! Site configuration module.
//!
//! Handles loading, validating, and merging `revista.toml`. Stock defaults
//! are serialized to a TOML table and the user's file is deep-merged on top,
//! so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Revista Bidxaagui"
//! tagline = "Explora nuestras ediciones digitales"
//! hostname = "localhost"        # Deployed hostname, drives API inference
//! home_url = "https://bidxaagui.com"
//! brand_mark = "BIDXAAGUI"      # Printed on the back cover
//! placeholder_image = "https://placehold.co/400x560?text=Cover"
//! lang = "es"
//!
//! [api]
//! # base_url = "https://api.example.com"   # Explicit override
//! production_host = "bidxaagui.com"
//! production_url = "https://api.bidxaagui.com"
//! development_url = "http://localhost:8787"
//! pages_path = "pages"          # or "paginas"
//! lookup = "list"               # or "direct"
//! timeout_secs = 10
//!
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [reader]
//! page_aspect = 0.70            # width / height of one page
//! horizontal_allowance = 40     # px subtracted from viewport width
//! vertical_allowance = 80       # px subtracted from viewport height
//! mobile_breakpoint = 768
//! default_viewport = [1280, 800]
//! pageflip_script = "https://cdn.jsdelivr.net/npm/page-flip@2.0.7/dist/js/page-flip.browser.js"
//!
//! [colors.light]  /  [colors.dark]
//! background, surface, text, text_muted, accent, accent_text
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "REVISTA_API_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `revista.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding and presentation text.
    pub site: SiteMeta,
    /// Backend API location and protocol variants.
    pub api: ApiConfig,
    /// HTTP server settings for `revista serve`.
    pub server: ServerConfig,
    /// Flip-book geometry parameters.
    pub reader: ReaderConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let aspect = self.reader.page_aspect;
        if !(aspect.is_finite() && aspect > 0.0 && aspect <= 2.0) {
            return Err(ConfigError::Validation(
                "reader.page_aspect must be in (0, 2]".into(),
            ));
        }
        if self.reader.default_viewport[0] == 0 || self.reader.default_viewport[1] == 0 {
            return Err(ConfigError::Validation(
                "reader.default_viewport values must be non-zero".into(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be at least 1".into(),
            ));
        }
        if let Some(url) = &self.api.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "api.base_url must be an http(s) URL, got {url:?}"
                )));
            }
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind is not a socket address: {:?}",
                self.server.bind
            )));
        }
        Ok(())
    }
}

/// Branding and presentation text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub tagline: String,
    /// Hostname the site is deployed under. Only used to infer the API base.
    pub hostname: String,
    /// "Back to main site" link on the listing header.
    pub home_url: String,
    /// Text printed on the back cover.
    pub brand_mark: String,
    /// Shown when a cover or page image fails to load.
    pub placeholder_image: String,
    pub lang: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Revista Bidxaagui".to_string(),
            tagline: "Explora nuestras ediciones digitales".to_string(),
            hostname: "localhost".to_string(),
            home_url: "https://bidxaagui.com".to_string(),
            brand_mark: "BIDXAAGUI".to_string(),
            placeholder_image: "https://placehold.co/400x560?text=Cover".to_string(),
            lang: "es".to_string(),
        }
    }
}

/// How the reader resolves a single edition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStrategy {
    /// Fetch the full list and search it by id.
    #[default]
    List,
    /// `GET /api/ediciones/{id}`, 404 meaning not found.
    Direct,
}

/// Last path segment of the pages route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagesRoute {
    /// `/api/ediciones/{id}/pages`
    #[default]
    Pages,
    /// `/api/ediciones/{id}/paginas`
    Paginas,
}

impl PagesRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            PagesRoute::Pages => "pages",
            PagesRoute::Paginas => "paginas",
        }
    }
}

/// Backend API location and protocol variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Explicit base URL. When absent the base is inferred from `site.hostname`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Hostname fragment identifying the production deployment.
    pub production_host: String,
    pub production_url: String,
    pub development_url: String,
    /// Last path segment of the pages route (`pages` or `paginas`).
    pub pages_path: PagesRoute,
    pub lookup: LookupStrategy,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            production_host: "bidxaagui.com".to_string(),
            production_url: "https://api.bidxaagui.com".to_string(),
            development_url: "http://localhost:8787".to_string(),
            pages_path: PagesRoute::Pages,
            lookup: LookupStrategy::List,
            timeout_secs: 10,
        }
    }
}

/// Resolve the backend base URL.
///
/// An explicit value wins; otherwise a hostname containing the production
/// host maps to the production API and anything else to the development
/// default. Trailing slashes are stripped.
pub fn resolve_api_base(api: &ApiConfig, hostname: &str) -> String {
    let base = match &api.base_url {
        Some(url) if !url.trim().is_empty() => url.trim(),
        _ if hostname.contains(api.production_host.as_str()) => api.production_url.as_str(),
        _ => api.development_url.as_str(),
    };
    base.trim_end_matches('/').to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Flip-book geometry parameters, consumed by [`crate::layout`] and
/// shipped to the browser script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    /// Width / height of a single page.
    pub page_aspect: f64,
    /// Pixels of viewport width reserved for side padding.
    pub horizontal_allowance: u32,
    /// Pixels of viewport height reserved for header and footer.
    pub vertical_allowance: u32,
    /// Viewports narrower than this are mobile.
    pub mobile_breakpoint: u32,
    /// `[width, height]` assumed for the first server render when the
    /// browser sends no viewport client hints.
    pub default_viewport: [u32; 2],
    /// StPageFlip browser bundle.
    pub pageflip_script: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            page_aspect: 0.70,
            horizontal_allowance: 40,
            vertical_allowance: 80,
            mobile_breakpoint: 768,
            default_viewport: [1280, 800],
            pageflip_script:
                "https://cdn.jsdelivr.net/npm/page-flip@2.0.7/dist/js/page-flip.browser.js"
                    .to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Cards, reader stage and header bars.
    pub surface: String,
    pub text: String,
    /// Dates, footer, secondary labels.
    pub text_muted: String,
    /// Buttons and links.
    pub accent: String,
    /// Text drawn on top of `accent`.
    pub accent_text: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f5f1ea".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1d1a16".to_string(),
            text_muted: "#6b645a".to_string(),
            accent: "#8c2f1c".to_string(),
            accent_text: "#ffffff".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#15130f".to_string(),
            surface: "#221f1a".to_string(),
            text: "#efe9df".to_string(),
            text_muted: "#a39a8c".to_string(),
            accent: "#d9694f".to_string(),
            accent_text: "#15130f".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    // An empty table still deserializes to the defaults.
    toml::Value::try_from(SiteConfig::default())
        .unwrap_or_else(|_| toml::Value::Table(toml::map::Map::new()))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the file at `path` (missing file = stock defaults).
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `revista.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Revista Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "Revista Bidxaagui"
tagline = "Explora nuestras ediciones digitales"

# Hostname the site is served under. When api.base_url is not set, a
# hostname containing api.production_host selects api.production_url.
hostname = "localhost"

# "Back to main site" link on the listing page.
home_url = "https://bidxaagui.com"

# Text printed on the back cover of every edition.
brand_mark = "BIDXAAGUI"

# Image shown when a cover or page fails to load.
placeholder_image = "https://placehold.co/400x560?text=Cover"

lang = "es"

# ---------------------------------------------------------------------------
# Backend API
# ---------------------------------------------------------------------------
[api]
# Explicit backend base URL. Also settable with REVISTA_API_URL or --api-url.
# base_url = "https://api.example.com"

production_host = "bidxaagui.com"
production_url = "https://api.bidxaagui.com"
development_url = "http://localhost:8787"

# Last segment of the pages route: "pages" or "paginas".
pages_path = "pages"

# How the reader finds one edition: "list" fetches all editions and searches
# by id, "direct" calls /api/ediciones/{id}.
lookup = "list"

# Per-request timeout in seconds.
timeout_secs = 10

# ---------------------------------------------------------------------------
# Server
# ---------------------------------------------------------------------------
[server]
bind = "127.0.0.1:3000"

# ---------------------------------------------------------------------------
# Reader geometry
# ---------------------------------------------------------------------------
[reader]
# Page width / height. 0.70 is close to ISO A-series portrait.
page_aspect = 0.7

# Pixels of viewport reserved around the book.
horizontal_allowance = 40
vertical_allowance = 80

# Viewports narrower than this (or taller than wide) show one page at a time.
mobile_breakpoint = 768

# Viewport assumed for the first render when the browser sends no hints.
default_viewport = [1280, 800]

pageflip_script = "https://cdn.jsdelivr.net/npm/page-flip@2.0.7/dist/js/page-flip.browser.js"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#f5f1ea"
surface = "#ffffff"
text = "#1d1a16"
text_muted = "#6b645a"
accent = "#8c2f1c"
accent_text = "#ffffff"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#15130f"
surface = "#221f1a"
text = "#efe9df"
text_muted = "#a39a8c"
accent = "#d9694f"
accent_text = "#15130f"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-surface: {light_surface};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-accent: {light_accent};
    --color-accent-text: {light_accent_text};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-surface: {dark_surface};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-accent: {dark_accent};
        --color-accent-text: {dark_accent_text};
    }}
}}"#,
        light_bg = colors.light.background,
        light_surface = colors.light.surface,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_accent = colors.light.accent,
        light_accent_text = colors.light.accent_text,
        dark_bg = colors.dark.background,
        dark_surface = colors.dark.surface,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_accent = colors.dark.accent,
        dark_accent_text = colors.dark.accent_text,
    )
}
