//! Responsive flip-book geometry.
//!
//! Pure arithmetic, no I/O. The server uses it for the first render and the
//! browser script (`static/reader.js`) repeats the same steps on every
//! resize with the [`LayoutParams`] serialized into the page, so the two
//! never disagree about where the mobile/desktop boundary lies.
//!
//! ```text
//! available = viewport - allowances
//! height    = available.height
//! width     = height * aspect
//! required  = width * (2 on desktop, 1 on mobile)
//! if required > available.width: width = available.width / pages, height = width / aspect
//! ```

use crate::config::ReaderConfig;
use serde::Serialize;

/// Browser viewport in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Single-page (mobile) or two-page spread (desktop) presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Portrait viewports and narrow ones are mobile.
    pub fn classify(viewport: Viewport, breakpoint: u32) -> Self {
        if viewport.height > viewport.width || viewport.width < f64::from(breakpoint) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Pages shown side by side.
    pub fn pages_per_spread(self) -> u32 {
        match self {
            DeviceClass::Mobile => 1,
            DeviceClass::Desktop => 2,
        }
    }

    /// The page-flip widget's `size` strategy for this class.
    pub fn size_mode(self) -> &'static str {
        match self {
            DeviceClass::Mobile => "fixed",
            DeviceClass::Desktop => "stretch",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Desktop => "desktop",
        }
    }
}

/// Tunables shared by the server and the browser script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParams {
    pub page_aspect: f64,
    pub horizontal_allowance: f64,
    pub vertical_allowance: f64,
    pub mobile_breakpoint: u32,
}

impl From<&ReaderConfig> for LayoutParams {
    fn from(reader: &ReaderConfig) -> Self {
        Self {
            page_aspect: reader.page_aspect,
            horizontal_allowance: f64::from(reader.horizontal_allowance),
            vertical_allowance: f64::from(reader.vertical_allowance),
            mobile_breakpoint: reader.mobile_breakpoint,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self::from(&ReaderConfig::default())
    }
}

/// Computed page size for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub device: DeviceClass,
    pub page_width: f64,
    pub page_height: f64,
}

impl Geometry {
    /// Width of the book wrapper: one page on mobile, a full spread on desktop.
    pub fn book_width(&self) -> f64 {
        self.page_width * f64::from(self.device.pages_per_spread())
    }
}

/// Compute page geometry for a viewport.
pub fn compute(viewport: Viewport, params: &LayoutParams) -> Geometry {
    let device = DeviceClass::classify(viewport, params.mobile_breakpoint);
    let available_width = (viewport.width - params.horizontal_allowance).max(1.0);
    let available_height = (viewport.height - params.vertical_allowance).max(1.0);

    let mut page_height = available_height;
    let mut page_width = page_height * params.page_aspect;

    let pages = f64::from(device.pages_per_spread());
    if page_width * pages > available_width {
        page_width = available_width / pages;
        page_height = page_width / params.page_aspect;
    }

    Geometry {
        device,
        page_width,
        page_height,
    }
}

/// Round down to whole pixels, ignoring float noise below a micro-pixel
/// (`720.0 * 0.7` is `503.99999999999994`).
pub fn whole_px(value: f64) -> u32 {
    (value + 1e-6).floor().max(0.0) as u32
}

/// Options handed to the StPageFlip constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipOptions {
    pub width: u32,
    pub height: u32,
    pub size: &'static str,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub max_shadow_opacity: f64,
    pub show_cover: bool,
    pub mobile_scroll_support: bool,
    pub use_portrait: bool,
    pub draw_shadow: bool,
    pub flipping_time: u32,
    pub start_page: u32,
    pub start_z_index: u32,
    pub auto_size: bool,
    pub click_event_forward: bool,
    pub use_mouse_events: bool,
    pub swipe_distance: u32,
    pub show_page_corners: bool,
    pub disable_flip_by_click: bool,
}

impl FlipOptions {
    pub fn for_geometry(geometry: &Geometry) -> Self {
        Self::for_device(
            geometry.device,
            whole_px(geometry.page_width),
            whole_px(geometry.page_height),
        )
    }

    /// Options for a device class with an explicit page size in whole pixels.
    pub fn for_device(device: DeviceClass, width: u32, height: u32) -> Self {
        let mobile = device == DeviceClass::Mobile;
        Self {
            width,
            height,
            size: device.size_mode(),
            min_width: 300,
            max_width: 1000,
            min_height: 400,
            max_height: 1414,
            max_shadow_opacity: if mobile { 0.2 } else { 0.5 },
            show_cover: true,
            mobile_scroll_support: true,
            use_portrait: mobile,
            draw_shadow: true,
            flipping_time: 1000,
            start_page: 0,
            start_z_index: 0,
            auto_size: true,
            click_event_forward: true,
            use_mouse_events: true,
            swipe_distance: 30,
            show_page_corners: true,
            disable_flip_by_click: false,
        }
    }
}
