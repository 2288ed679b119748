//! HTML rendering for every page the site serves.
//!
//! ## Pages
//!
//! - **Listing** (`/`): grid of published edition cards
//! - **Reader** (`/leer/{id}`): flip-book with header, nav buttons and footer
//! - **Reader error**: not-found or unavailable message, no retry button
//! - **Redirect** (`/read/{id}` in static exports): meta refresh to the canonical route
//! - **Not found**: any other unknown path
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into each page:
//! - `static/style.css`: base styles (colors injected from config)
//! - `static/reader.js`: geometry on resize, keyboard/button navigation,
//!   page-flip widget lifecycle
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! so every interpolated backend string is escaped.

use crate::config::{self, SiteConfig};
use crate::layout::{self, DeviceClass, FlipOptions, Geometry, LayoutParams, Viewport};
use crate::listing::{EditionCard, ListingView};
use crate::reader::{Leaf, ReaderError, ReaderView};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Serialize;

const CSS_STATIC: &str = include_str!("../static/style.css");
const READER_JS: &str = include_str!("../static/reader.js");

/// Shared, request-independent rendering inputs.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: SiteConfig,
    css: String,
    layout: LayoutParams,
}

impl Renderer {
    pub fn new(config: SiteConfig) -> Self {
        let color_css = config::generate_color_css(&config.colors);
        let css = format!("{}\n\n{}", color_css, CSS_STATIC);
        let layout = LayoutParams::from(&config.reader);
        Self {
            config,
            css,
            layout,
        }
    }

    /// Viewport used when the request carries no size hints.
    pub fn default_viewport(&self) -> Viewport {
        let [w, h] = self.config.reader.default_viewport;
        Viewport::new(f64::from(w), f64::from(h))
    }

    pub fn geometry(&self, viewport: Viewport) -> Geometry {
        layout::compute(viewport, &self.layout)
    }

    // ========================================================================
    // Page renderers
    // ========================================================================

    /// Landing page with one card per published edition.
    pub fn listing(&self, view: &ListingView) -> Markup {
        let content = html! {
            (self.home_header())
            main.editions-grid {
                @if view.is_empty() {
                    div.empty-state { "No hay ediciones publicadas aún." }
                } @else {
                    @for card in &view.cards {
                        (self.edition_card(card))
                    }
                }
            }
        };
        self.document(&self.config.site.title, "home-view", content)
    }

    /// Landing page when the edition list could not be fetched.
    pub fn listing_error(&self) -> Markup {
        let content = html! {
            (self.home_header())
            main.editions-grid {
                div.error-state role="alert" { "No se pudieron cargar las ediciones." }
            }
        };
        self.document(&self.config.site.title, "home-view", content)
    }

    /// Flip-book reader for one edition, sized for `viewport` until the
    /// browser script takes over.
    pub fn reader(&self, view: &ReaderView, viewport: Viewport) -> Markup {
        let geometry = self.geometry(viewport);
        let book = &view.book;
        let boot = ReaderBoot::new(&self.layout, &geometry);
        let wrapper_style = format!(
            "width: {}px; height: {}px;",
            layout::whole_px(geometry.book_width()),
            layout::whole_px(geometry.page_height)
        );

        let content = html! {
            div.preview-container {
                header.preview-header {
                    div.header-left {
                        a.btn-back href="/" { "← Ver todas las ediciones" }
                        span.edition-title-preview { (view.edition.title) }
                    }
                    div.header-right {
                        button.btn-download type="button"
                            data-message="La descarga de PDF estará disponible próximamente." {
                            "Descargar PDF"
                        }
                    }
                }
                main.preview-stage {
                    div.book-wrapper style=(wrapper_style) {
                        div id="flipbook" class="flipbook" data-mode=(geometry.device.as_str()) {
                            @for leaf in &book.leaves {
                                (self.leaf(leaf))
                            }
                        }
                    }
                    button.preview-nav.prev type="button" aria-label="Página anterior" { "‹" }
                    button.preview-nav.next type="button" aria-label="Página siguiente" { "›" }
                }
                footer.preview-footer data-total=(book.total_pages()) {
                    span.page-indicator aria-live="polite" { (book.footer_label(0)) }
                }
            }
            script id="reader-config" type="application/json" { (PreEscaped(boot.to_json())) }
            script src=(self.config.reader.pageflip_script) {}
            script { (PreEscaped(READER_JS)) }
        };

        let title = format!("{} · {}", view.edition.title, self.config.site.title);
        self.document(&title, "reader-view", content)
    }

    /// Reader error page. Not found and unavailable only differ in wording.
    pub fn reader_error(&self, error: &ReaderError) -> Markup {
        let content = html! {
            div.preview-error role="alert" {
                p { (error.user_message()) }
                a.btn-back href="/" { "← Ver todas las ediciones" }
            }
        };
        self.document(&self.config.site.title, "reader-view", content)
    }

    /// Page for paths that match no route.
    pub fn not_found(&self) -> Markup {
        let content = html! {
            div.preview-error role="alert" {
                p { "Página no encontrada" }
                a.btn-back href="/" { "← Ver todas las ediciones" }
            }
        };
        self.document(&self.config.site.title, "home-view", content)
    }

    /// Meta-refresh stub pointing at `target`, for hosts without redirects.
    pub fn redirect(&self, target: &str) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(self.config.site.lang) {
                head {
                    meta charset="UTF-8";
                    meta http-equiv="refresh" content={ "0; url=" (target) };
                    link rel="canonical" href=(target);
                    title { (self.config.site.title) }
                }
                body {
                    a href=(target) { (target) }
                }
            }
        }
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Base HTML document structure.
    fn document(&self, title: &str, body_class: &str, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang=(self.config.site.lang) {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta http-equiv="Accept-CH" content="Sec-CH-Viewport-Width, Sec-CH-Viewport-Height";
                    title { (title) }
                    style { (PreEscaped(&self.css)) }
                }
                body class=(body_class) {
                    (content)
                }
            }
        }
    }

    fn home_header(&self) -> Markup {
        let site = &self.config.site;
        html! {
            header.home-header {
                h1 { (site.title) }
                p { (site.tagline) }
                a.back-link href=(site.home_url) { "← Volver al sitio principal" }
            }
        }
    }

    fn edition_card(&self, card: &EditionCard) -> Markup {
        html! {
            article.edition-card {
                a.card-cover href=(card.href) {
                    (self.image(&card.cover_src, &card.title, "cover-image", true))
                }
                div.card-info {
                    h3 { (card.title) }
                    @if !card.description.is_empty() {
                        p.card-description { (card.description) }
                    }
                    span.card-date { (card.date_label) }
                    a.btn-read href=(card.href) { "Leer Ahora" }
                }
            }
        }
    }

    fn leaf(&self, leaf: &Leaf) -> Markup {
        match leaf {
            Leaf::FrontCover { src } => html! {
                div.page.page-cover data-density="hard" {
                    div.page-content {
                        @if let Some(src) = src {
                            (self.image(src, "Portada", "page-image", false))
                        }
                    }
                }
            },
            Leaf::Content { id, src, number } => html! {
                div.page data-page-id=(id) {
                    div.page-content {
                        (self.image(src, &format!("Página {number}"), "page-image", true))
                        div.page-number { (number) }
                    }
                }
            },
            Leaf::BackCover => html! {
                div.page.page-cover data-density="hard" {
                    div.page-content.back-cover {
                        div.brand-mark { (self.config.site.brand_mark) }
                    }
                }
            },
        }
    }

    /// `<img>` that swaps to the placeholder once if its source fails.
    fn image(&self, src: &str, alt: &str, class: &str, lazy: bool) -> Markup {
        html! {
            img class=(class) src=(src) alt=(alt)
                loading=[lazy.then_some("lazy")]
                data-fallback=(self.config.site.placeholder_image)
                onerror="this.onerror=null;this.src=this.dataset.fallback;";
        }
    }
}

/// Parameters the browser script needs to repeat the layout computation.
#[derive(Debug, Serialize)]
struct ReaderBoot<'a> {
    layout: &'a LayoutParams,
    /// Widget options per class. Width and height are replaced on mount.
    widget: WidgetModes,
}

#[derive(Debug, Serialize)]
struct WidgetModes {
    mobile: FlipOptions,
    desktop: FlipOptions,
}

impl<'a> ReaderBoot<'a> {
    fn new(layout: &'a LayoutParams, geometry: &Geometry) -> Self {
        let width = layout::whole_px(geometry.page_width);
        let height = layout::whole_px(geometry.page_height);
        Self {
            layout,
            widget: WidgetModes {
                mobile: FlipOptions::for_device(DeviceClass::Mobile, width, height),
                desktop: FlipOptions::for_device(DeviceClass::Desktop, width, height),
            },
        }
    }

    /// JSON safe to embed in a `<script>` element.
    fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/")
    }
}

// ============================================================================
// Tests
// ============================================================================
