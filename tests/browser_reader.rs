//! Browser tests for the reader script: device modes, keyboard navigation,
//! footer updates and image fallback.
//!
//! Needs Chrome, and network access for the page-flip widget.
//! Run with: `cargo test --test browser_reader -- --ignored`

use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions, Tab};
use revista::api::{ApiError, Catalog};
use revista::config::SiteConfig;
use revista::export;
use revista::render::Renderer;
use revista::types::{Edition, Page};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

// ---------------------------------------------------------------------------
// Setup helpers
// ---------------------------------------------------------------------------

/// Catalog with one six-page edition whose images never resolve.
struct Fixture;

impl Catalog for Fixture {
    async fn list_editions(&self) -> Result<Vec<Edition>, ApiError> {
        Ok(vec![Edition {
            id: "e1".to_string(),
            title: "Primavera".to_string(),
            description: String::new(),
            cover_url: "covers/e1.jpg".to_string(),
            date: "2024-03-15".to_string(),
            published: true,
        }])
    }

    async fn list_pages(&self, edition_id: &str) -> Result<Vec<Page>, ApiError> {
        Ok((1..=6)
            .rev()
            .map(|n| Page {
                id: format!("p{n}"),
                edition_id: Some(edition_id.to_string()),
                image_url: format!("{edition_id}/{n:02}.jpg"),
                number: n,
            })
            .collect())
    }

    fn image_base(&self) -> &str {
        "http://backend.invalid"
    }
}

fn generated_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/browser/generated")
}

fn ensure_fixtures_built() {
    static BUILT: OnceLock<()> = OnceLock::new();
    BUILT.get_or_init(|| {
        let output_dir = generated_dir();
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir).expect("failed to clean output dir");
        }
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let renderer = Renderer::new(SiteConfig::default());
        runtime
            .block_on(export::export(&Fixture, &renderer, &output_dir))
            .expect("fixture export failed");
    });
}

fn desktop_browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| launch(1280, 800))
}

fn mobile_browser() -> &'static Browser {
    static B: OnceLock<Browser> = OnceLock::new();
    B.get_or_init(|| launch(375, 667))
}

fn launch(width: u32, height: u32) -> Browser {
    Browser::new(LaunchOptions {
        window_size: Some((width, height)),
        ..Default::default()
    })
    .expect("failed to launch Chrome")
}

fn load_reader(browser: &Browser) -> Arc<Tab> {
    ensure_fixtures_built();
    let tab = browser.new_tab().unwrap();
    let file = generated_dir().join("leer/e1/index.html");
    assert!(file.exists(), "missing: {}", file.display());

    tab.navigate_to(&format!("file://{}", file.display()))
        .unwrap()
        .wait_until_navigated()
        .unwrap();
    tab
}

/// Evaluate `expr` after `delay_ms`, giving the widget time to settle.
fn eval_later(tab: &Tab, expr: &str, delay_ms: u32) -> serde_json::Value {
    let js = format!("new Promise(r => setTimeout(() => r({expr}), {delay_ms}))");
    tab.evaluate(&js, true)
        .expect("failed to evaluate JS")
        .value
        .expect("no value returned")
}

fn indicator(tab: &Tab) -> String {
    eval_later(tab, "document.querySelector('.page-indicator').textContent", 1500)
        .as_str()
        .unwrap()
        .to_string()
}

fn resize(tab: &Tab, width: u32, height: u32) {
    tab.set_bounds(Bounds::Normal {
        left: Some(0),
        top: Some(0),
        width: Some(f64::from(width)),
        height: Some(f64::from(height)),
    })
    .expect("failed to resize window");
}

/// Flip-book elements, widget roots and the mounted mode, after settling.
fn mounted(tab: &Tab) -> (u64, u64, String) {
    let value = eval_later(
        tab,
        "[document.querySelectorAll('.flipbook').length, \
          document.querySelectorAll('.stf__parent').length, \
          document.querySelector('.flipbook').dataset.mode]",
        1000,
    );
    let parts = value.as_array().expect("array result");
    (
        parts[0].as_u64().unwrap(),
        parts[1].as_u64().unwrap(),
        parts[2].as_str().unwrap().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn wide_window_mounts_desktop_spread() {
    let tab = load_reader(desktop_browser());
    let mode = eval_later(&tab, "document.querySelector('.flipbook').dataset.mode", 500);
    assert_eq!(mode.as_str(), Some("desktop"));
}

#[test]
#[ignore]
fn narrow_window_mounts_single_page() {
    let tab = load_reader(mobile_browser());
    let mode = eval_later(&tab, "document.querySelector('.flipbook').dataset.mode", 500);
    assert_eq!(mode.as_str(), Some("mobile"));

    let width = eval_later(&tab, "document.querySelector('.book-wrapper').style.width", 0);
    assert_eq!(width.as_str(), Some("335px"));
}

#[test]
#[ignore]
fn footer_starts_at_first_page() {
    let tab = load_reader(desktop_browser());
    assert_eq!(indicator(&tab), "Página 1 de 8");
}

#[test]
#[ignore]
fn arrow_keys_turn_pages() {
    let tab = load_reader(mobile_browser());
    assert_eq!(indicator(&tab), "Página 1 de 8");

    tab.press_key("ArrowRight").unwrap();
    assert_eq!(indicator(&tab), "Página 2 de 8");

    tab.press_key("ArrowLeft").unwrap();
    assert_eq!(indicator(&tab), "Página 1 de 8");
}

#[test]
#[ignore]
fn broken_images_fall_back_to_placeholder() {
    let tab = load_reader(desktop_browser());
    let all_swapped = eval_later(
        &tab,
        "Array.from(document.querySelectorAll('img.page-image'))\
         .every(img => img.getAttribute('src') === img.dataset.fallback)",
        2000,
    );
    assert_eq!(all_swapped.as_bool(), Some(true));
}

#[test]
#[ignore]
fn page_numbers_survive_image_fallback() {
    let tab = load_reader(desktop_browser());
    let numbers = eval_later(
        &tab,
        "Array.from(document.querySelectorAll('.page-number')).map(n => n.textContent).join(',')",
        2000,
    );
    assert_eq!(numbers.as_str(), Some("2,3,4,5,6"));
}

#[test]
#[ignore]
fn crossing_the_breakpoint_remounts_a_single_book() {
    let browser = launch(1280, 800);
    let tab = load_reader(&browser);
    assert_eq!(mounted(&tab), (1, 1, "desktop".to_string()));

    let first = indicator(&tab);
    tab.press_key("ArrowRight").unwrap();
    let flipped = indicator(&tab);
    assert_ne!(flipped, first);

    resize(&tab, 375, 667);
    assert_eq!(mounted(&tab), (1, 1, "mobile".to_string()));
    assert_eq!(indicator(&tab), flipped);

    resize(&tab, 1280, 800);
    assert_eq!(mounted(&tab), (1, 1, "desktop".to_string()));
    assert_eq!(indicator(&tab), flipped);
}

#[test]
#[ignore]
fn resizing_within_a_class_keeps_the_book() {
    let browser = launch(1280, 800);
    let tab = load_reader(&browser);
    let width_before = eval_later(&tab, "(window.__book = document.querySelector('.flipbook'), \
         document.querySelector('.book-wrapper').style.width)", 1000);

    resize(&tab, 1500, 950);
    let same = eval_later(&tab, "document.querySelector('.flipbook') === window.__book", 1000);
    assert_eq!(same.as_bool(), Some(true));
    assert_eq!(mounted(&tab), (1, 1, "desktop".to_string()));

    let width_after = eval_later(&tab, "document.querySelector('.book-wrapper').style.width", 0);
    assert_ne!(width_after, width_before);
}
