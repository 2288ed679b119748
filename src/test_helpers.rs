//! Shared test utilities: an in-memory [`Catalog`] and fixture builders.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = FakeCatalog::new()
//!     .with_edition(edition("e1", "Primavera", true))
//!     .with_pages("e1", vec![page("p2", 2), page("p1", 1)]);
//!
//! let view = reader::load(&catalog, "e1").await.unwrap();
//! assert!(catalog.page_requests() == vec!["e1"]);
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{ApiError, Catalog};
use crate::listing::ListingView;
use crate::types::{Edition, Page};

/// Base URL the fake catalog resolves image keys against.
pub const TEST_API_BASE: &str = "http://backend.test";

// =========================================================================
// Fixture builders
// =========================================================================

/// An edition with a storage-key cover and an ISO date.
pub fn edition(id: &str, title: &str, published: bool) -> Edition {
    Edition {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("Descripción de {title}"),
        cover_url: format!("cover-{id}.jpg"),
        date: "2024-03-15".to_string(),
        published,
    }
}

/// A page whose image key is `img-{id}.jpg`.
pub fn page(id: &str, number: u32) -> Page {
    Page {
        id: id.to_string(),
        edition_id: None,
        image_url: format!("img-{id}.jpg"),
        number,
    }
}

// =========================================================================
// Fake catalog
// =========================================================================

/// In-memory catalog that records which page lists were requested.
#[derive(Default)]
pub struct FakeCatalog {
    editions: Vec<Edition>,
    pages: HashMap<String, Vec<Page>>,
    fail_editions: bool,
    fail_pages: bool,
    page_requests: Mutex<Vec<String>>,
    edition_requests: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.editions.push(edition);
        self
    }

    pub fn with_pages(mut self, edition_id: &str, pages: Vec<Page>) -> Self {
        self.pages.insert(edition_id.to_string(), pages);
        self
    }

    /// Every edition lookup fails as if the backend were unreachable.
    pub fn failing_editions(mut self) -> Self {
        self.fail_editions = true;
        self
    }

    /// Every pages request fails.
    pub fn failing_pages(mut self) -> Self {
        self.fail_pages = true;
        self
    }

    /// Edition ids whose pages were requested, in call order.
    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of edition list requests served.
    pub fn edition_requests(&self) -> usize {
        self.edition_requests.load(Ordering::SeqCst)
    }
}

fn unavailable(url: &str) -> ApiError {
    ApiError::Status {
        url: format!("{TEST_API_BASE}{url}"),
        status: 503,
    }
}

impl Catalog for FakeCatalog {
    async fn list_editions(&self) -> Result<Vec<Edition>, ApiError> {
        self.edition_requests.fetch_add(1, Ordering::SeqCst);
        if self.fail_editions {
            return Err(unavailable("/api/ediciones"));
        }
        Ok(self.editions.clone())
    }

    async fn list_pages(&self, edition_id: &str) -> Result<Vec<Page>, ApiError> {
        if let Ok(mut requests) = self.page_requests.lock() {
            requests.push(edition_id.to_string());
        }
        if self.fail_pages {
            return Err(unavailable(&format!("/api/ediciones/{edition_id}/pages")));
        }
        Ok(self.pages.get(edition_id).cloned().unwrap_or_default())
    }

    fn image_base(&self) -> &str {
        TEST_API_BASE
    }
}

// =========================================================================
// View extractors
// =========================================================================

/// Card ids in listing order.
pub fn card_ids(view: &ListingView) -> Vec<&str> {
    view.cards.iter().map(|c| c.id.as_str()).collect()
}
