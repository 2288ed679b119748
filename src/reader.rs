//! Reader view model: one edition as a flip-book.
//!
//! ## Load sequence
//!
//! 1. Resolve the edition through [`Catalog::find_edition`]. Missing or
//!    unpublished editions stop here with [`ReaderError::NotFound`]; the
//!    pages route is never called.
//! 2. Fetch the pages and sort them by page number. The backend does not
//!    promise any order.
//! 3. Build the [`FlipBook`]: the first page becomes the hard front cover,
//!    the rest are soft pages with a number overlay, and a branded back
//!    cover closes the book.
//!
//! The page count reported to readers is `pages + 2`, the two covers being
//! counted as pages of their own.

use crate::api::{ApiError, Catalog};
use crate::types::{Edition, Page};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use thiserror::Error;
use tracing::{debug, warn};

/// Canonical reader route prefix.
pub const ROUTE_PREFIX: &str = "/leer";
/// Older links used this prefix; they redirect to [`ROUTE_PREFIX`].
pub const LEGACY_ROUTE_PREFIX: &str = "/read";

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Reader URL for an edition id.
pub fn path(id: &str) -> String {
    format!("{ROUTE_PREFIX}/{}", utf8_percent_encode(id, SEGMENT))
}

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("edition {0:?} not found")]
    NotFound(String),
    #[error(transparent)]
    Unavailable(#[from] ApiError),
}

impl ReaderError {
    /// Message shown to readers. Transport and decoding failures are not
    /// told apart.
    pub fn user_message(&self) -> &'static str {
        match self {
            ReaderError::NotFound(_) => "Edición no encontrada",
            ReaderError::Unavailable(_) => "Error al cargar la edición",
        }
    }
}

/// One physical sheet of the flip-book.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Hard cover showing the first page's image, if the edition has pages.
    FrontCover { src: Option<String> },
    Content { id: String, src: String, number: u32 },
    BackCover,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlipBook {
    pub leaves: Vec<Leaf>,
    /// Pages fetched from the backend.
    pub page_count: usize,
}

impl FlipBook {
    /// Build the book from pages in any order.
    pub fn new<C: Catalog>(catalog: &C, mut pages: Vec<Page>) -> Self {
        sort_pages(&mut pages);
        let page_count = pages.len();
        let mut pages = pages.into_iter();

        let mut leaves = Vec::with_capacity(page_count + 1);
        leaves.push(Leaf::FrontCover {
            src: pages.next().map(|p| catalog.image_url(&p.image_url)),
        });
        leaves.extend(pages.map(|p| Leaf::Content {
            src: catalog.image_url(&p.image_url),
            id: p.id,
            number: p.number,
        }));
        leaves.push(Leaf::BackCover);

        Self { leaves, page_count }
    }

    /// Total shown in the footer: fetched pages plus both covers.
    pub fn total_pages(&self) -> usize {
        self.page_count + 2
    }

    /// Footer text for a zero-based current page index.
    pub fn footer_label(&self, current: usize) -> String {
        let total = self.total_pages();
        format!("Página {} de {}", (current + 1).min(total), total)
    }
}

/// Sort pages ascending by page number. Stable, so duplicate numbers keep
/// backend order.
pub fn sort_pages(pages: &mut [Page]) {
    pages.sort_by_key(|p| p.number);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReaderView {
    pub edition: Edition,
    pub book: FlipBook,
}

/// Resolve an edition and its pages.
pub async fn load<C: Catalog>(catalog: &C, id: &str) -> Result<ReaderView, ReaderError> {
    let edition = match catalog.find_edition(id).await {
        Ok(Some(edition)) if edition.published => edition,
        Ok(Some(_)) => {
            debug!(id, "edition exists but is not published");
            return Err(ReaderError::NotFound(id.to_string()));
        }
        Ok(None) => return Err(ReaderError::NotFound(id.to_string())),
        Err(err) => {
            warn!(id, error = %err, "edition lookup failed");
            return Err(err.into());
        }
    };

    open(catalog, edition).await
}

/// Build the reader for an edition already known to be published. Only the
/// pages are fetched.
pub async fn open<C: Catalog>(
    catalog: &C,
    edition: Edition,
) -> Result<ReaderView, ReaderError> {
    let id = edition.id.as_str();
    let pages = catalog.list_pages(id).await.inspect_err(|err| {
        warn!(id, error = %err, "could not load pages");
    })?;
    debug!(id, pages = pages.len(), "edition loaded");

    let book = FlipBook::new(catalog, pages);
    Ok(ReaderView { edition, book })
}
