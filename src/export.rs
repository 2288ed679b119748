//! Static snapshot of the site.
//!
//! Renders every page the server would serve into a directory that any
//! static host can publish. The data is whatever the backend returns at
//! export time.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Listing
//! ├── 404.html                   # Unknown paths
//! ├── leer/
//! │   └── {id}/index.html        # Reader, one per published edition
//! └── read/
//!     └── {id}/index.html        # Redirect stub to /leer/{id}
//! ```
//!
//! Reader pages are sized for the configured default viewport; the browser
//! script recomputes the geometry as soon as it runs.

use crate::api::{ApiError, Catalog};
use crate::listing::{self, ListingView};
use crate::reader::{self, ReaderError};
use crate::render::Renderer;
use maud::Markup;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not load editions: {0}")]
    Api(#[from] ApiError),
    #[error("could not load edition {id:?}: {source}")]
    Edition {
        id: String,
        #[source]
        source: ReaderError,
    },
}

/// One reader page written by [`export`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedEdition {
    pub id: String,
    pub title: String,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub output: PathBuf,
    pub editions: Vec<ExportedEdition>,
    /// Ids that cannot be used as a directory name.
    pub skipped: Vec<String>,
}

pub async fn export<C: Catalog>(
    catalog: &C,
    renderer: &Renderer,
    output_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    let editions = listing::published(catalog.list_editions().await?);
    let view = ListingView {
        cards: editions.iter().map(|e| listing::card(catalog, e)).collect(),
    };
    write_page(&output_dir.join("index.html"), renderer.listing(&view))?;
    write_page(&output_dir.join("404.html"), renderer.not_found())?;

    let viewport = renderer.default_viewport();
    let mut exported = Vec::new();
    let mut skipped = Vec::new();

    for edition in editions {
        let id = edition.id.clone();
        if !is_safe_segment(&id) {
            warn!(id = %id, "edition id is not a usable directory name, skipping");
            skipped.push(id);
            continue;
        }

        let reader_view = reader::open(catalog, edition)
            .await
            .map_err(|source| ExportError::Edition {
                id: id.clone(),
                source,
            })?;

        let reader_dir = output_dir
            .join(reader::ROUTE_PREFIX.trim_start_matches('/'))
            .join(&id);
        write_page(
            &reader_dir.join("index.html"),
            renderer.reader(&reader_view, viewport),
        )?;

        let legacy_dir = output_dir
            .join(reader::LEGACY_ROUTE_PREFIX.trim_start_matches('/'))
            .join(&id);
        write_page(
            &legacy_dir.join("index.html"),
            renderer.redirect(&reader::path(&id)),
        )?;

        debug!(id = %id, pages = reader_view.book.page_count, "exported edition");
        exported.push(ExportedEdition {
            id,
            title: reader_view.edition.title,
            pages: reader_view.book.page_count,
        });
    }

    info!(
        editions = exported.len(),
        output = %output_dir.display(),
        "export complete"
    );
    Ok(ExportSummary {
        output: output_dir.to_path_buf(),
        editions: exported,
        skipped,
    })
}

/// A single, non-traversing path component.
fn is_safe_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.chars().any(|c| c == '/' || c == '\\' || c.is_control())
}

fn write_page(path: &Path, markup: Markup) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, markup.into_string()).map_err(io_err)
}
