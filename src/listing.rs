//! Landing page view model.
//!
//! One request resolves to either a ready grid of cards or an error; the
//! "loading" phase is the pending [`load`] future itself, nothing is sent to
//! the browser until it settles.

use crate::api::{ApiError, Catalog};
use crate::dates;
use crate::reader;
use crate::types::Edition;
use tracing::warn;

/// One card on the landing grid.
#[derive(Debug, Clone, PartialEq)]
pub struct EditionCard {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Resolved `<img src>` for the cover.
    pub cover_src: String,
    /// Localized publication date, or the raw value when it doesn't parse.
    pub date_label: String,
    /// Reader route for this edition.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingView {
    pub cards: Vec<EditionCard>,
}

impl ListingView {
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Keep only published editions, in backend order.
///
/// The backend's public route may or may not filter drafts; the client
/// always does, so the outcome does not depend on the deployment.
pub fn published(editions: Vec<Edition>) -> Vec<Edition> {
    editions.into_iter().filter(|e| e.published).collect()
}

/// Build the card for one edition.
pub fn card<C: Catalog>(catalog: &C, edition: &Edition) -> EditionCard {
    EditionCard {
        id: edition.id.clone(),
        title: edition.title.clone(),
        description: edition.description.clone(),
        cover_src: catalog.image_url(&edition.cover_url),
        date_label: dates::format_long_es(&edition.date),
        href: reader::path(&edition.id),
    }
}

/// Fetch editions and build the listing.
pub async fn load<C: Catalog>(catalog: &C) -> Result<ListingView, ApiError> {
    let editions = catalog.list_editions().await.inspect_err(|err| {
        warn!(error = %err, "could not load editions");
    })?;
    let cards = published(editions)
        .iter()
        .map(|edition| card(catalog, edition))
        .collect();
    Ok(ListingView { cards })
}

/// One backend edition as seen by `revista check`.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryEntry {
    pub edition: Edition,
    /// Page count, fetched for published editions only.
    pub pages: Option<usize>,
}

/// Every edition the backend returns, drafts included, in backend order.
pub async fn inventory<C: Catalog>(catalog: &C) -> Result<Vec<InventoryEntry>, ApiError> {
    let editions = catalog.list_editions().await?;
    let mut entries = Vec::with_capacity(editions.len());
    for edition in editions {
        let pages = if edition.published {
            Some(catalog.list_pages(&edition.id).await?.len())
        } else {
            None
        };
        entries.push(InventoryEntry { edition, pages });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn only_published_editions_become_cards() {
        let catalog = FakeCatalog::new()
            .with_edition(edition("a", "Alfa", true))
            .with_edition(edition("b", "Beta", false));

        let view = load(&catalog).await.unwrap();
        assert_eq!(card_ids(&view), vec!["a"]);
    }

    #[tokio::test]
    async fn cards_keep_backend_order() {
        let catalog = FakeCatalog::new()
            .with_edition(edition("z", "Zeta", true))
            .with_edition(edition("a", "Alfa", true))
            .with_edition(edition("m", "Eme", true));

        let view = load(&catalog).await.unwrap();
        assert_eq!(card_ids(&view), vec!["z", "a", "m"]);
    }

    #[tokio::test]
    async fn card_fields_are_resolved() {
        let mut e = edition("e1", "Primavera", true);
        e.cover_url = "covers/e1.jpg".to_string();
        e.date = "2024-03-15".to_string();
        let catalog = FakeCatalog::new().with_edition(e);

        let view = load(&catalog).await.unwrap();
        let card = &view.cards[0];
        assert_eq!(card.title, "Primavera");
        assert_eq!(card.cover_src, format!("{TEST_API_BASE}/api/images/covers/e1.jpg"));
        assert_eq!(card.date_label, "15 de marzo de 2024");
        assert_eq!(card.href, "/leer/e1");
    }

    #[tokio::test]
    async fn no_published_editions_is_an_empty_ready_view() {
        let catalog = FakeCatalog::new().with_edition(edition("draft", "Borrador", false));
        let view = load(&catalog).await.unwrap();
        assert!(view.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_an_error() {
        let catalog = FakeCatalog::new().failing_editions();
        assert!(load(&catalog).await.is_err());
    }

    #[tokio::test]
    async fn inventory_counts_pages_of_published_editions_only() {
        let catalog = FakeCatalog::new()
            .with_edition(edition("a", "Alfa", true))
            .with_edition(edition("b", "Beta", false))
            .with_pages("a", vec![page("p1", 1), page("p2", 2)]);

        let entries = inventory(&catalog).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pages, Some(2));
        assert_eq!(entries[1].pages, None);
        assert_eq!(catalog.page_requests(), vec!["a".to_string()]);
    }

    #[test]
    fn published_filter_is_pure() {
        let editions = vec![edition("a", "A", true), edition("b", "B", false)];
        let kept = published(editions);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }
}
