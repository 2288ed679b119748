//! # Revista
//!
//! Reader for a digital magazine. A landing page lists the published
//! editions from a remote backend, and each edition opens as a page-turning
//! flip-book that adapts to the screen it is shown on.
//!
//! # Architecture
//!
//! ```text
//! backend API ──► api::Catalog ──► listing / reader (view models) ──► render (HTML)
//!                                                                    │
//!                                         server (axum, live) ◄──────┤
//!                                         export (static dir) ◄──────┘
//! ```
//!
//! Every page is rendered on the server from fresh backend data. The only
//! browser-side code is `static/reader.js`, which repeats the [`layout`]
//! computation on resize and drives the page-flip widget.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | Backend client: envelope decoding, image URL resolution, the [`api::Catalog`] seam |
//! | [`types`] | Wire records (`Edition`, `Page`) and the response envelope |
//! | [`listing`] | Landing view model: published editions as cards |
//! | [`reader`] | Reader view model: sorted pages, covers, footer numbering |
//! | [`layout`] | Pure viewport → book geometry and widget options |
//! | [`render`] | Maud templates for every page |
//! | [`server`] | HTTP routes and status codes |
//! | [`export`] | Static snapshot of every page |
//! | [`config`] | `revista.toml` loading, validation, API base resolution, color CSS |
//! | [`dates`] | Spanish long-form dates |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Client-Side Draft Filtering
//!
//! The backend's public route may or may not hide unpublished editions.
//! The listing drops them regardless, and the reader treats an unpublished
//! id exactly like a missing one.
//!
//! ## Server-Side First Layout
//!
//! The server sizes the book from the `Sec-CH-Viewport-*` client hints,
//! falling back to a configured default viewport. The browser script owns
//! the geometry from then on, using the same parameters serialized into the
//! page, so both sides agree on the mobile/desktop boundary.
//!
//! ## No Caching, No Retries
//!
//! Each request fetches what it shows. A failed fetch renders an error page
//! and the reader navigates to try again.

pub mod api;
pub mod config;
pub mod dates;
pub mod export;
pub mod layout;
pub mod listing;
pub mod output;
pub mod reader;
pub mod render;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
