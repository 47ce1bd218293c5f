//! Catalogue outbound adapters.
//!
//! A thin reqwest implementation of the `CatalogSource` port for the public
//! volumes API.

mod dto;
mod google_books;

pub use google_books::{DEFAULT_CATALOG_BASE_URL, GoogleBooksCatalogSource};
