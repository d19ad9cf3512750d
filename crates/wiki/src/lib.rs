// ABOUTME: Main library entry point for the proguide wiki scraper.
// ABOUTME: Re-exports the public API: WikiClient, PageExtractor, ImageCache, RouteDataset, Updater and the models.

//! proguide-wiki - scrapes route pages of a game wiki into a JSON dataset.
//!
//! A route page lists wild encounters per area (land, water, headbutt trees)
//! and the items found on the route. Tables are recognized from their
//! subsection heading or, failing that, from their header shape, normalized
//! into typed rows and merged into a dataset keyed by region and route.
//!
//! # Example
//!
//! ```no_run
//! use proguide_wiki::{DatasetStore, ImageCache, RouteRegistry, Updater, WikiClient, POKEMON_IMAGES};
//!
//! fn main() -> proguide_wiki::Result<()> {
//!     let client = WikiClient::builder().build()?;
//!     let images = ImageCache::new("imgs", POKEMON_IMAGES, &client);
//!     let registry = RouteRegistry::load("proguide_data/route_names.json")?;
//!     let updater = Updater::new(&client, &images, DatasetStore::new("proguide_data/route_data.json"));
//!     let summary = updater.update(&registry, None);
//!     println!("{} routes updated", summary.updated);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod images;
pub mod models;
pub mod options;
pub mod paths;
pub mod registry;
pub mod store;
pub mod update;

pub use crate::client::{Fetcher, WikiClient};
pub use crate::error::{ErrorCode, Result, WikiError};
pub use crate::extract::PageExtractor;
pub use crate::images::{ImageCache, ImageResolver, POKEMON_IMAGES};
pub use crate::models::{display_name, EncounterRow, ItemRow, Rarity, RouteRecord, SpawnTime, Style};
pub use crate::options::{ClientBuilder, Options};
pub use crate::paths::Paths;
pub use crate::registry::RouteRegistry;
pub use crate::store::{DatasetStore, RouteDataset};
pub use crate::update::{UpdateSummary, Updater};
