//! Catalog Loader: discovers test sets and loads questions from a static
//! publication, over HTTP or from a local directory.

mod fetcher;
mod listing;
mod loader;

pub use fetcher::{DirectoryFetcher, HttpFetcher, ResourceFetcher, fetch_json};
pub use listing::{extract_hrefs, natural_cmp, parse_listing};
pub use loader::{CatalogService, LoadedTest};
