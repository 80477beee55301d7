//! Skyline OSM - OpenStreetMap data sources
//!
//! Building geometry comes from Overpass, place names are resolved through
//! Nominatim. Both sit behind small traits so the router can be exercised
//! with in-memory fakes.

pub mod error;
pub mod nominatim;
pub mod overpass;
pub mod source;

pub use error::FetchError;
pub use nominatim::{shorten_display_name, NominatimResolver};
pub use overpass::{OverpassFetcher, DEFAULT_OVERPASS_ENDPOINTS};
pub use source::{LocationResolver, SpatialSource};
