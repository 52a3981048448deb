//! Marketplace service browsing: normalise listings from whatever shape
//! the backend returns, then filter, rank and facet them in memory.

pub mod listing;
pub mod query;

pub use listing::{ServiceListing, load_listings};
pub use query::{CategoryFacet, ServiceQuery, SortOrder, SortOrderParseError, category_facets, search};
