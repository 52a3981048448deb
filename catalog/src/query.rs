//! Filtering and ordering of service listings.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::listing::ServiceListing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
}

impl SortOrder {
    pub fn all() -> [Self; 5] {
        [
            Self::Relevance,
            Self::PriceAsc,
            Self::PriceDesc,
            Self::Rating,
            Self::Newest,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }

    /// Lenient: case-insensitive, `-` and `_` interchangeable.
    pub fn from_string(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|order| order.as_str() == normalized)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort order `{0}` (expected relevance, price_asc, price_desc, rating or newest)")]
pub struct SortOrderParseError(String);

impl FromStr for SortOrder {
    type Err = SortOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s).ok_or_else(|| SortOrderParseError(s.to_string()))
    }
}

/// Every set field narrows the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceQuery {
    /// Whitespace-separated terms; each must appear in the title,
    /// description, category or a tag. Case-insensitive.
    pub text: Option<String>,
    /// Case-insensitive exact category.
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub sort: SortOrder,
}

impl ServiceQuery {
    fn terms(&self) -> Vec<String> {
        self.text
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    fn admits(&self, listing: &ServiceListing, terms: &[String]) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .is_none_or(|c| listing.category.eq_ignore_ascii_case(c));
        category_ok
            && self.min_price.is_none_or(|min| listing.price >= min)
            && self.max_price.is_none_or(|max| listing.price <= max)
            && self.min_rating.is_none_or(|min| listing.rating >= min)
            && terms.iter().all(|term| relevance(listing, term) > 0)
    }
}

/// Per-term weight: title 3, tag 2, category or description 1.
fn relevance(listing: &ServiceListing, term: &str) -> u32 {
    let contains = |haystack: &str| haystack.to_lowercase().contains(term);
    let mut score = 0;
    if contains(&listing.title) {
        score += 3;
    }
    if listing.tags.iter().any(|tag| contains(tag.as_str())) {
        score += 2;
    }
    if contains(&listing.category) || contains(&listing.description) {
        score += 1;
    }
    score
}

/// Matching listings in the requested order. Ties keep input order.
pub fn search<'a>(listings: &'a [ServiceListing], query: &ServiceQuery) -> Vec<&'a ServiceListing> {
    let terms = query.terms();
    let mut hits: Vec<&ServiceListing> = listings
        .iter()
        .filter(|listing| query.admits(listing, &terms))
        .collect();

    match query.sort {
        SortOrder::Relevance if terms.is_empty() => {}
        SortOrder::Relevance => hits.sort_by_key(|listing| {
            Reverse(terms.iter().map(|t| relevance(listing, t)).sum::<u32>())
        }),
        SortOrder::PriceAsc => hits.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOrder::PriceDesc => hits.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOrder::Rating => hits.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.review_count.cmp(&a.review_count))
        }),
        SortOrder::Newest => hits.sort_by(|a, b| match (a.created_at, b.created_at) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }

    tracing::debug!(matched = hits.len(), of = listings.len(), sort = %query.sort, "service search");
    hits
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFacet {
    pub name: String,
    pub count: usize,
}

/// Listing count per category, most populated first, then by name.
/// Uncategorised listings are not counted.
pub fn category_facets(listings: &[ServiceListing]) -> Vec<CategoryFacet> {
    let mut counts = BTreeMap::<&str, usize>::new();
    for listing in listings {
        let name = listing.category.trim();
        if !name.is_empty() {
            *counts.entry(name).or_default() += 1;
        }
    }
    let mut facets: Vec<CategoryFacet> = counts
        .into_iter()
        .map(|(name, count)| CategoryFacet {
            name: name.to_string(),
            count,
        })
        .collect();
    // BTreeMap order is by name; the stable sort keeps that for ties.
    facets.sort_by_key(|facet| Reverse(facet.count));
    facets
}
