//! Service listings as browsed on the marketplace.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Starting price; `0` when unknown.
    pub price: f64,
    /// `0.0..=5.0`.
    pub rating: f64,
    pub review_count: u32,
    pub delivery_days: u32,
    pub freelancer_name: String,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ServiceListing {
    pub fn from_json(raw: &Value) -> Self {
        let review_count = match first(raw, &["/reviewCount", "/totalReviews", "/reviews"]) {
            Some(Value::Array(reviews)) => u32::try_from(reviews.len()).unwrap_or(u32::MAX),
            Some(other) => whole(other),
            None => 0,
        };
        let tags = match first(raw, &["/tags", "/skills"]) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(csv)) => csv
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            id: text(raw, &["/_id", "/id"]),
            title: text(raw, &["/title", "/name", "/serviceTitle"]),
            description: text(raw, &["/description", "/summary"]),
            category: text(raw, &["/category", "/categoryName", "/category/name"]),
            price: first(raw, &["/price", "/startingPrice", "/basePrice", "/packages/0/price"])
                .and_then(number)
                .unwrap_or(0.0)
                .max(0.0),
            rating: first(raw, &["/rating", "/averageRating"])
                .and_then(number)
                .unwrap_or(0.0)
                .clamp(0.0, 5.0),
            review_count,
            delivery_days: first(raw, &["/deliveryDays", "/deliveryTime", "/packages/0/deliveryDays"])
                .map_or(0, whole),
            freelancer_name: text(
                raw,
                &["/freelancer/name", "/freelancerName", "/seller/name", "/user/name"],
            ),
            tags,
            created_at: first(raw, &["/createdAt", "/publishedAt"]).and_then(timestamp),
        }
    }
}

/// Accepts a bare array or one wrapped in `services` / `data`.
pub fn load_listings(raw: &Value) -> Vec<ServiceListing> {
    let items = raw
        .as_array()
        .or_else(|| raw.pointer("/services").and_then(Value::as_array))
        .or_else(|| raw.pointer("/data").and_then(Value::as_array))
        .or_else(|| raw.pointer("/data/services").and_then(Value::as_array));
    match items {
        Some(items) => items.iter().map(ServiceListing::from_json).collect(),
        None => {
            tracing::warn!("service document has no listing array");
            Vec::new()
        }
    }
}

fn first<'a>(raw: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| raw.pointer(p))
        .find(|v| !v.is_null())
}

fn text(raw: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|p| raw.pointer(p))
        .find_map(|v| v.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or_default()
        .to_string()
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn whole(value: &Value) -> u32 {
    number(value)
        .filter(|n| *n >= 0.0)
        .map_or(0, |n| n.min(f64::from(u32::MAX)) as u32)
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn normalizes_alias_fields() {
        let listing = ServiceListing::from_json(&json!({
            "_id": "svc-1",
            "name": "Logo design",
            "categoryName": "Design",
            "packages": [{ "price": "$1,250", "deliveryDays": 4 }],
            "averageRating": 7,
            "reviews": [{}, {}],
            "seller": { "name": "Sam" },
            "skills": "branding, , vector",
            "createdAt": "2026-10-01"
        }));

        assert_eq!(listing.id, "svc-1");
        assert_eq!(listing.title, "Logo design");
        assert_eq!(listing.category, "Design");
        assert_eq!(listing.price, 1250.0);
        assert_eq!(listing.delivery_days, 4);
        assert_eq!(listing.rating, 5.0);
        assert_eq!(listing.review_count, 2);
        assert_eq!(listing.freelancer_name, "Sam");
        assert_eq!(listing.tags, vec!["branding", "vector"]);
        assert!(listing.created_at.is_some());
    }

    #[test]
    fn junk_degrades_to_defaults() {
        assert_eq!(ServiceListing::from_json(&json!("nope")), ServiceListing::default());
        let listing = ServiceListing::from_json(&json!({ "price": -3, "reviewCount": "many" }));
        assert_eq!(listing.price, 0.0);
        assert_eq!(listing.review_count, 0);
    }

    #[test]
    fn load_listings_accepts_wrappers() {
        let item = || json!({ "title": "A" });
        assert_eq!(load_listings(&json!([item()])).len(), 1);
        assert_eq!(load_listings(&json!({ "services": [item(), item()] })).len(), 2);
        assert_eq!(load_listings(&json!({ "data": { "services": [item()] } })).len(), 1);
        assert!(load_listings(&json!({ "oops": true })).is_empty());
    }
}
