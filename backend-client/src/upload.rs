//! Upload response handling.
//!
//! Different upload handlers name the resulting URL differently and some
//! nest it under `data`. Relative paths are resolved against the API base.

use serde_json::Value;

/// Accepted URL keys, in priority order.
pub const URL_KEYS: [&str; 6] = [
    "filePath",
    "url",
    "imageUrl",
    "fullUrl",
    "profileImage",
    "coverImage",
];

/// Pull the uploaded file's URL out of an upload response, if present.
pub fn extract_uploaded_url(body: &Value, base_url: &str) -> Option<String> {
    [body, body.get("data").unwrap_or(&Value::Null)]
        .into_iter()
        .find_map(|scope| {
            URL_KEYS.iter().find_map(|key| {
                scope
                    .get(key)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
            })
        })
        .map(|url| resolve_url(base_url, url))
}

/// Absolute and `data:` URLs pass through; paths are joined onto `base_url`.
pub fn resolve_url(base_url: &str, url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:") {
        return url.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = url.trim_start_matches('/');
    format!("{base}/{path}")
}
