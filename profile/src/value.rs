//! Loosely typed field values held by the form record.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

/// Fields of one section, keyed by field name.
pub type SectionFields = BTreeMap<String, FieldValue>;

/// A single form field.
///
/// Mirrors JSON, plus `File` for a picked-but-not-yet-encoded file.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
    File(FileAttachment),
}

/// A user-selected file waiting to be encoded or uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    /// Original file name; used for MIME sniffing when `mime_type` is absent.
    pub name: String,
    pub mime_type: Option<String>,
    pub source: AttachmentSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl FileAttachment {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            mime_type: None,
            source: AttachmentSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            source: AttachmentSource::Bytes(bytes),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Explicit MIME type, else guessed from the file name.
    pub fn resolved_mime_type(&self) -> String {
        match &self.mime_type {
            Some(mime) if !mime.trim().is_empty() => mime.trim().to_string(),
            _ => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Render scalars as text. Containers and files render as `""`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Null | Self::List(_) | Self::Object(_) | Self::File(_) => String::new(),
        }
    }

    /// Numeric view. Text is parsed leniently; anything else is `0`.
    pub fn as_number(&self) -> f64 {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .trim_start_matches('$')
                .replace(',', "")
                .parse()
                .unwrap_or(0.0),
            _ => 0.0,
        };
        if n.is_finite() { n } else { 0.0 }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) => matches!(s.trim(), "true" | "yes" | "1"),
            Self::Number(n) => *n != 0.0,
            _ => false,
        }
    }

    pub fn as_list(&self) -> &[FieldValue] {
        match self {
            Self::List(items) => items,
            _ => &[],
        }
    }

    /// List of non-blank strings. Comma-separated text is split.
    pub fn as_string_list(&self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .iter()
                .map(|item| match item {
                    Self::Object(map) => map.get("name").map(Self::as_text).unwrap_or_default(),
                    other => other.as_text(),
                })
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// `true` for null, blank text, empty containers.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Object(map) => map.is_empty(),
            Self::Bool(_) | Self::Number(_) | Self::File(_) => false,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<FileAttachment> for FieldValue {
    fn from(file: FileAttachment) -> Self {
        Self::File(file)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Build a `SectionFields` map from `(name, value)` pairs.
pub fn fields<K, V, I>(pairs: I) -> SectionFields
where
    K: Into<String>,
    V: Into<FieldValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(FieldValue::Number(45.0).as_text(), "45");
        assert_eq!(FieldValue::Number(45.5).as_text(), "45.5");
    }

    #[test]
    fn lenient_number_parsing() {
        assert_eq!(FieldValue::text("$1,250").as_number(), 1250.0);
        assert_eq!(FieldValue::text("abc").as_number(), 0.0);
        assert_eq!(FieldValue::Null.as_number(), 0.0);
    }

    #[test]
    fn string_list_accepts_lists_objects_and_csv() {
        let from_json = FieldValue::from(json!(["Rust", " ", {"name": "SQL"}]));
        assert_eq!(from_json.as_string_list(), vec!["Rust", "SQL"]);
        assert_eq!(
            FieldValue::text("Go, , Elixir").as_string_list(),
            vec!["Go", "Elixir"]
        );
    }

    #[test]
    fn mime_type_guessed_from_name() {
        let file = FileAttachment::from_bytes("avatar.png", vec![1, 2, 3]);
        assert_eq!(file.resolved_mime_type(), "image/png");

        let explicit = FileAttachment::from_bytes("blob", vec![]).with_mime_type("image/webp");
        assert_eq!(explicit.resolved_mime_type(), "image/webp");
    }
}
