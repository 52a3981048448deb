//! Typed workspace view-model, built once from raw JSON.
//!
//! The backend (and older cached copies of it) disagree on field names,
//! wrap the record in `workspace` or `data`, send amounts as strings and
//! timestamps in several formats. `Workspace::from_json` absorbs all of
//! that in one pass so nothing downstream repeats the defaulting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::status::{StatusClass, classify};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub title: String,
    pub milestones: Vec<Milestone>,
    pub files: Vec<SharedFile>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub phase: String,
    pub phase_number: Option<u32>,
    /// Never negative.
    pub amount: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub raw_status: String,
    /// `None` when `raw_status` is not a known spelling.
    pub status: Option<StatusClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedFile {
    pub id: String,
    pub name: String,
    pub url: String,
    pub uploaded_by: String,
    pub size: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender_role: String,
    pub sender_name: String,
    /// Roles that have read the message.
    pub read_by: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Workspace {
    /// Normalize a raw workspace response. Never fails; unusable parts
    /// come back empty.
    pub fn from_json(raw: &Value) -> Self {
        let root = unwrap_envelope(raw);
        Self {
            id: str_at(root, &["/_id", "/id"]),
            title: str_at(root, &["/title", "/projectTitle", "/name"]),
            milestones: array_at(root, &["/sharedMilestones", "/milestones"])
                .iter()
                .map(Milestone::from_json)
                .collect(),
            files: array_at(root, &["/sharedFiles", "/files"])
                .iter()
                .map(SharedFile::from_json)
                .collect(),
            messages: array_at(root, &["/sharedMessages", "/messages"])
                .iter()
                .map(Message::from_json)
                .collect(),
        }
    }
}

impl Milestone {
    pub fn from_json(raw: &Value) -> Self {
        let raw_status = str_at(raw, &["/status"]);
        let title = str_at(raw, &["/title", "/name"]);
        Self {
            id: str_at(raw, &["/_id", "/id"]),
            title: if title.is_empty() {
                "Untitled milestone".to_string()
            } else {
                title
            },
            phase: str_at(raw, &["/phase"]),
            phase_number: at(raw, &["/phaseNumber"])
                .and_then(number)
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u32),
            amount: at(raw, &["/amount", "/budget", "/price"])
                .and_then(number)
                .unwrap_or(0.0)
                .max(0.0),
            due_date: timestamp_at(raw, &["/dueDate", "/deadline"]),
            completed_date: timestamp_at(raw, &["/completedDate", "/completedAt", "/approvedAt"]),
            status: classify(&raw_status),
            raw_status,
        }
    }
}

impl SharedFile {
    pub fn from_json(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["/_id", "/id"]),
            name: str_at(raw, &["/name", "/fileName", "/originalName", "/filename"]),
            url: str_at(raw, &["/url", "/fileUrl", "/filePath", "/path"]),
            uploaded_by: str_at(raw, &["/uploadedBy/name", "/uploaderName", "/uploadedBy"]),
            size: at(raw, &["/size", "/fileSize"])
                .and_then(number)
                .filter(|n| *n >= 0.0)
                .map_or(0, |n| n as u64),
            uploaded_at: timestamp_at(raw, &["/uploadedAt", "/createdAt", "/uploadDate"]),
        }
    }
}

impl Message {
    pub fn from_json(raw: &Value) -> Self {
        let read_by = at(raw, &["/readBy"])
            .and_then(Value::as_array)
            .map(|readers| {
                readers
                    .iter()
                    .filter_map(|reader| match reader {
                        Value::String(role) => Some(role.clone()),
                        other => {
                            let role = str_at(other, &["/role", "/userRole"]);
                            (!role.is_empty()).then_some(role)
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            id: str_at(raw, &["/_id", "/id"]),
            content: str_at(raw, &["/content", "/message", "/text"]),
            sender_role: str_at(raw, &["/senderRole", "/sender/role"]),
            sender_name: str_at(raw, &["/senderName", "/sender/name"]),
            read_by,
            created_at: timestamp_at(raw, &["/createdAt", "/timestamp", "/sentAt"]),
        }
    }

    pub fn is_read_by(&self, role: &str) -> bool {
        self.read_by.iter().any(|r| r == role)
    }
}

// ── JSON helpers ─────────────────────────────────────────────────────────

fn unwrap_envelope(raw: &Value) -> &Value {
    let mut root = raw;
    // At most two layers: `{ data: { workspace: {...} } }`.
    for _ in 0..2 {
        match ["/workspace", "/data"]
            .iter()
            .find_map(|p| root.pointer(p).filter(|v| v.is_object()))
        {
            Some(inner) => root = inner,
            None => break,
        }
    }
    root
}

fn at<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .find(|v| !v.is_null())
}

fn str_at(value: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn array_at<'a>(value: &'a Value, paths: &[&str]) -> &'a [Value] {
    paths
        .iter()
        .filter_map(|path| value.pointer(path))
        .find_map(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn timestamp_at(value: &Value, paths: &[&str]) -> Option<DateTime<Utc>> {
    at(value, paths).and_then(parse_timestamp)
}

/// RFC 3339, naive ISO date-time (taken as UTC), `YYYY-MM-DD`, or epoch
/// milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
