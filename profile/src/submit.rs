//! Terminal submit: gate, transform, resolve media, persist.

use std::fmt;

use lancer_store::{ProfileRepository, Session, StoreError};
use serde::Serialize;

use crate::media::{MediaEncoder, resolve_media};
use crate::payload::{ProfilePayload, transform};
use crate::record::{FormRecord, field};
use crate::section::Section;

/// Fields that must be filled before a profile can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    FullName,
    Headline,
    Bio,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            Self::FullName => "full name",
            Self::Headline => "headline",
            Self::Bio => "bio",
        }
    }

    fn location(self) -> (Section, &'static str) {
        match self {
            Self::FullName => (Section::BasicInfo, field::FULL_NAME),
            Self::Headline => (Section::Professional, field::PROFESSIONAL_TITLE),
            Self::Bio => (Section::Professional, field::BIO),
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// User-blocking: the message is meant to be shown as-is.
    #[error("Please complete the required fields: {}", join_labels(.missing))]
    Incomplete { missing: Vec<RequiredField> },

    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to save profile: {0}")]
    Storage(#[from] StoreError),
}

fn join_labels(missing: &[RequiredField]) -> String {
    missing
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where the caller should navigate after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Redirect {
    Dashboard,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/freelancer/dashboard",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub payload: ProfilePayload,
    pub redirect: Redirect,
}

/// Required fields that are blank in `record`, in display order.
pub fn missing_required(record: &FormRecord) -> Vec<RequiredField> {
    [
        RequiredField::FullName,
        RequiredField::Headline,
        RequiredField::Bio,
    ]
    .into_iter()
    .filter(|required| {
        let (section, name) = required.location();
        record.text(section, name).trim().is_empty()
    })
    .collect()
}

/// Validate, transform and persist `record`.
///
/// The record is only read. On `Incomplete` nothing is written.
pub async fn submit_profile(
    record: &FormRecord,
    repository: &ProfileRepository,
    encoder: &dyn MediaEncoder,
) -> Result<SubmitOutcome, SubmitError> {
    let missing = missing_required(record);
    if !missing.is_empty() {
        tracing::info!(missing = %join_labels(&missing), "profile submit refused");
        return Err(SubmitError::Incomplete { missing });
    }

    let mut draft = transform(record);
    let media = std::mem::take(&mut draft.media);
    let media_count = media.len();
    for (slot, resolved) in resolve_media(encoder, media).await {
        draft.fill(slot, resolved);
    }
    let payload = draft.payload;

    repository.save_profile(&serde_json::to_value(&payload)?)?;
    repository.mark_submitted(true)?;
    let email = Some(payload.profile.email.trim().to_string()).filter(|e| !e.is_empty());
    if email.is_none() {
        repository.clear_user_email()?;
    }
    repository.save_session(&Session {
        user_name: Some(payload.profile.name.clone()),
        user_email: email,
        user_role: None,
        token: None,
    })?;

    tracing::info!(
        name = %payload.profile.name,
        media = media_count,
        portfolio = payload.portfolio.len(),
        "profile submitted"
    );

    Ok(SubmitOutcome {
        payload,
        redirect: Redirect::Dashboard,
    })
}
