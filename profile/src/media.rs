//! Turning picked files into strings the backend can store.
//!
//! The default encoder inlines files as `data:` URLs. Other encoders (an
//! upload client, for instance) implement `MediaEncoder` and return a
//! hosted URL instead.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;

use crate::payload::{MediaInput, MediaSlot};
use crate::value::{AttachmentSource, FileAttachment};

/// Fallback assets used when a slot cannot be encoded.
pub const DEFAULT_AVATAR: &str = "/assets/default-avatar.png";
pub const DEFAULT_COVER: &str = "/assets/default-cover.jpg";
pub const DEFAULT_PORTFOLIO_IMAGE: &str = "/assets/default-portfolio.png";

/// Inline size limit for `DataUrlEncoder`.
pub const DEFAULT_MAX_INLINE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },

    #[error("{name} is empty")]
    Empty { name: String },

    #[error("{name} is {size} bytes (limit {limit})")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("upload failed for {name}: {reason}")]
    Upload { name: String, reason: String },
}

impl MediaSlot {
    pub fn default_asset(self) -> &'static str {
        match self {
            Self::Avatar => DEFAULT_AVATAR,
            Self::Cover => DEFAULT_COVER,
            Self::Portfolio(_) => DEFAULT_PORTFOLIO_IMAGE,
        }
    }
}

/// Encodes one file for one payload slot.
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    async fn encode(&self, slot: MediaSlot, file: &FileAttachment) -> Result<String, MediaError>;
}

/// Inlines files as base64 `data:` URLs.
#[derive(Debug, Clone)]
pub struct DataUrlEncoder {
    max_bytes: usize,
}

impl Default for DataUrlEncoder {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INLINE_BYTES,
        }
    }
}

impl DataUrlEncoder {
    pub fn with_max_bytes(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

#[async_trait]
impl MediaEncoder for DataUrlEncoder {
    async fn encode(&self, _slot: MediaSlot, file: &FileAttachment) -> Result<String, MediaError> {
        let bytes = read_attachment(file).await?;
        if bytes.is_empty() {
            return Err(MediaError::Empty {
                name: file.name.clone(),
            });
        }
        if bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                name: file.name.clone(),
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        Ok(format!(
            "data:{};base64,{}",
            file.resolved_mime_type(),
            STANDARD.encode(&bytes)
        ))
    }
}

/// Load the raw bytes of an attachment.
pub async fn read_attachment(file: &FileAttachment) -> Result<Vec<u8>, MediaError> {
    match &file.source {
        AttachmentSource::Bytes(bytes) => Ok(bytes.clone()),
        AttachmentSource::Path(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|source| MediaError::Read {
                    name: file.name.clone(),
                    source,
                })
        }
    }
}

/// Resolve every media slot concurrently.
///
/// URLs pass through. A failed encode logs and substitutes the slot's
/// default asset; it never fails the batch. Output order matches input.
pub async fn resolve_media(
    encoder: &dyn MediaEncoder,
    inputs: Vec<(MediaSlot, MediaInput)>,
) -> Vec<(MediaSlot, String)> {
    let tasks = inputs.into_iter().map(|(slot, input)| async move {
        let resolved = match input {
            MediaInput::Url(url) => url,
            MediaInput::File(file) => match encoder.encode(slot, &file).await {
                Ok(encoded) => encoded,
                Err(err) => {
                    tracing::warn!(?slot, %err, "media conversion failed; using default asset");
                    slot.default_asset().to_string()
                }
            },
        };
        (slot, resolved)
    });
    join_all(tasks).await
}
