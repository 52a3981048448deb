use std::time::Duration;

use async_trait::async_trait;
use lancer_profile::{FileAttachment, MediaEncoder, MediaError, MediaSlot};
use lancer_stats::{SourceError, WorkspaceSource};
use lancer_store::Session;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::upload::extract_uploaded_url;
use crate::user::UserSummary;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_UPLOAD_FIELD: &str = "file";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Multipart field name the upload handler expects.
    pub upload_field: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }
}

/// Thin client over the marketplace REST API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    upload_field: String,
    token: Option<String>,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> ApiResult<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidConfig(format!(
                "base URL must be http(s): {base_url:?}"
            )));
        }
        Url::parse(&base_url)
            .map_err(|err| ApiError::InvalidConfig(format!("invalid base URL {base_url:?}: {err}")))?;
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url,
            upload_field: config.upload_field,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Picks up the bearer token from a stored session, if any.
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token.clone_from(&session.token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/freelancer/workspaces/{id}`, raw.
    pub async fn fetch_workspace(&self, workspace_id: &str) -> ApiResult<Value> {
        let url = self.endpoint(&["api", "freelancer", "workspaces", workspace_id])?;
        debug!(%url, "fetching workspace");
        let response = self.authorized(self.http.get(url)).send().await?;
        Self::json_body(response).await
    }

    /// `GET /api/users/{id}`.
    pub async fn fetch_user(&self, user_id: &str) -> ApiResult<UserSummary> {
        let url = self.endpoint(&["api", "users", user_id])?;
        debug!(%url, "fetching user");
        let response = self.authorized(self.http.get(url)).send().await?;
        let body = Self::json_body(response).await?;
        Ok(UserSummary::from_json(&body))
    }

    /// `POST /api/upload` as multipart. Returns the absolute URL of the
    /// stored file.
    pub async fn upload(&self, file_name: &str, mime_type: &str, bytes: Vec<u8>) -> ApiResult<String> {
        let url = self.endpoint(&["api", "upload"])?;
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)?;
        let form = Form::new().part(self.upload_field.clone(), part);
        debug!(%url, file = file_name, field = %self.upload_field, "uploading file");

        let response = self.authorized(self.http.post(url)).multipart(form).send().await?;
        let body = Self::json_body(response).await?;
        extract_uploaded_url(&body, &self.base_url).ok_or(ApiError::MissingUrl)
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let base = &self.base_url;
        let mut url = Url::parse(base)
            .map_err(|err| ApiError::InvalidConfig(format!("invalid base URL {base:?}: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidConfig(format!("base URL cannot take a path: {base:?}")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn json_body(response: Response) -> ApiResult<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| {
                    ["message", "error"]
                        .iter()
                        .find_map(|k| body.get(k).and_then(Value::as_str).map(str::to_string))
                })
                .unwrap_or(text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_str(&text).map_err(|err| ApiError::Parse(err.to_string()))
    }
}

#[async_trait]
impl WorkspaceSource for BackendClient {
    async fn fetch_workspace(&self, workspace_id: &str) -> Result<Value, SourceError> {
        BackendClient::fetch_workspace(self, workspace_id)
            .await
            .map_err(SourceError::new)
    }
}

/// Uploads files instead of inlining them.
#[async_trait]
impl MediaEncoder for BackendClient {
    async fn encode(&self, slot: MediaSlot, file: &FileAttachment) -> Result<String, MediaError> {
        let bytes = lancer_profile::media::read_attachment(file).await?;
        if bytes.is_empty() {
            return Err(MediaError::Empty {
                name: file.name.clone(),
            });
        }
        let mime_type = file.resolved_mime_type();
        self.upload(&file.name, &mime_type, bytes)
            .await
            .map_err(|err| {
                warn!(?slot, file = %file.name, %err, "upload failed");
                MediaError::Upload {
                    name: file.name.clone(),
                    reason: err.to_string(),
                }
            })
    }
}
