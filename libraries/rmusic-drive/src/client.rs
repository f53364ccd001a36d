//! Drive API client.

use crate::auth::CredentialProvider;
use crate::error::{DriveClientError, Result};
use crate::types::{quote, DriveConfig, DriveFile, FileList, FOLDER_MIME_TYPE};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rmusic_core::{FileKind, FilePage, FileStore, RemoteFile};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the drive v3 files API.
///
/// Implements [`FileStore`], so it can be handed straight to the playback
/// session and to library discovery.
///
/// # Example
///
/// ```ignore
/// use rmusic_drive::{DriveClient, DriveConfig, StaticCredential};
/// use rmusic_core::FileStore;
/// use std::sync::Arc;
///
/// let client = DriveClient::new(
///     DriveConfig::default(),
///     Arc::new(StaticCredential::new("token")),
/// )?;
/// let bytes = client.fetch_bytes("1abc2def").await?;
/// ```
pub struct DriveClient {
    http: Client,
    base_url: String,
    page_size: u32,
    credentials: Arc<dyn CredentialProvider>,
}

impl DriveClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DriveConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        // Validate URL
        if config.api_base_url.is_empty() {
            return Err(DriveClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(DriveClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("rMusic/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            page_size: config.page_size.max(1),
            credentials,
        })
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.base_url)
    }

    fn file_url(&self, file_id: &str) -> String {
        format!("{}/drive/v3/files/{}", self.base_url, file_id)
    }

    /// Send a request with the current bearer token.
    ///
    /// On 401 the provider is told the token expired and the request is
    /// retried once with whatever token it hands out next.
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let token = self.credentials.access_token().await?;
        let response = build()
            .bearer_auth(token)
            .send()
            .await
            .map_err(DriveClientError::from_send)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        warn!("Access token rejected, requesting a fresh one");
        self.credentials.invalidate().await;

        let token = self.credentials.access_token().await?;
        let response = build()
            .bearer_auth(token)
            .send()
            .await
            .map_err(DriveClientError::from_send)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.credentials.invalidate().await;
            return Err(DriveClientError::AuthRequired);
        }

        check_status(response).await
    }

    async fn query(&self, q: &str, fields: &str, page_token: Option<&str>) -> Result<FileList> {
        let url = self.files_url();
        let page_size = self.page_size.to_string();
        debug!(url = %url, q = %q, page_token = ?page_token, "Listing files");

        let response = self
            .send(|| {
                let mut params: Vec<(&str, &str)> =
                    vec![("q", q), ("fields", fields), ("pageSize", page_size.as_str())];
                if let Some(token) = page_token {
                    params.push(("pageToken", token));
                }
                self.http.get(&url).query(&params)
            })
            .await?;

        response
            .json()
            .await
            .map_err(|e| DriveClientError::Parse(format!("Failed to parse file list: {}", e)))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(DriveClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FileStore for DriveClient {
    async fn find_by_name(
        &self,
        name: &str,
        parent: Option<&str>,
        kind: FileKind,
    ) -> rmusic_core::Result<Vec<RemoteFile>> {
        let mime_clause = match kind {
            FileKind::Folder => format!("mimeType = {}", quote(FOLDER_MIME_TYPE)),
            FileKind::File => format!("mimeType != {}", quote(FOLDER_MIME_TYPE)),
        };
        let mut q = format!("name = {} and {} and trashed = false", quote(name), mime_clause);
        if let Some(parent) = parent {
            q.push_str(&format!(" and {} in parents", quote(parent)));
        }

        let list = self.query(&q, "files(id, name, mimeType)", None).await?;
        debug!(name = %name, matches = list.files.len(), "Name lookup finished");

        Ok(list.files.into_iter().map(RemoteFile::from).collect())
    }

    async fn list_children(
        &self,
        folder_id: &str,
        page_token: Option<&str>,
    ) -> rmusic_core::Result<FilePage> {
        let q = format!("{} in parents and trashed = false", quote(folder_id));
        let list = self
            .query(&q, "nextPageToken, files(id, name, mimeType)", page_token)
            .await?;

        Ok(list.into())
    }

    async fn fetch_bytes(&self, file_id: &str) -> rmusic_core::Result<Bytes> {
        let url = self.file_url(file_id);
        debug!(url = %url, file_id = %file_id, "Downloading file");

        let response = self
            .send(|| self.http.get(&url).query(&[("alt", "media")]))
            .await?;
        let bytes = response.bytes().await.map_err(DriveClientError::from)?;

        info!(file_id = %file_id, size = bytes.len(), "File downloaded");
        Ok(bytes)
    }

    async fn file_name(&self, file_id: &str) -> rmusic_core::Result<String> {
        let url = self.file_url(file_id);

        let response = self
            .send(|| self.http.get(&url).query(&[("fields", "id,name,mimeType")]))
            .await?;
        let file: DriveFile = response.json().await.map_err(|e| {
            DriveClientError::Parse(format!("Failed to parse file metadata: {}", e))
        })?;

        Ok(file.name)
    }
}
