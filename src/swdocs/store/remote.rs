//! A [`DocumentStore`] that talks to a running `swdocs serve` over HTTP.
//!
//! Each store call maps to one REST request:
//! - `create` → `POST /api/swdocs`
//! - `upsert` → `PUT /api/swdocs`
//! - `get_by_name` → `GET /api/swdocs/{name}`
//! - `search` → `GET /api/search?q=…`
//! - `list_recent` → `GET /api/swdocs?order=…&limit=…`
//! - `delete` → `DELETE /api/swdocs/{name}`
//!
//! Error statuses are mapped back onto [`SwdocsError`] so callers can't tell
//! a remote store from a local one, except that write-gate timeouts on the
//! server arrive as [`SwdocsError::Remote`].

use super::{DocumentStore, RecentOrder};
use crate::error::{Result, SwdocsError};
use crate::model::{Document, DocumentPayload, DocumentSummary};
use crate::pattern::SearchPattern;
use crate::server::USER_HEADER;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    deleted: bool,
}

pub struct RemoteStore {
    client: Client,
    base_url: Url,
    user: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SwdocsError::Remote(e.to_string()))?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SwdocsError::Remote(format!("invalid server url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SwdocsError::Remote(format!(
                "invalid server url '{}'",
                base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            user: None,
        })
    }

    /// Identity sent with every request; the server records it as `user`.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.user {
            Some(user) => request.header(USER_HEADER, user),
            None => request,
        };
        request
            .send()
            .map_err(|e| SwdocsError::Remote(e.to_string()))
    }

    fn read_json<T: DeserializeOwned>(&self, response: Response, subject: &str) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .map_err(|e| SwdocsError::Remote(format!("malformed response: {}", e)));
        }
        let message = response
            .json::<ErrorBody>()
            .map(|body| body.error)
            .unwrap_or_else(|_| status.to_string());
        Err(match status {
            StatusCode::BAD_REQUEST => SwdocsError::Validation(message),
            StatusCode::NOT_FOUND => SwdocsError::NotFound(subject.to_string()),
            StatusCode::CONFLICT => SwdocsError::DuplicateName(subject.to_string()),
            _ => SwdocsError::Remote(format!("{}: {}", status, message)),
        })
    }
}

impl DocumentStore for RemoteStore {
    fn create(&self, payload: &DocumentPayload) -> Result<Document> {
        let response = self.send(self.client.post(self.url(&["api", "swdocs"])).json(payload))?;
        self.read_json(response, &payload.name)
    }

    fn upsert(&self, payload: &DocumentPayload) -> Result<Document> {
        let response = self.send(self.client.put(self.url(&["api", "swdocs"])).json(payload))?;
        self.read_json(response, &payload.name)
    }

    fn get_by_name(&self, name: &str) -> Result<Document> {
        let response = self.send(self.client.get(self.url(&["api", "swdocs", name])))?;
        self.read_json(response, name)
    }

    fn search(&self, pattern: &SearchPattern) -> Result<Vec<DocumentSummary>> {
        let request = self
            .client
            .get(self.url(&["api", "search"]))
            .query(&[("q", pattern.as_like())]);
        let response = self.send(request)?;
        self.read_json(response, pattern.as_like())
    }

    fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<Vec<DocumentSummary>> {
        let request = self
            .client
            .get(self.url(&["api", "swdocs"]))
            .query(&[("order", order.as_str().to_string()), ("limit", limit.to_string())]);
        let response = self.send(request)?;
        self.read_json(response, order.as_str())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let response = self.send(self.client.delete(self.url(&["api", "swdocs", name])))?;
        let body: DeleteBody = self.read_json(response, name)?;
        Ok(body.deleted)
    }
}
