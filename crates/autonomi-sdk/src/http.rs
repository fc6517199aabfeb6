//! Transport adapter for the provisioning API.
//!
//! Every call goes through [`HttpBackend::execute`], which performs one
//! authenticated request and returns the raw response body. Non-success
//! statuses surface as [`ClientError::Api`] with the numeric status code so
//! callers can recognise `404 Not Found` without inspecting message text.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Maximum length of a response body written to the logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate a response body and strip control characters before logging it.
fn sanitize_for_log(body: &str) -> String {
    let mut truncated: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
    if truncated.len() < body.len() {
        truncated.push_str(&format!("... [truncated, {} bytes total]", body.len()));
    }
    truncated.replace(|c: char| c.is_control(), "")
}

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// One request against the API, relative to the host URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path starting with `/`, e.g. `/accounts/{id}/workspaces`.
    pub path: String,
    /// Query string parameters.
    pub query: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// A `POST` request carrying `body`.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::Post, path)
        }
    }

    /// A `PATCH` request carrying `body`.
    #[must_use]
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::Patch, path)
        }
    }

    /// A `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Executes requests against the provisioning API.
///
/// Abstracted so the poll engine and lifecycle operations can be driven by a
/// scripted backend in tests.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Perform `request` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if no response was received and
    /// [`ClientError::Api`] if the backend answered with a status of 400 or above.
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>>;
}

/// [`HttpBackend`] over `reqwest`.
#[derive(Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for ReqwestBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestBackend")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ReqwestBackend {
    /// Create a backend talking to `base_url` with a personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url, token))
    }

    /// Create a backend with a caller-supplied `reqwest` client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// The host URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, url = %url, "Sending API request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("{} {url} failed: {e}", request.method)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {e}")))?;

        if status.is_client_error() || status.is_server_error() {
            let body = String::from_utf8_lossy(&body).into_owned();
            if status == reqwest::StatusCode::NOT_FOUND {
                tracing::debug!(url = %url, "API returned 404");
            } else {
                tracing::error!(
                    status = %status,
                    body = %sanitize_for_log(&body),
                    "API error"
                );
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.to_vec())
    }
}

/// A scripted backend for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::{HashMap, VecDeque};

    use parking_lot::Mutex;

    use super::{async_trait, ApiRequest, ClientError, HttpBackend, Method, Result, Value};

    /// A canned response for [`MockBackend`].
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        /// `200 OK` with a JSON body.
        Ok(Value),
        /// `200 OK` with an empty body.
        Empty,
        /// A non-success status with an empty body.
        Status(u16),
        /// The request never produced a response.
        TransportError(String),
    }

    impl MockResponse {
        /// `200 OK` wrapping `data` in the `{"data": ...}` envelope.
        #[must_use]
        pub fn data(data: Value) -> Self {
            Self::Ok(serde_json::json!({ "data": data }))
        }
    }

    /// A backend answering from per-route FIFO queues.
    ///
    /// When a route's queue is down to its last response, that response keeps
    /// being returned. A route with no responses yields a transport error.
    #[derive(Default)]
    pub struct MockBackend {
        routes: Mutex<HashMap<(Method, String), VecDeque<MockResponse>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl MockBackend {
        /// Create an empty mock backend.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue `response` for `method path`.
        pub fn push(&self, method: Method, path: impl Into<String>, response: MockResponse) {
            self.routes
                .lock()
                .entry((method, path.into()))
                .or_default()
                .push_back(response);
        }

        /// Queue several responses for `method path`, in order.
        pub fn script(
            &self,
            method: Method,
            path: impl Into<String>,
            responses: impl IntoIterator<Item = MockResponse>,
        ) {
            self.routes
                .lock()
                .entry((method, path.into()))
                .or_default()
                .extend(responses);
        }

        /// Number of requests received for `method path`.
        #[must_use]
        pub fn calls(&self, method: Method, path: &str) -> usize {
            self.requests
                .lock()
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .count()
        }

        /// Every request received, in order.
        #[must_use]
        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl HttpBackend for MockBackend {
        async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>> {
            let key = (request.method, request.path.clone());
            self.requests.lock().push(request);

            let response = {
                let mut routes = self.routes.lock();
                let queue = routes.get_mut(&key);
                match queue {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };

            match response {
                Some(MockResponse::Ok(value)) => serde_json::to_vec(&value)
                    .map_err(|e| ClientError::Decode(format!("mock body: {e}"))),
                Some(MockResponse::Empty) => Ok(Vec::new()),
                Some(MockResponse::Status(status)) => Err(ClientError::Api {
                    status,
                    body: String::new(),
                }),
                Some(MockResponse::TransportError(message)) => Err(ClientError::Transport(message)),
                None => Err(ClientError::Transport(format!(
                    "no mock response for {} {}",
                    key.0, key.1
                ))),
            }
        }
    }
}
