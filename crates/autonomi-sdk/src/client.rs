//! The API client and its builder.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use autonomi_core::{AccountId, Data, SelfInfo, WorkspaceId};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::http::{ApiRequest, HttpBackend, ReqwestBackend};
use crate::poll::PollConfig;

/// Client for the provisioning API.
///
/// Cheap to clone; clones share the underlying HTTP connection pool. The poll
/// configuration is fixed for the lifetime of a client, use
/// [`Client::with_poll_config`] to derive one with different settings.
#[derive(Clone)]
pub struct Client {
    backend: Arc<dyn HttpBackend>,
    account_id: AccountId,
    poll: PollConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("account_id", &self.account_id)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Assemble a client from an existing backend and a known account.
    ///
    /// No request is made; use [`ClientBuilder`] to discover the account from
    /// the personal access token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPollConfig`] if `poll` allows no attempt.
    pub fn from_parts(
        backend: Arc<dyn HttpBackend>,
        account_id: AccountId,
        poll: PollConfig,
    ) -> Result<Self> {
        poll.validate()?;
        Ok(Self {
            backend,
            account_id,
            poll,
        })
    }

    /// A client sharing this one's backend and account but polling with `poll`.
    ///
    /// Polls already running on `self` are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPollConfig`] if `poll` allows no attempt.
    pub fn with_poll_config(&self, poll: PollConfig) -> Result<Self> {
        Self::from_parts(Arc::clone(&self.backend), self.account_id, poll)
    }

    /// The account every account-scoped call operates on.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The poll configuration used by lifecycle operations.
    #[must_use]
    pub const fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Look up the account the personal access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn get_self(&self) -> Result<AccountId> {
        fetch_self(self.backend.as_ref()).await
    }

    pub(crate) fn account_path(&self) -> String {
        format!("/accounts/{}", self.account_id)
    }

    pub(crate) fn workspace_path(&self, workspace_id: WorkspaceId) -> String {
        format!("/accounts/{}/workspaces/{workspace_id}", self.account_id)
    }

    pub(crate) async fn send(&self, request: ApiRequest) -> Result<Vec<u8>> {
        self.backend.execute(request).await
    }

    /// `GET` a bare JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        decode(&self.send(ApiRequest::get(path)).await?)
    }

    /// `GET` a body wrapped in the `{"data": ...}` envelope.
    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json::<Data<T>>(path).await.map(Data::into_inner)
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::post(path, encode(body)?);
        decode(&self.send(request).await?)
    }

    pub(crate) async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_json::<B, Data<T>>(path, body)
            .await
            .map(Data::into_inner)
    }

    pub(crate) async fn patch_data<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = ApiRequest::patch(path, encode(body)?);
        decode::<Data<T>>(&self.send(request).await?).map(Data::into_inner)
    }

    /// `DELETE` and discard whatever the backend answers.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(ApiRequest::delete(path)).await.map(drop)
    }
}

pub(crate) fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ClientError::Decode(format!("failed to encode body: {e}")))
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn fetch_self(backend: &dyn HttpBackend) -> Result<AccountId> {
    let body = backend.execute(ApiRequest::get("/users/self")).await?;
    decode::<SelfInfo>(&body).map(|info| info.account_id)
}

/// Builder for [`Client`].
///
/// The caller must accept the terms and conditions and supply a host URL and
/// a personal access token. [`ClientBuilder::build`] then discovers the
/// account through `GET /users/self`.
#[derive(Default)]
pub struct ClientBuilder {
    terms_accepted: bool,
    host_url: Option<String>,
    token: Option<String>,
    http_client: Option<reqwest::Client>,
    poll: PollConfig,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("terms_accepted", &self.terms_accepted)
            .field("host_url", &self.host_url)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Record whether the caller accepted the terms and conditions.
    #[must_use]
    pub fn terms_accepted(mut self, accepted: bool) -> Self {
        self.terms_accepted = accepted;
        self
    }

    /// Set the API host URL, e.g. `https://api.autonomi-platform.com`.
    #[must_use]
    pub fn host_url(mut self, url: impl Into<String>) -> Self {
        self.host_url = Some(url.into());
        self
    }

    /// Set the personal access token sent as a bearer token.
    #[must_use]
    pub fn personal_access_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Use a preconfigured `reqwest` client instead of the default one.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Replace the whole poll configuration.
    #[must_use]
    pub fn poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Set the pause between two polls (default 30 s).
    #[must_use]
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.poll.retry_interval = interval;
        self
    }

    /// Set the maximum number of polls (default 60).
    #[must_use]
    pub fn max_retry(mut self, max_retry: u32) -> Self {
        self.poll.max_retry = max_retry;
        self
    }

    /// Validate the configuration and discover the account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TermsNotAccepted`], [`ClientError::MissingHostUrl`],
    /// [`ClientError::MissingToken`] or [`ClientError::InvalidPollConfig`] for
    /// configuration mistakes, checked in that order before any request is made,
    /// and any request error from `GET /users/self`.
    pub async fn build(self) -> Result<Client> {
        if !self.terms_accepted {
            return Err(ClientError::TermsNotAccepted);
        }
        let host_url = self
            .host_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ClientError::MissingHostUrl)?;
        let token = self
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or(ClientError::MissingToken)?;
        self.poll.validate()?;

        let backend = match self.http_client {
            Some(client) => ReqwestBackend::with_client(client, host_url, token),
            None => ReqwestBackend::new(host_url, token)?,
        };
        let account_id = fetch_self(&backend).await?;
        tracing::info!(account_id = %account_id, host_url = %backend.base_url(), "Client ready");

        Client::from_parts(Arc::new(backend), account_id, self.poll)
    }
}
