//! HTTP client for the admin API.
//!
//! Every call is single-shot: one request, one typed result or one [`ApiError`].
//! Tokens and passwords never reach the logs.

mod error;
mod types;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub use self::error::{ApiError, ApiResult, Operation};
pub use self::types::{
    EntityId, EventItem, Page, PageMeta, Quiz, QuizOption, RewardPolicy, display_opt,
    display_or_dash, display_timestamp, display_window,
};
use crate::config::Config;

/// Standard User-Agent header for eventdesk API requests.
pub const USER_AGENT: &str = concat!("eventdesk/", env!("CARGO_PKG_VERSION"));

/// Resolves the configured base URL.
///
/// Strips one trailing `/` so paths can be appended directly.
///
/// # Errors
/// Returns [`ApiError::Configuration`] when the URL is missing, blank or not absolute.
pub fn resolve_base_url(configured: Option<&str>) -> ApiResult<String> {
    let Some(url) = configured.map(str::trim).filter(|s| !s.is_empty()) else {
        return Err(ApiError::missing_base_url());
    };

    url::Url::parse(url)
        .map_err(|e| ApiError::Configuration(format!("Invalid API base URL: {url} ({e})")))?;

    Ok(url.strip_suffix('/').unwrap_or(url).to_string())
}

/// Optional pagination parameters for the quiz list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl QuizQuery {
    pub fn page(page: u32, size: Option<u32>) -> Self {
        Self {
            page: Some(page),
            size,
        }
    }
}

/// Client for the admin API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
    http: reqwest::Client,
}

impl AdminClient {
    /// Creates a client for `base_url` with no request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if the URL cannot be resolved.
    pub fn new(base_url: Option<&str>) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a client from the effective config values.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if the URL cannot be resolved.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::with_timeout(config.effective_api_url(), config.request_timeout())
    }

    /// Creates a client with an optional per-request timeout.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if the URL cannot be resolved
    /// or the HTTP client cannot be built.
    pub fn with_timeout(base_url: Option<&str>, timeout: Option<Duration>) -> ApiResult<Self> {
        let base_url = resolve_base_url(base_url)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, operation: Operation) -> String {
        format!("{}{}", self.base_url, operation.path())
    }

    /// URL for a quiz list request. Parameters are appended only when present.
    pub fn quizzes_url(&self, query: QuizQuery) -> String {
        let mut url = self.endpoint(Operation::QuizList);

        let mut params = url::form_urlencoded::Serializer::new(String::new());
        if let Some(page) = query.page {
            params.append_pair("page", &page.to_string());
        }
        if let Some(size) = query.size {
            params.append_pair("size", &size.to_string());
        }
        let params = params.finish();

        if !params.is_empty() {
            url.push('?');
            url.push_str(&params);
        }
        url
    }

    /// Exchanges admin credentials for an access token.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-success status,
    /// or a response without a non-empty `accessToken`.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<String> {
        let operation = Operation::Login;
        let url = self.endpoint(operation);
        tracing::debug!(%url, "sending login request");

        let request = self
            .http
            .post(&url)
            .json(&json!({ "email": email, "password": password }));
        let body = send(request, operation).await?;

        match body.get("accessToken").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => {
                tracing::debug!("login succeeded");
                Ok(token.to_string())
            }
            _ => {
                tracing::warn!("login response missing accessToken");
                Err(ApiError::MalformedResponse(
                    "response does not contain an accessToken".to_string(),
                ))
            }
        }
    }

    /// Fetches one page of quizzes.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-success status,
    /// or a body that is not an object with a `content` array.
    pub async fn list_quizzes(&self, token: &str, query: QuizQuery) -> ApiResult<Page<Quiz>> {
        let body = self.quizzes_body(token, query).await?;
        decode(body, Operation::QuizList)
    }

    /// Fetches one page of quizzes as the JSON the server sent.
    ///
    /// The body is validated exactly like [`AdminClient::list_quizzes`] but
    /// returned untouched, unknown fields included.
    ///
    /// # Errors
    /// Same as [`AdminClient::list_quizzes`].
    pub async fn list_quizzes_raw(&self, token: &str, query: QuizQuery) -> ApiResult<Value> {
        let body = self.quizzes_body(token, query).await?;
        validated::<Page<Quiz>>(body, Operation::QuizList)
    }

    async fn quizzes_body(&self, token: &str, query: QuizQuery) -> ApiResult<Value> {
        let operation = Operation::QuizList;
        let url = self.quizzes_url(query);
        tracing::debug!(%url, "fetching quizzes");

        let body = send(self.http.get(&url).bearer_auth(token), operation).await?;

        let has_content = body
            .as_object()
            .and_then(|obj| obj.get("content"))
            .is_some_and(Value::is_array);
        if !has_content {
            tracing::warn!("quiz list response is not a paginated envelope");
            return Err(ApiError::unexpected_shape(operation));
        }
        Ok(body)
    }

    /// Fetches all events.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-success status,
    /// or a body that is not an array of events.
    pub async fn list_events(&self, token: &str) -> ApiResult<Vec<EventItem>> {
        let body = self.array_body(token, Operation::EventList).await?;
        decode(body, Operation::EventList)
    }

    /// Fetches all events as the JSON the server sent.
    ///
    /// # Errors
    /// Same as [`AdminClient::list_events`].
    pub async fn list_events_raw(&self, token: &str) -> ApiResult<Value> {
        let body = self.array_body(token, Operation::EventList).await?;
        validated::<Vec<EventItem>>(body, Operation::EventList)
    }

    /// Fetches all reward policies.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failure, non-success status,
    /// or a body that is not an array of policies.
    pub async fn list_reward_policies(&self, token: &str) -> ApiResult<Vec<RewardPolicy>> {
        let body = self.array_body(token, Operation::PolicyList).await?;
        decode(body, Operation::PolicyList)
    }

    /// Fetches all reward policies as the JSON the server sent.
    ///
    /// # Errors
    /// Same as [`AdminClient::list_reward_policies`].
    pub async fn list_reward_policies_raw(&self, token: &str) -> ApiResult<Value> {
        let body = self.array_body(token, Operation::PolicyList).await?;
        validated::<Vec<RewardPolicy>>(body, Operation::PolicyList)
    }

    async fn array_body(&self, token: &str, operation: Operation) -> ApiResult<Value> {
        let url = self.endpoint(operation);
        tracing::debug!(%url, "fetching {operation}");

        let body = send(self.http.get(&url).bearer_auth(token), operation).await?;

        if !body.is_array() {
            tracing::warn!("{operation} response is not an array");
            return Err(ApiError::unexpected_shape(operation));
        }
        Ok(body)
    }
}

/// Sends a request and returns the decoded JSON body of a success response.
async fn send(request: reqwest::RequestBuilder, operation: Operation) -> ApiResult<Value> {
    let response = request.send().await.map_err(|e| {
        tracing::warn!(error = %e, "{operation} request failed to send");
        ApiError::network(operation, &e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "{operation} request rejected");
        return Err(ApiError::http_status(operation, status.as_u16(), &body));
    }

    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "{operation} response body could not be read");
        ApiError::network(operation, &e)
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "{operation} response is not valid JSON");
        ApiError::MalformedResponse(format!("{operation} response is not valid JSON"))
    })
}

/// Decodes a shape-checked body into its typed form. Element errors reject the whole body.
fn decode<T: DeserializeOwned>(body: Value, operation: Operation) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| {
        tracing::warn!(error = %e, "{operation} response could not be decoded");
        ApiError::unexpected_shape(operation)
    })
}

/// Checks that `body` decodes as `T` and hands the untouched body back.
fn validated<T: DeserializeOwned>(body: Value, operation: Operation) -> ApiResult<Value> {
    decode::<T>(body.clone(), operation)?;
    Ok(body)
}
