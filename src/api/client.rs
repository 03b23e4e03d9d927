use std::time::{Duration, SystemTime};

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::oauth::{GOOGLE_TOKEN_ENDPOINT, refresh_access_token};
use crate::auth::{AccessToken, Credentials};
use crate::error::{AppError, AppResult};

use super::redact::redact_secrets;

pub const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Query parameters; a key may repeat.
pub type Query<'a> = [(&'a str, String)];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub token_endpoint: String,
    pub refresh_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: GMAIL_API_BASE_URL.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            refresh_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Authenticated Gmail REST client for a single account.
///
/// Access tokens are minted from the refresh token on demand. A request
/// rejected with 401 is retried exactly once after a forced refresh. Every
/// error message leaving the client has the account secrets scrubbed.
///
/// Calls take `&mut self` because they may replace the cached token; one
/// client serves one task at a time.
#[derive(Debug)]
pub struct GmailClient {
    http: Client,
    config: ClientConfig,
    credentials: Credentials,
    token: Option<AccessToken>,
}

impl GmailClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            credentials,
            token: None,
        }
    }

    /// Seeds a token obtained elsewhere so the first call skips the refresh.
    pub fn with_access_token(mut self, token: impl Into<String>, expires_at: SystemTime) -> Self {
        self.token = Some(AccessToken::new(token, expires_at));
        self
    }

    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(AccessToken::secret)
    }

    pub fn redact(&self, message: &str) -> String {
        let secrets = self
            .credentials
            .secrets()
            .into_iter()
            .chain(self.access_token());
        redact_secrets(message, secrets)
    }

    pub async fn get<T: DeserializeOwned>(&mut self, endpoint: &str, query: &Query<'_>) -> AppResult<T> {
        self.request(Method::GET, endpoint, query, None).await
    }

    pub async fn post<B, T>(&mut self, endpoint: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, endpoint, &[], Some(body)).await
    }

    /// DELETE with the same refresh and retry rules; the (usually empty)
    /// response body is discarded.
    pub async fn delete(&mut self, endpoint: &str) -> AppResult<()> {
        let _: Value = self.request(Method::DELETE, endpoint, &[], None).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &mut self,
        method: Method,
        endpoint: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> AppResult<T> {
        let result = self.send_with_retry(method, endpoint, query, body).await;
        result.map_err(|err| err.map_message(|message| self.redact(message)))
    }

    async fn send_with_retry<T: DeserializeOwned>(
        &mut self,
        method: Method,
        endpoint: &str,
        query: &Query<'_>,
        body: Option<Value>,
    ) -> AppResult<T> {
        self.ensure_access_token().await?;

        let url = self.endpoint_url(endpoint, query)?;
        tracing::debug!("{method} {url}");

        let mut response = self.send(&method, &url, body.as_ref()).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!("access token rejected, refreshing and retrying once");
            self.token = None;
            self.ensure_access_token().await?;
            response = self.send(&method, &url, body.as_ref()).await?;
        }

        parse_response(response).await
    }

    async fn ensure_access_token(&mut self) -> AppResult<()> {
        if self
            .token
            .as_ref()
            .is_some_and(|token| token.is_fresh(SystemTime::now()))
        {
            return Ok(());
        }

        tracing::debug!("refreshing access token");
        let token = refresh_access_token(
            &self.http,
            &self.config.token_endpoint,
            &self.credentials,
            self.config.refresh_timeout,
        )
        .await?;
        self.token = Some(token);
        tracing::debug!("access token refreshed");
        Ok(())
    }

    async fn send(&self, method: &Method, url: &Url, body: Option<&Value>) -> AppResult<Response> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(self.access_token().unwrap_or_default())
            .header(ACCEPT, "application/json")
            .timeout(self.config.request_timeout);

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    fn endpoint_url(&self, endpoint: &str, query: &Query<'_>) -> AppResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        ))?;

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }

        Ok(url)
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if status.as_u16() >= 400 {
        return Err(AppError::Api {
            status: status.as_u16(),
            message: api_error_message(status, &body),
        });
    }

    let body = if body.trim().is_empty() { "{}" } else { &body };
    // serde messages can quote response values, so keep them redactable
    serde_json::from_str(body).map_err(|err| AppError::Decode(err.to_string()))
}

fn api_error_message(status: StatusCode, body: &str) -> String {
    let error = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("error").map(Value::take));

    match error {
        Some(Value::String(message)) => message,
        Some(error) => match error.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        },
        None => format!("HTTP {}", status.as_u16()),
    }
}
