use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use url::Url;

use crate::config::Settings;
use crate::error::{AppError, AppResult};

use super::token::{AccessToken, Credentials, StoredAccount};
use super::token_store::CredentialStore;

pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_REVOKE_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";
const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const OAUTH_SCOPES: &str = "https://www.googleapis.com/auth/gmail.modify openid email";
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(180);
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLoginResult {
    pub profile: String,
    pub email: Option<String>,
    pub opened_browser: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub profile: String,
    pub logged_in: bool,
    pub email: Option<String>,
    pub note: Option<String>,
}

/// Exchanges a refresh token for a fresh access token.
///
/// Every failure, transport included, surfaces as [`AppError::Auth`]. The
/// message is not redacted here; callers holding the secrets do that.
pub async fn refresh_access_token(
    http: &Client,
    token_endpoint: &str,
    credentials: &Credentials,
    timeout: Duration,
) -> AppResult<AccessToken> {
    let form = [
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("refresh_token", credentials.refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];

    let response = http
        .post(token_endpoint)
        .form(&form)
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| AppError::Auth(format!("token refresh failed: {err}")))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| AppError::Auth(format!("token refresh failed: {err}")))?;

    if status != StatusCode::OK {
        return Err(AppError::Auth(oauth_error_message(&body)));
    }

    let grant: TokenGrant = serde_json::from_str(&body)
        .map_err(|err| AppError::Auth(format!("malformed token response: {err}")))?;

    let expires_in = grant.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    AccessToken::expiring_in(grant.access_token, Duration::from_secs(expires_in)).ok_or_else(|| {
        AppError::Auth(format!(
            "malformed token response: expires_in {expires_in} out of range"
        ))
    })
}

fn oauth_error_message(body: &str) -> String {
    serde_json::from_str::<OAuthErrorResponse>(body)
        .ok()
        .and_then(|err| err.error_description.or(err.error))
        .unwrap_or_else(|| "token refresh failed".to_string())
}

#[derive(Debug, Clone)]
pub struct AuthService {
    http: Client,
}

impl AuthService {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn login<S: CredentialStore>(
        &self,
        profile: &str,
        settings: &Settings,
        store: &S,
    ) -> AppResult<AuthLoginResult> {
        let client = OAuthClient::from_settings(settings)?;
        let flow = LoginFlow::start(&client)?;

        let opened_browser = open_browser(&flow.authorization_url);
        if !opened_browser {
            eprintln!(
                "open this URL in your browser to continue login:\n{}",
                flow.authorization_url
            );
        }

        let listener = CallbackListener::bind(&client.redirect_uri).await?;
        let code = time::timeout(CALLBACK_TIMEOUT, listener.accept_code(&flow.state))
            .await
            .map_err(|_| AppError::Auth("timed out waiting for oauth callback".to_string()))??;

        let grant = self.exchange_code(&client, &code, &flow.code_verifier).await?;
        let refresh_token = grant.refresh_token.ok_or_else(|| {
            AppError::Auth("google did not return a refresh token; revoke access and retry".into())
        })?;

        let email = match self.fetch_email(&grant.access_token).await {
            Ok(email) => email,
            Err(err) => {
                tracing::warn!(error = %err, "could not look up account email");
                None
            }
        };

        store.save(
            profile,
            &StoredAccount {
                email: email.clone(),
                refresh_token,
            },
        )?;
        tracing::info!(profile, "stored account credentials");

        Ok(AuthLoginResult {
            profile: profile.to_string(),
            email,
            opened_browser,
        })
    }

    pub fn status<S: CredentialStore>(&self, profile: &str, store: &S) -> AppResult<AuthStatus> {
        let account = store.load(profile)?;
        Ok(AuthStatus {
            profile: profile.to_string(),
            logged_in: account.is_some(),
            email: account.and_then(|account| account.email),
            note: None,
        })
    }

    pub async fn logout<S: CredentialStore>(
        &self,
        profile: &str,
        store: &S,
    ) -> AppResult<AuthStatus> {
        let note = match store.load(profile)? {
            Some(account) => match self.revoke(&account.refresh_token).await {
                Ok(()) => "refresh token revoked and local account removed",
                Err(err) => {
                    tracing::warn!(error = %err, "token revocation failed");
                    "local account removed (revocation failed)"
                }
            },
            None => "no stored account",
        };

        store.clear(profile)?;

        Ok(AuthStatus {
            profile: profile.to_string(),
            logged_in: false,
            email: None,
            note: Some(note.to_string()),
        })
    }

    async fn exchange_code(
        &self,
        client: &OAuthClient,
        code: &str,
        code_verifier: &str,
    ) -> AppResult<TokenGrant> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", client.redirect_uri.as_str()),
            ("code_verifier", code_verifier),
        ];

        let response = self
            .http
            .post(GOOGLE_TOKEN_ENDPOINT)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AppError::Auth(format!(
                "authorization code exchange failed ({status}): {}",
                oauth_error_message(&body)
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_email(&self, access_token: &str) -> AppResult<Option<String>> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_ENDPOINT)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let payload: UserInfoResponse = response.json().await?;
        Ok(payload.email)
    }

    async fn revoke(&self, token: &str) -> AppResult<()> {
        let response = self
            .http
            .post(GOOGLE_REVOKE_ENDPOINT)
            .form(&[("token", token)])
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(AppError::Auth(format!(
            "revoke endpoint returned {}",
            response.status()
        )))
    }
}

#[derive(Debug)]
struct OAuthClient {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    fn from_settings(settings: &Settings) -> AppResult<Self> {
        Ok(Self {
            client_id: settings.client_id()?.to_string(),
            client_secret: settings.client_secret()?.to_string(),
            redirect_uri: settings.redirect_uri(),
        })
    }
}

#[derive(Debug)]
struct LoginFlow {
    authorization_url: String,
    code_verifier: String,
    state: String,
}

impl LoginFlow {
    fn start(client: &OAuthClient) -> AppResult<Self> {
        let state = random_token(32);
        let code_verifier = random_token(64);

        let mut url = Url::parse(GOOGLE_AUTH_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &client.client_id)
            .append_pair("redirect_uri", &client.redirect_uri)
            .append_pair("scope", OAUTH_SCOPES)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", &state)
            .append_pair("code_challenge", &pkce_challenge(&code_verifier))
            .append_pair("code_challenge_method", "S256");

        Ok(Self {
            authorization_url: url.into(),
            code_verifier,
            state,
        })
    }
}

/// One-shot HTTP listener on the loopback redirect URI.
struct CallbackListener {
    listener: TcpListener,
    path: String,
}

impl CallbackListener {
    async fn bind(redirect_uri: &str) -> AppResult<Self> {
        let redirect = Url::parse(redirect_uri)?;
        if redirect.scheme() != "http" {
            return Err(AppError::Config(
                "redirect_uri must be a plain http loopback address".to_string(),
            ));
        }

        let host = redirect
            .host_str()
            .ok_or_else(|| AppError::Config("redirect_uri has no host".to_string()))?;
        let port = redirect
            .port_or_known_default()
            .ok_or_else(|| AppError::Config("redirect_uri has no port".to_string()))?;

        let listener = TcpListener::bind((host, port)).await.map_err(|err| {
            AppError::Auth(format!("cannot listen for oauth callback on {host}:{port}: {err}"))
        })?;
        tracing::debug!(host, port, "waiting for oauth callback");

        Ok(Self {
            listener,
            path: redirect.path().to_string(),
        })
    }

    async fn accept_code(self, expected_state: &str) -> AppResult<String> {
        let (mut stream, _) = self.listener.accept().await?;

        let mut buf = vec![0_u8; 8192];
        let read = stream.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..read]);
        let mut request_line = request.lines().next().unwrap_or_default().split_whitespace();

        let outcome = match (request_line.next(), request_line.next()) {
            (Some("GET"), Some(target)) => extract_callback_code(target, &self.path, expected_state),
            _ => Err(AppError::Auth("malformed oauth callback request".to_string())),
        };

        let (status, message) = match &outcome {
            Ok(_) => ("200 OK", "gmcli login complete. you can close this tab.".to_string()),
            Err(err) => ("400 Bad Request", format!("login failed: {err}")),
        };
        if let Err(err) = respond(&mut stream, status, &message).await {
            tracing::debug!(error = %err, "could not answer oauth callback");
        }

        outcome
    }
}

fn extract_callback_code(
    target: &str,
    expected_path: &str,
    expected_state: &str,
) -> AppResult<String> {
    let url = Url::parse(&format!("http://localhost{target}"))?;
    if url.path() != expected_path {
        return Err(AppError::Auth(format!(
            "unexpected oauth callback path {}",
            url.path()
        )));
    }

    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(error) = param("error") {
        let description = param("error_description").unwrap_or_default();
        return Err(AppError::Auth(format!(
            "authorization denied: {error} {description}"
        )));
    }

    if param("state").as_deref() != Some(expected_state) {
        return Err(AppError::Auth(
            "oauth state mismatch; aborting login".to_string(),
        ));
    }

    param("code").ok_or_else(|| AppError::Auth("oauth callback carried no code".to_string()))
}

async fn respond(stream: &mut TcpStream, status: &str, message: &str) -> AppResult<()> {
    let body = format!(
        "<!doctype html><html><body><p>{}</p></body></html>",
        html_escape::encode_text(message)
    );
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    email: Option<String>,
}

fn random_token(len: usize) -> String {
    let mut bytes = vec![0_u8; len];
    rand::thread_rng().fill(bytes.as_mut_slice());
    URL_SAFE_NO_PAD.encode(bytes)
}

fn pkce_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

fn open_browser(url: &str) -> bool {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut command = std::process::Command::new("cmd");
        command.args(["/C", "start", ""]);
        command
    } else {
        std::process::Command::new("xdg-open")
    };

    command
        .arg(url)
        .status()
        .is_ok_and(|status| status.success())
}
