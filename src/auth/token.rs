use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::api::redact::REDACTED;

/// OAuth client identity plus the long-lived refresh token of one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn secrets(&self) -> [&str; 3] {
        [&self.client_id, &self.client_secret, &self.refresh_token]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("refresh_token", &REDACTED)
            .finish()
    }
}

/// Short-lived bearer token with its absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: SystemTime,
}

impl AccessToken {
    /// Tokens this close to expiry are treated as already expired.
    pub const EXPIRY_SKEW: Duration = Duration::from_secs(60);

    pub fn new(token: impl Into<String>, expires_at: SystemTime) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// `None` when `expires_in` runs past what `SystemTime` can represent.
    pub fn expiring_in(token: impl Into<String>, expires_in: Duration) -> Option<Self> {
        let expires_at = SystemTime::now().checked_add(expires_in)?;
        Some(Self::new(token, expires_at))
    }

    pub fn secret(&self) -> &str {
        &self.token
    }

    pub fn is_fresh(&self, now: SystemTime) -> bool {
        now + Self::EXPIRY_SKEW < self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &REDACTED)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// What `auth login` persists for a profile.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredAccount {
    #[serde(default)]
    pub email: Option<String>,
    pub refresh_token: String,
}

impl fmt::Debug for StoredAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredAccount")
            .field("email", &self.email)
            .field("refresh_token", &REDACTED)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_inside_skew_is_stale() {
        let now = SystemTime::now();
        let token = AccessToken::new("ya29.token", now + Duration::from_secs(59));
        assert!(!token.is_fresh(now));

        let token = AccessToken::new("ya29.token", now + Duration::from_secs(3600));
        assert!(token.is_fresh(now));
    }

    #[test]
    fn unrepresentable_lifetime_is_rejected() {
        assert!(AccessToken::expiring_in("ya29.token", Duration::from_secs(u64::MAX)).is_none());

        let token = AccessToken::expiring_in("ya29.token", Duration::from_secs(3600)).expect("token");
        assert!(token.is_fresh(SystemTime::now()));
    }

    #[test]
    fn debug_hides_secrets() {
        let credentials = Credentials::new("client-id", "client-secret-value", "1//refresh-token");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("client-id"));
        assert!(!rendered.contains("client-secret-value"));
        assert!(!rendered.contains("1//refresh-token"));
    }
}
