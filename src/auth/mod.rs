pub mod oauth;
pub mod token;
pub mod token_store;

pub use oauth::{AuthLoginResult, AuthService, AuthStatus, refresh_access_token};
pub use token::{AccessToken, Credentials, StoredAccount};
pub use token_store::{CredentialStore, FileCredentialStore};
