use crate::ports::outbound::{Credential, CredentialProvider};
use crate::shared::error::SyncError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// How the run authenticates against the catalog
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A pre-issued token, with or without the `Bearer ` prefix
    StaticToken(String),
    /// OAuth client-credentials grant against `auth_url`
    ClientCredentials {
        client_id: String,
        client_secret: String,
        auth_url: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::StaticToken(_) => f.write_str("StaticToken(***)"),
            Credentials::ClientCredentials {
                client_id, auth_url, ..
            } => f
                .debug_struct("ClientCredentials")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .field("auth_url", auth_url)
                .finish(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default, alias = "accessToken")]
    access_token: Option<String>,
}

/// PortAuthenticator adapter implementing the CredentialProvider port
///
/// Static tokens get a `Bearer ` prefix unless they already carry one. Client
/// credentials are exchanged once; the token request is never retried.
pub struct PortAuthenticator {
    credentials: Credentials,
    client: reqwest::Client,
}

impl PortAuthenticator {
    const TIMEOUT_SECONDS: u64 = 30;
    const BEARER_SCHEME: &'static str = "Bearer";

    pub fn new(credentials: Credentials) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(format!("eol-sync/{}", version))
            .build()?;

        Ok(Self {
            credentials,
            client,
        })
    }

    /// Returns the header value for a token, adding `Bearer ` unless present
    ///
    /// A token that already carries the scheme is used as configured.
    fn bearer(token: &str) -> Result<Credential> {
        let token = token.trim();
        let (prefixed, raw) = match token.split_once(char::is_whitespace) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case(Self::BEARER_SCHEME) => {
                (true, rest.trim())
            }
            None if token.eq_ignore_ascii_case(Self::BEARER_SCHEME) => (true, ""),
            _ => (false, token),
        };

        if raw.is_empty() {
            return Err(SyncError::Authentication {
                details: "token is empty".to_string(),
            }
            .into());
        }

        if prefixed {
            Ok(Credential::new(token))
        } else {
            Ok(Credential::new(format!("{} {}", Self::BEARER_SCHEME, raw)))
        }
    }

    async fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        auth_url: &str,
    ) -> Result<Credential> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let response = self
            .client
            .post(auth_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| SyncError::Authentication {
                details: format!("token endpoint {} unreachable: {}", auth_url, e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Authentication {
                details: format!("token endpoint {} returned {}", auth_url, status),
            }
            .into());
        }

        let body: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| SyncError::Authentication {
                    details: format!("invalid token response: {}", e),
                })?;

        let token = body.access_token.ok_or_else(|| SyncError::Authentication {
            details: "token response has no access_token".to_string(),
        })?;

        Self::bearer(&token)
    }
}

#[async_trait]
impl CredentialProvider for PortAuthenticator {
    async fn credential(&self) -> Result<Credential> {
        match &self.credentials {
            Credentials::StaticToken(token) => Self::bearer(token),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
                auth_url,
            } => self.exchange(client_id, client_secret, auth_url).await,
        }
    }
}
