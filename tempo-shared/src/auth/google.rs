/// Google ID-token verification
///
/// Sign-in hands the backend a Google-issued ID token. We verify it against
/// Google's published JWKS: fetch the RSA keys, pick the one matching the
/// token's `kid`, and check signature, audience (our OAuth client id), and
/// issuer. Keys are cached and refetched when an unknown `kid` shows up,
/// which covers Google's key rotation.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Google's JWKS endpoint for ID-token signing keys
const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Accepted `iss` values for Google ID tokens
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("Failed to fetch Google signing keys: {0}")]
    KeyFetch(#[from] reqwest::Error),

    #[error("Token has no key id")]
    MissingKeyId,

    #[error("No Google signing key matches the token")]
    UnknownKey,

    #[error("Invalid Google token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Google token is missing the email claim")]
    MissingEmail,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Clone, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    /// Google's stable account id (`sub` claim)
    pub subject: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Verifies Google ID tokens against the Google JWKS
pub struct GoogleTokenVerifier {
    client_id: String,
    http: reqwest::Client,
    keys: RwLock<Vec<Jwk>>,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            http: reqwest::Client::new(),
            keys: RwLock::new(Vec::new()),
        }
    }

    /// Verifies an ID token and returns the profile it asserts
    pub async fn verify(&self, token: &str) -> Result<GoogleProfile, GoogleAuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(GoogleAuthError::MissingKeyId)?;

        let key = match self.find_key(&kid).await {
            Some(key) => key,
            None => {
                // Unknown kid usually means Google rotated keys
                self.refresh_keys().await?;
                self.find_key(&kid).await.ok_or(GoogleAuthError::UnknownKey)?
            }
        };

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(token, &decoding_key, &validation)?;
        let claims = data.claims;

        let email = claims.email.ok_or(GoogleAuthError::MissingEmail)?;
        let name = claims.name.unwrap_or_else(|| email.clone());

        Ok(GoogleProfile {
            subject: claims.sub,
            email,
            name,
            picture: claims.picture,
        })
    }

    async fn find_key(&self, kid: &str) -> Option<Jwk> {
        let keys = self.keys.read().await;
        keys.iter().find(|k| k.kid == kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), GoogleAuthError> {
        let set: JwkSet = self
            .http
            .get(GOOGLE_CERTS_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = self.keys.write().await;
        *keys = set.keys;
        Ok(())
    }
}
