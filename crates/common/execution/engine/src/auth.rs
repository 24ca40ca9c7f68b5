use std::{fmt, fs, path::Path};

use alloy_primitives::hex;
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use reqwest::{Client, IntoUrl, Response};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Smallest accepted secret, in raw bytes.
pub const JWT_SECRET_MIN_LENGTH: usize = 32;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// issued-at claim. Represented as seconds passed since UNIX_EPOCH.
    pub iat: u64,
}

/// Shared HMAC secret used to authenticate against the engine API.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    /// Reads a hex encoded secret, optionally `0x` prefixed, from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            EngineError::Config(format!(
                "Could not read jwt secret from {}: {err}",
                path.display()
            ))
        })?;
        Self::from_hex(&contents)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, EngineError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(EngineError::Config("jwt secret is empty".to_string()));
        }
        let secret = hex::decode(strip_prefix(encoded))
            .map_err(|err| EngineError::Config(format!("jwt secret is not valid hex: {err}")))?;
        if secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(EngineError::Config(format!(
                "jwt secret must be at least {JWT_SECRET_MIN_LENGTH} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(&self.0)
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

pub fn strip_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// HTTP transport that signs every outgoing request with a freshly minted token.
///
/// Tokens are never cached. The only claim is `iat`, so each token is valid only
/// within the receiver's clock-skew window.
#[derive(Clone)]
pub struct AuthTransport {
    http_client: Client,
    jwt_encoding_key: EncodingKey,
}

impl AuthTransport {
    pub fn new(http_client: Client, secret: &JwtSecret) -> Self {
        Self {
            http_client,
            jwt_encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn create_jwt_token(&self) -> Result<String, EngineError> {
        let claims = Claims {
            iat: get_current_timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.jwt_encoding_key)?)
    }

    /// POSTs `body` as JSON with an `Authorization: Bearer <token>` header.
    pub async fn post<U: IntoUrl, B: Serialize + ?Sized>(
        &self,
        url: U,
        body: &B,
    ) -> Result<Response, EngineError> {
        let request = self
            .http_client
            .post(url)
            .json(body)
            .bearer_auth(self.create_jwt_token()?)
            .build()?;
        Ok(self.http_client.execute(request).await?)
    }
}
