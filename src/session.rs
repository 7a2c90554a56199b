//! Signed session tokens (compact JWT, HS256).

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::User;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("malformed session token")]
    Malformed,
    #[error("unsupported token algorithm")]
    UnsupportedAlgorithm,
    #[error("session signature mismatch")]
    BadSignature,
    #[error("session expired")]
    Expired,
    #[error("invalid signing key")]
    InvalidKey,
}

impl From<jsonwebtoken::errors::Error> for SessionError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => SessionError::BadSignature,
            ErrorKind::ExpiredSignature => SessionError::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                SessionError::UnsupportedAlgorithm
            }
            ErrorKind::InvalidKeyFormat => SessionError::InvalidKey,
            _ => SessionError::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    max_age: Duration,
}

impl SessionSigner {
    /// `max_age_days` is validated by `Config`; it must be positive.
    pub fn new(secret: &str, max_age_days: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            max_age: Duration::days(max_age_days),
        }
    }

    pub fn max_age_secs(&self) -> i64 {
        self.max_age.num_seconds()
    }

    pub fn issue(&self, user: &User) -> Result<(String, SessionClaims), SessionError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> Result<(String, SessionClaims), SessionError> {
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            iat: now.timestamp(),
            exp: (now + self.max_age).timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok((token, claims))
    }

    pub fn sign(&self, claims: &SessionClaims) -> Result<String, SessionError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?)
    }

    /// Checks signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let data = decode::<SessionClaims>(token.trim(), &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
