//! Token verification against the issuer's published key set.
//!
//! The server never issues tokens itself. Staff authenticate with the external identity provider,
//! which signs a JWT carrying a `permissions` claim. This module fetches the issuer's JSON Web Key
//! Set, locates the key named by the token header's `kid`, and validates the signature, expiry,
//! audience and issuer before handing the decoded claims to the permission middleware.

use actix_web::{dev::Payload, http::header, FromRequest, HttpMessage, HttpRequest};
use futures::future::{err, ok, Ready};
use jsonwebtoken::{
    decode,
    decode_header,
    errors::ErrorKind as JwtErrorKind,
    jwk::{AlgorithmParameters, JwkSet},
    Algorithm,
    DecodingKey,
    Validation,
};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// The decoded claim set of a verified token. It exists only for the duration of one request; the
/// permission middleware stores it in the request extensions for handlers to extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl FromRequest for JwtClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<JwtClaims>().cloned() {
            Some(claims) => ok(claims),
            None => err(ServerError::Unspecified("No claims found in request extensions".to_string()).into()),
        }
    }
}

/// Extracts the raw token from the `Authorization` header, which must be exactly `Bearer <token>`.
pub fn extract_bearer_token(headers: &header::HeaderMap) -> Result<String, AuthError> {
    let value = headers.get(header::AUTHORIZATION).ok_or(AuthError::MissingAuthHeader)?;
    let value = value.to_str().map_err(|e| AuthError::MalformedAuthHeader(e.to_string()))?;
    let parts = value.split_whitespace().collect::<Vec<&str>>();
    match parts.as_slice() {
        [scheme, token] if *scheme == "Bearer" => Ok((*token).to_string()),
        [scheme, ..] if *scheme != "Bearer" => {
            Err(AuthError::MalformedAuthHeader("Header must start with 'Bearer'.".to_string()))
        },
        [_] => Err(AuthError::MalformedAuthHeader("Token not found.".to_string())),
        _ => Err(AuthError::MalformedAuthHeader("Header must be a bearer token.".to_string())),
    }
}

/// Where the verifier obtains the issuer's key set.
#[derive(Clone)]
pub enum KeyStore {
    /// Fetch the key set from the issuer's published endpoint on each verification. Transient
    /// fetch failures surface as auth failures, never as a crash.
    Remote { client: Client, url: String },
    /// A fixed key set, used in tests.
    Static(JwkSet),
}

#[derive(Clone)]
pub struct TokenVerifier {
    key_store: KeyStore,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key_store: KeyStore::Remote { client: Client::new(), url: config.jwks_url.clone() },
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    /// Creates a verifier backed by a fixed key set. No network access is performed.
    pub fn with_key_set(key_set: JwkSet, config: &AuthConfig) -> Self {
        Self { key_store: KeyStore::Static(key_set), issuer: config.issuer.clone(), audience: config.audience.clone() }
    }

    async fn key_set(&self) -> Result<JwkSet, AuthError> {
        match &self.key_store {
            KeyStore::Static(keys) => Ok(keys.clone()),
            KeyStore::Remote { client, url } => {
                let response = client.get(url).send().await.map_err(|e| AuthError::KeySetFetch(e.to_string()))?;
                response.json::<JwkSet>().await.map_err(|e| AuthError::KeySetFetch(e.to_string()))
            },
        }
    }

    /// Verifies a raw bearer token and returns its decoded claims.
    ///
    /// The unverified header names the signing key; the signature, expiry, audience and issuer are
    /// all checked against the key set before any claim is trusted.
    pub async fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
        let kid = header.kid.ok_or_else(|| AuthError::PoorlyFormattedToken("Token header has no key id.".to_string()))?;
        let keys = self.key_set().await?;
        let jwk = keys.find(&kid).ok_or_else(|| AuthError::KeyNotFound(kid.clone()))?;
        if !matches!(jwk.algorithm, AlgorithmParameters::RSA(_)) {
            return Err(AuthError::KeyNotFound(format!("Key '{kid}' is not an RSA signing key.")));
        }
        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::KeyNotFound(format!("{kid}: {e}")))?;
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        let data = decode::<JwtClaims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            JwtErrorKind::InvalidAudience | JwtErrorKind::InvalidIssuer => AuthError::InvalidClaims(e.to_string()),
            _ => AuthError::PoorlyFormattedToken(e.to_string()),
        })?;
        debug!("🔐️ Token verified for subject {}", data.claims.sub);
        Ok(data.claims)
    }
}
