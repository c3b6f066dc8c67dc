use std::env;

use log::*;

use crate::errors::ServerError;

const DEFAULT_ESP_HOST: &str = "127.0.0.1";
const DEFAULT_ESP_PORT: u16 = 8880;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/espresso.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If set, only this origin is allowed in cross-origin requests. When unset, the server runs
    /// with a permissive CORS policy suitable for local development.
    pub cors_allowed_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ESP_HOST.to_string(),
            port: DEFAULT_ESP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            cors_allowed_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("ESP_HOST").ok().unwrap_or_else(|| DEFAULT_ESP_HOST.into());
        let port = env::var("ESP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for ESP_PORT. {e} Using the default, {DEFAULT_ESP_PORT}, instead."
                    );
                    DEFAULT_ESP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ESP_PORT);
        let database_url = env::var("ESP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ ESP_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let cors_allowed_origin = env::var("ESP_CORS_ALLOWED_ORIGIN").ok();
        if cors_allowed_origin.is_none() {
            info!(
                "🪛️ ESP_CORS_ALLOWED_ORIGIN is not set. Running with a permissive CORS policy. Set it to the \
                 storefront origin in production."
            );
        }
        Self { host, port, database_url, auth, cors_allowed_origin }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The expected `iss` claim. Tokens from any other issuer are rejected.
    pub issuer: String,
    /// The expected `aud` claim. Tokens for any other audience are rejected.
    pub audience: String,
    /// The HTTPS endpoint publishing the issuer's JSON Web Key Set.
    pub jwks_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The token issuer has not been configured. Protected routes will reject every token until \
             ESP_AUTH_ISSUER and ESP_AUTH_AUDIENCE are set. 🚨️🚨️🚨️"
        );
        Self { issuer: String::default(), audience: String::default(), jwks_url: String::default() }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let issuer =
            env::var("ESP_AUTH_ISSUER").map_err(|e| ServerError::ConfigurationError(format!("{e} [ESP_AUTH_ISSUER]")))?;
        let audience = env::var("ESP_AUTH_AUDIENCE")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [ESP_AUTH_AUDIENCE]")))?;
        let jwks_url = env::var("ESP_AUTH_JWKS_URL").ok().unwrap_or_else(|| {
            let url = format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'));
            info!("🪛️ ESP_AUTH_JWKS_URL is not set. Deriving it from the issuer: {url}");
            url
        });
        Ok(Self { issuer, audience, jwks_url })
    }
}
