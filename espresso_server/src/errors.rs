use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use espresso_engine::DrinkApiError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("bad request. {0}")]
    BackendError(String),
    #[error("Could not read request body. {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path. {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("resource not found. {0}")]
    NoRecordFound(String),
    #[error("unprocessable. {0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BackendError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationError(e) => e.status_code(),
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Every failure produces the uniform envelope, `{success: false, error: <status>, message}`.
    /// Auth failures additionally echo the verifier's machine-readable code.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut body = json!({
            "success": false,
            "error": status.as_u16(),
            "message": self.to_string(),
        });
        if let Self::AuthenticationError(e) = self {
            body["code"] = json!(e.code());
        }
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingAuthHeader,
    #[error("Authorization header must be in the form 'Bearer <token>'. {0}")]
    MalformedAuthHeader(String),
    #[error("Unable to parse authentication token. {0}")]
    PoorlyFormattedToken(String),
    #[error("Unable to find a key matching the token's key id. {0}")]
    KeyNotFound(String),
    #[error("Could not fetch the issuer's key set. {0}")]
    KeySetFetch(String),
    #[error("Token is expired.")]
    ExpiredToken,
    #[error("Incorrect claims. Please check the audience and issuer. {0}")]
    InvalidClaims(String),
    #[error("Permissions not included in token.")]
    PermissionsClaimMissing,
    #[error("Permission not found: {0}")]
    InsufficientPermissions(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuthHeader => StatusCode::UNAUTHORIZED,
            Self::MalformedAuthHeader(_) => StatusCode::UNAUTHORIZED,
            Self::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
            Self::KeyNotFound(_) => StatusCode::BAD_REQUEST,
            Self::KeySetFetch(_) => StatusCode::UNAUTHORIZED,
            Self::ExpiredToken => StatusCode::UNAUTHORIZED,
            Self::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            Self::PermissionsClaimMissing => StatusCode::BAD_REQUEST,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    /// The machine-readable code echoed alongside the error message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "authorization_header_missing",
            Self::MalformedAuthHeader(_) => "invalid_header",
            Self::PoorlyFormattedToken(_) => "invalid_header",
            Self::KeyNotFound(_) => "invalid_header",
            Self::KeySetFetch(_) => "key_set_unavailable",
            Self::ExpiredToken => "token_expired",
            Self::InvalidClaims(_) => "invalid_claims",
            Self::PermissionsClaimMissing => "invalid_claims",
            Self::InsufficientPermissions(_) => "unauthorized",
        }
    }
}

/// Fallback translation for store errors that a handler has not already mapped to a more specific
/// response. Not-found is preserved; everything else is a generic bad request.
impl From<DrinkApiError> for ServerError {
    fn from(e: DrinkApiError) -> Self {
        match e {
            DrinkApiError::DrinkNotFound(id) => Self::NoRecordFound(format!("No drink with id {id}.")),
            e => Self::BackendError(e.to_string()),
        }
    }
}
