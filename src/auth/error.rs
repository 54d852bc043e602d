// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation errors.

use axum::http::StatusCode;
use thiserror::Error;

use super::KeyUsage;

/// Reasons a token could not be issued or a bearer token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Issuance request is not `application/json`
    #[error("Content-Type must be application/json")]
    BadContentType,
    /// Issuance body is not a JSON object
    #[error("Error parsing request body as a JSON object of claims")]
    InvalidClaimsJson,
    /// No authorization header present
    #[error("Missing Authorization header")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    #[error("Missing Bearer token in Authorization header")]
    NotBearerScheme,
    /// Bearer value is not three non-empty dot-separated segments
    #[error("Bearer token is not a JWT")]
    MalformedToken,
    /// Signature does not match the signed region
    #[error("Invalid JWT signature")]
    InvalidSignature,
    /// Segment is not valid base64url
    #[error("Token segment is not valid base64url")]
    Decode,
    /// Key material cannot be used for HMAC
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
    /// Key was imported without the required usage
    #[error("Key is not permitted to {0}")]
    KeyUsage(KeyUsage),
}

impl TokenError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::BadContentType => "bad_content_type",
            TokenError::InvalidClaimsJson => "invalid_claims_json",
            TokenError::MissingAuthHeader => "missing_auth_header",
            TokenError::NotBearerScheme => "not_bearer_scheme",
            TokenError::MalformedToken => "malformed_token",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Decode => "decode_error",
            TokenError::InvalidKey(_) => "invalid_key",
            TokenError::KeyUsage(_) => "key_usage",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TokenError::MissingAuthHeader | TokenError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
            TokenError::BadContentType
            | TokenError::InvalidClaimsJson
            | TokenError::NotBearerScheme
            | TokenError::MalformedToken
            | TokenError::Decode => StatusCode::BAD_REQUEST,
            TokenError::InvalidKey(_) | TokenError::KeyUsage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_are_401() {
        assert_eq!(
            TokenError::MissingAuthHeader.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TokenError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_requests_are_400() {
        for err in [
            TokenError::BadContentType,
            TokenError::InvalidClaimsJson,
            TokenError::NotBearerScheme,
            TokenError::MalformedToken,
            TokenError::Decode,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err:?}");
        }
    }

    #[test]
    fn key_errors_are_internal() {
        let err = TokenError::KeyUsage(KeyUsage::Verify);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Key is not permitted to verify");
        assert_eq!(err.error_code(), "key_usage");
    }
}
