// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token validation.
//!
//! A presented `Authorization` value passes through these stages in order,
//! and the first failing stage decides the outcome:
//!
//! 1. header present and non-empty, else [`TokenError::MissingAuthHeader`]
//! 2. exactly `Bearer <value>`, else [`TokenError::NotBearerScheme`]
//! 3. three non-empty dot-separated segments, else [`TokenError::MalformedToken`]
//! 4. HMAC over `header.claims` matches the signature segment, else
//!    [`TokenError::InvalidSignature`]
//! 5. best-effort `sub` extraction from the claims segment
//!
//! `exp` is not compared against the clock. Tokens stay valid after their
//! expiry timestamp.

use super::{
    claims::Claims,
    codec,
    signer::{self, HmacKey, KeyUsage},
    TokenError,
};

/// Authorization scheme accepted by the validator (case-sensitive).
pub const BEARER_SCHEME: &str = "Bearer";

/// A token whose signature checked out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedToken {
    /// The `sub` claim, when the claims segment carries one.
    pub subject: Option<String>,
}

pub type ValidationResult = Result<ValidatedToken, TokenError>;

/// The three segments of a compact JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segments<'a> {
    /// `header.claims`, exactly as presented
    signed_region: &'a str,
    claims: &'a str,
    signature: &'a str,
}

/// Checks bearer tokens against the shared secret.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: HmacKey,
}

impl TokenValidator {
    /// Create a validator whose key is imported with `usages`, which must
    /// include [`KeyUsage::Verify`].
    pub fn new(secret: &[u8], usages: &[KeyUsage]) -> Result<Self, TokenError> {
        let key = signer::derive_key(secret, usages)?;
        if !key.allows(KeyUsage::Verify) {
            return Err(TokenError::KeyUsage(KeyUsage::Verify));
        }
        Ok(Self { key })
    }

    /// Validate the raw `Authorization` header value, if any.
    pub fn validate(&self, authorization: Option<&str>) -> ValidationResult {
        let authorization = authorization
            .filter(|value| !value.is_empty())
            .ok_or(TokenError::MissingAuthHeader)?;

        let token = bearer_value(authorization)?;
        let segments = split_segments(token)?;
        self.verify_signature(&segments)?;

        Ok(ValidatedToken {
            subject: extract_subject(segments.claims),
        })
    }

    fn verify_signature(&self, segments: &Segments<'_>) -> Result<(), TokenError> {
        let signature =
            codec::decode(segments.signature).map_err(|_| TokenError::InvalidSignature)?;

        if signer::verify(&self.key, &signature, segments.signed_region.as_bytes())? {
            Ok(())
        } else {
            Err(TokenError::InvalidSignature)
        }
    }
}

fn bearer_value(authorization: &str) -> Result<&str, TokenError> {
    let mut parts = authorization.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(value), None) => Ok(value),
        _ => Err(TokenError::NotBearerScheme),
    }
}

fn split_segments(token: &str) -> Result<Segments<'_>, TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [header, claims, signature]
            if !header.is_empty() && !claims.is_empty() && !signature.is_empty() =>
        {
            Ok(Segments {
                signed_region: &token[..header.len() + 1 + claims.len()],
                claims: *claims,
                signature: *signature,
            })
        }
        _ => Err(TokenError::MalformedToken),
    }
}

/// Pull `sub` out of an already-verified claims segment. Undecodable or
/// non-JSON claims simply have no subject.
fn extract_subject(claims_segment: &str) -> Option<String> {
    let bytes = codec::decode(claims_segment).ok()?;
    Claims::from_slice(&bytes)?.subject()
}
