// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT header and claims.

use serde::Serialize;
use serde_json::{Map, Value};

use super::TokenError;

/// Issuer claim name.
pub const ISSUER_CLAIM: &str = "iss";
/// Expiry claim name (Unix seconds).
pub const EXPIRY_CLAIM: &str = "exp";
/// Subject claim name.
pub const SUBJECT_CLAIM: &str = "sub";

/// Fixed JOSE header for every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    typ: &'static str,
    alg: &'static str,
}

impl Header {
    /// `{"typ":"JWT","alg":"HS256"}`
    pub fn hs256() -> Self {
        Self {
            typ: "JWT",
            alg: "HS256",
        }
    }
}

/// Claims object of a token.
///
/// Keys keep their insertion order, so the serialized claims follow the order
/// in which the caller supplied them with reserved claims merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Parse caller-supplied claims; anything other than a JSON object is rejected.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        match serde_json::from_str(raw) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            _ => Err(TokenError::InvalidClaimsJson),
        }
    }

    /// Parse the decoded bytes of a claims segment.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match serde_json::from_slice(bytes) {
            Ok(Value::Object(map)) => Some(Self(map)),
            _ => None,
        }
    }

    /// Merge the reserved `iss` and `exp` claims, overwriting caller values.
    ///
    /// A reserved key the caller already supplied keeps its position.
    pub fn with_reserved(mut self, issuer: &str, expires_at: i64) -> Self {
        self.0.insert(ISSUER_CLAIM.to_string(), Value::from(issuer));
        self.0.insert(EXPIRY_CLAIM.to_string(), Value::from(expires_at));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The `sub` claim, if it holds a usable value.
    ///
    /// Empty strings, zero, `false`, `null` and structured values are ignored;
    /// numbers and `true` are rendered as text.
    pub fn subject(&self) -> Option<String> {
        match self.0.get(SUBJECT_CLAIM)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            Value::Bool(true) => Some("true".to_string()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string(&self.0).map_err(|_| TokenError::InvalidClaimsJson)
    }
}
