// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Token Module
//!
//! Stateless HS256 JSON Web Tokens signed with a single shared secret.
//!
//! ## Token Format
//!
//! ```text
//! base64url({"typ":"JWT","alg":"HS256"}) . base64url(claims) . base64url(HMAC-SHA256)
//! ```
//!
//! The signature covers the first two segments joined by a dot (the signed
//! region). Segments are base64url without padding.
//!
//! ## Flow
//!
//! 1. A client posts a JSON object of claims and receives a token carrying
//!    those claims plus `iss` and `exp`
//! 2. On later requests the client sends `Authorization: Bearer <token>`
//! 3. The validator checks the scheme, the segment layout and the signature,
//!    then surfaces the `sub` claim for downstream use
//!
//! ## Security
//!
//! - The secret is loaded at startup and never logged
//! - Signatures are compared in constant time
//! - `exp` is written on issuance but not enforced on validation

pub mod claims;
pub mod codec;
pub mod error;
pub mod issuer;
pub mod service;
pub mod signer;
pub mod validator;

pub use claims::Claims;
pub use error::TokenError;
pub use issuer::TokenIssuer;
pub use service::TokenService;
pub use signer::{HmacKey, KeyUsage};
pub use validator::{TokenValidator, ValidatedToken, ValidationResult, BEARER_SCHEME};
