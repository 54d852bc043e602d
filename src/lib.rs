// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Edge JWT - Stateless token issuance and validation
//!
//! This crate issues HS256 JSON Web Tokens for caller-supplied claims and
//! validates bearer tokens presented on later requests, surfacing the `sub`
//! claim to downstream services through a response header.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token encoding, signing, issuance and validation
//! - `exchange` - Transport seam used by the token endpoints
//! - `config` - Environment configuration and secret loading

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod state;
