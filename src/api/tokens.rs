// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and validation endpoints.
//!
//! The endpoint routines ([`issue_token`], [`validate_token`]) work against
//! any [`EdgeExchange`]; the axum handlers wrap the request in an
//! [`HttpExchange`] and return it as the response.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    auth::{TokenError, TokenService},
    error::ApiError,
    exchange::{EdgeExchange, HttpExchange},
    state::AppState,
};

/// Outbound header carrying the validated token's `sub` claim.
pub const CLAIMS_SUB_HEADER: &str = "Claims-sub";

const JSON_MEDIA_TYPE: &str = "application/json";

/// Issue a token for the JSON claims in the request body.
///
/// Responds `200` with the token, or `400` when the request is not
/// `application/json` or the body is not a JSON object.
pub fn issue_token<E: EdgeExchange>(exchange: &mut E, tokens: &TokenService, now: i64) {
    match try_issue(exchange, tokens, now) {
        Ok(token) => {
            info!(issuer = tokens.issuer().issuer(), "Issued token");
            exchange.respond(StatusCode::OK, token);
        }
        Err(err) => {
            debug!(error_code = err.error_code(), "Token issuance rejected");
            ApiError::from(err).respond_to(exchange);
        }
    }
}

fn try_issue<E: EdgeExchange>(
    exchange: &E,
    tokens: &TokenService,
    now: i64,
) -> Result<String, TokenError> {
    let content_type = exchange.header(CONTENT_TYPE.as_str()).unwrap_or_default();
    if !is_json(content_type) {
        return Err(TokenError::BadContentType);
    }

    tokens.issuer().issue(exchange.body_text(), now)
}

/// Media type `application/json`, parameters such as `charset` ignored.
fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}

/// Validate the bearer token in the `Authorization` header.
///
/// Responds `200` with body `true` and sets [`CLAIMS_SUB_HEADER`] when the
/// token carries a subject; `401` for a missing header or bad signature;
/// `400` for a header that is not a bearer JWT.
pub fn validate_token<E: EdgeExchange>(exchange: &mut E, tokens: &TokenService) {
    match tokens.validator().validate(exchange.header(AUTHORIZATION.as_str())) {
        Ok(validated) => {
            debug!(has_subject = validated.subject.is_some(), "Token validated");
            if let Some(subject) = validated.subject {
                exchange.set_header_out(CLAIMS_SUB_HEADER, &subject);
            }
            exchange.respond(StatusCode::OK, "true".to_string());
        }
        Err(err) => {
            debug!(error_code = err.error_code(), "Token validation rejected");
            ApiError::from(err).respond_to(exchange);
        }
    }
}

/// Issue a signed JWT for the posted claims.
///
/// The token carries the posted claims plus `iss` and `exp`; caller values
/// for those two are replaced.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Tokens",
    request_body(
        content = String,
        content_type = "application/json",
        description = "JSON object of claims, e.g. {\"sub\":\"alice\"}"
    ),
    responses(
        (status = 200, description = "Compact JWT", body = String, content_type = "text/plain"),
        (status = 400, description = "Content-Type is not application/json or body is not a JSON object", body = String, content_type = "text/plain"),
    )
)]
pub async fn issue(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> HttpExchange {
    let mut exchange = HttpExchange::new(headers, body);
    issue_token(&mut exchange, &state.tokens, Utc::now().timestamp());
    exchange
}

/// Validate the bearer JWT presented in the Authorization header.
#[utoipa::path(
    get,
    path = "/validate",
    tag = "Tokens",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token is valid; Claims-sub header carries the subject", body = String, content_type = "text/plain"),
        (status = 400, description = "Authorization is not a Bearer JWT", body = String, content_type = "text/plain"),
        (status = 401, description = "Missing Authorization header or invalid signature", body = String, content_type = "text/plain"),
    )
)]
pub async fn validate(State(state): State<AppState>, headers: HeaderMap) -> HttpExchange {
    let mut exchange = HttpExchange::new(headers, String::new());
    validate_token(&mut exchange, &state.tokens);
    exchange
}
