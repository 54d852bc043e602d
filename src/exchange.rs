// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request/response exchange seen by the token endpoints.
//!
//! Endpoint logic only needs to look up request headers, read the body text,
//! set outbound headers and emit one status with a body. [`EdgeExchange`]
//! captures exactly that, so the endpoints run unchanged against axum (via
//! [`HttpExchange`]) or an in-memory double in tests.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

pub trait EdgeExchange {
    /// Request header value by case-insensitive name. Values that are not
    /// visible ASCII are reported as absent.
    fn header(&self, name: &str) -> Option<&str>;

    /// Raw request body.
    fn body_text(&self) -> &str;

    /// Add a header to the eventual response.
    fn set_header_out(&mut self, name: &str, value: &str);

    /// Emit the response status and body. Only the first call takes effect.
    fn respond(&mut self, status: StatusCode, body: String);
}

/// [`EdgeExchange`] over an axum request, converted into the response once
/// the endpoint has run.
#[derive(Debug)]
pub struct HttpExchange {
    headers: HeaderMap,
    body: String,
    headers_out: HeaderMap,
    reply: Option<(StatusCode, String)>,
}

impl HttpExchange {
    pub fn new(headers: HeaderMap, body: String) -> Self {
        Self {
            headers,
            body,
            headers_out: HeaderMap::new(),
            reply: None,
        }
    }

    /// Status and body emitted so far.
    pub fn reply(&self) -> Option<(StatusCode, &str)> {
        self.reply
            .as_ref()
            .map(|(status, body)| (*status, body.as_str()))
    }

    pub fn headers_out(&self) -> &HeaderMap {
        &self.headers_out
    }
}

impl EdgeExchange for HttpExchange {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn body_text(&self) -> &str {
        &self.body
    }

    fn set_header_out(&mut self, name: &str, value: &str) {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers_out.insert(name, value);
            }
            _ => warn!(header = name, "Dropping outbound header with invalid name or value"),
        }
    }

    fn respond(&mut self, status: StatusCode, body: String) {
        if let Some((first, _)) = &self.reply {
            warn!(
                first_status = first.as_u16(),
                ignored_status = status.as_u16(),
                "Response already emitted, ignoring second write"
            );
            return;
        }
        self.reply = Some((status, body));
    }
}

impl IntoResponse for HttpExchange {
    fn into_response(self) -> Response {
        let (status, body) = self.reply.unwrap_or_else(|| {
            warn!("Endpoint finished without emitting a response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "No response emitted\n".to_string(),
            )
        });

        let mut response = (status, body).into_response();
        response.headers_mut().extend(self.headers_out);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let exchange = HttpExchange::new(
            headers(&[("content-type", "application/json")]),
            String::new(),
        );
        assert_eq!(exchange.header("Content-Type"), Some("application/json"));
        assert_eq!(exchange.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(exchange.header("authorization"), None);
    }

    #[test]
    fn non_text_header_values_are_absent() {
        let mut map = HeaderMap::new();
        map.insert(
            "authorization",
            HeaderValue::from_bytes(b"Bearer \xff").unwrap(),
        );
        let exchange = HttpExchange::new(map, String::new());
        assert_eq!(exchange.header("authorization"), None);
    }

    #[test]
    fn first_response_wins() {
        let mut exchange = HttpExchange::new(HeaderMap::new(), String::new());
        exchange.respond(StatusCode::BAD_REQUEST, "first\n".to_string());
        exchange.respond(StatusCode::OK, "second".to_string());
        assert_eq!(exchange.reply(), Some((StatusCode::BAD_REQUEST, "first\n")));
    }

    #[test]
    fn invalid_outbound_header_value_is_dropped() {
        let mut exchange = HttpExchange::new(HeaderMap::new(), String::new());
        exchange.set_header_out("claims-sub", "line\nbreak");
        assert!(exchange.headers_out().is_empty());
    }

    #[tokio::test]
    async fn into_response_carries_status_body_and_headers() {
        let mut exchange = HttpExchange::new(HeaderMap::new(), String::new());
        exchange.set_header_out("Claims-sub", "alice");
        exchange.respond(StatusCode::OK, "true".to_string());

        let response = exchange.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["claims-sub"], "alice");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"true");
    }

    #[tokio::test]
    async fn missing_response_becomes_500() {
        let response = HttpExchange::new(HeaderMap::new(), String::new()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
