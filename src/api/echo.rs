// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Diagnostic endpoint reflecting request metadata back to the caller.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Request metadata as seen by the edge.
#[derive(Debug, Serialize, ToSchema)]
pub struct EchoResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Method")]
    pub method: String,
    #[serde(rename = "HTTP Version")]
    pub http_version: String,
    /// Peer address; absent when the server runs without connect info.
    #[serde(rename = "Remote Address", skip_serializing_if = "Option::is_none")]
    pub remote_address: Option<String>,
    #[serde(rename = "URI")]
    pub uri: String,
    /// ` name = value` for each request header.
    #[serde(rename = "Req-Headers")]
    pub request_headers: String,
    /// ` name = value` for each query argument.
    #[serde(rename = "Args")]
    pub args: String,
}

/// Echo the request method, version, peer, URI, headers and query arguments.
#[utoipa::path(
    get,
    path = "/hello",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Request metadata", body = EchoResponse)
    )
)]
pub async fn hello(request: Request) -> Json<EchoResponse> {
    let remote_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let request_headers: String = request
        .headers()
        .iter()
        .map(|(name, value)| format!(" {} = {}", name, String::from_utf8_lossy(value.as_bytes())))
        .collect();

    let args: String = request
        .uri()
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            format!(" {key} = {value}")
        })
        .collect();

    Json(EchoResponse {
        message: "Hello from the edge!".to_string(),
        method: request.method().to_string(),
        http_version: format!("{:?}", request.version()),
        remote_address,
        uri: request.uri().path().to_string(),
        request_headers,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn echoes_request_metadata() {
        let mut request = Request::builder()
            .method("GET")
            .uri("/hello?name=edge&flag")
            .header("x-trace", "abc")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 7], 51234))));

        let Json(echo) = hello(request).await;

        assert_eq!(echo.method, "GET");
        assert_eq!(echo.http_version, "HTTP/1.1");
        assert_eq!(echo.uri, "/hello");
        assert_eq!(echo.remote_address.as_deref(), Some("10.0.0.7:51234"));
        assert_eq!(echo.request_headers, " x-trace = abc");
        assert_eq!(echo.args, " name = edge flag = ");
    }

    #[tokio::test]
    async fn remote_address_is_omitted_without_connect_info() {
        let request = Request::builder()
            .uri("/hello")
            .body(Body::empty())
            .unwrap();
        let Json(echo) = hello(request).await;

        assert!(echo.remote_address.is_none());
        assert_eq!(echo.args, "");
        let json = serde_json::to_value(&echo).unwrap();
        assert!(json.get("Remote Address").is_none());
        assert_eq!(json["Message"], "Hello from the edge!");
    }
}
