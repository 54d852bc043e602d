// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{any, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod echo;
pub mod health;
pub mod tokens;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/jwt", post(tokens::issue))
        .route("/validate", any(tokens::validate))
        .route("/hello", get(echo::hello))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        tokens::issue,
        tokens::validate,
        echo::hello,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            echo::EchoResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Tokens", description = "JWT issuance and validation"),
        (name = "Diagnostics", description = "Request echo"),
        (name = "Health", description = "Liveness and health probes")
    )
)]
struct ApiDoc;

/// Registers the `bearer` scheme referenced by the validate endpoint.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::with_secret(b"INSECUREKEY"))
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn issue(body: &str) -> String {
        let response = app()
            .oneshot(
                Request::post("/jwt")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_text(response).await
    }

    #[tokio::test]
    async fn issue_then_validate_over_http() {
        let token = issue(r#"{"sub":"alice"}"#).await;

        let response = app()
            .oneshot(
                Request::get("/validate")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["claims-sub"], "alice");
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "true");
    }

    #[tokio::test]
    async fn validate_accepts_any_method() {
        let token = issue("{}").await;
        let response = app()
            .oneshot(
                Request::post("/validate")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("claims-sub"));
    }

    #[tokio::test]
    async fn issue_rejects_wrong_content_type_over_http() {
        let response = app()
            .oneshot(
                Request::post("/jwt")
                    .header("content-type", "text/plain")
                    .body(Body::from(r#"{"sub":"alice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Content-Type must be application/json\n"
        );
    }

    #[tokio::test]
    async fn validate_without_header_is_401() {
        let response = app()
            .oneshot(Request::get("/validate").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "Missing Authorization header\n");
    }

    #[tokio::test]
    async fn tampered_token_is_401_over_http() {
        let token = issue(r#"{"sub":"alice"}"#).await;
        let forged_claims = crate::auth::codec::encode(br#"{"sub":"mallory"}"#);
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged_claims;
        let forged = parts.join(".");

        let response = app()
            .oneshot(
                Request::get("/validate")
                    .header("authorization", format!("Bearer {forged}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!response.headers().contains_key("claims-sub"));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::get("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(doc["paths"].get("/jwt").is_some());
        assert!(doc["paths"].get("/validate").is_some());
        assert!(doc["components"]["securitySchemes"].get("bearer").is_some());
    }
}
