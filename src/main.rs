// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use edge_jwt::{
    api::router,
    auth::TokenService,
    config::{Config, LogFormat},
    logging,
    state::AppState,
};
use tracing::{error, info};

/// Time allowed for in-flight requests to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> ExitCode {
    logging::init(LogFormat::from_env());

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let tokens = match TokenService::new(&config.tokens) {
        Ok(tokens) => tokens,
        Err(e) => {
            error!(error = %e, "Failed to import signing key");
            return ExitCode::FAILURE;
        }
    };
    info!(
        issuer = %config.tokens.issuer,
        validity_secs = config.tokens.validity.as_secs(),
        "Token service ready"
    );

    let app = router(AppState::new(tokens)).into_make_service_with_connect_info::<SocketAddr>();

    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    let served = match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            if rustls::crypto::ring::default_provider()
                .install_default()
                .is_err()
            {
                error!("Failed to install rustls crypto provider");
                return ExitCode::FAILURE;
            }

            let tls_config = match RustlsConfig::from_pem_file(&tls.cert, &tls.key).await {
                Ok(tls_config) => tls_config,
                Err(e) => {
                    error!(
                        error = %e,
                        cert = %tls.cert.display(),
                        key = %tls.key.display(),
                        "Failed to load TLS certificate"
                    );
                    return ExitCode::FAILURE;
                }
            };

            info!(addr = %config.bind, "Edge JWT server listening on https (docs at /docs)");
            axum_server::bind_rustls(config.bind, tls_config)
                .handle(handle)
                .serve(app)
                .await
        }
        None => {
            info!(addr = %config.bind, "Edge JWT server listening on http (docs at /docs)");
            axum_server::bind(config.bind)
                .handle(handle)
                .serve(app)
                .await
        }
    };

    match served {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_on_signal(handle: Handle<std::net::SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
