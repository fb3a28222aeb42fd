//! HTTP Gate
//!
//! Exposes the access verdict to an edge pipeline in two ways:
//!
//! - [`peer_gate`]: middleware that checks the connecting peer address and
//!   answers 403 before the request reaches any inner handler. Apply it to
//!   an application router when geogate fronts the traffic directly.
//! - `GET /verdict/{ip}`: auth-subrequest endpoint for proxies that
//!   terminate the client connection themselves (nginx `auth_request`
//!   style). 204 when allowed, 403 when denied.

use crate::application::AccessService;
use axum::{
    extract::{ConnectInfo, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// HTTP server exposing the verdict and health endpoints.
pub struct GateServer {
    service: Arc<AccessService>,
    listen_addr: String,
}

impl GateServer {
    pub fn new(service: Arc<AccessService>, listen_addr: String) -> Self {
        Self {
            service,
            listen_addr,
        }
    }

    /// Build the router. Separated from `run` so tests can drive it
    /// without binding a socket.
    pub fn router(service: Arc<AccessService>) -> Router {
        Router::new()
            .route("/verdict/:ip", get(verdict))
            .route("/healthz", get(healthz))
            .layer(TraceLayer::new_for_http())
            .with_state(service)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let router = Self::router(self.service);
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("gate listening on {}", self.listen_addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }
}

/// Connection-gating middleware: deny requests from disallowed peers
/// before they reach any handler.
///
/// Wire with `axum::middleware::from_fn_with_state(service, peer_gate)`
/// on the router that serves application traffic. The peer address comes
/// from [`ConnectInfo`], so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn peer_gate(
    State(service): State<Arc<AccessService>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if service.should_allow(peer.ip()) {
        next.run(request).await
    } else {
        tracing::info!("denied request from {}", peer.ip());
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Auth-subrequest endpoint: 204 when the address is allowed, 403 when
/// denied. Malformed addresses deny, same as everywhere else.
async fn verdict(State(service): State<Arc<AccessService>>, Path(ip): Path<String>) -> StatusCode {
    if service.should_allow_addr(&ip) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::FORBIDDEN
    }
}

async fn healthz() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
