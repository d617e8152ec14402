//! Tests for the application bootstrap, covering readiness signalling.

use super::server::{ServerConfig, create_server};
use actix_web::web;
use allocations::inbound::http::health::HealthState;
use rstest::{fixture, rstest};
use std::net::SocketAddr;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    assert!(!health_state.is_ready());

    let _server = create_server(health_state.clone(), ServerConfig::new(bind_address))
        .expect("server should bind to an ephemeral port");

    assert!(health_state.is_ready());
    assert!(health_state.is_alive());
}

#[cfg(feature = "metrics")]
#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready_with_metrics(
    health_state: web::Data<HealthState>,
    bind_address: SocketAddr,
) {
    let config = ServerConfig::new(bind_address).with_metrics(super::server::default_metrics());

    let _server = create_server(health_state.clone(), config).expect("server should bind");

    assert!(health_state.is_ready());
}
