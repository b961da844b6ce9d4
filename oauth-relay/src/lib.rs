//! OAuth2 relay in front of several backend environments.
//!
//! Authorization codes and refresh tokens carry a selector naming the
//! environment that issued them. Token requests are forwarded to that
//! environment; authorize requests are proxied to the URL the client names
//! and the resulting redirect is returned in the body so browser code can
//! follow it.
//!
//! The relay runs as an HTTP listener, or handles a single gateway event
//! through [`invoke`].

pub mod config;
mod cors;
pub mod errors;
pub mod event;
mod grant;
pub mod inbound;
pub mod metrics_defs;
pub mod relay;
mod selector;
mod service;

use config::Config;
use errors::OauthRelayError;
use event::{GatewayEvent, GatewayResponse};
use relay::OauthRelay;
use service::OauthRelayService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;

pub async fn run(config: Config) -> Result<(), OauthRelayError> {
    let relay = OauthRelay::new(&config)?;
    tracing::info!(
        environments = config.environments.len(),
        "Starting OAuth relay"
    );

    let relay_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        OauthRelayService::new(relay),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<OauthRelayError>::new("oauth-relay"),
    );

    tokio::try_join!(relay_task, admin_task)?;
    Ok(())
}

/// Handles one gateway event and renders the gateway response.
pub async fn invoke(
    config: &Config,
    event: GatewayEvent,
) -> Result<GatewayResponse, OauthRelayError> {
    let relay = OauthRelay::new(config)?;
    let request = event.into_inbound()?;
    Ok(relay.handle(request).await.into())
}
