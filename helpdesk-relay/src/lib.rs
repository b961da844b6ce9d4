//! Relay in front of a helpdesk REST API.
//!
//! Every inbound request is forwarded to the configured helpdesk with the
//! client's composite `Authorization` header reduced to the helpdesk
//! credential. Multipart requests are treated as file uploads: the part
//! preamble is cut off and the raw bytes are posted upstream.

mod authorization;
pub mod config;
pub mod errors;
pub mod metrics_defs;
mod multipart;
pub mod relay;
mod service;

use config::Config;
use errors::HelpdeskRelayError;
use relay::HelpdeskRelay;
use service::HelpdeskRelayService;
use shared::admin_service::AdminService;
use shared::http::run_http_service;

pub async fn run(config: Config) -> Result<(), HelpdeskRelayError> {
    let relay = HelpdeskRelay::new(config.upstream.clone(), &config.client)?;
    tracing::info!(upstream = %config.upstream, "Starting helpdesk relay");

    let relay_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        HelpdeskRelayService::new(relay),
    );
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<HelpdeskRelayError>::new("helpdesk-relay"),
    );

    tokio::try_join!(relay_task, admin_task)?;
    Ok(())
}
