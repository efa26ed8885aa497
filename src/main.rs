#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::BaseUrl;
use crate::audit::Audit;
use crate::audit::TracingSink;
use crate::storage::Storage;
use crate::storage::setup;
use crate::utils::env_var_or_else;

mod api;
mod audit;
mod clicks;
mod client_ip;
mod codegen;
mod graceful_shutdown;
mod links;
mod root;
mod storage;
#[cfg(test)]
mod tests;
mod utils;
mod validate;

const DEFAULT_RUST_LOG: &str = "trimly=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:7000";
const DEFAULT_BASE_URL: &str = "http://localhost:7000/";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await;

    let address = setup_address()?;
    tracing::info!("Listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown::handler())
    .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// The storage backend is picked by the `postgres` feature; the short link
/// base and the audit sink are injected as router extensions
pub async fn setup_app() -> Router {
    let storage = setup().await;

    let base_url = BaseUrl::new(env_var_or_else("BASE_URL", || {
        String::from(DEFAULT_BASE_URL)
    }));

    let audit = Audit::new(Arc::new(TracingSink));

    create_router(storage, base_url, audit)
}

/// Create the router for Trimly
fn create_router<S: Storage>(storage: S, base_url: BaseUrl, audit: Audit) -> Router {
    Router::new()
        .merge(api::router::<S>())
        .fallback_service(get(root::root::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(base_url))
        .layer(Extension(audit))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
