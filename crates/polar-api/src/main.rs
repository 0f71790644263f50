//! # Polar-Cart RS
//!
//! Storefront for Polar products.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export POLAR_ACCESS_TOKEN=polar_oat_...
//! export POLAR_WEBHOOK_SECRET=...
//! export POLAR_MODE=sandbox
//!
//! # Run the server
//! polar-cart
//! ```

use polar_api::{routes, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Fails on missing POLAR_ACCESS_TOKEN / POLAR_WEBHOOK_SECRET
    let state = AppState::new()?;

    let addr = state.config.bind_addr();
    let flavor = state.config.flavor;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Billing provider: {} ({})",
        state.provider.provider_name(),
        state.mode
    );
    info!("Flavor: {}", flavor.as_str());

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Polar-Cart listening on http://{}", addr);

    if !is_prod {
        let (checkout, param) = flavor.checkout_link();
        info!("Home: GET http://{}/", addr);
        info!("Checkout: GET http://{}{}?{}=<product_id>", addr, checkout, param);
        info!("Portal: GET http://{}{}?email=<email>", addr, flavor.portal_path());
        info!("Webhook: POST http://{}/polar/webhooks", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn print_banner() {
    println!(
        r#"
  Polar-Cart RS
  ━━━━━━━━━━━━━━━━━━━━━━━
  Polar checkout + customer portal
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
