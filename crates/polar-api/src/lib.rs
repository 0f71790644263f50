//! # polar-api
//!
//! HTTP layer for polar-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Server-rendered home page in two flavors
//! - Checkout and customer portal redirects
//! - Polar webhook verification
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Home page |
//! | GET | `/health` | Health check |
//! | GET | `/checkout`, `/api/checkout` | Redirect to a new checkout |
//! | GET | `/portal`, `/api/portal` | Redirect to the customer portal |
//! | POST | `/polar/webhooks` | Polar webhook |

pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppConfig, AppFlavor, AppState};
