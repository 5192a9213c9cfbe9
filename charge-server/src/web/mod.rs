//! Web layer for the EV charge map.
//!
//! Provides the JSON API the mobile frontend consumes and serves the
//! built frontend as static files.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
