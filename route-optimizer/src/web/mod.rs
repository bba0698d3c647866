//! HTTP layer of the route optimizer.
//!
//! Serves the airport catalog clients pick destinations from, and runs the
//! planner for a submitted selection.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router, http_status};
pub use state::AppState;
