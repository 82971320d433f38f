//! Axum-based HTTP server for the scheduling backend.
//!
//! Thin transport layer: every endpoint maps directly to one service-layer
//! function. The core itself is transport-agnostic.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::{ApiError, AppError};
pub use router::create_router;
pub use state::AppState;
