//! Shared types for the Dine workspace
//!
//! Domain models, the unified error system and small utilities used by both
//! `dine-server` and its HTTP clients.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{OrderStatusEvent, RealtimeMessage};
pub use serde::{Deserialize, Serialize};
