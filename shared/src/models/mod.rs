//! Data models
//!
//! Shared between dine-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes, all timestamps are epoch milliseconds.

pub mod category;
pub mod dining_table;
pub mod dish;
pub mod event;
pub mod order;
pub mod settings;
pub mod table_bill;
pub mod tax_config;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use dish::*;
pub use event::*;
pub use order::*;
pub use settings::*;
pub use table_bill::*;
pub use tax_config::*;
