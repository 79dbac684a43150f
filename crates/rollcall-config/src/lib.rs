//! # Rollcall Config
//!
//! Configuration types for the Rollcall API, loaded from environment
//! variables:
//!
//! - [`cors`]: allowed CORS origins
//! - [`schedule`]: allowed template days, session length, default window
//! - [`server`]: bind address
//!
//! # Example
//!
//! ```ignore
//! use rollcall_config::{CorsConfig, ScheduleConfig, ServerConfig};
//!
//! let cors = CorsConfig::from_env();
//! let schedule = ScheduleConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod schedule;
pub mod server;

pub use cors::CorsConfig;
pub use schedule::ScheduleConfig;
pub use server::ServerConfig;
