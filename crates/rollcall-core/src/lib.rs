//! # Rollcall Core
//!
//! Core types, errors, and utilities for the Rollcall API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`serde`]: Custom serde serialization/deserialization helpers
//! - [`clock`]: Injectable source of the current date and time
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::{AppError, Clock, SystemClock};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Specialty not found"));
//! let today = SystemClock.today();
//! ```

pub mod clock;
pub mod errors;
pub mod pagination;
pub mod serde;

// Re-export commonly used types at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
