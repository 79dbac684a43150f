//! # Rollcall CLI
//!
//! Administrative commands and database seeding for development.
//!
//! ```ignore
//! use rollcall_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(3); // 3 specialties with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod issue;
pub mod seeder;
