//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity IDs
//! - [`value_types`]: Schedule days, study modes, attendance statuses
//! - [`specialties`]: Reference data (specialties, modules, teachers)
//! - [`registration_numbers`]: Registration numbers and numbering rules
//! - [`schedules`]: Weekly schedule templates
//! - [`sessions`]: Dated sessions and date ranges
//! - [`attendance`]: Attendance rows, rosters, history
//! - [`students`]: Students and registration
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::registration_numbers::{format_number, next_sequence, number_prefix};
//!
//! let prefix = number_prefix("EB", 2025);
//! let number = format_number(&prefix, next_sequence(["EB2025001"], &prefix));
//! assert_eq!(number, "EB2025002");
//! ```

pub mod attendance;
pub mod ids;
pub mod registration_numbers;
pub mod schedules;
pub mod sessions;
pub mod specialties;
pub mod students;
pub mod value_types;

pub use value_types::{AttendanceStatus, DaySet, ScheduleDay, StudyMode};
