//! Attendance models, re-exported from `rollcall-models`.

pub use rollcall_models::attendance::*;
