//! Registration number models, re-exported from `rollcall-models`.

pub use rollcall_models::registration_numbers::*;
