//! Weekly schedule templates.
//!
//! Creating or editing a template runs the conflict detector against the
//! other templates of the same specialty, academic year and day.

pub mod conflict;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
