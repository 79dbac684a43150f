//! Dated sessions derived from weekly templates.
//!
//! Sessions are never stored. Each request expands the relevant templates
//! over a date range and marks the occurrences that already have
//! attendance recorded.

pub mod controller;
pub mod expander;
pub mod model;
pub mod router;
pub mod service;
