//! Attendance taking and history.
//!
//! A teacher may only read or record attendance for templates assigned to
//! them. Each (student, template, date) has at most one row; saving a batch
//! again updates those rows in place.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
