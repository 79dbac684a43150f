//! Registration numbers.
//!
//! Administration issues numbers per specialty and year; registration
//! consumes one and deleting or rejecting a student releases it. The
//! transactional `consume`/`release` pair is used by the registrations
//! module.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
