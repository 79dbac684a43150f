//! Student registration and its reversal.
//!
//! Registering consumes a registration number and creates an unapproved
//! student in one transaction. Rejecting a pending registration or deleting
//! a student releases the number in the same transaction as the delete.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
