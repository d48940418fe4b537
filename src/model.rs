//! Domain models for the academy dashboard.
//!
//! - [`Student`] - a roster entry
//! - [`load_roster`] / [`sample_roster`] - where the roster comes from

pub mod student;

pub use student::{Student, load_roster, sample_roster};
