//! Core domain model for strophe.
//!
//! This crate defines the `Song` record, the SQLite schema behind the
//! local lyrics library, and the analysis routines (lyrics normalization,
//! word statistics, and frequency aggregation).

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod analysis;
pub mod error;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
