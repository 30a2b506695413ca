//! Remote lyrics fetching for strophe.
//!
//! Implements the provider client (Genius web API), the local-first
//! song resolution flow, and configuration loading.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod genius;
pub mod resolve;

pub use config::Config;
pub use error::{FetchError, FetchResult};
pub use genius::{GeniusClient, LyricsProvider, ProviderSong};
pub use resolve::resolve;
