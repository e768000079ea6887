//! SnoTrack CLI - elevation lookups and hydrant enrichment from the shell.
//!
//! The `snotrack` binary wraps these modules:
//! - config: environment configuration for the elevation service
//! - input: coordinate and hydrant file parsing

pub mod config;
pub mod input;

pub use config::Config;
pub use input::{parse_coords, HydrantRecord};
