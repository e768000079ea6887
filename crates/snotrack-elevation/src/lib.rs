//! SnoTrack elevation lookups.
//!
//! Resolves elevations for ordered coordinate lists against a MapQuest-style
//! elevation profile service, fifty points per request, all requests in
//! flight at once.

pub mod client;
pub mod enrich;
pub mod error;
pub mod resolver;

pub use client::{ElevationProfileResponse, ElevationSource, MapquestClient, ProfileRequest};
pub use enrich::{enrich_hydrants, hydrant_elevations};
pub use error::ElevationError;
pub use resolver::{ElevationResolver, ElevationSample, LatLon, CHUNK_SIZE, UNKNOWN_HEIGHT};
