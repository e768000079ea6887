//! Filling in hydrant elevations.

use snotrack_core::{Hydrant, HydrantId};

use crate::client::ElevationSource;
use crate::resolver::{ElevationResolver, LatLon};

/// Elevation per hydrant, in input order. Empty if the lookup failed.
pub async fn hydrant_elevations<S: ElevationSource>(
    resolver: &ElevationResolver<S>,
    hydrants: &[Hydrant],
) -> Vec<(HydrantId, Option<f64>)> {
    // Hydrants store [lon, lat]; the service wants [lat, lon].
    let coords: Vec<LatLon> = hydrants
        .iter()
        .map(|hydrant| [hydrant.latitude(), hydrant.longitude()])
        .collect();

    let samples = resolver.resolve(&coords).await;
    if samples.len() != hydrants.len() {
        return Vec::new();
    }

    hydrants
        .iter()
        .zip(samples)
        .map(|(hydrant, sample)| (hydrant.id.clone(), sample.elevation))
        .collect()
}

/// Write resolved elevations onto `hydrants`. Returns how many hydrants got a
/// known elevation; on lookup failure nothing is changed.
pub async fn enrich_hydrants<S: ElevationSource>(
    resolver: &ElevationResolver<S>,
    hydrants: &mut [Hydrant],
) -> usize {
    let elevations = hydrant_elevations(resolver, hydrants).await;
    let mut known = 0;
    for (hydrant, (_, elevation)) in hydrants.iter_mut().zip(elevations) {
        hydrant.elevation = elevation;
        if elevation.is_some() {
            known += 1;
        }
    }
    known
}
