//! Batched elevation resolution.
//!
//! Input order is preserved end to end: chunks are built in order, every
//! chunk request runs concurrently, and results are stitched back together
//! by chunk position regardless of which request finished first. A single
//! failed chunk fails the whole batch.

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::client::{ElevationProfileResponse, ElevationSource, ProfileRequest};
use crate::error::ElevationError;

/// `[latitude, longitude]`.
pub type LatLon = [f64; 2];

/// Maximum coordinates per service request; keeps the request URI short.
pub const CHUNK_SIZE: usize = 50;

/// Height the service reports when it has no data for a point.
pub const UNKNOWN_HEIGHT: f64 = -32768.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub elevation: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct ElevationResolver<S> {
    source: S,
}

impl<S: ElevationSource> ElevationResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Elevations for `coords`, in input order. Any failed request yields an
    /// empty result, meaning "no elevation data available".
    pub async fn resolve(&self, coords: &[LatLon]) -> Vec<ElevationSample> {
        match self.try_resolve(coords).await {
            Ok(samples) => samples,
            Err(err) => {
                tracing::warn!(
                    "Elevation lookup for {} coordinates failed, discarding batch: {}",
                    coords.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Same as [`resolve`](Self::resolve) but keeps the first failure.
    pub async fn try_resolve(&self, coords: &[LatLon]) -> Result<Vec<ElevationSample>, ElevationError> {
        if coords.is_empty() {
            return Ok(Vec::new());
        }

        let requests = chunk_requests(coords);
        tracing::debug!(
            "Fetching elevations for {} coordinates in {} requests",
            coords.len(),
            requests.len()
        );

        let responses = join_all(
            requests
                .iter()
                .map(|request| self.source.fetch_profile(request)),
        )
        .await;

        let mut samples = Vec::with_capacity(coords.len());
        for (request, response) in requests.iter().zip(responses) {
            samples.extend(merge_chunk(request, response?)?);
        }
        Ok(samples)
    }
}

/// Split `coords` into consecutive requests of at most [`CHUNK_SIZE`].
pub fn chunk_requests(coords: &[LatLon]) -> Vec<ProfileRequest> {
    coords
        .chunks(CHUNK_SIZE)
        .map(|chunk| ProfileRequest::new(chunk.to_vec()))
        .collect()
}

pub fn normalize_height(height: f64) -> Option<f64> {
    if height == UNKNOWN_HEIGHT {
        None
    } else {
        Some(height)
    }
}

/// Pair each returned height with the coordinate it was requested for.
fn merge_chunk(
    request: &ProfileRequest,
    response: ElevationProfileResponse,
) -> Result<Vec<ElevationSample>, ElevationError> {
    let expected = request.coordinates.len();
    let got = response.elevation_profile.len();
    if got != expected {
        return Err(ElevationError::SampleCount { expected, got });
    }

    Ok(request
        .coordinates
        .iter()
        .zip(response.elevation_profile)
        .map(|([latitude, longitude], point)| ElevationSample {
            elevation: normalize_height(point.height),
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ProfilePoint;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers with `height = latitude * 1000`, slowest for the first chunk.
    #[derive(Default)]
    struct FakeSource {
        requests: Mutex<Vec<usize>>,
        fail_chunk_starting_at: Option<LatLon>,
        unknown_at: Option<LatLon>,
    }

    #[async_trait]
    impl ElevationSource for FakeSource {
        async fn fetch_profile(
            &self,
            request: &ProfileRequest,
        ) -> Result<ElevationProfileResponse, ElevationError> {
            let order = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.coordinates.len());
                requests.len()
            };
            tokio::time::sleep(Duration::from_millis(100 / order as u64)).await;

            if request.coordinates.first().copied() == self.fail_chunk_starting_at {
                return Err(ElevationError::Status(500));
            }
            let elevation_profile = request
                .coordinates
                .iter()
                .map(|coord| ProfilePoint {
                    height: if Some(*coord) == self.unknown_at {
                        UNKNOWN_HEIGHT
                    } else {
                        coord[0] * 1000.0
                    },
                    distance: 0.0,
                })
                .collect();
            Ok(ElevationProfileResponse {
                elevation_profile,
                shape_points: request.coordinates.iter().flatten().copied().collect(),
                info: None,
            })
        }
    }

    fn coords(count: usize) -> Vec<LatLon> {
        (0..count).map(|i| [i as f64, -(i as f64)]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn splits_into_chunks_of_fifty_and_keeps_order() {
        let resolver = ElevationResolver::new(FakeSource::default());
        let input = coords(120);

        let samples = resolver.resolve(&input).await;

        let mut sizes = resolver.source().requests.lock().unwrap().clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![20, 50, 50]);
        assert_eq!(samples.len(), 120);
        for (i, sample) in samples.iter().enumerate() {
            assert_eq!(sample.latitude, i as f64);
            assert_eq!(sample.longitude, -(i as f64));
            assert_eq!(sample.elevation, Some(i as f64 * 1000.0));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sentinel_height_becomes_unknown() {
        let input = coords(3);
        let resolver = ElevationResolver::new(FakeSource {
            unknown_at: Some(input[1]),
            ..FakeSource::default()
        });

        let samples = resolver.resolve(&input).await;
        let elevations: Vec<Option<f64>> = samples.iter().map(|s| s.elevation).collect();
        assert_eq!(elevations, vec![Some(0.0), None, Some(2000.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn one_failed_chunk_discards_everything() {
        let input = coords(120);
        let resolver = ElevationResolver::new(FakeSource {
            fail_chunk_starting_at: Some(input[100]),
            ..FakeSource::default()
        });

        assert!(resolver.resolve(&input).await.is_empty());
        assert!(matches!(
            resolver.try_resolve(&input).await,
            Err(ElevationError::Status(500))
        ));
    }

    #[tokio::test]
    async fn empty_input_makes_no_requests() {
        let resolver = ElevationResolver::new(FakeSource::default());
        assert!(resolver.resolve(&[]).await.is_empty());
        assert!(resolver.source().requests.lock().unwrap().is_empty());
    }

    #[test]
    fn short_response_is_rejected() {
        let request = ProfileRequest::new(coords(2));
        let response = ElevationProfileResponse {
            elevation_profile: vec![ProfilePoint {
                height: 1.0,
                distance: 0.0,
            }],
            shape_points: Vec::new(),
            info: None,
        };
        assert!(matches!(
            merge_chunk(&request, response),
            Err(ElevationError::SampleCount {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn normalize_only_touches_sentinel() {
        assert_eq!(normalize_height(-32768.0), None);
        assert_eq!(normalize_height(-32767.0), Some(-32767.0));
        assert_eq!(normalize_height(0.0), Some(0.0));
    }
}
