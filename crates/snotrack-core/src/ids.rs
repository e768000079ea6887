//! Canvas feature identifiers.
//!
//! Every feature on the canvas carries a string id that points back to the
//! domain record owning it:
//!
//! - trail polygons: `t-<trailId>-<index>`
//! - hydrant points: `h-<hydrantId>`
//!
//! The same encoding is used for lookups and for resolving pointer hits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type TrailId = String;
pub type HydrantId = String;

const TRAIL_PREFIX: &str = "t";
const HYDRANT_PREFIX: &str = "h";
const SEPARATOR: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Trail,
    Hydrant,
}

/// Decoded form of a canvas feature id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Trail { trail: TrailId, index: usize },
    Hydrant { hydrant: HydrantId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized feature id: {0:?}")]
pub struct UnrecognizedFeatureId(pub String);

impl FeatureKey {
    pub fn trail(trail: impl Into<TrailId>, index: usize) -> Self {
        FeatureKey::Trail {
            trail: trail.into(),
            index,
        }
    }

    pub fn hydrant(hydrant: impl Into<HydrantId>) -> Self {
        FeatureKey::Hydrant {
            hydrant: hydrant.into(),
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureKey::Trail { .. } => FeatureKind::Trail,
            FeatureKey::Hydrant { .. } => FeatureKind::Hydrant,
        }
    }

    /// Id of the owning trail or hydrant.
    pub fn entity_id(&self) -> &str {
        match self {
            FeatureKey::Trail { trail, .. } => trail,
            FeatureKey::Hydrant { hydrant } => hydrant,
        }
    }

    /// Intra-trail index; hydrants own a single point and have none.
    pub fn index(&self) -> Option<usize> {
        match self {
            FeatureKey::Trail { index, .. } => Some(*index),
            FeatureKey::Hydrant { .. } => None,
        }
    }

    pub fn as_hydrant(&self) -> Option<&str> {
        match self {
            FeatureKey::Hydrant { hydrant } => Some(hydrant),
            FeatureKey::Trail { .. } => None,
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Trail { trail, index } => {
                write!(f, "{TRAIL_PREFIX}{SEPARATOR}{trail}{SEPARATOR}{index}")
            }
            FeatureKey::Hydrant { hydrant } => write!(f, "{HYDRANT_PREFIX}{SEPARATOR}{hydrant}"),
        }
    }
}

impl FromStr for FeatureKey {
    type Err = UnrecognizedFeatureId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).ok_or_else(|| UnrecognizedFeatureId(s.to_string()))
    }
}

pub fn encode(key: &FeatureKey) -> String {
    key.to_string()
}

pub fn trail_feature_id(trail: &str, index: usize) -> String {
    format!("{TRAIL_PREFIX}{SEPARATOR}{trail}{SEPARATOR}{index}")
}

pub fn hydrant_feature_id(hydrant: &str) -> String {
    format!("{HYDRANT_PREFIX}{SEPARATOR}{hydrant}")
}

/// Decode a feature id. Ids that are missing segments, use an unknown kind,
/// or carry a non-numeric trail index decode to `None`.
pub fn decode(id: &str) -> Option<FeatureKey> {
    let (kind, rest) = id.split_once(SEPARATOR)?;
    match kind {
        TRAIL_PREFIX => {
            // Index is always the last segment so trail ids may contain '-'.
            let (trail, index) = rest.rsplit_once(SEPARATOR)?;
            if trail.is_empty() {
                return None;
            }
            let index = index.parse().ok()?;
            Some(FeatureKey::Trail {
                trail: trail.to_string(),
                index,
            })
        }
        HYDRANT_PREFIX => {
            if rest.is_empty() {
                return None;
            }
            Some(FeatureKey::Hydrant {
                hydrant: rest.to_string(),
            })
        }
        _ => None,
    }
}

/// First hydrant among the given feature ids, in hit order.
pub fn first_hydrant<'a, I>(ids: I) -> Option<HydrantId>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(decode)
        .find_map(|key| key.as_hydrant().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_trail_and_hydrant_keys() {
        let keys = [
            FeatureKey::trail("7", 0),
            FeatureKey::trail("7", 12),
            FeatureKey::trail("upper-bowl", 3),
            FeatureKey::hydrant("42"),
            FeatureKey::hydrant("a-b"),
        ];
        for key in keys {
            assert_eq!(decode(&encode(&key)), Some(key.clone()), "{key}");
        }
    }

    #[test]
    fn encodes_canonical_strings() {
        assert_eq!(encode(&FeatureKey::trail("7", 1)), "t-7-1");
        assert_eq!(encode(&FeatureKey::hydrant("42")), "h-42");
        assert_eq!(trail_feature_id("7", 1), "t-7-1");
        assert_eq!(hydrant_feature_id("42"), "h-42");
    }

    #[test]
    fn short_or_foreign_ids_are_unrecognized() {
        for id in ["", "t", "t-", "t-7", "t--1", "t-7-x", "h", "h-", "h42", "x-1-2", "-"] {
            assert_eq!(decode(id), None, "{id:?}");
        }
        assert!("h42".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn accessors_expose_decoded_parts() {
        let key: FeatureKey = "t-9-2".parse().unwrap();
        assert_eq!(key.kind(), FeatureKind::Trail);
        assert_eq!(key.entity_id(), "9");
        assert_eq!(key.index(), Some(2));

        let key: FeatureKey = "h-42".parse().unwrap();
        assert_eq!(key.kind(), FeatureKind::Hydrant);
        assert_eq!(key.entity_id(), "42");
        assert_eq!(key.index(), None);
    }

    #[test]
    fn first_hydrant_skips_trails_and_garbage() {
        let hits = ["t-1-0", "bogus", "h-42", "h-43"];
        assert_eq!(first_hydrant(hits), Some("42".to_string()));
        assert_eq!(first_hydrant(["t-1-0"]), None);
    }
}
