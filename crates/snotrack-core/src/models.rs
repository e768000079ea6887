//! Domain records handed to the map core by its owner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::{Geometry, Point, Polygon};
use crate::ids::{self, HydrantId, TrailId};

/// Which drawing tools the operator has switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionMode {
    #[default]
    None,
    DrawModifyTrail,
    DrawModifyHydrants,
}

/// One polygon slot of a trail. The polygon may be missing, e.g. after
/// importing an empty placemark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailFeature {
    pub index: usize,
    #[serde(default)]
    pub polygon: Option<Polygon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub id: TrailId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub features: Vec<TrailFeature>,
}

/// A hydrant on a trail. `coords` is `[longitude, latitude]`; `feature` is the
/// same position in map units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hydrant {
    pub id: HydrantId,
    #[serde(default)]
    pub name: String,
    pub trail: TrailId,
    pub coords: [f64; 2],
    #[serde(default)]
    pub elevation: Option<f64>,
    pub feature: Point,
}

/// Full state the owner passes in on every update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapSnapshot {
    pub trails: BTreeMap<TrailId, Trail>,
    pub hydrants: BTreeMap<HydrantId, Hydrant>,
    pub mode: InteractionMode,
    pub selected_trail: Option<TrailId>,
}

impl Trail {
    pub fn new(id: impl Into<TrailId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            features: Vec::new(),
        }
    }

    /// Append a polygon under the next free index.
    pub fn with_polygon(mut self, polygon: Polygon) -> Self {
        let index = self.next_index();
        self.features.push(TrailFeature {
            index,
            polygon: Some(polygon),
        });
        self
    }

    pub fn next_index(&self) -> usize {
        self.features
            .iter()
            .map(|feature| feature.index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn first_polygon(&self) -> Option<&Polygon> {
        self.features.first().and_then(|feature| feature.polygon.as_ref())
    }

    /// Canvas ids of every polygon this trail currently owns.
    pub fn feature_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.features
            .iter()
            .filter(|feature| feature.polygon.is_some())
            .map(|feature| ids::trail_feature_id(&self.id, feature.index))
    }

    pub fn owns_index(&self, index: usize) -> bool {
        self.features
            .iter()
            .any(|feature| feature.index == index && feature.polygon.is_some())
    }

    /// `(canvas id, geometry)` for every present polygon.
    pub fn geometries(&self) -> impl Iterator<Item = (String, Geometry)> + '_ {
        self.features.iter().filter_map(|feature| {
            feature.polygon.as_ref().map(|polygon| {
                (
                    ids::trail_feature_id(&self.id, feature.index),
                    Geometry::Polygon(polygon.clone()),
                )
            })
        })
    }
}

impl Hydrant {
    /// Create a hydrant at `[lon, lat]`, projecting the point into map units.
    pub fn new(id: impl Into<HydrantId>, trail: impl Into<TrailId>, coords: [f64; 2]) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            trail: trail.into(),
            coords,
            elevation: None,
            feature: Point::from_lon_lat(coords[0], coords[1]),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn feature_id(&self) -> String {
        ids::hydrant_feature_id(&self.id)
    }

    pub fn longitude(&self) -> f64 {
        self.coords[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coords[1]
    }
}

impl MapSnapshot {
    pub fn new(trails: Vec<Trail>, hydrants: Vec<Hydrant>) -> Self {
        Self {
            trails: trails.into_iter().map(|t| (t.id.clone(), t)).collect(),
            hydrants: hydrants.into_iter().map(|h| (h.id.clone(), h)).collect(),
            mode: InteractionMode::None,
            selected_trail: None,
        }
    }

    pub fn with_mode(mut self, mode: InteractionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_selected_trail(mut self, trail: Option<TrailId>) -> Self {
        self.selected_trail = trail;
        self
    }

    pub fn selected(&self) -> Option<&Trail> {
        self.selected_trail
            .as_ref()
            .and_then(|id| self.trails.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_indices_are_stable_and_skip_missing_polygons() {
        let mut trail = Trail::new("7")
            .with_polygon(Polygon::new(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]))
            .with_polygon(Polygon::new(vec![[2.0, 2.0], [3.0, 2.0], [3.0, 3.0]]));
        trail.features.push(TrailFeature {
            index: 2,
            polygon: None,
        });

        assert_eq!(trail.next_index(), 3);
        let ids: Vec<String> = trail.feature_ids().collect();
        assert_eq!(ids, vec!["t-7-0", "t-7-1"]);
        assert!(trail.owns_index(1));
        assert!(!trail.owns_index(2));
    }

    #[test]
    fn hydrant_deserializes_with_defaults() {
        let hydrant: Hydrant = serde_json::from_value(serde_json::json!({
            "id": "42",
            "trail": "7",
            "coords": [-106.55, 39.61],
            "feature": { "coord": [0.0, 0.0] }
        }))
        .unwrap();
        assert_eq!(hydrant.elevation, None);
        assert_eq!(hydrant.feature_id(), "h-42");
        assert_eq!(hydrant.latitude(), 39.61);
    }

    #[test]
    fn mode_uses_wire_names() {
        let mode: InteractionMode = serde_json::from_str("\"DRAW_MODIFY_HYDRANTS\"").unwrap();
        assert_eq!(mode, InteractionMode::DrawModifyHydrants);
    }
}
