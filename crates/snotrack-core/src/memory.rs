//! In-memory [`Canvas`] used by tests and headless tools.

use std::collections::BTreeMap;

use crate::canvas::{Canvas, Feature, Interaction, InteractionHandle, Pixel};
use crate::geometry::{self, Geometry};
use crate::view::View;

/// Radius around a rendered point that counts as a hit.
pub const DEFAULT_POINT_HIT_RADIUS_PX: f64 = 7.0;

#[derive(Debug, Default)]
pub struct MemoryCanvas {
    /// Insertion order doubles as render order (last is topmost).
    features: Vec<Feature>,
    interactions: BTreeMap<InteractionHandle, Interaction>,
    next_handle: u64,
    mutations: usize,
    point_hit_radius_px: Option<f64>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_point_hit_radius(mut self, radius_px: f64) -> Self {
        self.point_hit_radius_px = Some(radius_px);
        self
    }

    /// Number of feature adds/removes applied so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn interactions(&self) -> impl Iterator<Item = (&InteractionHandle, &Interaction)> {
        self.interactions.iter()
    }

    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    fn hit(&self, feature: &Feature, view: &View, pixel: Pixel) -> bool {
        match &feature.geometry {
            Geometry::Point(point) => {
                let radius = self
                    .point_hit_radius_px
                    .unwrap_or(DEFAULT_POINT_HIT_RADIUS_PX);
                geometry::distance(view.pixel_from_coordinate(point.coord), pixel) <= radius
            }
            Geometry::Polygon(polygon) => polygon.contains(view.coordinate_from_pixel(pixel)),
        }
    }
}

impl Canvas for MemoryCanvas {
    fn add_features(&mut self, features: Vec<Feature>) {
        for feature in features {
            if self.feature_by_id(&feature.id).is_some() {
                continue;
            }
            self.features.push(feature);
            self.mutations += 1;
        }
    }

    fn remove_feature(&mut self, id: &str) -> Option<Feature> {
        let position = self.features.iter().position(|f| f.id == id)?;
        self.mutations += 1;
        Some(self.features.remove(position))
    }

    fn feature_by_id(&self, id: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    fn feature_by_id_mut(&mut self, id: &str) -> Option<&mut Feature> {
        self.features.iter_mut().find(|f| f.id == id)
    }

    fn feature_ids(&self) -> Vec<String> {
        self.features.iter().map(|f| f.id.clone()).collect()
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn features_at_pixel(&self, view: &View, pixel: Pixel) -> Vec<String> {
        self.features
            .iter()
            .rev()
            .filter(|feature| self.hit(feature, view, pixel))
            .map(|feature| feature.id.clone())
            .collect()
    }

    fn install_interaction(&mut self, interaction: Interaction) -> InteractionHandle {
        let handle = InteractionHandle(self.next_handle);
        self.next_handle += 1;
        self.interactions.insert(handle, interaction);
        handle
    }

    fn remove_interaction(&mut self, handle: InteractionHandle) -> Option<Interaction> {
        self.interactions.remove(&handle)
    }
}
