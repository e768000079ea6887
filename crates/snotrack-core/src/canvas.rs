//! The spatial canvas seen from the core.
//!
//! The concrete map library lives behind [`Canvas`]; reconciliation and the
//! interaction controller only talk to this trait.

use serde::{Deserialize, Serialize};

use crate::geometry::{Geometry, GeometryType};
use crate::view::View;

/// Screen position in CSS pixels, origin top-left.
pub type Pixel = [f64; 2];

/// Snap radius used while drawing trail polygons.
pub const SNAP_PIXEL_TOLERANCE: f64 = 5.0;

/// A geometry living on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub highlighted: bool,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            highlighted: false,
        }
    }
}

/// Interaction tools the controller can install.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Draw new geometry of the given type into the canvas source.
    Draw { geometry_type: GeometryType },
    /// Vertex editing restricted to the listed feature ids.
    Modify { features: Vec<String> },
    /// Snap pointer positions to any feature in the canvas source.
    Snap { pixel_tolerance: f64 },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Draw { .. } => "draw",
            Interaction::Modify { .. } => "modify",
            Interaction::Snap { .. } => "snap",
        }
    }
}

/// Opaque token returned by [`Canvas::install_interaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractionHandle(pub u64);

pub trait Canvas {
    /// Add features; ids already present on the canvas are ignored.
    fn add_features(&mut self, features: Vec<Feature>);

    fn remove_feature(&mut self, id: &str) -> Option<Feature>;

    fn feature_by_id(&self, id: &str) -> Option<&Feature>;

    fn feature_by_id_mut(&mut self, id: &str) -> Option<&mut Feature>;

    fn feature_ids(&self) -> Vec<String>;

    fn feature_count(&self) -> usize;

    /// Ids of features rendered under `pixel`, topmost first.
    fn features_at_pixel(&self, view: &View, pixel: Pixel) -> Vec<String>;

    fn install_interaction(&mut self, interaction: Interaction) -> InteractionHandle;

    fn remove_interaction(&mut self, handle: InteractionHandle) -> Option<Interaction>;
}
