//! SnoTrack map core.
//!
//! Keeps a spatial canvas in step with the trail/hydrant model, drives the
//! draw/modify/snap tool set from the current mode and selection, and turns
//! pointer events back into edit requests for the model's owner.

pub mod canvas;
pub mod geometry;
pub mod ids;
pub mod interaction;
pub mod listing;
pub mod memory;
pub mod models;
pub mod reconcile;
pub mod session;
pub mod view;

pub use canvas::{Canvas, Feature, Interaction, InteractionHandle, Pixel};
pub use geometry::{Coord, Geometry, GeometryType, Point, Polygon};
pub use ids::{FeatureKey, FeatureKind, HydrantId, TrailId};
pub use interaction::{InteractionController, InteractionState, MapEvent, ModifyEvent};
pub use memory::MemoryCanvas;
pub use models::{Hydrant, InteractionMode, MapSnapshot, Trail, TrailFeature};
pub use reconcile::{Reconciler, SyncOutcome, SyncPolicy};
pub use session::{MapObserver, MapSession, UpdateReport};
pub use view::{CameraTarget, View};
