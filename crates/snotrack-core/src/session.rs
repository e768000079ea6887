//! A live map: one canvas, one camera, and the logic that keeps them in step
//! with the owner's snapshots.

use crate::canvas::{Canvas, Pixel};
use crate::geometry::Geometry;
use crate::ids::{self, HydrantId, TrailId};
use crate::interaction::{InteractionController, InteractionState, MapEvent, ModifyEvent};
use crate::models::MapSnapshot;
use crate::reconcile::{Reconciler, SyncOutcome, SyncPolicy};
use crate::view::{self, CameraTarget, View};

/// Receiver for edit requests coming out of the map.
pub trait MapObserver {
    fn on_draw_end(&mut self, geometry: Geometry);
    fn on_modify_start(&mut self, event: ModifyEvent);
    fn on_modify_end(&mut self, event: ModifyEvent);
    fn on_hydrant_selected(&mut self, hydrant: HydrantId);

    fn notify(&mut self, event: MapEvent) {
        match event {
            MapEvent::DrawEnd(geometry) => self.on_draw_end(geometry),
            MapEvent::ModifyStart(event) => self.on_modify_start(event),
            MapEvent::ModifyEnd(event) => self.on_modify_end(event),
            MapEvent::HydrantSelected(hydrant) => self.on_hydrant_selected(hydrant),
        }
    }
}

/// Collects events in order; handy for tests and batch consumers.
impl MapObserver for Vec<MapEvent> {
    fn on_draw_end(&mut self, geometry: Geometry) {
        self.push(MapEvent::DrawEnd(geometry));
    }

    fn on_modify_start(&mut self, event: ModifyEvent) {
        self.push(MapEvent::ModifyStart(event));
    }

    fn on_modify_end(&mut self, event: ModifyEvent) {
        self.push(MapEvent::ModifyEnd(event));
    }

    fn on_hydrant_selected(&mut self, hydrant: HydrantId) {
        self.push(MapEvent::HydrantSelected(hydrant));
    }
}

/// What a single [`MapSession::update`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    pub sync: SyncOutcome,
    pub interactions_swapped: bool,
    pub focus: Option<CameraTarget>,
}

pub struct MapSession<C: Canvas> {
    canvas: C,
    view: View,
    reconciler: Reconciler,
    controller: InteractionController,
    selected_trail: Option<TrailId>,
}

impl<C: Canvas> MapSession<C> {
    pub fn new(canvas: C, view: View) -> Self {
        Self::with_policy(canvas, view, SyncPolicy::default())
    }

    pub fn with_policy(canvas: C, view: View, policy: SyncPolicy) -> Self {
        Self {
            canvas,
            view,
            reconciler: Reconciler::new(policy),
            controller: InteractionController::new(),
            selected_trail: None,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    /// Apply a new snapshot: reconcile features, swap tools if the watched
    /// inputs changed, and pan to a newly selected trail.
    pub fn update(&mut self, snapshot: &MapSnapshot) -> UpdateReport {
        let sync = self
            .reconciler
            .sync(&mut self.canvas, &snapshot.trails, &snapshot.hydrants);
        let interactions_swapped = self.controller.update(&mut self.canvas, snapshot);

        let mut focus = None;
        if snapshot.selected_trail != self.selected_trail {
            if let Some(trail_id) = &snapshot.selected_trail {
                let polygon = snapshot
                    .trails
                    .get(trail_id)
                    .and_then(|trail| trail.first_polygon());
                match view::focus_target(polygon, &self.view) {
                    Some(target) => {
                        self.view.animate(&target);
                        focus = Some(target);
                    }
                    None => tracing::info!("No coordinates found for trail {}", trail_id),
                }
            }
            self.selected_trail = snapshot.selected_trail.clone();
        }

        UpdateReport {
            sync,
            interactions_swapped,
            focus,
        }
    }

    pub fn draw_end<O: MapObserver + ?Sized>(&mut self, geometry: Geometry, observer: &mut O) {
        if let Some(event) = self.controller.draw_end(&self.canvas, &self.view, geometry) {
            observer.notify(event);
        }
    }

    pub fn modify_start<O: MapObserver + ?Sized>(&mut self, event: ModifyEvent, observer: &mut O) {
        let event = self.controller.modify_start(&self.canvas, &self.view, event);
        observer.notify(event);
    }

    /// End of a vertex drag. Edited geometry is written back to the canvas
    /// before the owner hears about it.
    pub fn modify_end<O: MapObserver + ?Sized>(&mut self, event: ModifyEvent, observer: &mut O) {
        for edited in &event.features {
            if let Some(feature) = self.canvas.feature_by_id_mut(&edited.id) {
                feature.geometry = edited.geometry.clone();
            }
        }
        observer.notify(self.controller.modify_end(event));
    }

    pub fn click<O: MapObserver + ?Sized>(&mut self, pixel: Pixel, observer: &mut O) {
        if let Some(event) = self.controller.click(&self.canvas, &self.view, pixel) {
            observer.notify(event);
        }
    }

    /// Toggle the hover highlight on a hydrant's point. Returns false when the
    /// hydrant has no feature on the canvas.
    pub fn set_hydrant_highlighted(&mut self, hydrant: &str, highlighted: bool) -> bool {
        match self.canvas.feature_by_id_mut(&ids::hydrant_feature_id(hydrant)) {
            Some(feature) => {
                feature.highlighted = highlighted;
                true
            }
            None => false,
        }
    }

    /// Remove installed tools and hand the canvas back.
    pub fn close(mut self) -> C {
        self.controller.teardown(&mut self.canvas);
        self.canvas
    }
}
