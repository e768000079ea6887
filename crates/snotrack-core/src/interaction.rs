//! Interaction mode state machine.
//!
//! The active tool set is a pure function of the snapshot's mode, selection,
//! hydrant count and the selected trail's polygon count. [`transition`]
//! computes the next state and the swap to perform; [`InteractionController`]
//! applies it to a canvas and resolves pointer events back to domain ids.

use crate::canvas::{Canvas, Feature, Interaction, InteractionHandle, Pixel, SNAP_PIXEL_TOLERANCE};
use crate::geometry::{Geometry, GeometryType};
use crate::ids::{self, HydrantId, TrailId};
use crate::models::{InteractionMode, MapSnapshot};
use crate::view::View;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    DrawModifyTrail {
        trail: Option<TrailId>,
    },
    DrawModifyHydrants {
        trail: Option<TrailId>,
    },
}

/// The part of a snapshot that decides which tools are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchKey {
    pub mode: InteractionMode,
    pub selected_trail: Option<TrailId>,
    pub hydrant_count: usize,
    /// Polygon slots of the selected trail; edits that add polygons must
    /// rebuild the modify set.
    pub selected_feature_count: usize,
}

impl WatchKey {
    pub fn of(snapshot: &MapSnapshot) -> Self {
        Self {
            mode: snapshot.mode,
            selected_trail: snapshot.selected_trail.clone(),
            hydrant_count: snapshot.hydrants.len(),
            selected_feature_count: snapshot
                .selected()
                .map(|trail| trail.features.len())
                .unwrap_or(0),
        }
    }
}

/// Result of [`transition`]: remove everything in `remove`, then install
/// `install` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: InteractionState,
    pub key: WatchKey,
    pub remove: Vec<InteractionHandle>,
    pub install: Vec<Interaction>,
}

/// Vertex edit notification passed through to the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyEvent {
    pub pixel: Pixel,
    /// Features being edited, with their current geometry.
    pub features: Vec<Feature>,
}

/// Requests reported upward; the owner decides what changes in the model.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    DrawEnd(Geometry),
    ModifyStart(ModifyEvent),
    ModifyEnd(ModifyEvent),
    HydrantSelected(HydrantId),
}

pub fn state_for(snapshot: &MapSnapshot) -> InteractionState {
    match snapshot.mode {
        InteractionMode::None => InteractionState::Idle,
        InteractionMode::DrawModifyTrail => InteractionState::DrawModifyTrail {
            trail: snapshot.selected_trail.clone(),
        },
        InteractionMode::DrawModifyHydrants => InteractionState::DrawModifyHydrants {
            trail: snapshot.selected_trail.clone(),
        },
    }
}

/// Canvas ids of the features the modify tool may edit.
pub fn modifiable_set(state: &InteractionState, snapshot: &MapSnapshot) -> Vec<String> {
    match state {
        InteractionState::Idle => Vec::new(),
        InteractionState::DrawModifyTrail { trail } => trail
            .as_ref()
            .and_then(|id| snapshot.trails.get(id))
            .map(|trail| trail.feature_ids().collect())
            .unwrap_or_default(),
        InteractionState::DrawModifyHydrants { trail } => match trail {
            Some(trail) => snapshot
                .hydrants
                .values()
                .filter(|hydrant| &hydrant.trail == trail)
                .map(|hydrant| hydrant.feature_id())
                .collect(),
            None => Vec::new(),
        },
    }
}

/// Tools for a state, in install order: draw, modify, snap.
pub fn interactions_for(state: &InteractionState, snapshot: &MapSnapshot) -> Vec<Interaction> {
    let mut tools = Vec::new();

    let draw_type = match state {
        InteractionState::DrawModifyTrail { trail: Some(_) } => Some(GeometryType::Polygon),
        InteractionState::DrawModifyHydrants { .. } => Some(GeometryType::Point),
        _ => None,
    };
    if let Some(geometry_type) = draw_type {
        tools.push(Interaction::Draw { geometry_type });
    }

    let modifiable = modifiable_set(state, snapshot);
    if !modifiable.is_empty() {
        tools.push(Interaction::Modify {
            features: modifiable,
        });
    }

    if matches!(state, InteractionState::DrawModifyTrail { .. }) {
        tools.push(Interaction::Snap {
            pixel_tolerance: SNAP_PIXEL_TOLERANCE,
        });
    }

    tools
}

/// Next state and tool swap, or `None` when nothing watched has changed.
pub fn transition(
    prev: Option<&WatchKey>,
    installed: &[InteractionHandle],
    snapshot: &MapSnapshot,
) -> Option<Transition> {
    let key = WatchKey::of(snapshot);
    if prev == Some(&key) {
        return None;
    }
    let next = state_for(snapshot);
    let install = interactions_for(&next, snapshot);
    Some(Transition {
        next,
        key,
        remove: installed.to_vec(),
        install,
    })
}

#[derive(Debug, Default)]
pub struct InteractionController {
    key: Option<WatchKey>,
    state: InteractionState,
    installed: Vec<InteractionHandle>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn installed(&self) -> &[InteractionHandle] {
        &self.installed
    }

    /// Re-evaluate against a snapshot; returns whether the tools were swapped.
    pub fn update<C: Canvas + ?Sized>(&mut self, canvas: &mut C, snapshot: &MapSnapshot) -> bool {
        match transition(self.key.as_ref(), &self.installed, snapshot) {
            Some(next) => {
                self.apply(canvas, next);
                true
            }
            None => false,
        }
    }

    pub fn apply<C: Canvas + ?Sized>(&mut self, canvas: &mut C, transition: Transition) {
        for handle in &transition.remove {
            canvas.remove_interaction(*handle);
        }
        let names: Vec<&'static str> = transition.install.iter().map(Interaction::name).collect();
        self.installed = transition
            .install
            .into_iter()
            .map(|interaction| canvas.install_interaction(interaction))
            .collect();
        tracing::debug!("Interactions for {:?}: {:?}", transition.next, names);
        self.state = transition.next;
        self.key = Some(transition.key);
    }

    /// Remove every installed tool and return to idle.
    pub fn teardown<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        for handle in self.installed.drain(..) {
            canvas.remove_interaction(handle);
        }
        self.state = InteractionState::Idle;
        self.key = None;
    }

    fn in_hydrant_mode(&self) -> bool {
        matches!(self.state, InteractionState::DrawModifyHydrants { .. })
    }

    /// A finished draw. In hydrant mode a point dropped onto an existing
    /// hydrant is discarded.
    pub fn draw_end<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        view: &View,
        geometry: Geometry,
    ) -> Option<MapEvent> {
        if self.in_hydrant_mode() {
            if let Some(point) = geometry.as_point() {
                let pixel = view.pixel_from_coordinate(point.coord);
                if let Some(hydrant) = hit_hydrant(canvas, view, pixel) {
                    tracing::debug!("Draw over hydrant {} discarded", hydrant);
                    return None;
                }
            }
        }
        Some(MapEvent::DrawEnd(geometry))
    }

    /// Start of a vertex drag. Grabbing a hydrant in hydrant mode selects it.
    pub fn modify_start<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        view: &View,
        event: ModifyEvent,
    ) -> MapEvent {
        if self.in_hydrant_mode() {
            if let Some(hydrant) = hit_hydrant(canvas, view, event.pixel) {
                return MapEvent::HydrantSelected(hydrant);
            }
        }
        MapEvent::ModifyStart(event)
    }

    pub fn modify_end(&self, event: ModifyEvent) -> MapEvent {
        MapEvent::ModifyEnd(event)
    }

    /// Plain click; only selects hydrants while editing hydrants.
    pub fn click<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        view: &View,
        pixel: Pixel,
    ) -> Option<MapEvent> {
        if !self.in_hydrant_mode() {
            return None;
        }
        hit_hydrant(canvas, view, pixel).map(MapEvent::HydrantSelected)
    }
}

/// First hydrant under `pixel`, topmost first.
pub fn hit_hydrant<C: Canvas + ?Sized>(canvas: &C, view: &View, pixel: Pixel) -> Option<HydrantId> {
    let hits = canvas.features_at_pixel(view, pixel);
    ids::first_hydrant(hits.iter().map(String::as_str))
}
