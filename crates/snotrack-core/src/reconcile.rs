//! Keeps the canvas feature set in step with the domain model.
//!
//! Each sync runs an additive pass (domain geometry missing from the canvas)
//! followed by a subtractive pass (canvas features whose owner is gone).
//! Adding first keeps the canvas from ever rendering empty mid-sync.

use std::collections::{BTreeMap, HashSet};

use crate::canvas::{Canvas, Feature};
use crate::geometry::Geometry;
use crate::ids::{self, FeatureKey, HydrantId, TrailId};
use crate::models::{Hydrant, Trail};

/// How a sync decides whether any diff work is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Skip the diff when the domain feature count equals the canvas feature
    /// count. Misses a replacement that leaves the count unchanged.
    #[default]
    CountGuard,
    /// Diff by identifier set on every call.
    FullDiff,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Count guard matched; canvas untouched.
    #[default]
    Skipped,
    Applied {
        added: Vec<String>,
        removed: Vec<String>,
    },
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        match self {
            SyncOutcome::Skipped => true,
            SyncOutcome::Applied { added, removed } => added.is_empty() && removed.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: SyncPolicy,
}

impl Reconciler {
    pub fn new(policy: SyncPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Bring `canvas` in line with `trails` and `hydrants`. Never fails;
    /// domain records without geometry are skipped.
    pub fn sync<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        trails: &BTreeMap<TrailId, Trail>,
        hydrants: &BTreeMap<HydrantId, Hydrant>,
    ) -> SyncOutcome {
        if self.policy == SyncPolicy::CountGuard {
            let expected = expected_feature_count(trails, hydrants);
            if expected == canvas.feature_count() {
                return SyncOutcome::Skipped;
            }
        }

        let added = add_missing(canvas, trails, hydrants);
        let removed = remove_orphans(canvas, trails, hydrants);

        if !added.is_empty() || !removed.is_empty() {
            tracing::debug!(
                "Canvas sync added {} and removed {} features",
                added.len(),
                removed.len()
            );
        }
        SyncOutcome::Applied { added, removed }
    }
}

/// Polygon slots of every trail plus one point per hydrant.
pub fn expected_feature_count(
    trails: &BTreeMap<TrailId, Trail>,
    hydrants: &BTreeMap<HydrantId, Hydrant>,
) -> usize {
    trails.values().map(|trail| trail.features.len()).sum::<usize>() + hydrants.len()
}

fn add_missing<C: Canvas + ?Sized>(
    canvas: &mut C,
    trails: &BTreeMap<TrailId, Trail>,
    hydrants: &BTreeMap<HydrantId, Hydrant>,
) -> Vec<String> {
    let mut pending: Vec<Feature> = Vec::new();
    let mut queued: HashSet<String> = HashSet::new();

    let trail_geometries = trails.values().flat_map(|trail| trail.geometries());
    let hydrant_geometries = hydrants
        .values()
        .map(|hydrant| (hydrant.feature_id(), Geometry::Point(hydrant.feature.clone())));

    for (id, geometry) in trail_geometries.chain(hydrant_geometries) {
        if canvas.feature_by_id(&id).is_some() || !queued.insert(id.clone()) {
            continue;
        }
        pending.push(Feature::new(id, geometry));
    }

    let added: Vec<String> = pending.iter().map(|f| f.id.clone()).collect();
    if !pending.is_empty() {
        canvas.add_features(pending);
    }
    added
}

fn remove_orphans<C: Canvas + ?Sized>(
    canvas: &mut C,
    trails: &BTreeMap<TrailId, Trail>,
    hydrants: &BTreeMap<HydrantId, Hydrant>,
) -> Vec<String> {
    let orphans: Vec<String> = canvas
        .feature_ids()
        .into_iter()
        .filter(|id| match ids::decode(id) {
            Some(FeatureKey::Trail { trail, index }) => trails
                .get(&trail)
                .map(|owner| !owner.owns_index(index))
                .unwrap_or(true),
            Some(FeatureKey::Hydrant { hydrant }) => !hydrants.contains_key(&hydrant),
            // Not ours to manage.
            None => false,
        })
        .collect();

    for id in &orphans {
        canvas.remove_feature(id);
    }
    orphans
}
