//! Coordinate and hydrant input parsing.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use snotrack_core::{Hydrant, HydrantId, TrailId};
use snotrack_elevation::LatLon;

/// `"lat,lon;lat,lon"` into `[lat, lon]` pairs. Blank segments are skipped.
pub fn parse_coords(text: &str) -> Result<Vec<LatLon>> {
    text.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(parse_pair)
        .collect()
}

fn parse_pair(pair: &str) -> Result<LatLon> {
    let Some((lat, lon)) = pair.split_once(',') else {
        bail!("expected `lat,lon`, got `{}`", pair);
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("invalid latitude in `{}`", pair))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("invalid longitude in `{}`", pair))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        bail!("coordinate out of range: `{}`", pair);
    }
    Ok([lat, lon])
}

/// A JSON array of `[lat, lon]` pairs.
pub fn coords_from_json(json: &str) -> Result<Vec<LatLon>> {
    serde_json::from_str(json).context("expected a JSON array of [lat, lon] pairs")
}

/// Hydrant as stored in import/export files: position only, no map geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrantRecord {
    pub id: HydrantId,
    #[serde(default)]
    pub name: String,
    pub trail: TrailId,
    /// `[longitude, latitude]`
    pub coords: [f64; 2],
    #[serde(default)]
    pub elevation: Option<f64>,
}

impl HydrantRecord {
    pub fn into_hydrant(self) -> Hydrant {
        let mut hydrant = Hydrant::new(self.id, self.trail, self.coords).with_name(self.name);
        hydrant.elevation = self.elevation;
        hydrant
    }
}

impl From<&Hydrant> for HydrantRecord {
    fn from(hydrant: &Hydrant) -> Self {
        Self {
            id: hydrant.id.clone(),
            name: hydrant.name.clone(),
            trail: hydrant.trail.clone(),
            coords: hydrant.coords,
            elevation: hydrant.elevation,
        }
    }
}

pub fn hydrants_from_json(json: &str) -> Result<Vec<Hydrant>> {
    let records: Vec<HydrantRecord> =
        serde_json::from_str(json).context("expected a JSON array of hydrants")?;
    Ok(records.into_iter().map(HydrantRecord::into_hydrant).collect())
}
