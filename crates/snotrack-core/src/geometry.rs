//! Planar geometry in the map projection (Web Mercator metres).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// `[x, y]` in projected map units.
pub type Coord = [f64; 2];

/// `[min_x, min_y, max_x, max_y]`.
pub type Extent = [f64; 4];

const EARTH_RADIUS_M: f64 = 6_378_137.0;
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Polygon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub coord: Coord,
}

/// Polygon as a list of closed or open rings; the first ring is the exterior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<Vec<Coord>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum Geometry {
    Point(Point),
    Polygon(Polygon),
}

/// Project WGS84 longitude/latitude to Web Mercator.
pub fn from_lon_lat(lon: f64, lat: f64) -> Coord {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    [x, y]
}

/// Inverse of [`from_lon_lat`], returns `[lon, lat]`.
pub fn to_lon_lat(coord: Coord) -> [f64; 2] {
    let lon = (coord[0] / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (coord[1] / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    [lon, lat]
}

impl Point {
    pub fn new(coord: Coord) -> Self {
        Self { coord }
    }

    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self::new(from_lon_lat(lon, lat))
    }
}

impl Polygon {
    pub fn new(exterior: Vec<Coord>) -> Self {
        Self {
            rings: vec![exterior],
        }
    }

    pub fn exterior(&self) -> &[Coord] {
        self.rings.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn extent(&self) -> Option<Extent> {
        extent_of(self.exterior().iter())
    }

    /// Even-odd containment over all rings, so holes are excluded.
    pub fn contains(&self, coord: Coord) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            for (a, b) in ring_edges(ring) {
                if (a[1] > coord[1]) != (b[1] > coord[1]) {
                    let x = a[0] + (coord[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
                    if coord[0] < x {
                        inside = !inside;
                    }
                }
            }
        }
        inside
    }

    /// A point guaranteed to be inside the polygon: the midpoint of the widest
    /// horizontal interval crossing the polygon at the extent's middle height.
    pub fn interior_point(&self) -> Option<Coord> {
        let extent = self.extent()?;
        let y = (extent[1] + extent[3]) / 2.0;

        let mut crossings: Vec<f64> = Vec::new();
        for ring in &self.rings {
            for (a, b) in ring_edges(ring) {
                if (a[1] <= y && b[1] > y) || (b[1] <= y && a[1] > y) {
                    crossings.push(a[0] + (y - a[1]) * (b[0] - a[0]) / (b[1] - a[1]));
                }
            }
        }
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let widest = crossings
            .chunks_exact(2)
            .max_by(|a, b| {
                (a[1] - a[0])
                    .partial_cmp(&(b[1] - b[0]))
                    .unwrap_or(Ordering::Equal)
            });

        match widest {
            Some(pair) => Some([(pair[0] + pair[1]) / 2.0, y]),
            // Degenerate (flat) rings: fall back to the extent center.
            None => Some([(extent[0] + extent[2]) / 2.0, y]),
        }
    }
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::Polygon(_) => GeometryType::Polygon,
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        match self {
            Geometry::Point(point) => extent_of(std::iter::once(&point.coord)),
            Geometry::Polygon(polygon) => polygon.extent(),
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Geometry::Point(point) => Some(point),
            Geometry::Polygon(_) => None,
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

pub fn distance(a: Coord, b: Coord) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

fn extent_of<'a>(coords: impl Iterator<Item = &'a Coord>) -> Option<Extent> {
    let mut extent = [
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    ];
    for coord in coords {
        if !coord[0].is_finite() || !coord[1].is_finite() {
            continue;
        }
        extent[0] = extent[0].min(coord[0]);
        extent[1] = extent[1].min(coord[1]);
        extent[2] = extent[2].max(coord[0]);
        extent[3] = extent[3].max(coord[1]);
    }
    if !extent[0].is_finite() {
        return None;
    }
    Some(extent)
}

/// Edges of a ring, closing it if the last vertex differs from the first.
fn ring_edges(ring: &[Coord]) -> impl Iterator<Item = (Coord, Coord)> + '_ {
    let closing = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if ring.len() > 1 && first != last => Some((*last, *first)),
        _ => None,
    };
    ring.windows(2).map(|w| (w[0], w[1])).chain(closing)
}
