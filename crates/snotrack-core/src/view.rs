//! Camera state and pan/focus targets.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::canvas::Pixel;
use crate::geometry::{self, Coord, Extent, Polygon};

/// Resolution (map units per pixel) at zoom 0 for 256px Web Mercator tiles.
pub const MAX_RESOLUTION: f64 = 156_543.033_928_040_97;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 28.0;

/// Default view: Vail, CO.
pub const DEFAULT_CENTER_LON_LAT: [f64; 2] = [-106.553668, 39.612616];
pub const DEFAULT_ZOOM: f64 = 14.2;

pub const FOCUS_ANIMATION: Duration = Duration::from_millis(500);

/// Camera over the canvas. Owned by a map session, never global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub center: Coord,
    pub zoom: f64,
    /// Viewport size in pixels, `[width, height]`.
    pub size: [f64; 2],
}

/// Where the camera should animate to.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTarget {
    pub center: Coord,
    pub zoom: f64,
    pub duration: Duration,
}

impl Default for View {
    fn default() -> Self {
        Self::new([1024.0, 768.0])
    }
}

impl View {
    pub fn new(size: [f64; 2]) -> Self {
        Self {
            center: geometry::from_lon_lat(DEFAULT_CENTER_LON_LAT[0], DEFAULT_CENTER_LON_LAT[1]),
            zoom: DEFAULT_ZOOM,
            size,
        }
    }

    pub fn with_center(mut self, center: Coord, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self
    }

    pub fn resolution(&self) -> f64 {
        resolution_for_zoom(self.zoom)
    }

    /// Resolution at which `extent` exactly fits the viewport.
    pub fn resolution_for_extent(&self, extent: Extent) -> f64 {
        let width = (extent[2] - extent[0]) / self.size[0].max(1.0);
        let height = (extent[3] - extent[1]) / self.size[1].max(1.0);
        width.max(height)
    }

    pub fn zoom_for_resolution(&self, resolution: f64) -> f64 {
        if !resolution.is_finite() || resolution <= 0.0 {
            return MAX_ZOOM;
        }
        (MAX_RESOLUTION / resolution)
            .log2()
            .clamp(MIN_ZOOM, MAX_ZOOM)
    }

    pub fn pixel_from_coordinate(&self, coord: Coord) -> Pixel {
        let resolution = self.resolution();
        [
            (coord[0] - self.center[0]) / resolution + self.size[0] / 2.0,
            (self.center[1] - coord[1]) / resolution + self.size[1] / 2.0,
        ]
    }

    pub fn coordinate_from_pixel(&self, pixel: Pixel) -> Coord {
        let resolution = self.resolution();
        [
            self.center[0] + (pixel[0] - self.size[0] / 2.0) * resolution,
            self.center[1] - (pixel[1] - self.size[1] / 2.0) * resolution,
        ]
    }

    /// Jump to the end state of an animation. Renderers that animate read the
    /// target themselves; the core only tracks where the camera ends up.
    pub fn animate(&mut self, target: &CameraTarget) {
        self.center = target.center;
        self.zoom = target.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

pub fn resolution_for_zoom(zoom: f64) -> f64 {
    MAX_RESOLUTION / 2f64.powf(zoom.clamp(MIN_ZOOM, MAX_ZOOM))
}

/// Camera target framing a trail's first polygon, or `None` when the trail
/// has no usable geometry.
pub fn focus_target(polygon: Option<&Polygon>, view: &View) -> Option<CameraTarget> {
    let polygon = polygon?;
    let extent = polygon.extent()?;
    let center = polygon.interior_point()?;
    let resolution = view.resolution_for_extent(extent);
    Some(CameraTarget {
        center,
        zoom: view.zoom_for_resolution(resolution),
        duration: FOCUS_ANIMATION,
    })
}
