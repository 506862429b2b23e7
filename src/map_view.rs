use std::time::Duration;

use ratatui::layout::Rect;

use crate::error::MapError;
use crate::workout::Coords;

pub const DEFAULT_ZOOM: u8 = 13;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 18;

/// How long an animated recenter takes.
pub const PAN_DURATION: Duration = Duration::from_secs(1);

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Cursor moves this fraction of the visible width per keypress.
const CURSOR_STEP: f64 = 1.0 / 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Id of the workout this marker belongs to.
    pub key: String,
    pub coords: Coords,
    pub popup: String,
    pub style: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coords,
    pub zoom: u8,
}

impl Viewport {
    /// Longitude span shown at this zoom level.
    pub fn lng_span(&self) -> f64 {
        360.0 / 2_f64.powi(self.zoom as i32)
    }

    /// Canvas bounds for a drawing area, keeping cells roughly square on screen.
    pub fn bounds(&self, area: Rect) -> ([f64; 2], [f64; 2]) {
        let half_w = self.lng_span() / 2.0;
        let half_h = if area.width == 0 {
            half_w
        } else {
            half_w * (area.height as f64 * CELL_ASPECT) / area.width as f64
        };

        (
            [self.center.lng - half_w, self.center.lng + half_w],
            [self.center.lat - half_h, self.center.lat + half_h],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pan {
    from: Coords,
    to: Coords,
    elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MapState {
    Uninitialized,
    Ready(Viewport),
}

/// Map widget state: viewport, markers and the keyboard cursor.
#[derive(Debug, Clone)]
pub struct MapView {
    state: MapState,
    markers: Vec<Marker>,
    cursor: Coords,
    pan: Option<Pan>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}

impl MapView {
    pub fn new() -> Self {
        Self {
            state: MapState::Uninitialized,
            markers: Vec::new(),
            cursor: Coords::new(0.0, 0.0),
            pan: None,
        }
    }

    pub fn initialize(&mut self, center: Coords, zoom: u8) {
        self.state = MapState::Ready(Viewport {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        });
        self.cursor = center;
        self.pan = None;
        tracing::debug!(lat = center.lat, lng = center.lng, zoom, "map initialized");
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, MapState::Ready(_))
    }

    pub fn viewport(&self) -> Option<Viewport> {
        match self.state {
            MapState::Ready(vp) => Some(vp),
            MapState::Uninitialized => None,
        }
    }

    pub fn add_marker(
        &mut self,
        key: &str,
        coords: Coords,
        popup: &str,
        style: &str,
    ) -> Result<(), MapError> {
        if !self.is_ready() {
            return Err(MapError::NotReady);
        }
        self.markers.push(Marker {
            key: key.to_string(),
            coords,
            popup: popup.to_string(),
            style: style.to_string(),
        });
        Ok(())
    }

    pub fn remove_marker(&mut self, key: &str) {
        self.markers.retain(|m| m.key != key);
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Move the view to `coords`, either at once or over [`PAN_DURATION`].
    pub fn center_on(&mut self, coords: Coords, zoom: u8, animate: bool) -> Result<(), MapError> {
        let MapState::Ready(vp) = &mut self.state else {
            return Err(MapError::NotReady);
        };

        vp.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        if animate {
            self.pan = Some(Pan {
                from: vp.center,
                to: coords,
                elapsed: Duration::ZERO,
            });
        } else {
            vp.center = coords;
            self.pan = None;
        }
        self.cursor = coords;
        Ok(())
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Advance an in-flight pan animation.
    pub fn on_tick(&mut self, dt: Duration) {
        let (Some(pan), MapState::Ready(vp)) = (&mut self.pan, &mut self.state) else {
            return;
        };

        pan.elapsed += dt;
        let t = (pan.elapsed.as_secs_f64() / PAN_DURATION.as_secs_f64()).min(1.0);
        // ease-out
        let eased = 1.0 - (1.0 - t).powi(2);
        vp.center = Coords::new(
            pan.from.lat + (pan.to.lat - pan.from.lat) * eased,
            pan.from.lng + (pan.to.lng - pan.from.lng) * eased,
        );

        if t >= 1.0 {
            self.pan = None;
        }
    }

    pub fn zoom_by(&mut self, delta: i8) {
        if let MapState::Ready(vp) = &mut self.state {
            let zoom = (vp.zoom as i16 + delta as i16).clamp(MIN_ZOOM as i16, MAX_ZOOM as i16);
            vp.zoom = zoom as u8;
        }
    }

    pub fn cursor(&self) -> Coords {
        self.cursor
    }

    /// Nudge the keyboard cursor by whole steps; north and east are positive.
    pub fn move_cursor(&mut self, north: i32, east: i32) {
        if let Some(vp) = self.viewport() {
            let step = vp.lng_span() * CURSOR_STEP;
            self.cursor = Coords::new(
                (self.cursor.lat + north as f64 * step).clamp(-90.0, 90.0),
                wrap_lng(self.cursor.lng + east as f64 * step),
            );
        }
    }

    /// Project a terminal cell inside `area` to map coordinates.
    pub fn coords_at(&self, area: Rect, column: u16, row: u16) -> Option<Coords> {
        let vp = self.viewport()?;
        if area.width == 0
            || area.height == 0
            || column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        let ([x0, x1], [y0, y1]) = vp.bounds(area);
        let fx = (column - area.x) as f64 + 0.5;
        let fy = (row - area.y) as f64 + 0.5;
        let lng = x0 + (x1 - x0) * fx / area.width as f64;
        let lat = y1 - (y1 - y0) * fy / area.height as f64;

        Some(Coords::new(lat.clamp(-90.0, 90.0), wrap_lng(lng)))
    }
}

fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}
