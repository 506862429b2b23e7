use std::sync::mpsc::Sender;

use crate::error::LocationError;
use crate::runtime::AppEvent;
use crate::workout::Coords;

/// One-shot source of the user's current position.
pub trait LocationService: Send + 'static {
    fn current_position(&self) -> Result<Coords, LocationError>;
}

/// Position given on the command line or in the config file
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coords: Coords,
}

impl FixedLocation {
    pub fn new(coords: Coords) -> Self {
        Self { coords }
    }
}

impl LocationService for FixedLocation {
    fn current_position(&self) -> Result<Coords, LocationError> {
        Ok(self.coords)
    }
}

/// Used when no position source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationService for NoLocation {
    fn current_position(&self) -> Result<Coords, LocationError> {
        Err(LocationError::Unavailable)
    }
}

/// Issue the single position lookup and post its outcome to the event queue.
pub fn request_position<L: LocationService>(service: L, tx: Sender<AppEvent>) {
    std::thread::spawn(move || {
        let result = service.current_position();
        match &result {
            Ok(coords) => tracing::info!(
                lat = coords.lat,
                lng = coords.lng,
                "position resolved: https://www.google.com/maps/@{},{}",
                coords.lat,
                coords.lng
            ),
            Err(e) => tracing::warn!(err = %e, "position lookup failed"),
        }
        let _ = tx.send(AppEvent::Position(result));
    });
}

/// Parse `"LAT,LNG"` as given to `--at`.
pub fn parse_coords(s: &str) -> Result<Coords, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG but got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lng:?}"))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is out of range"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(format!("longitude {lng} is out of range"));
    }
    Ok(Coords::new(lat, lng))
}
