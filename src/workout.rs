use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// A (latitude, longitude) pair. Stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from(v: [f64; 2]) -> Self {
        Coords { lat: v[0], lng: v[1] }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    pub fn toggled(self) -> Self {
        match self {
            WorkoutKind::Running => WorkoutKind::Cycling,
            WorkoutKind::Cycling => WorkoutKind::Running,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃",
            WorkoutKind::Cycling => "🚴",
        }
    }

    /// Style class attached to map markers of this kind.
    pub fn marker_style(self) -> &'static str {
        match self {
            WorkoutKind::Running => "running-popup",
            WorkoutKind::Cycling => "cycling-popup",
        }
    }
}

/// Kind-specific payload: the raw input plus its derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutDetails {
    Running {
        cadence_spm: f64,
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        speed_kmh: f64,
    },
}

/// One recorded workout. Derived fields are computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: String,
    created_at: DateTime<Local>,
    coords: Coords,
    distance_km: f64,
    duration_min: f64,
    details: WorkoutDetails,
    description: String,
}

impl Workout {
    pub fn running(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
    ) -> Result<Self, InputError> {
        Self::running_at(coords, distance_km, duration_min, cadence_spm, Local::now())
    }

    pub fn running_at(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: f64,
        created_at: DateTime<Local>,
    ) -> Result<Self, InputError> {
        let inputs = [
            ("distance", distance_km),
            ("duration", duration_min),
            ("cadence", cadence_spm),
        ];
        ensure_finite(&inputs)?;
        ensure_positive(&inputs)?;

        let details = WorkoutDetails::Running {
            cadence_spm,
            pace_min_per_km: round_to(duration_min / distance_km, 2),
        };
        Ok(Self::assemble(
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        ))
    }

    pub fn cycling(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Result<Self, InputError> {
        Self::cycling_at(
            coords,
            distance_km,
            duration_min,
            elevation_gain_m,
            Local::now(),
        )
    }

    /// Elevation only has to be finite; a flat or downhill ride is accepted.
    pub fn cycling_at(
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
        created_at: DateTime<Local>,
    ) -> Result<Self, InputError> {
        ensure_finite(&[
            ("distance", distance_km),
            ("duration", duration_min),
            ("elevation", elevation_gain_m),
        ])?;
        ensure_positive(&[("distance", distance_km), ("duration", duration_min)])?;

        let details = WorkoutDetails::Cycling {
            elevation_gain_m,
            speed_kmh: round_to(distance_km / (duration_min / 60.0), 1),
        };
        Ok(Self::assemble(
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        ))
    }

    /// Build a workout of `kind` where `metric` is cadence or elevation.
    pub fn new_at(
        kind: WorkoutKind,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        metric: f64,
        created_at: DateTime<Local>,
    ) -> Result<Self, InputError> {
        match kind {
            WorkoutKind::Running => {
                Self::running_at(coords, distance_km, duration_min, metric, created_at)
            }
            WorkoutKind::Cycling => {
                Self::cycling_at(coords, distance_km, duration_min, metric, created_at)
            }
        }
    }

    /// Edited copy with new numbers. Id, date, location and kind are kept.
    pub fn with_values(
        &self,
        distance_km: f64,
        duration_min: f64,
        metric: f64,
    ) -> Result<Self, InputError> {
        let mut edited = Self::new_at(
            self.kind(),
            self.coords,
            distance_km,
            duration_min,
            metric,
            self.created_at,
        )?;
        edited.id = self.id.clone();
        Ok(edited)
    }

    fn assemble(
        created_at: DateTime<Local>,
        coords: Coords,
        distance_km: f64,
        duration_min: f64,
        details: WorkoutDetails,
    ) -> Self {
        let kind = kind_of(&details);
        Self {
            id: id_from(&created_at),
            description: describe(kind, &created_at),
            created_at,
            coords,
            distance_km,
            duration_min,
            details,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn details(&self) -> WorkoutDetails {
        self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        kind_of(&self.details)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Cadence for runs, elevation gain for rides.
    pub fn metric_input(&self) -> f64 {
        match self.details {
            WorkoutDetails::Running { cadence_spm, .. } => cadence_spm,
            WorkoutDetails::Cycling {
                elevation_gain_m, ..
            } => elevation_gain_m,
        }
    }

    pub fn pace(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running {
                pace_min_per_km, ..
            } => Some(pace_min_per_km),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed_kmh, .. } => Some(speed_kmh),
            WorkoutDetails::Running { .. } => None,
        }
    }

    pub fn to_record(&self) -> WorkoutRecord {
        let (cadence, pace, elevation_gain, speed) = match self.details {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => (Some(cadence_spm), Some(pace_min_per_km), None, None),
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => (None, None, Some(elevation_gain_m), Some(speed_kmh)),
        };

        WorkoutRecord {
            id: self.id.clone(),
            date: self.created_at,
            coords: self.coords,
            distance: self.distance_km,
            duration: self.duration_min,
            kind: self.kind(),
            description: self.description.clone(),
            cadence,
            pace,
            elevation_gain,
            speed,
        }
    }

    /// Rebuild from a stored record without re-validating it.
    ///
    /// Stored derived values are taken as-is. Returns `None` when the record
    /// lacks the fields its kind needs.
    pub fn from_record(record: &WorkoutRecord) -> Option<Self> {
        let details = match record.kind {
            WorkoutKind::Running => WorkoutDetails::Running {
                cadence_spm: record.cadence?,
                pace_min_per_km: record.pace?,
            },
            WorkoutKind::Cycling => WorkoutDetails::Cycling {
                elevation_gain_m: record.elevation_gain?,
                speed_kmh: record.speed?,
            },
        };

        Some(Self {
            id: record.id.clone(),
            created_at: record.date,
            coords: record.coords,
            distance_km: record.distance,
            duration_min: record.duration,
            details,
            description: record.description.clone(),
        })
    }
}

/// Flat persisted shape of a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub id: String,
    pub date: DateTime<Local>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

fn kind_of(details: &WorkoutDetails) -> WorkoutKind {
    match details {
        WorkoutDetails::Running { .. } => WorkoutKind::Running,
        WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
    }
}

/// Last ten digits of the creation time in epoch milliseconds.
pub fn id_from(created_at: &DateTime<Local>) -> String {
    let millis = created_at.timestamp_millis().to_string();
    let start = millis.len().saturating_sub(10);
    millis[start..].to_string()
}

fn describe(kind: WorkoutKind, created_at: &DateTime<Local>) -> String {
    format!("{} on {}", kind, created_at.format("%B %-d"))
}

fn ensure_finite(inputs: &[(&'static str, f64)]) -> Result<(), InputError> {
    match inputs.iter().find(|(_, v)| !v.is_finite()) {
        Some((field, _)) => Err(InputError::NotFinite { field: *field }),
        None => Ok(()),
    }
}

fn ensure_positive(inputs: &[(&'static str, f64)]) -> Result<(), InputError> {
    match inputs.iter().find(|(_, v)| *v <= 0.0) {
        Some((field, _)) => Err(InputError::NotPositive { field: *field }),
        None => Ok(()),
    }
}

/// Digits read past the rounding position.
const TIE_DIGITS: usize = 30;

/// Rounds the exact decimal value of `value` half away from zero: 29/40 is
/// stored just below 0.725 and gives 0.72, 0.125 is an exact tie and gives 0.13.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let wide = format!("{:.*}", places + TIE_DIGITS, value.abs());
    let (kept, tail) = wide.split_at(wide.len() - TIE_DIGITS);
    let digits: String = kept.chars().filter(|c| *c != '.').collect();
    let Ok(mut scaled) = digits.parse::<u128>() else {
        return value;
    };
    if tail.as_bytes()[0] >= b'5' {
        scaled += 1;
    }
    let Ok(exp) = i32::try_from(places) else {
        return value;
    };
    (scaled as f64 / 10_f64.powi(exp)).copysign(value)
}
