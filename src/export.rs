use std::io::Write;

use crate::error::ExportError;
use crate::workout::{Workout, WorkoutDetails};

const HEADER: [&str; 12] = [
    "id",
    "date",
    "type",
    "lat",
    "lng",
    "distance_km",
    "duration_min",
    "cadence_spm",
    "elevation_gain_m",
    "pace_min_per_km",
    "speed_kmh",
    "description",
];

/// Write workouts as CSV, one row per workout in the order given.
///
/// Columns that do not apply to a workout's kind are left empty.
pub fn write_csv<W: Write>(workouts: &[Workout], writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for workout in workouts {
        let coords = workout.coords();
        let (cadence, elevation, pace, speed) = match workout.details() {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => (
                cadence_spm.to_string(),
                String::new(),
                pace_min_per_km.to_string(),
                String::new(),
            ),
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => (
                String::new(),
                elevation_gain_m.to_string(),
                String::new(),
                speed_kmh.to_string(),
            ),
        };

        wtr.write_record([
            workout.id().to_string(),
            workout.created_at().to_rfc3339(),
            workout.kind().to_string().to_lowercase(),
            coords.lat.to_string(),
            coords.lng.to_string(),
            workout.distance_km().to_string(),
            workout.duration_min().to_string(),
            cadence,
            elevation,
            pace,
            speed,
            workout.description().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Coords;

    #[test]
    fn writes_header_and_kind_specific_columns() {
        let run = Workout::running(Coords::new(39.0, -12.0), 5.2, 24.0, 178.0).unwrap();
        let ride = Workout::cycling(Coords::new(39.5, -12.5), 27.0, 95.0, 523.0).unwrap();
        let mut out = Vec::new();

        write_csv(&[run.clone(), ride], &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,date,type,lat,lng"));
        assert!(lines[1].starts_with(run.id()));
        assert!(lines[1].contains(",running,39,-12,5.2,24,178,,4.62,,"));
        assert!(lines[2].contains(",cycling,39.5,-12.5,27,95,,523,,17.1,"));
    }

    #[test]
    fn empty_collection_is_just_the_header() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
