use thiserror::Error;

/// Rejected workout input. Shown to the user as a blocking alert.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} must be a number")]
    NotFinite { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },
}

/// Why a position lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,

    #[error("position unavailable")]
    Unavailable,

    #[error("position lookup timed out")]
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map is not initialized yet")]
    NotReady,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to encode workouts: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to prepare storage directory: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_names_the_field() {
        let e = InputError::NotPositive { field: "distance" };
        assert_eq!(e.to_string(), "distance must be greater than zero");

        let e = InputError::NotFinite { field: "cadence" };
        assert_eq!(e.to_string(), "cadence must be a number");
    }

    #[test]
    fn location_error_display() {
        assert_eq!(LocationError::Denied.to_string(), "location permission denied");
        assert_eq!(LocationError::Timeout.to_string(), "position lookup timed out");
    }

    #[test]
    fn store_error_from_json_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: StoreError = json_err.into();
        assert!(e.to_string().starts_with("failed to encode workouts"));
    }
}
