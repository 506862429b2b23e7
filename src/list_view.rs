use crate::workout::{Workout, WorkoutDetails, WorkoutKind};

/// One detail cell of a list entry: icon, value, unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// A rendered workout as shown in the sidebar list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: String,
    pub kind: WorkoutKind,
    pub title: String,
    pub details: Vec<Detail>,
}

impl ListEntry {
    pub fn from_workout(workout: &Workout) -> Self {
        let mut details = vec![
            Detail {
                icon: workout.kind().icon(),
                value: format_number(workout.distance_km()),
                unit: "km",
            },
            Detail {
                icon: "⏱",
                value: format_number(workout.duration_min()),
                unit: "min",
            },
        ];

        match workout.details() {
            WorkoutDetails::Running {
                cadence_spm,
                pace_min_per_km,
            } => {
                details.push(Detail {
                    icon: "⚡",
                    value: format!("{pace_min_per_km:.2}"),
                    unit: "min/km",
                });
                details.push(Detail {
                    icon: "🦶",
                    value: format_number(cadence_spm),
                    unit: "spm",
                });
            }
            WorkoutDetails::Cycling {
                elevation_gain_m,
                speed_kmh,
            } => {
                details.push(Detail {
                    icon: "⚡",
                    value: format!("{speed_kmh:.1}"),
                    unit: "km/h",
                });
                details.push(Detail {
                    icon: "⛰",
                    value: format_number(elevation_gain_m),
                    unit: "m",
                });
            }
        }

        Self {
            id: workout.id().to_string(),
            kind: workout.kind(),
            title: workout.description().to_string(),
            details,
        }
    }
}

/// Workouts listed below the entry form, newest first.
#[derive(Debug, Default, Clone)]
pub struct WorkoutListView {
    entries: Vec<ListEntry>,
    selected: Option<usize>,
}

impl WorkoutListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert right after the form, so the latest call ends up on top.
    pub fn render(&mut self, workout: &Workout) {
        self.entries.insert(0, ListEntry::from_workout(workout));
        if let Some(sel) = self.selected.as_mut() {
            *sel += 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected = None;
    }

    pub fn remove(&mut self, id: &str) {
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return;
        };
        self.entries.remove(idx);

        self.selected = match self.selected {
            _ if self.entries.is_empty() => None,
            Some(sel) if sel > idx || sel == self.entries.len() => Some(sel - 1),
            other => other,
        };
    }

    /// Re-render an entry in place after an edit.
    pub fn replace(&mut self, workout: &Workout) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == workout.id()) {
            *entry = ListEntry::from_workout(workout);
        }
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.entries.get(i))
            .map(|e| e.id.as_str())
    }

    pub fn select_next(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) if i + 1 < self.entries.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn select_id(&mut self, id: &str) {
        if let Some(idx) = self.entries.iter().position(|e| e.id == id) {
            self.selected = Some(idx);
        }
    }
}

/// Whole numbers without a trailing `.0`, everything else as typed.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
