use crate::workout::{Workout, WorkoutKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    Distance,
    Duration,
    /// Cadence when running, elevation gain when cycling.
    Metric,
}

impl Field {
    const ORDER: [Field; 4] = [Field::Kind, Field::Distance, Field::Duration, Field::Metric];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Parsed form values. Unparsable text reads as NaN so validation rejects it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation: f64,
}

impl FormInput {
    /// Cadence or elevation, whichever the kind uses.
    pub fn metric(&self) -> f64 {
        match self.kind {
            WorkoutKind::Running => self.cadence,
            WorkoutKind::Cycling => self.elevation,
        }
    }
}

/// The workout entry form shown after a location is chosen.
#[derive(Debug, Clone)]
pub struct EntryForm {
    visible: bool,
    kind: WorkoutKind,
    focus: Field,
    distance: String,
    duration: String,
    cadence: String,
    elevation: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            visible: false,
            kind: WorkoutKind::Running,
            focus: Field::Distance,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        }
    }
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Reveal the form with the distance field focused.
    pub fn show(&mut self) {
        self.visible = true;
        self.focus = Field::Distance;
    }

    /// Hide and blank every input. The kind toggle keeps its value.
    pub fn hide_and_reset(&mut self) {
        self.visible = false;
        self.focus = Field::Distance;
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation.clear();
    }

    pub fn kind(&self) -> WorkoutKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: WorkoutKind) {
        self.kind = kind;
    }

    /// Swap which conditional field is shown.
    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Label of the kind-conditional field.
    pub fn metric_label(&self) -> &'static str {
        match self.kind {
            WorkoutKind::Running => "Cadence",
            WorkoutKind::Cycling => "Elev Gain",
        }
    }

    pub fn metric_unit(&self) -> &'static str {
        match self.kind {
            WorkoutKind::Running => "step/min",
            WorkoutKind::Cycling => "meters",
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Kind => "",
            Field::Distance => self.distance.as_str(),
            Field::Duration => self.duration.as_str(),
            Field::Metric => match self.kind {
                WorkoutKind::Running => self.cadence.as_str(),
                WorkoutKind::Cycling => self.elevation.as_str(),
            },
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Kind => None,
            Field::Distance => Some(&mut self.distance),
            Field::Duration => Some(&mut self.duration),
            Field::Metric => Some(match self.kind {
                WorkoutKind::Running => &mut self.cadence,
                WorkoutKind::Cycling => &mut self.elevation,
            }),
        }
    }

    /// Type into the focused field. Only characters that can form a number are kept.
    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')) {
            return;
        }
        let focus = self.focus;
        if let Some(value) = self.value_mut(focus) {
            value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        if let Some(value) = self.value_mut(focus) {
            value.pop();
        }
    }

    pub fn set_value(&mut self, field: Field, text: &str) {
        if let Some(value) = self.value_mut(field) {
            *value = text.to_string();
        }
    }

    /// Fill the form from an existing workout for editing.
    pub fn prefill(&mut self, workout: &Workout) {
        self.hide_and_reset();
        self.kind = workout.kind();
        self.distance = workout.distance_km().to_string();
        self.duration = workout.duration_min().to_string();
        let metric = workout.metric_input().to_string();
        match workout.kind() {
            WorkoutKind::Running => self.cadence = metric,
            WorkoutKind::Cycling => self.elevation = metric,
        }
        self.show();
    }

    pub fn read(&self) -> FormInput {
        FormInput {
            kind: self.kind,
            distance: parse_number(&self.distance),
            duration: parse_number(&self.duration),
            cadence: parse_number(&self.cadence),
            elevation: parse_number(&self.elevation),
        }
    }
}

/// Blank text is 0, like an empty number input; malformed text is NaN.
fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Coords;

    fn typed(form: &mut EntryForm, text: &str) {
        for c in text.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn starts_hidden_running() {
        let form = EntryForm::new();
        assert!(!form.is_visible());
        assert_eq!(form.kind(), WorkoutKind::Running);
    }

    #[test]
    fn fills_and_reads_running_fields() {
        let mut form = EntryForm::new();
        form.show();
        typed(&mut form, "5.2");
        form.focus_next();
        typed(&mut form, "24");
        form.focus_next();
        typed(&mut form, "178");

        let input = form.read();
        assert_eq!(input.distance, 5.2);
        assert_eq!(input.duration, 24.0);
        assert_eq!(input.cadence, 178.0);
        assert_eq!(input.metric(), 178.0);
        assert!(input.elevation.is_nan());
    }

    #[test]
    fn toggle_swaps_conditional_field() {
        let mut form = EntryForm::new();
        form.set_value(Field::Metric, "180");
        form.toggle_kind();
        assert_eq!(form.kind(), WorkoutKind::Cycling);
        assert_eq!(form.metric_label(), "Elev Gain");
        assert_eq!(form.value(Field::Metric), "");

        form.set_value(Field::Metric, "-20");
        assert_eq!(form.read().metric(), -20.0);

        form.toggle_kind();
        assert_eq!(form.value(Field::Metric), "180");
    }

    #[test]
    fn ignores_non_numeric_keys_and_kind_field() {
        let mut form = EntryForm::new();
        typed(&mut form, "1x2");
        assert_eq!(form.value(Field::Distance), "12");

        form.focus_previous();
        assert_eq!(form.focus(), Field::Kind);
        typed(&mut form, "9");
        assert_eq!(form.value(Field::Kind), "");
    }

    #[test]
    fn malformed_numbers_read_as_nan() {
        let mut form = EntryForm::new();
        form.set_value(Field::Distance, "1..2");
        form.set_value(Field::Duration, "12km");
        assert!(form.read().distance.is_nan());
        assert!(form.read().duration.is_nan());
    }

    #[test]
    fn blank_numbers_read_as_zero() {
        let mut form = EntryForm::new();
        form.set_value(Field::Distance, "   ");
        let read = form.read();
        assert_eq!(read.distance, 0.0);
        assert_eq!(read.duration, 0.0);
        assert_eq!(read.elevation, 0.0);
    }

    #[test]
    fn hide_and_reset_clears_inputs() {
        let mut form = EntryForm::new();
        form.show();
        form.set_value(Field::Distance, "3");
        form.backspace();
        form.set_value(Field::Duration, "30");
        form.hide_and_reset();

        assert!(!form.is_visible());
        assert_eq!(form.value(Field::Duration), "");
        assert_eq!(form.focus(), Field::Distance);
    }

    #[test]
    fn prefill_from_workout() {
        let ride = Workout::cycling(Coords::new(0.0, 0.0), 27.0, 95.0, 523.0).unwrap();
        let mut form = EntryForm::new();
        form.prefill(&ride);

        assert!(form.is_visible());
        assert_eq!(form.kind(), WorkoutKind::Cycling);
        assert_eq!(form.value(Field::Distance), "27");
        assert_eq!(form.value(Field::Metric), "523");
    }

    #[test]
    fn focus_wraps_around() {
        let mut form = EntryForm::new();
        form.focus_next();
        form.focus_next();
        assert_eq!(form.focus(), Field::Metric);
        form.focus_next();
        assert_eq!(form.focus(), Field::Kind);
    }
}
