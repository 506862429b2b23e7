use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Duration;
use webbrowser::Browser;

use crate::config::Config;
use crate::error::LocationError;
use crate::form::{EntryForm, Field};
use crate::list_view::WorkoutListView;
use crate::map_view::MapView;
use crate::runtime::AppEvent;
use crate::store::{KeyValueStore, WorkoutRepository};
use crate::workout::{id_from, Coords, Workout};

pub const ALERT_NO_POSITION: &str = "Could not get your position";
pub const ALERT_INVALID_INPUT: &str = "Inputs have to be positive numbers!";
pub const ALERT_SAVE_FAILED: &str = "Could not save your workouts";

/// Rows each list entry occupies in the sidebar.
pub const LIST_ENTRY_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Map,
    Form,
    List,
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
    /// Storage was cleared; rebuild the app from empty state.
    Reload,
}

/// Screen regions from the last draw, used to resolve mouse clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiAreas {
    pub map: Rect,
    pub list: Rect,
    /// Index of the first list entry drawn.
    pub list_offset: usize,
}

/// Application controller. Owns the workout collection and every view.
#[derive(Debug)]
pub struct App<S: KeyValueStore> {
    repo: WorkoutRepository<S>,
    config: Config,
    workouts: Vec<Workout>,
    map: MapView,
    list: WorkoutListView,
    form: EntryForm,
    /// Coordinates of the last map click, waiting for a form submission.
    pending_click: Option<Coords>,
    /// Ids of loaded workouts whose markers wait for the map.
    pending_markers: Vec<String>,
    /// Id of the workout the form is editing, if any.
    editing: Option<String>,
    alert: Option<String>,
    pub focus: Focus,
    pub areas: UiAreas,
}

impl<S: KeyValueStore> App<S> {
    /// Start up: load stored workouts and list them. Their markers wait for the map.
    pub fn new(repo: WorkoutRepository<S>, config: Config) -> Self {
        let mut form = EntryForm::new();
        form.set_kind(config.default_kind);

        let mut app = Self {
            repo,
            config,
            workouts: Vec::new(),
            map: MapView::new(),
            list: WorkoutListView::new(),
            form,
            pending_click: None,
            pending_markers: Vec::new(),
            editing: None,
            alert: None,
            focus: Focus::Map,
            areas: UiAreas::default(),
        };
        app.load_stored();
        app
    }

    fn load_stored(&mut self) {
        let Some(records) = self.repo.load() else {
            return;
        };

        for record in &records {
            match Workout::from_record(record) {
                Some(workout) => {
                    self.list.render(&workout);
                    self.pending_markers.push(workout.id().to_string());
                    self.workouts.push(workout);
                }
                None => tracing::warn!(id = %record.id, "skipping incomplete stored workout"),
            }
        }
        tracing::info!(count = self.workouts.len(), "restored workouts");
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn list(&self) -> &WorkoutListView {
        &self.list
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn repository(&self) -> &WorkoutRepository<S> {
        &self.repo
    }

    fn notify(&mut self, message: &str) {
        tracing::info!(message, "alert");
        self.alert = Some(message.to_string());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Outcome of the startup position lookup.
    pub fn on_position(&mut self, result: Result<Coords, LocationError>) {
        match result {
            Ok(coords) => {
                self.map.initialize(coords, self.config.zoom);
                self.replay_markers();
            }
            Err(e) => {
                tracing::warn!(err = %e, "no position; map disabled");
                self.notify(ALERT_NO_POSITION);
            }
        }
    }

    fn replay_markers(&mut self) {
        for id in std::mem::take(&mut self.pending_markers) {
            if let Some(workout) = self.workouts.iter().find(|w| w.id() == id) {
                if let Err(e) = self.map.add_marker(
                    workout.id(),
                    workout.coords(),
                    workout.description(),
                    workout.kind().marker_style(),
                ) {
                    tracing::error!(err = %e, id = %id, "marker replay failed");
                }
            }
        }
    }

    /// A location was picked on the map: remember it and open the form.
    pub fn on_map_click(&mut self, coords: Coords) {
        if !self.map.is_ready() {
            return;
        }
        if self.editing.take().is_some() {
            self.form.hide_and_reset();
        }
        self.pending_click = Some(coords);
        self.form.show();
        self.focus = Focus::Form;
    }

    pub fn toggle_kind(&mut self) {
        if self.editing.is_none() {
            self.form.toggle_kind();
        }
    }

    /// Validate the form and record the workout. Returns whether it was accepted.
    pub fn submit_form(&mut self) -> bool {
        if !self.form.is_visible() {
            return false;
        }
        if let Some(id) = self.editing.clone() {
            return self.submit_edit(&id);
        }
        let Some(coords) = self.pending_click else {
            return false;
        };

        let input = self.form.read();
        let mut created_at = Local::now();
        while self.workouts.iter().any(|w| w.id() == id_from(&created_at)) {
            created_at += chrono::Duration::milliseconds(1);
        }

        let workout = match Workout::new_at(
            input.kind,
            coords,
            input.distance,
            input.duration,
            input.metric(),
            created_at,
        ) {
            Ok(workout) => workout,
            Err(e) => {
                tracing::debug!(err = %e, "rejected workout input");
                self.notify(ALERT_INVALID_INPUT);
                return false;
            }
        };

        tracing::info!(id = workout.id(), kind = %workout.kind(), "new workout");
        self.list.render(&workout);
        if let Err(e) = self.map.add_marker(
            workout.id(),
            workout.coords(),
            workout.description(),
            workout.kind().marker_style(),
        ) {
            tracing::error!(err = %e, "marker for new workout failed");
        }
        self.workouts.push(workout);

        self.form.hide_and_reset();
        self.pending_click = None;
        self.focus = Focus::Map;
        self.persist();
        true
    }

    fn submit_edit(&mut self, id: &str) -> bool {
        let input = self.form.read();
        let Some(idx) = self.workouts.iter().position(|w| w.id() == id) else {
            self.cancel_form();
            return false;
        };

        let edited = match self.workouts[idx].with_values(
            input.distance,
            input.duration,
            input.metric(),
        ) {
            Ok(edited) => edited,
            Err(e) => {
                tracing::debug!(err = %e, "rejected edit");
                self.notify(ALERT_INVALID_INPUT);
                return false;
            }
        };

        tracing::info!(id, "edited workout");
        self.list.replace(&edited);
        if self.map.is_ready() {
            self.map.remove_marker(id);
            if let Err(e) = self.map.add_marker(
                edited.id(),
                edited.coords(),
                edited.description(),
                edited.kind().marker_style(),
            ) {
                tracing::error!(err = %e, id, "failed to re-add edited marker");
            }
        }
        self.workouts[idx] = edited;

        self.editing = None;
        self.form.hide_and_reset();
        self.focus = Focus::List;
        self.persist();
        true
    }

    /// Close the form without recording anything.
    pub fn cancel_form(&mut self) {
        self.form.hide_and_reset();
        self.pending_click = None;
        if self.editing.take().is_some() {
            self.focus = Focus::List;
        } else {
            self.focus = Focus::Map;
        }
    }

    /// Jump the map to a listed workout. Unknown ids and a missing map are ignored.
    pub fn on_list_select(&mut self, id: &str) {
        let Some(workout) = self.workouts.iter().find(|w| w.id() == id) else {
            tracing::debug!(id, "selected workout not in collection");
            return;
        };
        let coords = workout.coords();
        if self
            .map
            .center_on(coords, self.config.zoom, self.config.animate)
            .is_err()
        {
            tracing::debug!(id, "map not ready; ignoring selection");
        }
    }

    pub fn delete_workout(&mut self, id: &str) {
        let before = self.workouts.len();
        self.workouts.retain(|w| w.id() != id);
        if self.workouts.len() == before {
            return;
        }

        tracing::info!(id, "deleted workout");
        self.list.remove(id);
        self.map.remove_marker(id);
        self.pending_markers.retain(|p| p != id);
        if self.editing.as_deref() == Some(id) {
            self.cancel_form();
        }
        self.persist();
    }

    /// Open the form prefilled with a workout's values.
    pub fn begin_edit(&mut self, id: &str) {
        let Some(workout) = self.workouts.iter().find(|w| w.id() == id) else {
            return;
        };
        self.form.prefill(workout);
        self.pending_click = None;
        self.editing = Some(id.to_string());
        self.focus = Focus::Form;
    }

    /// Discard all stored workouts and start over from an empty state.
    pub fn reset(mut self) -> Self {
        if let Err(e) = self.repo.clear() {
            tracing::error!(err = %e, "failed to clear stored workouts");
        }
        let config = self.config.clone();
        Self::new(self.repo, config)
    }

    fn persist(&mut self) {
        if let Err(e) = self.repo.save(&self.workouts) {
            tracing::error!(err = %e, "failed to save workouts");
            self.notify(ALERT_SAVE_FAILED);
        }
    }

    /// Handle one event to completion.
    pub fn handle_event(&mut self, event: AppEvent, tick: Duration) -> Control {
        match event {
            AppEvent::Tick => {
                self.map.on_tick(tick);
                Control::Continue
            }
            AppEvent::Resize => Control::Continue,
            AppEvent::Position(result) => {
                self.on_position(result);
                Control::Continue
            }
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Control::Continue
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        // alerts block everything else until dismissed
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss_alert();
            }
            return Control::Continue;
        }

        match self.focus {
            Focus::Form => self.handle_form_key(key),
            Focus::Map => self.handle_map_key(key),
            Focus::List => self.handle_list_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Enter => {
                self.submit_form();
            }
            KeyCode::Tab | KeyCode::Down => self.form_focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form_focus_previous(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.form.focus() == Field::Kind =>
            {
                self.toggle_kind()
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.input_char(c),
            _ => {}
        }
        Control::Continue
    }

    fn form_focus_next(&mut self) {
        self.form.focus_next();
        if self.editing.is_some() && self.form.focus() == Field::Kind {
            self.form.focus_next();
        }
    }

    fn form_focus_previous(&mut self) {
        self.form.focus_previous();
        if self.editing.is_some() && self.form.focus() == Field::Kind {
            self.form.focus_previous();
        }
    }

    fn handle_map_key(&mut self, key: KeyEvent) -> Control {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('R') => return Control::Reload,
            KeyCode::Up => self.map.move_cursor(1, 0),
            KeyCode::Down => self.map.move_cursor(-1, 0),
            KeyCode::Left => self.map.move_cursor(0, -1),
            KeyCode::Right => self.map.move_cursor(0, 1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.map.zoom_by(1),
            KeyCode::Char('-') => self.map.zoom_by(-1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.map.is_ready() {
                    let cursor = self.map.cursor();
                    self.on_map_click(cursor);
                }
            }
            KeyCode::Tab => {
                if !self.list.is_empty() {
                    self.focus = Focus::List;
                    if self.list.selected().is_none() {
                        self.list.select_next();
                    }
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Control {
        let selected = self.list.selected_id().map(str::to_string);
        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char('R') => return Control::Reload,
            KeyCode::Tab | KeyCode::Esc => self.focus = Focus::Map,
            KeyCode::Down | KeyCode::Char('j') => self.list.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.select_previous(),
            KeyCode::Enter => {
                if let Some(id) = selected {
                    self.on_list_select(&id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected {
                    self.delete_workout(&id);
                    if self.list.is_empty() {
                        self.focus = Focus::Map;
                    }
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = selected {
                    self.begin_edit(&id);
                }
            }
            KeyCode::Char('o') => {
                if let Some(workout) = selected
                    .as_deref()
                    .and_then(|id| self.workouts.iter().find(|w| w.id() == id))
                {
                    let url = maps_url(workout.coords(), self.config.zoom);
                    if Browser::is_available() {
                        webbrowser::open(&url).unwrap_or_default();
                    }
                }
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.alert.is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(coords) = self.map.coords_at(self.areas.map, mouse.column, mouse.row)
                {
                    self.on_map_click(coords);
                } else if let Some(id) = self.list_id_at(mouse.column, mouse.row) {
                    self.on_list_click(&id);
                }
            }
            MouseEventKind::ScrollUp if contains(self.areas.map, mouse.column, mouse.row) => {
                self.map.zoom_by(1)
            }
            MouseEventKind::ScrollDown if contains(self.areas.map, mouse.column, mouse.row) => {
                self.map.zoom_by(-1)
            }
            _ => {}
        }
    }

    fn on_list_click(&mut self, id: &str) {
        if self.form.is_visible() {
            return;
        }
        self.list.select_id(id);
        self.focus = Focus::List;
        self.on_list_select(id);
    }

    /// Id of the list entry drawn at a terminal cell.
    pub fn list_id_at(&self, column: u16, row: u16) -> Option<String> {
        let area = self.areas.list;
        if !contains(area, column, row) {
            return None;
        }
        let idx = self.areas.list_offset + ((row - area.y) / LIST_ENTRY_HEIGHT) as usize;
        self.list.entries().get(idx).map(|e| e.id.clone())
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Web map link for a location.
pub fn maps_url(coords: Coords, zoom: u8) -> String {
    format!(
        "https://www.google.com/maps/@{},{},{}z",
        coords.lat, coords.lng, zoom
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::workout::{WorkoutDetails, WorkoutKind};
    use assert_matches::assert_matches;

    fn app() -> App<MemoryStore> {
        App::new(WorkoutRepository::new(MemoryStore::new()), Config::default())
    }

    fn ready_app() -> App<MemoryStore> {
        let mut app = app();
        app.on_position(Ok(Coords::new(39.0, -12.0)));
        app
    }

    fn fill(app: &mut App<MemoryStore>, distance: &str, duration: &str, metric: &str) {
        app.form.set_value(Field::Distance, distance);
        app.form.set_value(Field::Duration, duration);
        app.form.set_value(Field::Metric, metric);
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn position_failure_alerts_and_leaves_map_absent() {
        let mut app = app();
        app.on_position(Err(LocationError::Denied));

        assert_eq!(app.alert(), Some(ALERT_NO_POSITION));
        assert!(!app.map().is_ready());
    }

    #[test]
    fn map_click_without_map_does_nothing() {
        let mut app = app();
        app.on_map_click(Coords::new(1.0, 1.0));

        assert!(!app.form().is_visible());
        assert_eq!(app.pending_click(), None);
    }

    #[test]
    fn map_click_opens_form() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));

        assert!(app.form().is_visible());
        assert_eq!(app.pending_click(), Some(Coords::new(39.1, -12.1)));
        assert_eq!(app.focus, Focus::Form);
    }

    #[test]
    fn submit_running_records_everything() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        fill(&mut app, "5.2", "24", "178");

        assert!(app.submit_form());
        assert_eq!(app.workouts().len(), 1);
        assert_eq!(app.workouts()[0].pace(), Some(4.62));
        assert_eq!(app.list().len(), 1);
        assert_eq!(app.map().markers().len(), 1);
        assert_eq!(app.map().markers()[0].style, "running-popup");
        assert!(!app.form().is_visible());
        assert_eq!(app.form().value(Field::Distance), "");
        assert_eq!(app.repository().load().unwrap().len(), 1);
    }

    #[test]
    fn submit_cycling_with_negative_elevation_is_accepted() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        app.toggle_kind();
        fill(&mut app, "27", "95", "-40");

        assert!(app.submit_form());
        assert_eq!(app.workouts()[0].kind(), WorkoutKind::Cycling);
    }

    #[test]
    fn invalid_submission_changes_nothing() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        fill(&mut app, "5", "abc", "170");

        assert!(!app.submit_form());
        assert_eq!(app.alert(), Some(ALERT_INVALID_INPUT));
        assert!(app.workouts().is_empty());
        assert!(app.list().is_empty());
        assert!(app.map().markers().is_empty());
        assert!(app.form().is_visible());
        assert_eq!(app.form().value(Field::Distance), "5");
        assert!(app.repository().load().is_none());
    }

    #[test]
    fn running_with_zero_cadence_is_rejected() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        fill(&mut app, "5", "25", "0");

        assert!(!app.submit_form());
        assert!(app.workouts().is_empty());
    }

    #[test]
    fn cycling_with_blank_elevation_counts_as_flat() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        app.toggle_kind();
        fill(&mut app, "27", "95", "");

        assert!(app.submit_form());
        assert!(app.alert().is_none());
        assert_matches!(
            app.workouts()[0].details(),
            WorkoutDetails::Cycling { elevation_gain_m, .. } if elevation_gain_m == 0.0
        );
    }

    #[test]
    fn running_with_blank_cadence_is_rejected() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(39.1, -12.1));
        fill(&mut app, "5", "25", "");

        assert!(!app.submit_form());
        assert_eq!(app.alert(), Some(ALERT_INVALID_INPUT));
        assert!(app.workouts().is_empty());
    }

    #[test]
    fn rapid_submissions_get_distinct_ids() {
        let mut app = ready_app();
        for _ in 0..3 {
            app.on_map_click(Coords::new(39.1, -12.1));
            fill(&mut app, "5", "25", "170");
            assert!(app.submit_form());
        }

        let ids: std::collections::HashSet<&str> = app.workouts().iter().map(|w| w.id()).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn list_select_unknown_id_is_noop() {
        let mut app = ready_app();
        let before = app.map().viewport();
        app.on_list_select("does-not-exist");
        assert_eq!(app.map().viewport(), before);

        let mut no_map = self::app();
        no_map.on_list_select("does-not-exist");
    }

    #[test]
    fn list_select_recenters_map() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(40.0, -10.0));
        fill(&mut app, "5", "25", "170");
        app.submit_form();
        let id = app.workouts()[0].id().to_string();

        app.on_list_select(&id);
        app.handle_event(AppEvent::Tick, Duration::from_secs(2));

        assert_eq!(app.map().viewport().unwrap().center, Coords::new(40.0, -10.0));
    }

    #[test]
    fn delete_removes_from_everywhere() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(40.0, -10.0));
        fill(&mut app, "5", "25", "170");
        app.submit_form();
        let id = app.workouts()[0].id().to_string();

        app.delete_workout(&id);
        assert!(app.workouts().is_empty());
        assert!(app.list().is_empty());
        assert!(app.map().markers().is_empty());
        assert_eq!(app.repository().load(), Some(vec![]));
    }

    #[test]
    fn edit_keeps_identity_and_recomputes() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(40.0, -10.0));
        fill(&mut app, "5", "25", "170");
        app.submit_form();
        let original = app.workouts()[0].clone();

        app.begin_edit(original.id());
        assert_eq!(app.editing(), Some(original.id()));
        assert_eq!(app.form().value(Field::Distance), "5");
        fill(&mut app, "10", "45", "175");
        assert!(app.submit_form());

        let edited = &app.workouts()[0];
        assert_eq!(edited.id(), original.id());
        assert_eq!(edited.coords(), original.coords());
        assert_eq!(edited.pace(), Some(4.5));
        assert_eq!(app.workouts().len(), 1);
        assert_eq!(app.list().entries()[0].details[0].value, "10");
        assert_eq!(app.repository().load().unwrap()[0].distance, 10.0);
        // the marker is replaced, not duplicated
        assert_eq!(app.map().markers().len(), 1);
        assert_eq!(app.map().markers()[0].key, original.id());
        assert_eq!(app.map().markers()[0].popup, edited.description());
    }

    #[test]
    fn alert_blocks_input_until_dismissed() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(40.0, -10.0));
        app.submit_form();
        assert!(app.alert().is_some());

        app.handle_event(key(KeyCode::Char('5')), Duration::ZERO);
        assert_eq!(app.form().value(Field::Distance), "");

        app.handle_event(key(KeyCode::Enter), Duration::ZERO);
        assert!(app.alert().is_none());
        app.handle_event(key(KeyCode::Char('5')), Duration::ZERO);
        assert_eq!(app.form().value(Field::Distance), "5");
    }

    #[test]
    fn keyboard_flow_records_workout() {
        let mut app = ready_app();
        let tick = Duration::from_millis(100);
        app.handle_event(key(KeyCode::Enter), tick);
        assert_eq!(app.focus, Focus::Form);

        for c in "8".chars() {
            app.handle_event(key(KeyCode::Char(c)), tick);
        }
        app.handle_event(key(KeyCode::Tab), tick);
        for c in "40".chars() {
            app.handle_event(key(KeyCode::Char(c)), tick);
        }
        app.handle_event(key(KeyCode::Tab), tick);
        for c in "165".chars() {
            app.handle_event(key(KeyCode::Char(c)), tick);
        }
        app.handle_event(key(KeyCode::Enter), tick);

        assert_eq!(app.workouts().len(), 1);
        assert_eq!(app.workouts()[0].pace(), Some(5.0));
        assert_eq!(app.focus, Focus::Map);
    }

    #[test]
    fn quit_and_reload_keys() {
        let mut app = ready_app();
        assert_eq!(
            app.handle_event(key(KeyCode::Char('R')), Duration::ZERO),
            Control::Reload
        );
        assert_eq!(
            app.handle_event(key(KeyCode::Char('q')), Duration::ZERO),
            Control::Quit
        );
    }

    #[test]
    fn reset_clears_storage_and_views() {
        let mut app = ready_app();
        app.on_map_click(Coords::new(40.0, -10.0));
        fill(&mut app, "5", "25", "170");
        app.submit_form();

        let app = app.reset();
        assert!(app.workouts().is_empty());
        assert!(app.list().is_empty());
        assert!(!app.map().is_ready());
        assert!(app.repository().load().is_none());
    }

    #[test]
    fn maps_url_format() {
        assert_eq!(
            maps_url(Coords::new(39.5, -12.25), 13),
            "https://www.google.com/maps/@39.5,-12.25,13z"
        );
    }

    #[test]
    fn list_id_at_resolves_rows() {
        let mut app = ready_app();
        for _ in 0..2 {
            app.on_map_click(Coords::new(40.0, -10.0));
            fill(&mut app, "5", "25", "170");
            app.submit_form();
        }
        app.areas.list = Rect::new(0, 10, 30, 12);

        let top = app.list().entries()[0].id.clone();
        let second = app.list().entries()[1].id.clone();
        assert_eq!(app.list_id_at(5, 10), Some(top));
        assert_eq!(app.list_id_at(5, 13), Some(second));
        assert_eq!(app.list_id_at(5, 20), None);
        assert_eq!(app.list_id_at(40, 10), None);
    }
}
