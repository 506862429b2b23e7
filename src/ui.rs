pub mod alert;
pub mod map;
pub mod sidebar;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};
use crate::store::KeyValueStore;

const SIDEBAR_WIDTH: u16 = 44;

/// Color for a marker style class.
pub fn style_color(style: &str) -> Color {
    match style {
        "running-popup" => Color::Green,
        "cycling-popup" => Color::Rgb(255, 165, 0),
        _ => Color::White,
    }
}

/// Draw the whole screen and remember where the map and list ended up.
pub fn draw<S: KeyValueStore>(app: &mut App<S>, f: &mut Frame) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(f.area());

    let form_height = if app.form().is_visible() { 6 } else { 0 };
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),           // title
            Constraint::Length(form_height), // entry form
            Constraint::Min(3),              // workouts
            Constraint::Length(2),           // key help
        ])
        .split(columns[0]);

    let title = Paragraph::new(Span::styled(
        "mapty",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, sidebar[0]);

    if app.form().is_visible() {
        sidebar::render_form(
            app.form(),
            app.editing().is_some(),
            f.buffer_mut(),
            sidebar[1],
        );
    }

    let (list_inner, list_offset) = sidebar::render_list(
        app.list(),
        app.focus == Focus::List,
        f.buffer_mut(),
        sidebar[2],
    );

    let help = Paragraph::new(help_text(app.focus))
        .style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center);
    f.render_widget(help, sidebar[3]);

    let map_inner = map::render_map(
        app.map(),
        app.pending_click(),
        app.focus == Focus::Map,
        f,
        columns[1],
    );

    app.areas.map = map_inner;
    app.areas.list = list_inner;
    app.areas.list_offset = list_offset;

    if let Some(message) = app.alert() {
        alert::render_alert(message, f);
    }
}

fn help_text(focus: Focus) -> Vec<Line<'static>> {
    let lines: [&str; 2] = match focus {
        Focus::Map => [
            "(arrows) move (enter/click) add workout",
            "(+/-) zoom (tab) list (R)eset (q)uit",
        ],
        Focus::Form => [
            "(tab) next field (←/→) type",
            "(enter) save (esc) cancel",
        ],
        Focus::List => [
            "(↑/↓) select (enter) show (e)dit (d)elete",
            "(o)pen in browser (tab) map (q)uit",
        ],
    };
    lines.into_iter().map(Line::from).collect()
}

/// Rect of `width` x `height` centered in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
