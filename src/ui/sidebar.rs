use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::app::LIST_ENTRY_HEIGHT;
use crate::form::{EntryForm, Field};
use crate::list_view::{ListEntry, WorkoutListView};

use super::style_color;

const LABEL_WIDTH: usize = 10;

pub fn render_form(form: &EntryForm, editing: bool, buf: &mut Buffer, area: Rect) {
    let title = if editing {
        " Edit workout "
    } else {
        " New workout "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green))
        .title(title);

    let kind_value = if editing {
        form.kind().to_string()
    } else {
        format!("◀ {} ▶", form.kind())
    };

    let rows = [
        (Field::Kind, "Type", kind_value, ""),
        (
            Field::Distance,
            "Distance",
            form.value(Field::Distance).to_string(),
            "km",
        ),
        (
            Field::Duration,
            "Duration",
            form.value(Field::Duration).to_string(),
            "min",
        ),
        (
            Field::Metric,
            form.metric_label(),
            form.value(Field::Metric).to_string(),
            form.metric_unit(),
        ),
    ];

    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(field, label, value, unit)| {
            let focused = form.focus() == field;
            let value_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let shown = if focused && field != Field::Kind {
                format!("{value}_")
            } else {
                value
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", label, width = LABEL_WIDTH),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(shown, value_style),
                Span::raw(" "),
                Span::styled(unit, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    Paragraph::new(lines).block(block).render(area, buf);
}

/// Draw the workout list. Returns the area holding entries and the index of the first one shown.
pub fn render_list(
    list: &WorkoutListView,
    focused: bool,
    buf: &mut Buffer,
    area: Rect,
) -> (Rect, usize) {
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(format!(" Workouts ({}) ", list.len()));
    let inner = block.inner(area);
    block.render(area, buf);

    if list.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            "Click the map to log a workout",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center)
        .render(inner, buf);
        return (Rect::new(inner.x, inner.y, inner.width, 0), 0);
    }

    let visible = (inner.height / LIST_ENTRY_HEIGHT) as usize;
    let offset = scroll_offset(list.selected(), visible);
    let width = inner.width as usize;

    let mut drawn = 0u16;
    for (i, entry) in list.entries().iter().enumerate().skip(offset).take(visible) {
        let row = inner.y + drawn * LIST_ENTRY_HEIGHT;
        let selected = list.selected() == Some(i);
        let entry_area = Rect::new(inner.x, row, inner.width, LIST_ENTRY_HEIGHT.min(2));
        Paragraph::new(entry_lines(entry, selected, width)).render(entry_area, buf);
        drawn += 1;
    }

    let entries_area = Rect::new(
        inner.x,
        inner.y,
        inner.width,
        (drawn * LIST_ENTRY_HEIGHT).min(inner.height),
    );
    (entries_area, offset)
}

fn scroll_offset(selected: Option<usize>, visible: usize) -> usize {
    match selected {
        Some(sel) if visible > 0 && sel >= visible => sel + 1 - visible,
        _ => 0,
    }
}

fn entry_lines(entry: &ListEntry, selected: bool, width: usize) -> Vec<Line<'static>> {
    let accent = style_color(entry.kind.marker_style());
    let title_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let details = entry
        .details
        .iter()
        .map(|d| format!("{} {} {}", d.icon, d.value, d.unit))
        .collect::<Vec<_>>()
        .join("  ");

    let body = width.saturating_sub(2);
    vec![
        Line::from(vec![
            Span::styled("▌ ", Style::default().fg(accent)),
            Span::styled(truncate(&entry.title, body), title_style),
        ]),
        Line::from(vec![
            Span::styled("▌ ", Style::default().fg(accent)),
            Span::styled(truncate(&details, body), Style::default().fg(Color::Gray)),
        ]),
    ]
}

/// Cut `s` to at most `width` terminal columns, marking the cut with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Coords, Workout};

    #[test]
    fn truncate_respects_wide_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("漢字漢", 4), "漢…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(None, 3), 0);
        assert_eq!(scroll_offset(Some(2), 3), 0);
        assert_eq!(scroll_offset(Some(5), 3), 3);
        assert_eq!(scroll_offset(Some(5), 0), 0);
    }

    #[test]
    fn list_reports_entry_area() {
        let mut list = WorkoutListView::new();
        list.render(&Workout::running(Coords::new(1.0, 1.0), 5.0, 25.0, 170.0).unwrap());
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);

        let (entries, offset) = render_list(&list, true, &mut buf, area);

        assert_eq!(offset, 0);
        assert_eq!(entries, Rect::new(1, 1, 38, LIST_ENTRY_HEIGHT));
    }

    #[test]
    fn form_shows_conditional_label() {
        let mut form = EntryForm::new();
        form.show();
        form.toggle_kind();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);

        render_form(&form, false, &mut buf, area);

        let text: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Elev Gain"));
        assert!(text.contains("meters"));
    }
}
