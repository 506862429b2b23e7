use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, BorderType, Borders, Paragraph, Wrap,
    },
    Frame,
};

use crate::map_view::MapView;
use crate::workout::Coords;

use super::style_color;

/// Draw the map panel and return the inner area clicks are resolved against.
pub fn render_map(
    map: &MapView,
    pending_click: Option<Coords>,
    focused: bool,
    f: &mut Frame,
    area: Rect,
) -> Rect {
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let Some(viewport) = map.viewport() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Map ");
        let inner = block.inner(area);
        let waiting = Paragraph::new(vec![
            Line::from(""),
            Line::from("Waiting for your position..."),
            Line::from(Span::styled(
                "start with --at LAT,LNG to pick one",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(waiting, area);
        return inner;
    };

    let title = format!(
        " Map {:.4}, {:.4} z{} ",
        viewport.center.lat, viewport.center.lng, viewport.zoom
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    let (x_bounds, y_bounds) = viewport.bounds(inner);
    let cursor = map.cursor();

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for marker in map.markers() {
                let style = Style::default()
                    .fg(style_color(&marker.style))
                    .add_modifier(Modifier::BOLD);
                ctx.print(
                    marker.coords.lng,
                    marker.coords.lat,
                    Span::styled(format!("● {}", marker.popup), style),
                );
            }

            if let Some(click) = pending_click {
                ctx.print(
                    click.lng,
                    click.lat,
                    Span::styled("◆", Style::default().fg(Color::Cyan)),
                );
            }

            if focused {
                ctx.print(
                    cursor.lng,
                    cursor.lat,
                    Span::styled(
                        "+",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    f.render_widget(canvas, area);
    inner
}
