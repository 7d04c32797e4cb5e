//! Shared rendering helpers for screens and list views.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear};

use crate::state::LoadState;

/// Spinner frames for loading indicators.
pub const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Centers a box of at most `width` x `height` inside `area`.
pub fn calculate_centered_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Clears `area` and draws a titled border.
pub fn render_container(frame: &mut Frame, area: Rect, title: &str, border_color: Color) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {title} "))
        .title_style(
            Style::default()
                .fg(border_color)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, area);
}

/// Lines for every load state that has no rows to show.
///
/// Returns `None` when the view has data and should render its rows.
pub fn status_lines<T>(
    load: &LoadState<Vec<T>>,
    empty_message: &str,
    spinner_frame: usize,
) -> Option<Vec<Line<'static>>> {
    match load {
        LoadState::Loaded(rows) if !rows.is_empty() => None,
        LoadState::Loaded(_) => Some(vec![Line::from(Span::styled(
            empty_message.to_string(),
            Style::default().fg(Color::DarkGray),
        ))]),
        other => Some(non_data_lines(other, spinner_frame)),
    }
}

/// Lines for `Idle`, `Loading` and `Failed`. `Loaded` yields nothing.
pub fn non_data_lines<T>(load: &LoadState<T>, spinner_frame: usize) -> Vec<Line<'static>> {
    match load {
        LoadState::Idle => vec![Line::from(Span::styled(
            "Press r to load.",
            Style::default().fg(Color::DarkGray),
        ))],
        LoadState::Loading => {
            let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
            vec![Line::from(Span::styled(
                format!("{spinner} Loading..."),
                Style::default().fg(Color::Yellow),
            ))]
        }
        LoadState::Failed(message) => vec![
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            )),
            Line::from(Span::styled(
                "Esc to dismiss · r to retry",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        LoadState::Loaded(_) => Vec::new(),
    }
}

/// Scroll offset that keeps the selected item's lines inside `height`.
pub fn scroll_offset(selected_start: usize, selected_end: usize, height: usize) -> u16 {
    let offset = selected_end.saturating_sub(height).min(selected_start);
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Style for a list item header line.
pub fn item_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

/// `label value` with a dim label.
pub fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<22}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}
