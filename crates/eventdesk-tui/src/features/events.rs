//! Events view.

use eventdesk_core::api::{
    EventItem, display_opt, display_or_dash, display_timestamp, display_window,
};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{item_style, labeled, scroll_offset, status_lines};
use crate::common::text::truncate_with_ellipsis;
use crate::state::ListView;

pub const EMPTY_MESSAGE: &str = "No events.";

pub fn render_events(
    frame: &mut Frame,
    area: Rect,
    list: &ListView<EventItem>,
    spinner_frame: usize,
) {
    if let Some(lines) = status_lines(&list.load, EMPTY_MESSAGE, spinner_frame) {
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }
    let Some(events) = list.load.loaded() else {
        return;
    };

    let width = area.width as usize;
    let mut lines = Vec::new();
    let mut selected_range = (0, 0);
    for (index, event) in events.iter().enumerate() {
        let start = lines.len();
        event_lines(&mut lines, event, index == list.selected, width);
        if index == list.selected {
            selected_range = (start, lines.len());
        }
    }

    let offset = scroll_offset(selected_range.0, selected_range.1, area.height as usize);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn status_badge(event: &EventItem) -> Span<'static> {
    let status = display_or_dash(event.status.as_deref());
    let style = if event.is_open() {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!(" {status} "), style)
}

fn event_lines(lines: &mut Vec<Line<'static>>, event: &EventItem, selected: bool, width: usize) {
    let title = format!("#{} {}", event.id, event.display_name());
    lines.push(Line::from(vec![
        Span::styled(
            truncate_with_ellipsis(&title, width.saturating_sub(12)),
            item_style(selected),
        ),
        Span::raw(" "),
        status_badge(event),
    ]));

    if let Some(description) = event.description.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(Line::from(Span::raw(format!(
            "  {}",
            truncate_with_ellipsis(description, width.saturating_sub(2))
        ))));
    }

    lines.push(labeled(
        "event",
        display_window(event.start_dt.as_deref(), event.end_dt.as_deref()),
    ));
    lines.push(labeled(
        "participation",
        display_window(
            event.participation_start_time.as_deref(),
            event.participation_end_time.as_deref(),
        ),
    ));
    lines.push(labeled(
        "attendance",
        display_window(
            event.attendance_start_time.as_deref(),
            event.attendance_end_time.as_deref(),
        ),
    ));
    lines.push(labeled(
        "overlap participation",
        display_window(
            event.intersection_participation_start_time.as_deref(),
            event.intersection_participation_end_time.as_deref(),
        ),
    ));
    lines.push(labeled(
        "overlap attendance",
        display_window(
            event.intersection_attendance_start_time.as_deref(),
            event.intersection_attendance_end_time.as_deref(),
        ),
    ));
    lines.push(labeled(
        "limits",
        format!(
            "daily tries {} · rewards per user {}",
            display_opt(event.max_daily_try),
            display_opt(event.reward_limit_per_user),
        ),
    ));
    lines.push(labeled(
        "audit",
        format!(
            "created {} · updated {}",
            display_timestamp(event.created_dt.as_deref()),
            display_timestamp(event.updated_dt.as_deref()),
        ),
    ));
    lines.push(Line::from(""));
}
