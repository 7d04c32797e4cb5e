//! Dashboard view and sidebar.

use eventdesk_core::session::mask_token;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::state::{ConsoleState, View};

pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    console: &ConsoleState,
    api_url: &Result<String, String>,
) {
    let label = Style::default().fg(Color::DarkGray);
    let api_line = match api_url {
        Ok(url) => Line::from(vec![Span::styled("API URL   ", label), Span::raw(url.clone())]),
        Err(message) => Line::from(vec![
            Span::styled("API URL   ", label),
            Span::styled(message.clone(), Style::default().fg(Color::Red)),
        ]),
    };

    let mut lines = vec![
        api_line,
        Line::from(vec![
            Span::styled("Session   ", label),
            Span::raw(mask_token(&console.token)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for (index, view) in View::ALL.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", index + 1), Style::default().fg(Color::Cyan)),
            Span::raw(view.label()),
        ]));
    }
    lines.push(Line::from(""));
    for hint in [
        "Tab / Shift+Tab   switch view",
        "r                 reload the current list",
        "j / k             move selection",
        "Enter / Space     show quiz options",
        "← / →             previous / next quiz page",
        "Esc               dismiss an error",
        "L                 log out",
        "q                 quit",
    ] {
        lines.push(Line::from(Span::styled(format!("  {hint}"), label)));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

pub fn render_sidebar(frame: &mut Frame, area: Rect, active: View) {
    let lines: Vec<Line<'static>> = View::ALL
        .iter()
        .enumerate()
        .map(|(index, view)| {
            let selected = *view == active;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if selected { "›" } else { " " };
            Line::from(Span::styled(
                format!("{marker} {} {}", index + 1, view.label()),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " eventdesk ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
