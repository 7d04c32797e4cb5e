//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui Frame, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::features::dashboard::{render_dashboard, render_sidebar};
use crate::features::events::render_events;
use crate::features::login::render_login;
use crate::features::policies::render_policies;
use crate::features::quizzes::render_quizzes;
use crate::state::{AppState, ConsoleState, Screen, View};

/// Width of the navigation sidebar.
const SIDEBAR_WIDTH: u16 = 22;

/// Height of the key hint line at the bottom.
const FOOTER_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match &app.screen {
        Screen::Login(login) => render_login(frame, area, login, &app.api_url),
        Screen::Console(console) => render_console(frame, area, app, console),
    }
}

fn render_console(frame: &mut Frame, area: Rect, app: &AppState, console: &ConsoleState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(rows[0]);

    render_sidebar(frame, columns[0], console.view);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", console.view.label()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(columns[1]);
    frame.render_widget(block, columns[1]);

    let body = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height,
    );
    match console.view {
        View::Dashboard => render_dashboard(frame, body, console, &app.api_url),
        View::Quizzes => render_quizzes(frame, body, &console.quizzes, app.spinner_frame),
        View::Events => render_events(frame, body, &console.events, app.spinner_frame),
        View::Policies => render_policies(frame, body, &console.policies, app.spinner_frame),
    }

    frame.render_widget(Paragraph::new(footer_hints(console.view)), rows[1]);
}

fn footer_hints(view: View) -> Line<'static> {
    let hints = match view {
        View::Quizzes => {
            "Tab/1-4 switch · j/k move · Enter options · ←/→ page · r reload · Esc dismiss · L logout · q quit"
        }
        View::Dashboard => "Tab/1-4 switch · L logout · q quit",
        View::Events | View::Policies => {
            "Tab/1-4 switch · j/k move · r reload · Esc dismiss · L logout · q quit"
        }
    };
    Line::from(Span::styled(
        format!(" {hints}"),
        Style::default().fg(Color::DarkGray),
    ))
}
