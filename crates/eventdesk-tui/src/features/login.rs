//! Login screen: state, key handling and view.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{calculate_centered_area, render_container};
use crate::common::TaskId;
use crate::common::text::{mask, truncate_with_ellipsis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    /// In-flight login request. Further submits are ignored while set.
    pub pending: Option<TaskId>,
    pub error: Option<String>,
}

/// What the reducer should do after a key press on the login screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
}

impl LoginState {
    /// Fresh login form. A prefilled email moves focus to the password field.
    pub fn new(email: Option<&str>) -> Self {
        let email = email.unwrap_or_default().to_string();
        let focus = if email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            email,
            password: String::new(),
            focus,
            pending: None,
            error: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if self.is_submitting() {
            return LoginAction::None;
        }

        match key.code {
            KeyCode::Enter => return LoginAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
            KeyCode::Esc => self.error = None,
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.focused_mut().push(c);
            }
            _ => {}
        }
        LoginAction::None
    }

    /// Validates the form before a request is made.
    pub fn validate(&self) -> Result<(), String> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Email and password are required.".to_string());
        }
        Ok(())
    }
}

const FORM_WIDTH: u16 = 64;
const FORM_HEIGHT: u16 = 14;

/// Renders the login form centered in `area`.
pub fn render_login(
    frame: &mut Frame,
    area: Rect,
    login: &LoginState,
    api_url: &Result<String, String>,
) {
    let popup = calculate_centered_area(area, FORM_WIDTH, FORM_HEIGHT);
    render_container(frame, popup, "eventdesk admin login", Color::Cyan);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );
    let width = inner.width as usize;

    let mut lines = Vec::new();
    match api_url {
        Ok(url) => lines.push(Line::from(vec![
            Span::styled("API  ", Style::default().fg(Color::DarkGray)),
            Span::raw(truncate_with_ellipsis(url, width.saturating_sub(5))),
        ])),
        Err(message) => lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(message, width),
            Style::default().fg(Color::Red),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(field_line(
        "Email",
        &login.email,
        login.focus == LoginField::Email,
        width,
    ));
    lines.push(field_line(
        "Password",
        &mask(&login.password),
        login.focus == LoginField::Password,
        width,
    ));
    lines.push(Line::from(""));

    if login.is_submitting() {
        lines.push(Line::from(Span::styled(
            "Logging in...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &login.error {
        lines.push(Line::from(Span::styled(
            truncate_with_ellipsis(error, width),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter to log in · Tab to switch field · Ctrl+C to quit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line(label: &str, value: &str, focused: bool, width: usize) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if focused { "▏" } else { "" };
    let value = truncate_with_ellipsis(value, width.saturating_sub(12));
    Line::from(vec![
        Span::styled(format!("{label:<10}"), label_style),
        Span::raw(value),
        Span::styled(cursor.to_string(), Style::default().fg(Color::Cyan)),
    ])
}
