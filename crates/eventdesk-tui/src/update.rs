//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use eventdesk_core::api::ApiResult;

use crate::common::{TaskCompleted, TaskSeq};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::login::{LoginAction, LoginState};
use crate::features::{lists, quizzes};
use crate::state::{AppState, ConsoleState, Screen, View};

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
            handle_key(app, key)
        }
        UiEvent::Terminal(_) => vec![],
        UiEvent::LoginCompleted(completed) => handle_login_completed(app, completed),
        UiEvent::QuizzesLoaded(completed) => {
            if let Screen::Console(console) = &mut app.screen {
                quizzes::apply_loaded(&mut console.quizzes, completed);
            }
            vec![]
        }
        UiEvent::EventsLoaded(completed) => {
            if let Screen::Console(console) = &mut app.screen {
                lists::apply_loaded(&mut console.events, completed);
            }
            vec![]
        }
        UiEvent::PoliciesLoaded(completed) => {
            if let Screen::Console(console) = &mut app.screen {
                lists::apply_loaded(&mut console.policies, completed);
            }
            vec![]
        }
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    match &mut app.screen {
        Screen::Login(login) => match login.handle_key(key) {
            LoginAction::Submit => submit_login(app),
            LoginAction::None => vec![],
        },
        Screen::Console(_) => handle_console_key(app, key),
    }
}

// ============================================================================
// Login
// ============================================================================

fn submit_login(app: &mut AppState) -> Vec<UiEffect> {
    let AppState {
        screen,
        api_url,
        tasks,
        ..
    } = app;
    let Screen::Login(login) = screen else {
        return vec![];
    };
    if login.is_submitting() {
        return vec![];
    }

    if let Err(message) = api_url {
        login.error = Some(message.clone());
        return vec![];
    }
    if let Err(message) = login.validate() {
        login.error = Some(message);
        return vec![];
    }

    let task = tasks.next_id();
    login.pending = Some(task);
    login.error = None;
    vec![UiEffect::Login {
        task,
        email: login.email.trim().to_string(),
        password: login.password.clone(),
    }]
}

fn handle_login_completed(
    app: &mut AppState,
    completed: TaskCompleted<ApiResult<String>>,
) -> Vec<UiEffect> {
    let Screen::Login(login) = &mut app.screen else {
        return vec![];
    };
    if login.pending != Some(completed.id) {
        tracing::debug!(task = completed.id.0, "dropping stale login result");
        return vec![];
    }
    login.pending = None;

    match completed.result {
        Ok(token) => {
            tracing::info!("logged in");
            app.screen = Screen::Console(ConsoleState::new(token.clone(), app.page_size));
            vec![UiEffect::SaveSession { token }]
        }
        Err(e) => {
            login.error = Some(e.user_message());
            vec![]
        }
    }
}

// ============================================================================
// Console
// ============================================================================

fn handle_console_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('q') => return vec![UiEffect::Quit],
        KeyCode::Char('L') => return logout(app),
        _ => {}
    }

    let AppState { screen, tasks, .. } = app;
    let Screen::Console(console) = screen else {
        return vec![];
    };

    match key.code {
        KeyCode::Tab => {
            let next = console.view.next();
            activate_view(console, tasks, next)
        }
        KeyCode::BackTab => {
            let prev = console.view.prev();
            activate_view(console, tasks, prev)
        }
        KeyCode::Char(c @ '1'..='4') => match View::from_digit(c) {
            Some(view) => activate_view(console, tasks, view),
            None => vec![],
        },
        KeyCode::Char('r') => load_view(console, tasks),
        KeyCode::Esc => {
            dismiss_error(console);
            vec![]
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(console, -1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(console, 1);
            vec![]
        }
        KeyCode::Left | KeyCode::Char('h') if console.view == View::Quizzes => {
            change_page(console, tasks, -1)
        }
        KeyCode::Right | KeyCode::Char('l') if console.view == View::Quizzes => {
            change_page(console, tasks, 1)
        }
        KeyCode::Enter | KeyCode::Char(' ') if console.view == View::Quizzes => {
            quizzes::toggle_selected(&mut console.quizzes);
            vec![]
        }
        _ => vec![],
    }
}

/// Switches the active view. List views reload on every activation.
fn activate_view(console: &mut ConsoleState, tasks: &mut TaskSeq, view: View) -> Vec<UiEffect> {
    console.view = view;
    load_view(console, tasks)
}

/// Starts a load for the active view, superseding any in-flight one.
fn load_view(console: &mut ConsoleState, tasks: &mut TaskSeq) -> Vec<UiEffect> {
    let token = console.token.clone();
    match console.view {
        View::Dashboard => vec![],
        View::Quizzes => quizzes::start_load(&mut console.quizzes, &token, tasks),
        View::Events => lists::start_load(&mut console.events, tasks, |task, cancel| {
            UiEffect::FetchEvents {
                task,
                token,
                cancel,
            }
        }),
        View::Policies => lists::start_load(&mut console.policies, tasks, |task, cancel| {
            UiEffect::FetchPolicies {
                task,
                token,
                cancel,
            }
        }),
    }
}

fn change_page(console: &mut ConsoleState, tasks: &mut TaskSeq, delta: i64) -> Vec<UiEffect> {
    let target = i64::from(console.quizzes.page) + delta;
    quizzes::request_page(&mut console.quizzes, &console.token, tasks, target)
}

fn dismiss_error(console: &mut ConsoleState) {
    match console.view {
        View::Dashboard => {}
        View::Quizzes => lists::dismiss_error(&mut console.quizzes.load),
        View::Events => lists::dismiss_error(&mut console.events.load),
        View::Policies => lists::dismiss_error(&mut console.policies.load),
    }
}

fn move_selection(console: &mut ConsoleState, delta: isize) {
    match console.view {
        View::Dashboard => {}
        View::Quizzes => quizzes::move_selection(&mut console.quizzes, delta),
        View::Events => lists::move_selection(&mut console.events, delta),
        View::Policies => lists::move_selection(&mut console.policies, delta),
    }
}

/// Clears the session, cancels every in-flight load and returns to the login screen.
fn logout(app: &mut AppState) -> Vec<UiEffect> {
    let Screen::Console(console) = &mut app.screen else {
        return vec![];
    };

    let mut effects = vec![UiEffect::ClearSession];
    effects.extend(
        console
            .quizzes
            .task
            .clear()
            .map(|token| UiEffect::CancelTask { token }),
    );
    effects.extend(lists::cancel_load(&mut console.events));
    effects.extend(lists::cancel_load(&mut console.policies));

    tracing::info!("logged out");
    app.screen = Screen::Login(LoginState::new(app.login_email.as_deref()));
    effects
}
