//! Application state for the console.
//!
//! Owned by the runtime, mutated only by the reducer in `update.rs`,
//! read by the pure render functions.

use std::collections::HashSet;

use eventdesk_core::api::{EntityId, EventItem, Page, PageMeta, Quiz, RewardPolicy};
use eventdesk_core::config::Config;

use crate::common::{TaskSeq, TaskState};
use crate::features::login::LoginState;

/// Load lifecycle of one list view. Exactly one case is active.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Sidebar entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Quizzes,
    Events,
    Policies,
}

impl View {
    pub const ALL: [View; 4] = [View::Dashboard, View::Quizzes, View::Events, View::Policies];

    pub fn label(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Quizzes => "Quizzes",
            View::Events => "Events",
            View::Policies => "Reward policies",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> View {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> View {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// View bound to a number key (`1`-`4`).
    pub fn from_digit(digit: char) -> Option<View> {
        let index = digit.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }
}

/// Events and reward policies: a flat, non-paginated list.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub load: LoadState<Vec<T>>,
    pub task: TaskState,
    pub selected: usize,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            load: LoadState::Idle,
            task: TaskState::default(),
            selected: 0,
        }
    }
}

impl<T> ListView<T> {
    pub fn len(&self) -> usize {
        self.load.loaded().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Paginated quiz list with expandable option grids.
#[derive(Debug, Clone, Default)]
pub struct QuizzesView {
    pub load: LoadState<Page<Quiz>>,
    pub task: TaskState,
    /// Zero-based page requested by the last load.
    pub page: u32,
    pub page_size: Option<u32>,
    pub selected: usize,
    /// Quiz ids whose option grid is open. Reset whenever a page loads.
    pub expanded: HashSet<EntityId>,
}

impl QuizzesView {
    pub fn new(page_size: Option<u32>) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn quizzes(&self) -> &[Quiz] {
        self.load.loaded().map_or(&[][..], |page| page.content.as_slice())
    }

    pub fn meta(&self) -> Option<PageMeta> {
        self.load.loaded().map(Page::meta)
    }

    /// Whether the prev/next controls are enabled.
    pub fn pagination_enabled(&self) -> (bool, bool) {
        if self.load.is_loading() {
            return (false, false);
        }
        self.meta()
            .map_or((false, false), |meta| (meta.has_prev(), meta.has_next()))
    }

    pub fn is_expanded(&self, quiz: &Quiz) -> bool {
        self.expanded.contains(&quiz.id)
    }
}

/// Authenticated console: sidebar plus one active view.
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub token: String,
    pub view: View,
    pub quizzes: QuizzesView,
    pub events: ListView<EventItem>,
    pub policies: ListView<RewardPolicy>,
}

impl ConsoleState {
    pub fn new(token: String, page_size: Option<u32>) -> Self {
        Self {
            token,
            view: View::Dashboard,
            quizzes: QuizzesView::new(page_size),
            events: ListView::default(),
            policies: ListView::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Screen {
    Login(LoginState),
    Console(ConsoleState),
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    /// Resolved API base URL, or the configuration error to show instead.
    pub api_url: Result<String, String>,
    pub login_email: Option<String>,
    pub page_size: Option<u32>,
    pub tasks: TaskSeq,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    /// Builds the initial state. A hydrated token opens the console directly.
    pub fn new(config: &Config, token: Option<String>) -> Self {
        let api_url = eventdesk_core::api::resolve_base_url(config.effective_api_url())
            .map_err(|e| e.user_message());
        let login_email = config.effective_login_email().map(str::to_string);
        let page_size = config.page_size;

        let screen = match token {
            Some(token) => Screen::Console(ConsoleState::new(token, page_size)),
            None => Screen::Login(LoginState::new(login_email.as_deref())),
        };

        Self {
            screen,
            api_url,
            login_email,
            page_size,
            tasks: TaskSeq::default(),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn console(&self) -> Option<&ConsoleState> {
        match &self.screen {
            Screen::Console(console) => Some(console),
            Screen::Login(_) => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        match &self.screen {
            Screen::Login(login) => login.is_submitting(),
            Screen::Console(console) => {
                console.quizzes.task.is_running()
                    || console.events.task.is_running()
                    || console.policies.task.is_running()
            }
        }
    }
}
