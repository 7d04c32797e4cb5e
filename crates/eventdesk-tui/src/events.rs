//! UI events consumed by the reducer.

use eventdesk_core::api::{ApiResult, EventItem, Page, Quiz, RewardPolicy};

use crate::common::TaskCompleted;

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick for spinner animation.
    Tick,
    /// Raw terminal input.
    Terminal(crossterm::event::Event),
    LoginCompleted(TaskCompleted<ApiResult<String>>),
    QuizzesLoaded(TaskCompleted<ApiResult<Page<Quiz>>>),
    EventsLoaded(TaskCompleted<ApiResult<Vec<EventItem>>>),
    PoliciesLoaded(TaskCompleted<ApiResult<Vec<RewardPolicy>>>),
}
