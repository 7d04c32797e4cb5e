//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! Cancellation is decided by the reducer via `UiEffect::CancelTask`;
//! the runtime just calls `cancel()` on the token.

use eventdesk_core::api::QuizQuery;
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Exchange credentials for an access token.
    Login {
        task: TaskId,
        email: String,
        password: String,
    },

    /// Persist the access token.
    SaveSession { token: String },

    /// Remove the persisted access token.
    ClearSession,

    FetchQuizzes {
        task: TaskId,
        token: String,
        query: QuizQuery,
        cancel: CancellationToken,
    },

    FetchEvents {
        task: TaskId,
        token: String,
        cancel: CancellationToken,
    },

    FetchPolicies {
        task: TaskId,
        token: String,
        cancel: CancellationToken,
    },

    /// Cancel a superseded or abandoned task.
    CancelTask { token: CancellationToken },
}
