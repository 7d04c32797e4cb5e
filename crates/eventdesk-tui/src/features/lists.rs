//! Load lifecycle for the flat list views (events, reward policies).

use eventdesk_core::api::ApiResult;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskSeq};
use crate::effects::UiEffect;
use crate::state::{ListView, LoadState};

/// Starts a fresh load, superseding any in-flight one.
///
/// `fetch` builds the effect for the new task.
pub fn start_load<T>(
    list: &mut ListView<T>,
    tasks: &mut TaskSeq,
    fetch: impl FnOnce(TaskId, CancellationToken) -> UiEffect,
) -> Vec<UiEffect> {
    let id = tasks.next_id();
    let cancel = CancellationToken::new();

    let mut effects = Vec::with_capacity(2);
    if let Some(previous) = list.task.start(id, cancel.clone()) {
        effects.push(UiEffect::CancelTask { token: previous });
    }
    list.load = LoadState::Loading;
    effects.push(fetch(id, cancel));
    effects
}

/// Applies a finished load if it is still the current one.
///
/// Returns `false` when the result was stale and dropped.
pub fn apply_loaded<T>(
    list: &mut ListView<T>,
    completed: TaskCompleted<ApiResult<Vec<T>>>,
) -> bool {
    if !list.task.finish_if_active(completed.id) {
        tracing::debug!(task = completed.id.0, "dropping stale list result");
        return false;
    }

    list.load = match completed.result {
        Ok(rows) => LoadState::Loaded(rows),
        Err(e) => LoadState::Failed(e.user_message()),
    };
    list.selected = 0;
    true
}

/// Cancels any in-flight load without touching the shown data.
pub fn cancel_load<T>(list: &mut ListView<T>) -> Option<UiEffect> {
    list.task
        .clear()
        .map(|token| UiEffect::CancelTask { token })
}

pub fn move_selection<T>(list: &mut ListView<T>, delta: isize) {
    let len = list.len();
    if len == 0 {
        return;
    }
    list.selected = list.selected.saturating_add_signed(delta).min(len - 1);
}

/// Esc on a failed view returns it to idle.
pub fn dismiss_error<T>(load: &mut LoadState<T>) {
    if matches!(load, LoadState::Failed(_)) {
        *load = LoadState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use eventdesk_core::api::ApiError;

    use super::*;

    fn fetch(task: TaskId, cancel: CancellationToken) -> UiEffect {
        UiEffect::FetchEvents {
            task,
            token: "abc".to_string(),
            cancel,
        }
    }

    #[test]
    fn test_second_load_cancels_first_and_drops_its_result() {
        let mut tasks = TaskSeq::default();
        let mut list: ListView<u32> = ListView::default();

        let first = start_load(&mut list, &mut tasks, fetch);
        assert_eq!(first.len(), 1);
        let UiEffect::FetchEvents {
            task: first_id,
            cancel: first_cancel,
            ..
        } = &first[0]
        else {
            panic!("expected fetch effect");
        };
        let first_id = *first_id;

        let second = start_load(&mut list, &mut tasks, fetch);
        let UiEffect::CancelTask { token } = &second[0] else {
            panic!("expected cancel effect");
        };
        token.cancel();
        assert!(first_cancel.is_cancelled());
        let UiEffect::FetchEvents {
            task: second_id, ..
        } = &second[1]
        else {
            panic!("expected fetch effect");
        };
        let second_id = *second_id;

        assert!(!apply_loaded(
            &mut list,
            TaskCompleted {
                id: first_id,
                result: Ok(vec![1]),
            }
        ));
        assert!(list.load.is_loading());

        assert!(apply_loaded(
            &mut list,
            TaskCompleted {
                id: second_id,
                result: Ok(vec![2, 3]),
            }
        ));
        assert_eq!(list.load, LoadState::Loaded(vec![2, 3]));
    }

    #[test]
    fn test_failed_load_and_dismiss() {
        let mut tasks = TaskSeq::default();
        let mut list: ListView<u32> = ListView::default();
        start_load(&mut list, &mut tasks, fetch);
        let id = list.task.active.unwrap();

        apply_loaded(
            &mut list,
            TaskCompleted {
                id,
                result: Err(ApiError::http_status(
                    eventdesk_core::api::Operation::EventList,
                    500,
                    "",
                )),
            },
        );
        assert_eq!(
            list.load.error(),
            Some("event list request failed (status 500)")
        );

        dismiss_error(&mut list.load);
        assert_eq!(list.load, LoadState::Idle);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut list: ListView<u32> = ListView {
            load: LoadState::Loaded(vec![1, 2, 3]),
            ..ListView::default()
        };
        move_selection(&mut list, -1);
        assert_eq!(list.selected, 0);
        move_selection(&mut list, 5);
        assert_eq!(list.selected, 2);
    }
}
