//! Load generations for list views and login.
//!
//! Each load gets a fresh `TaskId`. Results are applied only when their id is
//! still the active one, so a late response from a superseded load is dropped.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug)]
pub struct TaskCompleted<T> {
    pub id: TaskId,
    pub result: T,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Makes `id` the active task. Returns the superseded task's token so the
    /// caller can cancel it.
    pub fn start(&mut self, id: TaskId, cancel: CancellationToken) -> Option<CancellationToken> {
        self.active = Some(id);
        self.cancel.replace(cancel)
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    /// Forgets the active task and returns its token for cancellation.
    pub fn clear(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_superseded_task_is_not_active() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();

        let first = seq.next_id();
        assert!(state.start(first, CancellationToken::new()).is_none());

        let second = seq.next_id();
        let previous = state.start(second, CancellationToken::new());
        assert!(previous.is_some());

        assert!(!state.finish_if_active(first));
        assert!(state.is_running());
        assert!(state.finish_if_active(second));
        assert!(!state.is_running());
    }

    #[test]
    fn test_clear_returns_token() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let token = CancellationToken::new();
        state.start(seq.next_id(), token.clone());

        let taken = state.clear().unwrap();
        taken.cancel();
        assert!(token.is_cancelled());
        assert!(!state.is_running());
    }
}
