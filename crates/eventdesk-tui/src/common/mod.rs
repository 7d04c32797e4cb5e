pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskSeq, TaskState};
pub use text::truncate_with_ellipsis;
