//! Screens and list views. Each module owns its state helpers and view.

pub mod dashboard;
pub mod events;
pub mod lists;
pub mod login;
pub mod policies;
pub mod quizzes;
pub mod render_utils;
