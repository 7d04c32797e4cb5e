//! Quiz list: paginated load, expandable option grids, view.

use eventdesk_core::api::{
    ApiResult, Page, Quiz, QuizQuery, display_opt, display_or_dash, display_timestamp,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tokio_util::sync::CancellationToken;

use super::render_utils::{item_style, non_data_lines, scroll_offset};
use crate::common::text::truncate_with_ellipsis;
use crate::common::{TaskCompleted, TaskSeq};
use crate::effects::UiEffect;
use crate::state::{LoadState, QuizzesView};

pub const EMPTY_MESSAGE: &str = "No quizzes.";
pub const PREV_LABEL: &str = "◀ Prev";
pub const NEXT_LABEL: &str = "Next ▶";

/// Loads `view.page`, superseding any in-flight load.
pub fn start_load(view: &mut QuizzesView, token: &str, tasks: &mut TaskSeq) -> Vec<UiEffect> {
    let id = tasks.next_id();
    let cancel = CancellationToken::new();

    let mut effects = Vec::with_capacity(2);
    if let Some(previous) = view.task.start(id, cancel.clone()) {
        effects.push(UiEffect::CancelTask { token: previous });
    }
    view.load = LoadState::Loading;
    effects.push(UiEffect::FetchQuizzes {
        task: id,
        token: token.to_string(),
        query: QuizQuery::page(view.page, view.page_size),
        cancel,
    });
    effects
}

/// Moves to page `target`. Out-of-range targets and requests while loading are no-ops.
pub fn request_page(
    view: &mut QuizzesView,
    token: &str,
    tasks: &mut TaskSeq,
    target: i64,
) -> Vec<UiEffect> {
    if view.load.is_loading() {
        return vec![];
    }
    let Some(meta) = view.meta() else {
        return vec![];
    };
    if !meta.contains(target) {
        return vec![];
    }
    let Ok(page) = u32::try_from(target) else {
        return vec![];
    };

    view.page = page;
    start_load(view, token, tasks)
}

/// Applies a finished load if it is still the current one.
///
/// Returns `false` when the result was stale and dropped.
pub fn apply_loaded(
    view: &mut QuizzesView,
    completed: TaskCompleted<ApiResult<Page<Quiz>>>,
) -> bool {
    if !view.task.finish_if_active(completed.id) {
        tracing::debug!(task = completed.id.0, "dropping stale quiz page");
        return false;
    }

    match completed.result {
        Ok(page) => {
            view.page = page.page;
            view.load = LoadState::Loaded(page);
            view.expanded.clear();
            view.selected = 0;
        }
        Err(e) => view.load = LoadState::Failed(e.user_message()),
    }
    true
}

pub fn move_selection(view: &mut QuizzesView, delta: isize) {
    let len = view.quizzes().len();
    if len == 0 {
        return;
    }
    view.selected = view.selected.saturating_add_signed(delta).min(len - 1);
}

/// Opens or closes the selected quiz's option grid. Quizzes without options never expand.
pub fn toggle_selected(view: &mut QuizzesView) {
    let Some(quiz) = view.quizzes().get(view.selected) else {
        return;
    };
    if !quiz.has_options() {
        return;
    }
    let id = quiz.id.clone();
    if !view.expanded.remove(&id) {
        view.expanded.insert(id);
    }
}

/// Renders the quiz view into `area`.
pub fn render_quizzes(frame: &mut Frame, area: Rect, view: &QuizzesView, spinner_frame: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let summary = view
        .meta()
        .map(|meta| meta.summary())
        .unwrap_or_default();
    let header = vec![
        Line::from(vec![
            Span::styled("GET /api/quizzes", Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::raw(summary),
        ]),
        Line::from(""),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    render_body(frame, chunks[1], view, spinner_frame);
    frame.render_widget(Paragraph::new(pagination_line(view)), chunks[2]);
}

fn render_body(frame: &mut Frame, area: Rect, view: &QuizzesView, spinner_frame: usize) {
    let page = match &view.load {
        LoadState::Loaded(page) => page,
        other => {
            frame.render_widget(
                Paragraph::new(non_data_lines(other, spinner_frame)).wrap(Wrap { trim: false }),
                area,
            );
            return;
        }
    };

    if page.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                EMPTY_MESSAGE,
                Style::default().fg(Color::DarkGray),
            ))),
            area,
        );
        return;
    }

    let width = area.width as usize;
    let mut lines = Vec::new();
    let mut selected_range = (0, 0);
    for (index, quiz) in page.content.iter().enumerate() {
        let start = lines.len();
        quiz_lines(
            &mut lines,
            quiz,
            index == view.selected,
            view.is_expanded(quiz),
            width,
        );
        if index == view.selected {
            selected_range = (start, lines.len());
        }
    }

    let offset = scroll_offset(selected_range.0, selected_range.1, area.height as usize);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn quiz_lines(
    lines: &mut Vec<Line<'static>>,
    quiz: &Quiz,
    selected: bool,
    expanded: bool,
    width: usize,
) {
    let marker = match (quiz.has_options(), expanded) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let title = format!("#{} {}", quiz.id, quiz.title());
    lines.push(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(
            truncate_with_ellipsis(&title, width.saturating_sub(2)),
            item_style(selected),
        ),
    ]));

    let active = match quiz.active {
        Some(true) => Span::styled("active", Style::default().fg(Color::Green)),
        Some(false) => Span::styled("inactive", Style::default().fg(Color::DarkGray)),
        None => Span::raw("-"),
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!(
                "  event {} · {} · date {} · order {} · ",
                display_opt(quiz.event_id.as_ref()),
                display_or_dash(quiz.quiz_type.as_deref()),
                display_or_dash(quiz.quiz_date.as_deref()),
                display_opt(quiz.question_order),
            ),
            Style::default().fg(Color::DarkGray),
        ),
        active,
        Span::styled(
            format!(" · created {}", display_timestamp(quiz.created_dt.as_deref())),
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    if let Some(answer) = quiz.correct_text.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("  answer ", Style::default().fg(Color::DarkGray)),
            Span::raw(truncate_with_ellipsis(answer, width.saturating_sub(9))),
        ]));
    }

    if expanded {
        for option in quiz.sorted_options() {
            let correct = option.correct == Some(true);
            let style = if correct {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            let text = format!(
                "{}. {}",
                display_or_dash(option.option_key.as_deref()),
                display_or_dash(option.option_text.as_deref()),
            );
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(truncate_with_ellipsis(&text, width.saturating_sub(7)), style),
                Span::styled(if correct { " ✓" } else { "" }, style),
            ]));
        }
    }
    lines.push(Line::from(""));
}

fn pagination_line(view: &QuizzesView) -> Line<'static> {
    let (prev, next) = view.pagination_enabled();
    let style = |enabled: bool| {
        if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };
    Line::from(vec![
        Span::styled(PREV_LABEL, style(prev)),
        Span::raw("   "),
        Span::styled(NEXT_LABEL, style(next)),
    ])
}

#[cfg(test)]
mod tests {
    use eventdesk_core::api::{EntityId, QuizOption};

    use super::*;

    fn quiz(id: i64, with_options: bool) -> Quiz {
        let options = with_options.then(|| {
            vec![QuizOption {
                id: EntityId::Number(id * 10),
                quiz_id: Some(EntityId::Number(id)),
                option_key: Some("A".to_string()),
                option_text: Some("Yes".to_string()),
                correct: Some(true),
                option_order: Some(1),
            }]
        });
        Quiz {
            id: EntityId::Number(id),
            event_id: None,
            quiz_type: None,
            question_text: Some(format!("Question {id}")),
            correct_text: None,
            quiz_date: None,
            question_order: None,
            active: Some(true),
            created_dt: None,
            options,
        }
    }

    fn page(index: u32, total_pages: u32, content: Vec<Quiz>) -> Page<Quiz> {
        Page {
            total_elements: content.len() as u64,
            content,
            page: index,
            size: 20,
            total_pages,
            first: index == 0,
            last: index + 1 >= total_pages,
        }
    }

    fn loaded_view(page: Page<Quiz>) -> QuizzesView {
        let mut view = QuizzesView::new(None);
        view.page = page.page;
        view.load = LoadState::Loaded(page);
        view
    }

    #[test]
    fn test_request_page_out_of_range_is_noop() {
        let mut tasks = TaskSeq::default();
        let mut view = loaded_view(page(0, 2, vec![quiz(1, false)]));

        assert!(request_page(&mut view, "abc", &mut tasks, -1).is_empty());
        assert!(request_page(&mut view, "abc", &mut tasks, 2).is_empty());
        assert_eq!(view.page, 0);
        assert!(view.load.loaded().is_some());
        assert!(!view.task.is_running());
    }

    #[test]
    fn test_request_page_loads_target() {
        let mut tasks = TaskSeq::default();
        let mut view = loaded_view(page(0, 2, vec![quiz(1, false)]));

        let effects = request_page(&mut view, "abc", &mut tasks, 1);
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            UiEffect::FetchQuizzes { query, token, .. } => {
                assert_eq!(query.page, Some(1));
                assert_eq!(token, "abc");
            }
            other => panic!("expected quiz fetch, got {other:?}"),
        }
        assert!(view.load.is_loading());
        assert_eq!(view.pagination_enabled(), (false, false));

        // Buttons are disabled while loading, so further requests do nothing.
        assert!(request_page(&mut view, "abc", &mut tasks, 0).is_empty());
    }

    #[test]
    fn test_expanded_set_resets_on_new_page() {
        let mut tasks = TaskSeq::default();
        let mut view = loaded_view(page(0, 2, vec![quiz(1, true), quiz(2, false)]));

        toggle_selected(&mut view);
        assert!(view.expanded.contains(&EntityId::Number(1)));

        move_selection(&mut view, 1);
        toggle_selected(&mut view);
        assert_eq!(view.expanded.len(), 1);

        request_page(&mut view, "abc", &mut tasks, 1);
        let id = view.task.active.unwrap();
        assert!(apply_loaded(
            &mut view,
            TaskCompleted {
                id,
                result: Ok(page(1, 2, vec![quiz(3, true)])),
            }
        ));
        assert!(view.expanded.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(view.pagination_enabled(), (true, false));
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut tasks = TaskSeq::default();
        let mut view = loaded_view(page(0, 3, vec![quiz(1, false)]));

        request_page(&mut view, "abc", &mut tasks, 1);
        let stale = view.task.active.unwrap();
        // Reload supersedes the page-1 request.
        start_load(&mut view, "abc", &mut tasks);
        let current = view.task.active.unwrap();

        assert!(!apply_loaded(
            &mut view,
            TaskCompleted {
                id: stale,
                result: Ok(page(1, 3, vec![quiz(9, false)])),
            }
        ));
        assert!(view.load.is_loading());

        assert!(apply_loaded(
            &mut view,
            TaskCompleted {
                id: current,
                result: Ok(page(1, 3, vec![quiz(2, false)])),
            }
        ));
        assert_eq!(view.quizzes()[0].id, EntityId::Number(2));
    }
}
