//! Reward policies view.

use eventdesk_core::api::{
    RewardPolicy, display_opt, display_or_dash, display_timestamp, display_window,
};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::render_utils::{item_style, labeled, scroll_offset, status_lines};
use crate::common::text::truncate_with_ellipsis;
use crate::state::ListView;

pub const EMPTY_MESSAGE: &str = "No reward policies.";

pub fn render_policies(
    frame: &mut Frame,
    area: Rect,
    list: &ListView<RewardPolicy>,
    spinner_frame: usize,
) {
    if let Some(lines) = status_lines(&list.load, EMPTY_MESSAGE, spinner_frame) {
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }
    let Some(policies) = list.load.loaded() else {
        return;
    };

    let width = area.width as usize;
    let mut lines = Vec::new();
    let mut selected_range = (0, 0);
    for (index, policy) in policies.iter().enumerate() {
        let start = lines.len();
        policy_lines(&mut lines, policy, index == list.selected, width);
        if index == list.selected {
            selected_range = (start, lines.len());
        }
    }

    let offset = scroll_offset(selected_range.0, selected_range.1, area.height as usize);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

fn policy_lines(
    lines: &mut Vec<Line<'static>>,
    policy: &RewardPolicy,
    selected: bool,
    width: usize,
) {
    let title = format!("#{} {}", policy.id, policy.display_name());
    let policy_type = display_or_dash(policy.policy_type.as_deref());
    lines.push(Line::from(vec![
        Span::styled(
            truncate_with_ellipsis(&title, width.saturating_sub(policy_type.len() + 3)),
            item_style(selected),
        ),
        Span::raw(" "),
        Span::styled(format!("[{policy_type}]"), Style::default().fg(Color::Magenta)),
    ]));

    lines.push(labeled("event", display_opt(policy.event_id.as_ref())));
    lines.push(labeled(
        "active",
        display_window(policy.start_dt.as_deref(), policy.end_dt.as_deref()),
    ));
    lines.push(labeled(
        "winners",
        format!(
            "total {} · per day {}",
            display_opt(policy.winner_limit_total),
            display_opt(policy.winner_limit_per_day),
        ),
    ));
    lines.push(labeled(
        "per user",
        format!(
            "total {} · per day {}",
            display_opt(policy.user_limit_total),
            display_opt(policy.user_limit_per_day),
        ),
    ));
    lines.push(labeled("selection", policy.scope_summary()));
    lines.push(labeled(
        "reward",
        format!(
            "{} {}",
            display_or_dash(policy.reward_type.as_deref()),
            display_or_dash(policy.reward_value.as_deref()),
        ),
    ));
    lines.push(labeled(
        "audit",
        format!(
            "created {} · updated {}",
            display_timestamp(policy.created_dt.as_deref()),
            display_timestamp(policy.updated_dt.as_deref()),
        ),
    ));
    lines.push(Line::from(""));
}
