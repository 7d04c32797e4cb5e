//! Wire types for the admin API.
//!
//! Field names follow the API's camelCase JSON. Everything except `id` is
//! optional and unknown fields are ignored.

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier. The API sends either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: EntityId,
    pub quiz_id: Option<EntityId>,
    pub option_key: Option<String>,
    pub option_text: Option<String>,
    pub correct: Option<bool>,
    pub option_order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: EntityId,
    pub event_id: Option<EntityId>,
    #[serde(rename = "type")]
    pub quiz_type: Option<String>,
    pub question_text: Option<String>,
    pub correct_text: Option<String>,
    pub quiz_date: Option<String>,
    pub question_order: Option<i64>,
    pub active: Option<bool>,
    pub created_dt: Option<String>,
    pub options: Option<Vec<QuizOption>>,
}

impl Quiz {
    /// Title shown in list rows.
    pub fn title(&self) -> String {
        match self.question_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => format!("Quiz {}", self.id),
        }
    }

    /// Whether the quiz has options to expand.
    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }

    /// Options ordered by `optionOrder` (missing sorts as 0, ties keep server order).
    pub fn sorted_options(&self) -> Vec<&QuizOption> {
        let mut options: Vec<&QuizOption> = self.options.iter().flatten().collect();
        options.sort_by_key(|o| o.option_order.unwrap_or(0));
        options
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: EntityId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_dt: Option<String>,
    pub end_dt: Option<String>,
    pub participation_start_time: Option<String>,
    pub participation_end_time: Option<String>,
    pub attendance_start_time: Option<String>,
    pub attendance_end_time: Option<String>,
    pub intersection_participation_start_time: Option<String>,
    pub intersection_participation_end_time: Option<String>,
    pub intersection_attendance_start_time: Option<String>,
    pub intersection_attendance_end_time: Option<String>,
    pub max_daily_try: Option<i64>,
    pub reward_limit_per_user: Option<i64>,
    pub status: Option<String>,
    pub created_dt: Option<String>,
    pub updated_dt: Option<String>,
}

impl EventItem {
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Event {}", self.id),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.as_deref() == Some("OPEN")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPolicy {
    pub id: EntityId,
    pub event_id: Option<EntityId>,
    pub name: Option<String>,
    pub policy_type: Option<String>,
    pub start_dt: Option<String>,
    pub end_dt: Option<String>,
    pub winner_limit_total: Option<i64>,
    pub winner_limit_per_day: Option<i64>,
    pub target_order: Option<i64>,
    pub nth_scope: Option<String>,
    pub user_limit_total: Option<i64>,
    pub user_limit_per_day: Option<i64>,
    pub reward_type: Option<String>,
    pub reward_value: Option<String>,
    pub created_dt: Option<String>,
    pub updated_dt: Option<String>,
}

impl RewardPolicy {
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Policy {}", self.id),
        }
    }

    pub fn is_nth_order(&self) -> bool {
        self.policy_type.as_deref() == Some("NTH_ORDER")
    }

    /// `target order N (scope)` for nth-order policies, `scope: X` otherwise.
    pub fn scope_summary(&self) -> String {
        let scope = display_or_dash(self.nth_scope.as_deref());
        if self.is_nth_order() {
            format!("target order {} ({scope})", display_opt(self.target_order))
        } else {
            format!("scope: {scope}")
        }
    }
}

/// Paginated envelope returned by list endpoints.
///
/// Only `content` is required; missing metadata decodes as zero/false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    /// Page metadata without the content.
    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            size: self.size,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            first: self.first,
            last: self.last,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Pagination metadata for navigation controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub first: bool,
    pub last: bool,
}

impl PageMeta {
    /// Whether `page` is a valid zero-based index for this envelope.
    pub fn contains(&self, page: i64) -> bool {
        page >= 0 && page < i64::from(self.total_pages)
    }

    /// Target page for a relative move, or `None` when it falls outside the range.
    pub fn step(&self, delta: i64) -> Option<u32> {
        let target = i64::from(self.page) + delta;
        if self.contains(target) {
            u32::try_from(target).ok()
        } else {
            None
        }
    }

    pub fn has_prev(&self) -> bool {
        !self.first
    }

    pub fn has_next(&self) -> bool {
        !self.last
    }

    /// `N items · page P / T` with a one-based page number.
    pub fn summary(&self) -> String {
        format!(
            "{} items · page {} / {}",
            self.total_elements,
            self.page.saturating_add(1),
            self.total_pages.max(1)
        )
    }
}

/// Formats an optional value, `-` when missing.
pub fn display_opt<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Formats an optional string, `-` when missing or blank.
pub fn display_or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Formats an API timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and zone-less ISO-8601; anything else is shown verbatim.
pub fn display_timestamp(value: Option<&str>) -> String {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return "-".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

/// Formats a start/end pair as `start ~ end`.
pub fn display_window(start: Option<&str>, end: Option<&str>) -> String {
    format!("{} ~ {}", display_timestamp(start), display_timestamp(end))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_entity_id_accepts_number_and_string() {
        let ids: Vec<EntityId> = serde_json::from_value(json!([7, "q-7"])).unwrap();
        assert_eq!(ids[0], EntityId::Number(7));
        assert_eq!(ids[1], EntityId::Text("q-7".to_string()));
        assert_eq!(ids[0].to_string(), "7");
        assert_eq!(ids[1].to_string(), "q-7");
    }

    #[test]
    fn test_quiz_ignores_unknown_fields() {
        let quiz: Quiz = serde_json::from_value(json!({
            "id": 1,
            "type": "OX",
            "questionText": "Is Rust fast?",
            "somethingNew": true
        }))
        .unwrap();
        assert_eq!(quiz.quiz_type.as_deref(), Some("OX"));
        assert_eq!(quiz.title(), "Is Rust fast?");
        assert!(!quiz.has_options());
    }

    #[test]
    fn test_quiz_title_falls_back_to_id() {
        let quiz: Quiz = serde_json::from_value(json!({ "id": 42 })).unwrap();
        assert_eq!(quiz.title(), "Quiz 42");
    }

    #[test]
    fn test_sorted_options_missing_order_is_zero_and_stable() {
        let quiz: Quiz = serde_json::from_value(json!({
            "id": 1,
            "options": [
                { "id": "c", "optionOrder": 2 },
                { "id": "a" },
                { "id": "b", "optionOrder": 0 },
                { "id": "d", "optionOrder": 1 }
            ]
        }))
        .unwrap();
        let ids: Vec<String> = quiz
            .sorted_options()
            .iter()
            .map(|o| o.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_policy_scope_summary() {
        let nth: RewardPolicy = serde_json::from_value(json!({
            "id": 1,
            "policyType": "NTH_ORDER",
            "targetOrder": 100,
            "nthScope": "DAILY"
        }))
        .unwrap();
        assert_eq!(nth.scope_summary(), "target order 100 (DAILY)");

        let other: RewardPolicy =
            serde_json::from_value(json!({ "id": 2, "policyType": "RANDOM" })).unwrap();
        assert_eq!(other.scope_summary(), "scope: -");
        assert_eq!(other.display_name(), "Policy 2");
    }

    #[test]
    fn test_event_open_status() {
        let event: EventItem =
            serde_json::from_value(json!({ "id": "e1", "status": "OPEN" })).unwrap();
        assert!(event.is_open());
        assert_eq!(event.display_name(), "Event e1");
    }

    #[test]
    fn test_page_meta_bounds() {
        let meta = PageMeta {
            page: 0,
            size: 20,
            total_pages: 3,
            total_elements: 45,
            first: true,
            last: false,
        };
        assert!(!meta.contains(-1));
        assert!(meta.contains(2));
        assert!(!meta.contains(3));
        assert_eq!(meta.step(-1), None);
        assert_eq!(meta.step(1), Some(1));
        assert!(!meta.has_prev());
        assert!(meta.has_next());
        assert_eq!(meta.summary(), "45 items · page 1 / 3");
    }

    #[test]
    fn test_page_meta_empty_has_no_valid_page() {
        let meta = PageMeta::default();
        assert!(!meta.contains(0));
        assert_eq!(meta.step(1), None);
        assert_eq!(meta.summary(), "0 items · page 1 / 1");
    }

    #[test]
    fn test_page_meta_summary_saturates_on_last_page_number() {
        let meta = PageMeta {
            page: u32::MAX,
            total_pages: 2,
            total_elements: 3,
            ..PageMeta::default()
        };
        assert_eq!(meta.summary(), format!("3 items · page {} / 2", u32::MAX));
    }

    #[test]
    fn test_display_timestamp_formats() {
        assert_eq!(
            display_timestamp(Some("2024-05-01T09:30:00")),
            "2024-05-01 09:30"
        );
        assert_eq!(
            display_timestamp(Some("2024-05-01T09:30:00.123+09:00")),
            "2024-05-01 09:30"
        );
        assert_eq!(display_timestamp(Some("tomorrow")), "tomorrow");
        assert_eq!(display_timestamp(None), "-");
        assert_eq!(display_window(None, Some("2024-05-01T10:00:00")), "- ~ 2024-05-01 10:00");
    }
}
