//! List command handlers (quizzes, events, reward policies).

use anyhow::{Context, Result};
use comfy_table::Table;
use eventdesk_core::api::{
    AdminClient, EventItem, Quiz, QuizQuery, RewardPolicy, display_opt, display_or_dash,
    display_timestamp, display_window,
};
use eventdesk_core::config::Config;
use eventdesk_core::session::{FileSessionStore, SessionStore};
use serde_json::Value;

const NOT_LOGGED_IN: &str = "Not logged in. Run `eventdesk login` first.";

/// Loads the stored token, failing when there is none.
fn require_token(store: &FileSessionStore) -> Result<String> {
    store
        .load()
        .context("load session")?
        .ok_or_else(|| anyhow::anyhow!(NOT_LOGGED_IN))
}

/// Prints a response body exactly as the server sent it.
fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize response")?;
    println!("{json}");
    Ok(())
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(header);
    table
}

pub async fn quizzes(
    config: &Config,
    store: &FileSessionStore,
    page: u32,
    size: Option<u32>,
    json: bool,
) -> Result<()> {
    let client = AdminClient::from_config(config)?;
    let token = require_token(store)?;

    let query = QuizQuery::page(page, size.or(config.page_size));
    if json {
        return print_json(&client.list_quizzes_raw(&token, query).await?);
    }

    let page = client.list_quizzes(&token, query).await?;
    if page.is_empty() {
        println!("No quizzes.");
    } else {
        println!("{}", quiz_table(&page.content));
    }
    println!("{}", page.meta().summary());
    Ok(())
}

fn quiz_table(quizzes: &[Quiz]) -> Table {
    let mut table = new_table(&["ID", "Title", "Type", "Date", "Order", "Active", "Options"]);
    for quiz in quizzes {
        table.add_row(vec![
            quiz.id.to_string(),
            quiz.title(),
            display_or_dash(quiz.quiz_type.as_deref()),
            display_or_dash(quiz.quiz_date.as_deref()),
            display_opt(quiz.question_order),
            display_opt(quiz.active),
            quiz.options.as_ref().map_or(0, Vec::len).to_string(),
        ]);
    }
    table
}

pub async fn events(config: &Config, store: &FileSessionStore, json: bool) -> Result<()> {
    let client = AdminClient::from_config(config)?;
    let token = require_token(store)?;

    if json {
        return print_json(&client.list_events_raw(&token).await?);
    }

    let events = client.list_events(&token).await?;
    if events.is_empty() {
        println!("No events.");
    } else {
        println!("{}", event_table(&events));
    }
    Ok(())
}

fn event_table(events: &[EventItem]) -> Table {
    let mut table = new_table(&["ID", "Name", "Status", "Window", "Daily tries", "Rewards/user"]);
    for event in events {
        table.add_row(vec![
            event.id.to_string(),
            event.display_name(),
            display_or_dash(event.status.as_deref()),
            display_window(event.start_dt.as_deref(), event.end_dt.as_deref()),
            display_opt(event.max_daily_try),
            display_opt(event.reward_limit_per_user),
        ]);
    }
    table
}

pub async fn policies(config: &Config, store: &FileSessionStore, json: bool) -> Result<()> {
    let client = AdminClient::from_config(config)?;
    let token = require_token(store)?;

    if json {
        return print_json(&client.list_reward_policies_raw(&token).await?);
    }

    let policies = client.list_reward_policies(&token).await?;
    if policies.is_empty() {
        println!("No reward policies.");
    } else {
        println!("{}", policy_table(&policies));
    }
    Ok(())
}

fn policy_table(policies: &[RewardPolicy]) -> Table {
    let mut table = new_table(&["ID", "Name", "Type", "Scope", "Reward", "Starts"]);
    for policy in policies {
        let reward = format!(
            "{} {}",
            display_or_dash(policy.reward_type.as_deref()),
            display_or_dash(policy.reward_value.as_deref())
        );
        table.add_row(vec![
            policy.id.to_string(),
            policy.display_name(),
            display_or_dash(policy.policy_type.as_deref()),
            policy.scope_summary(),
            reward,
            display_timestamp(policy.start_dt.as_deref()),
        ]);
    }
    table
}
