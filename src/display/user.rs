//! User, subscription and budget display formatting

use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Feature, UserProfile};
use crate::services::{effective_tier, BudgetStatus};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "")]
    current: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tier")]
    tier: String,
}

/// Format the registered users, marking the active one
pub fn format_user_list(users: &[UserProfile], current: Option<&UserProfile>) -> String {
    if users.is_empty() {
        return "No users registered. Add one with 'tally user add <email>'.\n".to_string();
    }
    let now = Utc::now();
    let rows: Vec<UserRow> = users
        .iter()
        .map(|u| UserRow {
            current: if current.map(|c| c.id) == Some(u.id) { "*" } else { "" },
            id: u.id.to_string(),
            email: u.email.clone(),
            name: u.display_name.clone(),
            tier: effective_tier(&u.subscription, now).to_string(),
        })
        .collect();
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// Format a user's subscription and the features it unlocks
pub fn format_subscription(user: &UserProfile, now: DateTime<Utc>) -> String {
    let tier = effective_tier(&user.subscription, now);
    let mut output = String::new();
    output.push_str(&format!("User:     {} <{}>\n", user.name(), user.email));
    output.push_str(&format!("Tier:     {}\n", tier));
    match user.subscription.expires_at {
        Some(expires) if expires <= now => output.push_str(&format!(
            "Expired:  {} (was {})\n",
            expires.format("%Y-%m-%d"),
            user.subscription.tier
        )),
        Some(expires) => {
            output.push_str(&format!("Renews:   {}\n", expires.format("%Y-%m-%d")))
        }
        None => {}
    }

    output.push_str("\nFeatures\n");
    for feature in Feature::all() {
        let mark = if tier.has_feature(*feature) { "x" } else { " " };
        output.push_str(&format!("  [{}] {}\n", mark, feature));
    }
    output
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

pub fn format_budget_status(statuses: &[BudgetStatus]) -> String {
    if statuses.is_empty() {
        return "No budgets set. Use 'tally budget set <category> <amount>'.\n".to_string();
    }
    let rows: Vec<BudgetRow> = statuses
        .iter()
        .map(|s| BudgetRow {
            category: s.category.clone(),
            limit: s.limit.to_string(),
            spent: s.spent.to_string(),
            remaining: s.remaining().to_string(),
            used: if s.is_over() {
                format!("{:.0}% OVER", s.percent)
            } else {
                format!("{:.0}%", s.percent)
            },
        })
        .collect();
    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}
