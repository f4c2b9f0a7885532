//! Notification display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Notification;

use super::truncate;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "")]
    unread: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Message")]
    message: String,
}

pub fn format_notification_list(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.\n".to_string();
    }
    let rows: Vec<NotificationRow> = notifications
        .iter()
        .map(|n| NotificationRow {
            unread: if n.read { "" } else { "*" },
            id: n.id.to_string(),
            when: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
            kind: n.kind.to_string(),
            title: truncate(&n.title, 28),
            message: truncate(&n.message, 60),
        })
        .collect();
    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push('\n');
    output
}
