//! Notification CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_notification_list;
use crate::error::TallyResult;
use crate::services::{NotificationService, UserService};
use crate::storage::Storage;

/// Notification subcommands
#[derive(Subcommand)]
pub enum NotifyCommands {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },
    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },
    /// Mark every notification as read
    ReadAll,
}

/// Handle a notification command
pub fn handle_notify_command(
    storage: &Storage,
    settings: &Settings,
    cmd: NotifyCommands,
) -> TallyResult<()> {
    let user = UserService::new(storage).current(settings)?;
    let service = NotificationService::new(storage);

    match cmd {
        NotifyCommands::List { unread } => {
            let notifications = service.list(user.id, unread)?;
            print!("{}", format_notification_list(&notifications));
            println!("{} unread", service.unread_count(user.id)?);
        }

        NotifyCommands::Read { id } => {
            let notification = service.mark_read(user.id, &id)?;
            println!("{}: {}", notification.title, notification.message);
        }

        NotifyCommands::ReadAll => {
            let count = service.mark_all_read(user.id)?;
            println!("Marked {} notification(s) as read.", count);
        }
    }

    Ok(())
}
