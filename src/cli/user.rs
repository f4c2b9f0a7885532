//! User CLI commands
//!
//! Profiles stand in for sign-in: commands act on the active profile
//! recorded in settings.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_user_list;
use crate::error::{TallyError, TallyResult};
use crate::services::{NotificationService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user and make it active
    Add {
        /// Email address
        email: String,
        /// Display name shown to other users
        #[arg(short, long)]
        name: Option<String>,
        /// Keep the current user active
        #[arg(long)]
        no_switch: bool,
    },
    /// List registered users
    List,
    /// Make another user active
    Switch {
        /// Email or user ID
        user: String,
    },
    /// Change the active user's display name
    Rename {
        /// New display name
        name: String,
    },
    /// Show the active user
    #[command(alias = "whoami")]
    Show,
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: UserCommands,
) -> TallyResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Add {
            email,
            name,
            no_switch,
        } => {
            let user = service.register(&email, name.as_deref())?;
            println!("Registered {} ({})", user.email, user.id);

            if !no_switch || settings.current_user.is_none() {
                settings.current_user = Some(user.id);
                settings.save(storage.paths())?;
                println!("Active user is now {}", user.name());
            }
        }

        UserCommands::List => {
            let users = service.list()?;
            let current = settings
                .current_user
                .and_then(|id| users.iter().find(|u| u.id == id));
            print!("{}", format_user_list(&users, current));
        }

        UserCommands::Switch { user } => {
            let profile = service
                .find(&user)?
                .ok_or_else(|| TallyError::user_not_found(&user))?;
            settings.current_user = Some(profile.id);
            settings.save(storage.paths())?;
            println!("Active user is now {} <{}>", profile.name(), profile.email);
        }

        UserCommands::Rename { name } => {
            let user = service.current(settings)?;
            let updated = service.rename(&user, &name)?;
            println!("Display name set to '{}'", updated.name());
        }

        UserCommands::Show => {
            let user = service.current(settings)?;
            let unread = NotificationService::new(storage).unread_count(user.id)?;
            println!("User:          {}", user.name());
            println!("Email:         {}", user.email);
            println!("ID:            {}", user.id);
            println!("Tier:          {}", user.subscription.tier);
            println!("Budgets:       {}", user.budgets.len());
            println!("Unread notifications: {}", unread);
        }
    }

    Ok(())
}
