//! Subscription CLI commands

use chrono::Utc;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_subscription;
use crate::error::TallyResult;
use crate::models::{Feature, SubscriptionTier};
use crate::services::{SubscriptionService, UserService};
use crate::storage::Storage;

use super::parse_kind;

/// Subscription subcommands
#[derive(Subcommand)]
pub enum SubscriptionCommands {
    /// Show the current tier and its features
    Show,
    /// Upgrade or downgrade (free, premium, business)
    Change {
        /// Target tier
        tier: String,
    },
    /// Check whether the current tier includes a feature
    Check {
        /// Feature key, e.g. budget_alerts
        feature: String,
    },
    /// List the features of every tier
    Tiers,
}

/// Handle a subscription command
pub fn handle_subscription_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SubscriptionCommands,
) -> TallyResult<()> {
    let service = SubscriptionService::new(storage);

    match cmd {
        SubscriptionCommands::Show => {
            let user = UserService::new(storage).current(settings)?;
            print!("{}", format_subscription(&user, Utc::now()));
        }

        SubscriptionCommands::Change { tier } => {
            let user = UserService::new(storage).current(settings)?;
            let tier: SubscriptionTier = parse_kind(&tier)?;
            let updated = service.change_tier(&user, tier)?;
            match updated.subscription.expires_at {
                Some(expires) => println!(
                    "Subscription changed to {} (renews {})",
                    tier,
                    expires.format("%Y-%m-%d")
                ),
                None => println!("Subscription changed to {}", tier),
            }
        }

        SubscriptionCommands::Check { feature } => {
            let user = UserService::new(storage).current(settings)?;
            let feature: Feature = parse_kind(&feature)?;
            if service.has_feature(&user, feature) {
                println!("{} is included in your plan.", feature);
            } else {
                println!("{} is not included in your plan.", feature);
            }
        }

        SubscriptionCommands::Tiers => {
            for tier in SubscriptionTier::all() {
                let features: Vec<String> =
                    tier.features().iter().map(|f| f.to_string()).collect();
                println!("{:<10} {}", tier.to_string(), features.join(", "));
            }
        }
    }

    Ok(())
}
