//! Subscription service
//!
//! Tier changes and feature lookups. Nothing in the crate refuses a command
//! because of the tier; callers may consult `has_feature` for display.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::error::TallyResult;
use crate::models::{Feature, Subscription, SubscriptionTier, UserProfile};
use crate::storage::Storage;

use super::UserService;

/// Length of a paid subscription term
pub const SUBSCRIPTION_TERM_DAYS: i64 = 30;

/// Tier in force at `now`; a lapsed paid tier falls back to free
pub fn effective_tier(subscription: &Subscription, now: DateTime<Utc>) -> SubscriptionTier {
    match subscription.expires_at {
        Some(expires) if expires <= now => SubscriptionTier::Free,
        _ => subscription.tier,
    }
}

pub struct SubscriptionService<'a> {
    storage: &'a Storage,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn has_feature(&self, user: &UserProfile, feature: Feature) -> bool {
        effective_tier(&user.subscription, Utc::now()).has_feature(feature)
    }

    /// Move the user to another tier
    ///
    /// Paid tiers run for a fixed term from now; the free tier never expires.
    pub fn change_tier(&self, user: &UserProfile, tier: SubscriptionTier) -> TallyResult<UserProfile> {
        let mut updated = user.clone();
        updated.subscription = Subscription {
            tier,
            expires_at: tier
                .is_paid()
                .then(|| Utc::now() + Duration::days(SUBSCRIPTION_TERM_DAYS)),
        };

        let saved = UserService::new(self.storage).save_profile(user, updated)?;
        info!(user = %saved.id, %tier, "subscription changed");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use tempfile::TempDir;

    #[test]
    fn test_upgrade_sets_expiry() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();

        let user = UserService::new(&storage)
            .register("lee@example.com", None)
            .unwrap();
        let service = SubscriptionService::new(&storage);
        assert!(!service.has_feature(&user, Feature::AdvancedReports));

        let upgraded = service.change_tier(&user, SubscriptionTier::Premium).unwrap();
        assert_eq!(upgraded.subscription.tier, SubscriptionTier::Premium);
        let expires = upgraded.subscription.expires_at.unwrap();
        let days = (expires - Utc::now()).num_days();
        assert!((29..=30).contains(&days));
        assert!(service.has_feature(&upgraded, Feature::AdvancedReports));

        let downgraded = service.change_tier(&upgraded, SubscriptionTier::Free).unwrap();
        assert!(downgraded.subscription.expires_at.is_none());
    }

    #[test]
    fn test_lapsed_subscription_is_free() {
        let subscription = Subscription {
            tier: SubscriptionTier::Business,
            expires_at: Some(Utc::now() - Duration::days(1)),
        };
        assert_eq!(effective_tier(&subscription, Utc::now()), SubscriptionTier::Free);
    }
}
