//! User profile and subscription model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use super::ids::UserId;
use super::money::Money;
use super::transaction::ParseKindError;

/// Subscription level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Business,
}

impl SubscriptionTier {
    pub fn all() -> &'static [SubscriptionTier] {
        &[Self::Free, Self::Premium, Self::Business]
    }

    /// Features unlocked at this tier, including those of lower tiers
    pub fn features(&self) -> Vec<Feature> {
        let mut features: Vec<Feature> = Vec::new();
        for tier in Self::all().iter().filter(|t| *t <= self) {
            features.extend_from_slice(tier.own_features());
        }
        features
    }

    /// Features introduced by this tier
    fn own_features(&self) -> &'static [Feature] {
        match self {
            Self::Free => &[
                Feature::BasicTracking,
                Feature::ReportsBasic,
                Feature::SharedExpenses,
                Feature::ReceiptUploadBasic,
            ],
            Self::Premium => &[
                Feature::AiReceiptScanning,
                Feature::AdvancedReports,
                Feature::RecurringTransactions,
                Feature::BudgetAlerts,
                Feature::ExportOptions,
            ],
            Self::Business => &[
                Feature::BusinessCategories,
                Feature::TaxReports,
                Feature::MultiUserAccess,
                Feature::InvoiceTracking,
            ],
        }
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features().contains(&feature)
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Self::Free)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Premium => write!(f, "premium"),
            Self::Business => write!(f, "business"),
        }
    }
}

impl FromStr for SubscriptionTier {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            "business" => Ok(Self::Business),
            _ => Err(ParseKindError::new(
                "subscription tier",
                s,
                "free, premium, business",
            )),
        }
    }
}

/// A capability gated by subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    BasicTracking,
    ReportsBasic,
    SharedExpenses,
    ReceiptUploadBasic,
    AiReceiptScanning,
    AdvancedReports,
    RecurringTransactions,
    BudgetAlerts,
    ExportOptions,
    BusinessCategories,
    TaxReports,
    MultiUserAccess,
    InvoiceTracking,
}

impl Feature {
    pub fn all() -> &'static [Feature] {
        &[
            Self::BasicTracking,
            Self::ReportsBasic,
            Self::SharedExpenses,
            Self::ReceiptUploadBasic,
            Self::AiReceiptScanning,
            Self::AdvancedReports,
            Self::RecurringTransactions,
            Self::BudgetAlerts,
            Self::ExportOptions,
            Self::BusinessCategories,
            Self::TaxReports,
            Self::MultiUserAccess,
            Self::InvoiceTracking,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::BasicTracking => "basic_tracking",
            Self::ReportsBasic => "reports_basic",
            Self::SharedExpenses => "shared_expenses",
            Self::ReceiptUploadBasic => "receipt_upload_basic",
            Self::AiReceiptScanning => "ai_receipt_scanning",
            Self::AdvancedReports => "advanced_reports",
            Self::RecurringTransactions => "recurring_transactions",
            Self::BudgetAlerts => "budget_alerts",
            Self::ExportOptions => "export_options",
            Self::BusinessCategories => "business_categories",
            Self::TaxReports => "tax_reports",
            Self::MultiUserAccess => "multi_user_access",
            Self::InvoiceTracking => "invoice_tracking",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Feature {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| ParseKindError::new("feature", s, "see 'tally subscription show'"))
    }
}

/// Current subscription of a profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub tier: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Monthly spending limit for one category, with alert bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub limit: Money,
    /// Month keys ("2025-01") in which the warning alert was raised
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub warnings_sent: BTreeSet<String>,
    /// Month keys in which the limit alert was raised
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub limits_sent: BTreeSet<String>,
}

impl CategoryBudget {
    pub fn new(limit: Money) -> Self {
        Self {
            limit,
            warnings_sent: BTreeSet::new(),
            limits_sent: BTreeSet::new(),
        }
    }
}

/// A locally registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub subscription: Subscription,
    /// Category name -> monthly budget
    #[serde(default)]
    pub budgets: BTreeMap<String, CategoryBudget>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into().trim().to_string(),
            display_name: display_name.into().trim().to_string(),
            subscription: Subscription::default(),
            budgets: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Name shown to other users
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }

    /// Check whether a participant entry refers to this user
    pub fn matches(&self, entry: &str) -> bool {
        let entry = entry.trim();
        entry.eq_ignore_ascii_case(&self.email)
            || entry
                .parse::<UserId>()
                .map(|id| id == self.id)
                .unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), String> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(format!("Invalid email address: '{}'", self.email)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_features_are_cumulative() {
        let free = SubscriptionTier::Free.features();
        let premium = SubscriptionTier::Premium.features();
        let business = SubscriptionTier::Business.features();

        assert_eq!(free.len(), 4);
        assert_eq!(premium.len(), 9);
        assert_eq!(business.len(), 13);
        assert!(free.iter().all(|f| premium.contains(f)));
        assert!(premium.iter().all(|f| business.contains(f)));
    }

    #[test]
    fn test_has_feature() {
        assert!(SubscriptionTier::Free.has_feature(Feature::SharedExpenses));
        assert!(!SubscriptionTier::Free.has_feature(Feature::BudgetAlerts));
        assert!(SubscriptionTier::Premium.has_feature(Feature::BudgetAlerts));
        assert!(!SubscriptionTier::Premium.has_feature(Feature::TaxReports));
        assert!(SubscriptionTier::Business.has_feature(Feature::TaxReports));
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!("budget-alerts".parse::<Feature>(), Ok(Feature::BudgetAlerts));
        assert_eq!(
            "ai_receipt_scanning".parse::<Feature>(),
            Ok(Feature::AiReceiptScanning)
        );
        assert!("teleport".parse::<Feature>().is_err());
    }

    #[test]
    fn test_profile_matches() {
        let user = UserProfile::new("Ana@Example.com", "Ana");
        assert!(user.matches("ana@example.com"));
        assert!(user.matches(&user.id.as_uuid().to_string()));
        assert!(!user.matches("bob@example.com"));
    }

    #[test]
    fn test_profile_validate() {
        assert!(UserProfile::new("ana@example.com", "").validate().is_ok());
        assert!(UserProfile::new("not-an-email", "").validate().is_err());
        assert_eq!(UserProfile::new("ana@example.com", "").name(), "ana@example.com");
    }
}
