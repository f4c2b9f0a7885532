//! Category budgets and budget alerts
//!
//! A profile may set a monthly spending limit per category. After an expense
//! is recorded, the owner's spend in that category for the expense's month
//! is compared against the limit and at most one warning and one limit alert
//! are raised per category per month.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{TallyError, TallyResult};
use crate::models::{
    CategoryBudget, Money, Notification, NotificationKind, SummaryPeriod, UserId, UserProfile,
};
use crate::storage::Storage;

use super::notification::{budget_limit_message, budget_warning_message, NotificationService};
use super::UserService;

/// Spend at or above this share of the limit raises a warning
pub const WARNING_THRESHOLD_PERCENT: f64 = 80.0;

/// Spend against one category budget in a month
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: Money,
    pub spent: Money,
    pub percent: f64,
}

impl BudgetStatus {
    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn is_over(&self) -> bool {
        self.spent >= self.limit
    }
}

pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set (or replace) the monthly limit of a category
    pub fn set_limit(&self, user: &UserProfile, category: &str, limit: Money) -> TallyResult<UserProfile> {
        let category = category.trim();
        if category.is_empty() {
            return Err(TallyError::Validation("Category must not be empty".into()));
        }
        if !limit.is_positive() {
            return Err(TallyError::Validation(
                "Budget limit must be greater than zero".into(),
            ));
        }

        let mut updated = user.clone();
        let key = existing_key(user, category).unwrap_or_else(|| category.to_string());
        updated.budgets.insert(key, CategoryBudget::new(limit));
        UserService::new(self.storage).save_profile(user, updated)
    }

    pub fn remove_limit(&self, user: &UserProfile, category: &str) -> TallyResult<UserProfile> {
        let key = existing_key(user, category).ok_or_else(|| TallyError::NotFound {
            entity_type: "Budget",
            identifier: category.to_string(),
        })?;

        let mut updated = user.clone();
        updated.budgets.remove(&key);
        UserService::new(self.storage).save_profile(user, updated)
    }

    /// Spend against every budget of the user for the month containing `date`
    pub fn status(&self, user: &UserProfile, date: NaiveDate) -> TallyResult<Vec<BudgetStatus>> {
        let mut statuses = Vec::new();
        for (category, budget) in &user.budgets {
            let spent = self.spent_in_month(user.id, category, date)?;
            statuses.push(BudgetStatus {
                category: category.clone(),
                limit: budget.limit,
                spent,
                percent: spent.percent_of(budget.limit),
            });
        }
        Ok(statuses)
    }

    /// Raise budget alerts for the owner of an expense in `category` on `date`
    pub fn check_alerts(
        &self,
        user_id: UserId,
        category: &str,
        date: NaiveDate,
    ) -> TallyResult<Vec<Notification>> {
        let Some(user) = self.storage.users.get(user_id)? else {
            return Ok(Vec::new());
        };
        let Some(key) = existing_key(&user, category) else {
            return Ok(Vec::new());
        };

        let budget = &user.budgets[&key];
        let spent = self.spent_in_month(user_id, &key, date)?;
        let percent = spent.percent_of(budget.limit);
        let month = format!("{:04}-{:02}", date.year(), date.month());
        debug!(category = %key, %spent, percent, "checking budget");

        let notifications = NotificationService::new(self.storage);
        let mut updated = user.clone();
        let mut raised = Vec::new();

        if percent >= 100.0 {
            if !budget.limits_sent.contains(&month) {
                raised.push(notifications.notify(
                    user_id,
                    NotificationKind::Budget,
                    "Budget Limit Reached",
                    budget_limit_message(&key),
                )?);
                if let Some(b) = updated.budgets.get_mut(&key) {
                    b.limits_sent.insert(month);
                }
            }
        } else if percent >= WARNING_THRESHOLD_PERCENT
            && !budget.warnings_sent.contains(&month)
        {
            raised.push(notifications.notify(
                user_id,
                NotificationKind::Budget,
                "Budget Warning",
                budget_warning_message(&key, percent),
            )?);
            if let Some(b) = updated.budgets.get_mut(&key) {
                b.warnings_sent.insert(month);
            }
        }

        if !raised.is_empty() {
            UserService::new(self.storage).save_profile(&user, updated)?;
        }
        Ok(raised)
    }

    fn spent_in_month(&self, user_id: UserId, category: &str, date: NaiveDate) -> TallyResult<Money> {
        let month = SummaryPeriod::month_containing(date);
        Ok(self
            .storage
            .transactions
            .get_by_user(user_id)?
            .iter()
            .filter(|t| {
                t.is_expense()
                    && month.contains(t.date)
                    && t.display_category().eq_ignore_ascii_case(category)
            })
            .map(|t| t.amount)
            .sum())
    }
}

/// Budget key matching `category` case-insensitively
fn existing_key(user: &UserProfile, category: &str) -> Option<String> {
    let category = category.trim();
    user.budgets
        .keys()
        .find(|k| k.eq_ignore_ascii_case(category))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{Transaction, TransactionType};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn record_expense(storage: &Storage, user: UserId, cents: i64, day: u32) {
        record_expense_in(storage, user, cents, 4, day);
    }

    fn record_expense_in(storage: &Storage, user: UserId, cents: i64, month: u32, day: u32) {
        let mut txn = Transaction::new(
            user,
            TransactionType::Expense,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
        );
        txn.category = "Dining".into();
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_warning_then_limit_once_per_month() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage)
            .register("ola@example.com", None)
            .unwrap();
        let service = BudgetService::new(&storage);
        service
            .set_limit(&user, "Dining", Money::from_cents(10000))
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();

        record_expense(&storage, user.id, 5000, 1);
        assert!(service.check_alerts(user.id, "dining", day).unwrap().is_empty());

        record_expense(&storage, user.id, 3500, 2);
        let alerts = service.check_alerts(user.id, "Dining", day).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Budget Warning");
        assert_eq!(alerts[0].message, "You've used 85% of your Dining budget.");

        // Still in warning range: no repeat
        record_expense(&storage, user.id, 500, 3);
        assert!(service.check_alerts(user.id, "Dining", day).unwrap().is_empty());

        record_expense(&storage, user.id, 1000, 4);
        let alerts = service.check_alerts(user.id, "Dining", day).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Budget Limit Reached");

        record_expense(&storage, user.id, 1000, 5);
        assert!(service.check_alerts(user.id, "Dining", day).unwrap().is_empty());
    }

    #[test]
    fn test_backdated_expense_keeps_later_month_marked() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage)
            .register("ola@example.com", None)
            .unwrap();
        let service = BudgetService::new(&storage);
        service
            .set_limit(&user, "Dining", Money::from_cents(10000))
            .unwrap();
        let april = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        let march = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        record_expense_in(&storage, user.id, 10000, 4, 10);
        assert_eq!(service.check_alerts(user.id, "Dining", april).unwrap().len(), 1);

        record_expense_in(&storage, user.id, 10000, 3, 10);
        assert_eq!(service.check_alerts(user.id, "Dining", march).unwrap().len(), 1);

        record_expense_in(&storage, user.id, 10000, 4, 11);
        assert!(service.check_alerts(user.id, "Dining", april).unwrap().is_empty());

        let profile = storage.users.get(user.id).unwrap().unwrap();
        let budget = &profile.budgets["Dining"];
        assert!(budget.limits_sent.contains("2025-03"));
        assert!(budget.limits_sent.contains("2025-04"));
    }

    #[test]
    fn test_no_budget_no_alert() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage)
            .register("ola@example.com", None)
            .unwrap();
        record_expense(&storage, user.id, 50000, 1);
        let day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert!(BudgetService::new(&storage)
            .check_alerts(user.id, "Dining", day)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_status_and_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage)
            .register("ola@example.com", None)
            .unwrap();
        let service = BudgetService::new(&storage);

        assert!(service.set_limit(&user, "Dining", Money::zero()).is_err());
        let user = service
            .set_limit(&user, "Dining", Money::from_cents(20000))
            .unwrap();
        record_expense(&storage, user.id, 5000, 10);

        let status = service
            .status(&user, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap())
            .unwrap();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].spent.cents(), 5000);
        assert_eq!(status[0].remaining().cents(), 15000);
        assert!((status[0].percent - 25.0).abs() < 1e-9);

        let user = service.remove_limit(&user, "dining").unwrap();
        assert!(user.budgets.is_empty());
    }
}
