//! Transaction search and the per-profile recent-search lists

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TallyResult;
use crate::models::{AccountType, Money, Transaction, UserId, UserProfile};
use crate::storage::{read_json, write_json_atomic, Storage};

/// Default number of recent searches kept
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Search criteria; every field is optional
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Matched case-insensitively against description, category and notes
    pub term: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
    pub account_type: Option<AccountType>,
    /// Any of these categories (case-insensitive); empty means all
    pub categories: Vec<String>,
    pub is_shared: Option<bool>,
}

impl SearchFilter {
    fn term(&self) -> Option<String> {
        self.term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(term) = self.term() {
            let hit = [txn.description.as_str(), txn.display_category(), txn.notes.as_str()]
                .iter()
                .any(|field| field.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }

        self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
            && self.min_amount.map_or(true, |m| txn.amount >= m)
            && self.max_amount.map_or(true, |m| txn.amount <= m)
            && self.account_type.map_or(true, |a| txn.account_type == a)
            && (self.categories.is_empty()
                || self
                    .categories
                    .iter()
                    .any(|c| txn.display_category().eq_ignore_ascii_case(c.trim())))
            && self.is_shared.map_or(true, |s| txn.is_shared == s)
    }
}

/// Recent terms keyed by full user id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecentSearches {
    #[serde(default)]
    by_user: BTreeMap<String, Vec<String>>,
}

/// Service for searching a user's transactions
pub struct SearchService<'a> {
    storage: &'a Storage,
    recent_limit: usize,
}

impl<'a> SearchService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Matching transactions owned by the user, newest first
    ///
    /// A non-empty term is added to the recent-search list.
    pub fn search(&self, user: &UserProfile, filter: &SearchFilter) -> TallyResult<Vec<Transaction>> {
        let mut results = self.storage.transactions.get_by_user(user.id)?;
        results.retain(|t| filter.matches(t));
        results.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(term) = filter.term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            self.record(user.id, term)?;
        }

        debug!(results = results.len(), "search complete");
        Ok(results)
    }

    /// The user's recent search terms, most recent first
    pub fn recent(&self, user_id: UserId) -> TallyResult<Vec<String>> {
        let mut data = self.load()?;
        Ok(data.by_user.remove(&user_key(user_id)).unwrap_or_default())
    }

    /// Forget the user's recent searches; other profiles keep theirs
    pub fn clear_recent(&self, user_id: UserId) -> TallyResult<()> {
        let mut data = self.load()?;
        data.by_user.remove(&user_key(user_id));
        self.store(&data)
    }

    fn record(&self, user_id: UserId, term: &str) -> TallyResult<()> {
        let mut data = self.load()?;
        let searches = data.by_user.entry(user_key(user_id)).or_default();
        searches.retain(|s| !s.eq_ignore_ascii_case(term));
        searches.insert(0, term.to_string());
        searches.truncate(self.recent_limit);
        self.store(&data)
    }

    fn load(&self) -> TallyResult<RecentSearches> {
        read_json(self.storage.paths().recent_searches_file())
    }

    fn store(&self, data: &RecentSearches) -> TallyResult<()> {
        write_json_atomic(self.storage.paths().recent_searches_file(), data)
    }
}

fn user_key(user_id: UserId) -> String {
    user_id.as_uuid().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::TransactionType;
    use crate::services::UserService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add(storage: &Storage, user: &UserProfile, description: &str, category: &str, cents: i64, day: u32) {
        let mut txn = Transaction::new(
            user.id,
            TransactionType::Expense,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
        );
        txn.description = description.into();
        txn.category = category.into();
        storage.transactions.upsert(txn).unwrap();
    }

    #[test]
    fn test_term_matches_description_category_and_notes() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage).register("mo@example.com", None).unwrap();
        add(&storage, &user, "Farmers market", "Groceries", 2500, 1);
        add(&storage, &user, "Bus pass", "Transport", 6000, 3);
        add(&storage, &user, "Supermarket", "Groceries", 4000, 5);

        let service = SearchService::new(&storage);
        let results = service
            .search(
                &user,
                &SearchFilter {
                    term: Some("GROCER".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].description, "Supermarket");
        assert_eq!(results[1].description, "Farmers market");
    }

    #[test]
    fn test_amount_and_category_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage).register("mo@example.com", None).unwrap();
        add(&storage, &user, "Farmers market", "Groceries", 2500, 1);
        add(&storage, &user, "Bus pass", "Transport", 6000, 3);
        add(&storage, &user, "Gift", "", 1500, 4);

        let service = SearchService::new(&storage);
        let filter = SearchFilter {
            min_amount: Some(Money::from_cents(2000)),
            max_amount: Some(Money::from_cents(5000)),
            ..Default::default()
        };
        assert_eq!(service.search(&user, &filter).unwrap().len(), 1);

        let filter = SearchFilter {
            categories: vec!["uncategorized".into(), "transport".into()],
            ..Default::default()
        };
        assert_eq!(service.search(&user, &filter).unwrap().len(), 2);
    }

    #[test]
    fn test_recent_searches_are_deduplicated_and_capped() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage).register("mo@example.com", None).unwrap();
        let service = SearchService::new(&storage);

        for term in ["a", "b", "c", "d", "e", "f", "B"] {
            service
                .search(
                    &user,
                    &SearchFilter {
                        term: Some(term.into()),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        assert_eq!(service.recent(user.id).unwrap(), vec!["B", "f", "e", "d", "c"]);

        service.clear_recent(user.id).unwrap();
        assert!(service.recent(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_blank_term_not_recorded() {
        let (_temp_dir, storage) = create_test_storage();
        let user = UserService::new(&storage).register("mo@example.com", None).unwrap();
        let service = SearchService::new(&storage);
        service
            .search(
                &user,
                &SearchFilter {
                    term: Some("   ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(service.recent(user.id).unwrap().is_empty());
    }

    #[test]
    fn test_recent_searches_are_kept_per_profile() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let mo = users.register("mo@example.com", None).unwrap();
        let lu = users.register("lu@example.com", None).unwrap();
        let service = SearchService::new(&storage);
        let by_term = |term: &str| SearchFilter {
            term: Some(term.into()),
            ..Default::default()
        };

        service.search(&mo, &by_term("pharmacy")).unwrap();
        service.search(&lu, &by_term("rent")).unwrap();

        assert_eq!(service.recent(mo.id).unwrap(), vec!["pharmacy"]);
        assert_eq!(service.recent(lu.id).unwrap(), vec!["rent"]);

        service.clear_recent(mo.id).unwrap();
        assert!(service.recent(mo.id).unwrap().is_empty());
        assert_eq!(service.recent(lu.id).unwrap(), vec!["rent"]);
    }
}
