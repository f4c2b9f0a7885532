//! Shared-expense settlement
//!
//! The payer of a shared expense is its owner; every entry of `shared_with`
//! is a participant. The amount is split evenly between payer and
//! participants, and each participant settles by marking the expense paid.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Notification, NotificationKind, PaymentStatus, Transaction, UserProfile};
use crate::storage::Storage;

use super::notification::{payment_reminder_message, pending_reminder_message, NotificationService};

/// Which shared expenses to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitView {
    #[default]
    All,
    /// Pending expenses where the user is a participant
    IOwe,
    /// Pending expenses the user paid
    OwedToMe,
    /// Expenses marked paid
    Settled,
}

impl fmt::Display for SplitView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::IOwe => write!(f, "i-owe"),
            Self::OwedToMe => write!(f, "owed-to-me"),
            Self::Settled => write!(f, "settled"),
        }
    }
}

impl FromStr for SplitView {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(Self::All),
            "i-owe" | "owe" => Ok(Self::IOwe),
            "owed-to-me" | "owed" => Ok(Self::OwedToMe),
            "settled" | "paid" => Ok(Self::Settled),
            _ => Err(TallyError::Validation(format!(
                "Unknown view '{}'. Expected one of: all, i-owe, owed-to-me, settled",
                s
            ))),
        }
    }
}

/// Balances across the shared expenses a user can see
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub total_shared: Money,
    pub you_owe: Money,
    pub owed_to_you: Money,
    pub pending_count: usize,
    pub paid_count: usize,
}

/// One party's share of a shared expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyShare {
    pub party: String,
    pub amount: Money,
    pub is_payer: bool,
}

/// Per-party shares, payer first
pub fn share_breakdown(txn: &Transaction, payer_name: &str) -> Vec<PartyShare> {
    let shares = txn.shares();
    let mut parties = Vec::with_capacity(shares.len());
    parties.push(PartyShare {
        party: payer_name.to_string(),
        amount: shares.first().copied().unwrap_or_default(),
        is_payer: true,
    });
    if txn.is_shared {
        for (entry, amount) in txn.shared_with.iter().zip(shares.iter().skip(1)) {
            parties.push(PartyShare {
                party: entry.clone(),
                amount: *amount,
                is_payer: false,
            });
        }
    }
    parties
}

/// Balances for `user` over the given transactions
///
/// Transactions the user is not a party to, or that are not shared, are ignored.
pub fn summarize(user: &UserProfile, transactions: &[Transaction]) -> SplitSummary {
    let mut summary = SplitSummary::default();
    for txn in transactions.iter().filter(|t| t.is_shared) {
        let is_payer = txn.is_payer(user.id);
        let share = txn.share_for(&user.email, user.id);
        if !is_payer && share.is_none() {
            continue;
        }

        summary.total_shared += txn.amount;
        match txn.payment_status {
            PaymentStatus::Pending => {
                summary.pending_count += 1;
                if is_payer {
                    summary.owed_to_you += txn.owed_to_payer();
                } else if let Some(share) = share {
                    summary.you_owe += share;
                }
            }
            PaymentStatus::Paid => summary.paid_count += 1,
            PaymentStatus::Completed => {}
        }
    }
    summary
}

fn in_view(user: &UserProfile, txn: &Transaction, view: SplitView) -> bool {
    let is_payer = txn.is_payer(user.id);
    match view {
        SplitView::All => true,
        SplitView::IOwe => !is_payer && txn.is_pending(),
        SplitView::OwedToMe => is_payer && txn.is_pending(),
        SplitView::Settled => txn.payment_status == PaymentStatus::Paid,
    }
}

fn title_of(txn: &Transaction) -> &str {
    if txn.description.is_empty() {
        txn.display_category()
    } else {
        &txn.description
    }
}

/// Service for shared-expense settlement
pub struct SplitService<'a> {
    storage: &'a Storage,
}

impl<'a> SplitService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Shared expenses the user paid or participates in, newest first
    pub fn visible(&self, user: &UserProfile) -> TallyResult<Vec<Transaction>> {
        let mut shared = self.storage.transactions.get_shared()?;
        shared.retain(|t| t.is_payer(user.id) || t.participant_index(&user.email, user.id).is_some());
        Ok(shared)
    }

    pub fn list(&self, user: &UserProfile, view: SplitView) -> TallyResult<Vec<Transaction>> {
        let mut shared = self.visible(user)?;
        shared.retain(|t| in_view(user, t, view));
        Ok(shared)
    }

    pub fn summary(&self, user: &UserProfile) -> TallyResult<SplitSummary> {
        Ok(summarize(user, &self.visible(user)?))
    }

    /// Display name of a transaction's payer
    pub fn payer_name(&self, txn: &Transaction) -> TallyResult<String> {
        Ok(self
            .storage
            .users
            .get(txn.user_id)?
            .map(|u| u.name().to_string())
            .unwrap_or_else(|| txn.user_id.to_string()))
    }

    /// Settle the user's part of a pending shared expense
    pub fn mark_paid(&self, user: &UserProfile, identifier: &str) -> TallyResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;

        if !txn.is_shared {
            return Err(TallyError::Settlement(format!(
                "Transaction {} is not a shared expense",
                txn.id
            )));
        }
        if txn.is_payer(user.id) {
            return Err(TallyError::Settlement(
                "The payer cannot mark their own expense as paid".into(),
            ));
        }
        if txn.participant_index(&user.email, user.id).is_none() {
            return Err(TallyError::Permission(format!(
                "Transaction {} is not shared with you",
                txn.id
            )));
        }
        if !txn.is_pending() {
            return Err(TallyError::Settlement(format!(
                "Only pending expenses can be marked paid (status is {})",
                txn.payment_status
            )));
        }

        let before = txn.clone();
        let now = Utc::now();
        txn.payment_status = PaymentStatus::Paid;
        txn.paid_at = Some(now);
        txn.updated_at = now;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(title_of(&txn).to_string()),
            &before,
            &txn,
            Some(format!("payment_status: pending -> paid by {}", user.email)),
        )?;

        info!(id = %txn.id, by = %user.email, "shared expense marked paid");
        Ok(txn)
    }

    /// Remind the participants of a pending expense the user paid
    ///
    /// Returns how many participants were notified; participants without a
    /// local profile cannot receive notifications and are skipped.
    pub fn send_reminder(
        &self,
        user: &UserProfile,
        identifier: &str,
        message: Option<&str>,
    ) -> TallyResult<usize> {
        let mut txn = self
            .storage
            .transactions
            .find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;

        if !txn.is_payer(user.id) {
            return Err(TallyError::Permission(
                "Only the payer can send reminders".into(),
            ));
        }
        if !txn.is_shared || !txn.is_pending() {
            return Err(TallyError::Settlement(format!(
                "Reminders can only be sent for pending shared expenses (status is {})",
                txn.payment_status
            )));
        }

        let notifications = NotificationService::new(self.storage);
        let shares = txn.shares();
        let mut notified = 0;
        for (index, entry) in txn.shared_with.iter().enumerate() {
            let Some(profile) = self.storage.users.resolve(entry)? else {
                continue;
            };
            let text = match message.map(str::trim).filter(|m| !m.is_empty()) {
                Some(custom) => custom.to_string(),
                None => payment_reminder_message(
                    shares.get(index + 1).copied().unwrap_or_default(),
                    title_of(&txn),
                    user.name(),
                ),
            };
            match notifications.notify(profile.id, NotificationKind::Shared, "Payment Reminder", text) {
                Ok(_) => notified += 1,
                Err(e) => warn!(participant = %entry, error = %e, "failed to send reminder"),
            }
        }

        let before = txn.clone();
        let now = Utc::now();
        txn.last_reminder_sent = Some(now);
        txn.updated_at = now;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;
        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(title_of(&txn).to_string()),
            &before,
            &txn,
            Some(format!("reminder sent to {} participant(s)", notified)),
        )?;

        Ok(notified)
    }

    /// Notify the user about the pending expenses they still owe on
    pub fn remind_pending(&self, user: &UserProfile) -> TallyResult<Option<Notification>> {
        let count = self.list(user, SplitView::IOwe)?.len();
        if count == 0 {
            return Ok(None);
        }

        let notification = NotificationService::new(self.storage).notify(
            user.id,
            NotificationKind::Shared,
            "Pending Shared Expenses",
            pending_reminder_message(count),
        )?;
        Ok(Some(notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use crate::models::{TransactionType, UserId};
    use crate::services::{CreateTransactionInput, TransactionService, UserService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn shared_expense(storage: &Storage, payer: &UserProfile, cents: i64, with: &[&str]) -> Transaction {
        TransactionService::new(storage)
            .create(
                payer,
                CreateTransactionInput {
                    transaction_type: TransactionType::Expense,
                    amount: Money::from_cents(cents),
                    date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                    description: Some("Cabin".into()),
                    shared_with: with.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn test_shares_sum_to_amount() {
        let mut txn = Transaction::new(
            UserId::new(),
            TransactionType::Expense,
            Money::from_cents(1000),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        txn.is_shared = true;
        txn.shared_with = vec!["a@x.io".into(), "b@x.io".into()];

        let breakdown = share_breakdown(&txn, "Payer");
        let amounts: Vec<i64> = breakdown.iter().map(|p| p.amount.cents()).collect();
        assert_eq!(amounts, vec![334, 333, 333]);
        assert!(breakdown[0].is_payer);
        assert_eq!(breakdown.iter().map(|p| p.amount).sum::<Money>(), txn.amount);
    }

    #[test]
    fn test_summary_counts_only_pending_balances() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("ana@example.com", Some("Ana")).unwrap();
        let ben = users.register("ben@example.com", Some("Ben")).unwrap();
        let service = SplitService::new(&storage);

        // Ana paid 90.00 split three ways
        let cabin = shared_expense(&storage, &ana, 9000, &["ben@example.com", "cy@example.com"]);
        // Ben paid 20.00 split with Ana
        shared_expense(&storage, &ben, 2000, &["ana@example.com"]);

        let summary = service.summary(&ana).unwrap();
        assert_eq!(summary.total_shared.cents(), 11000);
        assert_eq!(summary.owed_to_you.cents(), 6000);
        assert_eq!(summary.you_owe.cents(), 1000);
        assert_eq!(summary.pending_count, 2);

        service.mark_paid(&ben, &cabin.id.to_string()).unwrap();
        let summary = service.summary(&ana).unwrap();
        assert_eq!(summary.owed_to_you.cents(), 0);
        assert_eq!(summary.paid_count, 1);
        assert_eq!(summary.pending_count, 1);

        assert_eq!(service.list(&ana, SplitView::IOwe).unwrap().len(), 1);
        assert_eq!(service.list(&ana, SplitView::OwedToMe).unwrap().len(), 0);
        assert_eq!(service.list(&ana, SplitView::Settled).unwrap().len(), 1);
        assert_eq!(service.list(&ana, SplitView::All).unwrap().len(), 2);
    }

    #[test]
    fn test_mark_paid_rules() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("ana@example.com", None).unwrap();
        let ben = users.register("ben@example.com", None).unwrap();
        let eve = users.register("eve@example.com", None).unwrap();
        let service = SplitService::new(&storage);

        let txn = shared_expense(&storage, &ana, 5000, &["ben@example.com"]);
        let id = txn.id.to_string();

        assert!(matches!(
            service.mark_paid(&ana, &id),
            Err(TallyError::Settlement(_))
        ));
        assert!(matches!(
            service.mark_paid(&eve, &id),
            Err(TallyError::Permission(_))
        ));

        let paid = service.mark_paid(&ben, &id).unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert!(paid.paid_at.is_some());

        // Paid is final
        assert!(matches!(
            service.mark_paid(&ben, &id),
            Err(TallyError::Settlement(_))
        ));
    }

    #[test]
    fn test_send_reminder_notifies_known_participants() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("ana@example.com", Some("Ana")).unwrap();
        let ben = users.register("ben@example.com", None).unwrap();
        let service = SplitService::new(&storage);

        let txn = shared_expense(&storage, &ana, 3000, &["ben@example.com", "stranger@example.com"]);
        let id = txn.id.to_string();

        assert!(matches!(
            service.send_reminder(&ben, &id, None),
            Err(TallyError::Permission(_))
        ));

        assert_eq!(service.send_reminder(&ana, &id, None).unwrap(), 1);
        let inbox = storage.notifications.get_by_user(ben.id).unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].title, "Payment Reminder");
        assert_eq!(
            inbox[0].message,
            "Reminder: You owe $15.00 for \"Cabin\" to Ana."
        );

        let stored = storage.transactions.get(txn.id).unwrap().unwrap();
        assert!(stored.last_reminder_sent.is_some());

        service.mark_paid(&ben, &id).unwrap();
        assert!(matches!(
            service.send_reminder(&ana, &id, Some("pay up")),
            Err(TallyError::Settlement(_))
        ));
    }

    #[test]
    fn test_remind_pending() {
        let (_temp_dir, storage) = create_test_storage();
        let users = UserService::new(&storage);
        let ana = users.register("ana@example.com", None).unwrap();
        let ben = users.register("ben@example.com", None).unwrap();
        let service = SplitService::new(&storage);

        assert!(service.remind_pending(&ben).unwrap().is_none());

        shared_expense(&storage, &ana, 1000, &["ben@example.com"]);
        shared_expense(&storage, &ana, 2000, &["ben@example.com"]);
        let notification = service.remind_pending(&ben).unwrap().unwrap();
        assert_eq!(
            notification.message,
            "You have 2 pending shared expenses to review."
        );
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("owed-to-me".parse::<SplitView>().unwrap(), SplitView::OwedToMe);
        assert_eq!("I_OWE".parse::<SplitView>().unwrap(), SplitView::IOwe);
        assert!("nope".parse::<SplitView>().is_err());
    }
}
