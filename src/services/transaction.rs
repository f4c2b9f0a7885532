//! Transaction service
//!
//! Provides business logic for transaction management: creation from form
//! input, edits and deletion by the owner, filtered listing, and the side
//! effects that follow an expense (budget alerts).

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    AccountType, Money, PaymentStatus, Transaction, TransactionType, TransactionValidationError,
    UserProfile,
};
use crate::storage::{ObjectFolder, Storage};

use super::budget::BudgetService;
use super::categorize::suggest_category;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    /// Case-insensitive category name ("Uncategorized" matches empty)
    pub category: Option<String>,
    pub account_type: Option<AccountType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub shared: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = Some(shared);
        self
    }

    pub fn payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.transaction_type
            .map_or(true, |t| txn.transaction_type == t)
            && self
                .category
                .as_deref()
                .map_or(true, |c| txn.display_category().eq_ignore_ascii_case(c.trim()))
            && self.account_type.map_or(true, |a| txn.account_type == a)
            && self.start_date.map_or(true, |d| txn.date >= d)
            && self.end_date.map_or(true, |d| txn.date <= d)
            && self.shared.map_or(true, |s| txn.is_shared == s)
            && self.payment_status.map_or(true, |s| txn.payment_status == s)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone, Default)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub account_type: Option<AccountType>,
    /// Participants; non-empty makes the transaction shared
    pub shared_with: Vec<String>,
    pub payment_status: Option<PaymentStatus>,
    /// Audio file to attach as a voice note
    pub voice_note: Option<PathBuf>,
    /// Fill an empty category from the description keywords
    pub auto_categorize: bool,
}

/// Changes to apply to an existing transaction; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub account_type: Option<AccountType>,
    /// Replace the participant list; an empty list makes the transaction unshared
    pub shared_with: Option<Vec<String>>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.transaction_type.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.notes.is_none()
            && self.account_type.is_none()
            && self.shared_with.is_none()
    }
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new transaction owned by `owner`
    pub fn create(&self, owner: &UserProfile, input: CreateTransactionInput) -> TallyResult<Transaction> {
        let mut txn = Transaction::new(owner.id, input.transaction_type, input.amount, input.date);

        txn.description = input.description.unwrap_or_default().trim().to_string();
        txn.notes = input.notes.unwrap_or_default().trim().to_string();
        txn.category = input.category.unwrap_or_default().trim().to_string();
        if txn.category.is_empty() && input.auto_categorize && !txn.description.is_empty() {
            txn.category = suggest_category(&txn.description).to_string();
        }
        if let Some(account_type) = input.account_type {
            txn.account_type = account_type;
        }

        txn.shared_with = self.normalize_participants(owner, &input.shared_with)?;
        txn.is_shared = !txn.shared_with.is_empty();
        txn.payment_status = match input.payment_status {
            Some(status) => status,
            None if txn.is_shared => PaymentStatus::Pending,
            None => PaymentStatus::Completed,
        };

        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        if let Some(path) = &input.voice_note {
            txn.voice_note = Some(
                self.storage
                    .objects
                    .put(ObjectFolder::VoiceNotes, owner.id, path)?,
            );
        }

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_name(&txn)),
            &txn,
        )?;

        info!(id = %txn.id, kind = %txn.transaction_type, amount = %txn.amount, "created transaction");
        self.after_expense(&txn);
        Ok(txn)
    }

    /// Get a transaction by full id or short form
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Transaction>> {
        self.storage.transactions.find(identifier)
    }

    /// A transaction the user owns
    pub fn get_owned(&self, user: &UserProfile, identifier: &str) -> TallyResult<Transaction> {
        let txn = self
            .find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;
        if !txn.is_payer(user.id) {
            return Err(TallyError::Permission(format!(
                "Transaction {} belongs to another user",
                txn.id
            )));
        }
        Ok(txn)
    }

    /// A transaction the user owns or participates in
    pub fn get_visible(&self, user: &UserProfile, identifier: &str) -> TallyResult<Transaction> {
        let txn = self
            .find(identifier)?
            .ok_or_else(|| TallyError::transaction_not_found(identifier))?;
        if txn.is_payer(user.id)
            || (txn.is_shared && txn.participant_index(&user.email, user.id).is_some())
        {
            Ok(txn)
        } else {
            Err(TallyError::Permission(format!(
                "Transaction {} is not shared with you",
                txn.id
            )))
        }
    }

    /// Transactions owned by the user, newest first
    pub fn list(&self, user: &UserProfile, filter: &TransactionFilter) -> TallyResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.get_by_user(user.id)?;
        transactions.retain(|t| filter.matches(t));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }
        Ok(transactions)
    }

    /// Apply edits to a transaction the user owns
    pub fn update(
        &self,
        user: &UserProfile,
        identifier: &str,
        input: UpdateTransactionInput,
    ) -> TallyResult<Transaction> {
        let mut txn = self.get_owned(user, identifier)?;
        let before = txn.clone();

        if let Some(transaction_type) = input.transaction_type {
            txn.transaction_type = transaction_type;
        }
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(category) = input.category {
            txn.category = category.trim().to_string();
        }
        if let Some(description) = input.description {
            txn.description = description.trim().to_string();
        }
        if let Some(notes) = input.notes {
            txn.notes = notes.trim().to_string();
        }
        if let Some(account_type) = input.account_type {
            txn.account_type = account_type;
        }
        if let Some(shared_with) = input.shared_with {
            txn.shared_with = self.normalize_participants(user, &shared_with)?;
            let now_shared = !txn.shared_with.is_empty();
            if now_shared != txn.is_shared {
                txn.payment_status = if now_shared {
                    PaymentStatus::Pending
                } else {
                    PaymentStatus::Completed
                };
                txn.paid_at = None;
                txn.last_reminder_sent = None;
            }
            txn.is_shared = now_shared;
        }

        // A settled split whose amount or parties change is owed again
        if txn.is_shared
            && txn.payment_status == PaymentStatus::Paid
            && (txn.amount != before.amount || txn.shared_with != before.shared_with)
        {
            txn.payment_status = PaymentStatus::Pending;
            txn.paid_at = None;
            txn.last_reminder_sent = None;
        }

        txn.updated_at = Utc::now();
        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_name(&txn)),
            &before,
            &txn,
            None,
        )?;

        self.after_expense(&txn);
        Ok(txn)
    }

    /// Delete a transaction the user owns
    ///
    /// A linked receipt is kept but unlinked; an attached voice note is removed.
    pub fn delete(&self, user: &UserProfile, identifier: &str) -> TallyResult<Transaction> {
        let txn = self.get_owned(user, identifier)?;

        if let Some(receipt_id) = txn.receipt_id {
            if let Some(mut receipt) = self.storage.receipts.get(receipt_id)? {
                let before = receipt.clone();
                receipt.transaction_id = None;
                self.storage.receipts.upsert(receipt.clone())?;
                self.storage.receipts.save()?;
                self.storage.log_update(
                    EntityType::Receipt,
                    receipt.id.to_string(),
                    Some(receipt.original_name.clone()),
                    &before,
                    &receipt,
                    Some(format!("unlinked from deleted transaction {}", txn.id)),
                )?;
            }
        }

        if let Some(key) = &txn.voice_note {
            if let Err(e) = self.storage.objects.delete(key) {
                warn!(%key, error = %e, "failed to remove voice note");
            }
        }

        self.storage.transactions.delete(txn.id)?;
        self.storage.transactions.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_name(&txn)),
            &txn,
        )?;

        info!(id = %txn.id, "deleted transaction");
        Ok(txn)
    }

    pub fn count(&self) -> TallyResult<usize> {
        self.storage.transactions.count()
    }

    /// Trim participant entries and store known profiles by email
    ///
    /// Entries naming the owner are rejected. Unknown entries are kept as
    /// typed so expenses can be split with people without a local profile.
    fn normalize_participants(&self, owner: &UserProfile, entries: &[String]) -> TallyResult<Vec<String>> {
        let mut participants = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(TallyError::Validation(
                    TransactionValidationError::EmptyParticipant.to_string(),
                ));
            }

            let normalized = match self.storage.users.resolve(entry)? {
                Some(profile) => profile.email,
                None => entry.to_string(),
            };
            if owner.matches(&normalized) {
                return Err(TallyError::Validation(
                    TransactionValidationError::PayerIsParticipant.to_string(),
                ));
            }
            participants.push(normalized);
        }
        Ok(participants)
    }

    /// Budget alerts for an expense; failures are logged, never returned
    fn after_expense(&self, txn: &Transaction) {
        if !txn.is_expense() {
            return;
        }
        if let Err(e) = BudgetService::new(self.storage).check_alerts(
            txn.user_id,
            txn.display_category(),
            txn.date,
        ) {
            warn!(id = %txn.id, error = %e, "budget alert check failed");
        }
    }
}

fn audit_name(txn: &Transaction) -> String {
    if txn.description.is_empty() {
        format!("{} {}", txn.date, txn.display_category())
    } else {
        format!("{} {}", txn.date, txn.description)
    }
}
