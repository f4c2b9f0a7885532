//! Transaction model
//!
//! Represents a recorded income or expense. A transaction may be shared with
//! other people, in which case it carries the settlement state of the split.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ReceiptId, TransactionId, UserId};
use super::money::Money;

/// Label used for transactions without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            _ => Err(ParseKindError::new("transaction type", s, "income, expense")),
        }
    }
}

/// Which book a transaction belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Personal,
    Business,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Business => write!(f, "business"),
        }
    }
}

impl FromStr for AccountType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "business" => Ok(Self::Business),
            _ => Err(ParseKindError::new("account type", s, "personal, business")),
        }
    }
}

/// Settlement state of a transaction
///
/// Shared expenses move from `Pending` to `Paid`. Transactions that were
/// never shared are `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    #[default]
    Completed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseKindError::new(
                "payment status",
                s,
                "pending, paid, completed",
            )),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    pub transaction_type: TransactionType,

    /// Always non-negative; the direction comes from `transaction_type`
    pub amount: Money,

    /// Free-text category (empty means uncategorized)
    #[serde(default)]
    pub category: String,

    pub date: NaiveDate,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub notes: String,

    /// Owner, and payer when the transaction is shared
    pub user_id: UserId,

    #[serde(default)]
    pub account_type: AccountType,

    #[serde(default)]
    pub is_shared: bool,

    /// Participant emails or user ids (excluding the payer)
    #[serde(default)]
    pub shared_with: Vec<String>,

    #[serde(default)]
    pub payment_status: PaymentStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<ReceiptId>,

    /// Object-store key of an attached voice note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reminder_sent: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new, unshared transaction
    pub fn new(
        user_id: UserId,
        transaction_type: TransactionType,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            transaction_type,
            amount,
            category: String::new(),
            date,
            description: String::new(),
            notes: String::new(),
            user_id,
            account_type: AccountType::default(),
            is_shared: false,
            shared_with: Vec::new(),
            payment_status: PaymentStatus::Completed,
            receipt_id: None,
            voice_note: None,
            paid_at: None,
            last_reminder_sent: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn is_pending(&self) -> bool {
        self.payment_status == PaymentStatus::Pending
    }

    pub fn has_receipt(&self) -> bool {
        self.receipt_id.is_some()
    }

    /// Category name for display and grouping
    pub fn display_category(&self) -> &str {
        let trimmed = self.category.trim();
        if trimmed.is_empty() {
            UNCATEGORIZED
        } else {
            trimmed
        }
    }

    /// Year-month key used by monthly series ("2025-01")
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Position of the given user among the participants
    ///
    /// An entry matches when it equals the user's email (case-insensitive) or
    /// the user's id in any accepted form.
    pub fn participant_index(&self, email: &str, user_id: UserId) -> Option<usize> {
        self.shared_with.iter().position(|entry| {
            entry.eq_ignore_ascii_case(email)
                || entry
                    .parse::<UserId>()
                    .map(|id| id == user_id)
                    .unwrap_or(false)
        })
    }

    pub fn is_payer(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Shares of the amount: payer first, then each participant in order
    ///
    /// Unshared transactions have a single share equal to the amount.
    pub fn shares(&self) -> Vec<Money> {
        let parties = if self.is_shared {
            self.shared_with.len() + 1
        } else {
            1
        };
        self.amount.split_evenly(parties)
    }

    /// The payer's own share
    pub fn payer_share(&self) -> Money {
        self.shares().first().copied().unwrap_or_default()
    }

    /// What the participants together owe the payer
    pub fn owed_to_payer(&self) -> Money {
        self.amount - self.payer_share()
    }

    /// The share a given user carries, if they are a party to this transaction
    pub fn share_for(&self, email: &str, user_id: UserId) -> Option<Money> {
        if self.is_payer(user_id) {
            return Some(self.payer_share());
        }
        if !self.is_shared {
            return None;
        }
        self.participant_index(email, user_id)
            .and_then(|index| self.shares().get(index + 1).copied())
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        if self.is_shared {
            if self.shared_with.is_empty() {
                return Err(TransactionValidationError::SharedWithoutParticipants);
            }
            for (i, entry) in self.shared_with.iter().enumerate() {
                if entry.trim().is_empty() {
                    return Err(TransactionValidationError::EmptyParticipant);
                }
                if self.shared_with[..i]
                    .iter()
                    .any(|earlier| earlier.eq_ignore_ascii_case(entry))
                {
                    return Err(TransactionValidationError::DuplicateParticipant(
                        entry.clone(),
                    ));
                }
            }
        } else {
            if !self.shared_with.is_empty() {
                return Err(TransactionValidationError::ParticipantsWithoutSharing);
            }
            if self.payment_status != PaymentStatus::Completed {
                return Err(TransactionValidationError::StatusWithoutSharing(
                    self.payment_status,
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.transaction_type,
            self.description,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    SharedWithoutParticipants,
    ParticipantsWithoutSharing,
    EmptyParticipant,
    DuplicateParticipant(String),
    PayerIsParticipant,
    StatusWithoutSharing(PaymentStatus),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative (got {})", amount)
            }
            Self::SharedWithoutParticipants => {
                write!(f, "A shared transaction needs at least one participant")
            }
            Self::ParticipantsWithoutSharing => {
                write!(f, "Participants are only allowed on shared transactions")
            }
            Self::EmptyParticipant => write!(f, "Participant must not be empty"),
            Self::DuplicateParticipant(p) => write!(f, "Participant listed twice: {}", p),
            Self::PayerIsParticipant => {
                write!(f, "The payer cannot also be listed as a participant")
            }
            Self::StatusWithoutSharing(status) => write!(
                f,
                "Payment status '{}' only applies to shared transactions",
                status
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

/// Error returned when parsing one of the transaction enums from text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl ParseKindError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Expected one of: {}",
            self.kind, self.value, self.expected
        )
    }
}

impl std::error::Error for ParseKindError {}
