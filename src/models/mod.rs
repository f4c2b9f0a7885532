//! Core data models for TallyCLI
//!
//! Transactions, receipts, user profiles with their subscription and
//! budgets, notifications, and the calendar periods used by summaries.

pub mod ids;
pub mod money;
pub mod notification;
pub mod period;
pub mod receipt;
pub mod transaction;
pub mod user;

pub use ids::{NotificationId, ReceiptId, TransactionId, UserId};
pub use money::Money;
pub use notification::{Notification, NotificationKind};
pub use period::{PeriodKind, SummaryPeriod};
pub use receipt::{ExtractedReceipt, Receipt, ReceiptItem, ReceiptStatus};
pub use transaction::{
    AccountType, PaymentStatus, Transaction, TransactionType, TransactionValidationError,
    UNCATEGORIZED,
};
pub use user::{CategoryBudget, Feature, Subscription, SubscriptionTier, UserProfile};
