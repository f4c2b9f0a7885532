//! Service layer for TallyCLI
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, ownership checks, and cross-entity operations such
//! as receipt linking and settlement of shared expenses.

pub mod budget;
pub mod categorize;
pub mod notification;
pub mod receipt;
pub mod search;
pub mod split;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use budget::{BudgetService, BudgetStatus};
pub use categorize::suggest_category;
pub use notification::NotificationService;
pub use receipt::{
    Extraction, PlaceholderExtractor, ReceiptExtractor, ReceiptService, ReceiptTransactionInput,
};
pub use search::{SearchFilter, SearchService};
pub use split::{share_breakdown, PartyShare, SplitService, SplitSummary, SplitView};
pub use subscription::{effective_tier, SubscriptionService};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
pub use user::UserService;
