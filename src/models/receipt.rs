//! Receipt model
//!
//! A receipt is an uploaded image stored in the object store together with
//! the data extracted from it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ReceiptId, TransactionId, UserId};
use super::money::Money;

/// Processing state of a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    #[default]
    Uploaded,
    Processed,
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => write!(f, "uploaded"),
            Self::Processed => write!(f, "processed"),
        }
    }
}

/// A single line item read from a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    pub price: Money,
}

/// Data extracted from a receipt image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedReceipt {
    pub merchant: String,
    pub date: NaiveDate,
    pub total: Money,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    #[serde(default)]
    pub tax_amount: Money,
}

/// An uploaded receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,

    pub user_id: UserId,

    /// Object-store key of the image
    pub file_ref: String,

    /// File name as uploaded
    pub original_name: String,

    pub uploaded_at: DateTime<Utc>,

    #[serde(default)]
    pub status: ReceiptStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedReceipt>,

    /// Set when the extracted data is a stand-in rather than a real reading
    #[serde(default)]
    pub is_placeholder: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Receipt {
    pub fn new(
        user_id: UserId,
        file_ref: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ReceiptId::new(),
            user_id,
            file_ref: file_ref.into(),
            original_name: original_name.into(),
            uploaded_at: Utc::now(),
            status: ReceiptStatus::Uploaded,
            extracted: None,
            is_placeholder: false,
            transaction_id: None,
            processed_at: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.transaction_id.is_some()
    }

    /// Record extraction results
    pub fn record_extraction(&mut self, extracted: ExtractedReceipt, is_placeholder: bool) {
        self.extracted = Some(extracted);
        self.is_placeholder = is_placeholder;
        self.status = ReceiptStatus::Processed;
        self.processed_at = Some(Utc::now());
    }

    /// Link this receipt to a transaction
    ///
    /// A receipt belongs to at most one transaction; relinking to the same
    /// transaction is a no-op.
    pub fn link(&mut self, transaction_id: TransactionId) -> Result<(), ReceiptLinkError> {
        match self.transaction_id {
            Some(existing) if existing != transaction_id => {
                Err(ReceiptLinkError::AlreadyLinked(existing))
            }
            _ => {
                self.transaction_id = Some(transaction_id);
                Ok(())
            }
        }
    }
}

/// Error linking a receipt to a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptLinkError {
    AlreadyLinked(TransactionId),
}

impl fmt::Display for ReceiptLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLinked(id) => {
                write!(f, "Receipt is already linked to transaction {}", id)
            }
        }
    }
}

impl std::error::Error for ReceiptLinkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_once() {
        let mut receipt = Receipt::new(UserId::new(), "receipts/u/1_a.jpg", "a.jpg");
        let first = TransactionId::new();
        receipt.link(first).unwrap();
        assert!(receipt.link(first).is_ok());
        assert_eq!(
            receipt.link(TransactionId::new()),
            Err(ReceiptLinkError::AlreadyLinked(first))
        );
    }

    #[test]
    fn test_record_extraction() {
        let mut receipt = Receipt::new(UserId::new(), "receipts/u/1_a.jpg", "a.jpg");
        assert_eq!(receipt.status, ReceiptStatus::Uploaded);
        receipt.record_extraction(
            ExtractedReceipt {
                merchant: "Corner Shop".into(),
                date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                total: Money::from_cents(1299),
                items: vec![],
                tax_amount: Money::zero(),
            },
            false,
        );
        assert_eq!(receipt.status, ReceiptStatus::Processed);
        assert!(receipt.processed_at.is_some());
    }
}
