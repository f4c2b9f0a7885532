//! Receipt service
//!
//! Receipts are uploaded into the object store, processed through an
//! extractor, and then either saved as a new expense or linked to an
//! existing transaction. A receipt belongs to at most one transaction.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    AccountType, ExtractedReceipt, Money, Receipt, ReceiptStatus, Transaction, TransactionType,
    UserProfile,
};
use crate::storage::{ObjectFolder, Storage};

use super::transaction::{CreateTransactionInput, TransactionService};

/// Merchant name reported when nothing could be read
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// Result of reading a receipt image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub data: ExtractedReceipt,
    /// The data is a stand-in to be corrected by the user
    pub is_placeholder: bool,
}

/// Reads merchant, date, total and line items from a receipt image
pub trait ReceiptExtractor {
    fn extract(&self, image: &Path) -> TallyResult<Extraction>;
}

/// Extractor used when no recognition backend is configured
///
/// Produces an empty reading dated today so the user can fill in the
/// details when saving the transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderExtractor;

impl ReceiptExtractor for PlaceholderExtractor {
    fn extract(&self, _image: &Path) -> TallyResult<Extraction> {
        Ok(Extraction {
            data: ExtractedReceipt {
                merchant: UNKNOWN_MERCHANT.to_string(),
                date: Utc::now().date_naive(),
                total: Money::zero(),
                items: Vec::new(),
                tax_amount: Money::zero(),
            },
            is_placeholder: true,
        })
    }
}

/// Values that override the extracted data when saving a receipt as an expense
#[derive(Debug, Clone, Default)]
pub struct ReceiptTransactionInput {
    pub amount: Option<Money>,
    pub date: Option<chrono::NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
    pub account_type: Option<AccountType>,
}

/// Service for receipt management
pub struct ReceiptService<'a> {
    storage: &'a Storage,
    extractor: Box<dyn ReceiptExtractor + 'a>,
}

impl<'a> ReceiptService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            extractor: Box::new(PlaceholderExtractor),
        }
    }

    pub fn with_extractor(mut self, extractor: impl ReceiptExtractor + 'a) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Copy an image into the object store and record it
    pub fn upload(&self, user: &UserProfile, image: &Path) -> TallyResult<Receipt> {
        let original_name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("receipt")
            .to_string();
        let key = self
            .storage
            .objects
            .put(ObjectFolder::Receipts, user.id, image)?;

        let receipt = Receipt::new(user.id, key, original_name);
        self.storage.receipts.upsert(receipt.clone())?;
        self.storage.receipts.save()?;

        self.storage.log_create(
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(receipt.original_name.clone()),
            &receipt,
        )?;

        info!(id = %receipt.id, file = %receipt.file_ref, "uploaded receipt");
        Ok(receipt)
    }

    /// A receipt the user uploaded
    pub fn get_owned(&self, user: &UserProfile, identifier: &str) -> TallyResult<Receipt> {
        let receipt = self
            .storage
            .receipts
            .find(identifier)?
            .ok_or_else(|| TallyError::receipt_not_found(identifier))?;
        if receipt.user_id != user.id {
            return Err(TallyError::Permission(format!(
                "Receipt {} belongs to another user",
                receipt.id
            )));
        }
        Ok(receipt)
    }

    pub fn list(&self, user: &UserProfile) -> TallyResult<Vec<Receipt>> {
        self.storage.receipts.get_by_user(user.id)
    }

    /// Run the extractor over a stored receipt
    pub fn process(&self, user: &UserProfile, identifier: &str) -> TallyResult<Receipt> {
        let mut receipt = self.get_owned(user, identifier)?;
        let path = self.storage.objects.path_for(&receipt.file_ref)?;
        if !path.is_file() {
            return Err(TallyError::Receipt(format!(
                "Stored image for receipt {} is missing",
                receipt.id
            )));
        }

        let extraction = self.extractor.extract(&path)?;
        let before = receipt.clone();
        receipt.record_extraction(extraction.data, extraction.is_placeholder);

        self.storage.receipts.upsert(receipt.clone())?;
        self.storage.receipts.save()?;
        self.storage.log_update(
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(receipt.original_name.clone()),
            &before,
            &receipt,
            None,
        )?;

        if receipt.is_placeholder {
            warn!(id = %receipt.id, "receipt details could not be read; placeholder data recorded");
        }
        Ok(receipt)
    }

    /// Create an expense from a processed receipt and link the two
    pub fn save_as_transaction(
        &self,
        user: &UserProfile,
        identifier: &str,
        input: ReceiptTransactionInput,
    ) -> TallyResult<(Receipt, Transaction)> {
        let receipt = self.get_owned(user, identifier)?;
        let extracted = match (&receipt.status, &receipt.extracted) {
            (ReceiptStatus::Processed, Some(extracted)) => extracted.clone(),
            _ => {
                return Err(TallyError::Receipt(format!(
                    "Receipt {} has not been processed yet",
                    receipt.id
                )))
            }
        };
        if let Some(existing) = receipt.transaction_id {
            return Err(TallyError::Receipt(format!(
                "Receipt {} is already linked to transaction {}",
                receipt.id, existing
            )));
        }

        let notes = input.notes.or_else(|| item_notes(&extracted));
        let txn = TransactionService::new(self.storage).create(
            user,
            CreateTransactionInput {
                transaction_type: TransactionType::Expense,
                amount: input.amount.unwrap_or(extracted.total),
                date: input.date.unwrap_or(extracted.date),
                description: Some(input.description.unwrap_or(extracted.merchant)),
                category: input.category,
                notes,
                account_type: input.account_type,
                auto_categorize: true,
                ..Default::default()
            },
        )?;

        self.link_pair(receipt, txn)
    }

    /// Link a receipt to an existing transaction the user owns
    pub fn link(
        &self,
        user: &UserProfile,
        identifier: &str,
        transaction: &str,
    ) -> TallyResult<(Receipt, Transaction)> {
        let receipt = self.get_owned(user, identifier)?;
        let txn = TransactionService::new(self.storage).get_owned(user, transaction)?;

        if let Some(other) = txn.receipt_id.filter(|id| *id != receipt.id) {
            return Err(TallyError::Receipt(format!(
                "Transaction {} already has receipt {}",
                txn.id, other
            )));
        }
        self.link_pair(receipt, txn)
    }

    /// Delete a receipt, its stored image, and any transaction link
    pub fn delete(&self, user: &UserProfile, identifier: &str) -> TallyResult<Receipt> {
        let receipt = self.get_owned(user, identifier)?;

        if let Some(txn_id) = receipt.transaction_id {
            if let Some(mut txn) = self.storage.transactions.get(txn_id)? {
                let before = txn.clone();
                txn.receipt_id = None;
                txn.updated_at = Utc::now();
                self.storage.transactions.upsert(txn.clone())?;
                self.storage.transactions.save()?;
                self.storage.log_update(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(txn.description.clone()),
                    &before,
                    &txn,
                    Some(format!("receipt {} removed", receipt.id)),
                )?;
            }
        }

        self.storage.objects.delete(&receipt.file_ref)?;
        self.storage.receipts.delete(receipt.id)?;
        self.storage.receipts.save()?;

        self.storage.log_delete(
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(receipt.original_name.clone()),
            &receipt,
        )?;

        info!(id = %receipt.id, "deleted receipt");
        Ok(receipt)
    }

    fn link_pair(&self, mut receipt: Receipt, mut txn: Transaction) -> TallyResult<(Receipt, Transaction)> {
        let receipt_before = receipt.clone();
        receipt
            .link(txn.id)
            .map_err(|e| TallyError::Receipt(e.to_string()))?;

        let txn_before = txn.clone();
        txn.receipt_id = Some(receipt.id);
        txn.updated_at = Utc::now();

        self.storage.receipts.upsert(receipt.clone())?;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.receipts.save()?;
        self.storage.transactions.save()?;

        self.storage.log_update(
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(receipt.original_name.clone()),
            &receipt_before,
            &receipt,
            Some(format!("linked to transaction {}", txn.id)),
        )?;
        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn_before,
            &txn,
            Some(format!("receipt {} attached", receipt.id)),
        )?;

        Ok((receipt, txn))
    }
}

/// Line items as transaction notes
fn item_notes(extracted: &ExtractedReceipt) -> Option<String> {
    if extracted.items.is_empty() {
        return None;
    }
    Some(
        extracted
            .items
            .iter()
            .map(|item| format!("{}: {}", item.name, item.price))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
