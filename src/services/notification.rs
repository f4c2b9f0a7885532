//! Notification service
//!
//! Creates and manages in-app notifications, and holds the message texts
//! used by the other services when they notify users.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, Notification, NotificationKind, UserId};
use crate::storage::Storage;

pub fn budget_warning_message(category: &str, percent: f64) -> String {
    format!("You've used {:.0}% of your {} budget.", percent, category)
}

pub fn budget_limit_message(category: &str) -> String {
    format!("You've reached your {} budget limit.", category)
}

pub fn payment_reminder_message(amount: Money, description: &str, payer_name: &str) -> String {
    format!(
        "Reminder: You owe {} for \"{}\" to {}.",
        amount, description, payer_name
    )
}

pub fn pending_reminder_message(count: usize) -> String {
    format!(
        "You have {} pending shared expense{} to review.",
        count,
        if count == 1 { "" } else { "s" }
    )
}

pub fn report_ready_message(report_type: &str) -> String {
    format!("Your {} report is now available to view.", report_type)
}

/// Service for notification management
pub struct NotificationService<'a> {
    storage: &'a Storage,
}

impl<'a> NotificationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a notification
    pub fn notify(
        &self,
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> TallyResult<Notification> {
        let notification = Notification::new(user_id, kind, title, message);

        self.storage.notifications.upsert(notification.clone())?;
        self.storage.notifications.save()?;

        self.storage.log_create(
            EntityType::Notification,
            notification.id.to_string(),
            Some(notification.title.clone()),
            &notification,
        )?;

        info!(user = %user_id, kind = %kind, "notification created");
        Ok(notification)
    }

    /// Notifications of a user, newest first
    pub fn list(&self, user_id: UserId, unread_only: bool) -> TallyResult<Vec<Notification>> {
        let mut notifications = self.storage.notifications.get_by_user(user_id)?;
        if unread_only {
            notifications.retain(|n| !n.read);
        }
        Ok(notifications)
    }

    pub fn unread_count(&self, user_id: UserId) -> TallyResult<usize> {
        Ok(self.list(user_id, true)?.len())
    }

    /// Mark one of the user's notifications as read
    pub fn mark_read(&self, user_id: UserId, identifier: &str) -> TallyResult<Notification> {
        let mut notification = self
            .storage
            .notifications
            .find_for_user(user_id, identifier)?
            .ok_or_else(|| TallyError::notification_not_found(identifier))?;

        if notification.read {
            return Ok(notification);
        }

        let before = notification.clone();
        notification.read = true;
        self.storage.notifications.upsert(notification.clone())?;
        self.storage.notifications.save()?;

        self.storage.log_update(
            EntityType::Notification,
            notification.id.to_string(),
            Some(notification.title.clone()),
            &before,
            &notification,
            None,
        )?;

        Ok(notification)
    }

    /// Mark every unread notification of the user as read, returning how many changed
    pub fn mark_all_read(&self, user_id: UserId) -> TallyResult<usize> {
        let unread = self.list(user_id, true)?;
        for notification in &unread {
            let mut updated = notification.clone();
            updated.read = true;
            self.storage.notifications.upsert(updated.clone())?;
            self.storage.log_update(
                EntityType::Notification,
                updated.id.to_string(),
                Some(updated.title.clone()),
                notification,
                &updated,
                None,
            )?;
        }
        if !unread.is_empty() {
            self.storage.notifications.save()?;
        }
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TallyPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_notify_and_read_flow() {
        let (_temp_dir, storage) = create_test_storage();
        let service = NotificationService::new(&storage);
        let user = UserId::new();
        let other = UserId::new();

        let first = service
            .notify(user, NotificationKind::System, "Welcome", "Hello")
            .unwrap();
        service
            .notify(user, NotificationKind::Report, "Report Ready", "Done")
            .unwrap();
        service
            .notify(other, NotificationKind::System, "Welcome", "Hello")
            .unwrap();

        assert_eq!(service.unread_count(user).unwrap(), 2);

        service.mark_read(user, &first.id.to_string()).unwrap();
        assert_eq!(service.unread_count(user).unwrap(), 1);

        assert_eq!(service.mark_all_read(user).unwrap(), 1);
        assert_eq!(service.unread_count(user).unwrap(), 0);
        assert_eq!(service.unread_count(other).unwrap(), 1);
    }

    #[test]
    fn test_cannot_mark_other_users_notification() {
        let (_temp_dir, storage) = create_test_storage();
        let service = NotificationService::new(&storage);
        let owner = UserId::new();
        let n = service
            .notify(owner, NotificationKind::System, "Hi", "There")
            .unwrap();

        let result = service.mark_read(UserId::new(), &n.id.to_string());
        assert!(matches!(result, Err(TallyError::NotFound { .. })));
    }

    #[test]
    fn test_message_texts() {
        assert_eq!(
            budget_warning_message("Dining", 84.6),
            "You've used 85% of your Dining budget."
        );
        assert_eq!(
            payment_reminder_message(Money::from_cents(1250), "Pizza night", "Sam"),
            "Reminder: You owe $12.50 for \"Pizza night\" to Sam."
        );
        assert_eq!(
            pending_reminder_message(1),
            "You have 1 pending shared expense to review."
        );
    }
}
