//! Notification repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TallyError;
use crate::models::{Notification, NotificationId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct NotificationData {
    notifications: Vec<Notification>,
}

pub struct NotificationRepository {
    path: PathBuf,
    data: RwLock<HashMap<NotificationId, Notification>>,
}

impl NotificationRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: NotificationData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(write_lock_error)?;

        data.clear();
        for notification in file_data.notifications {
            data.insert(notification.id, notification);
        }

        debug!(count = data.len(), "loaded notifications");
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let mut notifications: Vec<_> = data.values().cloned().collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        write_json_atomic(&self.path, &NotificationData { notifications })
    }

    pub fn get(&self, id: NotificationId) -> Result<Option<Notification>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Find a notification of the given user by full or short id
    pub fn find_for_user(
        &self,
        user_id: UserId,
        identifier: &str,
    ) -> Result<Option<Notification>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let parsed = identifier.parse::<NotificationId>().ok();
        Ok(data
            .values()
            .filter(|n| n.user_id == user_id)
            .find(|n| Some(n.id) == parsed || n.id.matches_short(identifier))
            .cloned())
    }

    /// Notifications of a user, newest first
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Notification>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let mut notifications: Vec<_> = data
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    pub fn upsert(&self, notification: Notification) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        data.insert(notification.id, notification);
        Ok(())
    }
}
