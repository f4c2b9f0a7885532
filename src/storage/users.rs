//! User profile repository for JSON storage
//!
//! Profiles are indexed by lowercase email so that participants of shared
//! expenses can be resolved to local users.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::TallyError;
use crate::models::{UserId, UserProfile};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

/// Prefix a short user id must carry when typed as a participant
const USER_SHORT_PREFIX: &str = "usr-";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<UserProfile>,
}

pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, UserProfile>>,
    /// Index: lowercase email -> user id
    email_index: RwLock<HashMap<String, UserId>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            email_index: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut email_index = self.email_index.write().map_err(write_lock_error)?;

        data.clear();
        email_index.clear();

        for user in file_data.users {
            email_index.insert(user.email.to_lowercase(), user.id);
            data.insert(user.id, user);
        }

        debug!(count = data.len(), "loaded user profiles");
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let users = self.get_all()?;
        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> Result<Option<UserProfile>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let email_index = self.email_index.read().map_err(read_lock_error)?;

        Ok(email_index
            .get(&email.trim().to_lowercase())
            .and_then(|id| data.get(id))
            .cloned())
    }

    /// Resolve a participant entry (email, full id or "usr-" short id) to a profile
    ///
    /// Bare hex text is never treated as a short id.
    pub fn resolve(&self, entry: &str) -> Result<Option<UserProfile>, TallyError> {
        if let Some(user) = self.get_by_email(entry)? {
            return Ok(Some(user));
        }
        let entry = entry.trim();
        if let Ok(id) = entry.parse::<UserId>() {
            return self.get(id);
        }
        if !entry.to_lowercase().starts_with(USER_SHORT_PREFIX) {
            return Ok(None);
        }

        let data = self.data.read().map_err(read_lock_error)?;
        let mut matches = data.values().filter(|u| u.id.matches_short(entry));
        match (matches.next(), matches.next()) {
            (Some(user), None) => Ok(Some(user.clone())),
            (Some(_), Some(_)) => Err(TallyError::Validation(format!(
                "'{}' matches more than one user; use more characters",
                entry
            ))),
            _ => Ok(None),
        }
    }

    /// All profiles ordered by email
    pub fn get_all(&self) -> Result<Vec<UserProfile>, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.email.to_lowercase().cmp(&b.email.to_lowercase()));
        Ok(users)
    }

    pub fn upsert(&self, user: UserProfile) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        let mut email_index = self.email_index.write().map_err(write_lock_error)?;

        if let Some(old) = data.get(&user.id) {
            email_index.remove(&old.email.to_lowercase());
        }
        email_index.insert(user.email.to_lowercase(), user.id);
        data.insert(user.id, user);
        Ok(())
    }

    pub fn email_exists(&self, email: &str) -> Result<bool, TallyError> {
        let email_index = self.email_index.read().map_err(read_lock_error)?;
        Ok(email_index.contains_key(&email.trim().to_lowercase()))
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_by_email_and_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));

        let user = UserProfile::new("Dana@Example.com", "Dana");
        let id = user.id;
        repo.upsert(user).unwrap();
        repo.save().unwrap();

        let reloaded = UserRepository::new(temp_dir.path().join("users.json"));
        reloaded.load().unwrap();

        assert_eq!(reloaded.resolve("dana@example.com").unwrap().map(|u| u.id), Some(id));
        assert_eq!(reloaded.resolve(&id.to_string()).unwrap().map(|u| u.id), Some(id));
        assert!(reloaded.resolve("eve@example.com").unwrap().is_none());
        let short = &id.as_uuid().to_string()[..4];
        assert!(reloaded.resolve(short).unwrap().is_none());
        assert_eq!(
            reloaded.resolve(&format!("usr-{}", short)).unwrap().map(|u| u.id),
            Some(id)
        );
        assert!(reloaded.email_exists("DANA@example.com").unwrap());
    }
}
