//! User profile service
//!
//! Registers local profiles and resolves the active profile from settings.
//! Authentication is handled outside this crate; a profile only records who
//! the commands act for.

use tracing::info;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::UserProfile;
use crate::storage::Storage;

pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new profile
    pub fn register(&self, email: &str, display_name: Option<&str>) -> TallyResult<UserProfile> {
        let user = UserProfile::new(email, display_name.unwrap_or_default());
        user.validate().map_err(TallyError::Validation)?;

        if self.storage.users.email_exists(&user.email)? {
            return Err(TallyError::Duplicate {
                entity_type: "User",
                identifier: user.email.clone(),
            });
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.email.clone()),
            &user,
        )?;

        info!(email = %user.email, "registered user");
        Ok(user)
    }

    /// Find a profile by email or id
    pub fn find(&self, identifier: &str) -> TallyResult<Option<UserProfile>> {
        self.storage.users.resolve(identifier)
    }

    pub fn list(&self) -> TallyResult<Vec<UserProfile>> {
        self.storage.users.get_all()
    }

    /// The active profile
    pub fn current(&self, settings: &Settings) -> TallyResult<UserProfile> {
        let id = settings.require_user()?;
        self.storage
            .users
            .get(id)?
            .ok_or_else(|| TallyError::user_not_found(id.to_string()))
    }

    /// Persist changes to a profile and audit them
    pub fn save_profile(&self, before: &UserProfile, after: UserProfile) -> TallyResult<UserProfile> {
        self.storage.users.upsert(after.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            after.id.to_string(),
            Some(after.email.clone()),
            before,
            &after,
            None,
        )?;

        Ok(after)
    }

    pub fn rename(&self, user: &UserProfile, display_name: &str) -> TallyResult<UserProfile> {
        let mut updated = user.clone();
        updated.display_name = display_name.trim().to_string();
        self.save_profile(user, updated)
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
    fn test_register_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        let user = service.register("kim@example.com", Some("Kim")).unwrap();
        assert_eq!(user.name(), "Kim");
        assert_eq!(
            service.find("KIM@example.com").unwrap().map(|u| u.id),
            Some(user.id)
        );
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);

        service.register("kim@example.com", None).unwrap();
        let err = service.register("Kim@Example.com", None).unwrap_err();
        assert!(matches!(err, TallyError::Duplicate { .. }));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        assert!(service.register("kim", None).unwrap_err().is_validation());
    }

    #[test]
    fn test_current_requires_sign_in() {
        let (_temp_dir, storage) = create_test_storage();
        let service = UserService::new(&storage);
        let mut settings = Settings::default();

        assert!(matches!(
            service.current(&settings),
            Err(TallyError::NotSignedIn)
        ));

        let user = service.register("kim@example.com", None).unwrap();
        settings.current_user = Some(user.id);
        assert_eq!(service.current(&settings).unwrap().id, user.id);
    }
}
