use crate::gamification::display::DisplayProfile;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_display_profile(&self) -> Result<Option<DisplayProfile>, StoreError> {
        Self::read(&self.preferences, keys::DISPLAY_PROFILE_KEY)
    }

    pub fn set_display_profile(&self, profile: &DisplayProfile) -> Result<(), StoreError> {
        Self::write(&self.preferences, keys::DISPLAY_PROFILE_KEY, profile)
    }

    pub fn get_selected_subject(&self) -> Result<Option<String>, StoreError> {
        Self::read(&self.preferences, keys::SELECTED_SUBJECT_KEY)
    }

    pub fn set_selected_subject(&self, subject: &str) -> Result<(), StoreError> {
        Self::write(&self.preferences, keys::SELECTED_SUBJECT_KEY, &subject)
    }

    /// Milestone ids shown on the profile page.
    pub fn get_unlocked_achievements(&self) -> Result<Option<Vec<String>>, StoreError> {
        Self::read(&self.preferences, keys::UNLOCKED_ACHIEVEMENTS_KEY)
    }

    pub fn set_unlocked_achievements(&self, ids: &[String]) -> Result<(), StoreError> {
        Self::write(&self.preferences, keys::UNLOCKED_ACHIEVEMENTS_KEY, &ids)
    }
}
