use crate::gamification::profile::{GamificationProfile, ProfileRepository};
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_profile(&self) -> Result<Option<GamificationProfile>, StoreError> {
        Self::read(&self.profile, keys::PROFILE_KEY)
    }

    pub fn save_profile(&self, profile: &GamificationProfile) -> Result<(), StoreError> {
        Self::write(&self.profile, keys::PROFILE_KEY, profile)
    }
}

impl ProfileRepository for Store {
    fn load_profile(&self) -> Result<Option<GamificationProfile>, StoreError> {
        self.get_profile()
    }

    fn store_profile(&self, profile: &GamificationProfile) -> Result<(), StoreError> {
        self.save_profile(profile)
    }
}
