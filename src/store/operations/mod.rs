pub mod attempts;
pub mod preferences;
pub mod profile;
