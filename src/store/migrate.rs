use serde_json::Value;

use crate::constants::XP_PER_LEVEL;
use crate::store::keys::{self, VERSION_KEY};
use crate::store::{Store, StoreError};

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![
        ("001_initial", m001_initial),
        ("002_profile_level_from_xp", m002_profile_level_from_xp),
    ]
}

/// Applies pending migrations in order.
///
/// Every migration must be idempotent: the process can stop after a migration
/// ran but before its version was recorded. Versions only move forward.
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.meta.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            let bytes: [u8; 4] = raw.as_ref().try_into().unwrap_or([0; 4]);
            Ok(u32::from_be_bytes(bytes))
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .meta
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

/// Older profiles stored `level` on its own; derive it from `xp` again.
/// Unparseable profiles are left alone, loading falls back to defaults.
fn m002_profile_level_from_xp(store: &Store) -> Result<(), StoreError> {
    let Some(raw) = store.profile.get(keys::PROFILE_KEY.as_bytes())? else {
        return Ok(());
    };
    let mut value: Value = match serde_json::from_slice(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(error = %error, "Stored profile is not JSON, skipping level repair");
            return Ok(());
        }
    };
    let Some(object) = value.as_object_mut() else {
        return Ok(());
    };

    let xp = object.get("xp").and_then(Value::as_u64).unwrap_or(0);
    let level = 1 + xp / XP_PER_LEVEL;
    if object.get("level").and_then(Value::as_u64) != Some(level) {
        tracing::info!(xp, level, "Repairing stored profile level");
        object.insert("level".to_string(), Value::from(level));
        store
            .profile
            .insert(keys::PROFILE_KEY.as_bytes(), Store::serialize(&value)?)?;
    }

    Ok(())
}
