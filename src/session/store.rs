//! Snapshot persistence
//!
//! Best-effort local cache of the docked scene pose, so a reload or a
//! backgrounded window comes back exactly where the transition left it.
//! A missing or unreadable file is simply "no snapshot".

use bevy::log::warn;
use bevy::prelude::{Resource, Vec3};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Interchange form of a 3-vector: `{x, y, z}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Vec3Record {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3Record> for Vec3 {
    fn from(v: Vec3Record) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Serialized session state, written on dock completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub globe_position: Vec3Record,
    pub camera_position: Vec3Record,
    pub controls_enabled: bool,
    pub saved_at: DateTime<Utc>,
}

/// Disk-backed snapshot store.
///
/// Resolves the platform cache directory:
/// - macOS: ~/Library/Caches/starportal/session/
/// - Linux: ~/.cache/starportal/session/
/// - Windows: %LOCALAPPDATA%\starportal\session\
#[derive(Resource)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new() -> Result<Self, anyhow::Error> {
        let proj_dirs = ProjectDirs::from("", "", "starportal")
            .ok_or_else(|| anyhow::anyhow!("failed to resolve cache directory"))?;
        Ok(Self::new_in_dir(proj_dirs.cache_dir().join("session")))
    }

    /// Root the store at a specific directory; primarily for tests or setups
    /// where the platform cache directory is not writable.
    pub fn new_in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.dir.join("snapshot.json")
    }

    /// Read the stored snapshot. Missing and malformed files both read as
    /// `None`; malformed files get one warning.
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let path = self.snapshot_path();
        if !path.exists() {
            return None;
        }

        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|contents| serde_json::from_str(&contents).map_err(anyhow::Error::from));

        match parsed {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!("ignoring unreadable session snapshot: {err:#}");
                None
            }
        }
    }

    /// Write (or overwrite) the snapshot.
    pub fn save(&self, snapshot: &PersistedSnapshot) -> Result<(), anyhow::Error> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(snapshot)?;
        fs::write(self.snapshot_path(), contents)?;
        Ok(())
    }

    /// Drop the stored snapshot, if any.
    pub fn clear(&self) {
        let path = self.snapshot_path();
        if path.exists()
            && let Err(err) = fs::remove_file(&path)
        {
            warn!("failed to clear session snapshot: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(test_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "starportal-session-{}-{}-{}",
            test_name,
            std::process::id(),
            nanos
        ))
    }

    fn sample_snapshot() -> PersistedSnapshot {
        PersistedSnapshot {
            globe_position: Vec3::new(-170.0, -30.0, 0.0).into(),
            camera_position: Vec3::new(55.0, 8.0, 310.0).into(),
            controls_enabled: false,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = SnapshotStore::new_in_dir(unique_temp_dir("round_trip"));
        let snapshot = sample_snapshot();

        store.save(&snapshot).expect("save should succeed");
        let loaded = store.load().expect("snapshot should exist");

        assert_eq!(loaded, snapshot);

        // Saving the loaded copy again changes nothing.
        store.save(&loaded).expect("re-save should succeed");
        assert_eq!(store.load().unwrap(), snapshot);
    }

    #[test]
    fn test_missing_snapshot_reads_as_none() {
        let store = SnapshotStore::new_in_dir(unique_temp_dir("missing"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_malformed_snapshot_reads_as_none() {
        let dir = unique_temp_dir("malformed");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("snapshot.json"), "{ not json").unwrap();

        let store = SnapshotStore::new_in_dir(dir);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_missing_keys_read_as_none() {
        let dir = unique_temp_dir("missing_keys");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("snapshot.json"),
            r#"{"globePosition": {"x": 0.0, "y": 0.0, "z": 0.0}}"#,
        )
        .unwrap();

        let store = SnapshotStore::new_in_dir(dir);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let store = SnapshotStore::new_in_dir(unique_temp_dir("clear"));
        store.save(&sample_snapshot()).unwrap();
        assert!(store.load().is_some());

        store.clear();
        assert!(store.load().is_none());

        // Clearing an empty store is fine.
        store.clear();
    }

    #[test]
    fn test_snapshot_survives_store_reconstruction() {
        let dir = unique_temp_dir("reconstruct");
        let store = SnapshotStore::new_in_dir(dir.clone());
        store.save(&sample_snapshot()).unwrap();

        let reopened = SnapshotStore::new_in_dir(dir);
        let loaded = reopened.load().expect("snapshot should persist");
        assert!(!loaded.controls_enabled);
    }

    #[test]
    fn test_snapshot_uses_interchange_keys() {
        let json = serde_json::to_string(&sample_snapshot()).unwrap();
        assert!(json.contains("globePosition"));
        assert!(json.contains("cameraPosition"));
        assert!(json.contains("controlsEnabled"));
    }
}
