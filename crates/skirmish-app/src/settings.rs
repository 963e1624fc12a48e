//! User preferences: volumes, mouse sensitivity, and graphics tiers.
//!
//! Stored as a flat JSON object keyed by setting name. Absent keys take
//! their defaults. Every `set` clamps the value, writes the file, and tells
//! the subscribed observers which setting changed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which setting changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingType {
    Main,
    Music,
    Voice,
    Sfx,
    MouseX,
    MouseY,
    ShaderQuality,
    ShadowQuality,
}

impl SettingType {
    pub const ALL: [SettingType; 8] = [
        SettingType::Main,
        SettingType::Music,
        SettingType::Voice,
        SettingType::Sfx,
        SettingType::MouseX,
        SettingType::MouseY,
        SettingType::ShaderQuality,
        SettingType::ShadowQuality,
    ];

    /// Key used in the settings file.
    pub fn key(self) -> &'static str {
        match self {
            SettingType::Main => "MainVolume",
            SettingType::Music => "MusicVolume",
            SettingType::Voice => "VoiceVolume",
            SettingType::Sfx => "SfxVolume",
            SettingType::MouseX => "MouseSensitivityX",
            SettingType::MouseY => "MouseSensitivityY",
            SettingType::ShaderQuality => "ShaderQuality",
            SettingType::ShadowQuality => "ShadowQuality",
        }
    }

    pub fn is_volume(self) -> bool {
        matches!(
            self,
            SettingType::Main | SettingType::Music | SettingType::Voice | SettingType::Sfx
        )
    }
}

pub const SENSITIVITY_MIN: f64 = 0.1;
pub const SENSITIVITY_MAX: f64 = 5.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write settings to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("settings file {path} is malformed: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Current values of every setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Settings {
    pub main_volume: f64,
    pub music_volume: f64,
    pub voice_volume: f64,
    pub sfx_volume: f64,
    pub mouse_sensitivity_x: f64,
    pub mouse_sensitivity_y: f64,
    pub shader_quality: i32,
    pub shadow_quality: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            main_volume: 1.0,
            music_volume: 1.0,
            voice_volume: 1.0,
            sfx_volume: 1.0,
            mouse_sensitivity_x: 1.0,
            mouse_sensitivity_y: 1.0,
            shader_quality: 0,
            shadow_quality: 0,
        }
    }
}

impl Settings {
    pub fn get(&self, setting: SettingType) -> f64 {
        match setting {
            SettingType::Main => self.main_volume,
            SettingType::Music => self.music_volume,
            SettingType::Voice => self.voice_volume,
            SettingType::Sfx => self.sfx_volume,
            SettingType::MouseX => self.mouse_sensitivity_x,
            SettingType::MouseY => self.mouse_sensitivity_y,
            SettingType::ShaderQuality => self.shader_quality as f64,
            SettingType::ShadowQuality => self.shadow_quality as f64,
        }
    }

    /// Store `value`, clamped to the setting's range. Quality tiers truncate
    /// toward zero.
    fn put(&mut self, setting: SettingType, value: f64) {
        match setting {
            SettingType::Main => self.main_volume = clamp_volume(value),
            SettingType::Music => self.music_volume = clamp_volume(value),
            SettingType::Voice => self.voice_volume = clamp_volume(value),
            SettingType::Sfx => self.sfx_volume = clamp_volume(value),
            SettingType::MouseX => self.mouse_sensitivity_x = clamp_sensitivity(value),
            SettingType::MouseY => self.mouse_sensitivity_y = clamp_sensitivity(value),
            SettingType::ShaderQuality => self.shader_quality = value as i32,
            SettingType::ShadowQuality => self.shadow_quality = value as i32,
        }
    }

    /// Bring hand-edited values back into range.
    fn sanitized(mut self) -> Self {
        for setting in SettingType::ALL {
            let value = self.get(setting);
            self.put(setting, value);
        }
        self
    }

    /// Linear gain for the music channel.
    pub fn music_gain(&self) -> f64 {
        self.main_volume * self.music_volume
    }

    pub fn voice_gain(&self) -> f64 {
        self.main_volume * self.voice_volume
    }

    pub fn sfx_gain(&self) -> f64 {
        self.main_volume * self.sfx_volume
    }
}

fn clamp_volume(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn clamp_sensitivity(value: f64) -> f64 {
    if value.is_nan() {
        return SENSITIVITY_MIN;
    }
    value.clamp(SENSITIVITY_MIN, SENSITIVITY_MAX)
}

type Observer = Box<dyn FnMut(SettingType, &Settings) + Send>;

#[derive(Default)]
struct ObserverList {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
    /// Set while `notify` has the entries checked out.
    notifying: bool,
    /// Ids unsubscribed while the entries were checked out.
    removed: Vec<u64>,
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    list: Weak<Mutex<ObserverList>>,
}

impl Subscription {
    /// Unsubscribe now. Same as dropping.
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.list.upgrade() {
            if let Ok(mut list) = list.lock() {
                list.entries.retain(|(id, _)| *id != self.id);
                if list.notifying {
                    list.removed.push(self.id);
                }
            }
        }
    }
}

/// Settings plus the file they persist to and the observers of changes.
pub struct SettingsStore {
    values: Settings,
    path: Option<PathBuf>,
    observers: Arc<Mutex<ObserverList>>,
}

impl SettingsStore {
    /// Defaults, never written to disk.
    pub fn in_memory() -> Self {
        Self {
            values: Settings::default(),
            path: None,
            observers: Arc::default(),
        }
    }

    /// Load `path`, or start from defaults if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str::<Settings>(&text)
                .map_err(|source| SettingsError::Parse {
                    path: path.clone(),
                    source,
                })?
                .sanitized(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no settings at {}; using defaults", path.display());
                Settings::default()
            }
            Err(source) => return Err(SettingsError::Read { path, source }),
        };
        Ok(Self {
            values,
            path: Some(path),
            observers: Arc::default(),
        })
    }

    pub fn values(&self) -> &Settings {
        &self.values
    }

    pub fn get(&self, setting: SettingType) -> f64 {
        self.values.get(setting)
    }

    /// Clamp and store `value`, persist, then notify observers.
    ///
    /// Observers are notified even when writing the file fails; the error is
    /// returned afterwards.
    pub fn set(&mut self, setting: SettingType, value: f64) -> Result<(), SettingsError> {
        self.values.put(setting, value);
        log::debug!("{} = {}", setting.key(), self.values.get(setting));
        let saved = self.save();
        self.notify(setting);
        saved
    }

    /// Register `observer`; it stays subscribed while the returned guard lives.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(SettingType, &Settings) + Send + 'static,
    {
        let mut id = 0;
        if let Ok(mut list) = self.observers.lock() {
            id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Box::new(observer)));
        }
        Subscription {
            id,
            list: Arc::downgrade(&self.observers),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().map(|l| l.entries.len()).unwrap_or(0)
    }

    /// Observers run with the list unlocked, so they may subscribe or drop
    /// subscriptions, their own included.
    fn notify(&self, setting: SettingType) {
        let mut running = match self.observers.lock() {
            Ok(mut list) => {
                list.notifying = true;
                std::mem::take(&mut list.entries)
            }
            Err(_) => return,
        };

        for (_, observer) in running.iter_mut() {
            observer(setting, &self.values);
        }

        if let Ok(mut list) = self.observers.lock() {
            let removed = std::mem::take(&mut list.removed);
            running.retain(|(id, _)| !removed.contains(id));
            // Subscriptions made during the callbacks go after the old ones.
            running.append(&mut list.entries);
            list.entries = running;
            list.notifying = false;
        }
    }

    fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |source| SettingsError::Write {
            path: path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(path, json).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;


    #[test]
    fn test_defaults() {
        let store = SettingsStore::in_memory();
        for setting in [SettingType::Main, SettingType::Music, SettingType::Voice, SettingType::Sfx] {
            assert_eq!(store.get(setting), 1.0);
        }
        assert_eq!(store.get(SettingType::MouseX), 1.0);
        assert_eq!(store.get(SettingType::ShaderQuality), 0.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut store = SettingsStore::in_memory();
        store.set(SettingType::Music, 1.7).unwrap();
        assert_eq!(store.get(SettingType::Music), 1.0);
        store.set(SettingType::Sfx, -0.5).unwrap();
        assert_eq!(store.get(SettingType::Sfx), 0.0);
        store.set(SettingType::MouseY, 0.01).unwrap();
        assert_eq!(store.get(SettingType::MouseY), SENSITIVITY_MIN);
        store.set(SettingType::MouseX, 9.0).unwrap();
        assert_eq!(store.get(SettingType::MouseX), SENSITIVITY_MAX);
        store.set(SettingType::ShadowQuality, 2.9).unwrap();
        assert_eq!(store.values().shadow_quality, 2);
    }

    #[test]
    fn test_gains_multiply_main() {
        let mut store = SettingsStore::in_memory();
        store.set(SettingType::Main, 0.5).unwrap();
        store.set(SettingType::Voice, 0.5).unwrap();
        assert!((store.values().voice_gain() - 0.25).abs() < 1e-12);
        assert!((store.values().music_gain() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("persist.json");
        {
            let mut store = SettingsStore::open(&path).unwrap();
            store.set(SettingType::Main, 0.25).unwrap();
            store.set(SettingType::ShaderQuality, 3.0).unwrap();
        }
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"MainVolume\""), "{text}");

        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get(SettingType::Main), 0.25);
        assert_eq!(store.values().shader_quality, 3);
    }

    #[test]
    fn test_partial_file_takes_defaults_and_clamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "SfxVolume": 0.4, "MouseSensitivityX": 40.0 }"#).unwrap();
        let store = SettingsStore::open(&path).unwrap();
        assert_eq!(store.get(SettingType::Sfx), 0.4);
        assert_eq!(store.get(SettingType::MouseX), SENSITIVITY_MAX);
        assert_eq!(store.get(SettingType::Main), 1.0);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ MainVolume: ").unwrap();
        assert!(matches!(
            SettingsStore::open(&path),
            Err(SettingsError::Parse { .. })
        ));
    }

    #[test]
    fn test_observers_see_changes_until_dropped() {
        let mut store = SettingsStore::in_memory();
        let (tx, rx) = mpsc::channel();
        let sub = store.subscribe(move |setting, values| {
            let _ = tx.send((setting, values.get(setting)));
        });
        assert_eq!(store.observer_count(), 1);

        store.set(SettingType::Voice, 0.3).unwrap();
        assert_eq!(rx.try_recv().unwrap(), (SettingType::Voice, 0.3));

        drop(sub);
        assert_eq!(store.observer_count(), 0);
        store.set(SettingType::Voice, 0.6).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cancel_only_removes_own_observer() {
        let mut store = SettingsStore::in_memory();
        let (tx, rx) = mpsc::channel();
        let tx2 = tx.clone();
        let keep = store.subscribe(move |s, _| {
            let _ = tx.send(("keep", s));
        });
        let gone = store.subscribe(move |s, _| {
            let _ = tx2.send(("gone", s));
        });
        gone.cancel();

        store.set(SettingType::MouseX, 2.0).unwrap();
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(got, vec![("keep", SettingType::MouseX)]);
        drop(keep);
    }

    #[test]
    fn test_observer_can_drop_own_subscription() {
        let mut store = SettingsStore::in_memory();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::default();
        let (tx, rx) = mpsc::channel();
        let own = Arc::clone(&slot);
        let sub = store.subscribe(move |setting, _| {
            let _ = tx.send(setting);
            // One-shot: unsubscribe from inside the callback.
            drop(own.lock().unwrap().take());
        });
        *slot.lock().unwrap() = Some(sub);

        let (done_tx, done_rx) = mpsc::channel();
        let worker = std::thread::spawn(move || {
            store.set(SettingType::Main, 0.5).unwrap();
            store.set(SettingType::Main, 0.7).unwrap();
            let _ = done_tx.send(store.observer_count());
        });
        let remaining = done_rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("set returned");
        worker.join().unwrap();

        assert_eq!(remaining, 0);
        let seen: Vec<_> = rx.try_iter().collect();
        assert_eq!(seen, vec![SettingType::Main]);
    }

    #[test]
    fn test_observer_can_drop_another_subscription() {
        let mut store = SettingsStore::in_memory();
        let (tx, rx) = mpsc::channel();
        let other_tx = tx.clone();
        let other = store.subscribe(move |s, _| {
            let _ = other_tx.send(("other", s));
        });
        let slot = Arc::new(Mutex::new(Some(other)));
        let victim = Arc::clone(&slot);
        let _first = store.subscribe(move |s, _| {
            let _ = tx.send(("first", s));
            victim.lock().unwrap().take();
        });

        // "other" runs before "first" drops it, then stays gone.
        store.set(SettingType::Sfx, 0.2).unwrap();
        store.set(SettingType::Sfx, 0.4).unwrap();
        let seen: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            seen,
            vec![
                ("other", SettingType::Sfx),
                ("first", SettingType::Sfx),
                ("first", SettingType::Sfx),
            ]
        );
        assert_eq!(store.observer_count(), 1);
        assert!(slot.lock().unwrap().is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = SettingType::ALL.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SettingType::ALL.len());
    }
}
