//! Application services, built once at startup and passed explicitly.
//!
//! `Services` bundles the settings store, the audio director, and the scene
//! transition. Settings changes flow to audio directly and to the game loop
//! through a scoped settings subscription.

use std::path::Path;
use std::sync::mpsc;

use skirmish_core::commands::PlayerCommand;
use skirmish_core::constants::DT;
use skirmish_core::state::GameStateSnapshot;
use skirmish_sim::level::{self, LevelConfig, LevelError};

use crate::audio::{cue_for_event, AudioBackend, AudioDirector, AudioLibrary};
use crate::error::AppError;
use crate::settings::{SettingType, SettingsError, SettingsStore, Subscription};
use crate::state::GameLoopCommand;
use crate::transition::{SceneLoader, SceneTransition};

/// Scene name that returns to the main menu.
pub const MENU_SCENE: &str = "menu";

pub const DEFAULT_FADE_SECS: f64 = 1.0;
pub const DEFAULT_MUSIC_FADE_SECS: f64 = 1.0;

pub struct Services<B: AudioBackend> {
    pub settings: SettingsStore,
    pub audio: AudioDirector<B>,
    pub transition: SceneTransition,
    music_fade_secs: f64,
    sensitivity_link: Option<Subscription>,
}

impl<B: AudioBackend> Services<B> {
    pub fn new(settings: SettingsStore, backend: B, library: AudioLibrary) -> Self {
        let audio = AudioDirector::new(backend, library, settings.values());
        Self {
            settings,
            audio,
            transition: SceneTransition::new(DEFAULT_FADE_SECS),
            music_fade_secs: DEFAULT_MUSIC_FADE_SECS,
            sensitivity_link: None,
        }
    }

    /// Change a setting and re-apply audio volumes.
    pub fn set_setting(&mut self, setting: SettingType, value: f64) -> Result<(), SettingsError> {
        let saved = self.settings.set(setting, value);
        self.audio.on_settings_changed(setting, self.settings.values());
        saved
    }

    /// Keep the game loop's aim turn rate in step with the horizontal mouse
    /// sensitivity. Sends the current value right away.
    pub fn link_look_sensitivity(&mut self, tx: mpsc::Sender<GameLoopCommand>) {
        let send = |tx: &mpsc::Sender<GameLoopCommand>, sensitivity: f64| {
            let _ = tx.send(GameLoopCommand::PlayerCommand(
                PlayerCommand::SetLookSensitivity { sensitivity },
            ));
        };
        send(&tx, self.settings.get(SettingType::MouseX));
        self.sensitivity_link = Some(self.settings.subscribe(move |setting, values| {
            if setting == SettingType::MouseX {
                send(&tx, values.mouse_sensitivity_x);
            }
        }));
    }

    /// Drop the game loop link; later sensitivity changes stay local.
    pub fn unlink_look_sensitivity(&mut self) {
        self.sensitivity_link = None;
    }

    /// Play the audio cues for every event in the snapshot.
    pub fn handle_snapshot(&mut self, snapshot: &GameStateSnapshot) {
        for event in &snapshot.events {
            if let Some(cue) = cue_for_event(event) {
                self.audio.play_cue(cue, self.music_fade_secs);
            }
        }
    }

    /// Advance fades by one tick.
    pub fn update<L: SceneLoader + ?Sized>(&mut self, loader: &mut L) {
        self.audio.update(DT);
        self.transition.update(DT, loader);
    }
}

/// Turn a scene name into game loop commands: the menu, a built-in level,
/// or a level file path.
pub fn resolve_scene(name: &str) -> Result<Vec<GameLoopCommand>, LevelError> {
    if name == MENU_SCENE {
        return Ok(vec![GameLoopCommand::PlayerCommand(
            PlayerCommand::ReturnToMenu,
        )]);
    }
    let config = match level::builtin(name) {
        Ok(config) => config,
        Err(LevelError::UnknownBuiltin(_)) => LevelConfig::load(Path::new(name))?,
        Err(e) => return Err(e),
    };
    config.validate(&config.build_grid()?)?;
    Ok(vec![
        GameLoopCommand::LoadLevel(Box::new(config)),
        GameLoopCommand::PlayerCommand(PlayerCommand::StartLevel),
    ])
}

/// Loads scenes by sending commands to the game loop thread.
pub struct ChannelSceneLoader {
    tx: mpsc::Sender<GameLoopCommand>,
    error: Option<AppError>,
}

impl ChannelSceneLoader {
    pub fn new(tx: mpsc::Sender<GameLoopCommand>) -> Self {
        Self { tx, error: None }
    }

    /// The error from the last failed load, if any.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }
}

impl SceneLoader for ChannelSceneLoader {
    fn load_scene(&mut self, name: &str) {
        let commands = match resolve_scene(name) {
            Ok(commands) => commands,
            Err(e) => {
                log::error!("cannot load scene '{name}': {e}");
                self.error = Some(e.into());
                return;
            }
        };
        for command in commands {
            if self.tx.send(command).is_err() {
                self.error = Some(AppError::LoopStopped);
                return;
            }
        }
    }
}
