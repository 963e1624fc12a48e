//! Audio director: music crossfades, voice lines, and sound effects.
//!
//! Clips are opaque handles looked up by name. Playback itself goes through
//! an `AudioBackend`, so the director runs the same against a real mixer,
//! a logger, or a test recorder. Unknown cue names are logged and ignored.

use serde::{Deserialize, Serialize};

use skirmish_core::events::GameEvent;

use crate::settings::{SettingType, Settings};

/// Opaque handle to a loaded clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub u32);

/// A named clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub name: String,
    pub clip: ClipHandle,
}

/// Name-keyed cue tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioLibrary {
    #[serde(default)]
    pub music: Vec<Sound>,
    #[serde(default)]
    pub voice: Vec<Sound>,
    #[serde(default)]
    pub sfx: Vec<Sound>,
}

impl AudioLibrary {
    /// Cue names used by `cue_for_event`, with sequential handles.
    pub fn standard() -> Self {
        let table = |names: &[&str], base: u32| -> Vec<Sound> {
            names
                .iter()
                .zip(base..)
                .map(|(name, id)| Sound {
                    name: (*name).to_string(),
                    clip: ClipHandle(id),
                })
                .collect()
        };
        Self {
            music: table(&["menu", "combat", "victory", "game_over"], 100),
            voice: table(&["wave_incoming", "wave_cleared"], 200),
            sfx: table(
                &[
                    "shot_player",
                    "shot_enemy",
                    "reload",
                    "reload_done",
                    "player_hurt",
                    "enemy_death",
                    "low_health",
                    "pickup_ammo",
                    "pickup_health",
                    "loot_drop",
                ],
                300,
            ),
        }
    }

    fn find(table: &[Sound], name: &str) -> Option<ClipHandle> {
        table.iter().find(|s| s.name == name).map(|s| s.clip)
    }
}

/// Output channels. Music alternates between two channels while fading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    MusicA,
    MusicB,
    Voice,
    Sfx,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::MusicA => 0,
            Channel::MusicB => 1,
            Channel::Voice => 2,
            Channel::Sfx => 3,
        }
    }

    fn other_music(self) -> Channel {
        match self {
            Channel::MusicA => Channel::MusicB,
            _ => Channel::MusicA,
        }
    }
}

/// Where playback requests end up.
pub trait AudioBackend {
    /// Start `clip` on `channel`, replacing whatever it was playing.
    fn play(&mut self, channel: Channel, clip: ClipHandle, looping: bool);
    fn stop(&mut self, channel: Channel);
    fn set_volume(&mut self, channel: Channel, volume: f64);
    /// Fire-and-forget clip on the effects channel.
    fn play_one_shot(&mut self, clip: ClipHandle, volume: f64);
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn play(&mut self, channel: Channel, clip: ClipHandle, looping: bool) {
        (**self).play(channel, clip, looping)
    }
    fn stop(&mut self, channel: Channel) {
        (**self).stop(channel)
    }
    fn set_volume(&mut self, channel: Channel, volume: f64) {
        (**self).set_volume(channel, volume)
    }
    fn play_one_shot(&mut self, clip: ClipHandle, volume: f64) {
        (**self).play_one_shot(clip, volume)
    }
}

/// Backend that only logs, for headless runs.
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, channel: Channel, clip: ClipHandle, looping: bool) {
        log::debug!("audio: play {clip:?} on {channel:?} (loop: {looping})");
    }
    fn stop(&mut self, channel: Channel) {
        log::trace!("audio: stop {channel:?}");
    }
    fn set_volume(&mut self, channel: Channel, volume: f64) {
        log::trace!("audio: {channel:?} volume {volume:.2}");
    }
    fn play_one_shot(&mut self, clip: ClipHandle, volume: f64) {
        log::debug!("audio: one-shot {clip:?} at {volume:.2}");
    }
}

/// What a game event should sound like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Music(&'static str),
    Voice(&'static str),
    Sfx(&'static str),
}

/// Map a simulation event to an audio cue.
pub fn cue_for_event(event: &GameEvent) -> Option<Cue> {
    use skirmish_core::enums::{Faction, PickupKind};

    let cue = match event {
        GameEvent::WaveStarted { .. } => Cue::Voice("wave_incoming"),
        GameEvent::WaveCleared { .. } => Cue::Voice("wave_cleared"),
        GameEvent::AllWavesCleared => Cue::Music("victory"),
        GameEvent::ShotFired {
            faction: Faction::Player,
            ..
        } => Cue::Sfx("shot_player"),
        GameEvent::ShotFired {
            faction: Faction::Enemy,
            ..
        } => Cue::Sfx("shot_enemy"),
        GameEvent::ReloadStarted => Cue::Sfx("reload"),
        GameEvent::ReloadFinished => Cue::Sfx("reload_done"),
        GameEvent::PlayerDamaged { .. } => Cue::Sfx("player_hurt"),
        GameEvent::LowHealthEntered {
            faction: Faction::Player,
            ..
        } => Cue::Sfx("low_health"),
        GameEvent::PlayerDied => Cue::Music("game_over"),
        GameEvent::EnemyKilled { .. } => Cue::Sfx("enemy_death"),
        GameEvent::LootDropped { .. } => Cue::Sfx("loot_drop"),
        GameEvent::PickupCollected {
            kind: PickupKind::Ammo,
            ..
        } => Cue::Sfx("pickup_ammo"),
        GameEvent::PickupCollected {
            kind: PickupKind::Health,
            ..
        } => Cue::Sfx("pickup_health"),
        GameEvent::WaveSkipped { .. }
        | GameEvent::EnemySpawned { .. }
        | GameEvent::AgentStateChanged { .. }
        | GameEvent::LowHealthEntered { .. }
        | GameEvent::LowHealthCleared { .. } => return None,
    };
    Some(cue)
}

/// Crossfade in progress from `from` to its sibling music channel.
#[derive(Debug, Clone, Copy)]
struct Crossfade {
    from: Channel,
    to: Channel,
    from_start_volume: f64,
    elapsed: f64,
    duration: f64,
}

/// Plays music, voice, and effects with volumes taken from settings.
pub struct AudioDirector<B: AudioBackend> {
    backend: B,
    library: AudioLibrary,
    music_gain: f64,
    voice_gain: f64,
    sfx_gain: f64,
    active_music: Channel,
    /// Clip loaded on each channel, indexed by `Channel::index`.
    loaded: [Option<ClipHandle>; 4],
    volumes: [f64; 4],
    fade: Option<Crossfade>,
}

impl<B: AudioBackend> AudioDirector<B> {
    /// Apply the current volumes and start the first music track, if any,
    /// without fading.
    pub fn new(backend: B, library: AudioLibrary, settings: &Settings) -> Self {
        let mut director = Self {
            backend,
            library,
            music_gain: settings.music_gain(),
            voice_gain: settings.voice_gain(),
            sfx_gain: settings.sfx_gain(),
            active_music: Channel::MusicA,
            loaded: [None; 4],
            volumes: [0.0; 4],
            fade: None,
        };
        director.apply_volumes(settings);
        if let Some(first) = director.library.music.first().map(|s| s.clip) {
            director.start(Channel::MusicA, first, true);
        }
        director
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Clip currently audible as the main music track.
    pub fn current_music(&self) -> Option<ClipHandle> {
        self.loaded[self.active_music.index()]
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn volume(&self, channel: Channel) -> f64 {
        self.volumes[channel.index()]
    }

    /// Crossfade to the named track over `fade_secs`. Does nothing if the
    /// track is already the active one.
    pub fn play_music(&mut self, name: &str, fade_secs: f64) {
        let Some(clip) = AudioLibrary::find(&self.library.music, name) else {
            log::warn!("unknown music cue '{name}'");
            return;
        };
        if self.fade.is_none() && self.current_music() == Some(clip) {
            return;
        }

        // Restarting mid-fade begins a new fade from the track fading in.
        if let Some(fade) = self.fade.take() {
            self.backend.stop(fade.from);
            self.loaded[fade.from.index()] = None;
            self.active_music = fade.to;
        }

        let from = self.active_music;
        let to = from.other_music();
        self.start(to, clip, true);
        self.set_channel_volume(to, 0.0);
        self.fade = Some(Crossfade {
            from,
            to,
            from_start_volume: self.volume(from),
            elapsed: 0.0,
            duration: fade_secs.max(0.0),
        });
        self.update(0.0);
    }

    /// Advance an active crossfade by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let Some(mut fade) = self.fade else {
            return;
        };
        fade.elapsed += dt;
        let progress = if fade.duration > 0.0 {
            (fade.elapsed / fade.duration).min(1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            self.backend.stop(fade.from);
            self.loaded[fade.from.index()] = None;
            self.set_channel_volume(fade.from, 0.0);
            self.active_music = fade.to;
            self.set_channel_volume(fade.to, self.music_gain);
            self.fade = None;
            return;
        }

        self.set_channel_volume(fade.from, lerp(fade.from_start_volume, 0.0, progress));
        self.set_channel_volume(fade.to, lerp(0.0, self.music_gain, progress));
        self.fade = Some(fade);
    }

    /// Stop the current voice line and play the named one.
    pub fn play_voice(&mut self, name: &str) {
        let Some(clip) = AudioLibrary::find(&self.library.voice, name) else {
            log::warn!("unknown voice cue '{name}'");
            return;
        };
        self.backend.stop(Channel::Voice);
        self.start(Channel::Voice, clip, false);
    }

    pub fn play_sfx(&mut self, name: &str) {
        let Some(clip) = AudioLibrary::find(&self.library.sfx, name) else {
            log::warn!("unknown sfx cue '{name}'");
            return;
        };
        self.backend.play_one_shot(clip, self.sfx_gain);
    }

    pub fn play_cue(&mut self, cue: Cue, music_fade_secs: f64) {
        match cue {
            Cue::Music(name) => self.play_music(name, music_fade_secs),
            Cue::Voice(name) => self.play_voice(name),
            Cue::Sfx(name) => self.play_sfx(name),
        }
    }

    /// Recompute channel volumes. While a crossfade runs the fade owns the
    /// music channels and picks up the new level as it progresses.
    pub fn apply_volumes(&mut self, settings: &Settings) {
        self.music_gain = settings.music_gain();
        self.voice_gain = settings.voice_gain();
        self.sfx_gain = settings.sfx_gain();

        if self.fade.is_none() {
            self.set_channel_volume(self.active_music, self.music_gain);
        }
        self.set_channel_volume(Channel::Voice, self.voice_gain);
        self.set_channel_volume(Channel::Sfx, self.sfx_gain);
    }

    /// Settings observer hook: only volume settings matter here.
    pub fn on_settings_changed(&mut self, setting: SettingType, settings: &Settings) {
        if setting.is_volume() {
            self.apply_volumes(settings);
        }
    }

    fn start(&mut self, channel: Channel, clip: ClipHandle, looping: bool) {
        self.loaded[channel.index()] = Some(clip);
        self.backend.play(channel, clip, looping);
    }

    fn set_channel_volume(&mut self, channel: Channel, volume: f64) {
        self.volumes[channel.index()] = volume;
        self.backend.set_volume(channel, volume);
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(Channel, ClipHandle),
        Stop(Channel),
        OneShot(ClipHandle, f64),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, channel: Channel, clip: ClipHandle, _looping: bool) {
            self.calls.push(Call::Play(channel, clip));
        }
        fn stop(&mut self, channel: Channel) {
            self.calls.push(Call::Stop(channel));
        }
        fn set_volume(&mut self, _channel: Channel, _volume: f64) {}
        fn play_one_shot(&mut self, clip: ClipHandle, volume: f64) {
            self.calls.push(Call::OneShot(clip, volume));
        }
    }

    fn director_with(settings: &Settings) -> AudioDirector<Recorder> {
        AudioDirector::new(Recorder::default(), AudioLibrary::standard(), settings)
    }

    #[test]
    fn test_first_track_starts_without_fade() {
        let d = director_with(&Settings::default());
        assert_eq!(d.current_music(), Some(ClipHandle(100)));
        assert!(!d.is_fading());
        assert_eq!(d.volume(Channel::MusicA), 1.0);
        assert_eq!(d.backend().calls, vec![Call::Play(Channel::MusicA, ClipHandle(100))]);
    }

    #[test]
    fn test_crossfade_midpoint_and_end() {
        let mut d = director_with(&Settings::default());
        d.play_music("combat", 1.0);
        assert!(d.is_fading());
        assert_eq!(d.current_music(), Some(ClipHandle(100)));

        d.update(0.5);
        assert!((d.volume(Channel::MusicA) - 0.5).abs() < 1e-9);
        assert!((d.volume(Channel::MusicB) - 0.5).abs() < 1e-9);

        d.update(0.6);
        assert!(!d.is_fading());
        assert_eq!(d.current_music(), Some(ClipHandle(101)));
        assert_eq!(d.volume(Channel::MusicA), 0.0);
        assert_eq!(d.volume(Channel::MusicB), 1.0);
        assert!(d.backend().calls.contains(&Call::Stop(Channel::MusicA)));
    }

    #[test]
    fn test_same_track_is_noop() {
        let mut d = director_with(&Settings::default());
        d.play_music("menu", 1.0);
        assert!(!d.is_fading());
        assert_eq!(d.backend().calls.len(), 1);
    }

    #[test]
    fn test_zero_duration_switches_immediately() {
        let mut d = director_with(&Settings::default());
        d.play_music("victory", 0.0);
        assert!(!d.is_fading());
        assert_eq!(d.current_music(), Some(ClipHandle(102)));
    }

    #[test]
    fn test_new_fade_interrupts_running_one() {
        let mut d = director_with(&Settings::default());
        d.play_music("combat", 2.0);
        d.update(0.5);
        d.play_music("game_over", 1.0);
        d.update(1.0);
        assert_eq!(d.current_music(), Some(ClipHandle(103)));
        // Combat was on B when interrupted, so game_over lands on A.
        assert_eq!(d.volume(Channel::MusicA), 1.0);
        assert_eq!(d.volume(Channel::MusicB), 0.0);
    }

    #[test]
    fn test_voice_stops_previous_line() {
        let mut d = director_with(&Settings::default());
        d.play_voice("wave_incoming");
        d.play_voice("wave_cleared");
        let calls = &d.backend().calls[1..];
        assert_eq!(
            calls,
            &[
                Call::Stop(Channel::Voice),
                Call::Play(Channel::Voice, ClipHandle(200)),
                Call::Stop(Channel::Voice),
                Call::Play(Channel::Voice, ClipHandle(201)),
            ]
        );
    }

    #[test]
    fn test_unknown_cues_are_ignored() {
        let mut d = director_with(&Settings::default());
        d.play_music("polka", 1.0);
        d.play_voice("nobody");
        d.play_sfx("kazoo");
        assert!(!d.is_fading());
        assert_eq!(d.backend().calls.len(), 1);
    }

    #[test]
    fn test_volumes_follow_settings() {
        let mut store = SettingsStore::in_memory();
        let mut d = director_with(store.values());

        store.set(SettingType::Main, 0.5).unwrap();
        d.on_settings_changed(SettingType::Main, store.values());
        store.set(SettingType::Sfx, 0.5).unwrap();
        d.on_settings_changed(SettingType::Sfx, store.values());

        assert!((d.volume(Channel::MusicA) - 0.5).abs() < 1e-12);
        assert!((d.volume(Channel::Voice) - 0.5).abs() < 1e-12);
        assert!((d.volume(Channel::Sfx) - 0.25).abs() < 1e-12);

        d.play_sfx("reload");
        assert_eq!(
            d.backend().calls.last(),
            Some(&Call::OneShot(ClipHandle(302), 0.25))
        );
    }

    #[test]
    fn test_non_volume_settings_ignored() {
        let mut store = SettingsStore::in_memory();
        let mut d = director_with(store.values());
        store.set(SettingType::Main, 0.2).unwrap();
        d.on_settings_changed(SettingType::MouseX, store.values());
        assert_eq!(d.volume(Channel::MusicA), 1.0);
    }

    #[test]
    fn test_event_cues() {
        use skirmish_core::enums::{Faction, PickupKind};
        use skirmish_core::types::Position;

        assert_eq!(
            cue_for_event(&GameEvent::ShotFired {
                faction: Faction::Enemy,
                position: Position::default()
            }),
            Some(Cue::Sfx("shot_enemy"))
        );
        assert_eq!(
            cue_for_event(&GameEvent::PickupCollected {
                kind: PickupKind::Health,
                amount: 25
            }),
            Some(Cue::Sfx("pickup_health"))
        );
        assert_eq!(cue_for_event(&GameEvent::PlayerDied), Some(Cue::Music("game_over")));
        assert_eq!(
            cue_for_event(&GameEvent::LowHealthEntered {
                id: 1,
                faction: Faction::Enemy
            }),
            None
        );

        // Every cue the mapping can produce exists in the standard library.
        let lib = AudioLibrary::standard();
        for cue in [
            "shot_player",
            "shot_enemy",
            "reload",
            "reload_done",
            "player_hurt",
            "enemy_death",
            "low_health",
            "pickup_ammo",
            "pickup_health",
            "loot_drop",
        ] {
            assert!(AudioLibrary::find(&lib.sfx, cue).is_some(), "{cue}");
        }
    }
}
