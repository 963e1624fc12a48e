//! Headless session driver: loads a scene through the transition, feeds
//! snapshots to the services, and optionally lets the autopilot play.

use skirmish_core::enums::{Faction, GamePhase};
use skirmish_core::events::GameEvent;
use skirmish_core::state::GameStateSnapshot;
use skirmish_sim::SimConfig;

use crate::audio::AudioBackend;
use crate::autopilot::Autopilot;
use crate::error::AppError;
use crate::game_loop::{spawn_game_loop, LoopConfig};
use crate::services::{resolve_scene, ChannelSceneLoader, Services};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Built-in level name, level file path, or `menu`.
    pub scene: String,
    pub seed: u64,
    /// Stop after this many simulation ticks.
    pub max_ticks: u64,
    /// Hold the loop to wall-clock time.
    pub realtime: bool,
    pub autopilot: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scene: "training".into(),
            seed: SimConfig::default().seed,
            max_ticks: 60 * 60 * 5,
            realtime: true,
            autopilot: true,
        }
    }
}

/// What happened during a run, tallied from snapshot events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub phase: GamePhase,
    pub level: Option<String>,
    pub waves_cleared: u32,
    pub enemies_spawned: u32,
    pub kills: u32,
    pub shots_fired: u32,
    pub damage_taken: u32,
    pub pickups_collected: u32,
}

impl RunSummary {
    fn record(&mut self, snapshot: &GameStateSnapshot) {
        self.ticks = snapshot.time.tick;
        self.phase = snapshot.phase;
        if snapshot.level.is_some() {
            self.level.clone_from(&snapshot.level);
        }
        for event in &snapshot.events {
            match event {
                GameEvent::WaveCleared { .. } => self.waves_cleared += 1,
                GameEvent::EnemySpawned { .. } => self.enemies_spawned += 1,
                GameEvent::EnemyKilled { .. } => self.kills += 1,
                GameEvent::ShotFired {
                    faction: Faction::Player,
                    ..
                } => self.shots_fired += 1,
                GameEvent::PlayerDamaged { amount, .. } => self.damage_taken += amount,
                GameEvent::PickupCollected { .. } => self.pickups_collected += 1,
                _ => {}
            }
        }
    }
}

/// Play one scene until the level ends, the tick limit is hit, or the
/// session settles in the menu.
pub fn run<B: AudioBackend>(
    options: &RunOptions,
    services: &mut Services<B>,
) -> Result<RunSummary, AppError> {
    // Reject a bad scene before anything starts.
    resolve_scene(&options.scene)?;

    let handle = spawn_game_loop(LoopConfig {
        sim: SimConfig {
            seed: options.seed,
            ..Default::default()
        },
        paced: options.realtime,
    })
    .map_err(AppError::Thread)?;
    log::info!(
        "running '{}' (seed {}, up to {} ticks)",
        options.scene,
        options.seed,
        options.max_ticks
    );

    services.link_look_sensitivity(handle.command_tx.clone());
    let mut loader = ChannelSceneLoader::new(handle.command_tx.clone());
    services.transition.load_scene(&options.scene);

    let mut pilot = Autopilot::new();
    let mut summary = RunSummary::default();
    let outcome = loop {
        let Ok(snapshot) = handle.snapshots.recv() else {
            break Err(AppError::LoopStopped);
        };
        services.update(&mut loader);
        if let Some(e) = loader.take_error() {
            break Err(e);
        }
        services.handle_snapshot(&snapshot);
        summary.record(&snapshot);

        if snapshot.phase.is_finished() || snapshot.time.tick >= options.max_ticks {
            break Ok(());
        }
        if !services.transition.is_busy() && snapshot.phase == GamePhase::MainMenu {
            log::info!("session is in the menu, nothing to play");
            break Ok(());
        }

        if options.autopilot && !services.transition.blocks_input() {
            let sent = pilot.plan(&snapshot).into_iter().all(|c| handle.send(c));
            if !sent {
                break Err(AppError::LoopStopped);
            }
        }
    };

    services.unlink_look_sensitivity();
    handle.shutdown();
    outcome?;
    log::info!(
        "run ended at tick {} in {:?}: {} kills, {} waves cleared",
        summary.ticks,
        summary.phase,
        summary.kills,
        summary.waves_cleared
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioLibrary, LogBackend};
    use crate::settings::SettingsStore;

    fn services() -> Services<LogBackend> {
        Services::new(
            SettingsStore::in_memory(),
            LogBackend,
            AudioLibrary::standard(),
        )
    }

    fn headless(scene: &str, max_ticks: u64) -> RunOptions {
        RunOptions {
            scene: scene.into(),
            max_ticks,
            realtime: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_training_run_spawns_and_fights() {
        let mut s = services();
        let summary = run(&headless("training", 600), &mut s).unwrap();

        assert_eq!(summary.level.as_deref(), Some("Training"));
        assert_ne!(summary.phase, GamePhase::MainMenu);
        assert!(summary.enemies_spawned >= 1);
        assert!(summary.ticks > 0);
        assert_eq!(s.settings.observer_count(), 0, "link dropped after run");
        assert!(!s.transition.is_busy());
    }

    #[test]
    fn test_tick_limit_stops_run() {
        let mut s = services();
        let options = RunOptions {
            autopilot: false,
            ..headless("arena", 30)
        };
        let summary = run(&options, &mut s).unwrap();
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.phase, GamePhase::Active);
        assert_eq!(summary.shots_fired, 0);
    }

    #[test]
    fn test_menu_scene_ends_in_menu() {
        let mut s = services();
        let summary = run(&headless("menu", 100), &mut s).unwrap();
        assert_eq!(summary.phase, GamePhase::MainMenu);
        assert_eq!(summary.ticks, 0);
    }

    #[test]
    fn test_unknown_scene_is_an_error() {
        let mut s = services();
        let err = run(&headless("/no/such/level.json", 100), &mut s).unwrap_err();
        assert!(matches!(err, AppError::Level(_)));
    }

    #[test]
    fn test_summary_tallies_events() {
        let mut summary = RunSummary::default();
        let snapshot = GameStateSnapshot {
            phase: GamePhase::Active,
            events: vec![
                GameEvent::ShotFired {
                    faction: Faction::Player,
                    position: Default::default(),
                },
                GameEvent::ShotFired {
                    faction: Faction::Enemy,
                    position: Default::default(),
                },
                GameEvent::PlayerDamaged {
                    amount: 10,
                    remaining: 90,
                },
                GameEvent::PlayerDamaged {
                    amount: 10,
                    remaining: 80,
                },
                GameEvent::WaveCleared { index: 0 },
            ],
            ..Default::default()
        };
        summary.record(&snapshot);
        assert_eq!(summary.shots_fired, 1);
        assert_eq!(summary.damage_taken, 20);
        assert_eq!(summary.waves_cleared, 1);
        assert_eq!(summary.phase, GamePhase::Active);
    }
}
