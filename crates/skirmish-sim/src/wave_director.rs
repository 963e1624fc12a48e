//! WaveDirector: sequences timed enemy spawn batches across spawn points.
//!
//! An explicit stage machine advanced once per tick. All waits are counted
//! in whole ticks so spawn spacing is exact at the fixed tick rate. The
//! director only issues spawn orders; the engine instantiates the enemies
//! and reports kills back through `notify_kill`.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use skirmish_core::enums::EnemyArchetype;
use skirmish_core::events::GameEvent;
use skirmish_core::state::WaveView;
use skirmish_core::types::{secs_to_ticks, Position};

/// One authored wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub name: String,
    /// Archetypes to draw from, uniformly per spawn. Empty skips the wave.
    #[serde(default)]
    pub archetypes: Vec<EnemyArchetype>,
    pub count: u32,
    /// Spawns per second.
    pub spawn_rate: f64,
}

/// Request to place one enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub archetype: EnemyArchetype,
    pub point: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Disabled,
    InitialDelay { ticks_left: u64 },
    Spawning { spawned: u32, ticks_left: u64 },
    AwaitingClear,
    Intermission { ticks_left: u64 },
    Complete,
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    waves: Vec<Wave>,
    spawn_points: Vec<Position>,
    time_between_waves_secs: f64,
    stage: Stage,
    current_wave: usize,
    enemies_alive: u32,
}

impl Default for WaveDirector {
    /// A director with nothing to run.
    fn default() -> Self {
        Self {
            waves: Vec::new(),
            spawn_points: Vec::new(),
            time_between_waves_secs: 0.0,
            stage: Stage::Disabled,
            current_wave: 0,
            enemies_alive: 0,
        }
    }
}

impl WaveDirector {
    /// Create a director. With no spawn points it is permanently disabled.
    pub fn new(
        waves: Vec<Wave>,
        spawn_points: Vec<Position>,
        initial_delay_secs: f64,
        time_between_waves_secs: f64,
    ) -> Self {
        let stage = if spawn_points.is_empty() {
            log::error!("wave director has no spawn points; waves disabled");
            Stage::Disabled
        } else {
            Stage::InitialDelay {
                ticks_left: secs_to_ticks(initial_delay_secs),
            }
        };
        Self {
            waves,
            spawn_points,
            time_between_waves_secs,
            stage,
            current_wave: 0,
            enemies_alive: 0,
        }
    }

    /// 0-based index of the wave being run (or about to run).
    pub fn current_wave(&self) -> usize {
        self.current_wave
    }

    pub fn total_waves(&self) -> usize {
        self.waves.len()
    }

    pub fn enemies_alive(&self) -> u32 {
        self.enemies_alive
    }

    pub fn is_disabled(&self) -> bool {
        self.stage == Stage::Disabled
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Complete
    }

    /// Record one enemy death. The counter saturates at zero.
    pub fn notify_kill(&mut self) {
        match self.enemies_alive.checked_sub(1) {
            Some(n) => self.enemies_alive = n,
            None => log::warn!(
                "kill notification with no live enemies (wave {})",
                self.current_wave
            ),
        }
    }

    /// Advance by one tick. Returns the spawn orders issued this tick and
    /// pushes wave events onto `events`.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Vec<SpawnOrder> {
        let mut orders = Vec::new();
        self.count_down();
        while self.step(rng, events, &mut orders) {}
        orders
    }

    pub fn view(&self) -> WaveView {
        let current_wave = match self.stage {
            Stage::Disabled | Stage::InitialDelay { .. } => 0,
            Stage::Complete => self.waves.len(),
            _ => self.current_wave + 1,
        };
        WaveView {
            current_wave,
            total_waves: self.waves.len(),
            enemies_alive: self.enemies_alive,
            finished: self.is_complete(),
            disabled: self.is_disabled(),
        }
    }

    fn count_down(&mut self) {
        match &mut self.stage {
            Stage::InitialDelay { ticks_left }
            | Stage::Spawning { ticks_left, .. }
            | Stage::Intermission { ticks_left } => {
                *ticks_left = ticks_left.saturating_sub(1);
            }
            _ => {}
        }
    }

    /// Perform any transition that is due. Returns true if the stage changed
    /// and should be re-examined within the same tick.
    fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
        orders: &mut Vec<SpawnOrder>,
    ) -> bool {
        match self.stage {
            Stage::Disabled | Stage::Complete => false,
            Stage::InitialDelay { ticks_left: 0 } => {
                self.begin_wave(events);
                true
            }
            Stage::Spawning {
                spawned,
                ticks_left: 0,
            } => {
                let wave = &self.waves[self.current_wave];
                if spawned >= wave.count {
                    self.stage = Stage::AwaitingClear;
                    return true;
                }
                let (Some(&archetype), Some(&point)) = (
                    wave.archetypes.choose(rng),
                    self.spawn_points.choose(rng),
                ) else {
                    self.stage = Stage::AwaitingClear;
                    return true;
                };
                orders.push(SpawnOrder { archetype, point });
                self.stage = Stage::Spawning {
                    spawned: spawned + 1,
                    ticks_left: spawn_interval_ticks(wave.spawn_rate),
                };
                true
            }
            Stage::AwaitingClear if self.enemies_alive == 0 => {
                log::info!("wave {} cleared", self.current_wave + 1);
                events.push(GameEvent::WaveCleared {
                    index: self.current_wave,
                });
                self.enter_intermission();
                true
            }
            Stage::Intermission { ticks_left: 0 } => {
                self.current_wave += 1;
                self.begin_wave(events);
                true
            }
            _ => false,
        }
    }

    fn begin_wave(&mut self, events: &mut Vec<GameEvent>) {
        let Some(wave) = self.waves.get(self.current_wave) else {
            log::info!("all {} waves cleared", self.waves.len());
            events.push(GameEvent::AllWavesCleared);
            self.stage = Stage::Complete;
            return;
        };

        if wave.archetypes.is_empty() {
            log::warn!(
                "wave {} ({}) has no enemy archetypes; skipping",
                self.current_wave + 1,
                wave.name
            );
            events.push(GameEvent::WaveSkipped {
                index: self.current_wave,
                name: wave.name.clone(),
            });
            self.enter_intermission();
            return;
        }

        log::info!(
            "wave {} ({}) starting: {} enemies",
            self.current_wave + 1,
            wave.name,
            wave.count
        );
        events.push(GameEvent::WaveStarted {
            index: self.current_wave,
            name: wave.name.clone(),
            count: wave.count,
        });
        self.enemies_alive = wave.count;
        self.stage = Stage::Spawning {
            spawned: 0,
            ticks_left: 0,
        };
    }

    fn enter_intermission(&mut self) {
        self.stage = Stage::Intermission {
            ticks_left: secs_to_ticks(self.time_between_waves_secs),
        };
    }
}

/// Ticks to wait after each spawn for a rate in spawns per second.
fn spawn_interval_ticks(spawn_rate: f64) -> u64 {
    if spawn_rate > 0.0 && spawn_rate.is_finite() {
        secs_to_ticks(1.0 / spawn_rate)
    } else {
        0
    }
}
