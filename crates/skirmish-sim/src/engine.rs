//! Simulation engine, the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. It is completely
//! headless, which keeps it deterministic and testable.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skirmish_core::commands::PlayerCommand;
use skirmish_core::components::{Player, PlayerInput, PlayerMotor};
use skirmish_core::constants::{DT, LOOK_SENSITIVITY_MULTIPLIER};
use skirmish_core::enums::GamePhase;
use skirmish_core::events::GameEvent;
use skirmish_core::state::GameStateSnapshot;
use skirmish_core::types::SimTime;
use skirmish_nav::NavGrid;

use crate::level::{LevelConfig, LevelError};
use crate::systems;
use crate::systems::ammo_spawner::AmmoSpawner;
use crate::wave_director::WaveDirector;
use crate::world_setup;

/// Lowest and highest accepted look sensitivity.
pub const LOOK_SENSITIVITY_RANGE: (f64, f64) = (0.1, 5.0);

/// Configuration for starting a new simulation.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
        }
    }
}

/// A level that passed validation, together with its navigation grid.
struct LoadedLevel {
    config: LevelConfig,
    grid: NavGrid,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,

    level: Option<LoadedLevel>,
    director: WaveDirector,
    ammo_spawner: Option<AmmoSpawner>,
    /// Kill notifications waiting for the director, drained each tick.
    pending_kills: VecDeque<u64>,
    look_sensitivity: f64,
    missing_player_logged: bool,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            level: None,
            director: WaveDirector::default(),
            ammo_spawner: None,
            pending_kills: VecDeque::new(),
            look_sensitivity: 1.0,
            missing_player_logged: false,
        }
    }

    /// Validate `config` and make it the level started by the next
    /// `StartLevel`. Any running level is abandoned and the engine returns
    /// to the main menu.
    pub fn load_level(&mut self, config: LevelConfig) -> Result<(), LevelError> {
        let grid = config.build_grid()?;
        config.validate(&grid)?;
        log::info!(
            "loaded level '{}' ({}x{} cells, {} waves)",
            config.name,
            grid.header.width,
            grid.header.height,
            config.waves.len()
        );
        self.reset_world();
        self.phase = GamePhase::MainMenu;
        self.level = Some(LoadedLevel { config, grid });
        Ok(())
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.level_name(),
            self.director.view(),
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Name of the loaded level, if any.
    pub fn level_name(&self) -> Option<&str> {
        self.level.as_ref().map(|l| l.config.name.as_str())
    }

    pub fn look_sensitivity(&self) -> f64 {
        self.look_sensitivity
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get a read-only reference to the wave director.
    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    /// Mutable world access for tests that stage specific situations.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn an enemy outside of the wave director (for testing).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        archetype: skirmish_core::enums::EnemyArchetype,
        position: skirmish_core::types::Position,
    ) -> hecs::Entity {
        let level = self.level.as_ref().expect("level loaded");
        world_setup::spawn_enemy(&mut self.world, &level.grid, &mut self.rng, archetype, position)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetMoveInput { x, y } => {
                self.with_player_input(|input| {
                    input.move_x = x;
                    input.move_y = y;
                });
            }
            PlayerCommand::SetAimTarget { target } => {
                self.with_player_input(|input| input.aim_target = Some(target));
            }
            PlayerCommand::SetTrigger { pressed } => {
                self.with_player_input(|input| input.trigger = pressed);
            }
            PlayerCommand::StartLevel => {
                if self.phase == GamePhase::MainMenu {
                    self.start_level();
                }
            }
            PlayerCommand::ReturnToMenu => {
                if self.phase != GamePhase::MainMenu {
                    log::info!("returning to menu at tick {}", self.time.tick);
                    self.reset_world();
                    self.phase = GamePhase::MainMenu;
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::SetLookSensitivity { sensitivity } => {
                let (lo, hi) = LOOK_SENSITIVITY_RANGE;
                self.look_sensitivity = sensitivity.clamp(lo, hi);
                let turn_rate = self.look_sensitivity * LOOK_SENSITIVITY_MULTIPLIER;
                for (_entity, (_player, motor)) in
                    self.world.query_mut::<(&Player, &mut PlayerMotor)>()
                {
                    motor.turn_rate_deg = turn_rate;
                }
            }
        }
    }

    fn with_player_input(&mut self, f: impl Fn(&mut PlayerInput)) {
        for (_entity, (_player, input)) in self.world.query_mut::<(&Player, &mut PlayerInput)>() {
            f(input);
        }
    }

    /// Populate the world from the loaded level and enter Active.
    fn start_level(&mut self) {
        let Some(level) = self.level.as_ref() else {
            log::warn!("StartLevel ignored: no level loaded");
            return;
        };
        let config = &level.config;

        self.world.clear();
        self.despawn_buffer.clear();
        self.events.clear();
        self.pending_kills.clear();
        self.missing_player_logged = false;

        world_setup::spawn_player(&mut self.world, config.player_spawn, self.look_sensitivity);
        self.director = WaveDirector::new(
            config.waves.clone(),
            config.spawn_points.clone(),
            config.initial_delay_secs,
            config.time_between_waves_secs,
        );
        self.ammo_spawner = config.ammo_spawner.clone().map(AmmoSpawner::new);

        log::info!(
            "level '{}' started: {} waves over {} spawn points",
            config.name,
            config.waves.len(),
            config.spawn_points.len()
        );
        self.phase = GamePhase::Active;
        self.time = SimTime::default();
    }

    fn reset_world(&mut self) {
        self.world.clear();
        self.time = SimTime::default();
        self.despawn_buffer.clear();
        self.events.clear();
        self.pending_kills.clear();
        self.director = WaveDirector::default();
        self.ammo_spawner = None;
        self.missing_player_logged = false;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let Some(level) = self.level.as_ref() else {
            return;
        };
        let grid = &level.grid;
        let now = self.time.elapsed_secs;

        // 1. Deliver kill notifications to the director
        while self.pending_kills.pop_front().is_some() {
            self.director.notify_kill();
        }
        // 2. Wave director and enemy spawns
        systems::waves::run(
            &mut self.world,
            &mut self.director,
            grid,
            &mut self.rng,
            &mut self.events,
        );
        // 3. Ammo spawner
        if let Some(spawner) = self.ammo_spawner.as_mut() {
            spawner.run(&mut self.world, &mut self.rng, DT);
        }
        // 4. Player movement and aim
        systems::player_control::run(&mut self.world, grid, DT);
        // 5. Enemy AI (state machine, navigation, enemy fire)
        systems::enemy_ai::run(
            &mut self.world,
            grid,
            &mut self.rng,
            now,
            DT,
            &mut self.events,
            &mut self.missing_player_logged,
        );
        // 6. Player weapon
        systems::weapons::run(&mut self.world, now, DT, &mut self.events);
        // 7. Movement integration
        systems::movement::run(&mut self.world, DT);
        // 8. Projectile impacts and damage
        let hits = systems::projectiles::run(&mut self.world, grid, DT, &mut self.despawn_buffer);
        let casualties = systems::damage::run(
            &mut self.world,
            &mut self.rng,
            &hits,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        self.pending_kills.extend(casualties.killed);
        // 9. Pickups
        systems::pickups::run(&mut self.world, &mut self.events, &mut self.despawn_buffer);
        // 10. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        if casualties.player_died {
            log::info!("game over at tick {}", self.time.tick);
            self.phase = GamePhase::GameOver;
        } else if self.director.is_complete() {
            log::info!("victory at tick {}", self.time.tick);
            self.phase = GamePhase::Victory;
        }
    }
}
