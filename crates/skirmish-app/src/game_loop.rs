//! Game loop thread: runs the simulation engine at 60Hz and emits snapshots.
//!
//! The engine is created inside this thread so the thread owns it outright.
//! Commands arrive via an `mpsc` channel. Every snapshot is sent back on a
//! bounded channel and the latest one is kept in shared state for polling.
//! A driver that falls behind holds the loop back by at most
//! `SNAPSHOT_BUFFER` ticks.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use skirmish_core::constants::TICK_RATE;
use skirmish_core::state::GameStateSnapshot;
use skirmish_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{GameLoopCommand, GameLoopHandle};

/// Nominal duration of one tick at 1x speed.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Snapshots the loop may run ahead of its reader.
pub const SNAPSHOT_BUFFER: usize = 4;

/// How the loop thread runs.
pub struct LoopConfig {
    pub sim: SimConfig,
    /// Sleep between ticks to hold the tick rate. When false the loop runs
    /// as fast as it can.
    pub paced: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            paced: true,
        }
    }
}

/// Spawns the game loop in a new thread.
pub fn spawn_game_loop(config: LoopConfig) -> io::Result<GameLoopHandle> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let (snap_tx, snap_rx) = mpsc::sync_channel::<GameStateSnapshot>(SNAPSHOT_BUFFER);
    let latest_snapshot = Arc::new(Mutex::new(None));
    let shared = Arc::clone(&latest_snapshot);

    let join = std::thread::Builder::new()
        .name("skirmish-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &snap_tx, &shared);
        })?;

    Ok(GameLoopHandle {
        command_tx: cmd_tx,
        snapshots: snap_rx,
        latest_snapshot,
        join: Some(join),
    })
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: LoopConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: &mpsc::SyncSender<GameStateSnapshot>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut engine = SimulationEngine::new(config.sim);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::LoadLevel(level)) => {
                    if let Err(e) = engine.load_level(*level) {
                        log::error!("level rejected: {e}");
                    }
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Hand the snapshot to the driver; blocks while the buffer is
        // full, fails once the receiver is gone
        let _ = snap_tx.send(snapshot);

        if !config.paced {
            continue;
        }

        // 5. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind; reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::commands::PlayerCommand;
    use skirmish_core::enums::GamePhase;
    use skirmish_sim::level;

    fn unpaced() -> LoopConfig {
        LoopConfig {
            paced: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::StartLevel))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Pause))
            .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let commands: Vec<_> = rx.try_iter().collect();

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::StartLevel)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::Pause)
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_thread_loads_and_runs_level() {
        let handle = spawn_game_loop(unpaced()).unwrap();
        let level = level::builtin("training").unwrap();
        handle
            .command_tx
            .send(GameLoopCommand::LoadLevel(Box::new(level)))
            .unwrap();
        assert!(handle.send(PlayerCommand::StartLevel));

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut active = None;
        while Instant::now() < deadline {
            let snap = handle
                .snapshots
                .recv_timeout(Duration::from_secs(1))
                .unwrap();
            if snap.phase == GamePhase::Active && snap.time.tick >= 10 {
                active = Some(snap);
                break;
            }
        }
        let snap = active.expect("level became active");
        assert_eq!(snap.level.as_deref(), Some("Training"));
        assert!(handle.latest().is_some());
        handle.shutdown();
    }

    #[test]
    fn test_shutdown_with_full_buffer() {
        let handle = spawn_game_loop(unpaced()).unwrap();
        // Nobody reads; the loop parks on the full buffer.
        std::thread::sleep(Duration::from_millis(50));
        handle.shutdown();
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.load_level(level::builtin("arena").unwrap()).unwrap();
        engine.queue_command(PlayerCommand::StartLevel);

        // Run into the first wave so the snapshot has enemies in it
        for _ in 0..400 {
            engine.tick();
        }

        let snapshot = engine.tick();
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_pause_resume_via_commands() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.load_level(level::builtin("training").unwrap()).unwrap();

        engine.queue_command(PlayerCommand::StartLevel);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active);

        engine.queue_command(PlayerCommand::Pause);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Paused);
        let paused_tick = snap.time.tick;

        // Tick while paused; time should not advance
        let snap = engine.tick();
        assert_eq!(snap.time.tick, paused_tick);

        engine.queue_command(PlayerCommand::Resume);
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Active);
        assert!(snap.time.tick > paused_tick);
    }

    #[test]
    fn test_tick_duration_constant() {
        // 60Hz = 16.666ms per tick
        let expected_nanos = 1_000_000_000u64 / 60;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
