//! A simple bot that plays the level from snapshots.
//!
//! The headless runner has no keyboard or mouse. The autopilot stands in for
//! the player: aim at the nearest enemy, shoot when it is in range, keep some
//! distance, and fetch pickups when ammo or health runs out. It only emits
//! commands whose value changed since the last call.

use skirmish_core::commands::PlayerCommand;
use skirmish_core::enums::{GamePhase, PickupKind, WeaponState};
use skirmish_core::state::{GameStateSnapshot, PlayerView};
use skirmish_core::types::Position;

/// Open fire at enemies closer than this.
pub const ENGAGE_RANGE: f64 = 9.0;
/// Back away from enemies closer than this.
pub const KEEP_AWAY_RANGE: f64 = 4.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    last_move: Option<(f64, f64)>,
    last_aim: Option<Position>,
    last_trigger: Option<bool>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands for the next tick.
    pub fn plan(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        let Some(player) = snapshot.player.as_ref() else {
            return commands;
        };
        if snapshot.phase != GamePhase::Active {
            // Let go of everything so nothing is held through a pause.
            self.set_move(&mut commands, (0.0, 0.0));
            self.set_trigger(&mut commands, false);
            return commands;
        }

        let nearest = snapshot
            .enemies
            .iter()
            .map(|e| (e.position, player.position.distance_to(&e.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let movement = match wanted_pickup(player, snapshot) {
            Some(goal) => toward(player.position, goal),
            None => match nearest {
                Some((enemy, dist)) if dist < KEEP_AWAY_RANGE => {
                    let (x, y) = toward(player.position, enemy);
                    (-x, -y)
                }
                Some((enemy, dist)) if dist > ENGAGE_RANGE => toward(player.position, enemy),
                _ => (0.0, 0.0),
            },
        };
        self.set_move(&mut commands, movement);

        let trigger = match nearest {
            Some((enemy, dist)) => {
                if self.last_aim != Some(enemy) {
                    self.last_aim = Some(enemy);
                    commands.push(PlayerCommand::SetAimTarget { target: enemy });
                }
                dist <= ENGAGE_RANGE
                    && player.ammo > 0
                    && player.weapon_state == WeaponState::Ready
            }
            None => false,
        };
        self.set_trigger(&mut commands, trigger);
        commands
    }

    fn set_move(&mut self, commands: &mut Vec<PlayerCommand>, movement: (f64, f64)) {
        if self.last_move != Some(movement) {
            self.last_move = Some(movement);
            commands.push(PlayerCommand::SetMoveInput {
                x: movement.0,
                y: movement.1,
            });
        }
    }

    fn set_trigger(&mut self, commands: &mut Vec<PlayerCommand>, pressed: bool) {
        if self.last_trigger != Some(pressed) {
            self.last_trigger = Some(pressed);
            commands.push(PlayerCommand::SetTrigger { pressed });
        }
    }
}

/// Nearest pickup the player needs right now, if any.
fn wanted_pickup(player: &PlayerView, snapshot: &GameStateSnapshot) -> Option<Position> {
    let needs = |kind: PickupKind| match kind {
        PickupKind::Ammo => player.ammo == 0,
        PickupKind::Health => player.low_health,
    };
    snapshot
        .pickups
        .iter()
        .filter(|p| needs(p.kind))
        .map(|p| p.position)
        .min_by(|a, b| {
            player
                .position
                .distance_to(a)
                .total_cmp(&player.position.distance_to(b))
        })
}

fn toward(from: Position, to: Position) -> (f64, f64) {
    let dir = from.direction_to(&to);
    (dir.x, dir.y)
}
