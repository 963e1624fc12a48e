//! Projectile system: lifetime, environment impact, and target hits.
//!
//! Runs after movement. A projectile that has left the walkable area or hit
//! a wall is removed without damage. Otherwise it strikes the first target
//! of the opposing faction whose hitbox contains it.

use hecs::{Entity, World};

use skirmish_core::components::{Enemy, Hitbox, Player, Projectile};
use skirmish_core::enums::Faction;
use skirmish_core::types::Position;
use skirmish_nav::{LayerMask, VisibilityOracle};

use crate::health::HealthLedger;

/// Damage to apply to a target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: Entity,
    pub amount: u32,
}

struct Target {
    entity: Entity,
    faction: Faction,
    position: Position,
    radius: f64,
}

pub fn run<O: VisibilityOracle + ?Sized>(
    world: &mut World,
    oracle: &O,
    dt: f64,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<Hit> {
    let targets = collect_targets(world);
    let mut hits = Vec::new();

    for (entity, (projectile, pos)) in world.query_mut::<(&mut Projectile, &Position)>() {
        projectile.remaining_secs -= dt;
        if projectile.remaining_secs <= 0.0 || oracle.is_blocked(pos, LayerMask::ENVIRONMENT) {
            despawn_buffer.push(entity);
            continue;
        }

        let struck = targets.iter().find(|t| {
            t.faction != projectile.faction && t.position.distance_to(pos) <= t.radius
        });
        if let Some(target) = struck {
            hits.push(Hit {
                target: target.entity,
                amount: projectile.damage,
            });
            despawn_buffer.push(entity);
        }
    }

    hits
}

fn collect_targets(world: &World) -> Vec<Target> {
    let mut targets = Vec::new();
    for (entity, (pos, hitbox, health, player, enemy)) in world
        .query::<(
            &Position,
            &Hitbox,
            &HealthLedger,
            Option<&Player>,
            Option<&Enemy>,
        )>()
        .iter()
    {
        if health.is_dead() {
            continue;
        }
        let faction = match (player, enemy) {
            (Some(_), _) => Faction::Player,
            (None, Some(_)) => Faction::Enemy,
            (None, None) => continue,
        };
        targets.push(Target {
            entity,
            faction,
            position: *pos,
            radius: hitbox.radius,
        });
    }
    targets
}
