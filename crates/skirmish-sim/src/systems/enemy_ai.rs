//! Enemy AI system: evaluates each enemy's state machine and drives its
//! navigation agent, patrol route, facing, and weapon from the result.
//!
//! The decision logic is the pure `skirmish_ai::fsm::evaluate`; this system
//! gathers its inputs from the world and applies its outputs.

use hecs::World;
use rand::Rng;

use skirmish_ai::fsm::{self, AgentContext, Movement, WaypointOrder};
use skirmish_ai::patrol::PatrolRoute;
use skirmish_ai::profiles::EnemyProfile;
use skirmish_core::components::{AgentBrain, Facing, Player};
use skirmish_core::constants::FACING_MIN_SPEED_SQ;
use skirmish_core::enums::Faction;
use skirmish_core::events::GameEvent;
use skirmish_core::types::{facing_toward, Position, Velocity};
use skirmish_nav::{LayerMask, NavAgent, NavigationProvider, VisibilityOracle};

use crate::weapon::{Weapon, WeaponOutcome};
use crate::world_setup::{self, entity_id};

/// Run one AI step for every enemy.
///
/// Without a player in the world the step does nothing. That condition is
/// logged once per level via `missing_player_logged`.
#[allow(clippy::too_many_arguments)]
pub fn run<N, R>(
    world: &mut World,
    nav: &N,
    rng: &mut R,
    now: f64,
    dt: f64,
    events: &mut Vec<GameEvent>,
    missing_player_logged: &mut bool,
) where
    N: NavigationProvider + VisibilityOracle + ?Sized,
    R: Rng + ?Sized,
{
    let player_pos = world
        .query::<(&Player, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos);
    let Some(player_pos) = player_pos else {
        if !*missing_player_logged {
            log::error!("no player in the world; enemy AI is idle");
            *missing_player_logged = true;
        }
        return;
    };

    let mut shots: Vec<(Position, f64)> = Vec::new();

    for (entity, (brain, profile, agent, route, weapon, pos, vel, facing)) in world.query_mut::<(
        &mut AgentBrain,
        &EnemyProfile,
        &mut NavAgent,
        &mut PatrolRoute,
        &mut Weapon,
        &Position,
        &mut Velocity,
        &mut Facing,
    )>() {
        let distance = pos.distance_to(&player_pos);
        let player_in_sight = fsm::sight_range(brain.state, profile)
            .is_some_and(|range| nav.is_unobstructed(pos, &player_pos, range, LayerMask::ENVIRONMENT));

        let ctx = AgentContext {
            state: brain.state,
            distance_to_player: distance,
            player_in_sight,
            arrived: agent.has_arrived(profile.arrival_threshold),
            waiting: route.is_waiting(),
            now,
            next_fire_time: weapon.next_fire_time(),
        };
        let update = fsm::evaluate(&ctx, profile);

        match update.movement {
            Movement::Cruise { speed } => agent.speed = speed,
            Movement::Halt => agent.stopped = true,
            Movement::Pursue { speed } => {
                agent.speed = speed;
                agent.stopped = false;
                agent.set_destination(player_pos);
            }
        }

        match update.waypoint {
            WaypointOrder::None => {}
            WaypointOrder::BeginWait => route.begin_wait(profile.patrol_wait_secs, rng),
            WaypointOrder::CancelWait => route.cancel_wait(),
            WaypointOrder::AdvanceNow => {
                agent.stopped = false;
                if let Some(next) = route.advance() {
                    agent.set_destination(next);
                }
            }
        }

        if update.state_changed {
            log::debug!(
                "enemy {} {:?} -> {:?} at distance {distance:.1}",
                entity_id(entity),
                brain.state,
                update.new_state
            );
            events.push(GameEvent::AgentStateChanged {
                id: entity_id(entity),
                from: brain.state,
                to: update.new_state,
            });
            brain.state = update.new_state;
        }

        // A wait drawn this tick starts counting on the next one.
        if update.waypoint != WaypointOrder::BeginWait {
            if let Some(next) = route.tick_wait(dt) {
                agent.stopped = false;
                agent.set_destination(next);
            }
        }

        let v = agent.steer(nav, pos, dt);
        *vel = Velocity::from_vec(v);

        if update.face_player {
            let look = player_pos.to_vec() - pos.to_vec();
            if look.length_squared() > f64::EPSILON {
                facing.angle = facing_toward(look);
            }
        } else if !agent.stopped && v.length_squared() > FACING_MIN_SPEED_SQ {
            facing.angle = facing_toward(v);
        }

        if update.fire && weapon.update(now, dt, true) == WeaponOutcome::Fired {
            shots.push((*pos, facing.angle));
        }
    }

    for (pos, angle) in shots {
        let (_, muzzle) = world_setup::spawn_projectile(world, pos, angle, Faction::Enemy);
        events.push(GameEvent::ShotFired {
            faction: Faction::Enemy,
            position: muzzle,
        });
    }
}
