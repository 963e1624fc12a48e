//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and movement orders for an
//! enemy agent from what it can currently observe. No ECS dependency; the
//! simulation gathers the context, calls `evaluate`, and applies the update.

use skirmish_core::constants::ATTACK_EXIT_MARGIN;
use skirmish_core::enums::AgentState;

use crate::profiles::EnemyProfile;

/// Input to the FSM for a single agent.
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub state: AgentState,
    pub distance_to_player: f64,
    /// Unobstructed line to the player within `sight_range(state)`.
    /// Ignored while Chasing.
    pub player_in_sight: bool,
    /// Navigation reports the current waypoint reached (no path pending,
    /// remaining distance within the arrival threshold).
    pub arrived: bool,
    /// A deferred waypoint advance is pending.
    pub waiting: bool,
    pub now: f64,
    pub next_fire_time: f64,
}

/// What the navigation agent should do this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Movement {
    /// Set the travel speed, leave the destination and stop flag alone.
    Cruise { speed: f64 },
    /// Stop moving but keep the destination.
    Halt,
    /// Head for the player's position.
    Pursue { speed: f64 },
}

/// What to do with the patrol route this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointOrder {
    None,
    /// Schedule a deferred advance after a random wait.
    BeginWait,
    /// Drop any pending advance.
    CancelWait,
    /// Move to the next waypoint immediately.
    AdvanceNow,
}

/// Output from the FSM.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentUpdate {
    pub new_state: AgentState,
    pub state_changed: bool,
    pub movement: Movement,
    pub waypoint: WaypointOrder,
    /// Turn to face the player instead of the direction of travel.
    pub face_player: bool,
    /// Spawn a projectile along the facing and restart the cooldown.
    pub fire: bool,
}

impl AgentUpdate {
    fn stay(state: AgentState, movement: Movement) -> Self {
        Self {
            new_state: state,
            state_changed: false,
            movement,
            waypoint: WaypointOrder::None,
            face_player: false,
            fire: false,
        }
    }

    fn enter(mut self, state: AgentState) -> Self {
        self.state_changed = self.new_state != state;
        self.new_state = state;
        self
    }
}

/// State an agent starts in.
pub fn initial_state(has_waypoints: bool) -> AgentState {
    if has_waypoints {
        AgentState::Patrolling
    } else {
        AgentState::Chasing
    }
}

/// Range the visibility check covers in each state, or None when the state
/// does not look for the player.
pub fn sight_range(state: AgentState, profile: &EnemyProfile) -> Option<f64> {
    match state {
        AgentState::Patrolling => Some(profile.chase_range),
        AgentState::Chasing => None,
        AgentState::Attacking => Some(profile.attack_range + ATTACK_EXIT_MARGIN),
    }
}

/// Evaluate the FSM for one agent.
pub fn evaluate(ctx: &AgentContext, profile: &EnemyProfile) -> AgentUpdate {
    match ctx.state {
        AgentState::Patrolling => evaluate_patrol(ctx, profile),
        AgentState::Chasing => evaluate_chase(ctx, profile),
        AgentState::Attacking => evaluate_attack(ctx, profile),
    }
}

fn evaluate_patrol(ctx: &AgentContext, profile: &EnemyProfile) -> AgentUpdate {
    let cruise = Movement::Cruise {
        speed: profile.patrol_speed,
    };

    if ctx.player_in_sight && ctx.distance_to_player <= profile.chase_range {
        let mut update = AgentUpdate::stay(ctx.state, cruise).enter(AgentState::Chasing);
        update.waypoint = WaypointOrder::CancelWait;
        return update;
    }

    if !ctx.waiting && ctx.arrived {
        let mut update = AgentUpdate::stay(ctx.state, Movement::Halt);
        update.waypoint = WaypointOrder::BeginWait;
        return update;
    }

    AgentUpdate::stay(ctx.state, cruise)
}

fn evaluate_chase(ctx: &AgentContext, profile: &EnemyProfile) -> AgentUpdate {
    let pursue = Movement::Pursue {
        speed: profile.chase_speed,
    };
    let update = AgentUpdate::stay(ctx.state, pursue);

    if ctx.distance_to_player < profile.attack_range {
        return update.enter(AgentState::Attacking);
    }

    if ctx.distance_to_player > profile.patrol_range {
        let mut update = update.enter(AgentState::Patrolling);
        update.waypoint = WaypointOrder::AdvanceNow;
        return update;
    }

    update
}

fn evaluate_attack(ctx: &AgentContext, profile: &EnemyProfile) -> AgentUpdate {
    let update = AgentUpdate::stay(ctx.state, Movement::Halt);

    let exit_range = profile.attack_range + ATTACK_EXIT_MARGIN;
    if !ctx.player_in_sight || ctx.distance_to_player > exit_range {
        return update.enter(AgentState::Chasing);
    }

    AgentUpdate {
        face_player: true,
        fire: ctx.now >= ctx.next_fire_time,
        ..update
    }
}
