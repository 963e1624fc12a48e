//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Enemy AI ---

/// Extra range added to the attack range when deciding to leave Attacking.
pub const ATTACK_EXIT_MARGIN: f64 = 1.0;

/// Minimum squared speed before facing follows velocity.
pub const FACING_MIN_SPEED_SQ: f64 = 0.1;

pub const ENEMY_PATROL_SPEED: f64 = 2.0;
pub const ENEMY_CHASE_SPEED: f64 = 4.0;

/// Radius around the spawn point used to generate patrol waypoints.
pub const ENEMY_PATROL_RADIUS: f64 = 20.0;
pub const ENEMY_PATROL_POINT_COUNT: usize = 5;

/// Wait at a waypoint, drawn uniformly from this range (seconds).
pub const ENEMY_PATROL_WAIT_MIN_SECS: f64 = 2.0;
pub const ENEMY_PATROL_WAIT_MAX_SECS: f64 = 5.0;

pub const ENEMY_WAYPOINT_ARRIVAL_THRESHOLD: f64 = 0.5;

pub const ENEMY_CHASE_RANGE: f64 = 10.0;
pub const ENEMY_PATROL_RANGE: f64 = 15.0;
pub const ENEMY_ATTACK_RANGE: f64 = 7.0;

/// Seconds between enemy shots.
pub const ENEMY_FIRE_INTERVAL_SECS: f64 = 1.0;

pub const ENEMY_MAX_HEALTH: u32 = 50;
pub const ENEMY_LOW_HEALTH_THRESHOLD: u32 = 15;

// --- Player ---

pub const PLAYER_MOVE_SPEED: f64 = 5.0;

/// Seconds between player shots.
pub const PLAYER_FIRE_INTERVAL_SECS: f64 = 0.5;
pub const PLAYER_MAX_AMMO: u32 = 30;
pub const PLAYER_RELOAD_SECS: f64 = 2.0;
pub const PLAYER_MAX_HEALTH: u32 = 100;
pub const PLAYER_LOW_HEALTH_THRESHOLD: u32 = 30;

/// Degrees per second of aim rotation per unit of mouse sensitivity.
pub const LOOK_SENSITIVITY_MULTIPLIER: f64 = 200.0;

// --- Projectiles ---

pub const PROJECTILE_SPEED: f64 = 20.0;
pub const PROJECTILE_DAMAGE: u32 = 10;
pub const PROJECTILE_LIFETIME_SECS: f64 = 3.0;

/// Distance from the shooter's center to its muzzle.
pub const FIRE_POINT_OFFSET: f64 = 0.6;

// --- Collision ---

pub const PLAYER_HIT_RADIUS: f64 = 0.5;
pub const ENEMY_HIT_RADIUS: f64 = 0.5;
pub const PICKUP_RADIUS: f64 = 0.75;

// --- Pickups ---

pub const AMMO_PICKUP_AMOUNT: u32 = 15;
pub const HEALTH_PICKUP_AMOUNT: u32 = 25;
pub const AMMO_SPAWN_INTERVAL_SECS: f64 = 10.0;

// --- Waves ---

/// Delay before the first wave starts.
pub const WAVE_INITIAL_DELAY_SECS: f64 = 2.0;
pub const WAVE_TIME_BETWEEN_SECS: f64 = 5.0;
