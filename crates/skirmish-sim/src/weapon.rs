//! Weapon: cooldown-gated firing with an optional magazine and reload timer.
//!
//! Enemies carry an unlimited weapon (cooldown only); the player's weapon
//! has a magazine that forces a reload when empty.

use serde::{Deserialize, Serialize};

use skirmish_core::enums::WeaponState;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Magazine {
    ammo: u32,
    max_ammo: u32,
    reload_secs: f64,
    state: WeaponState,
    reload_remaining_secs: f64,
}

/// What a weapon did during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponOutcome {
    Idle,
    Fired,
    ReloadStarted,
    ReloadFinished,
    /// Still reloading; the trigger is ignored.
    Reloading,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    /// Seconds between shots.
    pub fire_interval_secs: f64,
    next_fire_time: f64,
    magazine: Option<Magazine>,
}

impl Weapon {
    /// Cooldown-only weapon with no ammo limit.
    pub fn unlimited(fire_interval_secs: f64) -> Self {
        Self {
            fire_interval_secs,
            next_fire_time: 0.0,
            magazine: None,
        }
    }

    /// Weapon with a full magazine of `max_ammo` rounds.
    pub fn with_magazine(fire_interval_secs: f64, max_ammo: u32, reload_secs: f64) -> Self {
        Self {
            fire_interval_secs,
            next_fire_time: 0.0,
            magazine: Some(Magazine {
                ammo: max_ammo,
                max_ammo,
                reload_secs,
                state: WeaponState::Ready,
                reload_remaining_secs: 0.0,
            }),
        }
    }

    pub fn next_fire_time(&self) -> f64 {
        self.next_fire_time
    }

    pub fn state(&self) -> WeaponState {
        self.magazine
            .as_ref()
            .map_or(WeaponState::Ready, |m| m.state)
    }

    /// Rounds left, or None for an unlimited weapon.
    pub fn ammo(&self) -> Option<u32> {
        self.magazine.as_ref().map(|m| m.ammo)
    }

    pub fn max_ammo(&self) -> Option<u32> {
        self.magazine.as_ref().map(|m| m.max_ammo)
    }

    /// Advance timers by `dt` and fire if the trigger is held and the
    /// cooldown has elapsed at `now`.
    ///
    /// An empty magazine starts a reload instead of firing. A finishing
    /// reload refills the magazine; firing resumes on the next update.
    pub fn update(&mut self, now: f64, dt: f64, trigger: bool) -> WeaponOutcome {
        if let Some(mag) = self.magazine.as_mut() {
            if mag.state == WeaponState::Reloading {
                mag.reload_remaining_secs -= dt;
                if mag.reload_remaining_secs > 0.0 {
                    return WeaponOutcome::Reloading;
                }
                mag.ammo = mag.max_ammo;
                mag.state = WeaponState::Ready;
                mag.reload_remaining_secs = 0.0;
                return WeaponOutcome::ReloadFinished;
            }
            if mag.ammo == 0 {
                mag.state = WeaponState::Reloading;
                mag.reload_remaining_secs = mag.reload_secs;
                return WeaponOutcome::ReloadStarted;
            }
        }

        if !trigger || now < self.next_fire_time {
            return WeaponOutcome::Idle;
        }

        self.next_fire_time = now + self.fire_interval_secs;
        if let Some(mag) = self.magazine.as_mut() {
            mag.ammo -= 1;
        }
        WeaponOutcome::Fired
    }

    /// Add rounds, clamped to the magazine size. Returns rounds added.
    pub fn add_ammo(&mut self, amount: u32) -> u32 {
        match self.magazine.as_mut() {
            Some(mag) => {
                let before = mag.ammo;
                mag.ammo = mag.ammo.saturating_add(amount).min(mag.max_ammo);
                mag.ammo - before
            }
            None => 0,
        }
    }
}
