//! HealthLedger: clamped integer health with a low-health band and
//! one-shot death, shared by the player and enemies.

use serde::{Deserialize, Serialize};

use skirmish_core::enums::LowHealthRecovery;

/// Low-health band crossing caused by a health change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowHealthTransition {
    Entered,
    Cleared,
}

/// Result of a single `take_damage` / `add_health` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthChange {
    pub low_health: Option<LowHealthTransition>,
    /// True only on the call that brought health to zero.
    pub died: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthLedger {
    current: u32,
    max: u32,
    low_threshold: u32,
    recovery: LowHealthRecovery,
    low: bool,
    dead: bool,
}

impl HealthLedger {
    /// A full-health ledger.
    pub fn new(max: u32, low_threshold: u32, recovery: LowHealthRecovery) -> Self {
        Self {
            current: max,
            max,
            low_threshold,
            recovery,
            low: false,
            dead: max == 0,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_low(&self) -> bool {
        self.low
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract `amount`, clamping at zero. No effect once dead.
    pub fn take_damage(&mut self, amount: u32) -> HealthChange {
        if self.dead {
            return HealthChange::default();
        }
        self.current = self.current.saturating_sub(amount);
        let low_health = self.reevaluate_low();
        let died = self.current == 0;
        self.dead = died;
        HealthChange { low_health, died }
    }

    /// Add `amount`, clamping at max. No effect once dead.
    pub fn add_health(&mut self, amount: u32) -> HealthChange {
        if self.dead {
            return HealthChange::default();
        }
        self.current = self.current.saturating_add(amount).min(self.max);
        HealthChange {
            low_health: self.reevaluate_low(),
            died: false,
        }
    }

    fn reevaluate_low(&mut self) -> Option<LowHealthTransition> {
        if !self.low && self.current <= self.low_threshold {
            self.low = true;
            return Some(LowHealthTransition::Entered);
        }
        if self.low
            && self.current > self.low_threshold
            && self.recovery == LowHealthRecovery::Restore
        {
            self.low = false;
            return Some(LowHealthTransition::Cleared);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_ledger() -> HealthLedger {
        HealthLedger::new(100, 30, LowHealthRecovery::Restore)
    }

    #[test]
    fn test_damage_sequence_crosses_once_and_dies_once() {
        let mut ledger = player_ledger();
        let changes: Vec<HealthChange> = [40, 40, 40]
            .into_iter()
            .map(|d| ledger.take_damage(d))
            .collect();

        assert_eq!(ledger.current(), 0);
        assert_eq!(changes[0], HealthChange::default());
        assert_eq!(
            changes[1].low_health,
            Some(LowHealthTransition::Entered),
            "second hit brings health to 20"
        );
        assert!(!changes[1].died);
        assert_eq!(changes[2].low_health, None);
        assert!(changes[2].died);

        let entered = changes
            .iter()
            .filter(|c| c.low_health == Some(LowHealthTransition::Entered))
            .count();
        let deaths = changes.iter().filter(|c| c.died).count();
        assert_eq!(entered, 1);
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_health_values_along_sequence() {
        let mut ledger = player_ledger();
        let mut seen = Vec::new();
        for d in [40, 40, 40] {
            ledger.take_damage(d);
            seen.push(ledger.current());
        }
        assert_eq!(seen, vec![60, 20, 0]);
    }

    #[test]
    fn test_death_is_one_shot() {
        let mut ledger = HealthLedger::new(10, 3, LowHealthRecovery::Latch);
        assert!(ledger.take_damage(25).died);
        for _ in 0..5 {
            let change = ledger.take_damage(10);
            assert!(!change.died);
            assert_eq!(change.low_health, None);
        }
        assert!(ledger.is_dead());
        assert_eq!(ledger.current(), 0);
    }

    #[test]
    fn test_single_lethal_hit_enters_low_and_dies() {
        let mut ledger = player_ledger();
        let change = ledger.take_damage(500);
        assert_eq!(change.low_health, Some(LowHealthTransition::Entered));
        assert!(change.died);
    }

    #[test]
    fn test_take_damage_clamps_for_all_values() {
        for h in [1u32, 7, 30, 99, 100] {
            for d in [0u32, 1, 5, 30, 99, 100, 250] {
                let mut ledger = player_ledger();
                ledger.take_damage(100 - h);
                ledger.take_damage(d);
                assert_eq!(ledger.current(), h.saturating_sub(d), "h={h} d={d}");
            }
        }
    }

    #[test]
    fn test_add_health_clamps_to_max() {
        let mut ledger = player_ledger();
        ledger.take_damage(50);
        ledger.add_health(25);
        assert_eq!(ledger.current(), 75);
        ledger.add_health(1000);
        assert_eq!(ledger.current(), 100);
        ledger.add_health(u32::MAX);
        assert_eq!(ledger.current(), 100);
    }

    #[test]
    fn test_player_recovers_from_low_health() {
        let mut ledger = player_ledger();
        ledger.take_damage(75);
        assert!(ledger.is_low());

        // Exactly at the threshold stays low.
        assert_eq!(ledger.add_health(5).low_health, None);
        assert_eq!(ledger.current(), 30);
        assert!(ledger.is_low());

        let change = ledger.add_health(1);
        assert_eq!(change.low_health, Some(LowHealthTransition::Cleared));
        assert!(!ledger.is_low());
    }

    #[test]
    fn test_enemy_low_health_latches() {
        let mut ledger = HealthLedger::new(50, 15, LowHealthRecovery::Latch);
        assert_eq!(
            ledger.take_damage(40).low_health,
            Some(LowHealthTransition::Entered)
        );
        assert_eq!(ledger.add_health(40).low_health, None);
        assert_eq!(ledger.current(), 50);
        assert!(ledger.is_low());
    }

    #[test]
    fn test_no_healing_after_death() {
        let mut ledger = player_ledger();
        ledger.take_damage(100);
        ledger.add_health(50);
        assert_eq!(ledger.current(), 0);
        assert!(ledger.is_dead());
    }
}
