//! Money collection progress

use serde::{Deserialize, Serialize};

/// Collected money versus the goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyState {
    pub total_collected: u64,
    pub target: u64,
    /// One-shot latch, never cleared once set
    pub completed: bool,
}

impl EconomyState {
    pub fn new(target: u64) -> Self {
        Self {
            total_collected: 0,
            target,
            completed: false,
        }
    }

    /// Add collected money. Returns true only on the call that reaches the target.
    pub fn add_money(&mut self, amount: u64) -> bool {
        self.total_collected = self.total_collected.saturating_add(amount);
        if !self.completed && self.total_collected > 0 && self.total_collected >= self.target {
            self.completed = true;
            log::info!(
                "Target reached: {} / {}",
                self.total_collected,
                self.target
            );
            return true;
        }
        false
    }

    /// Progress toward the target, rounded and capped at 100
    pub fn progress_percent(&self) -> u32 {
        if self.target == 0 {
            return 100;
        }
        let pct = (self.total_collected as f64 / self.target as f64 * 100.0).round();
        pct.min(100.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_on_crossing_pickup() {
        let mut economy = EconomyState::new(50_000);
        assert!(!economy.add_money(500));
        assert!(!economy.completed);
        assert!(!economy.add_money(500));
        assert!(!economy.completed);
        assert!(economy.add_money(49_000));
        assert!(economy.completed);
        assert_eq!(economy.total_collected, 50_000);
    }

    #[test]
    fn test_latch_fires_once() {
        let mut economy = EconomyState::new(1_000);
        let fired = [600, 600, 600, 5_000]
            .iter()
            .filter(|&&amount| economy.add_money(amount))
            .count();
        assert_eq!(fired, 1);
        assert!(economy.completed);
        assert_eq!(economy.total_collected, 6_800);
    }

    #[test]
    fn test_zero_amount_does_not_complete_zero_target() {
        let mut economy = EconomyState::new(0);
        assert!(!economy.add_money(0));
        assert!(economy.add_money(1));
    }

    #[test]
    fn test_progress_percent() {
        let mut economy = EconomyState::new(50_000);
        assert_eq!(economy.progress_percent(), 0);
        economy.add_money(12_345);
        assert_eq!(economy.progress_percent(), 25);
        economy.add_money(100_000);
        assert_eq!(economy.progress_percent(), 100);
    }
}
