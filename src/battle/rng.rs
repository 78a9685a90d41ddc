use crate::errors::{BattleError, BattleResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The random stream for one resolution, drawn up front and consumed in order.
///
/// Every helper takes a reason that shows up in debug logs, which makes a
/// replayed turn easy to line up against the draws it consumed.
#[derive(Debug, Clone)]
pub struct TurnRng {
    outcomes: Vec<u32>,
    index: usize,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self { outcomes, index: 0 }
    }

    pub fn new_random(len: usize) -> Self {
        let mut rng = rand::rng();
        let outcomes = (0..len).map(|_| rng.random::<u32>()).collect();
        Self { outcomes, index: 0 }
    }

    pub fn from_seed(seed: u64, len: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcomes = (0..len).map(|_| rng.random::<u32>()).collect();
        Self { outcomes, index: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len().saturating_sub(self.index)
    }

    fn next_raw(&mut self, reason: &str) -> BattleResult<u32> {
        let outcome = self
            .outcomes
            .get(self.index)
            .copied()
            .ok_or_else(|| BattleError::RngExhausted {
                reason: reason.to_string(),
            })?;
        log::debug!("[rng] consumed {} for: {}", outcome, reason);
        self.index += 1;
        Ok(outcome)
    }

    /// True with probability `numerator / denominator`.
    pub fn chance(&mut self, numerator: u32, denominator: u32, reason: &str) -> BattleResult<bool> {
        let denominator = denominator.max(1);
        Ok(self.next_raw(reason)? % denominator < numerator)
    }

    /// Uniform in `1..=100`.
    pub fn percent(&mut self, reason: &str) -> BattleResult<u32> {
        Ok(self.next_raw(reason)? % 100 + 1)
    }

    /// Uniform in `low..=high`.
    pub fn range(&mut self, low: u32, high: u32, reason: &str) -> BattleResult<u32> {
        let span = high.saturating_sub(low) + 1;
        Ok(low + self.next_raw(reason)? % span)
    }

    /// The damage spread, as a percentage in `85..=100`.
    pub fn damage_roll(&mut self, reason: &str) -> BattleResult<u32> {
        self.range(85, 100, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_helpers_map_raw_values() {
        let mut rng = TurnRng::new_for_test(vec![0, 99, 50, 7, 15]);
        assert!(rng.chance(1, 4, "zero always passes").unwrap());
        assert_eq!(rng.percent("99 maps to 100").unwrap(), 100);
        assert_eq!(rng.range(2, 4, "50 % 3").unwrap(), 4);
        assert_eq!(rng.damage_roll("7 % 16").unwrap(), 92);
        assert_eq!(rng.damage_roll("15 % 16").unwrap(), 100);
        assert_eq!(rng.consumed(), 5);
    }

    #[test]
    fn test_exhaustion_is_an_error_not_a_panic() {
        let mut rng = TurnRng::new_for_test(vec![1]);
        rng.percent("first").unwrap();
        assert_eq!(
            rng.percent("second"),
            Err(BattleError::RngExhausted {
                reason: "second".to_string()
            })
        );
    }

    #[test]
    fn test_seeded_streams_repeat() {
        let mut a = TurnRng::from_seed(42, 16);
        let mut b = TurnRng::from_seed(42, 16);
        for _ in 0..16 {
            assert_eq!(a.percent("a").unwrap(), b.percent("b").unwrap());
        }
    }
}
