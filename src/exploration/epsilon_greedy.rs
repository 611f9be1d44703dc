use rand::Rng;

use crate::{ensure_interval, error::Result};

use super::Choice;

/// Epsilon greedy exploration policy with a fixed threshold
///
/// `epsilon` is the probability of exploring, so a policy with `epsilon = 0` always exploits.
/// The random source is passed in by the caller, which keeps seeded runs reproducible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Initialize epsilon greedy policy with an exploration probability
    ///
    /// **Errors** if `epsilon` is not in the interval `[0,1]`
    pub fn new(epsilon: f64) -> Result<Self> {
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(Self { epsilon })
    }

    /// A policy that never explores
    pub fn greedy() -> Self {
        Self { epsilon: 0.0 }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Invoke epsilon greedy policy
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f64>() < self.epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn bounds_are_checked() {
        assert!(EpsilonGreedy::new(0.0).is_ok());
        assert!(EpsilonGreedy::new(1.0).is_ok());
        assert!(EpsilonGreedy::new(-0.1).is_err());
        assert!(EpsilonGreedy::new(1.1).is_err());
    }

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::greedy();
        let always = EpsilonGreedy::new(1.0).unwrap();
        for _ in 0..1000 {
            assert_eq!(never.choose(&mut rng), Choice::Exploit);
            assert_eq!(always.choose(&mut rng), Choice::Explore);
        }
    }

    #[test]
    fn explores_at_roughly_epsilon() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = EpsilonGreedy::new(0.25).unwrap();
        let explored = (0..10_000)
            .filter(|_| policy.choose(&mut rng) == Choice::Explore)
            .count();
        assert!(
            (2_000..3_000).contains(&explored),
            "Explored {explored} times out of 10000"
        );
    }
}
