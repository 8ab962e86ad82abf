//! Duration policies for arrival spacing and service times
//!
//! A policy turns the session's shared random stream into durations, in
//! seconds. Policies are stateless: every draw is independent, and the only
//! state anywhere is the stream itself.

use jobshop_core::SimError;
use rand::rngs::StdRng;
use rand::Rng;

/// Samples a duration, in seconds, from a configured policy.
pub trait DurationSampler {
    fn sample(&self, rng: &mut StdRng) -> f64;
}

/// Constant duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDuration {
    seconds: f64,
}

impl FixedDuration {
    pub fn new(seconds: f64) -> Self {
        Self { seconds }
    }
}

impl DurationSampler for FixedDuration {
    fn sample(&self, _rng: &mut StdRng) -> f64 {
        self.seconds
    }
}

/// Uniform integer duration in `[center - spread, center + spread]`
/// inclusive, in whole seconds.
///
/// The bounds are plain integers: with `spread` exceeding `center` a draw can
/// come out negative, and the scheduling site rejects it as an invalid
/// delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformIntDuration {
    center: i64,
    spread: u64,
}

impl UniformIntDuration {
    pub fn new(center: i64, spread: u64) -> Self {
        Self { center, spread }
    }
}

impl DurationSampler for UniformIntDuration {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        let low = self.center - self.spread as i64;
        let high = self.center + self.spread as i64;
        rng.gen_range(low..=high) as f64
    }
}

/// Exponentially distributed (Markovian) duration with the given rate.
///
/// Sampling is the inverse-CDF transform of `F(t) = 1 - e^(-rate * t)`:
/// draw `u` uniformly in `[0, 1)` and return `-ln(1 - u) / rate`. The
/// half-open draw keeps the argument of `ln` strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDuration {
    rate: f64,
}

impl ExponentialDuration {
    /// Fails with [`SimError::InvalidRate`] unless `rate` is finite and
    /// positive.
    pub fn new(rate: f64) -> Result<Self, SimError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(SimError::InvalidRate { rate });
        }
        Ok(Self { rate })
    }

    /// The rate parameter (events per second).
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Mean of the distribution, `1 / rate`.
    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }
}

impl DurationSampler for ExponentialDuration {
    fn sample(&self, rng: &mut StdRng) -> f64 {
        let u: f64 = rng.gen();
        -(1.0 - u).ln() / self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_fixed_duration_is_constant() {
        let mut rng = rng();
        let dist = FixedDuration::new(10.0);
        assert_eq!(dist.sample(&mut rng), 10.0);
        assert_eq!(dist.sample(&mut rng), 10.0);
    }

    #[test]
    fn test_uniform_int_stays_in_bounds() {
        let mut rng = rng();
        let dist = UniformIntDuration::new(3, 2);
        for _ in 0..200 {
            let value = dist.sample(&mut rng);
            assert!((1.0..=5.0).contains(&value));
            assert_eq!(value, value.trunc());
        }
    }

    #[test]
    fn test_uniform_int_covers_the_whole_range() {
        let mut rng = rng();
        let dist = UniformIntDuration::new(3, 2);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[dist.sample(&mut rng) as usize - 1] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn test_uniform_int_can_go_negative_when_spread_exceeds_center() {
        let mut rng = rng();
        let dist = UniformIntDuration::new(0, 3);
        let negative = (0..500).any(|_| dist.sample(&mut rng) < 0.0);
        assert!(negative);
    }

    #[test]
    fn test_exponential_rejects_non_positive_rate() {
        assert_eq!(
            ExponentialDuration::new(0.0),
            Err(SimError::InvalidRate { rate: 0.0 })
        );
        assert_eq!(
            ExponentialDuration::new(-1.5),
            Err(SimError::InvalidRate { rate: -1.5 })
        );
        assert!(ExponentialDuration::new(f64::NAN).is_err());
    }

    #[test]
    fn test_exponential_draws_are_positive() {
        let mut rng = rng();
        let dist = ExponentialDuration::new(2.0).unwrap();
        for _ in 0..200 {
            assert!(dist.sample(&mut rng) >= 0.0);
        }
    }

    #[test]
    fn test_exponential_mean_converges_to_reciprocal_rate() {
        let mut rng = rng();
        let rate = 2.0;
        let dist = ExponentialDuration::new(rate).unwrap();
        let draws = 10_000;
        let total: f64 = (0..draws).map(|_| dist.sample(&mut rng)).sum();
        let mean = total / draws as f64;
        let expected = 1.0 / rate;
        assert!(
            (mean - expected).abs() < expected * 0.05,
            "mean {mean} strays from {expected}"
        );
        assert_eq!(dist.mean(), expected);
    }
}
