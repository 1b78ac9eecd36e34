//! Normal variates via the Box–Muller transform and seeded random streams.
//!
//! [`SurveyRng`] wraps `rand::rngs::StdRng` with seed tracking, so a batch
//! run can be replayed from a single master seed. Independent streams for
//! parallel units of work are derived with [`SurveyRng::derive_stream`].

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::types::DistributionError;

/// Box–Muller transform of two uniform draws into one standard normal variate.
///
/// Computes `sqrt(-2 ln u1) · cos(2π u2)`.
///
/// # Errors
/// `u1` must lie in (0, 1] so the logarithm stays finite, and `u2` in
/// [0, 1]; anything else returns [`DistributionError::InvalidUniform`].
///
/// # Examples
/// ```
/// use survey_core::math::rng::standard_normal_sample;
///
/// // u1 = 1 collapses the radius to zero
/// assert_eq!(standard_normal_sample(1.0, 0.3).unwrap(), 0.0);
/// assert!(standard_normal_sample(0.0, 0.3).is_err());
/// ```
pub fn standard_normal_sample(u1: f64, u2: f64) -> Result<f64, DistributionError> {
    if !(u1 > 0.0 && u1 <= 1.0) {
        return Err(DistributionError::InvalidUniform {
            which: "u1",
            value: u1,
        });
    }
    if !(0.0..=1.0).contains(&u2) {
        return Err(DistributionError::InvalidUniform {
            which: "u2",
            value: u2,
        });
    }
    Ok(box_muller(u1, u2))
}

#[inline]
fn box_muller(u1: f64, u2: f64) -> f64 {
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Draws one standard normal variate from any uniform source.
///
/// `rng.gen::<f64>()` lies in [0, 1), so `1 - gen` lies in (0, 1] and the
/// logarithm in the transform never sees zero.
#[inline]
pub fn draw_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    box_muller(u1, u2)
}

/// Seeded random stream for answer generation.
///
/// Implements [`RngCore`], so it can be handed to any function that takes
/// `&mut impl Rng`.
///
/// # Examples
///
/// ```rust
/// use survey_core::math::rng::SurveyRng;
///
/// let mut a = SurveyRng::from_seed(2024);
/// let mut b = SurveyRng::from_seed(2024);
/// assert_eq!(a.gen_normal(), b.gen_normal());
///
/// // Child streams depend only on the parent seed and the index
/// let child = a.derive_stream(3);
/// assert_eq!(child.seed(), b.derive_stream(3).seed());
/// ```
#[derive(Debug, Clone)]
pub struct SurveyRng {
    inner: StdRng,
    seed: u64,
}

impl SurveyRng {
    /// Creates a stream initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a stream seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    /// Returns the seed used for initialisation.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in [0, 1).
    #[inline]
    pub fn gen_uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal variate (Box–Muller).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        draw_standard_normal(&mut self.inner)
    }

    /// Fills the buffer with standard normal variates. No allocation.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = draw_standard_normal(&mut self.inner);
        }
    }

    /// Independent child stream for unit of work `index`.
    ///
    /// The child seed is a SplitMix64 mix of the parent seed and the index;
    /// it does not depend on how much of the parent stream was consumed, so
    /// parallel work can be scheduled in any order.
    pub fn derive_stream(&self, index: u64) -> Self {
        Self::from_seed(splitmix64(
            self.seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15),
        ))
    }
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

impl RngCore for SurveyRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_muller_known_points() {
        // u2 = 0 keeps the full radius: sqrt(-2 ln 0.5)
        assert_relative_eq!(
            standard_normal_sample(0.5, 0.0).unwrap(),
            (2.0 * std::f64::consts::LN_2).sqrt(),
            epsilon = 1e-12
        );
        // u2 = 0.5 flips the sign
        assert_relative_eq!(
            standard_normal_sample(0.5, 0.5).unwrap(),
            -(2.0 * std::f64::consts::LN_2).sqrt(),
            epsilon = 1e-12
        );
        // u2 = 0.25 lands on the zero of the cosine
        assert!(standard_normal_sample(0.3, 0.25).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_box_muller_guards_log_singularity() {
        assert_eq!(
            standard_normal_sample(0.0, 0.5),
            Err(DistributionError::InvalidUniform {
                which: "u1",
                value: 0.0
            })
        );
        assert!(standard_normal_sample(-0.1, 0.5).is_err());
        assert!(standard_normal_sample(1.1, 0.5).is_err());
        assert!(standard_normal_sample(f64::NAN, 0.5).is_err());
        assert!(standard_normal_sample(0.5, 1.5).is_err());
    }

    #[test]
    fn test_seed_reproducibility() {
        let mut rng1 = SurveyRng::from_seed(12345);
        let mut rng2 = SurveyRng::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(rng1.gen_normal(), rng2.gen_normal());
            assert_eq!(rng1.gen_uniform(), rng2.gen_uniform());
        }
        assert_eq!(rng1.seed(), 12345);
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = SurveyRng::from_seed(42);
        let mut buffer = vec![0.0; 100_000];
        rng.fill_normal(&mut buffer);

        let n = buffer.len() as f64;
        let mean = buffer.iter().sum::<f64>() / n;
        let var = buffer.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert!(mean.abs() < 0.02, "mean = {}", mean);
        assert!((var - 1.0).abs() < 0.02, "variance = {}", var);
        assert!(buffer.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_derived_streams_are_distinct_and_stable() {
        let parent = SurveyRng::from_seed(7);
        let mut consumed = SurveyRng::from_seed(7);
        for _ in 0..10 {
            consumed.gen_uniform();
        }

        assert_eq!(parent.derive_stream(0).seed(), consumed.derive_stream(0).seed());
        assert_ne!(parent.derive_stream(0).seed(), parent.derive_stream(1).seed());

        let mut a = parent.derive_stream(5);
        let mut b = parent.derive_stream(6);
        assert_ne!(a.gen_uniform(), b.gen_uniform());
    }

    #[test]
    fn test_rng_core_delegation() {
        let mut rng = SurveyRng::from_seed(1);
        let value: u8 = rng.gen_range(0..10);
        assert!(value < 10);
        assert!(draw_standard_normal(&mut rng).is_finite());
    }
}
