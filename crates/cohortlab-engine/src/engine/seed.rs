use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic cohort generation.
///
/// This is a 128-bit (16-byte) seed. Using the same seed and configuration will
/// produce the same cohort, enabling:
///
/// - Reproducible datasets for demos and regression checks
/// - Sharing a cohort by sharing its configuration and seed
/// - Deterministic testing
///
/// Each participant draws from its own PCG stream derived from the seed and the
/// participant index, so the cohort does not depend on how generation work is
/// partitioned.
///
/// # Example
///
/// ```
/// use cohortlab_engine::CohortSeed;
/// use rand::Rng as _;
///
/// let seed: CohortSeed = rand::rng().random();
/// let parsed: CohortSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CohortSeed([u8; 16]);

impl CohortSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    /// Random number generator dedicated to the participant at `index`.
    #[must_use]
    pub fn participant_rng(&self, index: usize) -> Pcg32 {
        let num = u128::from_be_bytes(self.0);
        #[expect(clippy::cast_possible_truncation)]
        let (state, stream) = ((num >> 64) as u64, num as u64);
        Pcg32::new(state, stream.wrapping_add(index as u64))
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    reason: String,
}

impl FromStr for CohortSeed {
    type Err = ParseSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self::from_u128(num))
    }
}

impl fmt::Display for CohortSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for CohortSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CohortSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `CohortSeed` values with `rng.random()`.
impl Distribution<CohortSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CohortSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        CohortSeed(seed)
    }
}
