//! Deterministic rolls
//!
//! Maps an arbitrary salt string onto a value uniformly distributed over
//! `[0, 100)`. The value depends only on the salt bytes: no clock, no RNG,
//! so the same salt rolls the same number in every process.
//!
//! The salt is hashed with SHA-256 and the first four digest bytes are read
//! as a big-endian `u32`. One is subtracted before scaling so that
//! `u32::MAX` lands just below 100 instead of on it.

use crate::error::{CoreError, CoreResult};
use sha2::{Digest, Sha256};

/// Largest value produced by [`int_from_salt`].
pub const MAX_INT_SALT: u32 = u32::MAX;

/// Upper bound (exclusive) of every roll.
pub const ROLL_CEILING: f64 = 100.0;

/// Source of rolls used by the resolver.
///
/// The registry is generic over this so tests and replays can pin the roll.
pub trait Roller: Send + Sync {
    /// Roll a value in `[0, 100)` for the given salt.
    fn roll(&self, salt: &str) -> f64;
}

/// The production roller: SHA-256 of the salt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Roller;

impl Roller for Sha256Roller {
    fn roll(&self, salt: &str) -> f64 {
        roll(salt)
    }
}

/// A roller that ignores the salt and always returns the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRoller(f64);

impl FixedRoller {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Roller for FixedRoller {
    fn roll(&self, _salt: &str) -> f64 {
        self.0
    }
}

/// Roll a value in `[0, 100)` for `salt`.
///
/// # Examples
///
/// ```
/// use tombola_core::roller::roll;
///
/// let r = roll("session-42:checkout");
/// assert!((0.0..100.0).contains(&r));
/// assert_eq!(r, roll("session-42:checkout"));
/// ```
pub fn roll(salt: &str) -> f64 {
    roll_u32(int_from_salt(salt))
}

/// Hash `salt` and take the first four digest bytes as a big-endian `u32`.
pub fn int_from_salt(salt: &str) -> u32 {
    let digest = Sha256::digest(salt.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Scale a pre-computed 32-bit salt onto `[0, 100)`.
pub fn roll_u32(int_salt: u32) -> f64 {
    scale(f64::from(int_salt))
}

/// Scale an integer salt supplied as a float onto `[0, 100)`.
///
/// Fails with [`CoreError::InvalidRollInput`] for NaN, infinities, fractions
/// and values outside the `u32` range, since none of them can come out of a hash.
pub fn roll_int(int_salt: f64) -> CoreResult<f64> {
    if !int_salt.is_finite() {
        return Err(CoreError::InvalidRollInput(format!(
            "{} is not a number",
            int_salt
        )));
    }
    if int_salt.fract() != 0.0 {
        return Err(CoreError::InvalidRollInput(format!(
            "{} is not an integer",
            int_salt
        )));
    }
    if int_salt < 0.0 || int_salt > f64::from(MAX_INT_SALT) {
        return Err(CoreError::InvalidRollInput(format!(
            "{} is outside 0..={}",
            int_salt, MAX_INT_SALT
        )));
    }
    Ok(scale(int_salt))
}

fn scale(int_salt: f64) -> f64 {
    // Shift down by one for the open upper bound; a zero hash stays at zero.
    let shifted = (int_salt - 1.0).max(0.0);
    shifted / f64::from(MAX_INT_SALT) * ROLL_CEILING
}
