//! Split-representation large-quantity arithmetic.
//!
//! A `Scalar` represents a magnitude (byte count, duration) as a count of
//! fixed-size "giga" chunks plus a remainder, so that values beyond the
//! range of a native machine word stay portable. Every mutating operation
//! keeps the remainder in `[0, ONE_GIG)`; an unrecoverable borrow drives
//! the chunk count negative, which marks the scalar invalid.
//!
//! All operations take the absolute value of a signed delta before
//! applying it; sign semantics belong to the caller. A negative delta
//! passed to `increase` therefore behaves exactly like a positive one of
//! the same magnitude.

use dtnport_core::error::{ErrorKind, Result};

/// Size of one "giga" chunk.
pub const ONE_GIG: i64 = 1 << 30;

/// A quantity held as `gigs * ONE_GIG + units`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scalar {
    gigs: i64,
    units: i64,
}

impl Scalar {
    /// Creates a scalar holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scalar holding `|value|`.
    pub fn from_value(value: i64) -> Self {
        let mut scalar = Self::new();
        scalar.load(value);
        scalar
    }

    /// Returns the chunk count. Negative means the scalar is invalid.
    pub fn gigs(&self) -> i64 {
        self.gigs
    }

    /// Returns the remainder, always in `[0, ONE_GIG)` between operations.
    pub fn units(&self) -> i64 {
        self.units
    }

    /// Resets the scalar to represent `|value|`.
    pub fn load(&mut self, value: i64) {
        let magnitude = value.unsigned_abs();
        self.gigs = (magnitude / ONE_GIG as u64) as i64;
        self.units = (magnitude % ONE_GIG as u64) as i64;
    }

    /// Adds `|delta|`, carrying overflowing units into the chunk count.
    pub fn increase(&mut self, delta: i64) {
        let magnitude = delta.unsigned_abs();
        self.gigs += (magnitude / ONE_GIG as u64) as i64;
        self.units += (magnitude % ONE_GIG as u64) as i64;
        if self.units >= ONE_GIG {
            self.gigs += 1;
            self.units -= ONE_GIG;
        }
    }

    /// Subtracts `|delta|`, borrowing from the chunk count when the units
    /// would go negative. The chunk count may become negative, marking the
    /// scalar invalid.
    pub fn reduce(&mut self, delta: i64) {
        let magnitude = delta.unsigned_abs();
        self.gigs -= (magnitude / ONE_GIG as u64) as i64;
        self.units -= (magnitude % ONE_GIG as u64) as i64;
        if self.units < 0 {
            self.gigs -= 1;
            self.units += ONE_GIG;
        }
    }

    /// Multiplies by `|factor|`, exactly. A product beyond the
    /// representable range saturates rather than wrapping.
    pub fn multiply(&mut self, factor: i64) {
        let total = self.total().saturating_mul(i128::from(factor.unsigned_abs()));
        self.split(total);
    }

    /// Divides by `|divisor|`, exactly (truncating). A zero divisor is
    /// rejected and leaves the scalar unchanged.
    pub fn divide(&mut self, divisor: i64) -> Result<()> {
        if divisor == 0 {
            return Err(ErrorKind::DivideByZero);
        }

        let total = self.total() / i128::from(divisor.unsigned_abs());
        self.split(total);
        Ok(())
    }

    /// Adds another scalar: units via the carry path, chunk counts
    /// directly.
    pub fn add(&mut self, increment: &Scalar) {
        self.increase(increment.units);
        self.gigs += increment.gigs;
    }

    /// Subtracts another scalar: units via the borrow path, chunk counts
    /// directly.
    pub fn subtract(&mut self, decrement: &Scalar) {
        self.reduce(decrement.units);
        self.gigs -= decrement.gigs;
    }

    /// True unless an unrecoverable borrow has driven the chunk count
    /// negative.
    pub fn is_valid(&self) -> bool {
        self.gigs >= 0
    }

    fn total(&self) -> i128 {
        i128::from(self.gigs) * i128::from(ONE_GIG) + i128::from(self.units)
    }

    fn split(&mut self, total: i128) {
        self.gigs = (total / i128::from(ONE_GIG)).min(i128::from(i64::MAX)) as i64;
        self.units = (total % i128::from(ONE_GIG)) as i64;
    }
}
