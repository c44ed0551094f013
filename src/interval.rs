//! Interval algebra over the extended reals (spec.md §2 item 1, §4.7 of SPEC_FULL.md).
//!
//! Used by `meet.rs`/`subtype.rs` for `minimum`/`maximum`/`minLength`/`maxLength`/
//! `minItems`/`maxItems`/`minProperties`/`maxProperties` and their open/closed senses.

use std::cmp::Ordering;

/// A bound on one side of an interval: a finite value, or an infinity in that direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    NegInfinity,
    Finite(f64),
    PosInfinity,
}

impl Bound {
    fn as_f64(self) -> f64 {
        match self {
            Self::NegInfinity => f64::NEG_INFINITY,
            Self::Finite(v) => v,
            Self::PosInfinity => f64::INFINITY,
        }
    }

    fn partial_cmp_value(self, other: Self) -> Ordering {
        self.as_f64().partial_cmp(&other.as_f64()).unwrap_or(Ordering::Equal)
    }
}

/// A closed-or-open interval `[lo, hi]`/`(lo, hi]`/etc. over the extended reals.
///
/// `lo_exclusive`/`hi_exclusive` record whether the respective endpoint is open
/// (as for JSON Schema draft-4's boolean `exclusiveMinimum`/`exclusiveMaximum`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Interval {
    pub(crate) lo: Bound,
    pub(crate) lo_exclusive: bool,
    pub(crate) hi: Bound,
    pub(crate) hi_exclusive: bool,
}

impl Interval {
    pub(crate) const fn everything() -> Self {
        Self {
            lo: Bound::NegInfinity,
            lo_exclusive: false,
            hi: Bound::PosInfinity,
            hi_exclusive: false,
        }
    }

    pub(crate) fn closed(lo: f64, hi: f64) -> Self {
        Self {
            lo: Bound::Finite(lo),
            lo_exclusive: false,
            hi: Bound::Finite(hi),
            hi_exclusive: false,
        }
    }

    pub(crate) fn at_least(lo: f64, exclusive: bool) -> Self {
        Self {
            lo: Bound::Finite(lo),
            lo_exclusive: exclusive,
            hi: Bound::PosInfinity,
            hi_exclusive: false,
        }
    }

    pub(crate) fn at_most(hi: f64, exclusive: bool) -> Self {
        Self {
            lo: Bound::NegInfinity,
            lo_exclusive: false,
            hi: Bound::Finite(hi),
            hi_exclusive: exclusive,
        }
    }

    /// `true` iff the interval denotes the empty set.
    pub(crate) fn is_empty(&self) -> bool {
        match self.lo.partial_cmp_value(self.hi) {
            Ordering::Greater => true,
            Ordering::Equal => self.lo_exclusive || self.hi_exclusive,
            Ordering::Less => false,
        }
    }

    /// `true` iff `value` lies within the interval.
    pub(crate) fn contains_value(&self, value: f64) -> bool {
        let above_lo = match self.lo {
            Bound::NegInfinity => true,
            Bound::Finite(lo) => {
                if self.lo_exclusive {
                    value > lo
                } else {
                    value >= lo
                }
            }
            Bound::PosInfinity => false,
        };
        let below_hi = match self.hi {
            Bound::PosInfinity => true,
            Bound::Finite(hi) => {
                if self.hi_exclusive {
                    value < hi
                } else {
                    value <= hi
                }
            }
            Bound::NegInfinity => false,
        };
        above_lo && below_hi
    }

    /// The tightest lower bound of `self` and `other`, preserving the exclusive/inclusive
    /// sense of whichever side is strictly tighter (ties prefer the exclusive sense).
    fn meet_lo(a_lo: Bound, a_excl: bool, b_lo: Bound, b_excl: bool) -> (Bound, bool) {
        match a_lo.partial_cmp_value(b_lo) {
            Ordering::Greater => (a_lo, a_excl),
            Ordering::Less => (b_lo, b_excl),
            Ordering::Equal => (a_lo, a_excl || b_excl),
        }
    }

    fn meet_hi(a_hi: Bound, a_excl: bool, b_hi: Bound, b_excl: bool) -> (Bound, bool) {
        match a_hi.partial_cmp_value(b_hi) {
            Ordering::Less => (a_hi, a_excl),
            Ordering::Greater => (b_hi, b_excl),
            Ordering::Equal => (a_hi, a_excl || b_excl),
        }
    }

    /// `S1 ∧ S2` restricted to the interval component: `[max(lo1,lo2), min(hi1,hi2)]`.
    pub(crate) fn meet(&self, other: &Self) -> Self {
        let (lo, lo_exclusive) = Self::meet_lo(self.lo, self.lo_exclusive, other.lo, other.lo_exclusive);
        let (hi, hi_exclusive) = Self::meet_hi(self.hi, self.hi_exclusive, other.hi, other.hi_exclusive);
        Self {
            lo,
            lo_exclusive,
            hi,
            hi_exclusive,
        }
    }

    /// `true` iff `self ⊆ other` as sets of reals.
    pub(crate) fn contains_interval(&self, other: &Self) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        let lo_ok = match self.lo.partial_cmp_value(other.lo) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => self.lo_exclusive <= other.lo_exclusive,
        };
        let hi_ok = match self.hi.partial_cmp_value(other.hi) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.hi_exclusive <= other.hi_exclusive,
        };
        lo_ok && hi_ok
    }
}

/// Greatest common divisor of two strictly-positive rationals represented as `f64`,
/// used for `multipleOf`. Falls back to the larger value when an exact gcd over the
/// floating representation can't be established (e.g. irrational-looking inputs),
/// matching the "be permissive rather than wrong" stance of the uninhabitedness checks.
pub(crate) fn gcd_f64(a: f64, b: f64) -> f64 {
    let mut a = a.abs();
    let mut b = b.abs();
    if a == 0.0 {
        return b;
    }
    if b == 0.0 {
        return a;
    }
    // Scale to integers when both operands are "nice" decimals, otherwise approximate
    // via the Euclidean algorithm directly on the floats (bounded iteration count).
    for _ in 0..64 {
        if b.abs() < 1e-9 {
            break;
        }
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// `lcm(a, b) = a * b / gcd(a, b)`.
pub(crate) fn lcm_f64(a: f64, b: f64) -> f64 {
    let g = gcd_f64(a, b);
    if g == 0.0 {
        0.0
    } else {
        (a / g * b).abs()
    }
}

/// `true` iff `n` is an integer multiple of `divisor` (within floating tolerance).
pub(crate) fn is_multiple_of(n: f64, divisor: f64) -> bool {
    if divisor == 0.0 {
        return false;
    }
    let ratio = n / divisor;
    (ratio - ratio.round()).abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::{gcd_f64, is_multiple_of, lcm_f64, Bound, Interval};
    use test_case::test_case;

    #[test_case(Interval::closed(0.0, 10.0) => false)]
    #[test_case(Interval::closed(10.0, 0.0) => true)]
    #[test_case(Interval { lo: Bound::Finite(1.0), lo_exclusive: false, hi: Bound::Finite(1.0), hi_exclusive: true } => true)]
    fn test_is_empty(interval: Interval) -> bool {
        interval.is_empty()
    }

    #[test_case(Interval::closed(0.0, 10.0), 5.0 => true)]
    #[test_case(Interval::closed(0.0, 10.0), 10.0 => true)]
    #[test_case(Interval { lo: Bound::Finite(0.0), lo_exclusive: false, hi: Bound::Finite(10.0), hi_exclusive: true }, 10.0 => false)]
    fn test_contains_value(interval: Interval, value: f64) -> bool {
        interval.contains_value(value)
    }

    #[test_case(Interval::closed(0.0, 10.0), Interval::closed(5.0, 20.0) => Interval::closed(5.0, 10.0))]
    fn test_meet(a: Interval, b: Interval) -> Interval {
        a.meet(&b)
    }

    #[test_case(Interval::closed(2.0, 8.0), Interval::closed(0.0, 10.0) => true)]
    #[test_case(Interval::closed(0.0, 10.0), Interval::closed(2.0, 8.0) => false)]
    fn test_contains_interval(a: Interval, b: Interval) -> bool {
        a.contains_interval(&b)
    }

    #[test_case(4.0, 6.0 => 2.0)]
    #[test_case(5.0, 5.0 => 5.0)]
    fn test_gcd(a: f64, b: f64) -> f64 {
        gcd_f64(a, b)
    }

    #[test_case(4.0, 6.0 => 12.0)]
    fn test_lcm(a: f64, b: f64) -> f64 {
        lcm_f64(a, b)
    }

    #[test_case(9.0, 3.0 => true)]
    #[test_case(10.0, 3.0 => false)]
    fn test_is_multiple_of(n: f64, divisor: f64) -> bool {
        is_multiple_of(n, divisor)
    }
}
