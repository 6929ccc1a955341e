//! Fixed-point percentage comparisons.

use svrp_types::PCT_BASE;

/// Whether `value / total` is strictly above `pct` (in `PCT_BASE` units).
///
/// `value * PCT_BASE / total > pct` with floor division, evaluated without
/// overflow. A zero total is never above anything.
pub fn is_value_pct(value: u128, total: u128, pct: u128) -> bool {
    if total == 0 {
        return false;
    }
    // floor(v * B / t) > p  <=>  v * B >= (p + 1) * t
    let Some(next) = pct.checked_add(1) else {
        return false;
    };
    mul_wide(value, PCT_BASE) >= mul_wide(next, total)
}

/// Full 256-bit product as `(high, low)`.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let lo_lo = a_lo * b_lo;
    let hi_lo = a_hi * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_hi = a_hi * b_hi;

    let cross = (lo_lo >> 64) + (hi_lo & MASK) + (lo_hi & MASK);
    let low = (cross << 64) | (lo_lo & MASK);
    let high = hi_hi + (hi_lo >> 64) + (lo_hi >> 64) + (cross >> 64);
    (high, low)
}
