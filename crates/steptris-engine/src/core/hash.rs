/// Base of the polynomial state hashes.
pub const HASH_BASE: i64 = 919;

/// Folds one value into a running polynomial hash: `h * 919 + value`.
///
/// Arithmetic wraps so that long folds (every board cell) never overflow.
#[must_use]
pub const fn fold(hash: i64, value: i64) -> i64 {
    hash.wrapping_mul(HASH_BASE).wrapping_add(value)
}
