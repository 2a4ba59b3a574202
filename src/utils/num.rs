//! Numeric utilities: safe and centralized integer conversions.
//!
//! Guidelines
//! - Prefer fallible conversions (returning Option<T>) when a value out of range should stop the operation (e.g., parsing a page number).
//! - Prefer saturating conversions when best-effort is acceptable and clamping is safer than panicking or truncating (e.g., pagination offsets, durations in logs).

#[inline]
#[must_use]
pub fn u32_to_usize(v: u32) -> usize {
    usize::try_from(v).unwrap_or(usize::MAX)
}

#[inline]
#[must_use]
pub fn i64_to_usize(v: i64) -> Option<usize> {
    usize::try_from(v).ok()
}

#[inline]
#[must_use]
pub fn usize_to_u64(v: usize) -> u64 {
    u64::try_from(v).unwrap_or(u64::MAX)
}

#[inline]
#[must_use]
pub fn u128_to_u64_saturating(v: u128) -> u64 {
    if v > u128::from(u64::MAX) { u64::MAX } else { v as u64 }
}

/// `(page - 1) * per_page` without overflow.
#[inline]
#[must_use]
pub fn page_offset(page: usize, per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(per_page)
}
