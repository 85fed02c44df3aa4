//! Wraparound-safe sequence arithmetic
//!
//! Sequence numbers live on a ring of `u64` values. These two functions are
//! the only place the queue reasons about wraparound; everything above them
//! works in terms of distances and windows.

/// Forward distance walking from `a` to `b` around the sequence ring.
///
/// When `b` has wrapped past `u64::MAX` (i.e. `a > b`) the result is
/// `u64::MAX - (a - b + 1)`, which is shorter than plain modular
/// subtraction. Acknowledgment trimming is pinned to this exact value.
///
/// # Examples
/// ```
/// use seqqueue::queue::sequence::cyclic_distance;
///
/// assert_eq!(cyclic_distance(0, 10), 10);
/// assert_eq!(cyclic_distance(10, 0), u64::MAX - 11);
/// ```
pub const fn cyclic_distance(a: u64, b: u64) -> u64 {
    if a <= b {
        b - a
    } else {
        // a - b + 1 only overflows for (u64::MAX, 0); wrap there like the ring does
        u64::MAX.wrapping_sub((a - b).wrapping_add(1))
    }
}

/// Whether `seq` lies in the half-open cyclic interval `[start, end)`.
///
/// An interval with `start == end` is empty. When `start > end` the
/// interval wraps past `u64::MAX` back to zero.
///
/// # Examples
/// ```
/// use seqqueue::queue::sequence::in_window;
///
/// assert!(in_window(0, 10, 5));
/// assert!(in_window(10, 0, 15));
/// assert!(!in_window(0, 0, 0));
/// ```
pub const fn in_window(start: u64, end: u64, seq: u64) -> bool {
    if start <= end {
        start <= seq && seq < end
    } else {
        start <= seq || seq < end
    }
}
