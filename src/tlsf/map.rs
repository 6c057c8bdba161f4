//! Size classes: the mapping between block sizes and `(fl, sl)` free-list
//! indices.
use crate::utils::log2_floor;

use super::{
    block::BLOCK_SIZE_MIN, ALIGN, BLOCK_SIZE_SMALL, FL_COUNT, FL_SHIFT, SL_COUNT, SL_SHIFT,
};

/// Round a requested size up to `align` and to the allocator minimum.
///
/// Saturates instead of wrapping, so requests near `usize::MAX` fail the
/// caller's maximum-size test rather than aliasing a small size.
#[inline]
pub(super) fn adjust_size(size: usize, align: usize) -> usize {
    debug_assert!(align.is_power_of_two());
    let size = size.saturating_add(align - 1) & !(align - 1);
    if size < BLOCK_SIZE_MIN {
        BLOCK_SIZE_MIN
    } else {
        size
    }
}

/// Round a size up so that every block on the list found by
/// [`map`]`(round_size(size))` is large enough to hold `size` bytes.
#[inline]
pub(super) fn round_size(size: usize) -> usize {
    debug_assert!(size >= BLOCK_SIZE_MIN);
    if size >= BLOCK_SIZE_SMALL {
        let t = (1usize << (log2_floor(size) - SL_SHIFT)) - 1;
        (size + t) & !t
    } else {
        // Small sizes map one-to-one onto second-level lists.
        size
    }
}

/// Classify a block size into its `(fl, sl)` free-list index.
#[inline]
pub(super) fn map(size: usize) -> (usize, usize) {
    debug_assert!(size >= BLOCK_SIZE_MIN);
    debug_assert!(size % ALIGN == 0);
    let (fl, sl) = if size < BLOCK_SIZE_SMALL {
        // The whole small regime lives under the first level.
        (0, size / (BLOCK_SIZE_SMALL / SL_COUNT))
    } else {
        let t = log2_floor(size);
        (
            (t - FL_SHIFT + 1) as usize,
            (size >> (t - SL_SHIFT)) ^ SL_COUNT,
        )
    };
    debug_assert!(fl < FL_COUNT, "wrong first level");
    debug_assert!(sl < SL_COUNT, "wrong second level");
    (fl, sl)
}
