//! Test-only helpers shared between the test modules.
extern crate std;

use std::{collections::BTreeMap, ptr::NonNull};

/// Cross-checks what the allocator hands out: payload ranges must be
/// aligned, mutually disjoint, inside the arena, and freed exactly once.
pub(crate) struct ShadowAllocator {
    /// Live payload ranges, keyed by start address. Zero-size
    /// allocations are recorded as one byte so duplicates still collide.
    live: BTreeMap<usize, usize>,
}

impl ShadowAllocator {
    pub(crate) fn new() -> Self {
        Self {
            live: BTreeMap::new(),
        }
    }

    /// Verify no live allocation sticks out of the arena span.
    pub(crate) fn assert_inside(&self, base: usize, len: usize) {
        if let Some((&start, _)) = self.live.iter().next() {
            assert!(
                start >= base,
                "allocation at {:#x} starts before the arena",
                start
            );
        }
        if let Some((&start, &size)) = self.live.iter().next_back() {
            assert!(
                start + size <= base + len,
                "allocation at {:#x} sticks out of the arena",
                start
            );
        }
    }

    pub(crate) fn allocate(&mut self, size: usize, align: usize, ptr: NonNull<u8>) {
        let start = ptr.as_ptr() as usize;
        assert!(
            start % align == 0,
            "{:#x} is not aligned to {:#x} bytes",
            start,
            align
        );
        let footprint = size.max(1);
        if let Some((&prev, &prev_size)) = self.live.range(..=start).next_back() {
            assert!(
                prev + prev_size <= start,
                "{:#x} overlaps the allocation at {:#x}",
                start,
                prev
            );
        }
        if let Some((&next, _)) = self.live.range(start..).next() {
            assert!(
                start + footprint <= next,
                "{:#x} overlaps the allocation at {:#x}",
                start,
                next
            );
        }
        self.live.insert(start, footprint);
    }

    pub(crate) fn deallocate(&mut self, size: usize, ptr: NonNull<u8>) {
        let start = ptr.as_ptr() as usize;
        let footprint = self
            .live
            .remove(&start)
            .expect("freeing an unknown allocation");
        assert_eq!(footprint, size.max(1), "freeing with a mismatched size");
    }
}
