//! Block headers and physical-neighbor operations.
use core::{mem, ptr::NonNull};

use super::ALIGN;

/// The per-block overhead: one machine word holding the size and the
/// status bits.
pub(crate) const BLOCK_OVERHEAD: usize = mem::size_of::<usize>();

/// The minimum payload size of a block.
///
/// A free block's payload must hold the two free-list links, and its last
/// word doubles as the successor's back-pointer slot; three words keep the
/// two from overlapping.
pub(crate) const BLOCK_SIZE_MIN: usize = mem::size_of::<FreeBlockHdr>();

/// The bit of [`BlockHdr::size`] indicating the block is on a free list.
pub(crate) const SIZE_FREE: usize = 1;
/// The bit of [`BlockHdr::size`] indicating the physical predecessor is
/// free, which is what makes the back-pointer slot before the header
/// valid.
pub(crate) const SIZE_PREV_FREE: usize = 2;
const SIZE_MASK: usize = !(SIZE_FREE | SIZE_PREV_FREE);

const _: () = assert!(BLOCK_SIZE_MIN == 3 * BLOCK_OVERHEAD, "free header layout is wrong");

/// The header of a memory block.
///
/// The word immediately *before* a header is the back-pointer slot: when
/// [`SIZE_PREV_FREE`] is set it holds the address of the preceding free
/// block's header. That word is physically the last payload word of the
/// predecessor, so every block that has a predecessor also has the slot.
#[repr(transparent)]
#[derive(Debug)]
pub(crate) struct BlockHdr {
    /// The payload size in bytes, with [`SIZE_FREE`] and
    /// [`SIZE_PREV_FREE`] stored in the low bits.
    pub(crate) size: usize,
}

impl BlockHdr {
    /// The payload size in bytes. Zero only for the sentinel.
    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size & SIZE_MASK
    }

    #[inline]
    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size % ALIGN == 0, "invalid size");
        self.size = size | (self.size & !SIZE_MASK);
    }

    #[inline]
    pub(crate) fn is_free(&self) -> bool {
        self.size & SIZE_FREE != 0
    }

    #[inline]
    pub(crate) fn is_prev_free(&self) -> bool {
        self.size & SIZE_PREV_FREE != 0
    }

    #[inline]
    pub(crate) fn set_prev_free(&mut self, free: bool) {
        self.size = if free {
            self.size | SIZE_PREV_FREE
        } else {
            self.size & !SIZE_PREV_FREE
        };
    }

    /// The payload address: one word past the header.
    #[inline]
    pub(crate) fn payload(&self) -> NonNull<u8> {
        // Safety: one past a non-null header is not null.
        unsafe { NonNull::new_unchecked((self as *const _ as *mut u8).add(BLOCK_OVERHEAD)) }
    }

    /// Recover a block header from a payload pointer handed out by the
    /// allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must be the payload address of a live block.
    #[inline]
    pub(crate) unsafe fn from_payload(ptr: NonNull<u8>) -> NonNull<BlockHdr> {
        debug_assert!(ptr.as_ptr() as usize % ALIGN == 0, "payload not aligned");
        NonNull::new_unchecked(ptr.as_ptr().sub(BLOCK_OVERHEAD)).cast()
    }

    /// Get the next physical block.
    ///
    /// # Safety
    ///
    /// `self` must not be the sentinel.
    #[inline]
    pub(crate) unsafe fn next_phys(&self) -> NonNull<BlockHdr> {
        debug_assert!(self.size() != 0, "block is last");
        NonNull::new_unchecked((self as *const _ as *mut u8).add(BLOCK_OVERHEAD + self.size()))
            .cast()
    }

    /// Get the previous physical block through the back-pointer slot.
    ///
    /// # Safety
    ///
    /// [`Self::is_prev_free`] must be set; otherwise the slot holds
    /// arbitrary payload bytes of the predecessor.
    #[inline]
    pub(crate) unsafe fn prev_phys(&self) -> NonNull<BlockHdr> {
        debug_assert!(self.is_prev_free(), "previous block must be free");
        *(self as *const _ as *const NonNull<BlockHdr>).sub(1)
    }

    /// Write `self`'s address into the successor's back-pointer slot and
    /// return the successor.
    ///
    /// # Safety
    ///
    /// Same as [`Self::next_phys`].
    #[inline]
    pub(crate) unsafe fn link_next(&mut self) -> NonNull<BlockHdr> {
        let this = NonNull::from(&mut *self);
        let next = self.next_phys();
        next.cast::<NonNull<BlockHdr>>().as_ptr().sub(1).write(this);
        next
    }

    /// Flip the `FREE` bit and propagate it: the successor's `PREV_FREE`
    /// follows, and when freeing, the successor's back-pointer slot is
    /// made valid.
    ///
    /// # Safety
    ///
    /// Same as [`Self::next_phys`].
    #[inline]
    pub(crate) unsafe fn set_free(&mut self, free: bool) {
        debug_assert_ne!(self.is_free(), free, "block free bit unchanged");
        self.size = if free {
            self.size | SIZE_FREE
        } else {
            self.size & !SIZE_FREE
        };
        let mut next = self.link_next();
        next.as_mut().set_prev_free(free);
    }

    /// Whether keeping a `size`-byte payload leaves room for a valid free
    /// remainder block.
    #[inline]
    pub(crate) fn can_split(&self, size: usize) -> bool {
        self.size() >= size + BLOCK_OVERHEAD + BLOCK_SIZE_MIN
    }

    /// Shrink `self`'s payload to `size` bytes and return the remainder
    /// as a new free block. The remainder's successor gets `PREV_FREE`
    /// set and a valid back-pointer; re-indexing both halves is the
    /// caller's responsibility.
    ///
    /// # Safety
    ///
    /// `self.can_split(size)` must hold and `size` must be a multiple of
    /// [`ALIGN`].
    pub(crate) unsafe fn split(&mut self, size: usize) -> NonNull<BlockHdr> {
        let rest_size = self.size() - (size + BLOCK_OVERHEAD);
        debug_assert!(rest_size >= BLOCK_SIZE_MIN, "remainder is too small");
        debug_assert!(rest_size % ALIGN == 0, "invalid remainder size");
        let mut rest: NonNull<BlockHdr> =
            NonNull::new_unchecked((self as *mut _ as *mut u8).add(BLOCK_OVERHEAD + size)).cast();
        rest.as_mut().size = rest_size;
        rest.as_mut().set_free(true);
        self.set_size(size);
        rest
    }

    /// Merge the physical successor `next` into `self`, leaving `self`'s
    /// status bits untouched.
    ///
    /// # Safety
    ///
    /// `next` must be `self`'s physical successor and must not be the
    /// sentinel.
    pub(crate) unsafe fn absorb(&mut self, next: NonNull<BlockHdr>) {
        debug_assert!(self.size() != 0, "sentinel cannot absorb");
        self.size += next.as_ref().size() + BLOCK_OVERHEAD;
        self.link_next();
    }
}

/// The header of a free block: the common header followed by the
/// free-list links, which occupy the first two payload words.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct FreeBlockHdr {
    pub(crate) common: BlockHdr,
    pub(crate) next_free: Option<NonNull<FreeBlockHdr>>,
    pub(crate) prev_free: Option<NonNull<FreeBlockHdr>>,
}
