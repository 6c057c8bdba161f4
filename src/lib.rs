//! This crate implements the TLSF (Two-Level Segregated Fit) dynamic
//! memory allocation algorithm¹ over a single contiguous arena that the
//! host application supplies and resizes on demand.
//!
//!  - **Allocation and deallocation operations are guaranteed to complete
//!    in constant time.** TLSF is suitable for real-time applications.
//!
//!  - **The arena is elastic.** The allocator owns one contiguous region
//!    and negotiates its length with the host through the [`ArenaSource`]
//!    trait. It grows the arena when the segregated index has no suitable
//!    block and hands the tail back as soon as a deallocation frees it;
//!    freeing the last outstanding block returns the whole arena to the
//!    host. A host that refuses to grow yields a fixed-size memory pool.
//!
//!  - **This crate supports `#![no_std]`.** It can be used in bare-metal
//!    and RTOS-based applications.
//!
//! <sub>¹ M. Masmano, I. Ripoll, A. Crespo and J. Real, "TLSF: a new
//! dynamic memory allocator for real-time systems," *Proceedings. 16th
//! Euromicro Conference on Real-Time Systems*, 2004. ECRTS 2004.,
//! Catania, Italy, 2004, pp. 79-88, doi: 10.1109/EMRTS.2004.1311009.</sub>
//!
//! # Examples
//!
//! ## Fixed pool backed by a borrowed buffer
//!
//! ```rust
//! use tlsf_arena::{SliceSource, Tlsf};
//! use std::mem::MaybeUninit;
//!
//! let mut backing = [MaybeUninit::uninit(); 65536];
//! let mut tlsf = Tlsf::new(SliceSource::new(&mut backing));
//!
//! unsafe {
//!     let mut ptr1 = tlsf.allocate(4).unwrap().cast::<u32>();
//!     let mut ptr2 = tlsf.allocate(4).unwrap().cast::<u32>();
//!     *ptr1.as_mut() = 42;
//!     *ptr2.as_mut() = 56;
//!     assert_eq!(*ptr1.as_ref(), 42);
//!     assert_eq!(*ptr2.as_ref(), 56);
//!     tlsf.deallocate(ptr1.cast());
//!     tlsf.deallocate(ptr2.cast());
//! }
//! ```
//!
//! ## Page-backed arena (unix)
//!
//! ```rust
//! # #[cfg(unix)] {
//! use tlsf_arena::{MmapSource, Tlsf};
//!
//! let mut tlsf = Tlsf::new(MmapSource::new(1 << 24).unwrap());
//!
//! let ptr = tlsf.allocate(4096).unwrap();
//! unsafe { tlsf.deallocate(ptr) };
//!
//! // The last deallocation handed the arena back in full.
//! assert_eq!(tlsf.arena_len(), 0);
//! # }
//! ```
//!
//! # Details
//!
//! ## Changes from the Original Algorithm
//!
//!  - The arena is capped by a zero-size sentinel block (a permanently
//!    occupied block) instead of a normal block with a last-block flag.
//!    This makes "is this the last block?" a plain size test and lets the
//!    grow/shrink protocol reuse the merge logic unchanged.
//!
//!  - Growing and shrinking happen at the sentinel only: a grow turns the
//!    old sentinel into a free block spanning the fresh bytes, a shrink
//!    retires the tail block and rewrites its header as the new sentinel.
#![no_std]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

mod source;
mod tlsf;
mod utils;
pub use self::{
    source::*,
    tlsf::{Tlsf, ALIGN, FL_COUNT, MAX_ALLOC_SIZE, SL_COUNT},
};

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod tests;
