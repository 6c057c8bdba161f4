//! A page-backed arena source for unix hosts.
use core::ptr::NonNull;

use super::ArenaSource;
use crate::tlsf::ALIGN;

/// An [`ArenaSource`] backed by an anonymous memory mapping.
///
/// The whole `max_len` of address space is reserved up front with
/// `PROT_NONE`, so the base address never moves. `resize` commits pages
/// with `mprotect` on grow and hands them back to the OS with
/// `madvise(MADV_DONTNEED)` on shrink, keeping the address range
/// reserved for future growth. Dropping the source unmaps the whole
/// reservation.
#[cfg_attr(feature = "doc_cfg", doc(cfg(unix)))]
#[derive(Debug)]
pub struct MmapSource {
    start: NonNull<u8>,
    reserved: usize,
    page_size: usize,
}

impl MmapSource {
    /// Reserve address space for an arena of up to `max_len` bytes
    /// (rounded up to whole pages).
    ///
    /// Returns `None` if `max_len` is zero or the reservation fails.
    pub fn new(max_len: usize) -> Option<Self> {
        // Safety: `sysconf` has no preconditions.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize;
        if !page_size.is_power_of_two() || page_size < ALIGN {
            return None;
        }
        let reserved = max_len.checked_add(page_size - 1)? & !(page_size - 1);
        if reserved == 0 {
            return None;
        }

        // Safety: a fresh anonymous reservation; no existing mapping is
        //         touched.
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                reserved,
                libc::PROT_NONE,
                libc::MAP_ANONYMOUS | libc::MAP_PRIVATE | libc::MAP_NORESERVE,
                -1,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return None;
        }

        Some(Self {
            // Safety: `mmap` does not return a null mapping on success.
            start: unsafe { NonNull::new_unchecked(ptr as *mut u8) },
            reserved,
            page_size,
        })
    }

    /// The size of the underlying reservation.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    #[inline]
    fn page_round_up(&self, len: usize) -> usize {
        (len + self.page_size - 1) & !(self.page_size - 1)
    }
}

unsafe impl ArenaSource for MmapSource {
    #[inline]
    fn base(&self) -> NonNull<u8> {
        self.start
    }

    unsafe fn resize(&mut self, old_len: usize, new_len: usize) -> usize {
        let old_commit = self.page_round_up(old_len);
        let new_commit = self.page_round_up(new_len);
        if new_commit > self.reserved {
            return old_len;
        }

        if new_commit > old_commit {
            let rc = libc::mprotect(
                self.start.as_ptr().add(old_commit) as *mut _,
                new_commit - old_commit,
                libc::PROT_READ | libc::PROT_WRITE,
            );
            if rc != 0 {
                return old_len;
            }
        } else if new_commit < old_commit {
            let tail = self.start.as_ptr().add(new_commit) as *mut _;
            // Hand the backing pages to the OS but keep the address
            // range reserved.
            libc::madvise(tail, old_commit - new_commit, libc::MADV_DONTNEED);
            libc::mprotect(tail, old_commit - new_commit, libc::PROT_NONE);
        }

        new_len
    }
}

impl Drop for MmapSource {
    fn drop(&mut self) {
        // Safety: `[start, start + reserved)` is the mapping created in
        //         `new` and nothing else unmaps it.
        unsafe { libc::munmap(self.start.as_ptr() as *mut _, self.reserved) };
    }
}

// Safety: the source exclusively owns its reservation.
unsafe impl Send for MmapSource {}
unsafe impl Sync for MmapSource {}
