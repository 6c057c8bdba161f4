use core::mem::MaybeUninit;

use super::*;

#[test]
fn slice_source_aligns_base() {
    let mut buffer = [MaybeUninit::<u8>::uninit(); 256];
    for offset in 0..ALIGN {
        let source = SliceSource::new(&mut buffer[offset..]);
        assert_eq!(source.base().as_ptr() as usize % ALIGN, 0);
        assert_eq!(source.capacity() % ALIGN, 0);
        assert!(source.capacity() <= 256 - offset);
    }
}

#[test]
fn slice_source_refuses_overgrowth() {
    let mut buffer = [MaybeUninit::<u8>::uninit(); 64];
    let mut source = SliceSource::new(&mut buffer);
    let capacity = source.capacity();
    assert!(capacity > 0);
    unsafe {
        assert_eq!(source.resize(0, capacity), capacity);
        assert_eq!(source.resize(capacity, capacity + 1), capacity);
        assert_eq!(source.resize(capacity, 0), 0);
    }
}

#[test]
fn slice_source_tiny_buffer() {
    let mut buffer = [MaybeUninit::<u8>::uninit(); 3];
    let mut source = SliceSource::new(&mut buffer);
    assert_eq!(source.capacity(), 0);
    assert_eq!(source.base().as_ptr() as usize % ALIGN, 0);
    unsafe {
        assert_eq!(source.resize(0, ALIGN), 0);
    }
}

#[cfg(unix)]
mod mmap {
    use super::*;

    #[test]
    fn commits_and_releases_pages() {
        let mut source = MmapSource::new(1 << 20).unwrap();
        assert!(source.reserved() >= 1 << 20);
        let base = source.base();
        assert_eq!(base.as_ptr() as usize % ALIGN, 0);
        unsafe {
            assert_eq!(source.resize(0, 4096), 4096);
            // The committed bytes are writable.
            base.as_ptr().write_bytes(0xa5, 4096);
            assert_eq!(source.resize(4096, 1 << 20), 1 << 20);
            assert_eq!(*base.as_ptr(), 0xa5);
            // Past the reservation: refused, the old length stands.
            assert_eq!(source.resize(1 << 20, (1 << 20) + 1), 1 << 20);
            assert_eq!(source.resize(1 << 20, 0), 0);
        }
    }

    #[test]
    fn rejects_empty_reservation() {
        assert!(MmapSource::new(0).is_none());
    }
}
