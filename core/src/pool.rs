//! Pooled off-screen render targets.
//!
//! [`TargetPool`] models the host renderer's reusable texture pool: borrowing
//! hands out an exclusively-owned [`BorrowedTarget`], releasing returns it so
//! the underlying allocation can be reused by the next borrow of the same
//! shape. Release is an explicit call at a fixed orchestration point (the
//! start of the next frame), not drop timing, so a frame's texture stays
//! alive until the compositor is done with it.
//!
//! Because a [`BorrowedTarget`] is released *by value*, double-release is
//! unrepresentable; the pool tracks outstanding borrows so leaks show up as
//! a growing count.

/// Identifies a GPU texture owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeTextureHandle(pub u64);

/// Color formats the host pool can allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
}

/// An exclusively-owned, pooled off-screen color buffer.
#[derive(Debug)]
pub struct BorrowedTarget {
    tag: String,
    width: u32,
    height: u32,
    format: PixelFormat,
    native: NativeTextureHandle,
}

impl BorrowedTarget {
    /// Debug tag this target was borrowed under.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The underlying texture handle, e.g. for compositor submission.
    pub fn native(&self) -> NativeTextureHandle {
        self.native
    }
}

#[derive(Debug)]
struct FreeEntry {
    width: u32,
    height: u32,
    format: PixelFormat,
    native: NativeTextureHandle,
}

/// Pool of reusable color targets with single-borrower accounting.
#[derive(Debug, Default)]
pub struct TargetPool {
    free: Vec<FreeEntry>,
    next_handle: u64,
    outstanding: usize,
    peak_outstanding: usize,
    allocations: usize,
}

impl TargetPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a color target of the given shape.
    ///
    /// Reuses a matching freed allocation when one exists, otherwise
    /// allocates a fresh handle.
    pub fn borrow(
        &mut self,
        tag: &str,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> BorrowedTarget {
        let native = match self
            .free
            .iter()
            .position(|e| e.width == width && e.height == height && e.format == format)
        {
            Some(idx) => self.free.swap_remove(idx).native,
            None => {
                self.next_handle += 1;
                self.allocations += 1;
                log::trace!("target pool: allocating {width}x{height} {format:?} for '{tag}'");
                NativeTextureHandle(self.next_handle)
            }
        };

        self.outstanding += 1;
        self.peak_outstanding = self.peak_outstanding.max(self.outstanding);

        BorrowedTarget {
            tag: tag.to_string(),
            width,
            height,
            format,
            native,
        }
    }

    /// Return a borrowed target to the pool.
    ///
    /// The target must have been borrowed from this pool.
    pub fn release(&mut self, target: BorrowedTarget) {
        self.outstanding -= 1;
        self.free.push(FreeEntry {
            width: target.width,
            height: target.height,
            format: target.format,
            native: target.native,
        });
    }

    /// Number of currently borrowed targets.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Highest number of simultaneous borrows ever observed.
    pub fn peak_outstanding(&self) -> usize {
        self.peak_outstanding
    }

    /// Number of freed targets available for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total fresh allocations performed (reuse does not count).
    pub fn allocations(&self) -> usize {
        self.allocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrow_and_release_round_trip() {
        let mut pool = TargetPool::new();

        let target = pool.borrow("scene", 1920, 1080, PixelFormat::Rgba8UnormSrgb);
        assert_eq!(pool.outstanding(), 1);
        assert_eq!(target.width(), 1920);
        assert_eq!(target.tag(), "scene");

        pool.release(target);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn matching_shape_reuses_allocation() {
        let mut pool = TargetPool::new();

        let first = pool.borrow("scene", 800, 600, PixelFormat::Rgba8Unorm);
        let handle = first.native();
        pool.release(first);

        let second = pool.borrow("scene", 800, 600, PixelFormat::Rgba8Unorm);
        assert_eq!(second.native(), handle);
        assert_eq!(pool.allocations(), 1);
    }

    #[test]
    fn mismatched_shape_allocates_fresh() {
        let mut pool = TargetPool::new();

        let first = pool.borrow("scene", 800, 600, PixelFormat::Rgba8Unorm);
        pool.release(first);

        let second = pool.borrow("scene", 1024, 768, PixelFormat::Rgba8Unorm);
        assert_eq!(pool.allocations(), 2);
        pool.release(second);
        assert_eq!(pool.free_count(), 2);
    }

    #[test]
    fn release_before_reacquire_never_exceeds_one_outstanding() {
        let mut pool = TargetPool::new();
        let mut held: Option<BorrowedTarget> = None;

        for _ in 0..1000 {
            if let Some(previous) = held.take() {
                pool.release(previous);
            }
            held = Some(pool.borrow("eye", 1512, 1680, PixelFormat::Rgba8UnormSrgb));
            assert!(pool.outstanding() <= 1);
        }

        assert_eq!(pool.peak_outstanding(), 1);
        // One allocation serves all 1000 frames.
        assert_eq!(pool.allocations(), 1);
    }

    #[test]
    fn peak_tracks_simultaneous_borrows() {
        let mut pool = TargetPool::new();

        let a = pool.borrow("a", 64, 64, PixelFormat::Rgba8Unorm);
        let b = pool.borrow("b", 64, 64, PixelFormat::Rgba8Unorm);
        assert_eq!(pool.peak_outstanding(), 2);

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.peak_outstanding(), 2);
    }
}
