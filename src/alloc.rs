//! A pluggable allocator collaborator (spec §5/§1 "external collaborators").
//!
//! Grids and meshes in this crate own their memory through ordinary `Vec`/`Box`/`Arc`
//! and never consult this trait directly; it exists as an interface a caller embedding
//! `sylves` in a constrained environment (e.g. a custom game engine with its own arena)
//! may install, mirroring the source's pluggable-allocator seam.

use std::alloc::{GlobalAlloc, Layout, System};

use once_cell::sync::OnceCell;

/// A narrow allocator interface, independent of the global allocator `sylves` itself
/// uses for its own `Vec`/`Box` storage.
pub trait Allocator: Send + Sync {
    /// # Safety
    /// Same contract as [`GlobalAlloc::alloc`]: `layout` must have non-zero size.
    unsafe fn alloc(&self, layout: Layout) -> *mut u8;

    /// # Safety
    /// `ptr` must have been returned by a prior call to [`Allocator::alloc`] on this
    /// same allocator with the same `layout`.
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// Forwards to `std`'s global allocator. The default installed by [`allocator`] when
/// no caller ever calls [`set_allocator`].
#[derive(Debug, Default)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

static ALLOCATOR: OnceCell<Box<dyn Allocator>> = OnceCell::new();

/// Installs the process-wide allocator collaborator. Must be called before the first
/// call to [`allocator`]; later calls are ignored (the first installation wins), the
/// same one-shot contract as `once_cell::sync::OnceCell::set`.
pub fn set_allocator(allocator: Box<dyn Allocator>) {
    let _ = ALLOCATOR.set(allocator);
}

/// The installed allocator, defaulting to [`SystemAllocator`] if none was set.
pub fn allocator() -> &'static dyn Allocator {
    ALLOCATOR.get_or_init(|| Box::new(SystemAllocator)).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allocator_round_trips_a_layout() {
        let layout = Layout::from_size_align(64, 8).unwrap();
        let alloc = allocator();
        unsafe {
            let ptr = alloc.alloc(layout);
            assert!(!ptr.is_null());
            alloc.dealloc(ptr, layout);
        }
    }
}
