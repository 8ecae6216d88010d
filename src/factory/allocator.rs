//! Size-ordered free-list allocator the tensor factory uses for short-lived
//! intermediates, so repeated same-size work doesn't churn the system
//! allocator.
//!
//! Blocks are tracked by a stable opaque handle rather than by pointer
//! identity: pointer-based lookup doesn't fit Rust's ownership model
//! cleanly (see `DESIGN.md`), and a handle gives the same `WrongAllocator`
//! / `IndexAlreadyFreed` / `InvalidIndex` failure modes without it.

use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::{TensorError, TensorResult};

static NEXT_ALLOCATOR_ID: AtomicUsize = AtomicUsize::new(1);

/// Opaque reference to a block owned by one particular [`CachingAllocator`].
/// Not valid against any other instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocHandle {
    index: usize,
    owner: usize,
}

struct Block<T> {
    data: Vec<T>,
    used: bool,
}

struct Inner<T> {
    blocks: Vec<Block<T>>,
    /// Indices into `blocks`, kept weakly sorted by `blocks[i].data.len()`.
    order: Vec<usize>,
}

/// A caching bump-free-list allocator over `Vec<T>`-backed blocks.
pub struct CachingAllocator<T> {
    inner: Mutex<Inner<T>>,
    id: usize,
}

impl<T> CachingAllocator<T>
where
    T: Copy + Default,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                blocks: Vec::new(),
                order: Vec::new(),
            }),
            id: NEXT_ALLOCATOR_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn check_owner(&self, handle: AllocHandle) -> TensorResult<()> {
        if handle.owner != self.id {
            return Err(TensorError::WrongAllocator);
        }
        Ok(())
    }

    fn insert_sorted(order: &mut Vec<usize>, blocks: &[Block<T>], index: usize) {
        let n = blocks[index].data.len();
        let pos = order.partition_point(|&idx| blocks[idx].data.len() <= n);
        order.insert(pos, index);
    }

    /// Returns a block of at least `n` elements marked used: a cached
    /// unused block no larger than `2n` if one exists, otherwise a fresh
    /// allocation. The returned pointer is valid for exactly `n` elements
    /// (the block itself may be larger; only `n` is promised to the
    /// caller).
    pub fn alloc(&self, n: usize) -> TensorResult<(AllocHandle, NonNull<T>)> {
        if n == 0 {
            return Err(TensorError::TensorSizeZero);
        }
        let mut inner = self.inner.lock();
        let start = inner.order.partition_point(|&idx| inner.blocks[idx].data.len() < n);
        let found = inner.order[start..]
            .iter()
            .take_while(|&&idx| inner.blocks[idx].data.len() <= 2 * n)
            .find(|&&idx| !inner.blocks[idx].used)
            .copied();

        let index = match found {
            Some(idx) => {
                inner.blocks[idx].used = true;
                idx
            }
            None => {
                let data = vec![T::default(); n];
                let idx = inner.blocks.len();
                inner.blocks.push(Block { data, used: true });
                Self::insert_sorted(&mut inner.order, &inner.blocks, idx);
                idx
            }
        };

        let ptr = NonNull::new(inner.blocks[index].data.as_mut_ptr())
            .expect("a block of nonzero length has a non-null pointer");
        Ok((
            AllocHandle {
                index,
                owner: self.id,
            },
            ptr,
        ))
    }

    /// Marks a block unused again so a future [`Self::alloc`] can reuse it.
    pub fn free(&self, handle: AllocHandle) -> TensorResult<()> {
        self.check_owner(handle)?;
        let mut inner = self.inner.lock();
        let block = inner
            .blocks
            .get_mut(handle.index)
            .ok_or(TensorError::InvalidIndex)?;
        if !block.used {
            return Err(TensorError::IndexAlreadyFreed);
        }
        block.used = false;
        Ok(())
    }

    /// Resizes a block in place and re-inserts it at its new
    /// size-ordered position.
    pub fn resize(&self, handle: AllocHandle, new_n: usize) -> TensorResult<NonNull<T>> {
        self.check_owner(handle)?;
        if new_n == 0 {
            return Err(TensorError::TensorSizeZero);
        }
        let mut inner = self.inner.lock();
        if handle.index >= inner.blocks.len() {
            return Err(TensorError::InvalidIndex);
        }
        inner.order.retain(|&idx| idx != handle.index);
        inner.blocks[handle.index].data.resize(new_n, T::default());
        Self::insert_sorted(&mut inner.order, &inner.blocks, handle.index);

        Ok(NonNull::new(inner.blocks[handle.index].data.as_mut_ptr())
            .expect("a block of nonzero length has a non-null pointer"))
    }

    /// Releases every cached block. Handles issued before this call become
    /// invalid (`InvalidIndex` on later use).
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.blocks.clear();
        inner.order.clear();
    }

    /// Prewarms the cache with unused blocks of the given sizes.
    pub fn add_to_cache(&self, sizes: &[usize]) {
        let mut inner = self.inner.lock();
        for &n in sizes {
            if n == 0 {
                continue;
            }
            let data = vec![T::default(); n];
            let idx = inner.blocks.len();
            inner.blocks.push(Block { data, used: false });
            Self::insert_sorted(&mut inner.order, &inner.blocks, idx);
        }
    }

    /// Snapshot of cached block sizes in their current weak order.
    pub fn cached_sizes(&self) -> Vec<usize> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .map(|&idx| inner.blocks[idx].data.len())
            .collect()
    }
}

impl<T: Copy + Default> Default for CachingAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}
