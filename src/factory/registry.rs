//! Bounded process-wide registry of [`CachingAllocator`] instances.
//!
//! A fixed global array of default allocator instances behind a mutex that
//! panics once every slot is taken is a poor fit for a library:
//! `AllocatorRegistry` takes its capacity as a constructor argument and
//! returns [`TensorError::AllocatorRegistryExhausted`] instead of aborting
//! the process — the resource limit is real, but callers should get to
//! decide how to respond to it.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{TensorError, TensorResult};

use super::allocator::CachingAllocator;

/// Hands out shared [`CachingAllocator`] instances up to a fixed capacity.
pub struct AllocatorRegistry<T> {
    capacity: usize,
    slots: Mutex<Vec<Arc<CachingAllocator<T>>>>,
}

impl<T> AllocatorRegistry<T>
where
    T: Copy + Default,
{
    /// Builds an empty registry that can hold at most `capacity` allocators.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Acquires a freshly constructed allocator from an open slot.
    ///
    /// Fails with [`TensorError::AllocatorRegistryExhausted`] once
    /// `capacity` allocators are outstanding; slots never free themselves —
    /// callers that need elastic capacity should construct a
    /// `CachingAllocator` directly instead of going through a registry.
    pub fn acquire(&self) -> TensorResult<Arc<CachingAllocator<T>>> {
        let mut slots = self.slots.lock();
        if slots.len() >= self.capacity {
            return Err(TensorError::AllocatorRegistryExhausted {
                capacity: self.capacity,
            });
        }
        let allocator = Arc::new(CachingAllocator::new());
        slots.push(Arc::clone(&allocator));
        Ok(allocator)
    }

    /// Number of allocators currently issued.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total capacity this registry was constructed with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
