//! Caching allocator ordering and reuse properties.

use pretty_assertions::assert_eq;
use tensorex::{AllocatorRegistry, CachingAllocator, TensorError};

#[test]
fn scenario_six_literal_cache_state_after_the_documented_sequence() {
    let allocator = CachingAllocator::<i32>::new();
    let (h1, _) = allocator.alloc(100).unwrap();
    let (h2, _) = allocator.alloc(300).unwrap();
    allocator.free(h1).unwrap();
    allocator.free(h2).unwrap();

    allocator.alloc(100).unwrap();
    allocator.alloc(100).unwrap();
    allocator.alloc(300).unwrap();

    let mut sizes = allocator.cached_sizes();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![100, 100, 300]);
}

#[test]
fn cache_stays_weakly_sorted_after_arbitrary_deposits() {
    let allocator = CachingAllocator::<i32>::new();
    allocator.add_to_cache(&[50, 300, 100, 100, 7]);
    let sizes = allocator.cached_sizes();
    for w in sizes.windows(2) {
        assert!(w[0] <= w[1]);
    }
}

#[test]
fn freeing_and_reallocating_the_same_size_reuses_the_pointer() {
    let allocator = CachingAllocator::<i32>::new();
    let (h, p1) = allocator.alloc(64).unwrap();
    allocator.free(h).unwrap();
    let (_h2, p2) = allocator.alloc(64).unwrap();
    assert_eq!(p1, p2);
}

#[test]
fn registry_exhaustion_is_a_returned_error_not_a_panic() {
    let registry = AllocatorRegistry::<f32>::new(1);
    let _first = registry.acquire().unwrap();
    assert_eq!(
        registry.acquire(),
        Err(TensorError::AllocatorRegistryExhausted { capacity: 1 })
    );
}
