//! Tensor views: a shape paired with data it does not own.

use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::error::{TensorError, TensorResult};
use crate::expr::permutate_parse;
use crate::shape::{MemoryOrder, Shape, Size};

/// A rank-`R`, order-`O` view over element type `T`.
///
/// Mirrors the central invariant of the system this generalizes: a `Tensor`
/// never owns `data` — the slice's lifetime is the allocator's or the
/// caller's, and distinct views are free to alias the same buffer (after
/// [`Self::permutate`] or [`Self::swap`]). Rust's borrow checker cannot
/// express "two live views of one mutable buffer" through a shared
/// `&mut [T]`, so `data` is held as a raw pointer — the same role a bare
/// device-memory handle plays in the source this is modeled on.
pub struct Tensor<T, const R: usize, O: MemoryOrder> {
    data: Option<NonNull<T>>,
    len: usize,
    shape: Shape<R, O>,
    _elem: PhantomData<T>,
}

// Send/Sync follow the pointee: a Tensor grants no synchronization of its
// own, it's a bare handle to a buffer the caller is responsible for.
unsafe impl<T: Send, const R: usize, O: MemoryOrder> Send for Tensor<T, R, O> {}
unsafe impl<T: Sync, const R: usize, O: MemoryOrder> Sync for Tensor<T, R, O> {}

impl<T, const R: usize, O: MemoryOrder> Tensor<T, R, O> {
    /// Builds an uninitialized-capacity view: sizes (and so strides) are
    /// set, but no data is bound — used when the factory will bind data
    /// to this view later.
    pub fn uninit(sizes: [Size; R]) -> Self {
        Self {
            data: None,
            len: 0,
            shape: Shape::with_sizes(sizes),
            _elem: PhantomData,
        }
    }

    /// Builds a view directly over `data`. The caller retains ownership;
    /// `data` must outlive every view derived from this one.
    pub fn from_slice(data: &mut [T], sizes: [Size; R]) -> Self {
        let len = data.len();
        Self {
            data: NonNull::new(data.as_mut_ptr()),
            len,
            shape: Shape::with_sizes(sizes),
            _elem: PhantomData,
        }
    }

    /// Builds a view over a raw buffer.
    ///
    /// # Safety
    /// `ptr` must be valid for reads and writes of `len` elements of `T`
    /// for as long as this view, and any view derived from it, is in use.
    pub unsafe fn from_raw_parts(ptr: *mut T, len: usize, sizes: [Size; R]) -> Self {
        Self {
            data: NonNull::new(ptr),
            len,
            shape: Shape::with_sizes(sizes),
            _elem: PhantomData,
        }
    }

    /// Valid iff data is bound, non-empty, and its length matches the
    /// shape's declared capacity.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.data.is_some() && self.len > 0 && self.len == self.shape.capacity()
    }

    /// True if this view already has data bound to it, regardless of
    /// validity — used by the factory to reject double-binding a view.
    #[inline]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Binds a freshly allocated buffer to an otherwise-uninitialized view,
    /// leaving the shape untouched.
    ///
    /// # Safety
    /// Same contract as [`Self::from_raw_parts`].
    pub unsafe fn bind_raw(&mut self, ptr: *mut T, len: usize) {
        self.data = NonNull::new(ptr);
        self.len = len;
    }

    /// Unbinds this view from its data without freeing it — the caller
    /// (the factory) is responsible for releasing the buffer itself.
    pub fn unbind(&mut self) {
        self.data = None;
        self.len = 0;
    }

    #[inline]
    pub fn value_size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn value_capacity(&self) -> usize {
        self.shape.capacity()
    }

    #[inline]
    pub fn rank(&self) -> usize {
        R
    }

    #[inline]
    pub fn shape(&self) -> &Shape<R, O> {
        &self.shape
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.map_or(core::ptr::null(), |p| p.as_ptr() as *const T)
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.map_or(core::ptr::null_mut(), |p| p.as_ptr())
    }

    /// Borrows the view's physical (unpermuted) data buffer.
    ///
    /// # Safety
    /// The caller must not alias this with another live mutable borrow of
    /// the same buffer obtained through a different view.
    pub unsafe fn as_slice(&self) -> &[T] {
        match self.data {
            Some(ptr) => unsafe { core::slice::from_raw_parts(ptr.as_ptr(), self.len) },
            None => &[],
        }
    }

    /// # Safety
    /// Same requirements as [`Self::as_slice`], plus exclusivity for the
    /// lifetime of the returned borrow.
    pub unsafe fn as_mut_slice(&mut self) -> &mut [T] {
        match self.data {
            Some(ptr) => unsafe { core::slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    /// Reads the element at `coord`. Unchecked by design — bounds-checking
    /// here would make index arithmetic intolerably slow; the caller must
    /// have established `is_valid()` and that every coordinate component is
    /// below its axis size.
    #[inline]
    pub unsafe fn get_value(&self, coord: [Size; R]) -> T
    where
        T: Copy,
    {
        let offset = self.shape.index(coord) as usize;
        unsafe {
            self.data
                .unwrap_unchecked()
                .as_ptr()
                .add(offset)
                .read()
        }
    }

    /// Writes `v` at `coord`. Same unchecked contract as [`Self::get_value`].
    #[inline]
    pub unsafe fn set_value(&mut self, v: T, coord: [Size; R]) {
        let offset = self.shape.index(coord) as usize;
        unsafe {
            self.data
                .unwrap_unchecked()
                .as_ptr()
                .add(offset)
                .write(v)
        };
    }

    /// Parses `expr` and returns a new view into the *same* data, axes
    /// reordered per the parsed permutation. No allocation; `data` is
    /// shared, not copied.
    pub fn permutate(&self, expr: &str) -> TensorResult<Self> {
        if !self.is_valid() {
            return Err(TensorError::InvalidTensorLayout {
                data_len: self.len,
                capacity: self.shape.capacity(),
            });
        }
        let p = permutate_parse::<R>(expr).map_err(|_| TensorError::InvalidPermutation)?;
        let mut shape = self.shape;
        shape.apply_permutation(p.map(|axis| axis as usize));
        Ok(Self {
            data: self.data,
            len: self.len,
            shape,
            _elem: PhantomData,
        })
    }

    /// Exchanges `data` and `shape` between two views. Both must be valid.
    pub fn swap(&mut self, other: &mut Self) -> TensorResult<()> {
        if !self.is_valid() {
            return Err(TensorError::InvalidTensorLayout {
                data_len: self.len,
                capacity: self.shape.capacity(),
            });
        }
        if !other.is_valid() {
            return Err(TensorError::InvalidTensorLayout {
                data_len: other.len,
                capacity: other.shape.capacity(),
            });
        }
        core::mem::swap(&mut self.data, &mut other.data);
        core::mem::swap(&mut self.len, &mut other.len);
        core::mem::swap(&mut self.shape, &mut other.shape);
        Ok(())
    }
}

impl<T, const R: usize, O: MemoryOrder> fmt::Debug for Tensor<T, R, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("valid", &self.is_valid())
            .field("sizes", self.shape.sizes())
            .field("strides", self.shape.strides())
            .finish()
    }
}
