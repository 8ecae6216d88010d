//! Typed tensor allocation and tensor-valued kernel composition on top of
//! [`allocator::CachingAllocator`].

pub mod allocator;
pub mod registry;

use parking_lot::Mutex;

use crate::error::{TensorError, TensorResult};
use crate::expr::{contraction_parse, inner_product_parse, OperandSide, PASS};
use crate::kernels;
use crate::shape::{MemoryOrder, Size};
use crate::simd::SimdElement;
use crate::tensor::Tensor;

use allocator::{AllocHandle, CachingAllocator};

/// Recording state for the factory's tracking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    Free,
    Start,
    Stop,
}

/// Construction-time knobs for a [`TensorFactory`].
#[derive(Debug, Clone, Copy)]
pub struct FactoryConfig {
    /// Start in `Start` mode rather than `Free` — every allocation is
    /// tracked from the first call.
    pub track_from_start: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            track_from_start: false,
        }
    }
}

struct Live<T> {
    handle: AllocHandle,
    ptr: *mut T,
}

struct TrackingState<T> {
    mode: TrackingMode,
    /// Every allocation the factory has produced that hasn't been freed yet,
    /// regardless of tracking mode. `free_from_tensor` scans this — by
    /// pointer — to recover the handle it needs to hand back to the
    /// allocator, so an individual free works the same way whether or not
    /// the factory happened to be recording at alloc time.
    live: Vec<Live<T>>,
    /// Handles recorded only while `mode == Start`; always a subset of
    /// `live`. Swept in bulk on a `-> Free` transition, which is the one
    /// thing tracking mode actually governs.
    tracked: Vec<AllocHandle>,
}

/// Allocates tensor data through a [`CachingAllocator`], optionally
/// recording every produced slice so it can be released in bulk later.
///
/// The tracking list is guarded by its own lock distinct from the
/// allocator's: allocation and tracking are separate concerns that can be
/// contended independently.
pub struct TensorFactory<T> {
    allocator: CachingAllocator<T>,
    tracking: Mutex<TrackingState<T>>,
}

impl<T> TensorFactory<T>
where
    T: Copy + Default,
{
    pub fn new(config: FactoryConfig) -> Self {
        Self {
            allocator: CachingAllocator::new(),
            tracking: Mutex::new(TrackingState {
                mode: if config.track_from_start {
                    TrackingMode::Start
                } else {
                    TrackingMode::Free
                },
                live: Vec::new(),
                tracked: Vec::new(),
            }),
        }
    }

    pub fn mode(&self) -> TrackingMode {
        self.tracking.lock().mode
    }

    /// Applies one of the six documented mode transitions; anything else
    /// (including a mode transitioning to itself) is a no-op.
    pub fn set_mode(&self, target: TrackingMode) {
        use TrackingMode::*;
        let mut state = self.tracking.lock();
        match (state.mode, target) {
            (Free, Start) => state.mode = Start,
            (Free, Stop) => {}
            (Start, Stop) => state.mode = Stop,
            (Start, Free) | (Stop, Free) => {
                Self::release_tracked(&self.allocator, &mut state);
                state.mode = Free;
            }
            (Stop, Start) => state.mode = Start,
            _ => {}
        }
    }

    /// Frees every handle recorded in `tracked` through the allocator and
    /// drops the matching entries out of `live`, so a later
    /// `free_from_tensor` call can't find (and double-free) a handle this
    /// bulk release already returned.
    fn release_tracked(allocator: &CachingAllocator<T>, state: &mut TrackingState<T>) {
        for handle in state.tracked.drain(..) {
            let _ = allocator.free(handle);
            state.live.retain(|entry| entry.handle != handle);
        }
    }

    /// Transitions to `Free` and releases every tracked slice.
    pub fn deinit(&self) {
        let mut state = self.tracking.lock();
        Self::release_tracked(&self.allocator, &mut state);
        state.mode = TrackingMode::Free;
    }

    /// Records a fresh allocation in `live` so `free_from_tensor` can find
    /// it later regardless of the current tracking mode; additionally
    /// records it in `tracked` when the mode is `Start`, so it's swept on
    /// the next `-> Free` transition.
    fn track(&self, handle: AllocHandle, ptr: *mut T) {
        let mut state = self.tracking.lock();
        state.live.push(Live { handle, ptr });
        if matches!(state.mode, TrackingMode::Start) {
            state.tracked.push(handle);
        }
    }

    /// Allocates a fresh, valid tensor of the given sizes.
    pub fn alloc_tensor<const R: usize, O: MemoryOrder>(
        &self,
        sizes: [Size; R],
    ) -> TensorResult<Tensor<T, R, O>> {
        let capacity: usize = sizes.iter().map(|&s| s as usize).product();
        if capacity == 0 {
            return Err(TensorError::TensorSizeZero);
        }
        let (handle, ptr) = self.allocator.alloc(capacity)?;
        self.track(handle, ptr.as_ptr());
        Ok(unsafe { Tensor::from_raw_parts(ptr.as_ptr(), capacity, sizes) })
    }

    /// Binds freshly allocated data to an uninitialized view in place.
    pub fn alloc_to_tensor<const R: usize, O: MemoryOrder>(
        &self,
        view: &mut Tensor<T, R, O>,
    ) -> TensorResult<()> {
        if view.has_data() {
            return Err(TensorError::TensorHasAlloc);
        }
        let capacity = view.shape().capacity();
        if capacity == 0 {
            return Err(TensorError::TensorSizeZero);
        }
        let (handle, ptr) = self.allocator.alloc(capacity)?;
        self.track(handle, ptr.as_ptr());
        unsafe { view.bind_raw(ptr.as_ptr(), capacity) };
        Ok(())
    }

    /// Releases a view's data back to the allocator and unbinds the view.
    ///
    /// Looks the view up by pointer in `live`, which every allocation enters
    /// regardless of tracking mode — so this works the same whether or not
    /// the factory happened to be recording when the view was allocated.
    pub fn free_from_tensor<const R: usize, O: MemoryOrder>(
        &self,
        view: &mut Tensor<T, R, O>,
    ) -> TensorResult<()> {
        let ptr = view.as_mut_ptr();
        let mut state = self.tracking.lock();
        let pos = state
            .live
            .iter()
            .position(|entry| core::ptr::eq(entry.ptr, ptr))
            .ok_or(TensorError::InvalidIndex)?;
        let entry = state.live.remove(pos);
        state.tracked.retain(|&handle| handle != entry.handle);
        drop(state);
        self.allocator.free(entry.handle)?;
        view.unbind();
        Ok(())
    }

    /// Allocates a new tensor of the same shape as `view` and copies its
    /// data into it.
    pub fn copy_tensor<const R: usize, O: MemoryOrder>(
        &self,
        view: &Tensor<T, R, O>,
    ) -> TensorResult<Tensor<T, R, O>> {
        if !view.is_valid() {
            return Err(TensorError::InvalidTensorLayout {
                data_len: view.value_size(),
                capacity: view.value_capacity(),
            });
        }
        let mut out = self.alloc_tensor::<R, O>(*view.shape().sizes())?;
        unsafe { out.as_mut_slice() }.copy_from_slice(unsafe { view.as_slice() });
        Ok(out)
    }
}

macro_rules! impl_factory_elementwise {
    ($name:ident, $kernel:path) => {
        impl<T> TensorFactory<T>
        where
            T: Copy
                + Default
                + SimdElement
                + core::ops::Add<Output = T>
                + core::ops::Sub<Output = T>
                + core::ops::Mul<Output = T>,
        {
            pub fn $name<const R: usize, O: MemoryOrder>(
                &self,
                x: &Tensor<T, R, O>,
                y: &Tensor<T, R, O>,
            ) -> TensorResult<Tensor<T, R, O>> {
                let mut z = self.alloc_tensor::<R, O>(*x.shape().sizes())?;
                $kernel(x, y, &mut z)?;
                Ok(z)
            }
        }
    };
}

impl_factory_elementwise!(add, kernels::add);
impl_factory_elementwise!(sub, kernels::sub);
impl_factory_elementwise!(mul, kernels::mul);

impl<T> TensorFactory<T>
where
    T: Copy + Default + SimdElement + core::ops::Mul<Output = T>,
{
    pub fn scale<const R: usize, O: MemoryOrder>(
        &self,
        x: &Tensor<T, R, O>,
        s: T,
    ) -> TensorResult<Tensor<T, R, O>> {
        let mut y = self.alloc_tensor::<R, O>(*x.shape().sizes())?;
        kernels::scale(x, &mut y, s)?;
        Ok(y)
    }
}

impl<T> TensorFactory<T>
where
    T: Copy + Default + SimdElement + core::ops::Add<Output = T>,
{
    pub fn bias<const R: usize, O: MemoryOrder>(
        &self,
        x: &Tensor<T, R, O>,
        s: T,
    ) -> TensorResult<Tensor<T, R, O>> {
        let mut y = self.alloc_tensor::<R, O>(*x.shape().sizes())?;
        kernels::bias(x, &mut y, s)?;
        Ok(y)
    }
}

impl<T> TensorFactory<T>
where
    T: Copy + Default + core::ops::AddAssign,
{
    /// Parses `expr`, allocates a result tensor of the derived rank and
    /// shape, and runs the contraction into it.
    pub fn contraction<const XR: usize, const YR: usize, O: MemoryOrder>(
        &self,
        expr: &str,
        x: &Tensor<T, XR, O>,
    ) -> TensorResult<Tensor<T, YR, O>> {
        let plan = contraction_parse::<XR, YR>(expr)?;
        let mut z_sizes = [0 as Size; YR];
        for m in 0..YR {
            z_sizes[plan.rhs[m] as usize] = x.shape().get_size(plan.lhs[m] as usize);
        }
        let mut z = self.alloc_tensor::<YR, O>(z_sizes)?;
        kernels::contraction_plan(&plan, x, &mut z)?;
        Ok(z)
    }
}

impl<T> TensorFactory<T>
where
    T: Copy + Default + core::ops::AddAssign + core::ops::Mul<Output = T>,
{
    /// Parses `expr`, allocates a result tensor of the derived rank and
    /// shape, and runs the inner/outer product into it.
    pub fn inner_product<const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
        &self,
        expr: &str,
        x: &Tensor<T, XR, O>,
        y: &Tensor<T, YR, O>,
    ) -> TensorResult<Tensor<T, ZR, O>> {
        let plan = inner_product_parse(XR, YR, ZR, expr)?;
        let mut z_sizes = [0 as Size; ZR];
        for i in 0..plan.total {
            if plan.z_perm[i] == PASS {
                continue;
            }
            let size = match plan.s_ctrl[i] {
                OperandSide::X => x.shape().get_size(plan.x_perm[i] as usize),
                OperandSide::Y => y.shape().get_size(plan.y_perm[i] as usize),
            };
            z_sizes[plan.z_perm[i] as usize] = size;
        }
        let mut z = self.alloc_tensor::<ZR, O>(z_sizes)?;
        kernels::inner_product_plan(&plan, x, y, &mut z)?;
        Ok(z)
    }
}
