//! SIMD-width abstraction over `wide` lane types, with a scalar tail loop
//! for the remainder of a buffer that does not fill a whole lane.
//!
//! The kernel engine never hard-codes a lane width: it asks `SimdElement`
//! for `LANES`, processes the buffer in chunks of that size, then falls
//! back to a scalar loop for the remaining `len % LANES` elements. Lane
//! width is free to vary per element type and target; kernel correctness
//! must not depend on a specific one (reductions summed in lane-chunked
//! order are not required to match a scalar left-fold bit-for-bit).

use wide::{f32x8, f64x4, i32x8, i64x4};

/// Maps a scalar element type onto a `wide` lane type and the horizontal
/// reductions the kernel engine needs over it.
pub trait SimdElement: Copy {
    type Lane: Copy
        + core::ops::Add<Output = Self::Lane>
        + core::ops::Sub<Output = Self::Lane>
        + core::ops::Mul<Output = Self::Lane>;

    /// Number of scalar elements packed into one `Lane`.
    const LANES: usize;

    fn splat(self) -> Self::Lane;
    /// Loads exactly `Self::LANES` elements from the front of `chunk`.
    fn load(chunk: &[Self]) -> Self::Lane;
    /// Stores exactly `Self::LANES` elements into the front of `out`.
    fn store(lane: Self::Lane, out: &mut [Self]);

    fn horizontal_sum(lane: Self::Lane) -> Self;
    fn horizontal_product(lane: Self::Lane) -> Self;
    fn horizontal_max(lane: Self::Lane) -> Self;
    fn horizontal_min(lane: Self::Lane) -> Self;

    /// Elementwise (not horizontal) max/min across two lanes, for chunked
    /// running-extremum reductions.
    fn lane_max(a: Self::Lane, b: Self::Lane) -> Self::Lane;
    fn lane_min(a: Self::Lane, b: Self::Lane) -> Self::Lane;
}

macro_rules! impl_simd_element {
    ($scalar:ty, $lane:ty, $lanes:expr) => {
        impl SimdElement for $scalar {
            type Lane = $lane;
            const LANES: usize = $lanes;

            #[inline]
            fn splat(self) -> Self::Lane {
                <$lane>::splat(self)
            }

            #[inline]
            fn load(chunk: &[Self]) -> Self::Lane {
                let arr: [$scalar; $lanes] = chunk[..$lanes]
                    .try_into()
                    .expect("caller guarantees a full chunk of LANES elements");
                <$lane>::new(arr)
            }

            #[inline]
            fn store(lane: Self::Lane, out: &mut [Self]) {
                out[..$lanes].copy_from_slice(&lane.to_array());
            }

            #[inline]
            fn horizontal_sum(lane: Self::Lane) -> Self {
                lane.to_array().iter().copied().fold(0 as $scalar, |a, b| a + b)
            }

            #[inline]
            fn horizontal_product(lane: Self::Lane) -> Self {
                lane.to_array().iter().copied().fold(1 as $scalar, |a, b| a * b)
            }

            #[inline]
            fn horizontal_max(lane: Self::Lane) -> Self {
                let arr = lane.to_array();
                arr[1..].iter().copied().fold(arr[0], |a, b| if b > a { b } else { a })
            }

            #[inline]
            fn horizontal_min(lane: Self::Lane) -> Self {
                let arr = lane.to_array();
                arr[1..].iter().copied().fold(arr[0], |a, b| if b < a { b } else { a })
            }

            #[inline]
            fn lane_max(a: Self::Lane, b: Self::Lane) -> Self::Lane {
                let (a, b) = (a.to_array(), b.to_array());
                let mut out = a;
                for i in 0..$lanes {
                    if b[i] > out[i] {
                        out[i] = b[i];
                    }
                }
                <$lane>::new(out)
            }

            #[inline]
            fn lane_min(a: Self::Lane, b: Self::Lane) -> Self::Lane {
                let (a, b) = (a.to_array(), b.to_array());
                let mut out = a;
                for i in 0..$lanes {
                    if b[i] < out[i] {
                        out[i] = b[i];
                    }
                }
                <$lane>::new(out)
            }
        }
    };
}

impl_simd_element!(f32, f32x8, 8);
impl_simd_element!(f64, f64x4, 4);
impl_simd_element!(i32, i32x8, 8);
impl_simd_element!(i64, i64x4, 4);

/// Splits `len` into a SIMD-chunk count and a scalar tail length.
#[inline]
pub fn chunks<T: SimdElement>(len: usize) -> (usize, usize) {
    (len / T::LANES, len % T::LANES)
}
