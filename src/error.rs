//! Error types for tensor layout, expression parsing, and kernel execution.

/// Errors raised while parsing or validating an einsum-style index expression.
///
/// These are always raised before any kernel runs — a malformed expression
/// never reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    /// The expression did not contain exactly the separators the grammar requires.
    #[error("malformed expression: {message}")]
    ParseError { message: String },

    /// A character outside `[A-Za-z]` appeared in an index position.
    #[error("invalid index character '{found}' at position {position}")]
    InvalidIndexChar { found: char, position: usize },

    /// A side of the expression did not have the declared rank.
    #[error("side '{side}' has {found} indices, expected rank {expected}")]
    RankMismatch {
        side: String,
        expected: usize,
        found: usize,
    },

    /// `permutate_parse` requires both sides to be permutations of one another.
    #[error("'{rhs}' is not a permutation of '{lhs}'")]
    InvalidPermutation { lhs: String, rhs: String },

    /// `contraction_parse` requires every result-side index to be matched in `lhs`.
    #[error("result index '{index}' does not appear on the left-hand side")]
    UnmatchedResultIndex { index: char },

    /// `contraction_parse` requires `lRank >= rRank` (the engine contracts large to small).
    #[error("left-hand rank {lhs_rank} is smaller than right-hand rank {rhs_rank}")]
    ContractionRankOrder { lhs_rank: usize, rhs_rank: usize },

    /// `inner_product_parse` requires every output character to be bound in an input.
    #[error("output index '{index}' not found in either operand")]
    OutputIndexNotBound { index: char },

    /// `outer_product` requires every loop level to survive into the result.
    #[error("expression contracts an axis; outer_product requires no axis be summed away")]
    ContractedAxisInOuterProduct,
}

/// Result type for expression-compiler operations.
pub type ExprResult<T> = Result<T, ExprError>;

/// Errors raised by tensor layout operations and kernel execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TensorError {
    /// `data.len()` disagrees with `product(sizes)`.
    #[error("invalid tensor layout: data has {data_len} elements, shape capacity is {capacity}")]
    InvalidTensorLayout { data_len: usize, capacity: usize },

    /// A parsed permutation expression was not a bijection on its index set.
    #[error("invalid permutation")]
    InvalidPermutation,

    /// An allocation request's size did not match the capacity of the returned slice.
    #[error("allocator returned {got} elements for a request of {requested}")]
    AllocSizeMismatch { requested: usize, got: usize },

    /// A view's declared capacity did not match another view's.
    #[error("capacity mismatch: {lhs} vs {rhs}")]
    CapacityMismatch { lhs: usize, rhs: usize },

    /// Two shapes that should share a rank did not.
    #[error("rank mismatch: {lhs} vs {rhs}")]
    RankMismatch { lhs: usize, rhs: usize },

    /// Two operands that should have identical element counts did not.
    #[error("unequal size: {lhs} vs {rhs}")]
    UnequalSize { lhs: usize, rhs: usize },

    /// A size was structurally invalid (e.g. zero where a positive extent is required).
    #[error("invalid sizes: {message}")]
    InvalidSizes { message: String },

    /// An operand's dimensionality did not match what the operation expects.
    #[error("invalid dimensions: expected {expected}, got {got}")]
    InvalidDimensions { expected: usize, got: usize },

    /// A reduction was requested on a tensor with zero elements.
    #[error("reduction on a size-zero tensor")]
    SizeZeroTensor,

    /// Checked signed-integer `abs` overflowed (`abs(T::MIN)`).
    #[error("integer overflow in abs(MIN)")]
    IntegerOverflow,

    /// The factory was asked to allocate zero elements.
    #[error("allocation of a zero-size tensor was requested")]
    TensorSizeZero,

    /// The factory was asked to allocate into a view that already has data.
    #[error("view already has an allocation")]
    TensorHasAlloc,

    /// A slice was handed to the wrong allocator instance for freeing or resizing.
    #[error("slice does not belong to this allocator")]
    WrongAllocator,

    /// A slice was freed twice.
    #[error("index was already freed")]
    IndexAlreadyFreed,

    /// A tracking-list index was out of range or stale.
    #[error("invalid tracking index")]
    InvalidIndex,

    /// An [`AllocatorRegistry`](crate::factory::registry::AllocatorRegistry) had no open slot left.
    #[error("allocator registry exhausted: capacity {capacity} reached")]
    AllocatorRegistryExhausted { capacity: usize },
}

/// Result type for layout and kernel operations.
pub type TensorResult<T> = Result<T, TensorError>;

/// Bridges the expression compiler's error type into the runtime kernel
/// surface: free functions like `contraction(expr, x, z)` parse `expr` at
/// call time (the accepted fallback for languages without arbitrary
/// compile-time evaluation) and need a single error type to return.
impl From<ExprError> for TensorError {
    fn from(e: ExprError) -> Self {
        TensorError::InvalidSizes {
            message: e.to_string(),
        }
    }
}
