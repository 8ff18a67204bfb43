use core::fmt;

/// Result alias for `agglom`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by matrix construction, clustering, and tree queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Point dimension mismatch (usize).
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A dissimilarity was NaN.
    NanDissimilarity {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
    },

    /// A flat buffer's length is not `n(n-1)/2` for any integer `n >= 2`.
    NonTriangularLength {
        /// Length of the rejected buffer.
        length: usize,
    },

    /// An index fell outside the valid range.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Exclusive upper bound of the valid range.
        bound: usize,
    },

    /// Attempt to store a non-zero dissimilarity on the diagonal.
    NonZeroDiagonal {
        /// Diagonal position.
        index: usize,
        /// Rejected value.
        value: f64,
    },

    /// Query against a heap entry that has already been popped.
    Inactive {
        /// The popped entry.
        index: usize,
    },

    /// Invalid number of clusters requested.
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::NanDissimilarity { row, col } => {
                write!(f, "dissimilarity at ({row}, {col}) is NaN")
            }
            Error::NonTriangularLength { length } => {
                write!(f, "length {length} is not n(n-1)/2 for any integer n >= 2")
            }
            Error::IndexOutOfRange { index, bound } => {
                write!(f, "index {index} out of range 0..{bound}")
            }
            Error::NonZeroDiagonal { index, value } => {
                write!(f, "diagonal entry ({index}, {index}) must be 0, got {value}")
            }
            Error::Inactive { index } => {
                write!(f, "heap entry {index} has already been popped")
            }
            Error::InvalidClusterCount { requested, n_items } => {
                write!(f, "cannot create {requested} clusters from {n_items} items")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
