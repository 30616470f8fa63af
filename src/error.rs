use thiserror::Error;

/// Result alias for `cohort`.
pub type Result<T> = std::result::Result<T, Error>;

/// The two failure classes a caller has to distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input was rejected before any algorithmic work started.
    Validation,
    /// Something went wrong while iterating over validated input.
    Computation,
}

/// Errors returned by the clustering entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Input collection was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// A point carried a zero-length vector.
    #[error("point {index} has an empty vector")]
    EmptyVector {
        /// Position of the offending point.
        index: usize,
    },

    /// Points in one call have different dimensionality.
    #[error("dimension mismatch at point {index}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Position of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Failure raised while running an algorithm on validated input.
    #[error("{algorithm} clustering failed: {cause}")]
    Computation {
        /// Which algorithm failed.
        algorithm: &'static str,
        /// Underlying cause.
        #[source]
        cause: NumericError,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Computation { .. } => ErrorKind::Computation,
            _ => ErrorKind::Validation,
        }
    }

    /// Whether the input was rejected up front.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub(crate) fn computation(algorithm: &'static str) -> impl FnOnce(NumericError) -> Error {
        move |cause| Error::Computation { algorithm, cause }
    }
}

/// Low-level failures inside an iterative loop.
#[derive(Debug, Error)]
pub enum NumericError {
    /// A quantity stopped being finite (NaN or infinite input slipped through).
    #[error("{quantity} became non-finite at iteration {iteration}")]
    NonFinite {
        /// Which quantity.
        quantity: &'static str,
        /// Iteration (or merge step) where it was observed.
        iteration: usize,
    },

    /// A point's length differs from the first point's.
    #[error("row {index} has {found} values, expected {expected}")]
    RaggedRow {
        /// Position of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        found: usize,
    },

    /// Input could not be packed into a dense matrix.
    #[error("could not pack input into a matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
