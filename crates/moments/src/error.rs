//! Result and Error types for sntools-moments

/// Type alias for Result<T, moments::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `sntools-moments` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    QuadratureError(#[from] sntools_quadrature::Error),

    #[error("unrecognised interpolation model \"{0}\"")]
    UnknownModel(String),

    #[error("{model} interpolation is not supported for {dimension}D {class} quadrature")]
    UnsupportedModel {
        model: String,
        class: String,
        dimension: usize,
    },

    #[error("an expansion order can only be chosen for SVD interpolation, not {model}")]
    ExpansionOrderNotAllowed { model: String },

    #[error("{model} interpolation needs {expected} moments, found {found}")]
    MomentCount {
        model: String,
        expected: usize,
        found: usize,
    },

    #[error("at least one moment is needed")]
    NoMoments,

    #[error("{moments} moments cannot be resolved by {angles} angles")]
    TooManyMoments { moments: usize, angles: usize },

    #[error("moment ({l},{k}) is not valid: {reason}")]
    InvalidMoment {
        l: usize,
        k: i32,
        reason: &'static str,
    },

    #[error("moment ({l},{k}) appears more than once")]
    DuplicateMoment { l: usize, k: i32 },

    #[error("{model} moment operator is singular")]
    SingularOperator { model: String },

    #[error("moment operator is rank deficient, singular value ratio {ratio:.3e}")]
    RankDeficient { ratio: f64 },

    #[error("weighted interpolation needs non-negative weights, found {weight} at index {index}")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("expected {expected} values for {name}, found {found}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("index {index} is out of range for {length} values")]
    IndexOutOfRange { index: usize, length: usize },
}
