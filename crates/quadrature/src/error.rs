//! Result and Error types for sntools-quadrature

/// Type alias for Result<T, quadrature::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `sntools-quadrature` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to read JSON configuration")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    UtilsError(#[from] sntools_utils::Error),

    #[error("unrecognised quadrature family \"{0}\"")]
    UnknownFamily(String),

    #[error("unrecognised geometry \"{0}\"")]
    UnknownGeometry(String),

    #[error("unrecognised quadrature class \"{0}\"")]
    UnknownClass(String),

    #[error("unsupported order S{order} for {family}: {reason}")]
    UnsupportedOrder {
        family: String,
        order: usize,
        reason: &'static str,
    },

    #[error("{family} is not available in {dimension}D")]
    UnsupportedDimension { family: String, dimension: usize },

    #[error("{dimension}D quadrature cannot be used with {geometry} geometry on a {mesh_dimension}D mesh")]
    IncompatibleGeometry {
        geometry: String,
        dimension: usize,
        mesh_dimension: usize,
    },

    #[error("quadrature closure check {check} failed: expected {expected}, found {found}")]
    ClosureFailure {
        check: &'static str,
        expected: f64,
        found: f64,
    },

    #[error("expected {expected} values for {name}, found {found}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("quadrature weight {weight} at index {index} is not a finite positive value")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("direction ({x}, {y}, {z}) is not a unit vector")]
    NotUnitVector { x: f64, y: f64, z: f64 },

    #[error("a 1D ordinate requires a non-zero direction cosine within [-1, 1]")]
    ZeroCosine,

    #[error("{class} quadrature with {levels} levels cannot hold {ordinates} octant ordinates")]
    ClassCountMismatch {
        class: String,
        levels: usize,
        ordinates: usize,
    },

    #[error("interval quadrature classes cannot be used for octant quadrature")]
    IntervalClass,

    #[error("failed to solve level symmetric weights for S{order}: {reason}")]
    WeightSolve { order: usize, reason: String },

    #[error("Newton iteration for Gauss-Legendre S{order} did not converge")]
    NewtonIteration { order: usize },

    #[error("degenerate normalisation coefficient for l={l}, k={k}")]
    DegenerateCoefficient { l: usize, k: i32 },

    #[error("index {index} is out of range for {length} values")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("{family} requires an explicit table of ordinates")]
    MissingOrdinates { family: String },

    #[error("configuration is missing the \"{0}\" keyword")]
    MissingKeyword(&'static str),

    #[error("failed to parse quadrature block near \"{0}\"")]
    ParseError(String),
}
