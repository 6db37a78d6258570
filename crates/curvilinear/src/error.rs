//! Result and Error types for sntools-curvilinear

/// Type alias for Result<T, curvilinear::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `sntools-curvilinear` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    QuadratureError(#[from] sntools_quadrature::Error),

    #[error(transparent)]
    UtilsError(#[from] sntools_utils::Error),

    #[error("ordinate set carries no weight")]
    NoWeight,

    #[error("level {level} has no weighted ordinates")]
    EmptyLevel { level: usize },

    #[error("ordinate {index} does not lie between its level edges")]
    DegenerateInterval { index: usize },

    #[error("ordinate {index} does not depend on a preceding ordinate")]
    NotDependent { index: usize },

    #[error("index {index} is out of range for {length} ordinates")]
    IndexOutOfRange { index: usize, length: usize },
}
