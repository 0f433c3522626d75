/// Error types for the noema driver surface.
///
/// The reasoning core itself never raises: failed constructions, rejected
/// derivations and discarded tasks are ordinary outcomes under insufficient
/// knowledge and resources. Errors exist only at the boundary where a
/// driver hands the engine a configuration or an externally built value.
use thiserror::Error;

/// The error type for driver-facing noema operations.
#[derive(Error, Debug)]
pub enum NoemaError {
    /// A configuration value is outside its admissible range
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the offending option
        reason: String,
    },
}

/// Result type alias for driver-facing noema operations.
pub type NoemaResult<T> = Result<T, NoemaError>;
