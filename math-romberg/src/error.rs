//! Error types for Romberg integration.
//!
//! Every algorithmic outcome (converged, budget exhausted, precision
//! exhausted) is reported through [`crate::Estimate`]. The variants below are
//! reserved for inputs that cannot be integrated at all and for configuration
//! files that cannot be read.

use thiserror::Error;

/// Errors that can occur while setting up or running an integration.
#[derive(Debug, Error)]
pub enum RombergError {
    /// One of the integration bounds is NaN or infinite.
    #[error("non-finite {name} bound: {value}")]
    NonFiniteBound {
        /// Which bound was rejected ("lower" or "upper")
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// Both bounds are finite but their distance overflows.
    #[error("interval [{lower}, {upper}] is too wide: its width is not finite")]
    NonFiniteWidth {
        /// The smaller bound
        lower: f64,
        /// The larger bound
        upper: f64,
    },

    /// The integrand returned NaN or an infinity.
    #[error("integrand returned {value} at x = {x}")]
    NonFiniteSample {
        /// Abscissa of the offending sample
        x: f64,
        /// Value returned by the integrand
        value: f64,
    },

    /// A configuration file could not be read or written.
    #[error("configuration i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON for an integrator.
    #[error("invalid integrator configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for Romberg integration.
pub type Result<T> = std::result::Result<T, RombergError>;

impl RombergError {
    /// Returns `true` if the error comes from the bounds or the integrand.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RombergError::NonFiniteBound { .. }
                | RombergError::NonFiniteWidth { .. }
                | RombergError::NonFiniteSample { .. }
        )
    }

    /// Returns `true` if the error comes from loading or saving a configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, RombergError::Io(_) | RombergError::Json(_))
    }
}
