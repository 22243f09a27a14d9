//! Romberg integration library.
//!
//! This crate estimates the definite integral of a scalar function of one real
//! variable with repeated trapezoidal refinement and Richardson extrapolation.
//! Every call returns a value together with an error estimate and the number
//! of function evaluations spent, under a bounded budget.
//!
//! # Features
//!
//! - Absolute and relative error thresholds
//! - Minimum and maximum evaluation counts
//! - Precision-loss guard for intervals that strain `f64` resolution
//! - Per-stage trace for convergence studies
//! - JSON configuration files
//!
//! # Example
//!
//! ```rust
//! use math_audio_romberg::{IntegratorBuilder, Termination};
//!
//! let integrator = IntegratorBuilder::new()
//!     .relative_error(1e-12)
//!     .build();
//!
//! let estimate = integrator.integrate(0.0, 1.0, |x| 4.0 / (1.0 + x * x))?;
//!
//! assert_eq!(estimate.termination, Termination::Converged);
//! assert!((estimate.value - std::f64::consts::PI).abs() < 1e-12);
//! # Ok::<(), math_audio_romberg::RombergError>(())
//! ```
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod error;
pub use error::{Result, RombergError};

pub mod estimate;
pub use estimate::{Estimate, StageRecord, Termination};

pub mod tableau;
pub use tableau::RichardsonRow;

pub mod integrator;
pub use integrator::{
    DEFAULT_ABSOLUTE_ERROR, DEFAULT_MAX_CALL_COUNT, DEFAULT_MIN_CALL_COUNT,
    DEFAULT_RELATIVE_ERROR, Integrator, IntegratorBuilder,
};

pub mod config;
pub use config::{integrator_from_json, load_integrator, save_integrator};

pub mod integrands;
pub use integrands::{Integrand, IntegrandRegistry};

mod romberg;
pub use romberg::romberg;
