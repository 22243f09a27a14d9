//! Result types returned by the integrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the refinement loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The absolute or relative error threshold was met.
    Converged,
    /// The call budget was spent before any threshold was met.
    BudgetExhausted,
    /// The step size can no longer shrink at the magnitude of the bounds.
    PrecisionExhausted,
    /// Both bounds are equal; the integral is zero without sampling.
    EmptyInterval,
}

impl Termination {
    /// Returns `true` if the loop stopped without meeting a threshold.
    pub fn is_aborted(self) -> bool {
        matches!(
            self,
            Termination::BudgetExhausted | Termination::PrecisionExhausted
        )
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::Converged => "converged",
            Termination::BudgetExhausted => "call budget exhausted",
            Termination::PrecisionExhausted => "floating-point precision exhausted",
            Termination::EmptyInterval => "empty interval",
        };
        f.write_str(s)
    }
}

/// Outcome of one `integrate` call.
///
/// Built once at the end of the refinement loop and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Best available approximation to the integral.
    pub value: f64,
    /// `true` if termination was not due to meeting an error threshold.
    pub aborted: bool,
    /// Number of integrand evaluations actually performed.
    pub call_count: usize,
    /// `|current stage - previous stage|`; `None` if no refinement stage ran.
    pub absolute_error_estimate: Option<f64>,
    /// Number of refinement stages completed.
    pub stages: usize,
    /// Why the loop stopped.
    pub termination: Termination,
}

impl Estimate {
    /// Absolute error estimate divided by the value (signed like the value).
    ///
    /// `None` when the absolute estimate is unknown or the value is zero.
    pub fn relative_error_estimate(&self) -> Option<f64> {
        match self.absolute_error_estimate {
            Some(err) if self.value != 0.0 => Some(err / self.value),
            _ => None,
        }
    }

    /// Returns `true` if an error threshold was met.
    pub fn converged(&self) -> bool {
        !self.aborted
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimate:")?;
        writeln!(f, "  Value:          {:.15e}", self.value)?;
        writeln!(f, "  Termination:    {}", self.termination)?;
        writeln!(f, "  Calls:          {}", self.call_count)?;
        writeln!(f, "  Stages:         {}", self.stages)?;
        match self.absolute_error_estimate {
            Some(err) => writeln!(f, "  Abs. error est: {:.3e}", err)?,
            None => writeln!(f, "  Abs. error est: n/a")?,
        }
        match self.relative_error_estimate() {
            Some(err) => write!(f, "  Rel. error est: {:.3e}", err),
            None => write!(f, "  Rel. error est: n/a"),
        }
    }
}

/// Snapshot of one refinement stage, as collected by
/// [`crate::Integrator::integrate_traced`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage number (1 for the first refinement after the bootstrap)
    pub stage: usize,
    /// Cumulative integrand evaluations after this stage
    pub call_count: usize,
    /// Distance between neighbouring samples at this stage
    pub step: f64,
    /// Trapezoidal approximation before extrapolation
    pub trapezoid: f64,
    /// Highest-degree extrapolated estimate
    pub estimate: f64,
    /// Change from the previous stage's estimate
    pub absolute_error_estimate: f64,
}
