//! Romberg integrator: trapezoidal refinement with Richardson extrapolation.
//!
//! Each stage halves the sampling step, evaluates the integrand at the new
//! midpoints only, and extends the Richardson row by one degree. The change
//! between the best estimates of two consecutive stages serves as the error
//! estimate.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RombergError};
use crate::estimate::{Estimate, StageRecord, Termination};
use crate::tableau::RichardsonRow;

/// Default acceptable absolute error.
pub const DEFAULT_ABSOLUTE_ERROR: f64 = 1e-20;
/// Default acceptable error relative to the magnitude of the estimate.
pub const DEFAULT_RELATIVE_ERROR: f64 = 1e-10;
/// Default number of evaluations before convergence is checked.
pub const DEFAULT_MIN_CALL_COUNT: usize = 33;
/// Default evaluation budget.
pub const DEFAULT_MAX_CALL_COUNT: usize = 65537;

/// Romberg integrator configuration.
///
/// The four knobs are independent: no combination is rejected. In particular
/// `min_call_count > max_call_count` is accepted, in which case the budget is
/// raised to the first stage that reaches `min_call_count`
/// (see [`Integrator::effective_max_call_count`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integrator {
    /// Acceptable absolute error floor
    pub absolute_error: f64,
    /// Acceptable error relative to the current estimate's magnitude
    pub relative_error: f64,
    /// Minimum integrand evaluations before convergence is checked
    pub min_call_count: usize,
    /// Evaluation budget, rounded up to the next `2^n + 1`
    pub max_call_count: usize,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            absolute_error: DEFAULT_ABSOLUTE_ERROR,
            relative_error: DEFAULT_RELATIVE_ERROR,
            min_call_count: DEFAULT_MIN_CALL_COUNT,
            max_call_count: DEFAULT_MAX_CALL_COUNT,
        }
    }
}

impl Integrator {
    /// Creates an integrator with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluation budget actually enforced by the refinement loop.
    ///
    /// After `n` stages exactly `2^n + 1` evaluations have been made, so the
    /// budget is the smallest `2^n + 1` (with `n >= 1`) that is at least
    /// `max(max_call_count, min_call_count)`.
    pub fn effective_max_call_count(&self) -> usize {
        let target = self.max_call_count.max(self.min_call_count);
        let mut n = 1u32;
        loop {
            match 1usize.checked_shl(n).and_then(|p| p.checked_add(1)) {
                Some(count) if count >= target => return count,
                Some(_) => n += 1,
                None => return usize::MAX,
            }
        }
    }

    /// Estimates the integral of `f` between `lower_bound` and `upper_bound`.
    ///
    /// The bounds may be given in either order; the result is the same as for
    /// ascending bounds (it is not negated).
    ///
    /// # Errors
    ///
    /// Returns `RombergError::NonFiniteBound` if a bound is NaN or infinite,
    /// `RombergError::NonFiniteWidth` if the interval width overflows, and
    /// `RombergError::NonFiniteSample` as soon as `f` returns NaN or infinity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use math_audio_romberg::Integrator;
    ///
    /// let estimate = Integrator::new().integrate(0.0, 1.0, |x| x * x)?;
    /// assert!(!estimate.aborted);
    /// assert!((estimate.value - 1.0 / 3.0).abs() < 1e-12);
    /// # Ok::<(), math_audio_romberg::RombergError>(())
    /// ```
    pub fn integrate<F>(&self, lower_bound: f64, upper_bound: f64, f: F) -> Result<Estimate>
    where
        F: FnMut(f64) -> f64,
    {
        self.run(lower_bound, upper_bound, f, None)
    }

    /// Same as [`integrate`](Self::integrate), also returning one
    /// [`StageRecord`] per completed refinement stage.
    pub fn integrate_traced<F>(
        &self,
        lower_bound: f64,
        upper_bound: f64,
        f: F,
    ) -> Result<(Estimate, Vec<StageRecord>)>
    where
        F: FnMut(f64) -> f64,
    {
        let mut trace = Vec::new();
        let estimate = self.run(lower_bound, upper_bound, f, Some(&mut trace))?;
        Ok((estimate, trace))
    }

    fn run<F>(
        &self,
        lower_bound: f64,
        upper_bound: f64,
        mut f: F,
        mut trace: Option<&mut Vec<StageRecord>>,
    ) -> Result<Estimate>
    where
        F: FnMut(f64) -> f64,
    {
        check_bound("lower", lower_bound)?;
        check_bound("upper", upper_bound)?;

        let (lo, hi) = if lower_bound > upper_bound {
            (upper_bound, lower_bound)
        } else {
            (lower_bound, upper_bound)
        };

        if lo == hi {
            log::debug!("romberg: empty interval at {lo}, no sampling");
            return Ok(Estimate {
                value: 0.0,
                aborted: false,
                call_count: 0,
                absolute_error_estimate: Some(0.0),
                stages: 0,
                termination: Termination::EmptyInterval,
            });
        }

        let width = hi - lo;
        if !width.is_finite() {
            return Err(RombergError::NonFiniteWidth {
                lower: lo,
                upper: hi,
            });
        }

        let max_calls = self.effective_max_call_count();
        let mut sample = |x: f64| -> Result<f64> {
            let y = f(x);
            if y.is_finite() {
                Ok(y)
            } else {
                Err(RombergError::NonFiniteSample { x, value: y })
            }
        };

        // Stage 0: single trapezoid over the whole interval
        let mut total = (sample(lo)? + sample(hi)?) / 2.0;
        let mut call_count = 2usize;
        let mut row = RichardsonRow::new(total * width);
        let mut step_len = width;
        let mut absolute_error_estimate = None;
        let mut stage = 0usize;

        let termination = loop {
            let step = step_len / 2.0;
            if lo + step == lo || hi - step == hi {
                break Termination::PrecisionExhausted;
            }

            // New midpoints interleave with every sample taken so far
            let Some(new_points) = 1usize.checked_shl(stage as u32) else {
                break Termination::BudgetExhausted;
            };
            let mut sum = 0.0;
            for k in 0..new_points {
                sum += sample(lo + step * (2 * k + 1) as f64)?;
            }
            total += sum;
            call_count += new_points;
            stage += 1;
            step_len = step;

            let previous = row.best();
            let trapezoid = total * step;
            let estimate = row.push_trapezoid(trapezoid);
            let error = (estimate - previous).abs();
            absolute_error_estimate = Some(error);

            log::debug!(
                "romberg stage {}: calls={} estimate={:.15e} error={:.3e}",
                stage,
                call_count,
                estimate,
                error
            );
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(StageRecord {
                    stage,
                    call_count,
                    step,
                    trapezoid,
                    estimate,
                    absolute_error_estimate: error,
                });
            }

            // NaN never satisfies a threshold, so it can only end in the budget branch
            if call_count >= self.min_call_count {
                if error <= self.absolute_error || error <= self.relative_error * estimate.abs() {
                    break Termination::Converged;
                }
                if call_count >= max_calls {
                    break Termination::BudgetExhausted;
                }
            }
        };

        log::debug!(
            "romberg on [{}, {}]: {} after {} stages ({} calls)",
            lo,
            hi,
            termination,
            stage,
            call_count
        );

        Ok(Estimate {
            value: row.best(),
            aborted: termination.is_aborted(),
            call_count,
            absolute_error_estimate,
            stages: stage,
            termination,
        })
    }
}

fn check_bound(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RombergError::NonFiniteBound { name, value })
    }
}

/// Fluent builder for [`Integrator`].
///
/// # Example
///
/// ```rust
/// use math_audio_romberg::IntegratorBuilder;
///
/// let integrator = IntegratorBuilder::new()
///     .relative_error(1e-6)
///     .max_call_count(1025)
///     .build();
/// assert_eq!(integrator.effective_max_call_count(), 1025);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IntegratorBuilder {
    integrator: Integrator,
}

impl IntegratorBuilder {
    /// Creates a new builder with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the acceptable absolute error.
    pub fn absolute_error(mut self, v: f64) -> Self {
        self.integrator.absolute_error = v;
        self
    }
    /// Sets the acceptable relative error.
    pub fn relative_error(mut self, v: f64) -> Self {
        self.integrator.relative_error = v;
        self
    }
    /// Sets the number of evaluations before convergence is checked.
    pub fn min_call_count(mut self, v: usize) -> Self {
        self.integrator.min_call_count = v;
        self
    }
    /// Sets the evaluation budget.
    pub fn max_call_count(mut self, v: usize) -> Self {
        self.integrator.max_call_count = v;
        self
    }
    /// Builds the integrator. No combination of thresholds is rejected.
    pub fn build(self) -> Integrator {
        self.integrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_defaults() {
        let integrator = Integrator::default();
        assert_eq!(integrator.absolute_error, 1e-20);
        assert_eq!(integrator.relative_error, 1e-10);
        assert_eq!(integrator.min_call_count, 33);
        assert_eq!(integrator.max_call_count, 65537);
        assert_eq!(integrator.effective_max_call_count(), 65537);
    }

    #[test]
    fn test_effective_max_call_count_rounding() {
        let budget = |min, max| {
            IntegratorBuilder::new()
                .min_call_count(min)
                .max_call_count(max)
                .build()
                .effective_max_call_count()
        };

        // Already of the form 2^n + 1
        assert_eq!(budget(0, 3), 3);
        assert_eq!(budget(0, 65), 65);
        // Rounded up to the next 2^n + 1
        assert_eq!(budget(0, 10), 17);
        assert_eq!(budget(0, 66), 129);
        // n >= 1, so the smallest budget is three calls
        assert_eq!(budget(0, 0), 3);
        assert_eq!(budget(0, 2), 3);
        // min_call_count wins when larger, and is itself rounded up
        assert_eq!(budget(33, 10), 33);
        assert_eq!(budget(100, 10), 129);
        assert_eq!(budget(65, 65), 65);
        // Saturates instead of overflowing
        assert_eq!(budget(0, usize::MAX), usize::MAX);
    }

    #[test]
    fn test_call_count_matches_evaluations() {
        let mut calls = 0usize;
        let estimate = Integrator::new()
            .integrate(0.0, 1.0, |x| {
                calls += 1;
                x.exp()
            })
            .unwrap();

        assert_eq!(estimate.call_count, calls);
        assert_eq!(estimate.call_count, (1 << estimate.stages) + 1);
        assert!(!estimate.aborted);
        assert_abs_diff_eq!(estimate.value, std::f64::consts::E - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_min_call_count_delays_convergence() {
        // Simpson is exact for x^2, so stage 2 reports a zero error
        let eager = IntegratorBuilder::new().min_call_count(0).build();
        let estimate = eager.integrate(0.0, 1.0, |x| x * x).unwrap();
        assert_eq!(estimate.call_count, 5);
        assert_eq!(estimate.termination, Termination::Converged);

        let estimate = Integrator::new().integrate(0.0, 1.0, |x| x * x).unwrap();
        assert_eq!(estimate.call_count, 33);
        assert_eq!(estimate.termination, Termination::Converged);
    }

    #[test]
    fn test_single_stage_exit() {
        let integrator = IntegratorBuilder::new().min_call_count(0).build();
        let estimate = integrator.integrate(-2.0, 3.0, |_| 1.5).unwrap();

        assert_eq!(estimate.call_count, 3);
        assert_eq!(estimate.stages, 1);
        assert_eq!(estimate.absolute_error_estimate, Some(0.0));
        assert_eq!(estimate.value, 7.5);
        assert!(!estimate.aborted);
    }

    #[test]
    fn test_budget_exhausted() {
        let integrator = IntegratorBuilder::new().max_call_count(10).build();
        let estimate = integrator.integrate(0.0, 1.0, f64::sqrt).unwrap();

        // min_call_count (33) dominates the requested budget of 10
        assert_eq!(estimate.call_count, 33);
        assert!(estimate.aborted);
        assert_eq!(estimate.termination, Termination::BudgetExhausted);
        assert_abs_diff_eq!(estimate.value, 2.0 / 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_min_above_max_is_deterministic() {
        let integrator = IntegratorBuilder::new()
            .min_call_count(100)
            .max_call_count(10)
            .build();
        let estimate = integrator.integrate(0.0, 1.0, f64::sqrt).unwrap();

        assert_eq!(estimate.call_count, 129);
        assert!(estimate.aborted);
    }

    #[test]
    fn test_precision_guard() {
        // The spacing of f64 around 1e16 is 2, so the first midpoint vanishes
        let estimate = Integrator::new()
            .integrate(1e16, 1e16 + 2.0, |_| 1.0)
            .unwrap();

        assert_eq!(estimate.termination, Termination::PrecisionExhausted);
        assert!(estimate.aborted);
        assert_eq!(estimate.call_count, 2);
        assert_eq!(estimate.stages, 0);
        assert_eq!(estimate.absolute_error_estimate, None);
        assert_eq!(estimate.value, 2.0);
    }

    #[test]
    fn test_precision_guard_keeps_previous_stage() {
        // Steps of 32, 16, 8, 4 and 2 are representable near 1e16; a step of 1 is not
        let integrator = IntegratorBuilder::new()
            .absolute_error(0.0)
            .relative_error(0.0)
            .build();
        let (estimate, trace) = integrator
            .integrate_traced(1e16, 1e16 + 64.0, |x| ((x - 1e16) / 10.0).sin())
            .unwrap();

        assert_eq!(estimate.termination, Termination::PrecisionExhausted);
        assert!(estimate.aborted);
        assert_eq!(estimate.call_count, 33);
        assert_eq!(estimate.stages, 5);
        assert_eq!(trace.len(), 5);

        let last = &trace[4];
        assert_eq!(last.call_count, estimate.call_count);
        assert_eq!(
            estimate.absolute_error_estimate,
            Some(last.absolute_error_estimate)
        );
        assert_eq!(estimate.value, last.estimate);
    }

    #[test]
    fn test_empty_interval() {
        let mut calls = 0usize;
        let estimate = Integrator::new()
            .integrate(1.25, 1.25, |x| {
                calls += 1;
                x
            })
            .unwrap();

        assert_eq!(calls, 0);
        assert_eq!(estimate.value, 0.0);
        assert!(!estimate.aborted);
        assert_eq!(estimate.termination, Termination::EmptyInterval);
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        let integrator = Integrator::new();

        let err = integrator.integrate(f64::NAN, 1.0, |x| x).unwrap_err();
        assert!(matches!(
            err,
            RombergError::NonFiniteBound { name: "lower", .. }
        ));

        let err = integrator
            .integrate(0.0, f64::INFINITY, |x| x)
            .unwrap_err();
        assert!(matches!(
            err,
            RombergError::NonFiniteBound { name: "upper", .. }
        ));

        let err = integrator
            .integrate(-f64::MAX, f64::MAX, |x| x)
            .unwrap_err();
        assert!(matches!(err, RombergError::NonFiniteWidth { .. }));
    }

    #[test]
    fn test_rejects_non_finite_sample() {
        let err = Integrator::new()
            .integrate(0.0, 1.0, |x| if x > 0.5 { f64::NAN } else { x })
            .unwrap_err();

        match err {
            RombergError::NonFiniteSample { x, value } => {
                assert_eq!(x, 1.0);
                assert!(value.is_nan());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_threshold_never_converges() {
        let integrator = IntegratorBuilder::new()
            .absolute_error(f64::NAN)
            .relative_error(f64::NAN)
            .max_call_count(65)
            .build();
        let estimate = integrator.integrate(0.0, 1.0, |x| x).unwrap();

        assert!(estimate.aborted);
        assert_eq!(estimate.call_count, 65);
    }

    #[test]
    fn test_trace_matches_estimate() {
        let integrator = Integrator::new();
        let (traced, trace) = integrator.integrate_traced(0.0, 2.0, f64::cos).unwrap();
        let plain = integrator.integrate(0.0, 2.0, f64::cos).unwrap();

        assert_eq!(traced, plain);
        assert_eq!(trace.len(), traced.stages);

        let last = trace.last().unwrap();
        assert_eq!(last.call_count, traced.call_count);
        assert_eq!(last.estimate, traced.value);
        assert_eq!(Some(last.absolute_error_estimate), traced.absolute_error_estimate);

        for (i, record) in trace.iter().enumerate() {
            assert_eq!(record.stage, i + 1);
            assert_eq!(record.call_count, (1 << record.stage) + 1);
            assert_eq!(record.step, 2.0 / (1 << record.stage) as f64);
        }
    }

    #[test]
    fn test_serde_partial_document() {
        let integrator: Integrator = serde_json::from_str(r#"{"relative_error": 1e-6}"#).unwrap();
        assert_relative_eq!(integrator.relative_error, 1e-6);
        assert_eq!(integrator.min_call_count, DEFAULT_MIN_CALL_COUNT);
        assert_eq!(integrator.max_call_count, DEFAULT_MAX_CALL_COUNT);
    }
}
