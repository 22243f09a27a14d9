use crate::{Estimate, Integrator, Result};

/// Integrates `f` over `[a, b]` with the default [`Integrator`] thresholds.
///
/// This is a convenience wrapper for one-off integrals. Build an
/// [`Integrator`] (or use [`crate::IntegratorBuilder`]) to change the error
/// thresholds or the call budget.
///
/// # Errors
///
/// Returns an error if a bound is not finite or if `f` returns a non-finite
/// value; see [`Integrator::integrate`].
///
/// # Example
///
/// ```rust
/// use math_audio_romberg::romberg;
///
/// let estimate = romberg(|x: f64| x.sin(), 0.0, std::f64::consts::PI)?;
/// assert!((estimate.value - 2.0).abs() < 1e-10);
/// # Ok::<(), math_audio_romberg::RombergError>(())
/// ```
pub fn romberg<F>(f: F, a: f64, b: f64) -> Result<Estimate>
where
    F: FnMut(f64) -> f64,
{
    Integrator::default().integrate(a, b, f)
}
