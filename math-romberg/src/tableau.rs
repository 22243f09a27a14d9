//! Richardson extrapolation row.
//!
//! The Romberg table is triangular, but a stage only ever reads the previous
//! anti-diagonal. [`RichardsonRow`] keeps just that anti-diagonal: entry `td`
//! holds the approximation of extrapolation degree `td` for the newest stage.

/// Newest anti-diagonal of the Romberg table.
#[derive(Debug, Clone, Default)]
pub struct RichardsonRow {
    values: Vec<f64>,
}

impl RichardsonRow {
    /// Starts a table from the single-interval trapezoidal estimate.
    pub fn new(trapezoid: f64) -> Self {
        Self {
            values: vec![trapezoid],
        }
    }

    /// Number of extrapolation degrees currently held (stage + 1).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the row holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Highest-degree approximation, i.e. the best estimate of the stage.
    pub fn best(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// Extrapolated values ordered by degree.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Adds a refined trapezoidal estimate and extrapolates the new row.
    ///
    /// Before the update `values[td]` still holds the previous stage's degree
    /// `td - 1` entry, so the recurrence
    /// `R[td] = R[td-1] + (R[td-1] - R_prev[td-1]) / (4^td - 1)`
    /// can be applied in place, walking upwards in `td`.
    ///
    /// Returns the new best estimate.
    pub fn push_trapezoid(&mut self, trapezoid: f64) -> f64 {
        self.values.insert(0, trapezoid);

        let mut factor = 1.0;
        for td in 1..self.values.len() {
            factor *= 4.0;
            let lower = self.values[td - 1];
            self.values[td] = lower + (lower - self.values[td]) / (factor - 1.0);
        }

        self.best()
    }
}
