//! Reference integrands for benchmarks, the command line tool and tests.
//!
//! Every entry is smooth on its default interval. Entries with a closed-form
//! antiderivative expose the exact integral through [`Integrand::exact`].

use std::collections::HashMap;
use std::f64::consts::PI;

/// Scalar integrand type.
pub type IntegrandFn = fn(f64) -> f64;

/// A named integrand with its default bounds.
#[derive(Debug, Clone)]
pub struct Integrand {
    /// Registry key
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// The function to integrate
    pub f: IntegrandFn,
    /// Closed-form antiderivative, when one exists in terms of `std` functions
    pub antiderivative: Option<IntegrandFn>,
    /// Default integration bounds
    pub bounds: (f64, f64),
}

impl Integrand {
    /// Exact integral over `[a, b]`, if an antiderivative is known.
    pub fn exact(&self, a: f64, b: f64) -> Option<f64> {
        self.antiderivative.map(|big_f| big_f(b) - big_f(a))
    }
}

/// Standard normal density.
pub fn normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Derivative of `sin(e^x)`: `cos(e^x) e^x`.
pub fn exp_chain(x: f64) -> f64 {
    let ex = x.exp();
    ex.cos() * ex
}

fn exp_chain_antiderivative(x: f64) -> f64 {
    x.exp().sin()
}

fn sine(x: f64) -> f64 {
    x.sin()
}

fn sine_antiderivative(x: f64) -> f64 {
    -x.cos()
}

fn cubic(x: f64) -> f64 {
    x * x * x - x
}

fn cubic_antiderivative(x: f64) -> f64 {
    let x2 = x * x;
    0.25 * x2 * x2 - 0.5 * x2
}

fn arctan_pi(x: f64) -> f64 {
    4.0 / (1.0 + x * x)
}

fn arctan_pi_antiderivative(x: f64) -> f64 {
    4.0 * x.atan()
}

fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

fn sqrt_antiderivative(x: f64) -> f64 {
    2.0 / 3.0 * x * x.sqrt()
}

fn runge(x: f64) -> f64 {
    1.0 / (1.0 + 25.0 * x * x)
}

fn runge_antiderivative(x: f64) -> f64 {
    (5.0 * x).atan() / 5.0
}

fn gaussian_peak(x: f64) -> f64 {
    let d = x - 5.0;
    (-50.0 * d * d).exp()
}

/// Registry mapping names to reference integrands.
pub struct IntegrandRegistry {
    integrands: HashMap<&'static str, Integrand>,
}

impl Default for IntegrandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegrandRegistry {
    /// Creates a registry holding every reference integrand.
    pub fn new() -> Self {
        let entries = [
            Integrand {
                name: "normal_pdf",
                description: "Standard normal density",
                f: normal_pdf,
                antiderivative: None,
                bounds: (0.0, 4.0),
            },
            Integrand {
                name: "exp_chain",
                description: "cos(e^x) e^x, derivative of sin(e^x)",
                f: exp_chain,
                antiderivative: Some(exp_chain_antiderivative),
                bounds: (-1.0, 3.0),
            },
            Integrand {
                name: "sine",
                description: "sin(x) over a half period",
                f: sine,
                antiderivative: Some(sine_antiderivative),
                bounds: (0.0, PI),
            },
            Integrand {
                name: "cubic",
                description: "x^3 - x, integrated exactly by Simpson's rule",
                f: cubic,
                antiderivative: Some(cubic_antiderivative),
                bounds: (0.0, 2.0),
            },
            Integrand {
                name: "arctan_pi",
                description: "4 / (1 + x^2), integrates to pi on [0, 1]",
                f: arctan_pi,
                antiderivative: Some(arctan_pi_antiderivative),
                bounds: (0.0, 1.0),
            },
            Integrand {
                name: "sqrt",
                description: "sqrt(x), unbounded derivative at the origin",
                f: sqrt,
                antiderivative: Some(sqrt_antiderivative),
                bounds: (0.0, 1.0),
            },
            Integrand {
                name: "runge",
                description: "Runge function 1 / (1 + 25 x^2)",
                f: runge,
                antiderivative: Some(runge_antiderivative),
                bounds: (-1.0, 1.0),
            },
            Integrand {
                name: "gaussian_peak",
                description: "Narrow Gaussian exp(-50 (x - 5)^2) centred in [0, 10]",
                f: gaussian_peak,
                antiderivative: None,
                bounds: (0.0, 10.0),
            },
        ];

        let integrands = entries.into_iter().map(|i| (i.name, i)).collect();
        Self { integrands }
    }

    /// Looks up an integrand by name.
    pub fn get(&self, name: &str) -> Option<&Integrand> {
        self.integrands.get(name)
    }

    /// Sorted list of registered names.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.integrands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Iterates over the registered integrands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Integrand> {
        self.names()
            .into_iter()
            .filter_map(move |name| self.integrands.get(name))
    }
}
