use math_audio_romberg::{IntegratorBuilder, integrands::exp_chain};

fn main() {
    // d/dx sin(e^x) on [-1, 3]; the integrand oscillates faster as x grows
    let exact = 3.0_f64.exp().sin() - (-1.0_f64).exp().sin();

    for budget in [65, 257, 1025, 4097] {
        let integrator = IntegratorBuilder::new()
            .relative_error(1e-12)
            .max_call_count(budget)
            .build();

        let estimate = integrator
            .integrate(-1.0, 3.0, exp_chain)
            .expect("bounds and integrand are finite");

        let status = if estimate.converged() {
            "converged".to_string()
        } else {
            estimate.termination.to_string()
        };
        println!(
            "budget {:>5}: calls={:>5} value={:.15} true error={:>10.3e} estimate={:>10.3e} ({})",
            budget,
            estimate.call_count,
            estimate.value,
            estimate.value - exact,
            estimate.absolute_error_estimate.unwrap_or(f64::NAN),
            status
        );
    }
}
