//! JSON configuration for the integrator.
//!
//! A document only needs to name the thresholds it overrides:
//!
//! ```json
//! { "relative_error": 1e-8, "max_call_count": 4097 }
//! ```

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::integrator::Integrator;

/// Parse an integrator from a JSON document; missing keys keep their defaults.
pub fn integrator_from_json(json: &str) -> Result<Integrator> {
    let integrator: Integrator = serde_json::from_str(json)?;
    if integrator.min_call_count > integrator.max_call_count {
        log::warn!(
            "min_call_count ({}) exceeds max_call_count ({}); the budget becomes {} calls",
            integrator.min_call_count,
            integrator.max_call_count,
            integrator.effective_max_call_count()
        );
    }
    Ok(integrator)
}

/// Load an integrator from a JSON file.
pub fn load_integrator<P: AsRef<Path>>(path: P) -> Result<Integrator> {
    let contents = fs::read_to_string(path)?;
    integrator_from_json(&contents)
}

/// Save an integrator to a JSON file.
pub fn save_integrator<P: AsRef<Path>>(integrator: &Integrator, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(integrator)?;
    fs::write(path, json)?;
    Ok(())
}
