use super::ParameterSet;
use crate::SimulatorError;

/// Names accepted by [ParameterSet::variant]
pub const VARIANTS: [&str; 2] = ["default", "mard"];

impl ParameterSet {
    /// Looks up a named phenotype
    ///
    /// `"default"` is the reference patient. `"mard"` models mild age-related
    /// diabetes: a doubled labile beta-cell pool with slower loss, and
    /// steeper insulin action curves on peripheral uptake and the liver.
    pub fn variant(name: &str) -> Result<ParameterSet, SimulatorError> {
        match name {
            "default" => Ok(ParameterSet::default()),
            "mard" => Ok(ParameterSet::mard()),
            other => Err(SimulatorError::UnknownVariant(other.to_string())),
        }
    }

    fn mard() -> ParameterSet {
        ParameterSet::default().with(|p| {
            let pancreas = &mut p.pancreas;
            pancreas.ml0 *= 2.0;
            pancreas.ks -= pancreas.ks / 4.0;

            let rates = &mut p.metabolic_rates;
            rates.c1 += 10.0 * rates.c1;
            rates.c2 += 20.0 * rates.c2;
            // c4 is shifted by the already-updated c2
            rates.c4 += 20.0 * rates.c2;
        })
    }
}
