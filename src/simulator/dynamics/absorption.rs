use crate::parameters::AbsorptionParameters;
use crate::simulator::state::*;
use crate::simulator::V;

/// Body weight the appearance rate is normalised by (kg)
const BODY_WEIGHT: f64 = 70.0;

/// Quantities of the gut model other submodels depend on
#[derive(Debug, Clone, Copy)]
pub(crate) struct GutAbsorption {
    /// Gastric emptying rate (1/min)
    pub kempt: f64,
    /// Rate of appearance of glucose in plasma (mg/kg/min)
    pub appearance: f64,
}

/// Gastric emptying rate for a stomach content `q` after a meal of size `meal`
///
/// Emptying is fast for an empty or a full stomach and slows down to `kmin`
/// in between. Without a recorded meal the stomach empties at `kmax`.
pub(crate) fn gastric_emptying_rate(a: &AbsorptionParameters, q: f64, meal: f64) -> f64 {
    if meal <= 0.0 {
        return a.kmax;
    }
    let alpha = 5.0 / (2.0 * meal * (1.0 - a.kq1));
    let beta = 5.0 / (2.0 * meal * a.kq2);
    a.kmin
        + (a.kmax - a.kmin) / 2.0
            * ((alpha * (q - a.kq1 * meal)).tanh() - (beta * (q - a.kq2 * meal)).tanh() + 2.0)
}

/// Stomach, intestine and meal bookkeeping. `dg` is the carbohydrate (mg)
/// ingested during the current step.
pub(crate) fn gut(a: &AbsorptionParameters, x: &V, dg: f64, dx: &mut V) -> GutAbsorption {
    let qss = x[Q_STO_SOLID];
    let qsl = x[Q_STO_LIQUID];
    let qgut = x[Q_GUT];
    let dnq = x[MEAL_MEMORY];

    dx[MEAL_DOSE] = -a.kmin * x[MEAL_DOSE];
    dx[MEAL_MEMORY] = a.kmin * (dg - dnq);

    let kempt = gastric_emptying_rate(a, qss + qsl, dnq);

    dx[Q_STO_SOLID] = -a.k12 * qss;
    dx[Q_STO_LIQUID] = -kempt * qsl + a.k12 * qss;
    dx[Q_GUT] = -a.kabs * qgut + kempt * qsl;

    GutAbsorption {
        kempt,
        appearance: a.fg * a.kabs * qgut / BODY_WEIGHT,
    }
}
