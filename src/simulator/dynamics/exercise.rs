use crate::parameters::PhysicalActivityParameters;
use crate::simulator::state::*;
use crate::simulator::V;

/// Exertion signals driving the glucose fluxes
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Exercise {
    /// Heart rate above rest, filtered (bpm)
    pub e1: f64,
    /// Slow exercise effect on hepatic and peripheral fluxes
    pub e2: f64,
}

pub(crate) fn exercise(
    pa: &PhysicalActivityParameters,
    x: &V,
    heart_rate: f64,
    dx: &mut V,
) -> Exercise {
    let e1 = x[EXERTION_E1];
    let e2 = x[EXERTION_E2];
    let te = x[EXERTION_ENERGY];

    let ratio = (e1 / (pa.ae * pa.hr_basal)).powi(pa.ne);
    let ge = ratio / (1.0 + ratio);

    dx[EXERTION_E1] = (heart_rate - pa.hr_basal - e1) / pa.t_hr;
    dx[EXERTION_E2] = -(ge + 1.0 / pa.te) * e2 + ge;
    dx[EXERTION_ENERGY] = (pa.ce1 * ge + pa.ce2 - te) / pa.te;

    Exercise { e1, e2 }
}
