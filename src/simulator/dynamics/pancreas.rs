use crate::parameters::PancreasParameters;
use crate::simulator::state::*;
use crate::simulator::steady_state::glucose_stimulus;
use crate::simulator::V;

/// Beta-cell insulin pool and secretion. Returns the current secretion rate.
///
/// The first-phase term `N2 * (XG - R)` only contributes while the glucose
/// stimulus is rising above its tracked value `R`.
pub(crate) fn pancreas(pan: &PancreasParameters, x: &V, dx: &mut V) -> f64 {
    let phi = x[GLP1_PLASMA];
    let mpan = x[PANCREAS_MASS];
    let p = x[PANCREAS_POTENTIATOR];
    let r = x[PANCREAS_TRACKING];

    let xg = glucose_stimulus(x[G_HEART]);
    let p_inf = xg.powf(1.11) + pan.zeta1 * phi;

    let secretion = if xg > r {
        pan.s_factor * mpan * (pan.n1 * p_inf + pan.n2 * (xg - r) + pan.zeta2 * phi)
    } else {
        pan.s_factor * mpan * (pan.n1 * p_inf + pan.zeta2 * phi)
    };

    dx[PANCREAS_MASS] = pan.ml0 * pan.kl - pan.ks * mpan + pan.gamma * p - secretion;
    dx[PANCREAS_POTENTIATOR] = pan.alpha * (p_inf - p);
    dx[PANCREAS_TRACKING] = pan.beta * (xg - r);

    secretion
}
