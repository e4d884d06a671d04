use crate::parameters::MetforminParameters;
use crate::simulator::state::*;
use crate::simulator::V;

/// Fractional effects of metformin on glucose fluxes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct MetforminEffects {
    /// Increase of gut glucose uptake
    pub gut_wall: f64,
    /// Suppression of hepatic glucose production
    pub liver: f64,
    /// Increase of peripheral glucose uptake
    pub periphery: f64,
}

#[inline]
fn hill(v_max: f64, amount: f64, half: f64, n: i32) -> f64 {
    let an = amount.powi(n);
    v_max * an / (half.powi(n) + an)
}

/// Oral pools, gut lumen, gut wall, liver and plasma
pub(crate) fn metformin(m: &MetforminParameters, x: &V, dx: &mut V) -> MetforminEffects {
    let mo1 = x[METFORMIN_FAST];
    let mo2 = x[METFORMIN_SLOW];
    let mgl = x[METFORMIN_LUMEN];
    let mgw = x[METFORMIN_WALL];
    let ml = x[METFORMIN_LIVER];
    let mp = x[METFORMIN_PLASMA];

    dx[METFORMIN_FAST] = -m.alpha * mo1;
    dx[METFORMIN_SLOW] = -m.beta * mo2;
    dx[METFORMIN_LUMEN] = -(m.kgo + m.kgg) * mgl + m.rho_alpha * mo1 + m.rho_beta * mo2;
    dx[METFORMIN_WALL] = mgl * m.kgg + mp * m.kpg - mgw * m.kgl;
    dx[METFORMIN_LIVER] = mgw * m.kgl + mp * m.kpl - ml * m.klp;
    dx[METFORMIN_PLASMA] = ml * m.klp - (m.kpl + m.kpg + m.kpo) * mp + mgl;

    MetforminEffects {
        gut_wall: hill(m.v_gw_max, mgw, m.phi_gw50, m.n_gw),
        liver: hill(m.v_l_max, ml, m.phi_l50, m.n_l),
        periphery: hill(m.v_p_max, mp, m.phi_p50, m.n_p),
    }
}
