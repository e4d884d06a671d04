use crate::parameters::{Dpp4InhibitorParameters, GlucagonParameters, Glp1Parameters};
use crate::simulator::state::*;
use crate::simulator::steady_state::Basal;
use crate::simulator::V;

/// Normalised glucagon, stimulated by stress and suppressed by glucose and insulin
pub(crate) fn glucagon(gc: &GlucagonParameters, basal: &Basal, x: &V, stress: f64, dx: &mut V) {
    let m_g = 1.31 - 0.61 * (1.06 * (x[G_HEART] / basal.glucose_heart - 0.47)).tanh();
    let m_i = 2.93 - 2.09 * (4.18 * (x[I_HEART] / basal.insulin_heart - 0.62)).tanh();
    dx[GLUCAGON] = ((1.0 + stress) * m_g * m_i * 9.1 - 9.1 * x[GLUCAGON]) / gc.v_gamma;
}

/// Gut and plasma GLP-1. Secretion follows gastric emptying; plasma
/// clearance grows with the DPP-4 receptors the inhibitor leaves free.
pub(crate) fn glp1(
    g: &Glp1Parameters,
    v: &Dpp4InhibitorParameters,
    x: &V,
    kempt: f64,
    dx: &mut V,
) {
    let phi = x[GLP1_GUT];
    let clearance = g.k_out + (v.rmax_c - x[DPP4_BOUND_CENTRAL]) * g.cf2;
    dx[GLP1_GUT] = g.zeta * kempt * x[Q_STO_LIQUID] - phi / g.tau_phi;
    dx[GLP1_PLASMA] = (phi / g.tau_phi - clearance * x[GLP1_PLASMA]) / g.v_phi;
}
