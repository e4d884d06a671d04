use crate::parameters::Dpp4InhibitorParameters;
use crate::simulator::state::*;
use crate::simulator::V;

/// Saturable binding of the inhibitor at concentration `c` to the free receptors
#[inline]
fn binding(v: &Dpp4InhibitorParameters, free: f64, c: f64) -> f64 {
    free * v.k2v * c / (v.kvd + c)
}

/// Vildagliptin absorption, distribution and DPP-4 receptor occupancy
pub(crate) fn vildagliptin(v: &Dpp4InhibitorParameters, x: &V, dx: &mut V) {
    let ag1 = x[VILDAGLIPTIN_DEPOT];
    let ag2 = x[VILDAGLIPTIN_TRANSIT];
    let ac = x[VILDAGLIPTIN_CENTRAL];
    let ap = x[VILDAGLIPTIN_PERIPHERAL];
    let drc = x[DPP4_BOUND_CENTRAL];
    let drp = x[DPP4_BOUND_PERIPHERAL];

    let bound_c = binding(v, v.rmax_c - drc, ac / v.v_c);
    let bound_p = binding(v, v.rmax_p - drp, ap / v.v_p);

    dx[VILDAGLIPTIN_DEPOT] = -v.ka1 * ag1;
    dx[VILDAGLIPTIN_TRANSIT] = v.ka1 * ag1 - v.ka2 * ag2;
    dx[VILDAGLIPTIN_CENTRAL] = v.ka2 * ag2 - ((v.cl + v.cl_ic) / v.v_c) * ac
        + (v.cl_ic / v.v_p) * ap
        - bound_c
        + v.koff * drc;
    dx[VILDAGLIPTIN_PERIPHERAL] = v.cl_ic * (ac / v.v_c - ap / v.v_p) - bound_p + v.koff * drp;
    dx[DPP4_BOUND_CENTRAL] = bound_c - (v.koff - v.kdeg) * drc;
    dx[DPP4_BOUND_PERIPHERAL] = bound_p - (v.koff + v.kdeg) * drp;
}
