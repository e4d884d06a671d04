use crate::parameters::{
    FastActingInsulinParameters, InsulinParameters, LongActingInsulinParameters, ParameterSet,
};
use crate::simulator::state::*;
use crate::simulator::steady_state::Basal;
use crate::simulator::V;

/// Seven insulin compartments and the cumulative insulin diagnostics.
/// `secretion` is the current pancreatic secretion.
pub(crate) fn mass_balance(
    p: &ParameterSet,
    basal: &Basal,
    x: &V,
    secretion: f64,
    stress: f64,
    dx: &mut V,
) {
    let i: &InsulinParameters = &p.insulin;
    let la = &p.long_acting_insulin;
    let fa = &p.fast_acting_insulin;

    let ib = x[I_BRAIN];
    let ih = x[I_HEART];
    let ig = x[I_GUT];
    let il = x[I_LIVER];
    let ik = x[I_KIDNEY];
    let ipc = x[I_PERIPHERY_CAPILLARY];
    let ipf = x[I_PERIPHERY_INTERSTITIAL];
    let ila = x[LONG_INTERSTITIAL];
    let ifa = x[FAST_INTERSTITIAL];

    let r_pir = secretion / basal.secretion * basal.rates.r_pir;
    let released = (1.0 - stress) * r_pir;

    // Liver, kidney and peripheral clearance. The liver clears a share of
    // what enters it, so I_LIVER cannot be driven below zero.
    let r_lic = 0.4 * (i.q_a * ih + i.q_g * ig + released);
    let r_kic = 0.3 * i.q_k * ik;
    let r_pic = ipf / (0.85 / (0.15 * i.q_p) - 20.0 / i.v_pf);

    dx[I_BRAIN] = i.q_b / i.v_b * (ih - ib);
    dx[I_HEART] = (i.q_b * ib + i.q_l * il + i.q_k * ik + i.q_p * ipf - i.q_h * ih) / i.v_h;
    dx[I_GUT] = i.q_g / i.v_g * (ih - ig);
    dx[I_LIVER] = (i.q_a * ih + i.q_g * ig - i.q_l * il + released - r_lic) / i.v_l;
    dx[I_KIDNEY] = (i.q_k * (ih - ik) - r_kic) / i.v_k;
    dx[I_PERIPHERY_CAPILLARY] = (i.q_p * (ih - ipc) - (i.v_pf / i.t_p) * (ipc - ipf)) / i.v_pc
        + 10.0 * ifa
        + 10.0 * ila;
    dx[I_PERIPHERY_INTERSTITIAL] = ((i.v_pf / i.t_p) * (ipc - ipf) - r_pic) / i.v_pf;

    dx[INSULIN_CLEARED] = r_lic + r_kic + r_pic;
    dx[INSULIN_SECRETED] = released;
    dx[INSULIN_INJECTED] =
        i.v_pf * la.r * la.b * ila / (1.0 + ipf) + i.v_pf * fa.r * fa.b * ifa / (1.0 + ipf);
}

/// Subcutaneous depot of long-acting insulin: precipitate, hexamers, dimers
pub(crate) fn long_acting(la: &LongActingInsulinParameters, x: &V, dx: &mut V) {
    let bound = x[LONG_BOUND];
    let hexamer = x[LONG_HEXAMER];
    let dimer = x[LONG_DIMER];
    let interstitial = x[LONG_INTERSTITIAL];

    let dissolution = la.k * bound * (la.c_max / (1.0 + hexamer));
    let dissociation = la.p * (hexamer - la.q * dimer.powi(3));
    let absorption = la.b * dimer / (1.0 + interstitial);

    dx[LONG_BOUND] = -dissolution;
    dx[LONG_HEXAMER] = -dissociation + dissolution;
    dx[LONG_DIMER] = dissociation - absorption;
    dx[LONG_INTERSTITIAL] = la.r * absorption - la.k_cl * interstitial;
}

/// Subcutaneous depot of fast-acting insulin: hexamers and dimers
pub(crate) fn fast_acting(fa: &FastActingInsulinParameters, x: &V, dx: &mut V) {
    let hexamer = x[FAST_HEXAMER];
    let dimer = x[FAST_DIMER];
    let interstitial = x[FAST_INTERSTITIAL];

    let dissociation = fa.p * (hexamer - fa.q * dimer.powi(3));
    let absorption = fa.b * dimer / (1.0 + interstitial);

    dx[FAST_HEXAMER] = -dissociation;
    dx[FAST_DIMER] = dissociation - absorption;
    dx[FAST_INTERSTITIAL] = fa.r * absorption - fa.k_cl * interstitial;
}
