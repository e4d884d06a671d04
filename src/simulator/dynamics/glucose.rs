use super::exercise::Exercise;
use super::metformin::MetforminEffects;
use crate::parameters::ParameterSet;
use crate::simulator::state::*;
use crate::simulator::steady_state::Basal;
use crate::simulator::V;

/// Glucose fluxes (mg/min) at the current state, and the targets of the slow
/// insulin actions on the liver
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetabolicRates {
    pub r_pgu: f64,
    pub r_hgp: f64,
    pub r_hgu: f64,
    pub r_ggu: f64,
    pub r_kge: f64,
    pub m_ihgp_inf: f64,
    pub m_ihgu_inf: f64,
}

/// Renal glucose excretion at kidney glucose `gk` (mg/dL)
pub(crate) fn renal_excretion(gk: f64) -> f64 {
    if gk >= 460.0 {
        330.0 + 0.872 * gk
    } else {
        71.0 + 71.0 * (0.011 * (gk - 460.0)).tanh()
    }
}

/// Glucagon multiplier of hepatic production
#[inline]
fn glucagon_effect(x: &V, basal: &Basal) -> f64 {
    2.7 * (0.39 * x[GLUCAGON] / basal.glucagon).tanh()
}

pub(crate) fn metabolic_rates(
    p: &ParameterSet,
    basal: &Basal,
    x: &V,
    metformin: &MetforminEffects,
) -> MetabolicRates {
    let m = &p.metabolic_rates;
    let rates = &basal.rates;

    let ipf = x[I_PERIPHERY_INTERSTITIAL] / basal.insulin_periphery_interstitial;
    let il = x[I_LIVER] / basal.insulin_liver;
    let gl = x[G_LIVER] / basal.glucose_liver;

    let m_ipgu = (7.03 + m.s_pgu * 6.52 * (m.c1 * (ipf - m.d1)).tanh())
        / (7.03 + m.s_pgu * 6.52 * (m.c1 * (1.0 - m.d1)).tanh());
    let r_pgu = m_ipgu * (x[G_PERIPHERY_INTERSTITIAL] / basal.glucose_periphery_interstitial)
        * rates.r_pgu;

    let m_ihgp_inf = (1.21 - m.s_hgp * 1.14 * (m.c2 * (il - m.d2)).tanh())
        / (1.21 - m.s_hgp * 1.14 * (m.c2 * (1.0 - m.d2)).tanh());
    let m_ghgp = (1.42 - 1.41 * (m.c3 * (gl - m.d3)).tanh())
        / (1.42 - 1.41 * (m.c3 * (1.0 - m.d3)).tanh());
    let m_gamma_hgp = glucagon_effect(x, basal) - x[F_R];
    let r_hgp = x[M_IHGP] * m_ghgp * m_gamma_hgp * rates.r_hgp;

    let m_ihgu_inf = (m.c4 * (il - m.d4)).tanh() / (m.c4 * (1.0 - m.d4)).tanh();
    let m_ghgu = (5.66 + 5.66 * (m.c5 * (gl - m.d5)).tanh())
        / (5.66 + 5.66 * (m.c5 * (1.0 - m.d5)).tanh());
    let r_hgu = x[M_IHGU] * m_ghgu * rates.r_hgu;

    MetabolicRates {
        r_pgu: r_pgu * (1.0 + metformin.periphery),
        r_hgp: r_hgp * (1.0 - metformin.liver),
        r_hgu,
        r_ggu: rates.r_ggu * (1.0 + metformin.gut_wall),
        r_kge: renal_excretion(x[G_KIDNEY]),
        m_ihgp_inf,
        m_ihgu_inf,
    }
}

/// First-order lag of the insulin and glucagon actions on the liver
pub(crate) fn modulation(basal: &Basal, x: &V, rates: &MetabolicRates, dx: &mut V) {
    dx[M_IHGP] = 0.04 * (rates.m_ihgp_inf - x[M_IHGP]);
    dx[F_R] = 0.0154 * (0.5 * (glucagon_effect(x, basal) - 1.0) - x[F_R]);
    dx[M_IHGU] = 0.04 * (rates.m_ihgu_inf - x[M_IHGU]);
}

/// The eight glucose compartments and the cumulative glucose diagnostics
#[allow(clippy::too_many_arguments)]
pub(crate) fn mass_balance(
    p: &ParameterSet,
    basal: &Basal,
    x: &V,
    rates: &MetabolicRates,
    appearance: f64,
    stress: f64,
    exercise: &Exercise,
    dx: &mut V,
) {
    let g = &p.glucose;
    let pa = &p.physical_activity;
    let r_bgu = basal.rates.r_bgu;
    let r_rbcu = basal.rates.r_rbcu;

    let gbc = x[G_BRAIN_CAPILLARY];
    let gbf = x[G_BRAIN_INTERSTITIAL];
    let gh = x[G_HEART];
    let gg = x[G_GUT];
    let gl = x[G_LIVER];
    let gk = x[G_KIDNEY];
    let gpc = x[G_PERIPHERY_CAPILLARY];
    let gpf = x[G_PERIPHERY_INTERSTITIAL];

    let uptake_boost = 1.0 + pa.alpha_e * exercise.e2;
    let production = (1.0 + stress) * (1.0 - pa.alpha_e * exercise.e2) * rates.r_hgp;

    dx[G_BRAIN_CAPILLARY] = (g.q_b * (gh - gbc) - (g.v_bf / g.t_b) * (gbc - gbf)) / g.v_bc;
    dx[G_BRAIN_INTERSTITIAL] = ((g.v_bf / g.t_b) * (gbc - gbf) - r_bgu) / g.v_bf;
    dx[G_HEART] = (g.q_b * gbc + g.q_l * gl + g.q_k * gk + g.q_p * gpc - g.q_h * gh - r_rbcu) / g.v_h;
    dx[G_GUT] = (g.q_g * (gh - gg) - rates.r_ggu + appearance) / g.v_g;
    dx[G_LIVER] = (g.q_a * gh + g.q_g * gg - g.q_l * gl + (production - uptake_boost * rates.r_hgu))
        / g.v_l;
    dx[G_KIDNEY] = (g.q_k * (gh - gk) - rates.r_kge) / g.v_k;
    dx[G_PERIPHERY_CAPILLARY] = (g.q_p * (gh - gpc) - (g.v_pf / g.t_p) * (gpc - gpf)) / g.v_pc;
    dx[G_PERIPHERY_INTERSTITIAL] = ((g.v_pf / g.t_p) * (gpc - (1.0 + pa.beta_e * exercise.e1) * gpf)
        - uptake_boost * rates.r_pgu)
        / g.v_pf;

    dx[GLUCOSE_CLEARED] = r_bgu
        + r_rbcu
        + rates.r_ggu
        + uptake_boost * rates.r_hgu
        + rates.r_kge
        + pa.beta_e * exercise.e1 * gpf * g.q_p
        + uptake_boost * rates.r_pgu;
    dx[GLUCOSE_APPEARED] = appearance + production;
    dx[G_HEART_INTEGRAL] = gh;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::steady_state::{BasalTargets, SteadyState};
    use approx::assert_relative_eq;

    #[test]
    fn renal_excretion_switches_branch_at_threshold() {
        assert_relative_eq!(renal_excretion(460.0), 330.0 + 0.872 * 460.0);
        assert_relative_eq!(renal_excretion(459.999_999), 71.0, epsilon = 1e-4);
        assert!(renal_excretion(100.0) < 1.0);
    }

    #[test]
    fn rates_match_basal_targets_at_steady_state() {
        let p = ParameterSet::default();
        let ss = SteadyState::compute(&p, &BasalTargets::default()).unwrap();
        let rates = metabolic_rates(&p, &ss.basal, &ss.x0, &MetforminEffects::default());
        assert_relative_eq!(rates.r_pgu, 35.0, max_relative = 1e-12);
        assert_relative_eq!(rates.r_hgu, 20.0, max_relative = 1e-12);
        assert_relative_eq!(rates.r_ggu, 20.0);
        assert_relative_eq!(rates.m_ihgp_inf, 1.0, max_relative = 1e-12);
        assert_relative_eq!(rates.m_ihgu_inf, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn metformin_suppresses_hepatic_production() {
        let p = ParameterSet::default();
        let ss = SteadyState::compute(&p, &BasalTargets::default()).unwrap();
        let none = metabolic_rates(&p, &ss.basal, &ss.x0, &MetforminEffects::default());
        let effects = MetforminEffects {
            gut_wall: 0.5,
            liver: 0.1,
            periphery: 0.2,
        };
        let dosed = metabolic_rates(&p, &ss.basal, &ss.x0, &effects);
        assert_relative_eq!(dosed.r_hgp, none.r_hgp * 0.9);
        assert_relative_eq!(dosed.r_pgu, none.r_pgu * 1.2);
        assert_relative_eq!(dosed.r_ggu, none.r_ggu * 1.5);
    }
}
