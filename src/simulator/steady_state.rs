use serde::{Deserialize, Serialize};

use super::state::*;
use super::V;
use crate::parameters::{ensure_divisor, ParameterSet};
use crate::SimulatorError;

/// Basal flux targets (mg/min) and concentration targets of the fasting patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasalTargets {
    /// Brain glucose uptake
    pub r_bgu: f64,
    /// Red blood cell glucose uptake
    pub r_rbcu: f64,
    /// Gut glucose uptake
    pub r_ggu: f64,
    /// Peripheral glucose uptake
    pub r_pgu: f64,
    /// Hepatic glucose uptake
    pub r_hgu: f64,
    /// Peripheral capillary glucose (mg/dL)
    pub glucose_periphery: f64,
    /// Peripheral interstitial insulin (mU/L)
    pub insulin_periphery: f64,
}

impl Default for BasalTargets {
    fn default() -> Self {
        Self {
            r_bgu: 70.0,
            r_rbcu: 10.0,
            r_ggu: 20.0,
            r_pgu: 35.0,
            r_hgu: 20.0,
            // 7 mmol/L
            glucose_periphery: 7.0 / 0.0555,
            insulin_periphery: 1.0,
        }
    }
}

/// Metabolic flux rates at steady state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasalRates {
    /// Pancreatic insulin release
    pub r_pir: f64,
    pub r_bgu: f64,
    pub r_rbcu: f64,
    pub r_ggu: f64,
    pub r_pgu: f64,
    /// Hepatic glucose production
    pub r_hgp: f64,
    pub r_hgu: f64,
}

/// Everything the dynamics normalise against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basal {
    pub rates: BasalRates,
    /// Basal insulin secretion of the pancreas model
    pub secretion: f64,
    pub glucose_heart: f64,
    pub glucose_liver: f64,
    pub glucose_periphery_interstitial: f64,
    pub insulin_heart: f64,
    pub insulin_liver: f64,
    pub insulin_periphery_interstitial: f64,
    pub glucagon: f64,
}

/// Initial state and basal values of a fasting patient
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyState {
    pub x0: V,
    pub basal: Basal,
}

impl SteadyState {
    /// Solves the model for its fasting fixed point in closed form
    ///
    /// Glucose concentrations follow from the flux targets and the peripheral
    /// glucose target, insulin concentrations from the peripheral insulin
    /// target, and the pancreas is set to the equilibrium of its secretion
    /// model at the resulting heart glucose.
    pub fn compute(
        params: &ParameterSet,
        targets: &BasalTargets,
    ) -> Result<SteadyState, SimulatorError> {
        params.validate()?;

        let mut x0 = V::zeros(NSTATES);

        // Glucose
        let g = &params.glucose;
        let gpc = targets.glucose_periphery;
        let gpf = gpc - g.t_p * targets.r_pgu / g.v_pf;
        let gh = gpc + (g.v_pf / (g.q_p * g.t_p)) * (gpc - gpf);
        let gk = gh;
        let gg = gh - targets.r_ggu / g.q_g;
        let gbc = gh - targets.r_bgu / g.q_b;
        let gbf = gbc - (g.t_b / g.v_bf) * targets.r_bgu;
        let gl = (g.q_h * gh + targets.r_rbcu - g.q_b * gbc - g.q_k * gk - g.q_p * gpc) / g.q_l;
        let r_hgp = g.q_l * gl - g.q_a * gh - g.q_g * gg + targets.r_hgu;

        for (index, value) in [
            (G_BRAIN_CAPILLARY, gbc),
            (G_BRAIN_INTERSTITIAL, gbf),
            (G_HEART, gh),
            (G_GUT, gg),
            (G_LIVER, gl),
            (G_KIDNEY, gk),
            (G_PERIPHERY_CAPILLARY, gpc),
            (G_PERIPHERY_INTERSTITIAL, gpf),
        ] {
            x0[index] = value;
        }

        // Insulin
        let insulin = InsulinSteadyState::solve(params, targets.insulin_periphery)?;
        for (index, value) in [
            (I_BRAIN, insulin.brain),
            (I_HEART, insulin.heart),
            (I_GUT, insulin.gut),
            (I_LIVER, insulin.liver),
            (I_KIDNEY, insulin.kidney),
            (I_PERIPHERY_CAPILLARY, insulin.periphery_capillary),
            (I_PERIPHERY_INTERSTITIAL, insulin.periphery_interstitial),
        ] {
            x0[index] = value;
        }

        x0[M_IHGP] = 1.0;
        x0[F_R] = 0.0027;
        x0[M_IHGU] = 1.0;

        // Pancreas
        let pan = &params.pancreas;
        let xg = glucose_stimulus(gh);
        let p_inf = xg.powf(1.11);
        let mpan = (pan.ml0 * pan.kl + pan.gamma * p_inf)
            / ensure_divisor("pancreas.ks + n1 * P", pan.ks + pan.n1 * p_inf)?;
        let secretion = pan.n1 * p_inf * mpan;
        ensure_divisor("basal secretion", secretion)?;
        ensure_divisor("basal heart glucose", gh)?;
        ensure_divisor("basal liver glucose", gl)?;
        ensure_divisor("basal peripheral interstitial glucose", gpf)?;
        ensure_divisor("basal heart insulin", insulin.heart)?;
        ensure_divisor("basal liver insulin", insulin.liver)?;
        ensure_divisor(
            "basal peripheral interstitial insulin",
            insulin.periphery_interstitial,
        )?;

        x0[PANCREAS_MASS] = mpan;
        x0[PANCREAS_POTENTIATOR] = p_inf;
        x0[PANCREAS_TRACKING] = xg;
        x0[GLUCAGON] = 1.0;

        let basal = Basal {
            rates: BasalRates {
                r_pir: insulin.release,
                r_bgu: targets.r_bgu,
                r_rbcu: targets.r_rbcu,
                r_ggu: targets.r_ggu,
                r_pgu: targets.r_pgu,
                r_hgp,
                r_hgu: targets.r_hgu,
            },
            secretion,
            glucose_heart: gh,
            glucose_liver: gl,
            glucose_periphery_interstitial: gpf,
            insulin_heart: insulin.heart,
            insulin_liver: insulin.liver,
            insulin_periphery_interstitial: insulin.periphery_interstitial,
            glucagon: 1.0,
        };

        Ok(SteadyState { x0, basal })
    }
}

/// Glucose stimulus of the beta cells at heart glucose `gh`
pub(crate) fn glucose_stimulus(gh: f64) -> f64 {
    gh.powf(3.27) / (1.32f64.powf(3.27) + 5.93 * gh.powf(3.02))
}

struct InsulinSteadyState {
    brain: f64,
    heart: f64,
    gut: f64,
    liver: f64,
    kidney: f64,
    periphery_capillary: f64,
    periphery_interstitial: f64,
    release: f64,
}

impl InsulinSteadyState {
    /// Symbolic solution of the insulin mass balance for a given peripheral
    /// interstitial concentration, with the liver and kidney extraction
    /// fractions (0.4, 0.3) and the peripheral extraction (0.15) folded in.
    #[allow(non_snake_case)]
    fn solve(params: &ParameterSet, ipf: f64) -> Result<Self, SimulatorError> {
        let i = &params.insulin;
        let (QIA, QIB, QIG, QIH, QIK, QIL, QIP) = (i.q_a, i.q_b, i.q_g, i.q_h, i.q_k, i.q_l, i.q_p);
        let (TIP, VIPF) = (i.t_p, i.v_pf);
        let IPF = ipf;

        let t2 = QIP * QIP;
        let t3 = QIP * 60.0;
        let t4 = VIPF * 17.0;
        let t5 = IPF * QIP * TIP * 3.0;
        let t8 = IPF * VIPF * 20.0;
        let t9 = -IPF * QIP * 60.0;
        let t12 = t5 + t8 + t9;
        let t10 = ensure_divisor("60 * insulin.q_p - 17 * insulin.v_pf", t3 - t4)?;
        let t11 = 1.0 / t10;
        let t13 = t11 * t12;
        let t14 = -t13;

        let liver = (t11
            * (IPF * t2 * -7.8e2 - IPF * QIB * QIP * 7.8e2 + IPF * QIH * QIP * 7.8e2
                - IPF * QIK * QIP * 6.0e2
                + IPF * QIB * VIPF * 2.6e2
                - IPF * QIH * VIPF * 2.6e2
                + IPF * QIK * VIPF * 2.0e2
                + IPF * QIP * VIPF * 2.21e2
                + IPF * QIB * QIP * TIP * 3.9e1
                - IPF * QIH * QIP * TIP * 3.9e1
                + IPF * QIK * QIP * TIP * 3.0e1))
            / (QIL * 13.0);

        let release = (t11
            * (IPF * t2 * -3.9e3 - IPF * QIA * QIP * 2.34e3 - IPF * QIB * QIP * 3.9e3
                - IPF * QIG * QIP * 2.34e3
                + IPF * QIH * QIP * 3.9e3
                - IPF * QIK * QIP * 3.0e3
                + IPF * QIA * VIPF * 7.8e2
                + IPF * QIB * VIPF * 1.3e3
                + IPF * QIG * VIPF * 7.8e2
                - IPF * QIH * VIPF * 1.3e3
                + IPF * QIK * VIPF * 1.0e3
                + IPF * QIP * VIPF * 1.105e3
                + IPF * QIA * QIP * TIP * 1.17e2
                + IPF * QIB * QIP * TIP * 1.95e2
                + IPF * QIG * QIP * TIP * 1.17e2
                - IPF * QIH * QIP * TIP * 1.95e2
                + IPF * QIK * QIP * TIP * 1.5e2))
            / 39.0;

        Ok(Self {
            brain: t14,
            heart: t14,
            gut: t14,
            liver,
            kidney: t13 * (-10.0 / 13.0),
            periphery_capillary: -t11 * (t5 + t9 + IPF * t4),
            periphery_interstitial: IPF,
            release,
        })
    }
}
