//! Physiological constants of the virtual patient.
//!
//! A [ParameterSet] is made of one record per submodel of the dynamics. Every
//! record implements [Default] with the values of the reference patient and is
//! deserialised with `#[serde(default)]`, so a JSON document only needs to list
//! the constants it overrides:
//!
//! ```
//! use t2dsim::ParameterSet;
//!
//! let params = ParameterSet::from_json(r#"{ "pancreas": { "ml0": 12.66 } }"#).unwrap();
//! assert_eq!(params.pancreas.ml0, 12.66);
//! assert_eq!(params.pancreas.ks, 0.0572);
//! ```
mod variants;

pub use variants::VARIANTS;

use serde::{Deserialize, Serialize};

use crate::SimulatorError;

/// Volumes (dL), flows (dL/min) and transcapillary times (min) of the glucose compartments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlucoseParameters {
    /// Brain capillary volume
    pub v_bc: f64,
    /// Brain interstitial volume
    pub v_bf: f64,
    /// Heart and lungs volume
    pub v_h: f64,
    /// Liver volume
    pub v_l: f64,
    /// Gut volume
    pub v_g: f64,
    /// Kidney volume
    pub v_k: f64,
    /// Periphery capillary volume
    pub v_pc: f64,
    /// Periphery interstitial volume
    pub v_pf: f64,
    pub q_b: f64,
    pub q_h: f64,
    /// Hepatic artery flow
    pub q_a: f64,
    pub q_l: f64,
    pub q_g: f64,
    pub q_k: f64,
    pub q_p: f64,
    /// Brain transcapillary diffusion time
    pub t_b: f64,
    /// Periphery transcapillary diffusion time
    pub t_p: f64,
}

impl Default for GlucoseParameters {
    fn default() -> Self {
        Self {
            v_bc: 3.5,
            v_bf: 4.5,
            v_h: 13.8,
            v_l: 25.1,
            v_g: 11.2,
            v_k: 6.6,
            v_pc: 10.4,
            v_pf: 67.4,
            q_b: 5.9,
            q_h: 43.7,
            q_a: 2.5,
            q_l: 12.6,
            q_g: 10.1,
            q_k: 10.1,
            q_p: 15.1,
            t_b: 2.1,
            t_p: 5.0,
        }
    }
}

/// Volumes (L), flows (L/min) and the transcapillary time of the insulin compartments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsulinParameters {
    pub v_b: f64,
    pub v_h: f64,
    pub v_g: f64,
    pub v_l: f64,
    pub v_k: f64,
    pub v_pc: f64,
    pub v_pf: f64,
    pub q_b: f64,
    pub q_h: f64,
    pub q_a: f64,
    pub q_k: f64,
    pub q_p: f64,
    pub q_g: f64,
    pub q_l: f64,
    pub t_p: f64,
}

impl Default for InsulinParameters {
    fn default() -> Self {
        Self {
            v_b: 0.26,
            v_h: 0.99,
            v_g: 0.94,
            v_l: 1.14,
            v_k: 0.51,
            v_pc: 0.74,
            v_pf: 6.74,
            q_b: 0.45,
            q_h: 3.12,
            q_a: 0.18,
            q_k: 0.72,
            q_p: 1.05,
            q_g: 0.72,
            q_l: 0.9,
            t_p: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlucagonParameters {
    /// Glucagon distribution volume
    pub v_gamma: f64,
}

impl Default for GlucagonParameters {
    fn default() -> Self {
        Self { v_gamma: 6.74 }
    }
}

/// Gastric emptying and intestinal absorption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbsorptionParameters {
    /// Fraction of the meal that appears in plasma
    pub fg: f64,
    /// Upper volume threshold of the emptying curve, as a fraction of the meal
    pub kq1: f64,
    /// Lower volume threshold of the emptying curve, as a fraction of the meal
    pub kq2: f64,
    /// Grinding rate, solid to liquid stomach
    pub k12: f64,
    pub kmin: f64,
    pub kmax: f64,
    pub kabs: f64,
}

impl Default for AbsorptionParameters {
    fn default() -> Self {
        Self {
            fg: 0.9,
            kq1: 0.68,
            kq2: 0.00236,
            k12: 0.08,
            kmin: 0.005,
            kmax: 0.05,
            kabs: 0.08,
        }
    }
}

/// Shape constants of the metabolic-rate multipliers
///
/// `c*` are slopes and `d*` offsets of the tanh curves for peripheral uptake
/// (1), steady-state insulin effect on hepatic production (2), glucose effect
/// on hepatic production (3), steady-state insulin effect on hepatic uptake
/// (4) and glucose effect on hepatic uptake (5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetabolicRateParameters {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub c5: f64,
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub d5: f64,
    /// Insulin sensitivity scaling of hepatic glucose production
    pub s_hgp: f64,
    /// Insulin sensitivity scaling of peripheral glucose uptake
    pub s_pgu: f64,
}

impl Default for MetabolicRateParameters {
    fn default() -> Self {
        Self {
            c1: 0.067,
            // 1.59 * 121
            c2: 192.39,
            c3: 0.62,
            c4: 1.72,
            c5: 2.03,
            d1: 1.126,
            d2: 0.683,
            d3: 0.14,
            d4: 0.023,
            d5: 1.59,
            s_hgp: 1.0,
            s_pgu: 1.0,
        }
    }
}

/// Beta-cell mass and secretion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PancreasParameters {
    /// GLP-1 potentiation of the secretion potentiator
    pub zeta1: f64,
    /// Direct GLP-1 contribution to secretion
    pub zeta2: f64,
    /// Labile insulin mass at rest
    pub ml0: f64,
    pub kl: f64,
    pub ks: f64,
    /// Provision rate of the releasable pool
    pub gamma: f64,
    /// Potentiator tracking rate
    pub alpha: f64,
    /// Glucose tracking rate of R
    pub beta: f64,
    pub n1: f64,
    pub n2: f64,
    /// Global secretion capacity
    pub s_factor: f64,
}

impl Default for PancreasParameters {
    fn default() -> Self {
        Self {
            zeta1: 0.0026,
            zeta2: 0.000099,
            ml0: 6.33,
            kl: 0.0572,
            ks: 0.0572,
            gamma: 2.366,
            alpha: 0.615,
            beta: 0.931,
            n1: 0.0499,
            n2: 0.00015,
            s_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glp1Parameters {
    pub v_phi: f64,
    pub k_out: f64,
    /// Clearance added per unit of free DPP-4 receptor
    pub cf2: f64,
    pub tau_phi: f64,
    /// Secretion per unit of gastric emptying
    pub zeta: f64,
}

impl Default for Glp1Parameters {
    fn default() -> Self {
        Self {
            v_phi: 11.31,
            k_out: 68.30411374407583,
            cf2: 21.151177251184837,
            tau_phi: 35.1,
            zeta: 8.248,
        }
    }
}

/// Vildagliptin pharmacokinetics and DPP-4 binding, rates per minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dpp4InhibitorParameters {
    pub ka1: f64,
    pub ka2: f64,
    pub cl: f64,
    /// Intercompartmental clearance
    pub cl_ic: f64,
    pub v_p: f64,
    pub v_c: f64,
    /// Dissociation constant
    pub kvd: f64,
    pub k2v: f64,
    pub koff: f64,
    pub kdeg: f64,
    /// Peripheral receptor capacity
    pub rmax_p: f64,
    /// Central receptor capacity
    pub rmax_c: f64,
}

impl Default for Dpp4InhibitorParameters {
    fn default() -> Self {
        Self {
            ka1: 1.26 / 60.0,
            ka2: 1.05 / 60.0,
            cl: 36.4 / 60.0,
            cl_ic: 40.1 / 60.0,
            v_p: 97.3,
            v_c: 22.2,
            kvd: 71.9,
            k2v: 23.4 / 60.0,
            koff: 0.612 / 60.0,
            kdeg: 0.110 / 60.0,
            rmax_p: 13.0,
            rmax_c: 5.0,
        }
    }
}

/// Metformin transfer rates and Hill effect curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetforminParameters {
    pub kgo: f64,
    pub kgg: f64,
    pub kpg: f64,
    pub kgl: f64,
    pub kpl: f64,
    pub klp: f64,
    pub kpo: f64,
    /// Maximal boost of gut glucose uptake
    pub v_gw_max: f64,
    /// Maximal suppression of hepatic glucose production
    pub v_l_max: f64,
    /// Maximal boost of peripheral glucose uptake
    pub v_p_max: f64,
    pub n_gw: i32,
    pub n_l: i32,
    pub n_p: i32,
    pub phi_gw50: f64,
    pub phi_l50: f64,
    pub phi_p50: f64,
    pub rho_alpha: f64,
    pub rho_beta: f64,
    /// Dissolution rate of the fast oral pool
    pub alpha: f64,
    /// Dissolution rate of the slow oral pool
    pub beta: f64,
}

impl Default for MetforminParameters {
    fn default() -> Self {
        Self {
            kgo: 1.88e-03,
            kgg: 1.85e-03,
            kpg: 4.13,
            kgl: 0.46,
            kpl: 1.01e-02,
            klp: 0.91,
            kpo: 0.51,
            v_gw_max: 0.9720,
            v_l_max: 0.189,
            v_p_max: 0.2960,
            n_gw: 2,
            n_l: 5,
            n_p: 5,
            phi_gw50: 431.0,
            phi_l50: 521.0,
            phi_p50: 1024.0,
            rho_alpha: 2.70e4 / 5.0e5,
            rho_beta: 2.70e4 / 5.0e5,
            alpha: 0.06,
            beta: 0.1,
        }
    }
}

/// Long-acting (glargine-like) insulin absorption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongActingInsulinParameters {
    pub p: f64,
    pub r: f64,
    pub q: f64,
    pub b: f64,
    /// Solubility limit of the precipitate
    pub c_max: f64,
    pub k: f64,
    pub k_cl: f64,
}

impl Default for LongActingInsulinParameters {
    fn default() -> Self {
        Self {
            p: 0.014023809879501,
            r: 0.005642135109700,
            q: 0.007287049037943,
            b: 0.088371175275079,
            c_max: 15.0,
            k: 0.033904763958221,
            k_cl: 0.005347967285141,
        }
    }
}

/// Fast-acting (aspart-like) insulin absorption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastActingInsulinParameters {
    pub p: f64,
    pub r: f64,
    pub q: f64,
    pub b: f64,
    pub k_cl: f64,
}

impl Default for FastActingInsulinParameters {
    fn default() -> Self {
        Self {
            p: 0.033304427073854,
            r: 0.192838157600319,
            q: -0.000000009999983,
            b: 0.350073112766538,
            k_cl: 0.031321989850181,
        }
    }
}

/// Heart-rate driven exercise effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalActivityParameters {
    /// Heart-rate tracking time constant
    pub t_hr: f64,
    pub ne: i32,
    pub ae: f64,
    pub te: f64,
    pub alpha_e: f64,
    pub beta_e: f64,
    /// Resting heart rate (bpm)
    pub hr_basal: f64,
    pub ce1: f64,
    pub ce2: f64,
}

impl Default for PhysicalActivityParameters {
    fn default() -> Self {
        Self {
            t_hr: 5.0,
            ne: 4,
            ae: 5.0,
            te: 600.0,
            alpha_e: 0.8,
            beta_e: 3.39e-4,
            hr_basal: 65.0,
            ce1: 500.0,
            ce2: 100.0,
        }
    }
}

/// Relative error of self-monitored blood glucose readings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmbgParameters {
    pub sigma: f64,
}

impl Default for SmbgParameters {
    fn default() -> Self {
        Self { sigma: 0.1 }
    }
}

/// The complete set of constants of one virtual patient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub glucose: GlucoseParameters,
    pub insulin: InsulinParameters,
    pub glucagon: GlucagonParameters,
    pub absorption: AbsorptionParameters,
    pub metabolic_rates: MetabolicRateParameters,
    pub pancreas: PancreasParameters,
    pub glp1: Glp1Parameters,
    pub dpp4_inhibitor: Dpp4InhibitorParameters,
    pub metformin: MetforminParameters,
    pub long_acting_insulin: LongActingInsulinParameters,
    pub fast_acting_insulin: FastActingInsulinParameters,
    pub physical_activity: PhysicalActivityParameters,
    pub smbg: SmbgParameters,
}

impl ParameterSet {
    /// Returns a modified copy, leaving `self` untouched
    ///
    /// ```
    /// use t2dsim::ParameterSet;
    ///
    /// let base = ParameterSet::default();
    /// let weak = base.with(|p| p.pancreas.s_factor = 0.5);
    /// assert_eq!(base.pancreas.s_factor, 1.0);
    /// assert_eq!(weak.pancreas.s_factor, 0.5);
    /// ```
    pub fn with(&self, edit: impl FnOnce(&mut ParameterSet)) -> ParameterSet {
        let mut params = self.clone();
        edit(&mut params);
        params
    }

    /// Parses a (possibly partial) JSON document on top of the defaults
    pub fn from_json(json: &str) -> Result<ParameterSet, SimulatorError> {
        let params: ParameterSet = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every constant the model divides by
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let g = &self.glucose;
        let i = &self.insulin;
        let a = &self.absorption;
        let m = &self.metabolic_rates;
        let pa = &self.physical_activity;
        let mf = &self.metformin;
        let v = &self.dpp4_inhibitor;

        let divisors = [
            ("glucose.v_bc", g.v_bc),
            ("glucose.v_bf", g.v_bf),
            ("glucose.v_h", g.v_h),
            ("glucose.v_l", g.v_l),
            ("glucose.v_g", g.v_g),
            ("glucose.v_k", g.v_k),
            ("glucose.v_pc", g.v_pc),
            ("glucose.v_pf", g.v_pf),
            ("glucose.t_b", g.t_b),
            ("glucose.t_p", g.t_p),
            ("glucose.q_b", g.q_b),
            ("glucose.q_g", g.q_g),
            ("glucose.q_l", g.q_l),
            ("glucose.q_p * glucose.t_p", g.q_p * g.t_p),
            ("insulin.v_b", i.v_b),
            ("insulin.v_h", i.v_h),
            ("insulin.v_g", i.v_g),
            ("insulin.v_l", i.v_l),
            ("insulin.v_k", i.v_k),
            ("insulin.v_pc", i.v_pc),
            ("insulin.v_pf", i.v_pf),
            ("insulin.t_p", i.t_p),
            ("insulin.q_l", i.q_l),
            ("insulin.q_p", i.q_p),
            (
                "peripheral insulin clearance denominator",
                0.85 / (0.15 * i.q_p) - 20.0 / i.v_pf,
            ),
            ("glucagon.v_gamma", self.glucagon.v_gamma),
            ("1 - absorption.kq1", 1.0 - a.kq1),
            ("absorption.kq2", a.kq2),
            (
                "basal peripheral uptake multiplier",
                7.03 + m.s_pgu * 6.52 * (m.c1 * (1.0 - m.d1)).tanh(),
            ),
            (
                "basal insulin effect on hepatic production",
                1.21 - m.s_hgp * 1.14 * (m.c2 * (1.0 - m.d2)).tanh(),
            ),
            (
                "basal glucose effect on hepatic production",
                1.42 - 1.41 * (m.c3 * (1.0 - m.d3)).tanh(),
            ),
            (
                "basal insulin effect on hepatic uptake",
                (m.c4 * (1.0 - m.d4)).tanh(),
            ),
            (
                "basal glucose effect on hepatic uptake",
                5.66 + 5.66 * (m.c5 * (1.0 - m.d5)).tanh(),
            ),
            ("glp1.tau_phi", self.glp1.tau_phi),
            ("glp1.v_phi", self.glp1.v_phi),
            ("dpp4_inhibitor.v_c", v.v_c),
            ("dpp4_inhibitor.v_p", v.v_p),
            ("metformin.phi_gw50", mf.phi_gw50),
            ("metformin.phi_l50", mf.phi_l50),
            ("metformin.phi_p50", mf.phi_p50),
            ("physical_activity.t_hr", pa.t_hr),
            ("physical_activity.te", pa.te),
            ("physical_activity.ae * hr_basal", pa.ae * pa.hr_basal),
        ];

        for (name, value) in divisors {
            ensure_divisor(name, value)?;
        }
        Ok(())
    }
}

/// Fails with a configuration error unless `value` is finite and non-zero
pub(crate) fn ensure_divisor(name: &str, value: f64) -> Result<f64, SimulatorError> {
    if value == 0.0 || !value.is_finite() {
        return Err(SimulatorError::configuration(name, value));
    }
    Ok(value)
}
