//! Layout of the 57-element state vector.
//!
//! Each submodel of the dynamics owns a fixed, disjoint set of indices. Only
//! the dose indices ([Q_STO_SOLID], [METFORMIN_FAST], [METFORMIN_SLOW],
//! [VILDAGLIPTIN_DEPOT], [FAST_HEXAMER], [LONG_BOUND], [MEAL_DOSE] and
//! [MEAL_MEMORY]) are perturbed between integration steps.
use super::V;

/// Number of states
pub const NSTATES: usize = 57;

// Gut absorption (mg)
pub const Q_STO_SOLID: usize = 0;
pub const Q_STO_LIQUID: usize = 1;
pub const Q_GUT: usize = 2;

// Metformin (µg)
pub const METFORMIN_FAST: usize = 3;
pub const METFORMIN_SLOW: usize = 4;
pub const METFORMIN_LUMEN: usize = 5;
pub const METFORMIN_WALL: usize = 6;
pub const METFORMIN_LIVER: usize = 7;
pub const METFORMIN_PLASMA: usize = 8;

// Vildagliptin (nmol)
pub const VILDAGLIPTIN_DEPOT: usize = 9;
pub const VILDAGLIPTIN_TRANSIT: usize = 10;
pub const VILDAGLIPTIN_CENTRAL: usize = 11;
pub const VILDAGLIPTIN_PERIPHERAL: usize = 12;
pub const DPP4_BOUND_CENTRAL: usize = 13;
pub const DPP4_BOUND_PERIPHERAL: usize = 14;

// Exertion
pub const EXERTION_E1: usize = 15;
pub const EXERTION_E2: usize = 16;

// Injected insulin depots
pub const FAST_HEXAMER: usize = 17;
pub const FAST_DIMER: usize = 18;
pub const LONG_BOUND: usize = 19;
pub const LONG_HEXAMER: usize = 20;
pub const LONG_DIMER: usize = 21;

// Pancreas
pub const PANCREAS_MASS: usize = 22;
pub const PANCREAS_POTENTIATOR: usize = 23;
pub const PANCREAS_TRACKING: usize = 24;

// Insulin concentrations (mU/L)
pub const I_BRAIN: usize = 25;
pub const I_HEART: usize = 26;
pub const I_GUT: usize = 27;
pub const I_LIVER: usize = 28;
pub const I_KIDNEY: usize = 29;
pub const I_PERIPHERY_CAPILLARY: usize = 30;
pub const I_PERIPHERY_INTERSTITIAL: usize = 31;

// Glucose concentrations (mg/dL)
pub const G_BRAIN_CAPILLARY: usize = 32;
pub const G_BRAIN_INTERSTITIAL: usize = 33;
pub const G_HEART: usize = 34;
pub const G_GUT: usize = 35;
pub const G_LIVER: usize = 36;
pub const G_KIDNEY: usize = 37;
pub const G_PERIPHERY_CAPILLARY: usize = 38;
pub const G_PERIPHERY_INTERSTITIAL: usize = 39;

/// Normalised glucagon
pub const GLUCAGON: usize = 40;
pub const GLP1_GUT: usize = 41;
pub const GLP1_PLASMA: usize = 42;

// Metabolic-rate modulation
pub const M_IHGP: usize = 43;
pub const F_R: usize = 44;
pub const M_IHGU: usize = 45;

// Meal bookkeeping
pub const MEAL_DOSE: usize = 46;
pub const MEAL_MEMORY: usize = 47;

pub const EXERTION_ENERGY: usize = 48;

// Cumulative diagnostics
pub const GLUCOSE_CLEARED: usize = 49;
pub const GLUCOSE_APPEARED: usize = 50;
pub const INSULIN_CLEARED: usize = 51;
pub const INSULIN_SECRETED: usize = 52;
pub const INSULIN_INJECTED: usize = 53;

// Injected insulin in the interstitium
pub const LONG_INTERSTITIAL: usize = 54;
pub const FAST_INTERSTITIAL: usize = 55;

/// Integral of heart glucose
pub const G_HEART_INTEGRAL: usize = 56;

/// Indices holding a physical amount or concentration, which must stay
/// non-negative under non-negative dosing
pub const MASS_INDICES: [usize; 45] = [
    Q_STO_SOLID,
    Q_STO_LIQUID,
    Q_GUT,
    METFORMIN_FAST,
    METFORMIN_SLOW,
    METFORMIN_LUMEN,
    METFORMIN_WALL,
    METFORMIN_LIVER,
    METFORMIN_PLASMA,
    VILDAGLIPTIN_DEPOT,
    VILDAGLIPTIN_TRANSIT,
    VILDAGLIPTIN_CENTRAL,
    VILDAGLIPTIN_PERIPHERAL,
    DPP4_BOUND_CENTRAL,
    DPP4_BOUND_PERIPHERAL,
    FAST_HEXAMER,
    FAST_DIMER,
    LONG_BOUND,
    LONG_HEXAMER,
    LONG_DIMER,
    PANCREAS_MASS,
    PANCREAS_POTENTIATOR,
    PANCREAS_TRACKING,
    I_BRAIN,
    I_HEART,
    I_GUT,
    I_LIVER,
    I_KIDNEY,
    I_PERIPHERY_CAPILLARY,
    I_PERIPHERY_INTERSTITIAL,
    G_BRAIN_CAPILLARY,
    G_BRAIN_INTERSTITIAL,
    G_HEART,
    G_GUT,
    G_LIVER,
    G_KIDNEY,
    G_PERIPHERY_CAPILLARY,
    G_PERIPHERY_INTERSTITIAL,
    GLUCAGON,
    GLP1_GUT,
    GLP1_PLASMA,
    MEAL_DOSE,
    MEAL_MEMORY,
    LONG_INTERSTITIAL,
    FAST_INTERSTITIAL,
];

/// Discrete perturbation of the state between integration steps
pub trait State {
    /// Adds `amount` to the compartment `input`
    fn add_bolus(&mut self, input: usize, amount: f64);
}

impl State for V {
    #[inline(always)]
    fn add_bolus(&mut self, input: usize, amount: f64) {
        self[input] += amount;
    }
}
