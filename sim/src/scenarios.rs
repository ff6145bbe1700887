//! Scenario definitions.
//!
//! Each scenario is a named mix of physics sources (hadronic taus, QCD-like
//! jets) on top of soft underlying activity. All scenarios are deterministic
//! given the same seed.

use serde::{Deserialize, Serialize};

/// Which pre-defined scenario to load.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// One 1-prong tau per event, light soft activity
    SingleTau,
    /// One 3-prong tau per event, light soft activity
    ThreeProng,
    /// Two jets per event: leading-track seeds with busy cones
    DiJet,
    /// Two taus (30% 3-prong) and two jets per event
    Mixed,
    /// 4 taus, 10 jets and ~150 soft tracks per event — scalability test
    Stress,
}

/// What a source emits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SourceKind {
    /// Hadronic tau: 1 or 3 charged pions inside `collimation` of the axis.
    Tau {
        three_prong_fraction: f64,
        collimation: f64,
    },
    /// Jet: a leading track plus softer tracks within `spread` of the axis.
    Jet {
        min_tracks: u32,
        max_tracks: u32,
        spread: f64,
    },
}

/// A physics source instantiated `multiplicity` times per event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceSpec {
    pub kind: SourceKind,
    pub multiplicity: u32,
    /// Visible (taus) or leading-track (jets) pT range (GeV)
    pub pt_min: f64,
    pub pt_max: f64,
    /// Axis drawn uniformly in |η| < max_eta
    pub max_eta: f64,
}

/// Soft tracks uniform in η–φ.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SoftActivity {
    /// Poisson mean of soft tracks per event
    pub mean_tracks: f64,
    pub pt_min: f64,
    pub pt_max: f64,
    pub max_eta: f64,
}

impl Default for SoftActivity {
    fn default() -> Self {
        Self {
            mean_tracks: 5.0,
            pt_min: 0.5,
            pt_max: 3.0,
            max_eta: 2.5,
        }
    }
}

/// A fully configured generation scenario.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    /// Events generated when the caller does not ask for a count
    pub default_events: usize,
    pub sources: Vec<SourceSpec>,
    pub soft: SoftActivity,
}

impl Scenario {
    /// Build the named scenario. Uses `seed` for repeatability.
    pub fn build(kind: ScenarioKind, seed: u64) -> Self {
        match kind {
            ScenarioKind::SingleTau => Self::single_tau(seed),
            ScenarioKind::ThreeProng => Self::three_prong(seed),
            ScenarioKind::DiJet => Self::di_jet(seed),
            ScenarioKind::Mixed => Self::mixed(seed),
            ScenarioKind::Stress => Self::stress(seed),
        }
    }

    fn single_tau(seed: u64) -> Self {
        Scenario {
            name: "single_tau".into(),
            seed,
            default_events: 1000,
            sources: vec![tau_source(1, 0.0)],
            soft: SoftActivity::default(),
        }
    }

    fn three_prong(seed: u64) -> Self {
        Scenario {
            name: "three_prong".into(),
            seed,
            default_events: 1000,
            sources: vec![tau_source(1, 1.0)],
            soft: SoftActivity::default(),
        }
    }

    fn di_jet(seed: u64) -> Self {
        Scenario {
            name: "di_jet".into(),
            seed,
            default_events: 1000,
            sources: vec![jet_source(2)],
            soft: SoftActivity {
                mean_tracks: 10.0,
                ..Default::default()
            },
        }
    }

    fn mixed(seed: u64) -> Self {
        Scenario {
            name: "mixed".into(),
            seed,
            default_events: 1000,
            sources: vec![tau_source(2, 0.3), jet_source(2)],
            soft: SoftActivity {
                mean_tracks: 15.0,
                ..Default::default()
            },
        }
    }

    fn stress(seed: u64) -> Self {
        Scenario {
            name: "stress".into(),
            seed,
            default_events: 200,
            sources: vec![tau_source(4, 0.3), jet_source(10)],
            soft: SoftActivity {
                mean_tracks: 150.0,
                ..Default::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tau_source(multiplicity: u32, three_prong_fraction: f64) -> SourceSpec {
    SourceSpec {
        kind: SourceKind::Tau {
            three_prong_fraction,
            collimation: 0.1,
        },
        multiplicity,
        pt_min: 15.0,
        pt_max: 60.0,
        max_eta: 2.3,
    }
}

fn jet_source(multiplicity: u32) -> SourceSpec {
    SourceSpec {
        kind: SourceKind::Jet {
            min_tracks: 6,
            max_tracks: 15,
            spread: 0.4,
        },
        multiplicity,
        pt_min: 10.0,
        pt_max: 50.0,
        max_eta: 2.5,
    }
}
