//! Reconstruction metrics: efficiency, fake rate, prong multiplicity, isolation.

use crate::{clusterer::MAX_PRONGS, kinematics::delta_r, pipeline::EventOutput};
use serde::{Deserialize, Serialize};

/// Default ΔR for matching a candidate to a generator-level tau.
pub const DEFAULT_MATCH_RADIUS: f64 = 0.2;

/// Generator-level visible hadronic tau.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TruthTau {
    pub eta: f64,
    pub phi: f64,
    /// pT of the visible (charged) decay products
    pub visible_pt: f64,
    pub n_prongs: u32,
    pub charge: i32,
}

/// Accumulated metric statistics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReconstructionMetrics {
    /// Number of events evaluated
    pub n_events: u64,
    pub n_seeds: u64,
    pub n_candidates: u64,
    pub n_vetoed: u64,
    pub n_too_many_prongs: u64,
    /// Candidates per prong count; index = n_prongs
    pub prong_histogram: [u64; MAX_PRONGS as usize + 1],
    /// Generator-level taus seen
    pub n_truth: u64,
    /// Generator-level taus matched to a candidate
    pub n_matched: u64,
    /// Matched taus whose prong count was reproduced
    pub n_prongs_correct: u64,
    /// Candidates not matched to any generator-level tau
    pub n_fakes: u64,
    /// Sum of candidate isolation (for the mean)
    pub sum_isolation: f64,
}

impl ReconstructionMetrics {
    /// Matched truth taus / truth taus (1.0 if there were none).
    pub fn efficiency(&self) -> f64 {
        if self.n_truth == 0 {
            1.0
        } else {
            self.n_matched as f64 / self.n_truth as f64
        }
    }

    /// Unmatched candidates / candidates (0.0 if there were none).
    pub fn fake_rate(&self) -> f64 {
        if self.n_candidates == 0 {
            0.0
        } else {
            self.n_fakes as f64 / self.n_candidates as f64
        }
    }

    pub fn mean_isolation(&self) -> f64 {
        if self.n_candidates == 0 {
            0.0
        } else {
            self.sum_isolation / self.n_candidates as f64
        }
    }

    /// Accumulate one event. Each truth tau is matched, in order, to the
    /// closest still-unused candidate within `match_radius`.
    pub fn accumulate(&mut self, output: &EventOutput, truth: &[TruthTau], match_radius: f64) {
        self.n_events += 1;
        self.n_seeds += output.n_seeds as u64;
        self.n_vetoed += output.n_vetoed as u64;
        self.n_too_many_prongs += output.n_too_many_prongs as u64;
        self.n_candidates += output.taus.len() as u64;
        self.n_truth += truth.len() as u64;

        for tau in &output.taus {
            if let Some(bin) = self.prong_histogram.get_mut(tau.n_prongs as usize) {
                *bin += 1;
            }
            self.sum_isolation += tau.isolation;
        }

        let mut used = vec![false; output.taus.len()];
        for t in truth {
            let best = output
                .taus
                .iter()
                .enumerate()
                .filter(|(i, _)| !used[*i])
                .map(|(i, c)| (i, delta_r(c.eta(), c.phi(), t.eta, t.phi)))
                .filter(|(_, dr)| *dr < match_radius)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((i, _)) = best {
                used[i] = true;
                self.n_matched += 1;
                if output.taus[i].n_prongs == t.n_prongs {
                    self.n_prongs_correct += 1;
                }
            }
        }
        self.n_fakes += used.iter().filter(|u| !**u).count() as u64;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
