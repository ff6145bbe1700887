//! Hadronic tau clustering: seed selection, cone clustering, leading-track veto.
//!
//! # Algorithm (per event)
//! 1. Seeds: tracks with pT ≥ `min_seed_pt` and |η| ≤ `max_seed_eta`, kept in
//!    input order.
//! 2. For each seed, scan every other track of the event in input order and
//!    measure ΔR to the seed's own direction (the reference never moves as
//!    fragments are merged):
//!    - ΔR ≥ isolation radius → ignored
//!    - harder than the seed → seed vetoed, scan stops
//!    - ΔR < core radius → merged (momentum, charge, prong)
//!    - otherwise → pT added to the isolation sum
//! 3. A seed that survives with at most [`MAX_PRONGS`] prongs becomes a
//!    [`TauCandidate`].
//!
//! Seeds are independent: a fragment can be merged into, or counted in the
//! isolation of, several candidates.

use crate::{
    config::{ClustererConfig, NeighborSearch},
    grid::EtaPhiGrid,
    types::{TauCandidate, Track, TrackId},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Candidates with more charged tracks than this are discarded.
pub const MAX_PRONGS: u32 = 5;

/// What happened to one seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeedOutcome {
    /// Produced the candidate at `candidate` in the output list.
    Accepted { candidate: usize },
    /// A harder track lay inside the isolation cone.
    Vetoed { by: TrackId, delta_r: f64 },
    /// Survived the veto but collected too many core tracks.
    TooManyProngs { n_prongs: u32 },
}

/// Candidates of one event together with the fate of every seed.
#[derive(Clone, Debug, Default)]
pub struct ClusterOutput {
    pub candidates: Vec<TauCandidate>,
    /// One entry per seed, in seed order
    pub outcomes: Vec<(TrackId, SeedOutcome)>,
}

impl ClusterOutput {
    pub fn n_seeds(&self) -> usize {
        self.outcomes.len()
    }

    pub fn n_vetoed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SeedOutcome::Vetoed { .. }))
            .count()
    }

    pub fn n_too_many_prongs(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SeedOutcome::TooManyProngs { .. }))
            .count()
    }
}

/// Reconstructs tau candidates from the tracks of one event.
///
/// The clusterer holds only its configuration, so one instance can serve any
/// number of events, including concurrently.
#[derive(Clone, Debug, Default)]
pub struct TauClusterer {
    config: ClustererConfig,
}

impl TauClusterer {
    pub fn new(config: ClustererConfig) -> Self {
        Self { config }
    }

    /// Seed acceptance. Written as the negation of the rejection cuts so that
    /// a track with NaN kinematics is not silently dropped; its NaN fields
    /// propagate into the candidate instead.
    pub fn is_seed(&self, track: &Track) -> bool {
        let rejected =
            track.pt() < self.config.min_seed_pt || track.eta().abs() > self.config.max_seed_eta;
        !rejected
    }

    /// Indices of the seed tracks, in input order.
    pub fn select_seeds(&self, tracks: &[Track]) -> Vec<usize> {
        tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.is_seed(t))
            .map(|(i, _)| i)
            .collect()
    }

    /// Reconstruct the tau candidates of one event.
    pub fn cluster(&self, tracks: &[Track]) -> Vec<TauCandidate> {
        self.cluster_with_outcomes(tracks).candidates
    }

    /// Reconstruct the tau candidates of one event and report per-seed
    /// decisions.
    pub fn cluster_with_outcomes(&self, tracks: &[Track]) -> ClusterOutput {
        let seeds = self.select_seeds(tracks);
        let mut out = ClusterOutput {
            candidates: Vec::with_capacity(seeds.len()),
            outcomes: Vec::with_capacity(seeds.len()),
        };
        if seeds.is_empty() {
            return out;
        }

        let grid = match self.config.search {
            NeighborSearch::Grid => Some(EtaPhiGrid::build(self.config.isolation_radius, tracks)),
            NeighborSearch::Linear => None,
        };

        for &si in &seeds {
            let seed = &tracks[si];
            let nearby = grid
                .as_ref()
                .and_then(|g| g.query_nearby(seed.eta(), seed.phi()));
            let verdict = match nearby {
                Some(indices) => self.evaluate_seed(tracks, si, indices.into_iter()),
                None => self.evaluate_seed(tracks, si, 0..tracks.len()),
            };
            let outcome = match verdict {
                Ok(candidate) => {
                    out.candidates.push(candidate);
                    SeedOutcome::Accepted {
                        candidate: out.candidates.len() - 1,
                    }
                }
                Err(rejection) => rejection,
            };
            out.outcomes.push((seed.id, outcome));
        }
        out
    }

    /// Cluster around `tracks[seed_idx]`, visiting fragment indices in the
    /// order `fragments` yields them (must be ascending).
    fn evaluate_seed(
        &self,
        tracks: &[Track],
        seed_idx: usize,
        fragments: impl Iterator<Item = usize>,
    ) -> Result<TauCandidate, SeedOutcome> {
        let seed = &tracks[seed_idx];
        let seed_pt = seed.pt();
        let reference = seed.momentum;

        let mut momentum = seed.momentum;
        let mut charge = seed.charge;
        let mut n_prongs: u32 = 1;
        let mut isolation = 0.0;

        for fi in fragments {
            if fi == seed_idx {
                continue;
            }
            let fragment = &tracks[fi];
            let delta_r = fragment.momentum.delta_r(&reference);
            if delta_r.is_nan() || delta_r >= self.config.isolation_radius {
                continue;
            }
            if fragment.pt() > seed_pt {
                debug!(
                    seed = %seed.id,
                    by = %fragment.id,
                    delta_r,
                    "seed vetoed by harder track in isolation cone"
                );
                return Err(SeedOutcome::Vetoed {
                    by: fragment.id,
                    delta_r,
                });
            }
            if delta_r < self.config.core_radius {
                trace!(seed = %seed.id, fragment = %fragment.id, delta_r, "core merge");
                momentum += fragment.momentum;
                charge += fragment.charge;
                n_prongs += 1;
            } else {
                isolation += fragment.pt();
            }
        }

        if n_prongs > MAX_PRONGS {
            debug!(seed = %seed.id, n_prongs, "seed rejected: too many prongs");
            return Err(SeedOutcome::TooManyProngs { n_prongs });
        }

        Ok(TauCandidate {
            seed: seed.id,
            momentum,
            charge,
            n_prongs,
            n_photons: 0,
            n_neutral_hadrons: 0,
            isolation,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn trk(id: u64, pt: f64, eta: f64, phi: f64, charge: i32) -> Track {
        Track::from_pt_eta_phi_m(id, pt, eta, phi, 0.13957, charge)
    }

    fn both_searches() -> [TauClusterer; 2] {
        [
            TauClusterer::default(),
            TauClusterer::new(ClustererConfig {
                search: NeighborSearch::Grid,
                ..Default::default()
            }),
        ]
    }

    #[test]
    fn single_isolated_track() {
        let seed = Track::from_pt_eta_phi_m(0, 10.0, 0.0, 0.0, 0.14, 1);
        for clusterer in both_searches() {
            let taus = clusterer.cluster(std::slice::from_ref(&seed));
            assert_eq!(taus.len(), 1);
            let tau = &taus[0];
            assert_eq!(tau.pt(), 10.0);
            assert_eq!(tau.momentum, seed.momentum);
            assert_eq!(tau.n_prongs, 1);
            assert_eq!(tau.isolation, 0.0);
            assert_eq!(tau.charge, 1);
            assert_eq!(tau.n_photons, 0);
            assert_eq!(tau.n_neutral_hadrons, 0);
        }
    }

    #[test]
    fn core_fragment_merged_and_annulus_fragment_isolated() {
        let tracks = vec![
            trk(0, 10.0, 0.0, 0.0, 1),
            trk(1, 3.0, 0.2, 0.0, -1),
            trk(2, 2.0, 0.0, 0.4, 1),
        ];
        for clusterer in both_searches() {
            let taus = clusterer.cluster(&tracks);
            assert_eq!(taus.len(), 1);
            let tau = &taus[0];
            assert_eq!(tau.seed, TrackId(0));
            assert_eq!(tau.n_prongs, 2);
            assert_eq!(tau.charge, 0);
            assert_abs_diff_eq!(tau.isolation, 2.0, epsilon = 1e-12);
            let expected = tracks[0].momentum + tracks[1].momentum;
            assert_eq!(tau.momentum, expected);
        }
    }

    #[test]
    fn harder_track_in_core_vetoes_seed() {
        let tracks = vec![trk(0, 10.0, 0.0, 0.0, 1), trk(1, 15.0, 0.1, 0.0, 1)];
        let out = TauClusterer::default().cluster_with_outcomes(&tracks);
        // The 15 GeV track is itself a seed and survives (10 < 15).
        assert_eq!(out.candidates.len(), 1);
        assert_eq!(out.candidates[0].seed, TrackId(1));
        assert_eq!(out.candidates[0].n_prongs, 2);
        match &out.outcomes[0] {
            (TrackId(0), SeedOutcome::Vetoed { by, delta_r }) => {
                assert_eq!(*by, TrackId(1));
                assert_abs_diff_eq!(*delta_r, 0.1, epsilon = 1e-12);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn veto_with_non_seed_fragment_yields_nothing() {
        // Harder fragment outside |eta| acceptance cannot seed.
        let tracks = vec![trk(0, 10.0, 2.4, 0.0, 1), trk(1, 15.0, 2.6, 0.0, 1)];
        let clusterer = TauClusterer::default();
        assert!(clusterer.cluster(&tracks).is_empty());
        assert_eq!(clusterer.cluster_with_outcomes(&tracks).n_vetoed(), 1);
    }

    #[test]
    fn sub_threshold_track_never_seeds() {
        let tracks = vec![trk(0, 4.9, 0.0, 0.0, 1)];
        let clusterer = TauClusterer::default();
        assert!(clusterer.select_seeds(&tracks).is_empty());
        assert!(clusterer.cluster(&tracks).is_empty());
        // Still acts as a core fragment for a harder seed.
        let tracks = vec![trk(0, 4.9, 0.0, 0.0, 1), trk(1, 6.0, 0.1, 0.0, -1)];
        let taus = clusterer.cluster(&tracks);
        assert_eq!(taus.len(), 1);
        assert_eq!(taus[0].seed, TrackId(1));
        assert_eq!(taus[0].n_prongs, 2);
    }

    #[test]
    fn seed_threshold_is_inclusive() {
        let clusterer = TauClusterer::default();
        assert!(clusterer.is_seed(&trk(0, 5.0, 0.0, 0.0, 1)));
        assert!(!clusterer.is_seed(&trk(0, 20.0, 2.6, 0.0, 1)));
        assert!(clusterer.is_seed(&trk(0, 20.0, -2.4, 0.0, 1)));
    }

    #[test]
    fn equal_pt_fragment_does_not_veto() {
        let tracks = vec![trk(0, 10.0, 0.0, 0.0, 1), trk(1, 10.0, 0.1, 0.0, -1)];
        let taus = TauClusterer::default().cluster(&tracks);
        // Both seeds survive and absorb each other.
        assert_eq!(taus.len(), 2);
        assert!(taus.iter().all(|t| t.n_prongs == 2 && t.charge == 0));
    }

    #[test]
    fn fragment_on_isolation_boundary_ignored() {
        let tracks = vec![trk(0, 10.0, 0.0, 0.0, 1), trk(1, 50.0, 0.1, 0.4, 1)];
        // Put the cone edge exactly on the separation: the cone is open.
        let edge = tracks[1].momentum.delta_r(&tracks[0].momentum);
        let clusterer = TauClusterer::new(ClustererConfig {
            isolation_radius: edge,
            ..Default::default()
        });
        let out = clusterer.cluster_with_outcomes(&tracks);
        assert_eq!(out.candidates.len(), 2);
        assert_eq!(out.candidates[0].isolation, 0.0);
        assert_eq!(out.candidates[1].isolation, 0.0);
    }

    #[test]
    fn fragment_on_core_boundary_goes_to_isolation() {
        let tracks = vec![trk(0, 10.0, 0.0, 0.0, 1), trk(1, 2.0, 0.1, 0.2, -1)];
        // The core cone is open at its edge, so the fragment lands in the annulus.
        let edge = tracks[1].momentum.delta_r(&tracks[0].momentum);
        for search in [NeighborSearch::Linear, NeighborSearch::Grid] {
            let clusterer = TauClusterer::new(ClustererConfig {
                core_radius: edge,
                search,
                ..Default::default()
            });
            let taus = clusterer.cluster(&tracks);
            assert_eq!(taus.len(), 1);
            assert_eq!(taus[0].n_prongs, 1);
            assert_eq!(taus[0].charge, 1);
            assert_eq!(taus[0].momentum, tracks[0].momentum);
            assert_eq!(taus[0].isolation, tracks[1].pt());
        }
    }

    #[test]
    fn veto_after_prong_overflow_reported_as_veto() {
        let mut tracks = vec![trk(0, 20.0, 0.0, 0.0, 1)];
        for i in 1..=5 {
            tracks.push(trk(i, 1.0, 0.02 * i as f64, 0.0, if i % 2 == 0 { 1 } else { -1 }));
        }
        tracks.push(trk(9, 30.0, 0.45, 0.0, 1));
        for clusterer in both_searches() {
            let out = clusterer.cluster_with_outcomes(&tracks);
            assert_eq!(out.n_too_many_prongs(), 0);
            match &out.outcomes[0] {
                (TrackId(0), SeedOutcome::Vetoed { by, delta_r }) => {
                    assert_eq!(*by, TrackId(9));
                    assert_abs_diff_eq!(*delta_r, 0.45, epsilon = 1e-12);
                }
                other => panic!("unexpected outcome {other:?}"),
            }
            // The 30 GeV track seeds its own candidate; the soft tracks sit in
            // its annulus.
            assert_eq!(out.candidates.len(), 1);
            assert_eq!(out.candidates[0].seed, TrackId(9));
            assert_eq!(out.candidates[0].n_prongs, 1);
        }
    }

    #[test]
    fn six_prongs_discarded() {
        let mut tracks = vec![trk(0, 20.0, 0.0, 0.0, 1)];
        for i in 1..=5 {
            tracks.push(trk(i, 1.0, 0.02 * i as f64, 0.0, if i % 2 == 0 { 1 } else { -1 }));
        }
        let clusterer = TauClusterer::default();
        let out = clusterer.cluster_with_outcomes(&tracks);
        assert!(out.candidates.is_empty());
        assert_eq!(
            out.outcomes,
            vec![(TrackId(0), SeedOutcome::TooManyProngs { n_prongs: 6 })]
        );

        tracks.pop();
        let taus = clusterer.cluster(&tracks);
        assert_eq!(taus.len(), 1);
        assert_eq!(taus[0].n_prongs, MAX_PRONGS);
    }

    #[test]
    fn seeds_evaluated_in_input_order_sharing_fragments() {
        let tracks = vec![
            trk(7, 8.0, 1.0, 1.0, 1),
            trk(3, 1.0, 1.0, 1.275, -1),
            trk(5, 9.0, -1.0, -2.0, -1),
            trk(9, 6.0, 1.0, 1.55, 1),
            trk(4, 2.0, 1.4, 1.0, 1),
        ];
        let taus = TauClusterer::default().cluster(&tracks);
        let seeds: Vec<_> = taus.iter().map(|t| t.seed).collect();
        assert_eq!(seeds, vec![TrackId(7), TrackId(5), TrackId(9)]);
        // Track 3 lies in the core of both 7 and 9.
        assert_eq!(taus[0].n_prongs, 2);
        assert_eq!(taus[0].charge, 0);
        assert_eq!(taus[2].n_prongs, 2);
        assert_eq!(taus[2].charge, 0);
        // Track 4 sits in the annulus of 7 only.
        assert_abs_diff_eq!(taus[0].isolation, 2.0, epsilon = 1e-9);
        assert_eq!(taus[1].isolation, 0.0);
        assert_eq!(taus[2].isolation, 0.0);
    }

    #[test]
    fn identical_tracks_are_distinct_by_position() {
        let t = trk(0, 10.0, 0.0, 0.0, 1);
        let taus = TauClusterer::default().cluster(&[t.clone(), t]);
        assert_eq!(taus.len(), 2);
        assert!(taus.iter().all(|tau| tau.n_prongs == 2 && tau.charge == 2));
    }

    #[test]
    fn empty_event_yields_nothing() {
        for clusterer in both_searches() {
            let out = clusterer.cluster_with_outcomes(&[]);
            assert!(out.candidates.is_empty());
            assert_eq!(out.n_seeds(), 0);
        }
    }

    #[test]
    fn nan_seed_propagates() {
        let bad = Track::new(
            TrackId(0),
            crate::kinematics::LorentzVector::new(f64::NAN, f64::NAN, 0.0, 1.0),
            1,
        );
        let taus = TauClusterer::default().cluster(&[bad, trk(1, 10.0, 1.0, 1.0, 1)]);
        assert_eq!(taus.len(), 2);
        assert!(taus[0].pt().is_nan());
        assert_eq!(taus[0].n_prongs, 1);
    }
}
